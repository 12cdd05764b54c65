//! Utility functions for creating and handling A2A Message objects.

use crate::types::{Content, Message, MessageRole};

/// Build a fresh agent message carrying plain text (no parent, no conversation).
///
/// # Example
///
/// ```
/// use a2a_rs::utils::new_agent_text_message;
///
/// let message = new_agent_text_message("Hello, I'm an agent");
/// assert_eq!(message.role, a2a_rs::types::MessageRole::Agent);
/// ```
pub fn new_agent_text_message(text: impl Into<String>) -> Message {
    Message::new(MessageRole::Agent, Content::text(text))
}

/// Build a fresh user message carrying plain text.
pub fn new_user_text_message(text: impl Into<String>) -> Message {
    Message::new(MessageRole::User, Content::text(text))
}

/// Build the agent reply to `request`, threading `parent_message_id` and
/// `conversation_id` through.
///
/// # Example
///
/// ```
/// use a2a_rs::types::{Content, Message, MessageRole};
/// use a2a_rs::utils::new_agent_reply;
///
/// let request = Message::new(MessageRole::User, Content::text("ping"));
/// let reply = new_agent_reply(&request, "pong");
/// assert_eq!(reply.parent_message_id, Some(request.message_id));
/// ```
pub fn new_agent_reply(request: &Message, text: impl Into<String>) -> Message {
    request.reply(MessageRole::Agent, Content::text(text))
}

/// Extract the text of a message, if its content is [`Content::Text`].
///
/// Returns `None` for function calls, function responses, and errors — use
/// `message.content.as_text()` directly when a best-effort projection of
/// non-text content is acceptable.
pub fn get_message_text(message: &Message) -> Option<String> {
    match &message.content {
        Content::Text { text } => Some(text.clone()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn agent_text_message_has_no_parent() {
        let m = new_agent_text_message("hi");
        assert_eq!(m.role, MessageRole::Agent);
        assert!(m.parent_message_id.is_none());
        assert_eq!(get_message_text(&m).as_deref(), Some("hi"));
    }

    #[test]
    fn reply_threads_parent_and_conversation() {
        let request =
            Message::new(MessageRole::User, Content::text("ping")).with_conversation_id("conv-1");
        let reply = new_agent_reply(&request, "pong");
        assert_eq!(
            reply.parent_message_id.as_deref(),
            Some(request.message_id.as_str())
        );
        assert_eq!(reply.conversation_id.as_deref(), Some("conv-1"));
        assert_eq!(get_message_text(&reply).as_deref(), Some("pong"));
    }

    #[test]
    fn non_text_content_has_no_text_projection() {
        let m = Message::new(MessageRole::Agent, Content::error("boom"));
        assert_eq!(get_message_text(&m), None);
    }
}
