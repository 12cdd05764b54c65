//! Tests for the `AgentExecutor` trait's default methods and the
//! `bridge_message_to_task` message-to-task bridge.

use std::sync::Mutex;

use a2a_rs::error::{A2AError, A2AResult};
use a2a_rs::server::{bridge_message_to_task, AgentExecutor};
use a2a_rs::types::{Content, Message, MessageRole, Task, TaskState, TaskStatus};
use async_trait::async_trait;

fn make_task(id: &str, session_id: &str) -> Task {
    Task {
        id: id.to_string(),
        session_id: session_id.to_string(),
        status: TaskStatus::new(TaskState::Submitted),
        message: None,
        history: Vec::new(),
        artifacts: Vec::new(),
        metadata: serde_json::Map::new(),
    }
}

/// An executor implementing only the mandatory methods, to verify the
/// optional ones default to unsupported/no-op.
struct MinimalAgent;

#[async_trait]
impl AgentExecutor for MinimalAgent {
    async fn handle_message(&self, message: Message) -> A2AResult<Message> {
        Ok(message.reply(MessageRole::Agent, Content::text("ack")))
    }

    async fn handle_task(&self, mut task: Task) -> A2AResult<Task> {
        task.status = TaskStatus::new(TaskState::Completed);
        Ok(task)
    }
}

#[tokio::test]
async fn default_stream_response_returns_none() {
    let agent = MinimalAgent;
    let message = Message::new(MessageRole::User, Content::text("hi"));
    let result = agent.stream_response(message).await.unwrap();
    assert!(result.is_none());
}

#[tokio::test]
async fn default_tasks_send_subscribe_returns_none() {
    let agent = MinimalAgent;
    let task = make_task("t1", "s1");
    let result = agent.tasks_send_subscribe(task).await.unwrap();
    assert!(result.is_none());
}

#[tokio::test]
async fn default_cancel_is_a_noop() {
    let agent = MinimalAgent;
    agent.cancel("t1").await.unwrap();
}

/// An executor that tracks whether `cancel` was invoked, to verify adapters
/// can override the default no-op.
struct CancelTrackingAgent {
    canceled: Mutex<Vec<String>>,
}

#[async_trait]
impl AgentExecutor for CancelTrackingAgent {
    async fn handle_message(&self, message: Message) -> A2AResult<Message> {
        Ok(message.reply(MessageRole::Agent, Content::text("ok")))
    }

    async fn handle_task(&self, task: Task) -> A2AResult<Task> {
        Ok(task)
    }

    async fn cancel(&self, task_id: &str) -> A2AResult<()> {
        self.canceled.lock().unwrap().push(task_id.to_string());
        Ok(())
    }
}

#[tokio::test]
async fn overridden_cancel_is_invoked() {
    let agent = CancelTrackingAgent {
        canceled: Mutex::new(Vec::new()),
    };
    agent.cancel("t1").await.unwrap();
    assert_eq!(*agent.canceled.lock().unwrap(), vec!["t1".to_string()]);
}

// ============================================================================
// bridge_message_to_task
// ============================================================================

#[tokio::test]
async fn bridge_packs_text_reply_into_artifact_and_completes() {
    let agent = MinimalAgent;
    let task = make_task("t1", "s1");
    let message = Message::new(MessageRole::User, Content::text("hello"));

    let result = bridge_message_to_task(&agent, task, message).await.unwrap();

    assert_eq!(result.status.state, TaskState::Completed);
    assert_eq!(result.artifacts.len(), 1);
    assert_eq!(result.artifacts[0].parts[0].text_value(), Some("ack"));
}

#[tokio::test]
async fn bridge_maps_content_error_reply_to_failed_task() {
    struct ErrorReplyAgent;

    #[async_trait]
    impl AgentExecutor for ErrorReplyAgent {
        async fn handle_message(&self, message: Message) -> A2AResult<Message> {
            Ok(message.reply(MessageRole::Agent, Content::Error {
                message: "bad input".to_string(),
            }))
        }
        async fn handle_task(&self, task: Task) -> A2AResult<Task> {
            Ok(task)
        }
    }

    let agent = ErrorReplyAgent;
    let task = make_task("t1", "s1");
    let message = Message::new(MessageRole::User, Content::text("hello"));

    let result = bridge_message_to_task(&agent, task, message).await.unwrap();

    assert_eq!(result.status.state, TaskState::Failed);
    assert!(result.artifacts.is_empty());
}

#[tokio::test]
async fn bridge_maps_handler_error_to_failed_task() {
    struct FailingAgent;

    #[async_trait]
    impl AgentExecutor for FailingAgent {
        async fn handle_message(&self, _message: Message) -> A2AResult<Message> {
            Err(A2AError::internal_error("boom"))
        }
        async fn handle_task(&self, task: Task) -> A2AResult<Task> {
            Ok(task)
        }
    }

    let agent = FailingAgent;
    let task = make_task("t1", "s1");
    let message = Message::new(MessageRole::User, Content::text("hello"));

    let result = bridge_message_to_task(&agent, task, message).await.unwrap();

    assert_eq!(result.status.state, TaskState::Failed);
    assert!(result.status.message.is_some());
}

#[tokio::test]
async fn bridge_preserves_existing_task_fields() {
    let agent = MinimalAgent;
    let mut task = make_task("t1", "s1");
    task.metadata = serde_json::json!({"preserved": true}).as_object().unwrap().clone();
    let message = Message::new(MessageRole::User, Content::text("hello"));

    let result = bridge_message_to_task(&agent, task, message).await.unwrap();

    assert_eq!(result.id, "t1");
    assert_eq!(result.session_id, "s1");
    assert_eq!(result.metadata["preserved"], true);
}
