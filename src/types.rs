//! A2A protocol data model — messages, tasks, agent cards, and the JSON-RPC envelope.
//!
//! Every entity supports `to_dict`/`from_dict` through serde, plus a parallel
//! "Google A2A" compatibility dialect for [`Message`]. Which dialect `to_dict`
//! emits by default is governed by a process-wide flag (see [`crate::dialect`]);
//! `to_google_a2a`/`from_google_a2a` always convert explicitly regardless of
//! that flag.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use uuid::Uuid;

// ============================================================================
// Message role & content
// ============================================================================

/// Who sent a [`Message`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    /// Sent by the human/client side of a conversation.
    User,
    /// Sent by the agent.
    Agent,
    /// Sent by the runtime itself (e.g. synthesized error messages).
    System,
}

impl fmt::Display for MessageRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MessageRole::User => write!(f, "user"),
            MessageRole::Agent => write!(f, "agent"),
            MessageRole::System => write!(f, "system"),
        }
    }
}

/// A single named argument to a function call.
///
/// Kept as a list of `{name, value}` pairs rather than a JSON object — this is
/// the canonical wire form for [`Content::FunctionCall`] parameters (see
/// `DESIGN.md`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionParameter {
    pub name: String,
    pub value: Value,
}

/// Tagged union of everything a [`Message`] or artifact [`Part`] can carry.
///
/// Unknown `type` values fail to deserialize with
/// [`crate::error::A2AError::InvalidParams`] (*unknown-content-kind*) rather
/// than silently dropping data.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Content {
    #[serde(rename = "text")]
    Text { text: String },

    #[serde(rename = "function_call")]
    FunctionCall {
        name: String,
        parameters: Vec<FunctionParameter>,
    },

    #[serde(rename = "function_response")]
    FunctionResponse { name: String, response: Value },

    #[serde(rename = "error")]
    Error { message: String },
}

impl Content {
    pub fn text(text: impl Into<String>) -> Self {
        Content::Text { text: text.into() }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Content::Error {
            message: message.into(),
        }
    }

    pub fn function_call(name: impl Into<String>, parameters: Vec<FunctionParameter>) -> Self {
        Content::FunctionCall {
            name: name.into(),
            parameters,
        }
    }

    pub fn function_response(name: impl Into<String>, response: Value) -> Self {
        Content::FunctionResponse {
            name: name.into(),
            response,
        }
    }

    /// Best-effort plain-text projection.
    ///
    /// Used wherever downstream consumers (conditional nodes, transforms, the
    /// workflow agent bridge) need a string to compare or forward — text
    /// content projects as-is, everything else falls back to its JSON form.
    pub fn as_text(&self) -> String {
        match self {
            Content::Text { text } => text.clone(),
            Content::FunctionCall { name, parameters } => {
                serde_json::json!({"name": name, "parameters": parameters}).to_string()
            }
            Content::FunctionResponse { response, .. } => response.to_string(),
            Content::Error { message } => message.clone(),
        }
    }

    /// The discriminator string as it appears on the wire.
    pub fn kind(&self) -> &'static str {
        match self {
            Content::Text { .. } => "text",
            Content::FunctionCall { .. } => "function_call",
            Content::FunctionResponse { .. } => "function_response",
            Content::Error { .. } => "error",
        }
    }
}

// ============================================================================
// Message
// ============================================================================

/// One message in a [`Conversation`].
///
/// Immutable once dispatched: `conversation_id` stays stable across a reply
/// chain, and a reply's `parent_message_id` equals the `message_id` of the
/// message it responds to.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    pub message_id: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_message_id: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub conversation_id: Option<String>,

    pub role: MessageRole,

    pub content: Content,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Value>,
}

impl Message {
    pub fn new(role: MessageRole, content: Content) -> Self {
        Message {
            message_id: Uuid::new_v4().to_string(),
            parent_message_id: None,
            conversation_id: None,
            role,
            content,
            metadata: None,
        }
    }

    /// Builds the reply half of a request/reply pair: same conversation,
    /// `parent_message_id` pointing back at `self`.
    pub fn reply(&self, role: MessageRole, content: Content) -> Self {
        Message {
            message_id: Uuid::new_v4().to_string(),
            parent_message_id: Some(self.message_id.clone()),
            conversation_id: self.conversation_id.clone(),
            role,
            content,
            metadata: None,
        }
    }

    pub fn with_conversation_id(mut self, conversation_id: impl Into<String>) -> Self {
        self.conversation_id = Some(conversation_id.into());
        self
    }

    pub fn with_metadata(mut self, metadata: Value) -> Self {
        self.metadata = Some(metadata);
        self
    }

    /// Encodes `self` in the "Google A2A" compatibility dialect: content
    /// becomes a single-element `parts` array instead of a bare `content`
    /// object.
    pub fn to_google_a2a(&self) -> Value {
        let part = content_to_part_json(&self.content);
        let mut obj = Map::new();
        obj.insert("parts".into(), Value::Array(vec![part]));
        obj.insert("role".into(), Value::String(self.role.to_string()));
        obj.insert("messageId".into(), Value::String(self.message_id.clone()));
        if let Some(p) = &self.parent_message_id {
            obj.insert("parentMessageId".into(), Value::String(p.clone()));
        }
        if let Some(c) = &self.conversation_id {
            obj.insert("conversationId".into(), Value::String(c.clone()));
        }
        if let Some(m) = &self.metadata {
            obj.insert("metadata".into(), m.clone());
        }
        Value::Object(obj)
    }

    /// Decodes the "Google A2A" compatibility dialect produced by
    /// [`Message::to_google_a2a`].
    pub fn from_google_a2a(value: &Value) -> crate::error::A2AResult<Self> {
        let role: MessageRole = serde_json::from_value(
            value
                .get("role")
                .cloned()
                .ok_or_else(|| crate::error::A2AError::invalid_params("missing 'role'"))?,
        )
        .map_err(|e| crate::error::A2AError::invalid_params(format!("bad-enum: {e}")))?;

        let parts = value
            .get("parts")
            .and_then(|v| v.as_array())
            .ok_or_else(|| crate::error::A2AError::invalid_params("missing 'parts'"))?;
        let first = parts
            .first()
            .ok_or_else(|| crate::error::A2AError::invalid_params("empty 'parts'"))?;
        let content = part_json_to_content(first)?;

        Ok(Message {
            message_id: value
                .get("messageId")
                .and_then(|v| v.as_str())
                .map(String::from)
                .unwrap_or_else(|| Uuid::new_v4().to_string()),
            parent_message_id: value
                .get("parentMessageId")
                .and_then(|v| v.as_str())
                .map(String::from),
            conversation_id: value
                .get("conversationId")
                .and_then(|v| v.as_str())
                .map(String::from),
            role,
            content,
            metadata: value.get("metadata").cloned(),
        })
    }

    /// Encodes `self` as a JSON object, in whichever dialect
    /// [`crate::dialect::google_a2a_compat`] currently selects.
    pub fn to_dict(&self) -> Value {
        if crate::dialect::google_a2a_compat() {
            self.to_google_a2a()
        } else {
            serde_json::to_value(self).unwrap_or(Value::Null)
        }
    }

    /// Decodes a JSON object produced by [`Message::to_dict`], in whichever
    /// dialect [`crate::dialect::google_a2a_compat`] currently selects.
    pub fn from_dict(value: &Value) -> crate::error::A2AResult<Self> {
        if crate::dialect::google_a2a_compat() {
            Self::from_google_a2a(value)
        } else {
            serde_json::from_value(value.clone())
                .map_err(|e| crate::error::A2AError::invalid_params(format!("bad message: {e}")))
        }
    }
}

fn content_to_part_json(content: &Content) -> Value {
    match content {
        Content::Text { text } => serde_json::json!({"type": "text", "text": text}),
        Content::FunctionCall { name, parameters } => serde_json::json!({
            "type": "function_call",
            "name": name,
            "parameters": parameters,
        }),
        Content::FunctionResponse { name, response } => serde_json::json!({
            "type": "function_response",
            "name": name,
            "response": response,
        }),
        Content::Error { message } => serde_json::json!({"type": "error", "message": message}),
    }
}

fn part_json_to_content(value: &Value) -> crate::error::A2AResult<Content> {
    let kind = value
        .get("type")
        .and_then(|v| v.as_str())
        .ok_or_else(|| crate::error::A2AError::invalid_params("part missing 'type'"))?;
    match kind {
        "text" => Ok(Content::Text {
            text: value
                .get("text")
                .and_then(|v| v.as_str())
                .unwrap_or_default()
                .to_string(),
        }),
        "function_call" => {
            let name = value
                .get("name")
                .and_then(|v| v.as_str())
                .unwrap_or_default()
                .to_string();
            let parameters = value
                .get("parameters")
                .cloned()
                .map(serde_json::from_value)
                .transpose()
                .map_err(|e: serde_json::Error| crate::error::A2AError::invalid_params(e.to_string()))?
                .unwrap_or_default();
            Ok(Content::FunctionCall { name, parameters })
        }
        "function_response" => Ok(Content::FunctionResponse {
            name: value
                .get("name")
                .and_then(|v| v.as_str())
                .unwrap_or_default()
                .to_string(),
            response: value.get("response").cloned().unwrap_or(Value::Null),
        }),
        "error" => Ok(Content::Error {
            message: value
                .get("message")
                .and_then(|v| v.as_str())
                .unwrap_or_default()
                .to_string(),
        }),
        other => Err(crate::error::A2AError::invalid_params(format!(
            "unknown-content-kind: {other}"
        ))),
    }
}

// ============================================================================
// Conversation
// ============================================================================

/// Append-only ordered sequence of [`Message`]s sharing one `conversation_id`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Conversation {
    pub conversation_id: String,
    #[serde(default)]
    pub messages: Vec<Message>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Value>,
}

impl Conversation {
    pub fn new() -> Self {
        Conversation {
            conversation_id: Uuid::new_v4().to_string(),
            messages: Vec::new(),
            metadata: None,
        }
    }

    /// Appends `message`, stamping it with this conversation's id if unset,
    /// and returns the stamped message.
    pub fn add_message(&mut self, mut message: Message) -> Message {
        if message.conversation_id.is_none() {
            message.conversation_id = Some(self.conversation_id.clone());
        }
        self.messages.push(message.clone());
        message
    }

    pub fn create_text_message(&mut self, text: impl Into<String>, role: MessageRole) -> Message {
        self.add_message(Message::new(role, Content::text(text)))
    }

    pub fn create_function_call(
        &mut self,
        name: impl Into<String>,
        parameters: Vec<FunctionParameter>,
        role: MessageRole,
    ) -> Message {
        self.add_message(Message::new(role, Content::function_call(name, parameters)))
    }

    pub fn create_function_response(
        &mut self,
        name: impl Into<String>,
        response: Value,
        role: MessageRole,
    ) -> Message {
        self.add_message(Message::new(role, Content::function_response(name, response)))
    }

    pub fn create_error_message(&mut self, error_message: impl Into<String>) -> Message {
        self.add_message(Message::new(MessageRole::System, Content::error(error_message)))
    }
}

impl Default for Conversation {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// Task state machine
// ============================================================================

/// Lifecycle state of a [`Task`].
///
/// `input-required` is a pause state; `completed`, `canceled`, and `failed`
/// are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TaskState {
    Submitted,
    Waiting,
    InputRequired,
    Completed,
    Canceled,
    Failed,
    Unknown,
}

impl TaskState {
    /// Terminal states reject further transitions.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            TaskState::Completed | TaskState::Canceled | TaskState::Failed
        )
    }
}

impl fmt::Display for TaskState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            TaskState::Submitted => "submitted",
            TaskState::Waiting => "waiting",
            TaskState::InputRequired => "input-required",
            TaskState::Completed => "completed",
            TaskState::Canceled => "canceled",
            TaskState::Failed => "failed",
            TaskState::Unknown => "unknown",
        };
        write!(f, "{s}")
    }
}

impl Default for TaskState {
    fn default() -> Self {
        TaskState::Submitted
    }
}

/// Current status of a [`Task`], with the timestamp of the last transition.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskStatus {
    pub state: TaskState,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<Value>,

    pub timestamp: String,
}

impl TaskStatus {
    pub fn new(state: TaskState) -> Self {
        TaskStatus {
            state,
            message: None,
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }

    pub fn with_message(state: TaskState, message: Value) -> Self {
        TaskStatus {
            state,
            message: Some(message),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}

/// A content fragment inside an [`Artifact`] — text, function call, function
/// response, or error, plus whatever extra keys the producer attached.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Part {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl Part {
    pub fn text(text: impl Into<String>) -> Self {
        let mut fields = Map::new();
        fields.insert("text".into(), Value::String(text.into()));
        Part {
            kind: "text".into(),
            fields,
        }
    }

    pub fn from_content(content: &Content) -> Self {
        let json = content_to_part_json(content);
        serde_json::from_value(json).expect("content_to_part_json always produces a valid Part")
    }

    pub fn text_value(&self) -> Option<&str> {
        if self.kind == "text" {
            self.fields.get("text").and_then(|v| v.as_str())
        } else {
            None
        }
    }
}

/// A structured result attached to a [`Task`], composed of [`Part`]s.
///
/// Artifacts are append-only within a task execution; a streamed artifact
/// sequence is a prefix-extension of the previous one.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Artifact {
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub artifact_type: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,

    pub parts: Vec<Part>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Artifact {
    pub fn text(text: impl Into<String>) -> Self {
        Artifact {
            artifact_type: Some("text".into()),
            role: None,
            parts: vec![Part::text(text)],
            extra: Map::new(),
        }
    }
}

/// A unit of work with identity, state, accumulating history and artifacts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Task {
    pub id: String,

    #[serde(rename = "sessionId")]
    pub session_id: String,

    pub status: TaskStatus,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<Value>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub history: Vec<Value>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub artifacts: Vec<Artifact>,

    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub metadata: Map<String, Value>,
}

impl Task {
    pub fn new(session_id: impl Into<String>) -> Self {
        Task {
            id: Uuid::new_v4().to_string(),
            session_id: session_id.into(),
            status: TaskStatus::new(TaskState::Submitted),
            message: None,
            history: Vec::new(),
            artifacts: Vec::new(),
            metadata: Map::new(),
        }
    }

    /// Extracts the text of the last artifact's first text-typed part, if any.
    pub fn get_text(&self) -> Option<String> {
        self.artifacts
            .last()
            .and_then(|a| a.parts.iter().find(|p| p.kind == "text"))
            .and_then(|p| p.text_value().map(String::from))
    }

    /// Projection of [`Task::get_text`] falling back to the empty string —
    /// used by workflow nodes that need a plain string regardless of whether
    /// the task produced any artifacts yet.
    pub fn text_or_empty(&self) -> String {
        self.get_text().unwrap_or_default()
    }
}

// ============================================================================
// Streaming chunks
// ============================================================================

/// One frame of an SSE stream.
///
/// Chunks for a given stream are delivered in order with a monotonically
/// increasing `index`; a chunk with `last_chunk == true` is the final frame.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StreamChunk {
    /// A fragment of free-form generated content (text or a `Part`-shaped object).
    MessageChunk {
        content: Value,
        index: u64,
        append: bool,
        #[serde(skip_serializing_if = "Option::is_none")]
        #[serde(rename = "lastChunk")]
        last_chunk: Option<bool>,
    },
    /// A snapshot of a [`Task`] as it progresses.
    TaskChunk {
        task: Task,
        index: u64,
        append: bool,
        #[serde(skip_serializing_if = "Option::is_none")]
        #[serde(rename = "lastChunk")]
        last_chunk: Option<bool>,
    },
}

impl StreamChunk {
    pub fn is_last(&self) -> bool {
        match self {
            StreamChunk::MessageChunk { last_chunk, .. } => last_chunk.unwrap_or(false),
            StreamChunk::TaskChunk { last_chunk, .. } => last_chunk.unwrap_or(false),
        }
    }
}

// ============================================================================
// Agent card
// ============================================================================

/// Self-describing JSON descriptor an agent exposes at `/agent.json`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AgentCard {
    pub name: String,
    pub description: String,
    pub url: String,
    pub version: String,

    pub capabilities: AgentCapabilities,

    pub skills: Vec<AgentSkill>,

    #[serde(default)]
    pub default_input_modes: Vec<String>,
    #[serde(default)]
    pub default_output_modes: Vec<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub authentication: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub provider: Option<AgentProvider>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub documentation_url: Option<String>,
}

/// Declares which optional behaviors an agent supports.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AgentCapabilities {
    #[serde(default)]
    pub streaming: bool,
    #[serde(default)]
    pub push_notifications: bool,
    #[serde(default)]
    pub state_transition_history: bool,
}

/// One capability an agent advertises, with keyword tags the router matches
/// against.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentSkill {
    pub id: String,
    pub name: String,
    pub description: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub examples: Vec<String>,
}

/// Organization information for an [`AgentCard`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentProvider {
    pub organization: String,
    pub url: String,
}

// ============================================================================
// JSON-RPC envelope
// ============================================================================

/// A JSON-RPC 2.0 request identifier — string or number.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum JsonRpcId {
    String(String),
    Number(i64),
}

impl fmt::Display for JsonRpcId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            JsonRpcId::String(s) => write!(f, "{s}"),
            JsonRpcId::Number(n) => write!(f, "{n}"),
        }
    }
}

impl From<String> for JsonRpcId {
    fn from(s: String) -> Self {
        JsonRpcId::String(s)
    }
}

impl From<&str> for JsonRpcId {
    fn from(s: &str) -> Self {
        JsonRpcId::String(s.to_string())
    }
}

impl From<i64> for JsonRpcId {
    fn from(n: i64) -> Self {
        JsonRpcId::Number(n)
    }
}

/// A JSON-RPC 2.0 request: `{jsonrpc, id, method, params}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonRpcRequest {
    pub jsonrpc: String,
    pub id: JsonRpcId,
    pub method: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub params: Option<Value>,
}

impl JsonRpcRequest {
    pub fn new(id: impl Into<JsonRpcId>, method: impl Into<String>, params: Option<Value>) -> Self {
        JsonRpcRequest {
            jsonrpc: "2.0".to_string(),
            id: id.into(),
            method: method.into(),
            params,
        }
    }
}

/// A JSON-RPC 2.0 response: exactly one of `result`/`error` is present.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonRpcResponse {
    pub jsonrpc: String,
    pub id: JsonRpcId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<JsonRpcError>,
}

impl JsonRpcResponse {
    pub fn success(id: JsonRpcId, result: Value) -> Self {
        JsonRpcResponse {
            jsonrpc: "2.0".to_string(),
            id,
            result: Some(result),
            error: None,
        }
    }

    pub fn error(id: JsonRpcId, error: JsonRpcError) -> Self {
        JsonRpcResponse {
            jsonrpc: "2.0".to_string(),
            id,
            result: None,
            error: Some(error),
        }
    }

    pub fn from_a2a_error(id: JsonRpcId, err: crate::error::A2AError) -> Self {
        let rpc_err: JsonRpcError = err.into();
        Self::error(id, rpc_err)
    }
}

/// A JSON-RPC 2.0 error object: `{code, message, data?}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonRpcError {
    pub code: i64,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn message_roundtrip_native() {
        let m = Message::new(MessageRole::User, Content::text("hi"));
        let json = serde_json::to_value(&m).unwrap();
        let back: Message = serde_json::from_value(json).unwrap();
        assert_eq!(back.message_id, m.message_id);
        assert!(matches!(back.content, Content::Text { text } if text == "hi"));
    }

    #[test]
    fn message_roundtrip_google_a2a() {
        let m = Message::new(MessageRole::Agent, Content::text("hello")).with_conversation_id("c1");
        let encoded = m.to_google_a2a();
        let decoded = Message::from_google_a2a(&encoded).unwrap();
        assert_eq!(decoded.role, MessageRole::Agent);
        assert_eq!(decoded.conversation_id.as_deref(), Some("c1"));
        assert!(matches!(decoded.content, Content::Text { text } if text == "hello"));
    }

    #[test]
    fn unknown_content_kind_errors() {
        let bad = serde_json::json!({"type": "bogus"});
        let err = part_json_to_content(&bad).unwrap_err();
        assert!(err.to_string().contains("unknown-content-kind"));
    }

    #[test]
    fn reply_threads_correctly() {
        let request = Message::new(MessageRole::User, Content::text("hi"));
        let reply = request.reply(MessageRole::Agent, Content::text("hi back"));
        assert_eq!(reply.parent_message_id.as_deref(), Some(request.message_id.as_str()));
        assert_eq!(reply.conversation_id, request.conversation_id);
    }

    #[test]
    fn task_state_terminal() {
        assert!(TaskState::Completed.is_terminal());
        assert!(TaskState::Canceled.is_terminal());
        assert!(TaskState::Failed.is_terminal());
        assert!(!TaskState::Waiting.is_terminal());
        assert!(!TaskState::InputRequired.is_terminal());
    }

    #[test]
    fn task_wire_shape_uses_session_id_camel_case() {
        let task = Task::new("sess-1");
        let json = serde_json::to_value(&task).unwrap();
        assert!(json.get("sessionId").is_some());
        assert!(json.get("session_id").is_none());
    }

    #[test]
    fn conversation_add_message_stamps_id() {
        let mut conv = Conversation::new();
        let m = conv.create_text_message("hi", MessageRole::User);
        assert_eq!(m.conversation_id.as_deref(), Some(conv.conversation_id.as_str()));
        assert_eq!(conv.messages.len(), 1);
    }

    #[test]
    fn function_call_parameters_are_list_form() {
        let params = vec![FunctionParameter {
            name: "location".into(),
            value: Value::String("NYC".into()),
        }];
        let content = Content::function_call("get_weather", params);
        let json = serde_json::to_value(&content).unwrap();
        assert!(json["parameters"].is_array());
        assert_eq!(json["parameters"][0]["name"], "location");
    }
}
