//! High-level A2A client for interacting with remote agents.
//!
//! Provides typed methods for the task-engine's JSON-RPC surface (`tasks/send`,
//! `tasks/get`, `tasks/cancel`, `tasks/stream`/`tasks/sendSubscribe`) plus
//! convenience helpers for the common case of sending a single text message.

use serde::Serialize;

use crate::error::{A2AError, A2AResult};
use crate::types::{AgentCard, JsonRpcId, JsonRpcRequest, JsonRpcResponse, Task};

use super::card_resolver::CardResolver;
use super::sse::SseStream;
use super::transport::{JsonRpcTransport, Transport};

/// Client for interacting with A2A-compatible agents.
///
/// Provides typed methods for the task-engine's operations:
/// - `tasks/send` — run a task to completion (or a pause state)
/// - `tasks/get` — retrieve a task by ID
/// - `tasks/cancel` — cancel a running task
/// - `tasks/stream` / `tasks/sendSubscribe` — stream task snapshots via SSE
///
/// # Construction
///
/// ```no_run
/// use a2a_rs::client::A2AClient;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// // From a base URL (resolves the agent card, discovers the endpoint):
/// let client = A2AClient::from_url("http://localhost:7420").await?;
///
/// // With a custom transport:
/// use a2a_rs::client::JsonRpcTransport;
/// let transport = JsonRpcTransport::new("http://localhost:7420");
/// let client = A2AClient::with_transport(Box::new(transport));
/// # Ok(())
/// # }
/// ```
pub struct A2AClient {
    transport: Box<dyn Transport>,
    agent_card: Option<AgentCard>,
}

impl std::fmt::Debug for A2AClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("A2AClient")
            .field("agent_card", &self.agent_card)
            .finish_non_exhaustive()
    }
}

impl A2AClient {
    /// Create a client from a base URL.
    ///
    /// Resolves the agent card from `{url}/agent.json` (falling back to
    /// `{url}/a2a/agent.json`) and points the transport at the card's `url`.
    ///
    /// # Errors
    ///
    /// Returns an error if the agent card cannot be fetched or parsed.
    pub async fn from_url(url: &str) -> A2AResult<Self> {
        let resolver = CardResolver::new();
        let card = resolver.resolve(url).await?;
        Self::from_card(card)
    }

    /// Create a client from an already-resolved agent card.
    pub fn from_card(card: AgentCard) -> A2AResult<Self> {
        let url = CardResolver::get_a2a_url(&card)
            .ok_or_else(|| A2AError::Transport(format!("agent card for '{}' has no url", card.name)))?;

        let transport = JsonRpcTransport::new(url);

        Ok(Self {
            transport: Box::new(transport),
            agent_card: Some(card),
        })
    }

    /// Create a client with a custom transport.
    pub fn with_transport(transport: Box<dyn Transport>) -> Self {
        Self {
            transport,
            agent_card: None,
        }
    }

    /// Create a client from a direct endpoint URL (skips agent card resolution).
    pub fn from_endpoint(url: &str) -> Self {
        let transport = JsonRpcTransport::new(url);
        Self {
            transport: Box::new(transport),
            agent_card: None,
        }
    }

    // ──────────────────────────────────────────────────
    // Core A2A JSON-RPC Methods
    // ──────────────────────────────────────────────────

    /// Run a task to completion (or a pause state) (`tasks/send`).
    pub async fn send_task(&self, task: Task) -> A2AResult<Task> {
        let request = build_request("tasks/send", &task)?;
        let response = self.transport.send(&request).await?;
        parse_result(response)
    }

    /// Retrieve a task by ID (`tasks/get`).
    pub async fn get_task(&self, task_id: &str, history_length: Option<usize>) -> A2AResult<Task> {
        let params = serde_json::json!({ "id": task_id, "historyLength": history_length });
        let request = build_request("tasks/get", &params)?;
        let response = self.transport.send(&request).await?;
        parse_result(response)
    }

    /// Cancel a running task (`tasks/cancel`). Idempotent.
    pub async fn cancel_task(&self, task_id: &str) -> A2AResult<Task> {
        let params = serde_json::json!({ "id": task_id });
        let request = build_request("tasks/cancel", &params)?;
        let response = self.transport.send(&request).await?;
        parse_result(response)
    }

    /// Run a task, streaming snapshots as it progresses (`tasks/stream`).
    ///
    /// Returns an SSE stream that yields [`crate::types::StreamChunk`] events.
    /// The final element carries a terminal `status.state`.
    pub async fn stream_task(&self, task: Task) -> A2AResult<SseStream> {
        let request = build_request("tasks/stream", &task)?;
        self.transport.send_stream(&request).await
    }

    /// Get the cached agent card.
    ///
    /// Returns an error if no card was resolved during construction — use
    /// [`from_url()`] to auto-resolve, or fetch manually with [`CardResolver`].
    ///
    /// [`from_url()`]: Self::from_url
    /// [`CardResolver`]: super::CardResolver
    pub fn get_card(&self) -> A2AResult<&AgentCard> {
        self.agent_card.as_ref().ok_or_else(|| {
            A2AError::Transport(
                "no agent card available; use A2AClient::from_url() to auto-resolve".to_string(),
            )
        })
    }

    /// Close the client and release any held resources.
    pub async fn close(self) -> A2AResult<()> {
        self.transport.close().await
    }

    // ──────────────────────────────────────────────────
    // Convenience Helpers
    // ──────────────────────────────────────────────────

    /// Convenience: wrap `text` in a fresh task (new `session_id`) and send it.
    pub async fn send_text(&self, text: &str) -> A2AResult<Task> {
        let mut task = Task::new(uuid::Uuid::new_v4().to_string());
        task.message = Some(serde_json::json!({ "type": "text", "text": text }));
        self.send_task(task).await
    }

    /// Convenience: wrap `text` in a task within an existing session and
    /// stream the result.
    pub async fn send_text_stream(&self, text: &str) -> A2AResult<SseStream> {
        let mut task = Task::new(uuid::Uuid::new_v4().to_string());
        task.message = Some(serde_json::json!({ "type": "text", "text": text }));
        self.stream_task(task).await
    }

    /// Convenience: send a text message within an existing session.
    pub async fn send_text_in_session(&self, text: &str, session_id: &str) -> A2AResult<Task> {
        let mut task = Task::new(session_id.to_string());
        task.message = Some(serde_json::json!({ "type": "text", "text": text }));
        self.send_task(task).await
    }
}

// ──────────────────────────────────────────────────
// Internal helpers
// ──────────────────────────────────────────────────

/// Build a JSON-RPC request with a random UUID ID.
fn build_request(method: &str, params: &impl Serialize) -> A2AResult<JsonRpcRequest> {
    let params_value = serde_json::to_value(params)
        .map_err(|e| A2AError::Transport(format!("failed to serialize request params: {e}")))?;

    Ok(JsonRpcRequest::new(
        JsonRpcId::String(uuid::Uuid::new_v4().to_string()),
        method,
        Some(params_value),
    ))
}

/// Parse the `result` field from a JSON-RPC response into the expected type.
///
/// If the response contains an error, converts it into an [`A2AError::JsonRpc`].
fn parse_result<T: serde::de::DeserializeOwned>(response: JsonRpcResponse) -> A2AResult<T> {
    if let Some(error) = response.error {
        return Err(A2AError::JsonRpc {
            code: error.code,
            message: error.message,
            data: error.data,
        });
    }

    let result = response.result.ok_or_else(|| {
        A2AError::InvalidJson("JSON-RPC response has neither 'result' nor 'error'".to_string())
    })?;

    serde_json::from_value(result)
        .map_err(|e| A2AError::InvalidJson(format!("failed to deserialize response result: {e}")))
}
