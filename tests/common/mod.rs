//! Shared test utilities for integration tests.

use std::sync::Arc;

use a2a_rs::builders::AgentCardBuilder;
use a2a_rs::error::{A2AError, A2AResult};
use a2a_rs::server::{a2a_router, AppState, DefaultRequestHandler, InMemoryTaskStore, TaskStore};
use a2a_rs::types::{Artifact, AgentCard, Message, MessageRole, Task, TaskState, TaskStatus};
use async_trait::async_trait;

/// A simple echo agent that echoes back the text from the user's message.
pub struct EchoAgent;

#[async_trait]
impl a2a_rs::server::AgentExecutor for EchoAgent {
    async fn handle_message(&self, message: Message) -> A2AResult<Message> {
        let text = message.content.as_text();
        Ok(message.reply(
            MessageRole::Agent,
            a2a_rs::types::Content::text(format!("Echo: {}", text)),
        ))
    }

    async fn handle_task(&self, mut task: Task) -> A2AResult<Task> {
        let text = task
            .message
            .as_ref()
            .and_then(|m| m.get("text").and_then(|t| t.as_str()))
            .unwrap_or("No text received");
        task.artifacts.push(Artifact::text(format!("Echo: {}", text)));
        task.status = TaskStatus::new(TaskState::Completed);
        Ok(task)
    }
}

/// A slow echo agent that appends an extra artifact before completing.
pub struct SlowEchoAgent;

#[async_trait]
impl a2a_rs::server::AgentExecutor for SlowEchoAgent {
    async fn handle_message(&self, message: Message) -> A2AResult<Message> {
        let text = message.content.as_text();
        Ok(message.reply(
            MessageRole::Agent,
            a2a_rs::types::Content::text(format!("Done: {}", text)),
        ))
    }

    async fn handle_task(&self, mut task: Task) -> A2AResult<Task> {
        let text = task
            .message
            .as_ref()
            .and_then(|m| m.get("text").and_then(|t| t.as_str()))
            .unwrap_or("No text")
            .to_string();
        task.artifacts.push(Artifact::text(format!("Processed: {}", text)));
        task.artifacts.push(Artifact::text(format!("Done: {}", text)));
        task.status = TaskStatus::new(TaskState::Completed);
        Ok(task)
    }
}

/// An agent that always fails.
pub struct FailingAgent;

#[async_trait]
impl a2a_rs::server::AgentExecutor for FailingAgent {
    async fn handle_message(&self, _message: Message) -> A2AResult<Message> {
        Err(A2AError::internal_error("Agent intentionally failed"))
    }

    async fn handle_task(&self, _task: Task) -> A2AResult<Task> {
        Err(A2AError::internal_error("Agent intentionally failed"))
    }
}

/// Build a default agent card for testing.
pub fn test_agent_card(url: &str) -> AgentCard {
    AgentCardBuilder::new("Test Echo Agent")
        .description("An echo agent for testing")
        .version("0.1.0")
        .url(url)
        .with_streaming(true)
        .with_skill(
            "echo",
            "Echo",
            "Echoes back messages",
            vec!["test".to_string()],
        )
        .build()
        .expect("test agent card always sets a url")
}

/// Start a test server on a random port. Returns the base URL and a handle to shut it down.
pub async fn start_test_server(
    executor: Arc<dyn a2a_rs::server::AgentExecutor>,
) -> (String, tokio::task::JoinHandle<()>) {
    start_test_server_with_store(executor, Arc::new(InMemoryTaskStore::new())).await
}

/// Start a test server on a random port with a specific task store.
pub async fn start_test_server_with_store(
    executor: Arc<dyn a2a_rs::server::AgentExecutor>,
    store: Arc<dyn TaskStore>,
) -> (String, tokio::task::JoinHandle<()>) {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let base_url = format!("http://{}", addr);

    let handler = Arc::new(DefaultRequestHandler::new(executor, store));
    let agent_card = test_agent_card(&format!("{}/a2a", base_url));
    let app = a2a_router(AppState::new(handler, agent_card));

    let handle = tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    // Brief wait for the server to start accepting connections.
    tokio::time::sleep(std::time::Duration::from_millis(50)).await;

    (base_url, handle)
}

/// Helper to build a JSON-RPC request body.
pub fn jsonrpc_request(
    id: serde_json::Value,
    method: &str,
    params: serde_json::Value,
) -> serde_json::Value {
    serde_json::json!({
        "jsonrpc": "2.0",
        "id": id,
        "method": method,
        "params": params
    })
}

/// Helper to build a `tasks/send` request body for a fresh task carrying `text`.
pub fn tasks_send_request(id: i64, session_id: &str, text: &str) -> serde_json::Value {
    jsonrpc_request(
        serde_json::json!(id),
        "tasks/send",
        serde_json::json!({
            "id": format!("task-{}", id),
            "sessionId": session_id,
            "message": {"kind": "text", "text": text},
            "status": {"state": "submitted", "timestamp": "2026-01-01T00:00:00Z"},
            "history": [],
            "artifacts": []
        }),
    )
}
