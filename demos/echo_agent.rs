//! Echo Agent — a minimal A2A server that echoes messages back.
//!
//! Run with:
//! ```sh
//! cargo run --example echo_agent
//! ```
//!
//! Then test with curl:
//! ```sh
//! # Check agent card
//! curl http://localhost:3000/agent.json | jq
//!
//! # Send a task
//! curl -X POST http://localhost:3000/tasks/send \
//!   -H "Content-Type: application/json" \
//!   -d '{
//!     "id": "task-1",
//!     "sessionId": "session-1",
//!     "message": {"type": "text", "text": "Hello, agent!"}
//!   }'
//! ```

use std::sync::Arc;

use a2a_rs::builders::AgentCardBuilder;
use a2a_rs::error::A2AResult;
use a2a_rs::server::{a2a_router, AgentExecutor, AppState, DefaultRequestHandler, InMemoryTaskStore, TaskStore};
use a2a_rs::types::{Artifact, Message, MessageRole, Task, TaskStatus, TaskState};
use async_trait::async_trait;

/// A simple agent that echoes back whatever you send it.
struct EchoAgent;

#[async_trait]
impl AgentExecutor for EchoAgent {
    async fn handle_message(&self, message: Message) -> A2AResult<Message> {
        let text = a2a_rs::utils::get_message_text(&message).unwrap_or_default();
        Ok(message.reply(MessageRole::Agent, a2a_rs::types::Content::text(format!("Echo: {text}"))))
    }

    async fn handle_task(&self, mut task: Task) -> A2AResult<Task> {
        let text = task
            .message
            .as_ref()
            .and_then(|m| m.get("text"))
            .and_then(|t| t.as_str())
            .unwrap_or("No text received");

        task.artifacts.push(Artifact::text(format!("Echo: {text}")));
        task.status = TaskStatus::new(TaskState::Completed);
        Ok(task)
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .init();

    a2a_rs::RuntimeConfig::from_env().apply_dialect_default();

    let agent_card = AgentCardBuilder::new("Echo Agent")
        .description("A simple agent that echoes messages back")
        .version("0.1.0")
        .url("http://localhost:3000/tasks/send")
        .with_streaming(true)
        .with_skill(
            "echo",
            "Echo",
            "Echoes back any text message you send",
            vec!["echo".to_string(), "test".to_string()],
        )
        .build()?;

    let executor: Arc<dyn AgentExecutor> = Arc::new(EchoAgent);
    let store: Arc<dyn TaskStore> = Arc::new(InMemoryTaskStore::new());
    let handler = Arc::new(DefaultRequestHandler::new(executor, store));

    let app = a2a_router(AppState::new(handler, agent_card));

    let addr = "0.0.0.0:3000";
    println!("Echo Agent listening on http://{}", addr);
    println!("  Agent card: http://{}/agent.json", addr);
    println!("  Send a task: POST http://{}/tasks/send", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
