//! A2A server framework — traits and implementations for building A2A agents.
//!
//! - [`AgentExecutor`] trait — implement your agent logic; `handle_message`
//!   and `handle_task` are mandatory, `stream_response` and
//!   `tasks_send_subscribe` are optional
//! - [`bridge_message_to_task`] — default message-to-task bridge for
//!   message-only adapters
//! - [`TaskStore`] trait + [`InMemoryTaskStore`] — task persistence
//! - [`EventQueue`] — broadcast channel for streaming events, for adapters
//!   that want to produce their own streams
//! - [`QueueManager`] trait + [`InMemoryQueueManager`] — per-task queue
//!   management
//! - [`EventConsumer`] — consumes events from a queue (one-shot or streaming)
//! - [`RequestHandler`] trait + [`DefaultRequestHandler`] — wires an
//!   `AgentExecutor` to a `TaskStore`
//! - [`a2a_router`] — ready-made axum routes for A2A servers
//!
//! # Quick start
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use a2a_rs::server::*;
//! use a2a_rs::types::{AgentCard, Message, Task};
//!
//! struct EchoAgent;
//!
//! #[async_trait::async_trait]
//! impl AgentExecutor for EchoAgent {
//!     async fn handle_message(&self, message: Message) -> a2a_rs::A2AResult<Message> {
//!         Ok(message.reply(a2a_rs::types::MessageRole::Agent, message.content.clone()))
//!     }
//!
//!     async fn handle_task(&self, task: Task) -> a2a_rs::A2AResult<Task> {
//!         Ok(task)
//!     }
//! }
//!
//! let executor: Arc<dyn AgentExecutor> = Arc::new(EchoAgent);
//! let store: Arc<dyn TaskStore> = Arc::new(InMemoryTaskStore::new());
//! let handler: Arc<dyn RequestHandler> = Arc::new(DefaultRequestHandler::new(executor, store));
//! ```

pub mod agent_executor;
pub mod axum_integration;
pub mod event_queue;
pub mod request_handler;
pub mod task_store;

// Re-export key types at the server module level for convenience.
pub use agent_executor::{bridge_message_to_task, AgentExecutor};
pub use axum_integration::{a2a_router, AppState};
pub use event_queue::{
    EventConsumer, EventQueue, InMemoryQueueManager, NoTaskQueue, QueueManager, TaskQueueExists,
};
pub use request_handler::{DefaultRequestHandler, RequestHandler};
pub use task_store::{InMemoryTaskStore, TaskListParams, TaskListResponse, TaskStore};
