//! Integration tests for `DefaultRequestHandler`, exercised directly (no
//! HTTP layer) against custom `AgentExecutor` adapters.
//!
//! HTTP-level coverage of the same operations lives in
//! `client_server_integration.rs` and `task_lifecycle.rs`.

use std::sync::Arc;

use a2a_rs::error::{A2AError, A2AResult};
use a2a_rs::server::{
    AgentExecutor, DefaultRequestHandler, InMemoryTaskStore, RequestHandler, TaskStore,
};
use a2a_rs::types::{Artifact, Message, MessageRole, StreamChunk, Task, TaskState, TaskStatus};
use async_trait::async_trait;
use futures::StreamExt;

fn make_task(session_id: &str) -> Task {
    Task {
        id: uuid::Uuid::new_v4().to_string(),
        session_id: session_id.to_string(),
        status: TaskStatus::new(TaskState::Submitted),
        message: None,
        history: Vec::new(),
        artifacts: Vec::new(),
        metadata: serde_json::Map::new(),
    }
}

/// Agent that completes immediately with a single text artifact.
struct ImmediateCompleteAgent;

#[async_trait]
impl AgentExecutor for ImmediateCompleteAgent {
    async fn handle_message(&self, message: Message) -> A2AResult<Message> {
        Ok(message.reply(MessageRole::Agent, message.content.clone()))
    }

    async fn handle_task(&self, mut task: Task) -> A2AResult<Task> {
        task.artifacts.push(Artifact::text("Done!"));
        task.status = TaskStatus::new(TaskState::Completed);
        Ok(task)
    }
}

/// Agent that always errors out of `handle_task`.
struct ImmediateFailAgent;

#[async_trait]
impl AgentExecutor for ImmediateFailAgent {
    async fn handle_message(&self, _message: Message) -> A2AResult<Message> {
        Err(A2AError::internal_error("agent crashed"))
    }

    async fn handle_task(&self, _task: Task) -> A2AResult<Task> {
        Err(A2AError::internal_error("agent crashed"))
    }
}

fn make_handler(executor: Arc<dyn AgentExecutor>) -> DefaultRequestHandler {
    let store: Arc<dyn TaskStore> = Arc::new(InMemoryTaskStore::new());
    DefaultRequestHandler::new(executor, store)
}

fn make_handler_with_store(
    executor: Arc<dyn AgentExecutor>,
) -> (DefaultRequestHandler, Arc<dyn TaskStore>) {
    let store: Arc<dyn TaskStore> = Arc::new(InMemoryTaskStore::new());
    (DefaultRequestHandler::new(executor, store.clone()), store)
}

// ---- on_send_task ----

#[tokio::test]
async fn send_task_creates_and_completes() {
    let handler = make_handler(Arc::new(ImmediateCompleteAgent));
    let task = make_task("session-1");

    let result = handler.on_send_task(task).await.unwrap();
    assert_eq!(result.status.state, TaskState::Completed);
    assert_eq!(result.artifacts.len(), 1);
}

#[tokio::test]
async fn send_task_executor_error_propagates() {
    let handler = make_handler(Arc::new(ImmediateFailAgent));
    let task = make_task("session-1");

    let result = handler.on_send_task(task).await;
    assert!(result.is_err());
}

// ---- on_get_task ----

#[tokio::test]
async fn get_task_returns_saved_task() {
    let handler = make_handler(Arc::new(ImmediateCompleteAgent));
    let task = make_task("session-1");
    let id = task.id.clone();

    handler.on_send_task(task).await.unwrap();

    let fetched = handler.on_get_task(&id, None).await.unwrap();
    assert_eq!(fetched.status.state, TaskState::Completed);
}

#[tokio::test]
async fn get_task_not_found() {
    let handler = make_handler(Arc::new(ImmediateCompleteAgent));
    let result = handler.on_get_task("nonexistent", None).await;
    assert!(matches!(result, Err(A2AError::TaskNotFound { .. })));
}

#[tokio::test]
async fn get_task_trims_history_to_length() {
    let handler = make_handler(Arc::new(ImmediateCompleteAgent));
    let mut task = make_task("session-1");
    task.history = vec![
        serde_json::json!({"n": 1}),
        serde_json::json!({"n": 2}),
        serde_json::json!({"n": 3}),
    ];
    let id = task.id.clone();
    handler.on_send_task(task).await.unwrap();

    let fetched = handler.on_get_task(&id, Some(1)).await.unwrap();
    assert_eq!(fetched.history.len(), 1);
    assert_eq!(fetched.history[0]["n"], 3);
}

// ---- on_cancel_task ----

#[tokio::test]
async fn cancel_task_transitions_to_canceled() {
    let (handler, store) = make_handler_with_store(Arc::new(ImmediateCompleteAgent));
    let task = make_task("session-1");
    let id = task.id.clone();
    store.save(task).await.unwrap();

    let canceled = handler.on_cancel_task(&id).await.unwrap();
    assert_eq!(canceled.status.state, TaskState::Canceled);
}

#[tokio::test]
async fn cancel_task_is_idempotent() {
    let (handler, store) = make_handler_with_store(Arc::new(ImmediateCompleteAgent));
    let task = make_task("session-1");
    let id = task.id.clone();
    store.save(task).await.unwrap();

    handler.on_cancel_task(&id).await.unwrap();
    let canceled_again = handler.on_cancel_task(&id).await.unwrap();
    assert_eq!(canceled_again.status.state, TaskState::Canceled);
}

#[tokio::test]
async fn cancel_completed_task_is_a_noop() {
    let handler = make_handler(Arc::new(ImmediateCompleteAgent));
    let task = make_task("session-1");
    let id = task.id.clone();
    handler.on_send_task(task).await.unwrap();

    let result = handler.on_cancel_task(&id).await.unwrap();
    assert_eq!(result.status.state, TaskState::Completed);
}

#[tokio::test]
async fn cancel_nonexistent_task_errors() {
    let handler = make_handler(Arc::new(ImmediateCompleteAgent));
    let result = handler.on_cancel_task("nonexistent").await;
    assert!(matches!(result, Err(A2AError::TaskNotFound { .. })));
}

// ---- on_stream_task ----

#[tokio::test]
async fn stream_task_without_native_streaming_yields_one_final_chunk() {
    let handler = make_handler(Arc::new(ImmediateCompleteAgent));
    let task = make_task("session-1");

    let mut stream = handler.on_stream_task(task).await.unwrap();
    let chunks: Vec<_> = stream.by_ref().collect().await;

    assert_eq!(chunks.len(), 1);
    let chunk = chunks[0].as_ref().unwrap();
    assert!(chunk.is_last());
    match chunk {
        StreamChunk::TaskChunk { task, .. } => {
            assert_eq!(task.status.state, TaskState::Completed);
        }
        _ => panic!("expected a TaskChunk"),
    }
}

/// Agent with native streaming: yields two snapshots before completing.
struct NativeStreamingAgent;

#[async_trait]
impl AgentExecutor for NativeStreamingAgent {
    async fn handle_message(&self, message: Message) -> A2AResult<Message> {
        Ok(message.reply(MessageRole::Agent, message.content.clone()))
    }

    async fn handle_task(&self, mut task: Task) -> A2AResult<Task> {
        task.status = TaskStatus::new(TaskState::Completed);
        Ok(task)
    }

    async fn tasks_send_subscribe(
        &self,
        task: Task,
    ) -> A2AResult<Option<futures::stream::BoxStream<'static, A2AResult<StreamChunk>>>> {
        let mut working = task.clone();
        working.status = TaskStatus::new(TaskState::Waiting);

        let mut done = task;
        done.artifacts.push(Artifact::text("streamed"));
        done.status = TaskStatus::new(TaskState::Completed);

        let chunks = vec![
            Ok(StreamChunk::TaskChunk {
                task: working,
                index: 0,
                append: false,
                last_chunk: Some(false),
            }),
            Ok(StreamChunk::TaskChunk {
                task: done,
                index: 1,
                append: true,
                last_chunk: Some(true),
            }),
        ];
        Ok(Some(Box::pin(futures::stream::iter(chunks))))
    }
}

#[tokio::test]
async fn stream_task_with_native_streaming_yields_all_chunks() {
    let handler = make_handler(Arc::new(NativeStreamingAgent));
    let task = make_task("session-1");
    let id = task.id.clone();

    let stream = handler.on_stream_task(task).await.unwrap();
    let chunks: Vec<_> = stream.collect().await;

    assert_eq!(chunks.len(), 2);
    assert!(!chunks[0].as_ref().unwrap().is_last());
    assert!(chunks[1].as_ref().unwrap().is_last());

    // The handler persists each TaskChunk snapshot as it streams.
    let fetched = handler.on_get_task(&id, None).await.unwrap();
    assert_eq!(fetched.status.state, TaskState::Completed);
}
