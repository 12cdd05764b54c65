//! Request handler — coordinates agent execution, task storage, and streaming.
//!
//! The [`RequestHandler`] trait defines the interface the axum integration layer
//! dispatches each JSON-RPC method to. [`DefaultRequestHandler`] wires together
//! an [`AgentExecutor`] and a [`TaskStore`].

use std::sync::Arc;

use async_stream::stream;
use async_trait::async_trait;
use futures::stream::{self, BoxStream, StreamExt};
use tracing::{debug, warn};

use crate::error::{A2AError, A2AResult};
use crate::types::{StreamChunk, Task, TaskState, TaskStatus};

use super::agent_executor::AgentExecutor;
use super::event_queue::{EventConsumer, EventQueue};
use super::task_store::TaskStore;

/// Channel capacity for the per-stream bridging queue (see [`DefaultRequestHandler::on_stream_task`]).
const STREAM_BRIDGE_CAPACITY: usize = 256;

/// Trait for handling A2A JSON-RPC requests.
///
/// Each method corresponds to one of the task-engine operations in the
/// protocol: `tasks/send`, `tasks/get`, `tasks/cancel`,
/// `tasks/stream`/`tasks/sendSubscribe`.
#[async_trait]
pub trait RequestHandler: Send + Sync {
    /// Handle `tasks/send` — create or overwrite a task, run it to completion
    /// (or a pause state), persist the result, and return it.
    async fn on_send_task(&self, task: Task) -> A2AResult<Task>;

    /// Handle `tasks/get` — return the stored task, truncating `history` to
    /// the last `history_length` entries if given.
    async fn on_get_task(&self, id: &str, history_length: Option<usize>) -> A2AResult<Task>;

    /// Handle `tasks/cancel` — transition a non-terminal task to `canceled`.
    /// Idempotent: canceling a task already in any terminal state
    /// (`completed`, `canceled`, `failed`) is a no-op that returns it unchanged.
    async fn on_cancel_task(&self, id: &str) -> A2AResult<Task>;

    /// Handle `tasks/stream` (alias `tasks/sendSubscribe`) — run the task,
    /// streaming snapshots as it progresses. The final element has a
    /// terminal `status.state`.
    async fn on_stream_task(
        &self,
        task: Task,
    ) -> A2AResult<BoxStream<'static, A2AResult<StreamChunk>>>;
}

/// Default request handler — wires an [`AgentExecutor`] to a [`TaskStore`].
pub struct DefaultRequestHandler {
    executor: Arc<dyn AgentExecutor>,
    task_store: Arc<dyn TaskStore>,
}

impl DefaultRequestHandler {
    pub fn new(executor: Arc<dyn AgentExecutor>, task_store: Arc<dyn TaskStore>) -> Self {
        Self {
            executor,
            task_store,
        }
    }

    fn trim_history(task: &mut Task, max_length: Option<usize>) {
        if let Some(max) = max_length {
            if task.history.len() > max {
                let start = task.history.len() - max;
                task.history = task.history.split_off(start);
            }
        }
    }
}

#[async_trait]
impl RequestHandler for DefaultRequestHandler {
    async fn on_send_task(&self, task: Task) -> A2AResult<Task> {
        self.task_store.save(task.clone()).await?;
        debug!(task_id = %task.id, "Dispatching task to adapter");

        let result = self.executor.handle_task(task).await?;
        self.task_store.save(result.clone()).await?;
        Ok(result)
    }

    async fn on_get_task(&self, id: &str, history_length: Option<usize>) -> A2AResult<Task> {
        let mut task = self
            .task_store
            .get(id)
            .await?
            .ok_or_else(|| A2AError::TaskNotFound {
                message: id.to_string(),
                data: None,
            })?;
        Self::trim_history(&mut task, history_length);
        Ok(task)
    }

    async fn on_cancel_task(&self, id: &str) -> A2AResult<Task> {
        let mut task = self
            .task_store
            .get(id)
            .await?
            .ok_or_else(|| A2AError::TaskNotFound {
                message: id.to_string(),
                data: None,
            })?;

        if task.status.state.is_terminal() {
            return Ok(task);
        }

        self.executor.cancel(id).await?;
        task.status = TaskStatus::new(TaskState::Canceled);
        self.task_store.save(task.clone()).await?;
        Ok(task)
    }

    /// Handle `tasks/stream`/`tasks/sendSubscribe`.
    ///
    /// When the adapter produces its own stream, a dedicated background task
    /// drains it and enqueues each chunk onto a bounded [`EventQueue`]; this
    /// method's returned stream drains that queue via an [`EventConsumer`].
    /// The queue's bounded capacity is what applies backpressure to the
    /// producer when the HTTP writer falls behind.
    async fn on_stream_task(
        &self,
        task: Task,
    ) -> A2AResult<BoxStream<'static, A2AResult<StreamChunk>>> {
        self.task_store.save(task.clone()).await?;

        if let Some(inner) = self.executor.tasks_send_subscribe(task.clone()).await? {
            let task_store = Arc::clone(&self.task_store);
            let queue = EventQueue::new(STREAM_BRIDGE_CAPACITY);
            let mut consumer = EventConsumer::new(queue.clone());
            let exception = consumer.exception_handle();

            tokio::spawn(async move {
                let mut inner = inner;
                while let Some(chunk_result) = inner.next().await {
                    match chunk_result {
                        Ok(chunk) => {
                            if let StreamChunk::TaskChunk { ref task, .. } = chunk {
                                let _ = task_store.save(task.clone()).await;
                            }
                            let is_last = chunk.is_last();
                            let _ = queue.enqueue_event(chunk).await;
                            if is_last {
                                break;
                            }
                        }
                        Err(e) => {
                            warn!("adapter stream failed: {e}");
                            *exception.lock().await = Some(e);
                            break;
                        }
                    }
                }
                queue.close().await;
            });

            let bridged = stream! {
                while let Some(chunk) = consumer.next_event().await {
                    yield Ok(chunk);
                }
                if let Some(e) = consumer.exception_handle().lock().await.take() {
                    yield Err(e);
                }
            };
            return Ok(Box::pin(bridged));
        }

        // No native streaming support — fall back to one final chunk.
        let final_task = self.executor.handle_task(task).await?;
        self.task_store.save(final_task.clone()).await?;
        let chunk = StreamChunk::TaskChunk {
            task: final_task,
            index: 0,
            append: true,
            last_chunk: Some(true),
        };
        Ok(Box::pin(stream::once(async move { Ok(chunk) })))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::server::task_store::InMemoryTaskStore;
    use crate::types::{Artifact, Message, MessageRole};
    use async_trait::async_trait;

    struct EchoExecutor;

    #[async_trait]
    impl AgentExecutor for EchoExecutor {
        async fn handle_message(&self, message: Message) -> A2AResult<Message> {
            Ok(message.reply(MessageRole::Agent, message.content.clone()))
        }

        async fn handle_task(&self, mut task: Task) -> A2AResult<Task> {
            task.artifacts.push(Artifact::text("echoed"));
            task.status = TaskStatus::new(TaskState::Completed);
            Ok(task)
        }
    }

    #[tokio::test]
    async fn send_task_completes() {
        let handler = DefaultRequestHandler::new(
            Arc::new(EchoExecutor),
            Arc::new(InMemoryTaskStore::new()),
        );
        let task = Task::new("session-1");
        let id = task.id.clone();
        let result = handler.on_send_task(task).await.unwrap();
        assert_eq!(result.status.state, TaskState::Completed);

        let fetched = handler.on_get_task(&id, None).await.unwrap();
        assert_eq!(fetched.status.state, TaskState::Completed);
    }

    #[tokio::test]
    async fn cancel_is_idempotent() {
        let handler = DefaultRequestHandler::new(
            Arc::new(EchoExecutor),
            Arc::new(InMemoryTaskStore::new()),
        );
        let task = Task::new("session-1");
        let id = task.id.clone();
        handler.task_store.save(task).await.unwrap();

        let canceled = handler.on_cancel_task(&id).await.unwrap();
        assert_eq!(canceled.status.state, TaskState::Canceled);

        let canceled_again = handler.on_cancel_task(&id).await.unwrap();
        assert_eq!(canceled_again.status.state, TaskState::Canceled);
    }

    #[tokio::test]
    async fn cancel_unknown_task_not_found() {
        let handler = DefaultRequestHandler::new(
            Arc::new(EchoExecutor),
            Arc::new(InMemoryTaskStore::new()),
        );
        let err = handler.on_cancel_task("missing").await.unwrap_err();
        assert!(matches!(err, A2AError::TaskNotFound { .. }));
    }

    struct NativeStreamingExecutor;

    #[async_trait]
    impl AgentExecutor for NativeStreamingExecutor {
        async fn handle_message(&self, message: Message) -> A2AResult<Message> {
            Ok(message.reply(MessageRole::Agent, message.content.clone()))
        }

        async fn handle_task(&self, task: Task) -> A2AResult<Task> {
            Ok(task)
        }

        async fn tasks_send_subscribe(
            &self,
            task: Task,
        ) -> A2AResult<Option<BoxStream<'static, A2AResult<StreamChunk>>>> {
            let chunks: Vec<A2AResult<StreamChunk>> = (0..3)
                .map(|i| {
                    let mut snapshot = task.clone();
                    snapshot.status = if i == 2 {
                        TaskStatus::new(TaskState::Completed)
                    } else {
                        TaskStatus::new(TaskState::Submitted)
                    };
                    Ok(StreamChunk::TaskChunk {
                        task: snapshot,
                        index: i,
                        append: true,
                        last_chunk: Some(i == 2),
                    })
                })
                .collect();
            Ok(Some(Box::pin(stream::iter(chunks))))
        }
    }

    #[tokio::test]
    async fn stream_task_bridges_native_stream_through_event_queue() {
        let handler = DefaultRequestHandler::new(
            Arc::new(NativeStreamingExecutor),
            Arc::new(InMemoryTaskStore::new()),
        );
        let task = Task::new("session-1");
        let id = task.id.clone();

        let mut stream = handler.on_stream_task(task).await.unwrap();
        let mut seen = Vec::new();
        while let Some(result) = stream.next().await {
            seen.push(result.unwrap());
        }

        assert_eq!(seen.len(), 3);
        assert!(seen.last().unwrap().is_last());

        let stored = handler.on_get_task(&id, None).await.unwrap();
        assert_eq!(stored.status.state, TaskState::Completed);
    }

    struct FailingStreamExecutor;

    #[async_trait]
    impl AgentExecutor for FailingStreamExecutor {
        async fn handle_message(&self, message: Message) -> A2AResult<Message> {
            Ok(message.reply(MessageRole::Agent, message.content.clone()))
        }

        async fn handle_task(&self, task: Task) -> A2AResult<Task> {
            Ok(task)
        }

        async fn tasks_send_subscribe(
            &self,
            _task: Task,
        ) -> A2AResult<Option<BoxStream<'static, A2AResult<StreamChunk>>>> {
            let chunks: Vec<A2AResult<StreamChunk>> =
                vec![Err(A2AError::internal_error("adapter exploded"))];
            Ok(Some(Box::pin(stream::iter(chunks))))
        }
    }

    #[tokio::test]
    async fn stream_task_surfaces_adapter_error_via_exception_handle() {
        let handler = DefaultRequestHandler::new(
            Arc::new(FailingStreamExecutor),
            Arc::new(InMemoryTaskStore::new()),
        );
        let task = Task::new("session-1");

        let mut stream = handler.on_stream_task(task).await.unwrap();
        let result = stream.next().await.unwrap();
        assert!(result.is_err());
        assert!(stream.next().await.is_none());
    }
}
