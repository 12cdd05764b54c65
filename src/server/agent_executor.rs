//! Agent executor trait — the core integration point for agent logic.
//!
//! An agent adapter is polymorphic over a capability set: every adapter must
//! handle plain messages and whole tasks; streaming is optional. The default
//! message-to-task bridge lets an adapter that only implements
//! [`AgentExecutor::handle_message`] still serve `tasks/send`.

use async_trait::async_trait;
use futures::stream::BoxStream;

use crate::error::A2AResult;
use crate::types::{Artifact, Content, Message, StreamChunk, Task, TaskState, TaskStatus};

/// Core trait for agent execution logic.
///
/// Implement this to define an agent's behavior. `handle_message` and
/// `handle_task` are mandatory; `stream_response` and `tasks_send_subscribe`
/// are optional and default to unsupported (`None`).
#[async_trait]
pub trait AgentExecutor: Send + Sync {
    /// Produce a reply to a single message.
    ///
    /// The reply must carry `parent_message_id = message.message_id` and the
    /// same `conversation_id`. A failure is reported as `Content::Error`
    /// rather than propagated as a transport error.
    async fn handle_message(&self, message: Message) -> A2AResult<Message>;

    /// Run a task to completion (or to a pause state) and return it updated.
    ///
    /// The returned task must carry a terminal `status.state` on success and
    /// at least one artifact.
    async fn handle_task(&self, task: Task) -> A2AResult<Task>;

    /// Optional: stream a reply to `message` as it is produced.
    ///
    /// Returns `None` if the adapter does not support streaming responses.
    async fn stream_response(
        &self,
        _message: Message,
    ) -> A2AResult<Option<BoxStream<'static, A2AResult<StreamChunk>>>> {
        Ok(None)
    }

    /// Optional: stream task snapshots as `task` progresses.
    ///
    /// Returns `None` if the adapter does not support task streaming; the
    /// caller should fall back to [`AgentExecutor::handle_task`] and emit a
    /// single final chunk.
    async fn tasks_send_subscribe(
        &self,
        _task: Task,
    ) -> A2AResult<Option<BoxStream<'static, A2AResult<StreamChunk>>>> {
        Ok(None)
    }

    /// Request cancellation of a task in progress.
    ///
    /// Default implementation is a no-op; adapters that track cancellation
    /// tokens should override this.
    async fn cancel(&self, _task_id: &str) -> A2AResult<()> {
        Ok(())
    }
}

/// Default message-to-task bridge used when an adapter only implements
/// [`AgentExecutor::handle_message`].
///
/// Packs the reply's content into a single artifact, marks the task
/// `completed`, and returns it.
pub async fn bridge_message_to_task(
    executor: &dyn AgentExecutor,
    mut task: Task,
    message: Message,
) -> A2AResult<Task> {
    match executor.handle_message(message).await {
        Ok(reply) => {
            let artifact = match &reply.content {
                Content::Text { .. } | Content::FunctionCall { .. } | Content::FunctionResponse { .. } => {
                    Artifact {
                        artifact_type: Some(reply.content.kind().to_string()),
                        role: Some(reply.role.to_string()),
                        parts: vec![crate::types::Part::from_content(&reply.content)],
                        extra: Default::default(),
                    }
                }
                Content::Error { message } => {
                    task.status = TaskStatus::with_message(
                        TaskState::Failed,
                        serde_json::json!({ "error": message }),
                    );
                    return Ok(task);
                }
            };
            task.artifacts.push(artifact);
            task.status = TaskStatus::new(TaskState::Completed);
            Ok(task)
        }
        Err(e) => {
            task.status = TaskStatus::with_message(
                TaskState::Failed,
                serde_json::json!({ "error": e.to_string() }),
            );
            Ok(task)
        }
    }
}
