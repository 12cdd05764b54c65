//! Utility functions for creating A2A Task objects.

use crate::error::{A2AError, A2AResult};
use crate::types::{Artifact, Task, TaskState, TaskStatus};
use serde_json::Value;

/// Creates a new Task object from an initial request message (as its wire
/// JSON form — `Task::message` is untyped, see [`crate::types::Task`]).
///
/// Generates a task id if `session_id` is not provided.
///
/// # Example
///
/// ```
/// use a2a_rs::utils::new_task;
/// use serde_json::json;
///
/// let task = new_task("session-1", json!({"type": "text", "text": "Hello"})).unwrap();
/// assert_eq!(task.status.state, a2a_rs::types::TaskState::Submitted);
/// ```
pub fn new_task(session_id: impl Into<String>, message: Value) -> A2AResult<Task> {
    if message.is_null() {
        return Err(A2AError::invalid_params("task message cannot be null"));
    }

    let mut task = Task::new(session_id);
    task.message = Some(message);
    Ok(task)
}

/// Creates a Task object in the 'completed' state.
///
/// Useful for constructing a final Task representation when the agent
/// finishes and produces artifacts.
///
/// # Example
///
/// ```
/// use a2a_rs::utils::{completed_task, new_text_artifact};
///
/// let artifact = new_text_artifact("Task complete");
/// let task = completed_task("task-123", "ctx-456", vec![artifact]).unwrap();
/// assert_eq!(task.status.state, a2a_rs::types::TaskState::Completed);
/// ```
pub fn completed_task(
    task_id: impl Into<String>,
    session_id: impl Into<String>,
    artifacts: Vec<Artifact>,
) -> A2AResult<Task> {
    if artifacts.is_empty() {
        return Err(A2AError::invalid_params(
            "artifacts must be a non-empty list of Artifact objects",
        ));
    }

    Ok(Task {
        id: task_id.into(),
        session_id: session_id.into(),
        status: TaskStatus::new(TaskState::Completed),
        message: None,
        history: Vec::new(),
        artifacts,
        metadata: serde_json::Map::new(),
    })
}

/// Truncates `task.history` to at most `history_length` entries, keeping the
/// most recent ones. A `None` or zero length leaves history untouched.
///
/// # Example
///
/// ```
/// use a2a_rs::types::Task;
/// use a2a_rs::utils::apply_history_length;
/// use serde_json::json;
///
/// let mut task = Task::new("session-1");
/// task.history = (0..10).map(|i| json!({"message_id": format!("msg-{i}")})).collect();
///
/// let limited = apply_history_length(task, Some(5));
/// assert_eq!(limited.history.len(), 5);
/// assert_eq!(limited.history[0]["message_id"], "msg-5");
/// ```
pub fn apply_history_length(mut task: Task, history_length: Option<usize>) -> Task {
    if let Some(length) = history_length {
        if length > 0 && task.history.len() > length {
            let total = task.history.len();
            task.history = task.history.split_off(total - length);
        }
    }
    task
}
