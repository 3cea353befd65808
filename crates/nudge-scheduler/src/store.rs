//! Store seam: the engine's narrow view of durable persistence.

use async_trait::async_trait;
use chrono::NaiveDateTime;
use thiserror::Error;

use crate::types::{NewTask, Task, TaskId};

/// Persistence failure surfaced by a task store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The underlying database rejected the operation.
    #[error("database error: {0}")]
    Database(String),

    /// A stored row could not be decoded back into a task.
    #[error("corrupt record: {0}")]
    Corrupt(String),
}

/// Durable home of pending tasks.
///
/// `delete` is idempotent: removing an id that is already gone succeeds. The
/// scan relies on this to tolerate a crash (or a slow duplicate cycle)
/// between dispatch and delete.
#[async_trait]
pub trait TaskStore: Send + Sync {
    /// Persist a new task, returning it with its store-assigned id.
    async fn save(&self, task: NewTask) -> Result<Task, StoreError>;

    /// All tasks with `due_at` at or before `cutoff`, oldest first.
    async fn find_due(&self, cutoff: NaiveDateTime) -> Result<Vec<Task>, StoreError>;

    /// Remove a task. Unknown ids are a no-op success.
    async fn delete(&self, id: TaskId) -> Result<(), StoreError>;
}
