//! Repository port for task and comment persistence.

use crate::task::domain::{Comment, Task, TaskId, TaskQuery};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for task repository operations.
pub type TaskRepositoryResult<T> = Result<T, TaskRepositoryError>;

/// Task persistence contract.
#[async_trait]
pub trait TaskRepository: Send + Sync {
    /// Stores a new task.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRepositoryError::DuplicateTask`] when the task ID already
    /// exists.
    async fn store_task(&self, task: &Task) -> TaskRepositoryResult<()>;

    /// Persists executor, status and timestamp changes to an existing task.
    ///
    /// Single-row last-write-wins; no revision check is performed.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRepositoryError::NotFound`] when the task does not exist.
    async fn update_task(&self, task: &Task) -> TaskRepositoryResult<()>;

    /// Finds a task by identifier.
    ///
    /// Returns `None` when the task does not exist.
    async fn find_task(&self, id: TaskId) -> TaskRepositoryResult<Option<Task>>;

    /// Returns the tasks matching `query`, newest first, windowed by its page.
    ///
    /// Implementations must apply the visibility scope and filters inside the
    /// store rather than rejecting rows afterwards.
    async fn query_tasks(&self, query: &TaskQuery) -> TaskRepositoryResult<Vec<Task>>;

    /// Appends a comment.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRepositoryError::NotFound`] when the parent task does not
    /// exist.
    async fn store_comment(&self, comment: &Comment) -> TaskRepositoryResult<()>;

    /// Returns a task's comments, oldest first.
    async fn list_comments(&self, task_id: TaskId) -> TaskRepositoryResult<Vec<Comment>>;
}

/// Errors returned by task repository implementations.
#[derive(Debug, Clone, Error)]
pub enum TaskRepositoryError {
    /// A task with the same identifier already exists.
    #[error("duplicate task identifier: {0}")]
    DuplicateTask(TaskId),

    /// The task was not found.
    #[error("task not found: {0}")]
    NotFound(TaskId),

    /// Persisted data could not be reconstructed into domain types.
    #[error("invalid persisted data: {0}")]
    InvalidPersistedData(Arc<dyn std::error::Error + Send + Sync>),

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl TaskRepositoryError {
    /// Wraps a data-quality or deserialization error from persisted rows.
    pub fn invalid_persisted_data(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::InvalidPersistedData(Arc::new(err))
    }

    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}
