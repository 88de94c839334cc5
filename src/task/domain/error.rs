//! Error types for task domain validation and parsing.

use super::{TaskId, TaskStatus};
use thiserror::Error;

/// Errors returned while constructing or mutating task domain values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TaskDomainError {
    /// The title is shorter than 3 or longer than 200 characters once trimmed.
    #[error("task title must be between 3 and 200 characters")]
    InvalidTitle,

    /// The deadline lies before the creation time.
    #[error("deadline cannot be in the past")]
    DeadlineInPast,

    /// The budget is negative, malformed or has more than two decimals.
    #[error("invalid budget amount '{0}'")]
    InvalidBudget(String),

    /// The comment text is empty after trimming.
    #[error("comment text must not be empty")]
    EmptyComment,

    /// The proposed executor is the task owner.
    #[error("owner cannot be the executor of their own task {task_id}")]
    InvalidAssignment {
        /// Task the assignment targeted.
        task_id: TaskId,
    },

    /// The task has reached a terminal status and can no longer change.
    #[error("task {task_id} is already {status} and cannot change")]
    TaskFinished {
        /// Task the mutation targeted.
        task_id: TaskId,
        /// Terminal status the task is in.
        status: TaskStatus,
    },
}

/// Error returned while parsing task statuses.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown task status: {0}")]
pub struct ParseTaskStatusError(pub String);

/// Error returned while parsing task priorities.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown task priority: {0}")]
pub struct ParsePriorityError(pub String);

/// Error returned while parsing currency codes.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unsupported currency: {0}")]
pub struct ParseCurrencyError(pub String);
