//! Domain model for tasks, comments and task visibility.
//!
//! Tasks are value-like aggregates: services load a copy, apply a
//! lifecycle method and hand the updated copy back to storage.

mod budget;
mod comment;
mod error;
mod ids;
mod status;
mod task;
mod title;
mod visibility;

pub use budget::{Budget, Currency};
pub use comment::{Comment, CommentText};
pub use error::{ParseCurrencyError, ParsePriorityError, ParseTaskStatusError, TaskDomainError};
pub use ids::{CommentId, TaskId};
pub use status::{Priority, TaskStatus};
pub use task::{NewTask, PersistedTaskData, Task};
pub use title::TaskTitle;
pub use visibility::{Page, TaskFilter, TaskQuery, VisibilityScope, newest_first};
