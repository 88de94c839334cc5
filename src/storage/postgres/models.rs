//! Diesel row models.

use super::schema::{accounts, comments, departments, tasks};
use chrono::{DateTime, Utc};
use diesel::prelude::*;

/// Department row.
#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = departments)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct DepartmentRow {
    /// Department identifier.
    pub id: uuid::Uuid,
    /// Unique display name.
    pub name: String,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

/// Account row.
#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = accounts)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct AccountRow {
    /// Account identifier.
    pub id: uuid::Uuid,
    /// Login email.
    pub email: String,
    /// Salted password digest.
    pub password_hash: String,
    /// Display name.
    pub full_name: String,
    /// Role name.
    pub role: String,
    /// Home department.
    pub department_id: Option<uuid::Uuid>,
    /// Active flag.
    pub is_active: bool,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

/// Query result row for task records.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = tasks)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct TaskRow {
    /// Task identifier.
    pub id: uuid::Uuid,
    /// Title.
    pub title: String,
    /// Description.
    pub description: Option<String>,
    /// Owner.
    pub owner_id: uuid::Uuid,
    /// Executor.
    pub executor_id: Option<uuid::Uuid>,
    /// Target department.
    pub target_dept_id: Option<uuid::Uuid>,
    /// Lifecycle status.
    pub status: String,
    /// Priority.
    pub priority: String,
    /// Deadline.
    pub deadline: Option<DateTime<Utc>>,
    /// Budget in minor units.
    pub budget_minor: i64,
    /// Currency code.
    pub currency: String,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Insert model for task records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = tasks)]
pub struct NewTaskRow {
    /// Task identifier.
    pub id: uuid::Uuid,
    /// Title.
    pub title: String,
    /// Description.
    pub description: Option<String>,
    /// Owner.
    pub owner_id: uuid::Uuid,
    /// Executor.
    pub executor_id: Option<uuid::Uuid>,
    /// Target department.
    pub target_dept_id: Option<uuid::Uuid>,
    /// Lifecycle status.
    pub status: String,
    /// Priority.
    pub priority: String,
    /// Deadline.
    pub deadline: Option<DateTime<Utc>>,
    /// Budget in minor units.
    pub budget_minor: i64,
    /// Currency code.
    pub currency: String,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Comment row.
#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = comments)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct CommentRow {
    /// Comment identifier.
    pub id: uuid::Uuid,
    /// Parent task.
    pub task_id: uuid::Uuid,
    /// Author.
    pub author_id: uuid::Uuid,
    /// Body.
    pub text: String,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}
