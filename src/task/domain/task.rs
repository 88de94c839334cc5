//! Task aggregate root and its lifecycle transitions.

use super::{Budget, Priority, TaskDomainError, TaskId, TaskStatus, TaskTitle};
use crate::directory::domain::{AccountId, DepartmentId};
use chrono::{DateTime, SubsecRound, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};

/// Validated fields for a new task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTask {
    /// Task title.
    pub title: TaskTitle,
    /// Optional free-form description.
    pub description: Option<String>,
    /// Creating account; immutable afterwards.
    pub owner_id: AccountId,
    /// Department the task is routed to.
    pub target_dept_id: Option<DepartmentId>,
    /// Urgency.
    pub priority: Priority,
    /// Optional due date.
    pub deadline: Option<DateTime<Utc>>,
    /// Monetary budget.
    pub budget: Budget,
}

/// Task aggregate root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    id: TaskId,
    title: TaskTitle,
    description: Option<String>,
    owner_id: AccountId,
    executor_id: Option<AccountId>,
    target_dept_id: Option<DepartmentId>,
    status: TaskStatus,
    priority: Priority,
    deadline: Option<DateTime<Utc>>,
    budget: Budget,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// Parameter object for reconstructing a persisted task aggregate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedTaskData {
    /// Persisted task identifier.
    pub id: TaskId,
    /// Persisted title.
    pub title: TaskTitle,
    /// Persisted description.
    pub description: Option<String>,
    /// Persisted owner.
    pub owner_id: AccountId,
    /// Persisted executor, if assigned.
    pub executor_id: Option<AccountId>,
    /// Persisted target department.
    pub target_dept_id: Option<DepartmentId>,
    /// Persisted lifecycle status.
    pub status: TaskStatus,
    /// Persisted priority.
    pub priority: Priority,
    /// Persisted deadline.
    pub deadline: Option<DateTime<Utc>>,
    /// Persisted budget.
    pub budget: Budget,
    /// Persisted creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Persisted latest mutation timestamp.
    pub updated_at: DateTime<Utc>,
}

impl Task {
    /// Creates a task in [`TaskStatus::New`].
    ///
    /// Deadlines are truncated to microseconds, the precision storage keeps,
    /// and compared in UTC against the clock.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::DeadlineInPast`] when the deadline precedes
    /// the creation time.
    pub fn create(fields: NewTask, clock: &impl Clock) -> Result<Self, TaskDomainError> {
        let timestamp = clock.utc();
        let deadline = fields.deadline.map(|instant| instant.trunc_subsecs(6));
        if deadline.is_some_and(|instant| instant < timestamp.trunc_subsecs(6)) {
            return Err(TaskDomainError::DeadlineInPast);
        }
        let description = fields
            .description
            .map(|text| text.trim().to_owned())
            .filter(|text| !text.is_empty());

        Ok(Self {
            id: TaskId::new(),
            title: fields.title,
            description,
            owner_id: fields.owner_id,
            executor_id: None,
            target_dept_id: fields.target_dept_id,
            status: TaskStatus::New,
            priority: fields.priority,
            deadline,
            budget: fields.budget,
            created_at: timestamp,
            updated_at: timestamp,
        })
    }

    /// Reconstructs a task from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedTaskData) -> Self {
        Self {
            id: data.id,
            title: data.title,
            description: data.description,
            owner_id: data.owner_id,
            executor_id: data.executor_id,
            target_dept_id: data.target_dept_id,
            status: data.status,
            priority: data.priority,
            deadline: data.deadline,
            budget: data.budget,
            created_at: data.created_at,
            updated_at: data.updated_at,
        }
    }

    /// Returns the task identifier.
    #[must_use]
    pub const fn id(&self) -> TaskId {
        self.id
    }

    /// Returns the title.
    #[must_use]
    pub const fn title(&self) -> &TaskTitle {
        &self.title
    }

    /// Returns the description, if any.
    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Returns the owning account.
    #[must_use]
    pub const fn owner_id(&self) -> AccountId {
        self.owner_id
    }

    /// Returns the assigned executor, if any.
    #[must_use]
    pub const fn executor_id(&self) -> Option<AccountId> {
        self.executor_id
    }

    /// Returns the target department, if any.
    #[must_use]
    pub const fn target_dept_id(&self) -> Option<DepartmentId> {
        self.target_dept_id
    }

    /// Returns the lifecycle status.
    #[must_use]
    pub const fn status(&self) -> TaskStatus {
        self.status
    }

    /// Returns the priority.
    #[must_use]
    pub const fn priority(&self) -> Priority {
        self.priority
    }

    /// Returns the deadline, if any.
    #[must_use]
    pub const fn deadline(&self) -> Option<DateTime<Utc>> {
        self.deadline
    }

    /// Returns the budget.
    #[must_use]
    pub const fn budget(&self) -> Budget {
        self.budget
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the latest mutation timestamp.
    #[must_use]
    pub const fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Assigns an executor and moves the task to [`TaskStatus::InProgress`],
    /// whatever non-terminal status it was in.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::InvalidAssignment`] when `candidate` is the
    /// owner (checked first, for every task), then
    /// [`TaskDomainError::TaskFinished`] when the task is terminal.
    pub fn assign_executor(
        &mut self,
        candidate: AccountId,
        clock: &impl Clock,
    ) -> Result<(), TaskDomainError> {
        if candidate == self.owner_id {
            return Err(TaskDomainError::InvalidAssignment { task_id: self.id });
        }
        self.ensure_not_finished()?;
        self.executor_id = Some(candidate);
        self.status = TaskStatus::InProgress;
        self.touch(clock);
        Ok(())
    }

    /// Sets the status. Any non-terminal status may move to any status.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::TaskFinished`] when the task is already
    /// terminal, even if `new_status` equals the current status.
    pub fn update_status(
        &mut self,
        new_status: TaskStatus,
        clock: &impl Clock,
    ) -> Result<(), TaskDomainError> {
        self.ensure_not_finished()?;
        self.status = new_status;
        self.touch(clock);
        Ok(())
    }

    const fn ensure_not_finished(&self) -> Result<(), TaskDomainError> {
        if self.status.is_terminal() {
            return Err(TaskDomainError::TaskFinished {
                task_id: self.id,
                status: self.status,
            });
        }
        Ok(())
    }

    /// Advances `updated_at`, never moving it backwards.
    fn touch(&mut self, clock: &impl Clock) {
        self.updated_at = clock.utc().max(self.updated_at);
    }
}
