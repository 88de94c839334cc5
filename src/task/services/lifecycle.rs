//! Service layer for task creation, listing, lifecycle transitions and
//! comments.
//!
//! Every operation loads fresh state from the store and rechecks the acting
//! account's visibility before touching a task. All checks complete before
//! the single write an operation performs.

use crate::directory::{
    domain::{AccessError, Account, AccountId, DepartmentId, require_admin},
    ports::{AccountRepository, DepartmentRepository, DirectoryRepositoryError},
};
use crate::task::{
    domain::{
        Budget, Comment, CommentText, Currency, NewTask, Page, Priority, Task, TaskDomainError,
        TaskFilter, TaskId, TaskQuery, TaskStatus, TaskTitle, VisibilityScope,
    },
    ports::{TaskRepository, TaskRepositoryError},
};
use chrono::{DateTime, Utc};
use mockable::Clock;
use std::sync::Arc;
use thiserror::Error;
use tracing::{info, warn};

/// Request payload for creating a task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateTaskRequest {
    title: String,
    description: Option<String>,
    priority: Priority,
    target_dept_id: Option<DepartmentId>,
    deadline: Option<DateTime<Utc>>,
    budget: Option<String>,
    currency: Currency,
    executor_id: Option<AccountId>,
}

impl CreateTaskRequest {
    /// Creates a request with the required title.
    #[must_use]
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: None,
            priority: Priority::default(),
            target_dept_id: None,
            deadline: None,
            budget: None,
            currency: Currency::default(),
            executor_id: None,
        }
    }

    /// Sets the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Sets the priority.
    #[must_use]
    pub const fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = priority;
        self
    }

    /// Routes the task to a department other than the creator's own.
    #[must_use]
    pub const fn with_target_department(mut self, department_id: DepartmentId) -> Self {
        self.target_dept_id = Some(department_id);
        self
    }

    /// Sets the deadline.
    #[must_use]
    pub const fn with_deadline(mut self, deadline: DateTime<Utc>) -> Self {
        self.deadline = Some(deadline);
        self
    }

    /// Sets the budget as a decimal amount such as `"1500.50"`.
    #[must_use]
    pub fn with_budget(mut self, amount: impl Into<String>, currency: Currency) -> Self {
        self.budget = Some(amount.into());
        self.currency = currency;
        self
    }

    /// Assigns an executor as part of creation.
    #[must_use]
    pub const fn with_executor(mut self, executor_id: AccountId) -> Self {
        self.executor_id = Some(executor_id);
        self
    }
}

/// Service-level errors for task operations.
#[derive(Debug, Error)]
pub enum TaskLifecycleError {
    /// Domain validation or a lifecycle guard failed.
    #[error(transparent)]
    Domain(#[from] TaskDomainError),
    /// The acting account may not perform the operation.
    #[error(transparent)]
    Access(#[from] AccessError),
    /// Task repository operation failed.
    #[error(transparent)]
    Repository(#[from] TaskRepositoryError),
    /// Account or department lookup failed.
    #[error(transparent)]
    Directory(#[from] DirectoryRepositoryError),
    /// A referenced department does not exist.
    #[error("department {0} does not exist")]
    UnknownDepartment(DepartmentId),
    /// A referenced account does not exist.
    #[error("account {0} does not exist")]
    UnknownAccount(AccountId),
}

/// Result type for task lifecycle service operations.
pub type TaskLifecycleResult<T> = Result<T, TaskLifecycleError>;

/// Task lifecycle orchestration service.
#[derive(Clone)]
pub struct TaskLifecycleService<S, C>
where
    S: TaskRepository + AccountRepository + DepartmentRepository,
    C: Clock + Send + Sync,
{
    store: Arc<S>,
    clock: Arc<C>,
}

impl<S, C> TaskLifecycleService<S, C>
where
    S: TaskRepository + AccountRepository + DepartmentRepository,
    C: Clock + Send + Sync,
{
    /// Creates a new task lifecycle service.
    #[must_use]
    pub const fn new(store: Arc<S>, clock: Arc<C>) -> Self {
        Self { store, clock }
    }

    /// Creates a task owned by `actor`.
    ///
    /// The target department defaults to the actor's own department. When an
    /// executor is supplied it is applied through the regular assignment
    /// transition, so the task starts in progress.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::Domain`] for invalid fields or an owner
    /// executor, [`TaskLifecycleError::UnknownDepartment`] or
    /// [`TaskLifecycleError::UnknownAccount`] for dangling references and
    /// [`TaskLifecycleError::Repository`] when persistence fails.
    pub async fn create_task(
        &self,
        actor: &Account,
        request: CreateTaskRequest,
    ) -> TaskLifecycleResult<Task> {
        let CreateTaskRequest {
            title: raw_title,
            description,
            priority,
            target_dept_id: requested_dept,
            deadline,
            budget: raw_budget,
            currency,
            executor_id,
        } = request;

        let title = TaskTitle::new(raw_title)?;
        let budget = match raw_budget {
            Some(amount) => Budget::parse(&amount, currency)?,
            None => Budget::zero(currency),
        };
        let target_dept_id = requested_dept.or_else(|| actor.department_id());
        if let Some(id) = target_dept_id {
            self.ensure_department(id).await?;
        }

        let mut task = Task::create(
            NewTask {
                title,
                description,
                owner_id: actor.id(),
                target_dept_id,
                priority,
                deadline,
                budget,
            },
            &*self.clock,
        )?;
        if let Some(candidate) = executor_id {
            self.ensure_account(candidate).await?;
            task.assign_executor(candidate, &*self.clock)?;
        }

        self.store.store_task(&task).await?;
        info!(
            task_id = %task.id(),
            owner_id = %task.owner_id(),
            status = %task.status(),
            "task created"
        );
        Ok(task)
    }

    /// Lists the tasks visible to `actor` that match `filter`, newest first.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::Repository`] when the query fails.
    pub async fn list_visible_tasks(
        &self,
        actor: &Account,
        filter: TaskFilter,
        page: Page,
    ) -> TaskLifecycleResult<Vec<Task>> {
        let query = TaskQuery {
            scope: VisibilityScope::for_account(actor),
            filter,
            page,
        };
        Ok(self.store.query_tasks(&query).await?)
    }

    /// Returns a task the actor can see.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::Repository`] with
    /// [`TaskRepositoryError::NotFound`] for a missing task and
    /// [`TaskLifecycleError::Access`] when it is outside the actor's scope.
    pub async fn get_task(&self, actor: &Account, task_id: TaskId) -> TaskLifecycleResult<Task> {
        self.load_visible(actor, task_id, "view this task").await
    }

    /// Assigns `candidate` as executor. Admins and the task owner only.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::Access`] for other callers,
    /// [`TaskLifecycleError::UnknownAccount`] for a missing candidate and
    /// [`TaskLifecycleError::Domain`] when the lifecycle rejects the
    /// assignment.
    pub async fn assign_executor(
        &self,
        actor: &Account,
        task_id: TaskId,
        candidate: AccountId,
    ) -> TaskLifecycleResult<Task> {
        let mut task = self.load(task_id).await?;
        if task.owner_id() != actor.id() {
            require_admin(actor, "assign executors").inspect_err(|denial| {
                warn!(actor_id = %actor.id(), task_id = %task_id, reason = %denial, "assignment denied");
            })?;
        }
        self.ensure_account(candidate).await?;

        let from = task.status();
        task.assign_executor(candidate, &*self.clock)?;
        self.store.update_task(&task).await?;
        info!(
            task_id = %task_id,
            executor_id = %candidate,
            from = %from,
            to = %task.status(),
            "executor assigned"
        );
        Ok(task)
    }

    /// Moves a visible task to `new_status`.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::Access`] when the task is outside the
    /// actor's scope and [`TaskLifecycleError::Domain`] when the task is
    /// already finished.
    pub async fn update_status(
        &self,
        actor: &Account,
        task_id: TaskId,
        new_status: TaskStatus,
    ) -> TaskLifecycleResult<Task> {
        let mut task = self.load_visible(actor, task_id, "update this task").await?;
        let from = task.status();
        task.update_status(new_status, &*self.clock)?;
        self.store.update_task(&task).await?;
        info!(task_id = %task_id, actor_id = %actor.id(), from = %from, to = %new_status, "task status changed");
        Ok(task)
    }

    /// Appends a comment to a visible task, whatever its status.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::Access`] when the task is outside the
    /// actor's scope and [`TaskLifecycleError::Domain`] for blank text.
    pub async fn add_comment(
        &self,
        actor: &Account,
        task_id: TaskId,
        text: &str,
    ) -> TaskLifecycleResult<Comment> {
        let task = self.load_visible(actor, task_id, "comment on this task").await?;
        let body = CommentText::new(text)?;
        let comment = Comment::new(task.id(), actor.id(), body, &*self.clock);
        self.store.store_comment(&comment).await?;
        info!(task_id = %task_id, comment_id = %comment.id(), "comment added");
        Ok(comment)
    }

    /// Returns the comments of a visible task, oldest first.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::Access`] when the task is outside the
    /// actor's scope.
    pub async fn list_comments(
        &self,
        actor: &Account,
        task_id: TaskId,
    ) -> TaskLifecycleResult<Vec<Comment>> {
        self.load_visible(actor, task_id, "read comments on this task")
            .await?;
        Ok(self.store.list_comments(task_id).await?)
    }

    async fn load(&self, task_id: TaskId) -> TaskLifecycleResult<Task> {
        self.store
            .find_task(task_id)
            .await?
            .ok_or_else(|| TaskRepositoryError::NotFound(task_id).into())
    }

    async fn load_visible(
        &self,
        actor: &Account,
        task_id: TaskId,
        action: &'static str,
    ) -> TaskLifecycleResult<Task> {
        let task = self.load(task_id).await?;
        if !VisibilityScope::for_account(actor).admits(&task) {
            warn!(actor_id = %actor.id(), task_id = %task_id, "task outside visibility scope");
            return Err(AccessError::NotAuthorized(action).into());
        }
        Ok(task)
    }

    async fn ensure_department(&self, id: DepartmentId) -> TaskLifecycleResult<()> {
        match self.store.find_department(id).await? {
            Some(_) => Ok(()),
            None => Err(TaskLifecycleError::UnknownDepartment(id)),
        }
    }

    async fn ensure_account(&self, id: AccountId) -> TaskLifecycleResult<()> {
        match self.store.find_account(id).await? {
            Some(_) => Ok(()),
            None => Err(TaskLifecycleError::UnknownAccount(id)),
        }
    }
}
