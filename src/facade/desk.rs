//! Token-authenticated service facade.

use super::DeskError;
use crate::advice::{AdviceService, TaskContext};
use crate::config::AppConfig;
use crate::directory::{
    adapters::LogResetNotifier,
    domain::{Account, AccountId, Department, Password},
    ports::{
        AccessToken, AccountRepository, Authenticator, DepartmentRepository, PasswordHasher,
        ResetNotifier, ResetToken,
    },
    services::{
        DirectoryService, DirectoryServiceError, EditAccountRequest, RegisterAccountRequest,
    },
};
use crate::task::{
    domain::{Comment, Page, Task, TaskFilter, TaskId, TaskStatus},
    ports::TaskRepository,
    services::{CreateTaskRequest, TaskLifecycleService},
};
use mockable::Clock;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Result type for facade operations.
pub type DeskResult<T> = Result<T, DeskError>;

/// The operations exposed to transport layers.
///
/// Holds no mutable state of its own; every call reloads what it needs from
/// the store.
pub struct TaskDesk<S, K, H, C>
where
    S: TaskRepository + AccountRepository + DepartmentRepository,
    K: Authenticator,
    H: PasswordHasher,
    C: Clock + Send + Sync,
{
    directory: DirectoryService<S, H, C>,
    tasks: TaskLifecycleService<S, C>,
    authenticator: Arc<K>,
    notifier: Arc<dyn ResetNotifier>,
    advice: AdviceService,
    config: AppConfig,
}

impl<S, K, H, C> TaskDesk<S, K, H, C>
where
    S: TaskRepository + AccountRepository + DepartmentRepository,
    K: Authenticator,
    H: PasswordHasher,
    C: Clock + Send + Sync,
{
    /// Wires the facade to its collaborators. Advice starts offline and reset
    /// tokens are delivered to the log.
    #[must_use]
    pub fn new(
        store: Arc<S>,
        authenticator: Arc<K>,
        hasher: Arc<H>,
        clock: Arc<C>,
        config: AppConfig,
    ) -> Self {
        Self {
            directory: DirectoryService::new(Arc::clone(&store), hasher, Arc::clone(&clock)),
            tasks: TaskLifecycleService::new(store, clock),
            authenticator,
            notifier: Arc::new(LogResetNotifier::new()),
            advice: AdviceService::offline(),
            config,
        }
    }

    /// Replaces the advice service.
    #[must_use]
    pub fn with_advice(mut self, advice: AdviceService) -> Self {
        self.advice = advice;
        self
    }

    /// Replaces the reset-token delivery channel.
    #[must_use]
    pub fn with_reset_notifier(mut self, notifier: Arc<dyn ResetNotifier>) -> Self {
        self.notifier = notifier;
        self
    }

    /// Registers an account. The first registration becomes the founder.
    ///
    /// # Errors
    ///
    /// [`DeskError::ValidationFailed`] for malformed fields, a taken email or
    /// an unknown department.
    pub async fn register(&self, request: RegisterAccountRequest) -> DeskResult<Account> {
        Ok(self.directory.register(request).await?)
    }

    /// Exchanges an email and password for an access token.
    ///
    /// # Errors
    ///
    /// [`DeskError::InvalidCredential`] when the pair does not identify an
    /// active account.
    pub async fn authenticate(&self, email: &str, password: &str) -> DeskResult<AccessToken> {
        let account = self.directory.verify_credentials(email, password).await?;
        let token = self.authenticator.issue(account.id()).await?;
        debug!(account_id = %account.id(), "access token issued");
        Ok(token)
    }

    /// Starts a password reset for `email`.
    ///
    /// Succeeds whether or not the address belongs to an active account, so
    /// callers cannot probe for registered emails. Delivery failures are
    /// logged, not returned.
    ///
    /// # Errors
    ///
    /// [`DeskError::StorageUnavailable`] when the lookup or token backend
    /// fails.
    pub async fn request_password_reset(&self, email: &str) -> DeskResult<()> {
        let Some(account) = self.directory.find_account_by_email(email).await? else {
            debug!("password reset requested for unknown email");
            return Ok(());
        };
        if !account.is_active() {
            return Ok(());
        }
        let token = self.authenticator.issue_reset(account.id()).await?;
        if let Err(err) = self.notifier.deliver(account.email(), &token).await {
            warn!(account_id = %account.id(), error = %err, "reset token delivery failed");
        }
        Ok(())
    }

    /// Sets a new password using a reset token. The token is spent even if
    /// the account has since disappeared.
    ///
    /// # Errors
    ///
    /// [`DeskError::ValidationFailed`] for a short password, checked before
    /// the token is spent, and [`DeskError::InvalidCredential`] for an
    /// unknown, expired or used token.
    pub async fn reset_password(&self, token: &ResetToken, new_password: &str) -> DeskResult<()> {
        Password::new(new_password).map_err(DirectoryServiceError::from)?;
        let account_id = self.authenticator.redeem_reset(token).await?;
        self.directory
            .change_password(account_id, new_password)
            .await?;
        info!(account_id = %account_id, "password reset completed");
        Ok(())
    }

    /// Returns the account behind `token`.
    ///
    /// # Errors
    ///
    /// [`DeskError::InvalidCredential`] for unknown, expired or orphaned
    /// tokens and inactive accounts.
    pub async fn current_account(&self, token: &AccessToken) -> DeskResult<Account> {
        self.resolve_actor(token).await
    }

    /// Creates a department. Admin only.
    ///
    /// # Errors
    ///
    /// [`DeskError::NotAuthorized`] for non-admins and
    /// [`DeskError::ValidationFailed`] for a bad or taken name.
    pub async fn create_department(
        &self,
        token: &AccessToken,
        name: &str,
    ) -> DeskResult<Department> {
        let actor = self.resolve_actor(token).await?;
        Ok(self.directory.create_department(&actor, name).await?)
    }

    /// Lists departments by name.
    ///
    /// # Errors
    ///
    /// [`DeskError::InvalidCredential`] for a bad token.
    pub async fn list_departments(&self, token: &AccessToken) -> DeskResult<Vec<Department>> {
        self.resolve_actor(token).await?;
        Ok(self.directory.list_departments().await?)
    }

    /// Lists every account, founder first. Admin only.
    ///
    /// # Errors
    ///
    /// [`DeskError::NotAuthorized`] for non-admins.
    pub async fn list_accounts(&self, token: &AccessToken) -> DeskResult<Vec<Account>> {
        let actor = self.resolve_actor(token).await?;
        Ok(self.directory.list_accounts(&actor).await?)
    }

    /// Edits another account's role, name or department.
    ///
    /// # Errors
    ///
    /// [`DeskError::FounderProtected`], [`DeskError::NotAuthorized`] or
    /// [`DeskError::SelfDemotionForbidden`] when the edit is denied;
    /// [`DeskError::NotFound`] for a missing target.
    pub async fn edit_account(
        &self,
        token: &AccessToken,
        target_id: AccountId,
        request: EditAccountRequest,
    ) -> DeskResult<Account> {
        let actor = self.resolve_actor(token).await?;
        Ok(self
            .directory
            .edit_account(&actor, target_id, request)
            .await?)
    }

    /// Creates a task owned by the caller.
    ///
    /// # Errors
    ///
    /// [`DeskError::ValidationFailed`] for invalid fields and
    /// [`DeskError::InvalidAssignment`] when the caller names themself as
    /// executor.
    pub async fn create_task(
        &self,
        token: &AccessToken,
        request: CreateTaskRequest,
    ) -> DeskResult<Task> {
        let actor = self.resolve_actor(token).await?;
        Ok(self.tasks.create_task(&actor, request).await?)
    }

    /// Lists tasks visible to the caller, newest first.
    ///
    /// `limit` defaults to the configured page size and is clamped to the
    /// configured maximum.
    ///
    /// # Errors
    ///
    /// [`DeskError::StorageUnavailable`] when the query fails.
    pub async fn list_tasks(
        &self,
        token: &AccessToken,
        filter: TaskFilter,
        limit: Option<u32>,
        offset: u32,
    ) -> DeskResult<Vec<Task>> {
        let actor = self.resolve_actor(token).await?;
        let page = Page::new(self.config.page_limit(limit), offset);
        Ok(self.tasks.list_visible_tasks(&actor, filter, page).await?)
    }

    /// Fetches a visible task.
    ///
    /// # Errors
    ///
    /// [`DeskError::NotFound`] or [`DeskError::NotAuthorized`].
    pub async fn get_task(&self, token: &AccessToken, task_id: TaskId) -> DeskResult<Task> {
        let actor = self.resolve_actor(token).await?;
        Ok(self.tasks.get_task(&actor, task_id).await?)
    }

    /// Assigns an executor. Admins and the task owner only.
    ///
    /// # Errors
    ///
    /// [`DeskError::NotAuthorized`], [`DeskError::InvalidAssignment`],
    /// [`DeskError::TaskFinished`] or [`DeskError::NotFound`].
    pub async fn assign_executor(
        &self,
        token: &AccessToken,
        task_id: TaskId,
        executor_id: AccountId,
    ) -> DeskResult<Task> {
        let actor = self.resolve_actor(token).await?;
        Ok(self
            .tasks
            .assign_executor(&actor, task_id, executor_id)
            .await?)
    }

    /// Changes the status of a visible task.
    ///
    /// # Errors
    ///
    /// [`DeskError::NotAuthorized`] or [`DeskError::TaskFinished`].
    pub async fn update_status(
        &self,
        token: &AccessToken,
        task_id: TaskId,
        status: TaskStatus,
    ) -> DeskResult<Task> {
        let actor = self.resolve_actor(token).await?;
        Ok(self.tasks.update_status(&actor, task_id, status).await?)
    }

    /// Comments on a visible task.
    ///
    /// # Errors
    ///
    /// [`DeskError::NotAuthorized`] or [`DeskError::ValidationFailed`].
    pub async fn add_comment(
        &self,
        token: &AccessToken,
        task_id: TaskId,
        text: &str,
    ) -> DeskResult<Comment> {
        let actor = self.resolve_actor(token).await?;
        Ok(self.tasks.add_comment(&actor, task_id, text).await?)
    }

    /// Lists the comments of a visible task, oldest first.
    ///
    /// # Errors
    ///
    /// [`DeskError::NotAuthorized`] or [`DeskError::NotFound`].
    pub async fn list_comments(
        &self,
        token: &AccessToken,
        task_id: TaskId,
    ) -> DeskResult<Vec<Comment>> {
        let actor = self.resolve_actor(token).await?;
        Ok(self.tasks.list_comments(&actor, task_id).await?)
    }

    /// Produces advisory text for a visible task. Advice failures never
    /// surface as errors.
    ///
    /// # Errors
    ///
    /// [`DeskError::NotAuthorized`] or [`DeskError::NotFound`] for the task
    /// lookup itself.
    pub async fn analyze_task(&self, token: &AccessToken, task_id: TaskId) -> DeskResult<String> {
        let actor = self.resolve_actor(token).await?;
        let task = self.tasks.get_task(&actor, task_id).await?;
        let comments = self.tasks.list_comments(&actor, task_id).await?;
        let context = TaskContext::from_task(&task, &comments);
        Ok(self.advice.analyze(&context).await)
    }

    async fn resolve_actor(&self, token: &AccessToken) -> DeskResult<Account> {
        let account_id = self.authenticator.resolve(token).await?;
        match self.directory.find_account(account_id).await? {
            Some(account) if account.is_active() => Ok(account),
            Some(_) | None => {
                warn!(account_id = %account_id, "token resolved to no active account");
                Err(DeskError::InvalidCredential)
            }
        }
    }
}
