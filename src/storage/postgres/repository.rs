//! `PostgreSQL` implementation of the storage ports.

use super::{
    models::{AccountRow, CommentRow, DepartmentRow, NewTaskRow, TaskRow},
    schema::{accounts, comments, departments, tasks},
};
use crate::directory::{
    domain::{
        Account, AccountId, Department, DepartmentId, DepartmentName, EmailAddress, FullName,
        PasswordHash, PersistedAccountData, Role,
    },
    ports::{
        AccountRepository, DepartmentRepository, DirectoryRepositoryError,
        DirectoryRepositoryResult,
    },
};
use crate::task::{
    domain::{
        Budget, Comment, CommentId, CommentText, Currency, PersistedTaskData, Priority, Task,
        TaskId, TaskQuery, TaskStatus, TaskTitle, VisibilityScope,
    },
    ports::{TaskRepository, TaskRepositoryError, TaskRepositoryResult},
};
use async_trait::async_trait;
use diesel::connection::SimpleConnection;
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool, PoolError};
use diesel::result::{DatabaseErrorInformation, DatabaseErrorKind, Error as DieselError};
use thiserror::Error;
use tracing::info;

/// `PostgreSQL` connection pool type used by the store.
pub type StorePgPool = Pool<ConnectionManager<PgConnection>>;

const SCHEMA_SQL: &str = include_str!("../../../migrations/2026-10-01-000000_create_taskguard/up.sql");

/// Builds a connection pool for `database_url`.
///
/// # Errors
///
/// Returns [`PoolError`] when the initial connections cannot be opened.
pub fn build_pool(database_url: &str, max_size: u32) -> Result<StorePgPool, PoolError> {
    Pool::builder()
        .max_size(max_size)
        .build(ConnectionManager::<PgConnection>::new(database_url))
}

/// Failures while verifying or preparing the database.
#[derive(Debug, Error)]
pub enum PostgresSetupError {
    /// No connection could be checked out.
    #[error("connection pool error: {0}")]
    Pool(#[from] PoolError),
    /// A statement failed.
    #[error("database error: {0}")]
    Query(#[from] DieselError),
    /// The blocking worker panicked or was cancelled.
    #[error("blocking task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

/// Maps infrastructure failures onto a repository error type.
trait StoreFailure {
    fn from_failure(err: impl std::error::Error + Send + Sync + 'static) -> Self;
}

impl StoreFailure for TaskRepositoryError {
    fn from_failure(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::persistence(err)
    }
}

impl StoreFailure for DirectoryRepositoryError {
    fn from_failure(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::persistence(err)
    }
}

/// `PostgreSQL`-backed store.
#[derive(Debug, Clone)]
pub struct PostgresStore {
    pool: StorePgPool,
}

impl PostgresStore {
    /// Creates a store from a connection pool.
    #[must_use]
    pub const fn new(pool: StorePgPool) -> Self {
        Self { pool }
    }

    /// Checks that a connection can be opened and answers a trivial query.
    ///
    /// # Errors
    ///
    /// Returns [`PostgresSetupError`] when the database is unreachable.
    pub async fn verify(&self) -> Result<(), PostgresSetupError> {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || -> Result<(), PostgresSetupError> {
            let mut connection = pool.get()?;
            diesel::sql_query("SELECT 1").execute(&mut *connection)?;
            Ok(())
        })
        .await?
    }

    /// Creates any missing tables and indexes.
    ///
    /// # Errors
    ///
    /// Returns [`PostgresSetupError`] when a DDL statement fails.
    pub async fn apply_schema(&self) -> Result<(), PostgresSetupError> {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || -> Result<(), PostgresSetupError> {
            let mut connection = pool.get()?;
            connection.batch_execute(SCHEMA_SQL)?;
            Ok(())
        })
        .await??;
        info!("database schema is up to date");
        Ok(())
    }

    async fn run_blocking<F, T, E>(&self, f: F) -> Result<T, E>
    where
        F: FnOnce(&mut PgConnection) -> Result<T, E> + Send + 'static,
        T: Send + 'static,
        E: StoreFailure + Send + 'static,
    {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let mut connection = pool.get().map_err(E::from_failure)?;
            f(&mut connection)
        })
        .await
        .map_err(E::from_failure)?
    }
}

#[async_trait]
impl AccountRepository for PostgresStore {
    async fn store_account(&self, account: &Account) -> DirectoryRepositoryResult<()> {
        let row = to_account_row(account);
        let account_id = account.id();
        let email = account.email().clone();
        self.run_blocking(move |connection| {
            diesel::insert_into(accounts::table)
                .values(&row)
                .execute(connection)
                .map_err(|err| match err {
                    DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, ref info)
                        if is_constraint(info.as_ref(), "accounts_email_key") =>
                    {
                        DirectoryRepositoryError::DuplicateEmail(email.clone())
                    }
                    DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
                        DirectoryRepositoryError::DuplicateAccount(account_id)
                    }
                    _ => DirectoryRepositoryError::persistence(err),
                })?;
            Ok(())
        })
        .await
    }

    async fn update_account(&self, account: &Account) -> DirectoryRepositoryResult<()> {
        let row = to_account_row(account);
        let account_id = account.id();
        let email = account.email().clone();
        self.run_blocking(move |connection| {
            let updated = diesel::update(accounts::table.find(row.id))
                .set((
                    accounts::email.eq(&row.email),
                    accounts::password_hash.eq(&row.password_hash),
                    accounts::full_name.eq(&row.full_name),
                    accounts::role.eq(&row.role),
                    accounts::department_id.eq(row.department_id),
                    accounts::is_active.eq(row.is_active),
                ))
                .execute(connection)
                .map_err(|err| match err {
                    DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
                        DirectoryRepositoryError::DuplicateEmail(email.clone())
                    }
                    _ => DirectoryRepositoryError::persistence(err),
                })?;
            if updated == 0 {
                return Err(DirectoryRepositoryError::AccountNotFound(account_id));
            }
            Ok(())
        })
        .await
    }

    async fn find_account(&self, id: AccountId) -> DirectoryRepositoryResult<Option<Account>> {
        self.run_blocking(move |connection| {
            let row = accounts::table
                .find(id.into_inner())
                .select(AccountRow::as_select())
                .first::<AccountRow>(connection)
                .optional()
                .map_err(DirectoryRepositoryError::persistence)?;
            row.map(row_to_account).transpose()
        })
        .await
    }

    async fn find_account_by_email(
        &self,
        email: &EmailAddress,
    ) -> DirectoryRepositoryResult<Option<Account>> {
        let lookup = email.as_str().to_owned();
        self.run_blocking(move |connection| {
            let row = accounts::table
                .filter(accounts::email.eq(lookup))
                .select(AccountRow::as_select())
                .first::<AccountRow>(connection)
                .optional()
                .map_err(DirectoryRepositoryError::persistence)?;
            row.map(row_to_account).transpose()
        })
        .await
    }

    async fn find_earliest_account(&self) -> DirectoryRepositoryResult<Option<Account>> {
        self.run_blocking(move |connection| {
            let row = accounts::table
                .order((accounts::created_at.asc(), accounts::id.asc()))
                .select(AccountRow::as_select())
                .first::<AccountRow>(connection)
                .optional()
                .map_err(DirectoryRepositoryError::persistence)?;
            row.map(row_to_account).transpose()
        })
        .await
    }

    async fn list_accounts(&self) -> DirectoryRepositoryResult<Vec<Account>> {
        self.run_blocking(move |connection| {
            accounts::table
                .order((accounts::created_at.asc(), accounts::id.asc()))
                .select(AccountRow::as_select())
                .load::<AccountRow>(connection)
                .map_err(DirectoryRepositoryError::persistence)?
                .into_iter()
                .map(row_to_account)
                .collect()
        })
        .await
    }
}

#[async_trait]
impl DepartmentRepository for PostgresStore {
    async fn store_department(&self, department: &Department) -> DirectoryRepositoryResult<()> {
        let row = DepartmentRow {
            id: department.id().into_inner(),
            name: department.name().as_str().to_owned(),
            created_at: department.created_at(),
        };
        let name = department.name().clone();
        self.run_blocking(move |connection| {
            diesel::insert_into(departments::table)
                .values(&row)
                .execute(connection)
                .map_err(|err| match err {
                    DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, ref info)
                        if is_constraint(info.as_ref(), "departments_name_key") =>
                    {
                        DirectoryRepositoryError::DuplicateDepartmentName(name.clone())
                    }
                    _ => DirectoryRepositoryError::persistence(err),
                })?;
            Ok(())
        })
        .await
    }

    async fn find_department(
        &self,
        id: DepartmentId,
    ) -> DirectoryRepositoryResult<Option<Department>> {
        self.run_blocking(move |connection| {
            let row = departments::table
                .find(id.into_inner())
                .select(DepartmentRow::as_select())
                .first::<DepartmentRow>(connection)
                .optional()
                .map_err(DirectoryRepositoryError::persistence)?;
            row.map(row_to_department).transpose()
        })
        .await
    }

    async fn find_department_by_name(
        &self,
        name: &DepartmentName,
    ) -> DirectoryRepositoryResult<Option<Department>> {
        let lookup = name.as_str().to_owned();
        self.run_blocking(move |connection| {
            let row = departments::table
                .filter(departments::name.eq(lookup))
                .select(DepartmentRow::as_select())
                .first::<DepartmentRow>(connection)
                .optional()
                .map_err(DirectoryRepositoryError::persistence)?;
            row.map(row_to_department).transpose()
        })
        .await
    }

    async fn list_departments(&self) -> DirectoryRepositoryResult<Vec<Department>> {
        self.run_blocking(move |connection| {
            departments::table
                .order(departments::name.asc())
                .select(DepartmentRow::as_select())
                .load::<DepartmentRow>(connection)
                .map_err(DirectoryRepositoryError::persistence)?
                .into_iter()
                .map(row_to_department)
                .collect()
        })
        .await
    }
}

#[async_trait]
impl TaskRepository for PostgresStore {
    async fn store_task(&self, task: &Task) -> TaskRepositoryResult<()> {
        let task_id = task.id();
        let new_row = to_new_task_row(task)?;
        self.run_blocking(move |connection| {
            diesel::insert_into(tasks::table)
                .values(&new_row)
                .execute(connection)
                .map_err(|err| match err {
                    DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
                        TaskRepositoryError::DuplicateTask(task_id)
                    }
                    _ => TaskRepositoryError::persistence(err),
                })?;
            Ok(())
        })
        .await
    }

    async fn update_task(&self, task: &Task) -> TaskRepositoryResult<()> {
        let task_id = task.id();
        let executor_id = task.executor_id().map(AccountId::into_inner);
        let status = task.status().as_str();
        let updated_at = task.updated_at();
        self.run_blocking(move |connection| {
            let updated = diesel::update(tasks::table.find(task_id.into_inner()))
                .set((
                    tasks::executor_id.eq(executor_id),
                    tasks::status.eq(status),
                    tasks::updated_at.eq(updated_at),
                ))
                .execute(connection)
                .map_err(TaskRepositoryError::persistence)?;
            if updated == 0 {
                return Err(TaskRepositoryError::NotFound(task_id));
            }
            Ok(())
        })
        .await
    }

    async fn find_task(&self, id: TaskId) -> TaskRepositoryResult<Option<Task>> {
        self.run_blocking(move |connection| {
            let row = tasks::table
                .find(id.into_inner())
                .select(TaskRow::as_select())
                .first::<TaskRow>(connection)
                .optional()
                .map_err(TaskRepositoryError::persistence)?;
            row.map(row_to_task).transpose()
        })
        .await
    }

    async fn query_tasks(&self, query: &TaskQuery) -> TaskRepositoryResult<Vec<Task>> {
        let task_query = *query;
        self.run_blocking(move |connection| {
            let mut statement = tasks::table.select(TaskRow::as_select()).into_boxed();

            statement = match task_query.scope {
                VisibilityScope::All => statement,
                VisibilityScope::DepartmentOrOwner {
                    department_id,
                    owner_id,
                } => statement.filter(
                    tasks::target_dept_id
                        .eq(Some(department_id.into_inner()))
                        .or(tasks::owner_id.nullable().eq(Some(owner_id.into_inner()))),
                ),
                VisibilityScope::Owner(owner_id) => {
                    statement.filter(tasks::owner_id.eq(owner_id.into_inner()))
                }
                VisibilityScope::OwnerOrExecutor(account_id) => statement.filter(
                    tasks::owner_id
                        .nullable()
                        .eq(Some(account_id.into_inner()))
                        .or(tasks::executor_id.eq(Some(account_id.into_inner()))),
                ),
            };

            let filter = task_query.filter;
            if let Some(status) = filter.status {
                statement = statement.filter(tasks::status.eq(status.as_str()));
            }
            if let Some(priority) = filter.priority {
                statement = statement.filter(tasks::priority.eq(priority.as_str()));
            }
            if let Some(from) = filter.deadline_from {
                statement = statement.filter(tasks::deadline.ge(Some(from)));
            }
            if let Some(until) = filter.deadline_until {
                statement = statement.filter(tasks::deadline.le(Some(until)));
            }

            statement
                .order((tasks::created_at.desc(), tasks::id.desc()))
                .limit(i64::from(task_query.page.limit()))
                .offset(i64::from(task_query.page.offset()))
                .load::<TaskRow>(connection)
                .map_err(TaskRepositoryError::persistence)?
                .into_iter()
                .map(row_to_task)
                .collect()
        })
        .await
    }

    async fn store_comment(&self, comment: &Comment) -> TaskRepositoryResult<()> {
        let task_id = comment.task_id();
        let row = CommentRow {
            id: comment.id().into_inner(),
            task_id: task_id.into_inner(),
            author_id: comment.author_id().into_inner(),
            text: comment.text().as_str().to_owned(),
            created_at: comment.created_at(),
        };
        self.run_blocking(move |connection| {
            diesel::insert_into(comments::table)
                .values(&row)
                .execute(connection)
                .map_err(|err| match err {
                    DieselError::DatabaseError(DatabaseErrorKind::ForeignKeyViolation, ref info)
                        if is_constraint(info.as_ref(), "comments_task_id_fkey") =>
                    {
                        TaskRepositoryError::NotFound(task_id)
                    }
                    _ => TaskRepositoryError::persistence(err),
                })?;
            Ok(())
        })
        .await
    }

    async fn list_comments(&self, task_id: TaskId) -> TaskRepositoryResult<Vec<Comment>> {
        self.run_blocking(move |connection| {
            comments::table
                .filter(comments::task_id.eq(task_id.into_inner()))
                .order((comments::created_at.asc(), comments::id.asc()))
                .select(CommentRow::as_select())
                .load::<CommentRow>(connection)
                .map_err(TaskRepositoryError::persistence)?
                .into_iter()
                .map(row_to_comment)
                .collect()
        })
        .await
    }
}

fn is_constraint(info: &dyn DatabaseErrorInformation, constraint: &str) -> bool {
    info.constraint_name().is_some_and(|name| name == constraint)
}

fn to_account_row(account: &Account) -> AccountRow {
    AccountRow {
        id: account.id().into_inner(),
        email: account.email().as_str().to_owned(),
        password_hash: account.password_hash().as_str().to_owned(),
        full_name: account.full_name().as_str().to_owned(),
        role: account.role().as_str().to_owned(),
        department_id: account.department_id().map(DepartmentId::into_inner),
        is_active: account.is_active(),
        created_at: account.created_at(),
    }
}

fn row_to_account(row: AccountRow) -> DirectoryRepositoryResult<Account> {
    let AccountRow {
        id,
        email,
        password_hash,
        full_name,
        role,
        department_id,
        is_active,
        created_at,
    } = row;

    let data = PersistedAccountData {
        id: AccountId::from_uuid(id),
        email: EmailAddress::new(email).map_err(DirectoryRepositoryError::invalid_persisted_data)?,
        password_hash: PasswordHash::new(password_hash),
        full_name: FullName::new(full_name)
            .map_err(DirectoryRepositoryError::invalid_persisted_data)?,
        role: Role::try_from(role.as_str())
            .map_err(DirectoryRepositoryError::invalid_persisted_data)?,
        department_id: department_id.map(DepartmentId::from_uuid),
        is_active,
        created_at,
    };
    Ok(Account::from_persisted(data))
}

fn row_to_department(row: DepartmentRow) -> DirectoryRepositoryResult<Department> {
    let name =
        DepartmentName::new(row.name).map_err(DirectoryRepositoryError::invalid_persisted_data)?;
    Ok(Department::from_persisted(
        DepartmentId::from_uuid(row.id),
        name,
        row.created_at,
    ))
}

fn to_new_task_row(task: &Task) -> TaskRepositoryResult<NewTaskRow> {
    let budget = task.budget();
    let budget_minor =
        i64::try_from(budget.minor_units()).map_err(TaskRepositoryError::persistence)?;
    Ok(NewTaskRow {
        id: task.id().into_inner(),
        title: task.title().as_str().to_owned(),
        description: task.description().map(str::to_owned),
        owner_id: task.owner_id().into_inner(),
        executor_id: task.executor_id().map(AccountId::into_inner),
        target_dept_id: task.target_dept_id().map(DepartmentId::into_inner),
        status: task.status().as_str().to_owned(),
        priority: task.priority().as_str().to_owned(),
        deadline: task.deadline(),
        budget_minor,
        currency: budget.currency().as_str().to_owned(),
        created_at: task.created_at(),
        updated_at: task.updated_at(),
    })
}

fn row_to_task(row: TaskRow) -> TaskRepositoryResult<Task> {
    let TaskRow {
        id,
        title,
        description,
        owner_id,
        executor_id,
        target_dept_id,
        status,
        priority,
        deadline,
        budget_minor,
        currency,
        created_at,
        updated_at,
    } = row;

    let currency_code =
        Currency::try_from(currency.as_str()).map_err(TaskRepositoryError::invalid_persisted_data)?;
    let minor_units =
        u64::try_from(budget_minor).map_err(TaskRepositoryError::invalid_persisted_data)?;
    let data = PersistedTaskData {
        id: TaskId::from_uuid(id),
        title: TaskTitle::new(title).map_err(TaskRepositoryError::invalid_persisted_data)?,
        description,
        owner_id: AccountId::from_uuid(owner_id),
        executor_id: executor_id.map(AccountId::from_uuid),
        target_dept_id: target_dept_id.map(DepartmentId::from_uuid),
        status: TaskStatus::try_from(status.as_str())
            .map_err(TaskRepositoryError::invalid_persisted_data)?,
        priority: Priority::try_from(priority.as_str())
            .map_err(TaskRepositoryError::invalid_persisted_data)?,
        deadline,
        budget: Budget::from_minor_units(minor_units, currency_code)
            .map_err(TaskRepositoryError::invalid_persisted_data)?,
        created_at,
        updated_at,
    };
    Ok(Task::from_persisted(data))
}

fn row_to_comment(row: CommentRow) -> TaskRepositoryResult<Comment> {
    let text = CommentText::new(row.text).map_err(TaskRepositoryError::invalid_persisted_data)?;
    Ok(Comment::from_persisted(
        CommentId::from_uuid(row.id),
        TaskId::from_uuid(row.task_id),
        AccountId::from_uuid(row.author_id),
        text,
        row.created_at,
    ))
}
