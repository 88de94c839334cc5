//! Repository ports for account and department persistence.

use crate::directory::domain::{
    Account, AccountId, Department, DepartmentId, DepartmentName, EmailAddress,
};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for directory repository operations.
pub type DirectoryRepositoryResult<T> = Result<T, DirectoryRepositoryError>;

/// Account persistence contract.
#[async_trait]
pub trait AccountRepository: Send + Sync {
    /// Stores a new account.
    ///
    /// # Errors
    ///
    /// Returns [`DirectoryRepositoryError::DuplicateEmail`] when the email is
    /// already registered.
    async fn store_account(&self, account: &Account) -> DirectoryRepositoryResult<()>;

    /// Persists role, name and department changes to an existing account.
    ///
    /// # Errors
    ///
    /// Returns [`DirectoryRepositoryError::AccountNotFound`] when the account
    /// does not exist.
    async fn update_account(&self, account: &Account) -> DirectoryRepositoryResult<()>;

    /// Finds an account by identifier.
    async fn find_account(&self, id: AccountId) -> DirectoryRepositoryResult<Option<Account>>;

    /// Finds an account by login email.
    async fn find_account_by_email(
        &self,
        email: &EmailAddress,
    ) -> DirectoryRepositoryResult<Option<Account>>;

    /// Returns the earliest-created account, tie-broken by lowest identifier.
    ///
    /// Returns `None` while no account exists.
    async fn find_earliest_account(&self) -> DirectoryRepositoryResult<Option<Account>>;

    /// Returns every account ordered by creation time, then identifier.
    async fn list_accounts(&self) -> DirectoryRepositoryResult<Vec<Account>>;
}

/// Department persistence contract.
#[async_trait]
pub trait DepartmentRepository: Send + Sync {
    /// Stores a new department.
    ///
    /// # Errors
    ///
    /// Returns [`DirectoryRepositoryError::DuplicateDepartmentName`] when the
    /// name is taken.
    async fn store_department(&self, department: &Department) -> DirectoryRepositoryResult<()>;

    /// Finds a department by identifier.
    async fn find_department(
        &self,
        id: DepartmentId,
    ) -> DirectoryRepositoryResult<Option<Department>>;

    /// Finds a department by its unique name.
    async fn find_department_by_name(
        &self,
        name: &DepartmentName,
    ) -> DirectoryRepositoryResult<Option<Department>>;

    /// Returns every department ordered by name.
    async fn list_departments(&self) -> DirectoryRepositoryResult<Vec<Department>>;
}

/// Errors returned by directory repository implementations.
#[derive(Debug, Clone, Error)]
pub enum DirectoryRepositoryError {
    /// An account with the same identifier already exists.
    #[error("duplicate account identifier: {0}")]
    DuplicateAccount(AccountId),

    /// An account with the same email already exists.
    #[error("email already registered: {0}")]
    DuplicateEmail(EmailAddress),

    /// A department with the same name already exists.
    #[error("department already exists: {0}")]
    DuplicateDepartmentName(DepartmentName),

    /// The account was not found.
    #[error("account not found: {0}")]
    AccountNotFound(AccountId),

    /// Persisted data could not be reconstructed into domain types.
    #[error("invalid persisted data: {0}")]
    InvalidPersistedData(Arc<dyn std::error::Error + Send + Sync>),

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl DirectoryRepositoryError {
    /// Wraps a data-quality or deserialization error from persisted rows.
    pub fn invalid_persisted_data(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::InvalidPersistedData(Arc::new(err))
    }

    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}
