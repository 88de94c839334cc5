//! Service layer for account registration, departments and account edits.

use crate::directory::{
    domain::{
        AccessError, Account, AccountChanges, AccountId, Department, DepartmentId,
        DepartmentName, DirectoryDomainError, EmailAddress, FullName, NewAccount, Password, Role,
        authorize_account_edit, require_admin,
    },
    ports::{
        AccountRepository, DepartmentRepository, DirectoryRepositoryError, PasswordHashError,
        PasswordHasher,
    },
};
use mockable::Clock;
use std::sync::Arc;
use thiserror::Error;
use tracing::{info, warn};

/// Request payload for registering a new account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegisterAccountRequest {
    email: String,
    password: Password,
    full_name: String,
    department_id: Option<DepartmentId>,
}

impl RegisterAccountRequest {
    /// Creates a request with required registration fields.
    #[must_use]
    pub fn new(
        email: impl Into<String>,
        password: impl Into<String>,
        full_name: impl Into<String>,
    ) -> Self {
        Self {
            email: email.into(),
            password: Password::unchecked(password),
            full_name: full_name.into(),
            department_id: None,
        }
    }

    /// Sets the home department.
    #[must_use]
    pub const fn with_department(mut self, department_id: DepartmentId) -> Self {
        self.department_id = Some(department_id);
        self
    }
}

/// Request payload for an administrative account edit.
///
/// Absent fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EditAccountRequest {
    role: Option<Role>,
    full_name: Option<String>,
    department_id: Option<DepartmentId>,
}

impl EditAccountRequest {
    /// Creates an empty edit.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Proposes a new role.
    #[must_use]
    pub const fn with_role(mut self, role: Role) -> Self {
        self.role = Some(role);
        self
    }

    /// Proposes a new display name.
    #[must_use]
    pub fn with_full_name(mut self, full_name: impl Into<String>) -> Self {
        self.full_name = Some(full_name.into());
        self
    }

    /// Proposes a new department.
    #[must_use]
    pub const fn with_department(mut self, department_id: DepartmentId) -> Self {
        self.department_id = Some(department_id);
        self
    }

    /// Splits the request into the change set the policy inspects and the
    /// raw name, which is only validated once the edit is authorized.
    fn into_parts(self) -> (AccountChanges, Option<String>) {
        let changes = AccountChanges {
            role: self.role,
            full_name: None,
            department_id: self.department_id,
        };
        (changes, self.full_name)
    }
}

/// Service-level errors for directory operations.
#[derive(Debug, Error)]
pub enum DirectoryServiceError {
    /// Domain validation failed.
    #[error(transparent)]
    Domain(#[from] DirectoryDomainError),
    /// Authorization was denied.
    #[error(transparent)]
    Access(#[from] AccessError),
    /// Repository operation failed.
    #[error(transparent)]
    Repository(#[from] DirectoryRepositoryError),
    /// Email and password did not identify an active account.
    #[error("incorrect email or password")]
    InvalidCredentials,
    /// A referenced department does not exist.
    #[error("department {0} does not exist")]
    UnknownDepartment(DepartmentId),
    /// The password could not be hashed.
    #[error(transparent)]
    Hashing(#[from] PasswordHashError),
}

/// Result type for directory service operations.
pub type DirectoryServiceResult<T> = Result<T, DirectoryServiceError>;

/// Orchestrates account and department workflows.
#[derive(Clone)]
pub struct DirectoryService<S, H, C>
where
    S: AccountRepository + DepartmentRepository,
    H: PasswordHasher,
    C: Clock + Send + Sync,
{
    store: Arc<S>,
    hasher: Arc<H>,
    clock: Arc<C>,
}

impl<S, H, C> DirectoryService<S, H, C>
where
    S: AccountRepository + DepartmentRepository,
    H: PasswordHasher,
    C: Clock + Send + Sync,
{
    /// Creates a new directory service.
    #[must_use]
    pub const fn new(store: Arc<S>, hasher: Arc<H>, clock: Arc<C>) -> Self {
        Self {
            store,
            hasher,
            clock,
        }
    }

    /// Registers a new account.
    ///
    /// The first account ever registered becomes an admin and is the system
    /// founder; every later account starts as an employee.
    ///
    /// # Errors
    ///
    /// Returns [`DirectoryServiceError::Domain`] for malformed input,
    /// [`DirectoryServiceError::UnknownDepartment`] for a missing department
    /// and [`DirectoryServiceError::Repository`] when the email is taken or
    /// persistence fails.
    pub async fn register(&self, request: RegisterAccountRequest) -> DirectoryServiceResult<Account> {
        let RegisterAccountRequest {
            email: raw_email,
            password: raw_password,
            full_name: raw_name,
            department_id,
        } = request;

        let email = EmailAddress::new(raw_email)?;
        let full_name = FullName::new(raw_name)?;
        let password = Password::new(raw_password.expose())?;

        if self.store.find_account_by_email(&email).await?.is_some() {
            return Err(DirectoryRepositoryError::DuplicateEmail(email).into());
        }
        if let Some(id) = department_id {
            self.ensure_department(id).await?;
        }

        let role = if self.store.find_earliest_account().await?.is_none() {
            Role::Admin
        } else {
            Role::Employee
        };

        let fields = NewAccount {
            email,
            password_hash: self.hasher.hash(&password)?,
            full_name,
            department_id,
        };
        let account = Account::register(fields, role, &*self.clock);
        self.store.store_account(&account).await?;
        info!(account_id = %account.id(), role = %role, "account registered");
        Ok(account)
    }

    /// Returns the active account identified by `email` and `password`.
    ///
    /// # Errors
    ///
    /// Returns [`DirectoryServiceError::InvalidCredentials`] when the email is
    /// unknown, the password does not match or the account is inactive.
    pub async fn verify_credentials(
        &self,
        email: &str,
        password: &str,
    ) -> DirectoryServiceResult<Account> {
        let Ok(address) = EmailAddress::new(email) else {
            return Err(DirectoryServiceError::InvalidCredentials);
        };
        let account = self
            .store
            .find_account_by_email(&address)
            .await?
            .ok_or(DirectoryServiceError::InvalidCredentials)?;

        let candidate = Password::unchecked(password);
        if !account.is_active() || !self.hasher.verify(&candidate, account.password_hash()) {
            warn!(account_id = %account.id(), "rejected sign-in attempt");
            return Err(DirectoryServiceError::InvalidCredentials);
        }
        Ok(account)
    }

    /// Finds an account by identifier.
    ///
    /// # Errors
    ///
    /// Returns [`DirectoryServiceError::Repository`] when lookup fails.
    pub async fn find_account(&self, id: AccountId) -> DirectoryServiceResult<Option<Account>> {
        Ok(self.store.find_account(id).await?)
    }

    /// Finds an account by login email. Malformed addresses match nothing.
    ///
    /// # Errors
    ///
    /// Returns [`DirectoryServiceError::Repository`] when lookup fails.
    pub async fn find_account_by_email(
        &self,
        email: &str,
    ) -> DirectoryServiceResult<Option<Account>> {
        let Ok(address) = EmailAddress::new(email) else {
            return Ok(None);
        };
        Ok(self.store.find_account_by_email(&address).await?)
    }

    /// Replaces the password of `account_id`.
    ///
    /// # Errors
    ///
    /// Returns [`DirectoryServiceError::Domain`] for a short password and
    /// [`DirectoryServiceError::Repository`] for a missing account.
    pub async fn change_password(
        &self,
        account_id: AccountId,
        new_password: &str,
    ) -> DirectoryServiceResult<Account> {
        let password = Password::new(new_password)?;
        let mut account = self
            .store
            .find_account(account_id)
            .await?
            .ok_or(DirectoryRepositoryError::AccountNotFound(account_id))?;
        account.set_password_hash(self.hasher.hash(&password)?);
        self.store.update_account(&account).await?;
        info!(account_id = %account_id, "password changed");
        Ok(account)
    }

    /// Returns the current system founder, if any account exists.
    ///
    /// # Errors
    ///
    /// Returns [`DirectoryServiceError::Repository`] when lookup fails.
    pub async fn founder(&self) -> DirectoryServiceResult<Option<Account>> {
        Ok(self.store.find_earliest_account().await?)
    }

    /// Lists all accounts, founder first. Admin only.
    ///
    /// # Errors
    ///
    /// Returns [`DirectoryServiceError::Access`] for non-admins.
    pub async fn list_accounts(&self, actor: &Account) -> DirectoryServiceResult<Vec<Account>> {
        require_admin(actor, "list accounts")?;
        Ok(self.store.list_accounts().await?)
    }

    /// Applies an administrative edit to `target_id`.
    ///
    /// Every authorization rule runs before anything is written.
    ///
    /// # Errors
    ///
    /// Returns [`DirectoryServiceError::Access`] when the edit is denied,
    /// [`DirectoryServiceError::Repository`] with
    /// [`DirectoryRepositoryError::AccountNotFound`] for a missing target,
    /// [`DirectoryServiceError::UnknownDepartment`] for a missing department
    /// and [`DirectoryServiceError::Domain`] for an invalid name.
    pub async fn edit_account(
        &self,
        actor: &Account,
        target_id: AccountId,
        request: EditAccountRequest,
    ) -> DirectoryServiceResult<Account> {
        let (mut changes, raw_name) = request.into_parts();
        let mut target = self
            .store
            .find_account(target_id)
            .await?
            .ok_or(DirectoryRepositoryError::AccountNotFound(target_id))?;
        let founder = self
            .store
            .find_earliest_account()
            .await?
            .ok_or(DirectoryRepositoryError::AccountNotFound(target_id))?;

        if let Err(denial) = authorize_account_edit(actor, &target, &founder, &changes) {
            warn!(
                actor_id = %actor.id(),
                target_id = %target_id,
                reason = %denial,
                "account edit denied"
            );
            return Err(denial.into());
        }
        changes.full_name = raw_name.map(FullName::new).transpose()?;
        if let Some(id) = changes.department_id {
            self.ensure_department(id).await?;
        }

        target.apply(changes);
        self.store.update_account(&target).await?;
        info!(actor_id = %actor.id(), target_id = %target_id, role = %target.role(), "account updated");
        Ok(target)
    }

    /// Creates a department. Admin only.
    ///
    /// # Errors
    ///
    /// Returns [`DirectoryServiceError::Access`] for non-admins,
    /// [`DirectoryServiceError::Domain`] for an invalid name and
    /// [`DirectoryServiceError::Repository`] when the name is taken.
    pub async fn create_department(
        &self,
        actor: &Account,
        name: &str,
    ) -> DirectoryServiceResult<Department> {
        require_admin(actor, "create departments")?;
        let department_name = DepartmentName::new(name)?;
        if self
            .store
            .find_department_by_name(&department_name)
            .await?
            .is_some()
        {
            return Err(DirectoryRepositoryError::DuplicateDepartmentName(department_name).into());
        }
        let department = Department::new(department_name, &*self.clock);
        self.store.store_department(&department).await?;
        info!(department_id = %department.id(), name = %department.name(), "department created");
        Ok(department)
    }

    /// Lists every department.
    ///
    /// # Errors
    ///
    /// Returns [`DirectoryServiceError::Repository`] when lookup fails.
    pub async fn list_departments(&self) -> DirectoryServiceResult<Vec<Department>> {
        Ok(self.store.list_departments().await?)
    }

    /// Fails unless the department exists.
    ///
    /// # Errors
    ///
    /// Returns [`DirectoryServiceError::UnknownDepartment`] when it does not.
    pub async fn ensure_department(&self, id: DepartmentId) -> DirectoryServiceResult<()> {
        match self.store.find_department(id).await? {
            Some(_) => Ok(()),
            None => Err(DirectoryServiceError::UnknownDepartment(id)),
        }
    }
}
