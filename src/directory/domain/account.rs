//! Account aggregate root.

use super::{
    AccountId, DepartmentId, DirectoryDomainError, EmailAddress, PasswordHash, Role,
};
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};
use std::fmt;

const MAX_FULL_NAME_LENGTH: usize = 100;

/// Validated, trimmed display name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FullName(String);

impl FullName {
    /// Creates a validated display name.
    ///
    /// # Errors
    ///
    /// Returns [`DirectoryDomainError::EmptyFullName`] when the value is blank
    /// or [`DirectoryDomainError::FullNameTooLong`] past 100 characters.
    pub fn new(value: impl Into<String>) -> Result<Self, DirectoryDomainError> {
        let raw = value.into();
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(DirectoryDomainError::EmptyFullName);
        }
        if trimmed.chars().count() > MAX_FULL_NAME_LENGTH {
            return Err(DirectoryDomainError::FullNameTooLong {
                max: MAX_FULL_NAME_LENGTH,
            });
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Returns the name as `str`.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for FullName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Validated fields for a freshly registered account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewAccount {
    /// Login email.
    pub email: EmailAddress,
    /// Stored password digest.
    pub password_hash: PasswordHash,
    /// Display name.
    pub full_name: FullName,
    /// Home department, if any.
    pub department_id: Option<DepartmentId>,
}

/// Account aggregate root.
///
/// Serializes without its password digest; persisted accounts are rebuilt
/// through [`Account::from_persisted`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Account {
    id: AccountId,
    email: EmailAddress,
    #[serde(skip_serializing)]
    password_hash: PasswordHash,
    full_name: FullName,
    role: Role,
    department_id: Option<DepartmentId>,
    is_active: bool,
    created_at: DateTime<Utc>,
}

/// Parameter object for reconstructing a persisted account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedAccountData {
    /// Persisted account identifier.
    pub id: AccountId,
    /// Persisted login email.
    pub email: EmailAddress,
    /// Persisted password digest.
    pub password_hash: PasswordHash,
    /// Persisted display name.
    pub full_name: FullName,
    /// Persisted role.
    pub role: Role,
    /// Persisted department reference.
    pub department_id: Option<DepartmentId>,
    /// Persisted active flag.
    pub is_active: bool,
    /// Persisted creation timestamp.
    pub created_at: DateTime<Utc>,
}

impl Account {
    /// Creates an active account with the given role.
    ///
    /// The role is decided by the registration service: the first account
    /// ever created is an admin, everyone else starts as an employee.
    #[must_use]
    pub fn register(fields: NewAccount, role: Role, clock: &impl Clock) -> Self {
        Self {
            id: AccountId::new(),
            email: fields.email,
            password_hash: fields.password_hash,
            full_name: fields.full_name,
            role,
            department_id: fields.department_id,
            is_active: true,
            created_at: clock.utc(),
        }
    }

    /// Reconstructs an account from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedAccountData) -> Self {
        Self {
            id: data.id,
            email: data.email,
            password_hash: data.password_hash,
            full_name: data.full_name,
            role: data.role,
            department_id: data.department_id,
            is_active: data.is_active,
            created_at: data.created_at,
        }
    }

    /// Returns the account identifier.
    #[must_use]
    pub const fn id(&self) -> AccountId {
        self.id
    }

    /// Returns the login email.
    #[must_use]
    pub const fn email(&self) -> &EmailAddress {
        &self.email
    }

    /// Returns the stored password digest.
    #[must_use]
    pub const fn password_hash(&self) -> &PasswordHash {
        &self.password_hash
    }

    /// Returns the display name.
    #[must_use]
    pub const fn full_name(&self) -> &FullName {
        &self.full_name
    }

    /// Returns the role.
    #[must_use]
    pub const fn role(&self) -> Role {
        self.role
    }

    /// Returns the home department, if any.
    #[must_use]
    pub const fn department_id(&self) -> Option<DepartmentId> {
        self.department_id
    }

    /// Returns whether the account may sign in.
    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.is_active
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Replaces the stored password digest.
    pub fn set_password_hash(&mut self, password_hash: PasswordHash) {
        self.password_hash = password_hash;
    }

    /// Applies administrative changes. Absent fields are left untouched.
    ///
    /// Authorization is the caller's concern; see
    /// [`authorize_account_edit`](super::authorize_account_edit).
    pub fn apply(&mut self, changes: AccountChanges) {
        if let Some(role) = changes.role {
            self.role = role;
        }
        if let Some(full_name) = changes.full_name {
            self.full_name = full_name;
        }
        if let Some(department_id) = changes.department_id {
            self.department_id = Some(department_id);
        }
    }
}

/// Proposed administrative changes to an account.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AccountChanges {
    /// New role, if changing.
    pub role: Option<Role>,
    /// New display name, if changing.
    pub full_name: Option<FullName>,
    /// New department, if changing.
    pub department_id: Option<DepartmentId>,
}

impl AccountChanges {
    /// Creates an empty change set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the proposed role.
    #[must_use]
    pub const fn with_role(mut self, role: Role) -> Self {
        self.role = Some(role);
        self
    }

    /// Sets the proposed display name.
    #[must_use]
    pub fn with_full_name(mut self, full_name: FullName) -> Self {
        self.full_name = Some(full_name);
        self
    }

    /// Sets the proposed department.
    #[must_use]
    pub const fn with_department(mut self, department_id: DepartmentId) -> Self {
        self.department_id = Some(department_id);
        self
    }
}
