//! Caller-visible failure taxonomy.

use crate::directory::{
    domain::AccessError,
    ports::{AuthError, DirectoryRepositoryError},
    services::DirectoryServiceError,
};
use crate::task::{
    domain::TaskDomainError, ports::TaskRepositoryError, services::TaskLifecycleError,
};
use thiserror::Error;

/// Structured failure returned by every [`super::TaskDesk`] operation.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum DeskError {
    /// The caller's role does not permit the operation, or the task lies
    /// outside the caller's visibility scope.
    #[error("{0}")]
    NotAuthorized(String),

    /// Someone other than the founder tried to modify the founder.
    #[error("the system founder can only be modified by themself")]
    FounderProtected,

    /// The founder tried to give up the admin role.
    #[error("the system founder cannot change their own role")]
    SelfDemotionForbidden,

    /// The owner was proposed as executor.
    #[error("{0}")]
    InvalidAssignment(String),

    /// The task is done or cancelled.
    #[error("{0}")]
    TaskFinished(String),

    /// A referenced entity does not exist.
    #[error("{0}")]
    NotFound(String),

    /// A field-level constraint was violated.
    #[error("{0}")]
    ValidationFailed(String),

    /// The storage or authentication backend failed.
    #[error("storage unavailable: {0}")]
    StorageUnavailable(String),

    /// The credential did not identify an active account.
    #[error("could not validate credentials")]
    InvalidCredential,
}

impl DeskError {
    /// Stable machine-readable code for transport layers.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::NotAuthorized(_) => "not_authorized",
            Self::FounderProtected => "founder_protected",
            Self::SelfDemotionForbidden => "self_demotion_forbidden",
            Self::InvalidAssignment(_) => "invalid_assignment",
            Self::TaskFinished(_) => "task_finished",
            Self::NotFound(_) => "not_found",
            Self::ValidationFailed(_) => "validation_failed",
            Self::StorageUnavailable(_) => "storage_unavailable",
            Self::InvalidCredential => "invalid_credential",
        }
    }
}

impl From<AccessError> for DeskError {
    fn from(err: AccessError) -> Self {
        match err {
            AccessError::NotAuthorized(_) => Self::NotAuthorized(err.to_string()),
            AccessError::FounderProtected => Self::FounderProtected,
            AccessError::SelfDemotionForbidden => Self::SelfDemotionForbidden,
        }
    }
}

impl From<AuthError> for DeskError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::InvalidCredential => Self::InvalidCredential,
            AuthError::Backend(_) => Self::StorageUnavailable(err.to_string()),
        }
    }
}

impl From<DirectoryRepositoryError> for DeskError {
    fn from(err: DirectoryRepositoryError) -> Self {
        match err {
            DirectoryRepositoryError::DuplicateEmail(_)
            | DirectoryRepositoryError::DuplicateDepartmentName(_) => {
                Self::ValidationFailed(err.to_string())
            }
            DirectoryRepositoryError::AccountNotFound(_) => Self::NotFound(err.to_string()),
            DirectoryRepositoryError::DuplicateAccount(_)
            | DirectoryRepositoryError::InvalidPersistedData(_)
            | DirectoryRepositoryError::Persistence(_) => Self::StorageUnavailable(err.to_string()),
        }
    }
}

impl From<TaskRepositoryError> for DeskError {
    fn from(err: TaskRepositoryError) -> Self {
        match err {
            TaskRepositoryError::NotFound(_) => Self::NotFound(err.to_string()),
            TaskRepositoryError::DuplicateTask(_)
            | TaskRepositoryError::InvalidPersistedData(_)
            | TaskRepositoryError::Persistence(_) => Self::StorageUnavailable(err.to_string()),
        }
    }
}

impl From<TaskDomainError> for DeskError {
    fn from(err: TaskDomainError) -> Self {
        match err {
            TaskDomainError::InvalidAssignment { .. } => Self::InvalidAssignment(err.to_string()),
            TaskDomainError::TaskFinished { .. } => Self::TaskFinished(err.to_string()),
            TaskDomainError::InvalidTitle
            | TaskDomainError::DeadlineInPast
            | TaskDomainError::InvalidBudget(_)
            | TaskDomainError::EmptyComment => Self::ValidationFailed(err.to_string()),
        }
    }
}

impl From<DirectoryServiceError> for DeskError {
    fn from(err: DirectoryServiceError) -> Self {
        match err {
            DirectoryServiceError::Domain(inner) => Self::ValidationFailed(inner.to_string()),
            DirectoryServiceError::Access(inner) => inner.into(),
            DirectoryServiceError::Repository(inner) => inner.into(),
            DirectoryServiceError::InvalidCredentials => Self::InvalidCredential,
            DirectoryServiceError::UnknownDepartment(_) => Self::ValidationFailed(err.to_string()),
            DirectoryServiceError::Hashing(inner) => Self::StorageUnavailable(inner.to_string()),
        }
    }
}

impl From<TaskLifecycleError> for DeskError {
    fn from(err: TaskLifecycleError) -> Self {
        match err {
            TaskLifecycleError::Domain(inner) => inner.into(),
            TaskLifecycleError::Access(inner) => inner.into(),
            TaskLifecycleError::Repository(inner) => inner.into(),
            TaskLifecycleError::Directory(inner) => inner.into(),
            TaskLifecycleError::UnknownDepartment(_) => Self::ValidationFailed(err.to_string()),
            TaskLifecycleError::UnknownAccount(_) => Self::NotFound(err.to_string()),
        }
    }
}
