//! Error types for directory domain validation and parsing.

use thiserror::Error;

/// Errors returned while constructing directory domain values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum DirectoryDomainError {
    /// The email address is malformed.
    #[error("invalid email address '{0}'")]
    InvalidEmail(String),

    /// The full name is empty after trimming.
    #[error("full name must not be empty")]
    EmptyFullName,

    /// The full name exceeds the storage limit.
    #[error("full name exceeds {max} characters")]
    FullNameTooLong {
        /// Maximum accepted length.
        max: usize,
    },

    /// The department name is shorter or longer than permitted.
    #[error("department name '{0}' must be between 2 and 100 characters")]
    InvalidDepartmentName(String),

    /// The password is shorter than the accepted minimum.
    #[error("password must be at least {min} characters")]
    PasswordTooShort {
        /// Minimum accepted length.
        min: usize,
    },
}

/// Error returned while parsing roles from persistence or requests.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown role: {0}")]
pub struct ParseRoleError(pub String);
