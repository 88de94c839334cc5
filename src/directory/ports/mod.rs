//! Port contracts for the directory context.
//!
//! Ports define infrastructure-agnostic interfaces used by directory
//! services.

pub mod authenticator;
pub mod notifier;
pub mod password;
pub mod repository;

pub use authenticator::{AccessToken, AuthError, AuthResult, Authenticator, ResetToken};
pub use notifier::{NotifyError, ResetNotifier};
pub use password::{PasswordHashError, PasswordHasher};
pub use repository::{
    AccountRepository, DepartmentRepository, DirectoryRepositoryError, DirectoryRepositoryResult,
};
