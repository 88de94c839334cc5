//! Password hashing port.

use crate::directory::domain::{Password, PasswordHash};
use thiserror::Error;

/// The hasher could not produce a digest.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("password hashing failed: {0}")]
pub struct PasswordHashError(String);

impl PasswordHashError {
    /// Wraps a backend failure message.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

/// One-way password digest contract.
pub trait PasswordHasher: Send + Sync {
    /// Produces a salted digest for storage.
    ///
    /// # Errors
    ///
    /// Returns [`PasswordHashError`] when the backend rejects its inputs.
    fn hash(&self, password: &Password) -> Result<PasswordHash, PasswordHashError>;

    /// Returns `true` when `password` matches the stored digest.
    fn verify(&self, password: &Password, stored: &PasswordHash) -> bool;
}
