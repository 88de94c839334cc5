//! Password and password-digest value types.

use super::DirectoryDomainError;
use serde::{Deserialize, Serialize};
use std::fmt;

const MIN_PASSWORD_LENGTH: usize = 6;

/// Plain-text password supplied at registration or login.
///
/// The value is never printed by `Debug`.
#[derive(Clone, PartialEq, Eq)]
pub struct Password(String);

impl Password {
    /// Wraps a password without validation, for login attempts.
    #[must_use]
    pub fn unchecked(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Creates a password that satisfies the registration policy.
    ///
    /// # Errors
    ///
    /// Returns [`DirectoryDomainError::PasswordTooShort`] when the value has
    /// fewer than six characters.
    pub fn new(value: impl Into<String>) -> Result<Self, DirectoryDomainError> {
        let raw = value.into();
        if raw.chars().count() < MIN_PASSWORD_LENGTH {
            return Err(DirectoryDomainError::PasswordTooShort {
                min: MIN_PASSWORD_LENGTH,
            });
        }
        Ok(Self(raw))
    }

    /// Exposes the secret for hashing.
    #[must_use]
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Password {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Password(***)")
    }
}

/// Opaque stored password digest produced by a
/// [`PasswordHasher`](crate::directory::ports::PasswordHasher).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PasswordHash(String);

impl PasswordHash {
    /// Wraps an encoded digest.
    #[must_use]
    pub fn new(encoded: impl Into<String>) -> Self {
        Self(encoded.into())
    }

    /// Returns the encoded digest.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}
