//! Authentication collaborator port.
//!
//! Token issuance mechanics are an adapter concern; the core only needs to
//! turn an opaque credential back into an account identifier.

use crate::directory::domain::AccountId;
use async_trait::async_trait;
use std::fmt;
use std::sync::Arc;
use thiserror::Error;

/// Opaque bearer credential.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct AccessToken(String);

impl AccessToken {
    /// Wraps a raw token string.
    #[must_use]
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Returns the raw token string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AccessToken(***)")
    }
}

/// Single-use credential that authorizes one password change.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct ResetToken(String);

impl ResetToken {
    /// Wraps a raw token string.
    #[must_use]
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Returns the raw token string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for ResetToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ResetToken(***)")
    }
}

/// Result type for authenticator operations.
pub type AuthResult<T> = Result<T, AuthError>;

/// Issues and resolves access tokens.
#[async_trait]
pub trait Authenticator: Send + Sync {
    /// Issues a fresh token for an authenticated account.
    async fn issue(&self, account_id: AccountId) -> AuthResult<AccessToken>;

    /// Resolves a token to the account it was issued for.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::InvalidCredential`] when the token is unknown or
    /// expired.
    async fn resolve(&self, token: &AccessToken) -> AuthResult<AccountId>;

    /// Issues a password-reset token for `account_id`.
    async fn issue_reset(&self, account_id: AccountId) -> AuthResult<ResetToken>;

    /// Consumes a reset token and returns the account it was issued for.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::InvalidCredential`] when the token is unknown,
    /// expired or already used.
    async fn redeem_reset(&self, token: &ResetToken) -> AuthResult<AccountId>;
}

/// Errors returned by authenticator implementations.
#[derive(Debug, Clone, Error)]
pub enum AuthError {
    /// The credential is unknown, malformed or expired.
    #[error("could not validate credentials")]
    InvalidCredential,

    /// The token backend failed.
    #[error("authentication backend error: {0}")]
    Backend(Arc<dyn std::error::Error + Send + Sync>),
}

impl AuthError {
    /// Wraps a backend failure.
    pub fn backend(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Backend(Arc::new(err))
    }
}
