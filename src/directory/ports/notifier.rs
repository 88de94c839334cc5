//! Delivery port for password-reset tokens.

use crate::directory::{domain::EmailAddress, ports::ResetToken};
use async_trait::async_trait;
use thiserror::Error;

/// Hands a reset token to the account holder out of band.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ResetNotifier: Send + Sync {
    /// Delivers `token` to `email`.
    ///
    /// # Errors
    ///
    /// Returns [`NotifyError`] when the message could not be sent.
    async fn deliver(&self, email: &EmailAddress, token: &ResetToken) -> Result<(), NotifyError>;
}

/// Delivery failure.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("reset delivery failed: {0}")]
pub struct NotifyError(String);

impl NotifyError {
    /// Wraps a delivery failure message.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}
