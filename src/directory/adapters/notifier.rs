//! Reset delivery that writes the token to the log.

use async_trait::async_trait;
use tracing::info;

use crate::directory::{
    domain::EmailAddress,
    ports::{NotifyError, ResetNotifier, ResetToken},
};

/// Stands in for a mail gateway by logging each reset token.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogResetNotifier;

impl LogResetNotifier {
    /// Creates the notifier.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

#[async_trait]
impl ResetNotifier for LogResetNotifier {
    async fn deliver(&self, email: &EmailAddress, token: &ResetToken) -> Result<(), NotifyError> {
        info!(email = %email, reset_token = token.as_str(), "password reset token issued");
        Ok(())
    }
}
