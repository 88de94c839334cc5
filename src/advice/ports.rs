//! Port for the external text-generation collaborator.

use async_trait::async_trait;
use thiserror::Error;

/// Produces advisory text from a rendered prompt.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AdviceGenerator: Send + Sync {
    /// Generates advice for `prompt`.
    ///
    /// # Errors
    ///
    /// Returns [`AdviceError`] when the collaborator cannot answer.
    async fn generate(&self, prompt: &str) -> Result<String, AdviceError>;
}

/// Failures reported by an advice generator.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AdviceError {
    /// The collaborator could not produce an answer.
    #[error("advice collaborator unavailable: {0}")]
    Unavailable(String),
}
