//! Credential adapters for the directory context.

mod notifier;
mod password;
mod tokens;

pub use notifier::LogResetNotifier;
pub use password::Argon2PasswordHasher;
pub use tokens::InMemoryTokenAuthenticator;
