//! Argon2id password hasher.

use crate::directory::{
    domain::{Password, PasswordHash},
    ports::{PasswordHashError, PasswordHasher},
};
use argon2::{
    Argon2,
    password_hash::{
        PasswordHash as PhcString, PasswordHasher as _, PasswordVerifier as _, SaltString,
    },
};
use uuid::Uuid;

/// Stores passwords as Argon2id PHC strings with a random 128-bit salt.
#[derive(Debug, Clone, Copy, Default)]
pub struct Argon2PasswordHasher;

impl Argon2PasswordHasher {
    /// Creates a hasher with the default Argon2id parameters.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl PasswordHasher for Argon2PasswordHasher {
    fn hash(&self, password: &Password) -> Result<PasswordHash, PasswordHashError> {
        let salt = SaltString::encode_b64(Uuid::new_v4().as_bytes())
            .map_err(|err| PasswordHashError::new(err.to_string()))?;
        let phc = Argon2::default()
            .hash_password(password.expose().as_bytes(), &salt)
            .map_err(|err| PasswordHashError::new(err.to_string()))?;
        Ok(PasswordHash::new(phc.to_string()))
    }

    fn verify(&self, password: &Password, stored: &PasswordHash) -> bool {
        let Ok(parsed) = PhcString::new(stored.as_str()) else {
            return false;
        };
        Argon2::default()
            .verify_password(password.expose().as_bytes(), &parsed)
            .is_ok()
    }
}
