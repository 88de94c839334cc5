//! In-memory access and password-reset token store with expiry.

use async_trait::async_trait;
use chrono::{DateTime, TimeDelta, Utc};
use mockable::Clock;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use uuid::Uuid;

use crate::directory::{
    domain::AccountId,
    ports::{AccessToken, AuthError, AuthResult, Authenticator, ResetToken},
};

/// Lifetime of a password-reset token.
const RESET_TOKEN_TTL: TimeDelta = TimeDelta::minutes(15);

/// Issues random opaque tokens and remembers them until they expire.
///
/// Reset tokens live in a separate table, so they never authenticate a
/// request, and each one is removed when redeemed.
#[derive(Debug)]
pub struct InMemoryTokenAuthenticator<C>
where
    C: Clock + Send + Sync,
{
    clock: Arc<C>,
    ttl: TimeDelta,
    tokens: RwLock<HashMap<String, IssuedToken>>,
    resets: RwLock<HashMap<String, IssuedToken>>,
}

#[derive(Debug, Clone, Copy)]
struct IssuedToken {
    account_id: AccountId,
    expires_at: DateTime<Utc>,
}

impl<C> InMemoryTokenAuthenticator<C>
where
    C: Clock + Send + Sync,
{
    /// Creates an authenticator whose tokens live for `ttl`.
    #[must_use]
    pub fn new(clock: Arc<C>, ttl: TimeDelta) -> Self {
        Self {
            clock,
            ttl,
            tokens: RwLock::new(HashMap::new()),
            resets: RwLock::new(HashMap::new()),
        }
    }

    fn remember(
        &self,
        table: &RwLock<HashMap<String, IssuedToken>>,
        account_id: AccountId,
        ttl: TimeDelta,
    ) -> AuthResult<String> {
        let raw = format!("{}{}", Uuid::new_v4().simple(), Uuid::new_v4().simple());
        let now = self.clock.utc();
        let issued = IssuedToken {
            account_id,
            expires_at: now + ttl,
        };
        let mut entries = table.write().map_err(poisoned)?;
        entries.retain(|_, token| token.expires_at > now);
        entries.insert(raw.clone(), issued);
        Ok(raw)
    }
}

fn poisoned<T>(err: std::sync::PoisonError<T>) -> AuthError {
    AuthError::backend(std::io::Error::other(err.to_string()))
}

#[async_trait]
impl<C> Authenticator for InMemoryTokenAuthenticator<C>
where
    C: Clock + Send + Sync,
{
    async fn issue(&self, account_id: AccountId) -> AuthResult<AccessToken> {
        self.remember(&self.tokens, account_id, self.ttl)
            .map(AccessToken::new)
    }

    async fn resolve(&self, token: &AccessToken) -> AuthResult<AccountId> {
        let tokens = self.tokens.read().map_err(poisoned)?;
        match tokens.get(token.as_str()) {
            Some(issued) if issued.expires_at > self.clock.utc() => Ok(issued.account_id),
            _ => Err(AuthError::InvalidCredential),
        }
    }

    async fn issue_reset(&self, account_id: AccountId) -> AuthResult<ResetToken> {
        self.remember(&self.resets, account_id, RESET_TOKEN_TTL)
            .map(ResetToken::new)
    }

    async fn redeem_reset(&self, token: &ResetToken) -> AuthResult<AccountId> {
        let mut resets = self.resets.write().map_err(poisoned)?;
        match resets.remove(token.as_str()) {
            Some(issued) if issued.expires_at > self.clock.utc() => Ok(issued.account_id),
            _ => Err(AuthError::InvalidCredential),
        }
    }
}
