//! Administrative authorization and founder immunity.
//!
//! The founder is the account with the earliest creation timestamp, with the
//! account identifier as a tie-break. It is derived on every check rather
//! than stored, so it cannot drift from account history.
//!
//! Rules applied by [`authorize_account_edit`], in order:
//!
//! 1. Nobody but the founder may modify the founder's record
//!    ([`AccessError::FounderProtected`]).
//! 2. Only admins may edit accounts ([`AccessError::NotAuthorized`]).
//! 3. The founder may not move themself off the admin role
//!    ([`AccessError::SelfDemotionForbidden`]).

use super::{Account, AccountChanges, Role};
use thiserror::Error;

/// Authorization denials.
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
pub enum AccessError {
    /// The acting account's role does not permit the action.
    #[error("not authorized to {0}")]
    NotAuthorized(&'static str),

    /// Someone other than the founder attempted to modify the founder.
    #[error("the system founder can only be modified by themself")]
    FounderProtected,

    /// The founder attempted to give up the admin role.
    #[error("the system founder cannot change their own role")]
    SelfDemotionForbidden,
}

/// Returns the founder among `accounts`: earliest `created_at`, then lowest
/// identifier.
#[must_use]
pub fn founder_of<'a>(accounts: impl IntoIterator<Item = &'a Account>) -> Option<&'a Account> {
    accounts
        .into_iter()
        .min_by_key(|account| (account.created_at(), account.id()))
}

/// Fails unless `actor` is an admin.
///
/// # Errors
///
/// Returns [`AccessError::NotAuthorized`] naming `action`.
pub const fn require_admin(actor: &Account, action: &'static str) -> Result<(), AccessError> {
    if actor.role().is_admin() {
        Ok(())
    } else {
        Err(AccessError::NotAuthorized(action))
    }
}

/// Decides whether `actor` may apply `changes` to `target`.
///
/// Field-level validation (for example, that a new department exists) is
/// left to the caller and runs after this check.
///
/// # Errors
///
/// Returns the [`AccessError`] for the first rule that denies the edit.
pub fn authorize_account_edit(
    actor: &Account,
    target: &Account,
    founder: &Account,
    changes: &AccountChanges,
) -> Result<(), AccessError> {
    let target_is_founder = target.id() == founder.id();
    if target_is_founder && actor.id() != founder.id() {
        return Err(AccessError::FounderProtected);
    }

    require_admin(actor, "edit accounts")?;

    if target_is_founder && changes.role.is_some_and(|role| role != Role::Admin) {
        return Err(AccessError::SelfDemotionForbidden);
    }
    Ok(())
}
