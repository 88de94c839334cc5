//! Domain model for accounts, departments and administrative policy.
//!
//! All types here are infrastructure-free. Persistence and credential
//! handling live behind the contracts in [`crate::directory::ports`].

mod account;
mod credentials;
mod department;
mod email;
mod error;
mod ids;
mod policy;
mod role;

pub use account::{Account, AccountChanges, FullName, NewAccount, PersistedAccountData};
pub use credentials::{Password, PasswordHash};
pub use department::{Department, DepartmentName};
pub use email::EmailAddress;
pub use error::{DirectoryDomainError, ParseRoleError};
pub use ids::{AccountId, DepartmentId};
pub use policy::{AccessError, authorize_account_edit, founder_of, require_admin};
pub use role::Role;
