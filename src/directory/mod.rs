//! Accounts, departments and administrative policy.
//!
//! This module owns registration (first account becomes the admin
//! founder), credential checks, department management and the
//! founder-immunity rules that guard administrative account edits. It
//! follows hexagonal architecture:
//!
//! - Domain types in [`domain`]
//! - Port contracts in [`ports`]
//! - Credential adapters in [`adapters`]
//! - Orchestration services in [`services`]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
