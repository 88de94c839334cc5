//! Task tracking: tasks, comments, role-scoped visibility and the lifecycle
//! state machine.
//!
//! The module follows hexagonal architecture:
//!
//! - Domain types, the visibility predicate and lifecycle guards in [`domain`]
//! - Port contracts in [`ports`]
//! - Orchestration services in [`services`]
//!
//! Storage adapters live in [`crate::storage`] because one store backs both
//! the task and directory contexts.

pub mod domain;
pub mod ports;
pub mod services;
