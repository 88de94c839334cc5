//! Storage adapters shared by the directory and task contexts.
//!
//! Each store implements [`crate::task::ports::TaskRepository`],
//! [`crate::directory::ports::AccountRepository`] and
//! [`crate::directory::ports::DepartmentRepository`], so a single handle is
//! constructed at startup and threaded through every service.

pub mod memory;
pub mod postgres;

pub use memory::InMemoryStore;
pub use postgres::{PostgresSetupError, PostgresStore, StorePgPool, build_pool};
