//! `PostgreSQL` adapters for the taskguard store.

mod models;
mod repository;
mod schema;

pub use repository::{PostgresSetupError, PostgresStore, StorePgPool, build_pool};
