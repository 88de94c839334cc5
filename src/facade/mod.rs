//! Caller-facing entry point.
//!
//! [`TaskDesk`] resolves the acting account from an opaque access token on
//! every call, delegates to the directory and task services, and reports
//! failures through the flat [`DeskError`] taxonomy.

mod desk;
mod error;

pub use desk::{DeskResult, TaskDesk};
pub use error::DeskError;
