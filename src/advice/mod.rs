//! Advisory task analysis.
//!
//! Analysis is a convenience that never blocks the task workflow: when no
//! generator is configured, or the generator fails, [`AdviceService`]
//! answers with a fixed local text instead of an error.

pub mod ports;
pub mod service;

pub use ports::{AdviceError, AdviceGenerator};
pub use service::{AdviceService, FALLBACK_NOTE, OFFLINE_NOTICE, TaskContext};
