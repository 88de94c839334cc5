//! Taskguard: task tracking with role-scoped visibility and a protected
//! founder account.
//!
//! The crate centres on three rule sets:
//!
//! - which tasks an account may see, decided by role and department
//!   ([`task::domain::VisibilityScope`]);
//! - how a task moves through its lifecycle ([`task::domain::Task`]);
//! - who may edit whom, including the founder-immunity rules
//!   ([`directory::domain::authorize_account_edit`]).
//!
//! # Architecture
//!
//! Each bounded context follows hexagonal architecture:
//!
//! - **Domain**: Pure business logic with no infrastructure dependencies
//! - **Ports**: Abstract trait interfaces for external interactions
//! - **Adapters**: Concrete implementations of ports
//!
//! # Modules
//!
//! - [`directory`]: Accounts, departments, registration and credentials
//! - [`task`]: Tasks, comments, visibility and lifecycle
//! - [`advice`]: Optional advisory analysis with a local fallback
//! - [`storage`]: In-memory and `PostgreSQL` stores
//! - [`facade`]: Token-authenticated entry point and error taxonomy
//! - [`config`], [`telemetry`], [`clock`]: Ambient concerns

pub mod advice;
pub mod clock;
pub mod config;
pub mod directory;
pub mod facade;
pub mod storage;
pub mod task;
pub mod telemetry;
