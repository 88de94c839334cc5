//! Shared world state for task lifecycle BDD scenarios.

use std::sync::Arc;

use chrono::{TimeZone, Utc};
use rstest::fixture;
use taskguard::clock::ManualClock;
use taskguard::config::AppConfig;
use taskguard::directory::{
    adapters::{Argon2PasswordHasher, InMemoryTokenAuthenticator},
    domain::Account,
    ports::AccessToken,
    services::RegisterAccountRequest,
};
use taskguard::facade::{DeskError, TaskDesk};
use taskguard::storage::InMemoryStore;
use taskguard::task::domain::Task;

/// Desk type used by the scenarios.
pub type ScenarioDesk = TaskDesk<
    InMemoryStore,
    InMemoryTokenAuthenticator<ManualClock>,
    Argon2PasswordHasher,
    ManualClock,
>;

const PASSWORD: &str = "scenario-pass";

/// Scenario world for task lifecycle behaviour tests.
pub struct TaskLifecycleWorld {
    pub desk: ScenarioDesk,
    pub clock: Arc<ManualClock>,
    pub owner: Option<(Account, AccessToken)>,
    pub colleague: Option<Account>,
    pub task: Option<Task>,
    pub last_outcome: Option<Result<(), DeskError>>,
}

impl TaskLifecycleWorld {
    /// Creates a world around an empty in-memory desk.
    #[must_use]
    pub fn new() -> Self {
        let start = Utc
            .with_ymd_and_hms(2026, 7, 1, 10, 0, 0)
            .single()
            .expect("valid timestamp");
        let clock = Arc::new(ManualClock::new(start));
        let config = AppConfig::default();
        let desk = TaskDesk::new(
            Arc::new(InMemoryStore::new()),
            Arc::new(InMemoryTokenAuthenticator::new(
                Arc::clone(&clock),
                config.token_ttl(),
            )),
            Arc::new(Argon2PasswordHasher::new()),
            Arc::clone(&clock),
            config,
        );
        Self {
            desk,
            clock,
            owner: None,
            colleague: None,
            task: None,
            last_outcome: None,
        }
    }

    /// Registers and logs in an account.
    ///
    /// # Errors
    ///
    /// Returns the desk error when registration or login fails.
    pub fn enrol(&self, email: &str) -> Result<(Account, AccessToken), DeskError> {
        self.clock.advance(chrono::TimeDelta::seconds(1));
        let account = run_async(self.desk.register(RegisterAccountRequest::new(
            email,
            PASSWORD,
            "Scenario Person",
        )))?;
        let token = run_async(self.desk.authenticate(email, PASSWORD))?;
        Ok((account, token))
    }

    /// Returns the owner's token and the task under test.
    ///
    /// # Errors
    ///
    /// Returns an error when the scenario has not created a task yet.
    pub fn owner_and_task(&self) -> Result<(AccessToken, Task), eyre::Report> {
        let (_, token) = self
            .owner
            .clone()
            .ok_or_else(|| eyre::eyre!("missing task owner in scenario world"))?;
        let task = self
            .task
            .clone()
            .ok_or_else(|| eyre::eyre!("missing task in scenario world"))?;
        Ok((token, task))
    }
}

impl Default for TaskLifecycleWorld {
    fn default() -> Self {
        Self::new()
    }
}

/// Fixture that creates a new scenario world.
#[fixture]
pub fn world() -> TaskLifecycleWorld {
    TaskLifecycleWorld::default()
}

/// Runs an async operation within sync step definitions.
pub fn run_async<T>(future: impl std::future::Future<Output = T>) -> T {
    tokio::task::block_in_place(|| tokio::runtime::Handle::current().block_on(future))
}
