//! Shared world state for founder immunity BDD scenarios.

use std::sync::Arc;

use chrono::{TimeDelta, TimeZone, Utc};
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

type ScenarioDesk = TaskDesk<
    InMemoryStore,
    InMemoryTokenAuthenticator<ManualClock>,
    Argon2PasswordHasher,
    ManualClock,
>;

const PASSWORD: &str = "founding-pass";

/// A registered, logged-in participant.
#[derive(Clone)]
pub struct Member {
    pub account: Account,
    pub token: AccessToken,
}

/// Scenario world for founder immunity behaviour tests.
pub struct FounderWorld {
    pub desk: ScenarioDesk,
    clock: Arc<ManualClock>,
    pub founder: Option<Member>,
    pub peer: Option<Member>,
    pub last_edit: Option<Result<Account, DeskError>>,
}

impl FounderWorld {
    /// Creates a world around an empty in-memory desk.
    #[must_use]
    pub fn new() -> Self {
        let start = Utc
            .with_ymd_and_hms(2026, 8, 3, 8, 0, 0)
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
            founder: None,
            peer: None,
            last_edit: None,
        }
    }

    /// Registers and logs in an account.
    ///
    /// # Errors
    ///
    /// Returns the desk error when registration or login fails.
    pub fn enrol(&self, email: &str) -> Result<Member, DeskError> {
        self.clock.advance(TimeDelta::seconds(1));
        let account = run_async(self.desk.register(RegisterAccountRequest::new(
            email,
            PASSWORD,
            "Founding Member",
        )))?;
        let token = run_async(self.desk.authenticate(email, PASSWORD))?;
        Ok(Member { account, token })
    }

    /// Logs an existing account in again.
    ///
    /// # Errors
    ///
    /// Returns the desk error when login fails.
    pub fn relogin(&self, email: &str) -> Result<AccessToken, DeskError> {
        run_async(self.desk.authenticate(email, PASSWORD))
    }

    /// Returns the registered founder.
    ///
    /// # Errors
    ///
    /// Returns an error when no founder has registered.
    pub fn founder(&self) -> Result<&Member, eyre::Report> {
        self.founder
            .as_ref()
            .ok_or_else(|| eyre::eyre!("missing founder in scenario world"))
    }
}

impl Default for FounderWorld {
    fn default() -> Self {
        Self::new()
    }
}

/// Fixture that creates a new scenario world.
#[fixture]
pub fn world() -> FounderWorld {
    FounderWorld::default()
}

/// Runs an async operation within sync step definitions.
pub fn run_async<T>(future: impl std::future::Future<Output = T>) -> T {
    tokio::task::block_in_place(|| tokio::runtime::Handle::current().block_on(future))
}
