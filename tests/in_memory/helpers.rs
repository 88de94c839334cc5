//! Shared builders for in-memory integration tests.

use std::sync::Arc;

use chrono::{DateTime, TimeZone, Utc};
use rstest::fixture;
use taskguard::clock::ManualClock;
use taskguard::config::AppConfig;
use taskguard::directory::{
    adapters::{Argon2PasswordHasher, InMemoryTokenAuthenticator},
    domain::{
        Account, AccountId, DepartmentId, EmailAddress, FullName, NewAccount, PasswordHash, Role,
    },
    ports::AccessToken,
    services::RegisterAccountRequest,
};
use taskguard::facade::TaskDesk;
use taskguard::storage::InMemoryStore;
use taskguard::task::domain::{Budget, NewTask, Priority, Task, TaskTitle};

/// Desk wired to in-memory collaborators.
pub type MemoryDesk = TaskDesk<
    InMemoryStore,
    InMemoryTokenAuthenticator<ManualClock>,
    Argon2PasswordHasher,
    ManualClock,
>;

/// Password used by every account the helpers register.
pub const PASSWORD: &str = "correct horse";

/// Fixed starting instant.
pub fn start() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 6, 1, 9, 0, 0)
        .single()
        .expect("valid timestamp")
}

/// Provides a manual clock at [`start`].
#[fixture]
pub fn clock() -> Arc<ManualClock> {
    Arc::new(ManualClock::new(start()))
}

/// Provides an empty store.
#[fixture]
pub fn store() -> InMemoryStore {
    InMemoryStore::new()
}

/// Builds an account that has not been stored.
pub fn account(
    email: &str,
    role: Role,
    department_id: Option<DepartmentId>,
    clock: &ManualClock,
) -> Account {
    Account::register(
        NewAccount {
            email: EmailAddress::new(email).expect("valid email"),
            password_hash: PasswordHash::new("sha256$feed$beef"),
            full_name: FullName::new("Store Tester").expect("valid name"),
            department_id,
        },
        role,
        clock,
    )
}

/// Builds a task that has not been stored.
pub fn task(
    title: &str,
    owner_id: AccountId,
    target_dept_id: Option<DepartmentId>,
    clock: &ManualClock,
) -> Task {
    Task::create(
        NewTask {
            title: TaskTitle::new(title).expect("valid title"),
            description: None,
            owner_id,
            target_dept_id,
            priority: Priority::Medium,
            deadline: None,
            budget: Budget::default(),
        },
        clock,
    )
    .expect("valid task")
}

/// A desk plus the clock driving it.
pub struct Office {
    /// Facade under test.
    pub desk: MemoryDesk,
    /// Clock shared by every collaborator.
    pub clock: Arc<ManualClock>,
}

impl Office {
    /// Registers an account and logs it in.
    pub async fn join(&self, request: RegisterAccountRequest) -> (Account, AccessToken) {
        self.clock.advance(chrono::TimeDelta::seconds(1));
        let account = self
            .desk
            .register(request)
            .await
            .expect("registration should succeed");
        let token = self
            .desk
            .authenticate(account.email().as_str(), PASSWORD)
            .await
            .expect("login should succeed");
        (account, token)
    }
}

/// Provides a desk over a fresh in-memory store.
#[fixture]
pub fn office() -> Office {
    let clock = Arc::new(ManualClock::new(start()));
    let config = AppConfig::default();
    let authenticator = Arc::new(InMemoryTokenAuthenticator::new(
        Arc::clone(&clock),
        config.token_ttl(),
    ));
    let desk = TaskDesk::new(
        Arc::new(InMemoryStore::new()),
        authenticator,
        Arc::new(Argon2PasswordHasher::new()),
        Arc::clone(&clock),
        config,
    );
    Office { desk, clock }
}

/// Registration request using [`PASSWORD`].
pub fn registration(email: &str, full_name: &str) -> RegisterAccountRequest {
    RegisterAccountRequest::new(email, PASSWORD, full_name)
}
