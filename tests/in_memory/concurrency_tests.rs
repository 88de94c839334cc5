//! Parallel writers sharing one in-memory store.

use std::sync::Arc;

use super::helpers::{account, clock, registration};
use rstest::rstest;
use taskguard::clock::ManualClock;
use taskguard::directory::{
    adapters::Argon2PasswordHasher, domain::Role, ports::AccountRepository,
    services::DirectoryService,
};
use taskguard::storage::InMemoryStore;
use taskguard::task::{
    domain::{Page, TaskFilter},
    services::{CreateTaskRequest, TaskLifecycleService},
};

#[rstest]
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn parallel_task_creation_loses_nothing(clock: Arc<ManualClock>) {
    let store = Arc::new(InMemoryStore::new());
    let admin = account("admin@example.com", Role::Admin, None, &clock);
    store.store_account(&admin).await.expect("store admin");
    let service = Arc::new(TaskLifecycleService::new(Arc::clone(&store), clock));

    let mut handles = Vec::new();
    for index in 0..32 {
        let worker_service = Arc::clone(&service);
        let actor = admin.clone();
        handles.push(tokio::spawn(async move {
            worker_service
                .create_task(&actor, CreateTaskRequest::new(format!("Parallel task {index}")))
                .await
        }));
    }
    for handle in handles {
        handle
            .await
            .expect("task should not panic")
            .expect("creation should succeed");
    }

    let listed = service
        .list_visible_tasks(&admin, TaskFilter::new(), Page::new(100, 0))
        .await
        .expect("listing");
    assert_eq!(listed.len(), 32);
}

#[rstest]
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn parallel_registration_keeps_emails_unique(clock: Arc<ManualClock>) {
    let store = Arc::new(InMemoryStore::new());
    let service = Arc::new(DirectoryService::new(
        Arc::clone(&store),
        Arc::new(Argon2PasswordHasher::new()),
        clock,
    ));

    let mut handles = Vec::new();
    for _ in 0..8 {
        let worker_service = Arc::clone(&service);
        handles.push(tokio::spawn(async move {
            worker_service
                .register(registration("race@example.com", "Racing Person"))
                .await
        }));
    }
    let mut winners = 0;
    for handle in handles {
        if handle.await.expect("task should not panic").is_ok() {
            winners += 1;
        }
    }

    assert_eq!(winners, 1);
    assert_eq!(store.list_accounts().await.expect("list").len(), 1);
}
