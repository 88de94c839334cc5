//! Task, comment and listing behaviour of the in-memory store.

use std::sync::Arc;

use super::helpers::{clock, store, task};
use chrono::TimeDelta;
use rstest::rstest;
use taskguard::clock::ManualClock;
use taskguard::directory::domain::{AccountId, DepartmentId};
use taskguard::task::{
    domain::{
        Comment, CommentText, Page, TaskFilter, TaskId, TaskQuery, TaskStatus, VisibilityScope,
    },
    ports::{TaskRepository, TaskRepositoryError},
};
use taskguard::storage::InMemoryStore;

fn everything(limit: u32, offset: u32) -> TaskQuery {
    TaskQuery {
        scope: VisibilityScope::All,
        filter: TaskFilter::new(),
        page: Page::new(limit, offset),
    }
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn tasks_are_stored_once(store: InMemoryStore, clock: Arc<ManualClock>) {
    let stored = task("Store me", AccountId::new(), None, &clock);
    store.store_task(&stored).await.expect("first store");

    let again = store.store_task(&stored).await;

    assert!(matches!(again, Err(TaskRepositoryError::DuplicateTask(id)) if id == stored.id()));
    let found = store.find_task(stored.id()).await.expect("find");
    assert_eq!(found, Some(stored));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn updates_require_an_existing_task(store: InMemoryStore, clock: Arc<ManualClock>) {
    let mut missing = task("Never stored", AccountId::new(), None, &clock);
    missing
        .update_status(TaskStatus::OnReview, &*clock)
        .expect("open task");

    let result = store.update_task(&missing).await;

    assert!(matches!(result, Err(TaskRepositoryError::NotFound(_))));
    assert!(store.find_task(missing.id()).await.expect("find").is_none());
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn last_update_wins(store: InMemoryStore, clock: Arc<ManualClock>) {
    let original = task("Contended", AccountId::new(), None, &clock);
    store.store_task(&original).await.expect("store");

    let mut reviewer_copy = original.clone();
    let mut canceller_copy = original.clone();
    reviewer_copy
        .update_status(TaskStatus::OnReview, &*clock)
        .expect("open task");
    canceller_copy
        .update_status(TaskStatus::Cancelled, &*clock)
        .expect("open task");
    store.update_task(&reviewer_copy).await.expect("first update");
    store.update_task(&canceller_copy).await.expect("second update");

    let current = store
        .find_task(original.id())
        .await
        .expect("find")
        .expect("task present");
    assert_eq!(current.status(), TaskStatus::Cancelled);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn listing_is_newest_first_and_paged(store: InMemoryStore, clock: Arc<ManualClock>) {
    let owner = AccountId::new();
    let mut ids = Vec::new();
    for index in 0..5 {
        clock.advance(TimeDelta::seconds(1));
        let created = task(&format!("Paged task {index}"), owner, None, &clock);
        store.store_task(&created).await.expect("store");
        ids.push(created.id());
    }
    ids.reverse();

    let first_page: Vec<TaskId> = store
        .query_tasks(&everything(2, 0))
        .await
        .expect("query")
        .iter()
        .map(|found| found.id())
        .collect();
    let last_page: Vec<TaskId> = store
        .query_tasks(&everything(2, 4))
        .await
        .expect("query")
        .iter()
        .map(|found| found.id())
        .collect();

    assert_eq!(first_page, ids.iter().take(2).copied().collect::<Vec<_>>());
    assert_eq!(last_page, ids.iter().skip(4).copied().collect::<Vec<_>>());
    assert!(store.query_tasks(&everything(2, 9)).await.expect("query").is_empty());
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn listing_applies_scope_before_paging(store: InMemoryStore, clock: Arc<ManualClock>) {
    let department = DepartmentId::new();
    let manager = AccountId::new();
    let outsider = AccountId::new();
    for (title, owner, target) in [
        ("Routed here", outsider, Some(department)),
        ("Routed away", outsider, None),
        ("Manager own", manager, None),
    ] {
        clock.advance(TimeDelta::seconds(1));
        store
            .store_task(&task(title, owner, target, &clock))
            .await
            .expect("store");
    }

    let query = TaskQuery {
        scope: VisibilityScope::DepartmentOrOwner {
            department_id: department,
            owner_id: manager,
        },
        filter: TaskFilter::new(),
        page: Page::new(1, 1),
    };
    let page = store.query_tasks(&query).await.expect("query");

    let titles: Vec<&str> = page.iter().map(|found| found.title().as_str()).collect();
    assert_eq!(titles, ["Routed here"]);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn comments_need_a_parent_task(store: InMemoryStore, clock: Arc<ManualClock>) {
    let orphan = Comment::new(
        TaskId::new(),
        AccountId::new(),
        CommentText::new("Nobody home").expect("valid text"),
        &*clock,
    );

    let result = store.store_comment(&orphan).await;

    assert!(matches!(result, Err(TaskRepositoryError::NotFound(id)) if id == orphan.task_id()));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn comments_list_oldest_first_per_task(store: InMemoryStore, clock: Arc<ManualClock>) {
    let author = AccountId::new();
    let discussed = task("Discussed", author, None, &clock);
    let other = task("Other", author, None, &clock);
    store.store_task(&discussed).await.expect("store");
    store.store_task(&other).await.expect("store");

    for (parent, text) in [(&discussed, "opening"), (&other, "elsewhere"), (&discussed, "reply")] {
        clock.advance(TimeDelta::seconds(1));
        let comment = Comment::new(
            parent.id(),
            author,
            CommentText::new(text).expect("valid text"),
            &*clock,
        );
        store.store_comment(&comment).await.expect("store comment");
    }

    let listed = store.list_comments(discussed.id()).await.expect("list");

    let texts: Vec<&str> = listed.iter().map(|comment| comment.text().as_str()).collect();
    assert_eq!(texts, ["opening", "reply"]);
}
