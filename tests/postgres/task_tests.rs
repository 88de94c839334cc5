//! Task, comment and listing persistence in `PostgreSQL`.

use super::helpers::{account, fresh_store, start};
use chrono::TimeDelta;
use eyre::ensure;
use mockable::Clock;
use rstest::rstest;
use taskguard::clock::ManualClock;
use taskguard::directory::{
    domain::{Account, Department, DepartmentName, Role},
    ports::{AccountRepository, DepartmentRepository},
};
use taskguard::storage::PostgresStore;
use taskguard::task::{
    domain::{
        Budget, Comment, CommentText, Currency, NewTask, Page, Priority, Task, TaskFilter, TaskId,
        TaskQuery, TaskStatus, TaskTitle, VisibilityScope,
    },
    ports::{TaskRepository, TaskRepositoryError},
};

struct Staff {
    department: Department,
    manager: Account,
    employee: Account,
    outsider: Account,
}

async fn seed_staff(store: &PostgresStore, clock: &ManualClock) -> eyre::Result<Staff> {
    let department = Department::new(DepartmentName::new("Platform")?, clock);
    store.store_department(&department).await?;
    let staff = Staff {
        manager: account("manager@example.com", Role::Manager, Some(department.id()), clock),
        employee: account("employee@example.com", Role::Employee, Some(department.id()), clock),
        outsider: account("outsider@example.com", Role::Employee, None, clock),
        department,
    };
    for member in [&staff.manager, &staff.employee, &staff.outsider] {
        store.store_account(member).await?;
    }
    Ok(staff)
}

fn new_task(title: &str, owner: &Account, staff: &Staff, routed: bool) -> eyre::Result<NewTask> {
    Ok(NewTask {
        title: TaskTitle::new(title)?,
        description: Some(format!("{title} in detail")),
        owner_id: owner.id(),
        target_dept_id: routed.then(|| staff.department.id()),
        priority: Priority::Medium,
        deadline: None,
        budget: Budget::default(),
    })
}

fn scoped(scope: VisibilityScope) -> TaskQuery {
    TaskQuery {
        scope,
        filter: TaskFilter::new(),
        page: Page::new(50, 0),
    }
}

async fn titles(store: &PostgresStore, query: &TaskQuery) -> eyre::Result<Vec<String>> {
    Ok(store
        .query_tasks(query)
        .await?
        .iter()
        .map(|task| task.title().as_str().to_owned())
        .collect())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn tasks_round_trip_with_every_field() -> eyre::Result<()> {
    let (_database, store) = fresh_store().await?;
    let clock = ManualClock::new(start());
    let staff = seed_staff(&store, &clock).await?;
    let mut fields = new_task("Upgrade kernels", &staff.manager, &staff, true)?;
    fields.priority = Priority::Critical;
    let due_in = TimeDelta::days(2) + TimeDelta::nanoseconds(987_654_321);
    fields.deadline = Some(clock.utc() + due_in);
    fields.budget = Budget::parse("1234.56", Currency::Rub)?;
    let mut task = Task::create(fields, &clock)?;
    task.assign_executor(staff.employee.id(), &clock)?;

    store.store_task(&task).await?;
    let reloaded = store.find_task(task.id()).await?;
    ensure!(reloaded.as_ref() == Some(&task));

    let again = store.store_task(&task).await;
    ensure!(matches!(again, Err(TaskRepositoryError::DuplicateTask(_))));
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn updates_persist_status_and_report_missing_tasks() -> eyre::Result<()> {
    let (_database, store) = fresh_store().await?;
    let clock = ManualClock::new(start());
    let staff = seed_staff(&store, &clock).await?;
    let mut task = Task::create(new_task("Rotate keys", &staff.manager, &staff, false)?, &clock)?;
    store.store_task(&task).await?;

    clock.advance(TimeDelta::minutes(10));
    task.update_status(TaskStatus::OnReview, &clock)?;
    store.update_task(&task).await?;
    let reloaded = store.find_task(task.id()).await?;
    ensure!(reloaded.as_ref() == Some(&task));

    let ghost = Task::create(new_task("Never stored", &staff.manager, &staff, false)?, &clock)?;
    let missing = store.update_task(&ghost).await;
    ensure!(matches!(missing, Err(TaskRepositoryError::NotFound(id)) if id == ghost.id()));
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn listing_scopes_match_role_visibility() -> eyre::Result<()> {
    let (_database, store) = fresh_store().await?;
    let clock = ManualClock::new(start());
    let staff = seed_staff(&store, &clock).await?;

    let plan = [
        ("Routed by outsider", &staff.outsider, true, false),
        ("Outsider private", &staff.outsider, false, false),
        ("Delegated to employee", &staff.outsider, false, true),
        ("Manager elsewhere", &staff.manager, false, false),
    ];
    for (title, owner, routed, delegate) in plan {
        clock.advance(TimeDelta::seconds(1));
        let mut task = Task::create(new_task(title, owner, &staff, routed)?, &clock)?;
        if delegate {
            task.assign_executor(staff.employee.id(), &clock)?;
        }
        store.store_task(&task).await?;
    }

    let everyone = titles(&store, &scoped(VisibilityScope::All)).await?;
    ensure!(everyone.len() == 4);
    ensure!(everyone.first().map(String::as_str) == Some("Manager elsewhere"));

    let manager_view = titles(
        &store,
        &scoped(VisibilityScope::DepartmentOrOwner {
            department_id: staff.department.id(),
            owner_id: staff.manager.id(),
        }),
    )
    .await?;
    ensure!(manager_view == ["Manager elsewhere", "Routed by outsider"]);

    let employee_view = titles(
        &store,
        &scoped(VisibilityScope::OwnerOrExecutor(staff.employee.id())),
    )
    .await?;
    ensure!(employee_view == ["Delegated to employee"]);

    let owner_view = titles(&store, &scoped(VisibilityScope::Owner(staff.manager.id()))).await?;
    ensure!(owner_view == ["Manager elsewhere"]);
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn listing_filters_and_pages_in_sql() -> eyre::Result<()> {
    let (_database, store) = fresh_store().await?;
    let clock = ManualClock::new(start());
    let staff = seed_staff(&store, &clock).await?;
    for (index, deadline_days) in [Some(1), None, Some(3), Some(10)].into_iter().enumerate() {
        clock.advance(TimeDelta::seconds(1));
        let mut fields = new_task(&format!("Deadline task {index}"), &staff.manager, &staff, true)?;
        fields.deadline = deadline_days.map(|days| start() + TimeDelta::days(days));
        store.store_task(&Task::create(fields, &clock)?).await?;
    }

    let bounded = TaskQuery {
        scope: VisibilityScope::All,
        filter: TaskFilter::new()
            .with_deadline_from(start() + TimeDelta::days(1))
            .with_deadline_until(start() + TimeDelta::days(3)),
        page: Page::new(50, 0),
    };
    ensure!(titles(&store, &bounded).await? == ["Deadline task 2", "Deadline task 0"]);

    let paged = TaskQuery {
        scope: VisibilityScope::All,
        filter: TaskFilter::new().with_status(TaskStatus::New),
        page: Page::new(2, 1),
    };
    ensure!(titles(&store, &paged).await? == ["Deadline task 2", "Deadline task 1"]);
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn comments_require_a_task_and_list_oldest_first() -> eyre::Result<()> {
    let (_database, store) = fresh_store().await?;
    let clock = ManualClock::new(start());
    let staff = seed_staff(&store, &clock).await?;
    let task = Task::create(new_task("Discuss roadmap", &staff.manager, &staff, true)?, &clock)?;
    store.store_task(&task).await?;

    for text in ["first thought", "second thought"] {
        clock.advance(TimeDelta::seconds(1));
        let comment = Comment::new(task.id(), staff.employee.id(), CommentText::new(text)?, &clock);
        store.store_comment(&comment).await?;
    }
    let texts: Vec<String> = store
        .list_comments(task.id())
        .await?
        .iter()
        .map(|comment| comment.text().as_str().to_owned())
        .collect();
    ensure!(texts == ["first thought", "second thought"]);

    let orphan = Comment::new(
        TaskId::new(),
        staff.employee.id(),
        CommentText::new("lost")?,
        &clock,
    );
    let result = store.store_comment(&orphan).await;
    ensure!(matches!(result, Err(TaskRepositoryError::NotFound(_))));
    Ok(())
}
