//! Then steps for task lifecycle BDD scenarios.

use super::world::{TaskLifecycleWorld, run_async};
use rstest_bdd_macros::then;
use taskguard::task::domain::TaskStatus;

#[then("the operation succeeds")]
fn operation_succeeds(world: &TaskLifecycleWorld) -> Result<(), eyre::Report> {
    match world.last_outcome.as_ref() {
        Some(Ok(())) => Ok(()),
        Some(Err(err)) => Err(eyre::eyre!("expected success, got {}", err.code())),
        None => Err(eyre::eyre!("no operation was attempted")),
    }
}

#[then(r#"the operation fails with "{code}""#)]
fn operation_fails_with(world: &TaskLifecycleWorld, code: String) -> Result<(), eyre::Report> {
    match world.last_outcome.as_ref() {
        Some(Err(err)) if err.code() == code => Ok(()),
        Some(Err(err)) => Err(eyre::eyre!("expected {code}, got {}", err.code())),
        Some(Ok(())) => Err(eyre::eyre!("expected {code}, but the operation succeeded")),
        None => Err(eyre::eyre!("no operation was attempted")),
    }
}

#[then(r#"the task status is "{status}""#)]
fn task_status_is(world: &TaskLifecycleWorld, status: String) -> Result<(), eyre::Report> {
    let expected = TaskStatus::try_from(status.as_str())
        .map_err(|err| eyre::eyre!("invalid status in scenario: {err}"))?;
    let (token, task) = world.owner_and_task()?;
    let current = run_async(world.desk.get_task(&token, task.id()))?;
    eyre::ensure!(
        current.status() == expected,
        "expected status {expected}, found {}",
        current.status()
    );
    Ok(())
}

#[then("the task has {count:u64} comment")]
fn task_has_comments(world: &TaskLifecycleWorld, count: u64) -> Result<(), eyre::Report> {
    let (token, task) = world.owner_and_task()?;
    let comments = run_async(world.desk.list_comments(&token, task.id()))?;
    let found = u64::try_from(comments.len())?;
    eyre::ensure!(found == count, "expected {count} comments, found {found}");
    Ok(())
}
