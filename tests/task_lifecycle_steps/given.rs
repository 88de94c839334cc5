//! Given steps for task lifecycle BDD scenarios.

use super::world::{TaskLifecycleWorld, run_async};
use eyre::WrapErr;
use rstest_bdd_macros::given;
use taskguard::task::{domain::TaskStatus, services::CreateTaskRequest};

#[given(r#"a task "{title}" created by "{email}""#)]
fn task_created_by(
    world: &mut TaskLifecycleWorld,
    title: String,
    email: String,
) -> Result<(), eyre::Report> {
    let (owner, token) = world.enrol(&email).wrap_err("register task owner")?;
    let task = run_async(world.desk.create_task(&token, CreateTaskRequest::new(title)))
        .wrap_err("create scenario task")?;
    world.owner = Some((owner, token));
    world.task = Some(task);
    Ok(())
}

#[given(r#"a colleague "{email}""#)]
fn colleague(world: &mut TaskLifecycleWorld, email: String) -> Result<(), eyre::Report> {
    let (account, _) = world.enrol(&email).wrap_err("register colleague")?;
    world.colleague = Some(account);
    Ok(())
}

#[given(r#"the task has been moved to "{status}""#)]
fn task_moved(world: &mut TaskLifecycleWorld, status: String) -> Result<(), eyre::Report> {
    let target = TaskStatus::try_from(status.as_str())
        .map_err(|err| eyre::eyre!("invalid status in scenario: {err}"))?;
    let (token, task) = world.owner_and_task()?;
    let moved = run_async(world.desk.update_status(&token, task.id(), target))
        .wrap_err("move task in scenario setup")?;
    world.task = Some(moved);
    Ok(())
}
