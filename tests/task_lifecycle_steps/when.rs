//! When steps for task lifecycle BDD scenarios.

use super::world::{TaskLifecycleWorld, run_async};
use rstest_bdd_macros::when;
use taskguard::task::domain::TaskStatus;

#[when("the owner assigns the colleague as executor")]
fn assign_colleague(world: &mut TaskLifecycleWorld) -> Result<(), eyre::Report> {
    let (token, task) = world.owner_and_task()?;
    let colleague = world
        .colleague
        .as_ref()
        .ok_or_else(|| eyre::eyre!("missing colleague in scenario world"))?
        .id();
    let result = run_async(world.desk.assign_executor(&token, task.id(), colleague));
    world.last_outcome = Some(result.map(|_| ()));
    Ok(())
}

#[when("the owner assigns themself as executor")]
fn assign_owner(world: &mut TaskLifecycleWorld) -> Result<(), eyre::Report> {
    let (token, task) = world.owner_and_task()?;
    let result = run_async(
        world
            .desk
            .assign_executor(&token, task.id(), task.owner_id()),
    );
    world.last_outcome = Some(result.map(|_| ()));
    Ok(())
}

#[when(r#"the owner moves the task to "{status}""#)]
fn move_task(world: &mut TaskLifecycleWorld, status: String) -> Result<(), eyre::Report> {
    let target = TaskStatus::try_from(status.as_str())
        .map_err(|err| eyre::eyre!("invalid status in scenario: {err}"))?;
    let (token, task) = world.owner_and_task()?;
    let result = run_async(world.desk.update_status(&token, task.id(), target));
    world.last_outcome = Some(result.map(|_| ()));
    Ok(())
}

#[when(r#"the owner comments "{text}""#)]
fn comment(world: &mut TaskLifecycleWorld, text: String) -> Result<(), eyre::Report> {
    let (token, task) = world.owner_and_task()?;
    let result = run_async(world.desk.add_comment(&token, task.id(), &text));
    world.last_outcome = Some(result.map(|_| ()));
    Ok(())
}
