//! Account and department persistence in `PostgreSQL`.

use super::helpers::{account, fresh_store, start};
use chrono::TimeDelta;
use eyre::ensure;
use rstest::rstest;
use taskguard::clock::ManualClock;
use taskguard::directory::{
    domain::{AccountChanges, Department, DepartmentName, Role},
    ports::{AccountRepository, DepartmentRepository, DirectoryRepositoryError},
};

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn accounts_round_trip_and_emails_stay_unique() -> eyre::Result<()> {
    let (_database, store) = fresh_store().await?;
    let clock = ManualClock::new(start());
    let stored = account("round@example.com", Role::Manager, None, &clock);
    store.store_account(&stored).await?;

    let reloaded = store.find_account(stored.id()).await?;
    ensure!(reloaded.as_ref() == Some(&stored));
    let by_email = store.find_account_by_email(stored.email()).await?;
    ensure!(by_email == reloaded);

    let clash = account("round@example.com", Role::Employee, None, &clock);
    let result = store.store_account(&clash).await;
    ensure!(matches!(
        result,
        Err(DirectoryRepositoryError::DuplicateEmail(_))
    ));
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn account_updates_persist_and_missing_accounts_are_reported() -> eyre::Result<()> {
    let (_database, store) = fresh_store().await?;
    let clock = ManualClock::new(start());
    let department = Department::new(DepartmentName::new("Research")?, &clock);
    store.store_department(&department).await?;
    let mut stored = account("mover@example.com", Role::Employee, None, &clock);
    store.store_account(&stored).await?;

    stored.apply(AccountChanges {
        role: Some(Role::Manager),
        department_id: Some(department.id()),
        ..AccountChanges::default()
    });
    store.update_account(&stored).await?;
    let reloaded = store.find_account(stored.id()).await?;
    ensure!(reloaded.as_ref() == Some(&stored));

    let ghost = account("ghost@example.com", Role::Employee, None, &clock);
    let missing = store.update_account(&ghost).await;
    ensure!(matches!(
        missing,
        Err(DirectoryRepositoryError::AccountNotFound(_))
    ));
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn founder_is_the_earliest_registration() -> eyre::Result<()> {
    let (_database, store) = fresh_store().await?;
    let clock = ManualClock::new(start());
    let founder = account("founder@example.com", Role::Admin, None, &clock);
    clock.advance(TimeDelta::seconds(5));
    let newcomer = account("newcomer@example.com", Role::Admin, None, &clock);
    store.store_account(&newcomer).await?;
    store.store_account(&founder).await?;

    let earliest = store.find_earliest_account().await?;
    ensure!(earliest.map(|found| found.id()) == Some(founder.id()));
    let order: Vec<_> = store
        .list_accounts()
        .await?
        .iter()
        .map(|listed| listed.id())
        .collect();
    ensure!(order == [founder.id(), newcomer.id()]);
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn department_names_are_unique_and_listed_alphabetically() -> eyre::Result<()> {
    let (_database, store) = fresh_store().await?;
    let clock = ManualClock::new(start());
    for name in ["Support", "Marketing"] {
        store
            .store_department(&Department::new(DepartmentName::new(name)?, &clock))
            .await?;
    }

    let clash = store
        .store_department(&Department::new(DepartmentName::new("Support")?, &clock))
        .await;
    ensure!(matches!(
        clash,
        Err(DirectoryRepositoryError::DuplicateDepartmentName(_))
    ));

    let names: Vec<String> = store
        .list_departments()
        .await?
        .iter()
        .map(|department| department.name().as_str().to_owned())
        .collect();
    ensure!(names == ["Marketing", "Support"]);
    Ok(())
}
