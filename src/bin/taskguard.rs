//! Boots configuration and logging, then checks that the configured store is
//! reachable and ready.
//!
//! Usage:
//!
//! ```text
//! TASKGUARD_DATABASE_URL=postgres://localhost/taskguard taskguard
//! ```
//!
//! Without `TASKGUARD_DATABASE_URL` the in-memory store is selected and the
//! check always succeeds. With it, the binary opens a pool, runs a trivial
//! query, creates any missing tables and reports whether a founder account
//! has been registered. See [`taskguard::config::AppConfig`] for the other
//! variables.

use taskguard::config::AppConfig;
use taskguard::directory::ports::AccountRepository;
use taskguard::storage::{InMemoryStore, PostgresStore, build_pool};
use taskguard::telemetry::init_tracing;
use tokio::runtime::Builder;
use tracing::{error, info};

/// Boxed error type for the main result.
type BoxError = Box<dyn std::error::Error + Send + Sync>;

fn main() -> Result<(), BoxError> {
    let config = AppConfig::from_env()?;
    init_tracing(&config.logging)?;

    let runtime = Builder::new_multi_thread().enable_all().build()?;
    runtime.block_on(check_store(&config)).inspect_err(|err| {
        error!(error = %err, "store check failed");
    })
}

async fn check_store(config: &AppConfig) -> Result<(), BoxError> {
    let Some(database_url) = config.database_url.as_deref() else {
        let store = InMemoryStore::new();
        report_founder(&store).await?;
        info!(store = "memory", "taskguard ready");
        return Ok(());
    };

    let pool = build_pool(database_url, config.db_pool_size)?;
    let store = PostgresStore::new(pool);
    store.verify().await?;
    info!(pool_size = config.db_pool_size, "database connection verified");
    store.apply_schema().await?;
    report_founder(&store).await?;
    info!(store = "postgres", "taskguard ready");
    Ok(())
}

async fn report_founder(store: &impl AccountRepository) -> Result<(), BoxError> {
    match store.find_earliest_account().await? {
        Some(founder) => info!(founder_id = %founder.id(), "founder account present"),
        None => info!("no accounts yet; the first registration becomes the founder"),
    }
    Ok(())
}
