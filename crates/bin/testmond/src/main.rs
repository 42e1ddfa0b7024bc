//! # testmond — testmon daemon
//!
//! Composition root that wires the storage adapters into the monitoring
//! service.
//!
//! ## Responsibilities
//! - Parse configuration (config file, env vars)
//! - Initialize tracing
//! - Initialize the `SQLite` connection pool and run migrations
//! - Construct repository implementations (adapters)
//! - Construct the monitoring service, injecting repositories via port
//!   traits
//!
//! Transport layers (HTTP APIs, ingestion CLIs) are external consumers
//! of the service facade; this binary opens the store, reports its
//! state, and exits cleanly.
//!
//! ## Dependency rule
//! This is the **only** crate that depends on all other crates.
//! It is the wiring layer — no domain logic belongs here.

mod config;

use testmon_adapter_storage_sqlite_sqlx::{
    Config as StorageConfig, SqliteMachineRepository, SqliteMetricRepository,
    SqliteSessionRepository,
};
use testmon_app::services::MonitoringMetricsService;
use tracing_subscriber::EnvFilter;

use crate::config::Config;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::load()?;

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(config.log_filter()))
        .init();

    // Database
    let db = StorageConfig {
        database_url: config.database_url().to_string(),
    }
    .build()
    .await?;
    let pool = db.pool().clone();

    // Repositories
    let machines = SqliteMachineRepository::new(pool.clone());
    let sessions = SqliteSessionRepository::new(pool.clone());
    let metrics = SqliteMetricRepository::new(pool);

    // Service
    let service = MonitoringMetricsService::new(machines, sessions, metrics);

    let machines = service.count_machines().await?;
    let sessions = service.count_sessions().await?;
    let metrics = service.count_metrics().await?;
    tracing::info!(machines, sessions, metrics, "metrics store ready");

    Ok(())
}
