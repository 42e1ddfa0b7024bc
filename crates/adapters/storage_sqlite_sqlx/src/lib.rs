//! # testmon-adapter-storage-sqlite-sqlx
//!
//! `SQLite` persistence adapter using [sqlx](https://docs.rs/sqlx).
//!
//! ## Responsibilities
//! - Implement the repository port traits defined in
//!   `testmon-app::ports::storage`
//! - Manage the `SQLite` connection pool lifecycle
//! - Run database migrations (using sqlx embedded migrations)
//! - Translate constraint violations into the domain error taxonomy
//!
//! The row mapping itself lives in `testmon-storage`; this crate only
//! moves records in and out of `SQLite`.
//!
//! ## Dependency rule
//! Depends on `testmon-app` (for port traits), `testmon-domain` and
//! `testmon-storage`. The `app` and `domain` crates must never
//! reference this adapter.

mod error;
mod machine_repo;
mod metric_repo;
mod pool;
mod repository;
mod session_repo;
mod table;

pub use error::StorageError;
pub use machine_repo::SqliteMachineRepository;
pub use metric_repo::SqliteMetricRepository;
pub use pool::{Config, Database};
pub use session_repo::SqliteSessionRepository;
