//! # testmon-adapter-storage-memory
//!
//! In-memory persistence adapter — implements the repository port traits
//! over process-local ordered maps.
//!
//! ## Responsibilities
//! - Serve as the reference backend: every observable behavior (ordering,
//!   pagination boundaries, error kinds) must match the relational
//!   adapter exactly
//! - Store **records** (not domain entities) and transcode through the
//!   shared mapper on every read, like the relational adapter does
//! - Emulate referential integrity and cascade deletes explicitly, since
//!   there is no engine to enforce them
//!
//! Single-threaded test use only: no coordination beyond the locks
//! needed to satisfy the port's `Send` bounds.
//!
//! ## Dependency rule
//! Depends on `testmon-app` (port traits), `testmon-domain` and
//! `testmon-storage`. The `app` and `domain` crates must never reference
//! this adapter.

mod machine_repo;
mod metric_repo;
mod repository;
mod session_repo;
mod store;

pub use machine_repo::MemoryMachineRepository;
pub use metric_repo::MemoryMetricRepository;
pub use session_repo::MemorySessionRepository;
pub use store::MemoryStore;
