//! # testmon-app
//!
//! Application layer — the service facade and **port definitions**
//! (traits).
//!
//! ## Responsibilities
//! - Define **port traits** that storage adapters must implement:
//!   - [`ports::CrudRepository`] — the generic CRUD contract
//!   - [`ports::MachineRepository`], [`ports::SessionRepository`],
//!     [`ports::MetricRepository`] — entity-specific repositories
//! - Provide the [`services::MonitoringMetricsService`] facade that
//!   composes the three repositories into cross-entity operations
//!
//! ## Dependency rule
//! Depends on `testmon-domain` only.
//! Never imports adapter crates. Adapters depend on *this* crate, not the
//! reverse.

pub mod ports;
pub mod services;
