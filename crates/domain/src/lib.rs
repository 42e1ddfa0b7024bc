//! # testmon-domain
//!
//! Pure domain model for the testmon metrics-collection backend.
//!
//! ## Responsibilities
//! - Foundational types: identities, error conventions, timestamps
//! - Define **Machines** (the hardware+software execution context a test ran on)
//! - Define **Monitor sessions** (one test run, tied to an SCM revision)
//! - Define **Metrics** (resource measurements for a single test execution)
//! - Define **Validation suites** (a session joined with all of its metrics)
//! - Pagination vocabulary shared by every listing operation
//! - Contain all invariant enforcement and domain logic
//!
//! ## Dependency rule
//! This crate has **no internal dependencies**.
//! It must never import anything from `app`, adapters, or external IO crates.
//! All IO boundaries are expressed as traits in the `app` crate (ports).

pub mod error;
pub mod fingerprint;
pub mod id;
pub mod time;

pub mod machine;
pub mod metric;
pub mod page;
pub mod session;
pub mod suite;
