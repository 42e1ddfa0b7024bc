//! # testmon-storage
//!
//! Persistence model — storage-shaped records mirroring the domain
//! entities, plus the pure mapping layer between the two.
//!
//! ## Responsibilities
//! - Define one record type per logical table ([`MachineRecord`],
//!   [`SessionRecord`], [`MetricRecord`]) with storage-oriented fields:
//!   paths as normalized POSIX strings, timestamps as RFC 3339 text,
//!   uuids as lowercase simple hex
//! - Bind each record to its domain type at compile time via the
//!   [`Record`] trait — an unbound pair is a compile error, not a
//!   runtime check
//! - Keep mapping purely structural: no business validation on either
//!   direction
//!
//! ## Dependency rule
//! Depends on `testmon-domain` only. Both storage adapters depend on
//! this crate so that their observable behavior stays identical.

pub mod machine;
pub mod metric;
pub mod record;
pub mod session;

pub use machine::MachineRecord;
pub use metric::MetricRecord;
pub use record::{MapError, Record};
pub use session::SessionRecord;
