//! Process-local store backing the in-memory repositories.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use testmon_storage::{MachineRecord, MetricRecord, SessionRecord};

use crate::machine_repo::MemoryMachineRepository;
use crate::metric_repo::MemoryMetricRepository;
use crate::session_repo::MemorySessionRepository;

/// One logical table: records keyed by identity. The `BTreeMap` keeps
/// iteration in ascending identity order, matching the relational
/// adapter's `ORDER BY uid`.
pub(crate) type SharedMap<R> = Arc<Mutex<BTreeMap<String, R>>>;

pub(crate) fn lock<R>(map: &SharedMap<R>) -> MutexGuard<'_, BTreeMap<String, R>> {
    map.lock().unwrap_or_else(PoisonError::into_inner)
}

/// The three in-memory tables, shared by every repository handed out.
///
/// Cloning the store clones handles, not data: repositories created from
/// clones observe the same tables.
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    machines: SharedMap<MachineRecord>,
    sessions: SharedMap<SessionRecord>,
    metrics: SharedMap<MetricRecord>,
}

impl MemoryStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Repository over the machine table.
    #[must_use]
    pub fn machine_repository(&self) -> MemoryMachineRepository {
        MemoryMachineRepository::new(self.machines.clone(), self.metrics.clone())
    }

    /// Repository over the session table.
    #[must_use]
    pub fn session_repository(&self) -> MemorySessionRepository {
        MemorySessionRepository::new(self.sessions.clone(), self.metrics.clone())
    }

    /// Repository over the metric table.
    #[must_use]
    pub fn metric_repository(&self) -> MemoryMetricRepository {
        MemoryMetricRepository::new(
            self.metrics.clone(),
            self.sessions.clone(),
            self.machines.clone(),
        )
    }
}
