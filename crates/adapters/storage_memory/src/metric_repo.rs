//! In-memory implementation of [`MetricRepository`].

use testmon_app::ports::{CrudRepository, MetricFilter, MetricRepository};
use testmon_domain::error::{EntityKind, LinkedEntityMissingError, TestmonError};
use testmon_domain::metric::Metric;
use testmon_domain::page::{Page, PageSpec};
use testmon_storage::{MachineRecord, MapError, MetricRecord, Record, SessionRecord};

use crate::repository::MemoryRepository;
use crate::store::{SharedMap, lock};

/// Metric repository over the shared in-memory store.
///
/// There are no real foreign keys here, so `create` reproduces the
/// relational backend's three-way classification by hand: session
/// reference first, then machine reference, then duplicate identity.
pub struct MemoryMetricRepository {
    inner: MemoryRepository<MetricRecord>,
    metrics: SharedMap<MetricRecord>,
    sessions: SharedMap<SessionRecord>,
    machines: SharedMap<MachineRecord>,
}

impl MemoryMetricRepository {
    pub(crate) fn new(
        metrics: SharedMap<MetricRecord>,
        sessions: SharedMap<SessionRecord>,
        machines: SharedMap<MachineRecord>,
    ) -> Self {
        Self {
            inner: MemoryRepository::new(metrics.clone()),
            metrics,
            sessions,
            machines,
        }
    }

    fn missing_link(missing: EntityKind, missing_uid: &str, metric_uid: &str) -> TestmonError {
        LinkedEntityMissingError {
            missing,
            missing_uid: missing_uid.to_string(),
            dependent: EntityKind::Metric,
            dependent_uid: metric_uid.to_string(),
        }
        .into()
    }
}

impl CrudRepository<Metric> for MemoryMetricRepository {
    async fn create(&self, item: Metric) -> Result<Metric, TestmonError> {
        let record = MetricRecord::from_domain(&item)?;
        if !lock(&self.sessions).contains_key(&record.sid) {
            return Err(Self::missing_link(EntityKind::Session, &record.sid, &record.uid));
        }
        if !lock(&self.machines).contains_key(&record.xid) {
            return Err(Self::missing_link(EntityKind::Machine, &record.xid, &record.uid));
        }
        self.inner.create(item).await
    }

    async fn update(&self, item: Metric) -> Result<Metric, TestmonError> {
        self.inner.update(item).await
    }

    async fn get(&self, uid: &str) -> Result<Metric, TestmonError> {
        self.inner.get(uid).await
    }

    async fn delete(&self, uid: &str) -> Result<(), TestmonError> {
        self.inner.delete(uid).await
    }

    async fn list(&self, page: Option<PageSpec>) -> Result<Page<Metric>, TestmonError> {
        self.inner.list(page).await
    }

    async fn count(&self) -> Result<usize, TestmonError> {
        self.inner.count().await
    }

    async fn truncate(&self) -> Result<(), TestmonError> {
        self.inner.truncate().await
    }
}

impl MetricRepository for MemoryMetricRepository {
    async fn find_by(
        &self,
        filter: MetricFilter,
        page: Option<PageSpec>,
    ) -> Result<Page<Metric>, TestmonError> {
        let data = lock(&self.metrics);
        let matching: Vec<MetricRecord> = data
            .values()
            .filter(|record| filter.matches(&record.sid, &record.xid))
            .cloned()
            .collect();
        drop(data);

        match page {
            None => {
                let all = matching
                    .into_iter()
                    .map(Record::into_domain)
                    .collect::<Result<Vec<_>, MapError>>()?;
                Ok(Page::complete(all))
            }
            Some(spec) => {
                let total = matching.len();
                let slice = matching
                    .into_iter()
                    .skip(spec.offset())
                    .take(spec.page_size())
                    .map(Record::into_domain)
                    .collect::<Result<Vec<_>, MapError>>()?;
                Ok(Page::paginated(slice, spec, total))
            }
        }
    }
}
