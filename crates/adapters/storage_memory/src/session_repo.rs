//! In-memory implementation of [`SessionRepository`].

use testmon_app::ports::{CrudRepository, SessionRepository};
use testmon_domain::error::TestmonError;
use testmon_domain::page::{Page, PageSpec};
use testmon_domain::session::MonitorSession;
use testmon_storage::{MetricRecord, SessionRecord};

use crate::repository::MemoryRepository;
use crate::store::{SharedMap, lock};

/// Session repository over the shared in-memory store.
pub struct MemorySessionRepository {
    inner: MemoryRepository<SessionRecord>,
    metrics: SharedMap<MetricRecord>,
}

impl MemorySessionRepository {
    pub(crate) fn new(sessions: SharedMap<SessionRecord>, metrics: SharedMap<MetricRecord>) -> Self {
        Self {
            inner: MemoryRepository::new(sessions),
            metrics,
        }
    }
}

impl CrudRepository<MonitorSession> for MemorySessionRepository {
    async fn create(&self, item: MonitorSession) -> Result<MonitorSession, TestmonError> {
        self.inner.create(item).await
    }

    async fn update(&self, item: MonitorSession) -> Result<MonitorSession, TestmonError> {
        self.inner.update(item).await
    }

    async fn get(&self, uid: &str) -> Result<MonitorSession, TestmonError> {
        self.inner.get(uid).await
    }

    async fn delete(&self, uid: &str) -> Result<(), TestmonError> {
        self.inner.delete(uid).await?;
        // emulate ON DELETE CASCADE on the metric table
        lock(&self.metrics).retain(|_, record| record.sid != uid);
        Ok(())
    }

    async fn list(&self, page: Option<PageSpec>) -> Result<Page<MonitorSession>, TestmonError> {
        self.inner.list(page).await
    }

    async fn count(&self) -> Result<usize, TestmonError> {
        self.inner.count().await
    }

    async fn truncate(&self) -> Result<(), TestmonError> {
        self.inner.truncate().await
    }
}

impl SessionRepository for MemorySessionRepository {}
