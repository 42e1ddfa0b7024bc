//! Monitoring metrics service — the facade over the three repositories.

use testmon_domain::error::TestmonError;
use testmon_domain::machine::Machine;
use testmon_domain::metric::Metric;
use testmon_domain::session::MonitorSession;
use testmon_domain::suite::ValidationSuite;

use crate::ports::{MachineRepository, MetricFilter, MetricRepository, SessionRepository};

/// Facade composing the machine, session and metric repositories.
///
/// Owns transactional sequencing (session/machine registration before
/// dependent metric insertion) but not entity lifetime: deletion and
/// truncation are explicit, caller-driven operations.
pub struct MonitoringMetricsService<M, S, T> {
    machines: M,
    sessions: S,
    metrics: T,
}

impl<M, S, T> MonitoringMetricsService<M, S, T>
where
    M: MachineRepository,
    S: SessionRepository,
    T: MetricRepository,
{
    /// Create a new service backed by the given repositories.
    pub fn new(machines: M, sessions: S, metrics: T) -> Self {
        Self {
            machines,
            sessions,
            metrics,
        }
    }

    /// Register a new execution context.
    ///
    /// # Errors
    ///
    /// Returns [`TestmonError::AlreadyExists`] when the uid is taken, or
    /// a storage error from the repository.
    pub async fn add_machine(&self, machine: Machine) -> Result<Machine, TestmonError> {
        self.machines.create(machine).await
    }

    /// Register a new monitoring session.
    ///
    /// # Errors
    ///
    /// Returns [`TestmonError::AlreadyExists`] when the uid is taken, or
    /// a storage error from the repository.
    pub async fn add_session(&self, session: MonitorSession) -> Result<MonitorSession, TestmonError> {
        self.sessions.create(session).await
    }

    /// Record one metric.
    ///
    /// # Errors
    ///
    /// Returns [`TestmonError::LinkedEntityMissing`] when the referenced
    /// session or machine does not exist,
    /// [`TestmonError::AlreadyExists`] on a duplicate uid, or a storage
    /// error from the repository.
    pub async fn add_metric(&self, metric: Metric) -> Result<Metric, TestmonError> {
        self.metrics.create(metric).await
    }

    /// Record a batch of metrics, optionally registering their session
    /// and machine first.
    ///
    /// Pre-registration is idempotent: an already-known session or
    /// machine is not an error. Metrics are inserted one by one and each
    /// insert commits on its own; when one fails, the ones before it
    /// stay persisted.
    ///
    /// # Errors
    ///
    /// Propagates the first insertion failure, typically
    /// [`TestmonError::LinkedEntityMissing`] for a dangling reference.
    pub async fn add_metrics(
        &self,
        metrics: Vec<Metric>,
        session: Option<MonitorSession>,
        machine: Option<Machine>,
    ) -> Result<usize, TestmonError> {
        if let Some(session) = session {
            match self.sessions.create(session).await {
                Ok(_) | Err(TestmonError::AlreadyExists(_)) => {}
                Err(err) => return Err(err),
            }
        }
        if let Some(machine) = machine {
            match self.machines.create(machine).await {
                Ok(_) | Err(TestmonError::AlreadyExists(_)) => {}
                Err(err) => return Err(err),
            }
        }
        let mut inserted = 0;
        for metric in metrics {
            self.metrics.create(metric).await?;
            inserted += 1;
        }
        tracing::debug!(inserted, "metric batch stored");
        Ok(inserted)
    }

    /// Fetch a metric by uid.
    ///
    /// # Errors
    ///
    /// Returns [`TestmonError::NotFound`] when no metric with `uid`
    /// exists, or a storage error from the repository.
    pub async fn get_metric(&self, uid: &str) -> Result<Metric, TestmonError> {
        self.metrics.get(uid).await
    }

    /// Fetch a session by uid.
    ///
    /// # Errors
    ///
    /// Returns [`TestmonError::NotFound`] when no session with `uid`
    /// exists, or a storage error from the repository.
    pub async fn get_session(&self, uid: &str) -> Result<MonitorSession, TestmonError> {
        self.sessions.get(uid).await
    }

    /// Fetch a machine by uid.
    ///
    /// # Errors
    ///
    /// Returns [`TestmonError::NotFound`] when no machine with `uid`
    /// exists, or a storage error from the repository.
    pub async fn get_machine(&self, uid: &str) -> Result<Machine, TestmonError> {
        self.machines.get(uid).await
    }

    /// Total number of stored metrics.
    ///
    /// # Errors
    ///
    /// Returns a storage error propagated from the repository.
    pub async fn count_metrics(&self) -> Result<usize, TestmonError> {
        self.metrics.count().await
    }

    /// Total number of stored sessions.
    ///
    /// # Errors
    ///
    /// Returns a storage error propagated from the repository.
    pub async fn count_sessions(&self) -> Result<usize, TestmonError> {
        self.sessions.count().await
    }

    /// Total number of stored machines.
    ///
    /// # Errors
    ///
    /// Returns a storage error propagated from the repository.
    pub async fn count_machines(&self) -> Result<usize, TestmonError> {
        self.machines.count().await
    }

    /// Remove all stored data.
    ///
    /// Metrics reference sessions and machines, so the dependent store
    /// is truncated first; referent order then no longer matters.
    ///
    /// # Errors
    ///
    /// Returns a storage error propagated from the repositories.
    pub async fn truncate_all(&self) -> Result<(), TestmonError> {
        self.metrics.truncate().await?;
        self.sessions.truncate().await?;
        self.machines.truncate().await?;
        tracing::debug!("all stores truncated");
        Ok(())
    }

    /// Aggregate a session with all of its metrics.
    ///
    /// # Errors
    ///
    /// Returns [`TestmonError::NotFound`] when the session does not
    /// exist, or a storage error from the repositories.
    pub async fn get_test_suite(&self, session_uid: &str) -> Result<ValidationSuite, TestmonError> {
        let session = self.sessions.get(session_uid).await?;
        let metrics = self
            .metrics
            .find_by(MetricFilter::by_session(session_uid), None)
            .await?;
        Ok(ValidationSuite::new(session, metrics.data))
    }
}
