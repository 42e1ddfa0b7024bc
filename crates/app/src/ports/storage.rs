//! Storage port — repository traits for persistence.
//!
//! Both backends (relational and in-memory) implement the same contract
//! and must stay observably identical: same items, same ascending-by-
//! identity ordering, same pagination boundaries, same error kinds.

use std::future::Future;

use testmon_domain::error::TestmonError;
use testmon_domain::machine::Machine;
use testmon_domain::metric::Metric;
use testmon_domain::page::{Page, PageSpec};
use testmon_domain::session::MonitorSession;

/// Generic CRUD contract over one logical table/collection.
///
/// Identities are canonical strings. Listings are always returned in
/// ascending identity order. `update` validates existence on every
/// backend: updating an absent identity is
/// [`TestmonError::NotFound`].
pub trait CrudRepository<E> {
    /// Persist a new record.
    ///
    /// Fails with [`TestmonError::AlreadyExists`] when the identity is
    /// taken.
    fn create(&self, item: E) -> impl Future<Output = Result<E, TestmonError>> + Send;

    /// Full-row replace by identity.
    fn update(&self, item: E) -> impl Future<Output = Result<E, TestmonError>> + Send;

    /// Fetch one record by identity.
    fn get(&self, uid: &str) -> impl Future<Output = Result<E, TestmonError>> + Send;

    /// Remove one record by identity. Dependent records are removed with
    /// it (cascade semantics).
    fn delete(&self, uid: &str) -> impl Future<Output = Result<(), TestmonError>> + Send;

    /// List records, optionally one page at a time.
    ///
    /// With no page spec the complete listing is returned with
    /// `page_no = None, next_page = None`.
    fn list(
        &self,
        page: Option<PageSpec>,
    ) -> impl Future<Output = Result<Page<E>, TestmonError>> + Send;

    /// Total number of stored records, regardless of pagination.
    fn count(&self) -> impl Future<Output = Result<usize, TestmonError>> + Send;

    /// Remove all records.
    fn truncate(&self) -> impl Future<Output = Result<(), TestmonError>> + Send;
}

/// Repository of [`Machine`] execution contexts.
pub trait MachineRepository: CrudRepository<Machine> + Send + Sync {}

/// Repository of [`MonitorSession`]s.
pub trait SessionRepository: CrudRepository<MonitorSession> + Send + Sync {}

/// Equality filter over metric foreign references. An absent field
/// matches everything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MetricFilter {
    pub session_id: Option<String>,
    pub node_id: Option<String>,
}

impl MetricFilter {
    /// Match metrics of one session.
    #[must_use]
    pub fn by_session(session_id: impl Into<String>) -> Self {
        Self {
            session_id: Some(session_id.into()),
            node_id: None,
        }
    }

    /// Match metrics of one machine.
    #[must_use]
    pub fn by_machine(node_id: impl Into<String>) -> Self {
        Self {
            session_id: None,
            node_id: Some(node_id.into()),
        }
    }

    /// Whether a metric with the given references passes the filter.
    #[must_use]
    pub fn matches(&self, session_id: &str, node_id: &str) -> bool {
        self.session_id
            .as_deref()
            .is_none_or(|sid| sid == session_id)
            && self.node_id.as_deref().is_none_or(|xid| xid == node_id)
    }
}

/// Repository of [`Metric`]s.
///
/// `create` distinguishes three failures, in order: missing session
/// reference, missing machine reference (both
/// [`TestmonError::LinkedEntityMissing`] naming the absent side), then
/// duplicate identity ([`TestmonError::AlreadyExists`]).
pub trait MetricRepository: CrudRepository<Metric> + Send + Sync {
    /// Filtered, optionally paginated listing with the same pagination
    /// math as [`CrudRepository::list`].
    fn find_by(
        &self,
        filter: MetricFilter,
        page: Option<PageSpec>,
    ) -> impl Future<Output = Result<Page<Metric>, TestmonError>> + Send;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_match_everything_with_empty_filter() {
        let filter = MetricFilter::default();
        assert!(filter.matches("s-1", "m-1"));
        assert!(filter.matches("s-2", "m-2"));
    }

    #[test]
    fn should_filter_by_session_only() {
        let filter = MetricFilter::by_session("s-1");
        assert!(filter.matches("s-1", "m-1"));
        assert!(filter.matches("s-1", "m-2"));
        assert!(!filter.matches("s-2", "m-1"));
    }

    #[test]
    fn should_filter_by_machine_only() {
        let filter = MetricFilter::by_machine("m-1");
        assert!(filter.matches("s-1", "m-1"));
        assert!(!filter.matches("s-1", "m-2"));
    }

    #[test]
    fn should_require_both_when_both_set() {
        let filter = MetricFilter {
            session_id: Some("s-1".to_string()),
            node_id: Some("m-1".to_string()),
        };
        assert!(filter.matches("s-1", "m-1"));
        assert!(!filter.matches("s-1", "m-2"));
        assert!(!filter.matches("s-2", "m-1"));
    }
}
