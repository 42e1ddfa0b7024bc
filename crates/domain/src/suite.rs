//! Validation suite — a session joined with all of its metrics.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::id::Identity;
use crate::metric::Metric;
use crate::session::{MonitorSession, TagValue};
use crate::time::Timestamp;

/// Aggregate view of one monitoring session and every metric it
/// produced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationSuite {
    pub uid: Identity,
    pub scm_revision: String,
    pub tags: BTreeMap<String, TagValue>,
    pub start_date: Timestamp,
    pub metrics: Vec<Metric>,
}

impl ValidationSuite {
    /// Bind a session with its metrics.
    #[must_use]
    pub fn new(session: MonitorSession, metrics: Vec<Metric>) -> Self {
        Self {
            uid: session.uid,
            scm_revision: session.scm_revision,
            tags: session.tags,
            start_date: session.start_date,
            metrics,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    #[test]
    fn should_carry_session_fields_and_metrics() {
        let session = MonitorSession::builder()
            .uid("s-1")
            .start_date(Utc.with_ymd_and_hms(2024, 3, 1, 12, 30, 0).unwrap())
            .scm_revision("deadbeef")
            .description("nightly run")
            .build();
        let metric = Metric::builder()
            .session_id("s-1")
            .node_id("m-1")
            .item("test_create")
            .build();

        let suite = ValidationSuite::new(session.clone(), vec![metric.clone()]);

        assert_eq!(suite.uid, session.uid);
        assert_eq!(suite.scm_revision, "deadbeef");
        assert_eq!(suite.metrics, vec![metric]);
    }
}
