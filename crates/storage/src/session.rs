//! Storage record for monitoring sessions.

use std::collections::BTreeMap;

use testmon_domain::error::EntityKind;
use testmon_domain::id::Identity;
use testmon_domain::session::{MonitorSession, TagValue};

use crate::record::{MapError, Record};

/// Row shape of the `sessions` table. Tags live in one JSON text
/// column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionRecord {
    pub uid: String,
    pub run_date: String,
    pub scm_id: String,
    pub description: String,
}

impl Record for SessionRecord {
    type Domain = MonitorSession;

    const KIND: EntityKind = EntityKind::Session;

    fn uid(&self) -> &str {
        &self.uid
    }

    fn from_domain(domain: &MonitorSession) -> Result<Self, MapError> {
        Ok(Self {
            uid: domain.uid.as_str().to_string(),
            run_date: domain.start_date.to_rfc3339(),
            scm_id: domain.scm_revision.clone(),
            description: serde_json::to_string(&domain.tags)?,
        })
    }

    fn into_domain(self) -> Result<MonitorSession, MapError> {
        let start_date = chrono::DateTime::parse_from_rfc3339(&self.run_date)?.to_utc();
        let tags: BTreeMap<String, TagValue> = serde_json::from_str(&self.description)?;
        Ok(MonitorSession {
            uid: Identity::Supplied(self.uid),
            start_date,
            scm_revision: self.scm_id,
            tags,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn session() -> MonitorSession {
        MonitorSession::builder()
            .uid("s-1")
            .start_date(Utc.with_ymd_and_hms(2024, 3, 1, 12, 30, 0).unwrap())
            .scm_revision("deadbeef")
            .description("nightly run")
            .tag("ci", TagValue::Bool(true))
            .build()
    }

    #[test]
    fn should_roundtrip_session_through_record() {
        let domain = session();
        let record = SessionRecord::from_domain(&domain).unwrap();
        let restored = record.clone().into_domain().unwrap();
        assert_eq!(restored, domain);
        assert_eq!(restored.tags, domain.tags);
        // idempotent transcoding: the tag map is ordered, so the JSON
        // column is stable across round trips
        assert_eq!(SessionRecord::from_domain(&restored).unwrap(), record);
    }

    #[test]
    fn should_store_run_date_as_rfc3339_text() {
        let record = SessionRecord::from_domain(&session()).unwrap();
        assert_eq!(record.run_date, "2024-03-01T12:30:00+00:00");
    }

    #[test]
    fn should_fail_on_malformed_run_date() {
        let mut record = SessionRecord::from_domain(&session()).unwrap();
        record.run_date = "not-a-date".to_string();
        assert!(matches!(record.into_domain(), Err(MapError::Timestamp(_))));
    }

    #[test]
    fn should_fail_on_malformed_tag_column() {
        let mut record = SessionRecord::from_domain(&session()).unwrap();
        record.description = "{broken".to_string();
        assert!(matches!(record.into_domain(), Err(MapError::Json(_))));
    }
}
