//! Monitor session — one test run, tied to a source-control revision.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::fingerprint::Fingerprint;
use crate::id::Identity;
use crate::time::Timestamp;

/// Tag key whose value participates in session identity and equality.
/// Every other tag is informational only.
pub const DESCRIPTION_TAG: &str = "description";

/// A single typed tag value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TagValue {
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
}

impl TagValue {
    /// The string payload, when the value is a string.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(value) => Some(value),
            _ => None,
        }
    }
}

/// A monitoring session: one test run on one SCM revision.
///
/// Immutable once created, except for wholesale tag replacement via
/// [`MonitorSession::with_tags`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonitorSession {
    pub uid: Identity,
    pub start_date: Timestamp,
    pub scm_revision: String,
    pub tags: BTreeMap<String, TagValue>,
}

impl MonitorSession {
    /// Create a builder for constructing a [`MonitorSession`].
    #[must_use]
    pub fn builder() -> MonitorSessionBuilder {
        MonitorSessionBuilder::default()
    }

    /// The conventional description tag, or `""` when absent or not a
    /// string.
    #[must_use]
    pub fn description(&self) -> &str {
        self.tags
            .get(DESCRIPTION_TAG)
            .and_then(TagValue::as_str)
            .unwrap_or("")
    }

    /// Replace the tag map wholesale (not a deep merge).
    #[must_use]
    pub fn with_tags(mut self, tags: BTreeMap<String, TagValue>) -> Self {
        self.tags = tags;
        self
    }
}

impl PartialEq for MonitorSession {
    fn eq(&self, other: &Self) -> bool {
        self.uid == other.uid
            && self.start_date == other.start_date
            && self.scm_revision == other.scm_revision
            && self.description() == other.description()
    }
}

impl Eq for MonitorSession {}

/// Step-by-step builder for [`MonitorSession`].
#[derive(Debug, Default)]
pub struct MonitorSessionBuilder {
    uid: Option<String>,
    start_date: Option<Timestamp>,
    scm_revision: String,
    tags: BTreeMap<String, TagValue>,
}

impl MonitorSessionBuilder {
    #[must_use]
    pub fn uid(mut self, uid: impl Into<String>) -> Self {
        self.uid = Some(uid.into());
        self
    }

    #[must_use]
    pub fn start_date(mut self, start_date: Timestamp) -> Self {
        self.start_date = Some(start_date);
        self
    }

    #[must_use]
    pub fn scm_revision(mut self, scm_revision: impl Into<String>) -> Self {
        self.scm_revision = scm_revision.into();
        self
    }

    #[must_use]
    pub fn tag(mut self, key: impl Into<String>, value: TagValue) -> Self {
        self.tags.insert(key.into(), value);
        self
    }

    #[must_use]
    pub fn description(self, description: impl Into<String>) -> Self {
        self.tag(DESCRIPTION_TAG, TagValue::String(description.into()))
    }

    #[must_use]
    pub fn tags(mut self, tags: BTreeMap<String, TagValue>) -> Self {
        self.tags = tags;
        self
    }

    /// Consume the builder, resolve the identity, and return a
    /// [`MonitorSession`].
    #[must_use]
    pub fn build(self) -> MonitorSession {
        let start_date = self.start_date.unwrap_or_else(crate::time::now);
        let description = self
            .tags
            .get(DESCRIPTION_TAG)
            .and_then(TagValue::as_str)
            .unwrap_or("");
        let uid = match self.uid {
            Some(uid) => Identity::Supplied(uid),
            None => Identity::Derived(
                Fingerprint::new()
                    .field(start_date.to_rfc3339())
                    .field(&self.scm_revision)
                    .field(description)
                    .finish(),
            ),
        };
        MonitorSession {
            uid,
            start_date,
            scm_revision: self.scm_revision,
            tags: self.tags,
        }
    }
}
