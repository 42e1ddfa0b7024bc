//! Entity identity — caller-supplied or derived from content.

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Identity of a machine or session.
///
/// Resolved exactly once, at entity construction: either the caller
/// supplied an id, or one was derived from a content fingerprint. The
/// variant records provenance only — comparison, ordering, hashing and
/// serialization all operate on the inner value, so a derived id that
/// round-trips through storage compares equal to its supplied form.
#[derive(Debug, Clone)]
pub enum Identity {
    /// Identity chosen by the caller.
    Supplied(String),
    /// Identity derived from a content fingerprint.
    Derived(String),
}

impl Identity {
    /// The canonical string form of the identity.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Supplied(value) | Self::Derived(value) => value,
        }
    }

    /// Whether the identity was derived rather than supplied.
    #[must_use]
    pub fn is_derived(&self) -> bool {
        matches!(self, Self::Derived(_))
    }
}

impl PartialEq for Identity {
    fn eq(&self, other: &Self) -> bool {
        self.as_str() == other.as_str()
    }
}

impl Eq for Identity {}

impl PartialOrd for Identity {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Identity {
    fn cmp(&self, other: &Self) -> Ordering {
        self.as_str().cmp(other.as_str())
    }
}

impl Hash for Identity {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.as_str().hash(state);
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<String> for Identity {
    fn from(value: String) -> Self {
        Self::Supplied(value)
    }
}

impl From<&str> for Identity {
    fn from(value: &str) -> Self {
        Self::Supplied(value.to_string())
    }
}

impl Serialize for Identity {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Identity {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        String::deserialize(deserializer).map(Self::Supplied)
    }
}
