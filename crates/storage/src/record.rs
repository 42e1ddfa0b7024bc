//! The record contract binding storage rows to domain entities.

use std::path::{Component, Path, PathBuf};

use testmon_domain::error::{EntityKind, TestmonError};

/// A mapping failure. Purely structural: a column that cannot be
/// transcoded back into its domain form, never a business rule.
#[derive(Debug, thiserror::Error)]
pub enum MapError {
    /// A timestamp column does not hold valid RFC 3339 text.
    #[error("invalid timestamp column")]
    Timestamp(#[from] chrono::ParseError),

    /// An identifier column does not hold a valid uuid.
    #[error("invalid identifier column")]
    Uuid(#[from] uuid::Error),

    /// A JSON column does not hold valid JSON.
    #[error("invalid tag column")]
    Json(#[from] serde_json::Error),

    /// A numeric column is out of range for its domain type.
    #[error("numeric column out of range")]
    Range(#[from] std::num::TryFromIntError),
}

impl From<MapError> for TestmonError {
    fn from(err: MapError) -> Self {
        Self::Storage(Box::new(err))
    }
}

/// A storage record bound to one domain type and one logical table.
///
/// The binding is resolved at compile time through the associated
/// `Domain` type; declaring a repository over an unbound pair simply
/// does not compile.
pub trait Record: Clone + Send + Sync + Sized + 'static {
    /// The domain entity this record mirrors.
    type Domain: Clone + Send + Sync + 'static;

    /// Entity kind carried in error payloads.
    const KIND: EntityKind;

    /// Canonical string identity (primary key).
    fn uid(&self) -> &str;

    /// Transcode a domain entity into its storage form.
    ///
    /// # Errors
    ///
    /// Returns [`MapError`] when a value has no storage representation
    /// (numeric overflow, unserializable tags).
    fn from_domain(domain: &Self::Domain) -> Result<Self, MapError>;

    /// Transcode the storage form back into the domain entity.
    ///
    /// # Errors
    ///
    /// Returns [`MapError`] when a stored column cannot be parsed back.
    fn into_domain(self) -> Result<Self::Domain, MapError>;
}

/// Normalize a filesystem path into its POSIX-style string form.
#[must_use]
pub fn path_to_posix(path: &Path) -> String {
    let mut absolute = false;
    let mut parts: Vec<String> = Vec::new();
    for component in path.components() {
        match component {
            Component::RootDir => absolute = true,
            other => parts.push(other.as_os_str().to_string_lossy().into_owned()),
        }
    }
    let joined = parts.join("/");
    if absolute { format!("/{joined}") } else { joined }
}

/// Rebuild a filesystem path from its POSIX-style string form.
#[must_use]
pub fn posix_to_path(value: &str) -> PathBuf {
    PathBuf::from(value)
}
