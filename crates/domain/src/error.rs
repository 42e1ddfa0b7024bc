//! Common error types used across the workspace.
//!
//! Each layer defines its own typed errors and converts into
//! [`TestmonError`] via `#[from]`. Storage adapters wrap their backend
//! errors into [`TestmonError::Storage`] so backend-specific exception
//! types never cross the repository boundary.

use std::fmt;

/// The kind of entity an error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    Machine,
    Session,
    Metric,
}

impl EntityKind {
    /// Human-readable name, used in error messages.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Machine => "Machine",
            Self::Session => "Session",
            Self::Metric => "Metric",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Identity collision on create.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{kind} \"{uid}\" already exists")]
pub struct AlreadyExistsError {
    pub kind: EntityKind,
    pub uid: String,
}

/// Lookup, update or delete on an absent identity.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{kind} \"{uid}\" cannot be found")]
pub struct NotFoundError {
    pub kind: EntityKind,
    pub uid: String,
}

/// Create blocked by a dangling foreign reference.
///
/// Carries both sides: which referenced entity is missing, and which
/// dependent entity could not be inserted because of it.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{missing} \"{missing_uid}\" cannot be found. {dependent} \"{dependent_uid}\" cannot be inserted")]
pub struct LinkedEntityMissingError {
    pub missing: EntityKind,
    pub missing_uid: String,
    pub dependent: EntityKind,
    pub dependent_uid: String,
}

/// Delete blocked because other records still reference the entity.
///
/// Only reachable when the backing store does not cascade deletes.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{kind} \"{uid}\" is still referenced by other records")]
pub struct EntityInUseError {
    pub kind: EntityKind,
    pub uid: String,
}

/// Domain invariant violations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("page size must be greater than zero")]
    ZeroPageSize,
    #[error("cpu frequency must be greater than zero")]
    ZeroCpuFrequency,
    #[error("cpu count must be greater than zero")]
    ZeroCpuCount,
    #[error("total ram must be greater than zero")]
    ZeroTotalRam,
    #[error("hostname must not be empty")]
    EmptyHostname,
}

/// Top-level error for all testmon operations.
#[derive(Debug, thiserror::Error)]
pub enum TestmonError {
    /// A domain invariant was violated.
    #[error("validation error")]
    Validation(#[from] ValidationError),

    /// An entity with the same identity already exists.
    #[error("entity already exists")]
    AlreadyExists(#[from] AlreadyExistsError),

    /// The requested entity does not exist.
    #[error("entity not found")]
    NotFound(#[from] NotFoundError),

    /// A referenced entity is missing.
    #[error("linked entity missing")]
    LinkedEntityMissing(#[from] LinkedEntityMissingError),

    /// The entity is still referenced by dependent records.
    #[error("entity in use")]
    InUse(#[from] EntityInUseError),

    /// Any other backing-store failure, wrapped so callers never see
    /// backend-specific error types.
    #[error("storage error")]
    Storage(#[source] Box<dyn std::error::Error + Send + Sync>),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_format_already_exists_message() {
        let err = AlreadyExistsError {
            kind: EntityKind::Machine,
            uid: "abcd".to_string(),
        };
        assert_eq!(err.to_string(), "Machine \"abcd\" already exists");
    }

    #[test]
    fn should_format_not_found_message() {
        let err = NotFoundError {
            kind: EntityKind::Session,
            uid: "abcd".to_string(),
        };
        assert_eq!(err.to_string(), "Session \"abcd\" cannot be found");
    }

    #[test]
    fn should_format_linked_entity_missing_with_both_sides() {
        let err = LinkedEntityMissingError {
            missing: EntityKind::Session,
            missing_uid: "s-1".to_string(),
            dependent: EntityKind::Metric,
            dependent_uid: "m-1".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Session \"s-1\" cannot be found. Metric \"m-1\" cannot be inserted"
        );
    }

    #[test]
    fn should_convert_sub_errors_into_top_level_error() {
        let err: TestmonError = NotFoundError {
            kind: EntityKind::Metric,
            uid: "x".to_string(),
        }
        .into();
        assert!(matches!(err, TestmonError::NotFound(_)));

        let err: TestmonError = ValidationError::ZeroPageSize.into();
        assert!(matches!(err, TestmonError::Validation(_)));
    }
}
