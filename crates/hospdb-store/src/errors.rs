//! Error handling for hospdb-store
//!
//! Wraps hospdb-core ExError with store-specific helpers. Driver errors are
//! kept as the error source.

use hospdb_core::errors::{ExError, ExErrorKind, ModelError};
use hospdb_core::EntityKind;

/// Result type alias using ExError
pub type Result<T> = std::result::Result<T, ExError>;

/// Driver error during a read, reconnect or close
pub fn fetch_failure(op: &str, err: rusqlite::Error) -> ExError {
    ExError::new(ExErrorKind::FetchFailed)
        .with_op(op)
        .with_message(err.to_string())
        .with_source(err)
}

/// Driver error during a write
pub fn store_failure(op: &str, err: rusqlite::Error) -> ExError {
    ExError::new(ExErrorKind::StoreFailed)
        .with_op(op)
        .with_message(err.to_string())
        .with_source(err)
}

/// A write that ran without a driver error but did not take effect
pub fn store_rejected(op: &str, entity_kind: EntityKind, reason: impl Into<String>) -> ExError {
    ExError::new(ExErrorKind::StoreFailed)
        .with_op(op)
        .with_entity_kind(entity_kind)
        .with_message(reason)
}

/// A stay row whose patient or ward reference cannot be resolved
pub fn dangling_reference(op: &str, entity_kind: EntityKind, stay_id: i64) -> ExError {
    ExError::new(ExErrorKind::FetchFailed)
        .with_op(op)
        .with_entity_kind(EntityKind::HospitalStay)
        .with_object_id(stay_id)
        .with_message(format!("{} reference of stay {} cannot be resolved", entity_kind, stay_id))
}

/// A row whose ID column is not a generated key
pub fn invalid_row_id(entity_kind: EntityKind, id: i64) -> ExError {
    ExError::new(ExErrorKind::FetchFailed)
        .with_entity_kind(entity_kind)
        .with_object_id(id)
        .with_message(format!("{} row has invalid ID {}", entity_kind, id))
}

/// Connection URL that does not name a SQLite location
pub fn unsupported_url(url: &str) -> ExError {
    ExError::new(ExErrorKind::FetchFailed)
        .with_op("connect")
        .with_message(format!("Unsupported connection URL: {}", url))
}

/// Create a migration error
pub fn migration_error(migration_id: &str, reason: &str) -> ExError {
    ExError::new(ExErrorKind::StoreFailed)
        .with_op("migration")
        .with_message(format!("Migration {} failed: {}", migration_id, reason))
}

/// Create a checksum mismatch error
pub fn checksum_mismatch(migration_id: &str, expected: &str, actual: &str) -> ExError {
    ExError::new(ExErrorKind::Internal)
        .with_op("migration_checksum")
        .with_message(format!(
            "Checksum mismatch for migration {}: expected {}, got {}",
            migration_id, expected, actual
        ))
}

/// Convert a model error and attach the operation name
pub fn model_error(op: &'static str) -> impl Fn(ModelError) -> ExError {
    move |err| ExError::from(err).with_op(op)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    #[test]
    fn test_fetch_failure_keeps_driver_error() {
        let err = fetch_failure("get_wards", rusqlite::Error::InvalidQuery);

        assert!(err.is_fetch_failure());
        assert_eq!(err.op(), Some("get_wards"));
        assert!(err.source().is_some());
    }

    #[test]
    fn test_model_error_gets_op() {
        let err = model_error("get_ward")(ModelError::NonPositiveId {
            entity_kind: EntityKind::Ward,
            id: 0,
        });

        assert!(err.is_validation());
        assert_eq!(err.op(), Some("get_ward"));
    }
}
