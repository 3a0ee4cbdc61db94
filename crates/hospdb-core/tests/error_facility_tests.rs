#![allow(clippy::unwrap_used, clippy::expect_used)]

use chrono::NaiveDate;
use hospdb_core::errors::{ExError, ExErrorKind, ModelError};
use hospdb_core::EntityKind;

#[test]
fn test_every_kind_has_a_stable_code() {
    let kinds = [
        (ExErrorKind::InvalidInput, "ERR_INVALID_INPUT"),
        (ExErrorKind::NotFound, "ERR_NOT_FOUND"),
        (ExErrorKind::FetchFailed, "ERR_FETCH_FAILED"),
        (ExErrorKind::StoreFailed, "ERR_STORE_FAILED"),
        (ExErrorKind::Internal, "ERR_INTERNAL"),
    ];
    for (kind, code) in kinds {
        assert_eq!(kind.code(), code);
    }
}

#[test]
fn test_validation_errors_convert_to_invalid_input() {
    let errors = vec![
        ModelError::BlankField { field: "name" },
        ModelError::NonPositiveBedCount { count: 0 },
        ModelError::DischargeBeforeAdmission {
            admission_date: NaiveDate::from_ymd_opt(2024, 1, 5).unwrap(),
            discharge_date: NaiveDate::from_ymd_opt(2024, 1, 4).unwrap(),
        },
        ModelError::NotPersistent {
            entity_kind: EntityKind::Ward,
        },
    ];

    for err in errors {
        let ex: ExError = err.into();
        assert!(ex.is_validation(), "{} should be a validation error", ex);
        assert!(!ex.message().is_empty());
    }
}

#[test]
fn test_non_positive_id_keeps_context() {
    let ex: ExError = ModelError::NonPositiveId {
        entity_kind: EntityKind::HospitalStay,
        id: 0,
    }
    .into();

    assert_eq!(ex.entity_kind(), Some(EntityKind::HospitalStay));
    assert_eq!(ex.object_id(), Some(0));
    assert!(ex.to_string().contains("HospitalStay id must be greater than zero"));
}

#[test]
fn test_op_context_is_rendered() {
    let ex = ExError::new(ExErrorKind::FetchFailed)
        .with_op("get_wards")
        .with_message("connection refused");

    assert!(ex.is_fetch_failure());
    assert_eq!(ex.op(), Some("get_wards"));
    assert_eq!(
        ex.to_string(),
        "[ERR_FETCH_FAILED] in operation 'get_wards': connection refused"
    );
}
