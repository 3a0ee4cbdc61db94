//! Field validation shared by setters, factories and query criteria
//!
//! Every function checks one precondition and returns the value to store,
//! so callers can validate before they touch any field.

use chrono::{NaiveDate, Utc};

use crate::errors::{ModelError, Result};
use crate::model::EntityKind;

/// Require a non-blank string, returning it trimmed
pub fn require_non_blank(field: &'static str, value: &str) -> Result<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ModelError::BlankField { field });
    }
    Ok(trimmed.to_string())
}

/// Today's date in UTC, the reference point for "not in the future"
pub fn today() -> NaiveDate {
    Utc::now().date_naive()
}

/// Reject a date of birth after `today`
pub fn require_not_in_future(date_of_birth: NaiveDate, today: NaiveDate) -> Result<NaiveDate> {
    if date_of_birth > today {
        return Err(ModelError::DateOfBirthInFuture { date_of_birth });
    }
    Ok(date_of_birth)
}

pub fn require_positive_beds(count: i32) -> Result<i32> {
    if count <= 0 {
        return Err(ModelError::NonPositiveBedCount { count });
    }
    Ok(count)
}

/// Check a candidate discharge date against the current admission date
pub fn check_discharge_date(
    admission_date: NaiveDate,
    discharge_date: Option<NaiveDate>,
) -> Result<Option<NaiveDate>> {
    match discharge_date {
        Some(discharge_date) if discharge_date < admission_date => {
            Err(ModelError::DischargeBeforeAdmission {
                admission_date,
                discharge_date,
            })
        }
        other => Ok(other),
    }
}

/// Check a candidate admission date against the current discharge date
pub fn check_admission_date(
    admission_date: NaiveDate,
    discharge_date: Option<NaiveDate>,
) -> Result<NaiveDate> {
    match discharge_date {
        Some(discharge_date) if admission_date > discharge_date => {
            Err(ModelError::AdmissionAfterDischarge {
                admission_date,
                discharge_date,
            })
        }
        _ => Ok(admission_date),
    }
}

/// Identifier arguments to lookups and removals must be positive
pub fn require_positive_id(entity_kind: EntityKind, id: i64) -> Result<i64> {
    if id <= 0 {
        return Err(ModelError::NonPositiveId { entity_kind, id });
    }
    Ok(id)
}

/// Optional date bounds of a filter must not be inverted
pub fn check_date_range(from: Option<NaiveDate>, until: Option<NaiveDate>) -> Result<()> {
    if let (Some(from), Some(until)) = (from, until) {
        if from > until {
            return Err(ModelError::InvalidDateRange { from, until });
        }
    }
    Ok(())
}
