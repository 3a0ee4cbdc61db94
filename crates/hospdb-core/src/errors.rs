use chrono::NaiveDate;
use std::sync::Arc;
use thiserror::Error;

use crate::model::EntityKind;

/// Result type alias using ModelError
pub type Result<T> = std::result::Result<T, ModelError>;

// ========== Error Facility ==========

/// Canonical error kind taxonomy
///
/// Every failure surfaced by the persistence layer falls into one of these
/// kinds. Each kind maps to a stable code for programmatic handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExErrorKind {
    /// Malformed or out-of-range argument to a setter, factory or query
    InvalidInput,
    /// An entity key that does not belong to the graph it was used with
    NotFound,
    /// Underlying store error during a read, reconnect or close
    FetchFailed,
    /// Underlying store error during a write, or a write that could not complete
    StoreFailed,
    Internal,
}

impl ExErrorKind {
    /// Get the stable error code for this kind
    pub fn code(&self) -> &'static str {
        match self {
            ExErrorKind::InvalidInput => "ERR_INVALID_INPUT",
            ExErrorKind::NotFound => "ERR_NOT_FOUND",
            ExErrorKind::FetchFailed => "ERR_FETCH_FAILED",
            ExErrorKind::StoreFailed => "ERR_STORE_FAILED",
            ExErrorKind::Internal => "ERR_INTERNAL",
        }
    }
}

/// Canonical structured error type
///
/// Carries the classification plus enough context (operation, entity kind,
/// object id) to report the failure at a coarse boundary. The driver error
/// that caused a fetch or store failure is kept as the `source`.
#[derive(Debug, Clone)]
pub struct ExError {
    kind: ExErrorKind,
    op: Option<String>,
    entity_kind: Option<EntityKind>,
    object_id: Option<i64>,
    message: String,
    source: Option<Arc<dyn std::error::Error + Send + Sync>>,
}

impl ExError {
    /// Create a new error with the specified kind
    pub fn new(kind: ExErrorKind) -> Self {
        Self {
            kind,
            op: None,
            entity_kind: None,
            object_id: None,
            message: String::new(),
            source: None,
        }
    }

    /// Add operation context
    pub fn with_op(mut self, op: impl Into<String>) -> Self {
        self.op = Some(op.into());
        self
    }

    /// Add entity kind context
    pub fn with_entity_kind(mut self, kind: EntityKind) -> Self {
        self.entity_kind = Some(kind);
        self
    }

    /// Add object id context
    pub fn with_object_id(mut self, id: i64) -> Self {
        self.object_id = Some(id);
        self
    }

    /// Add custom message
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    /// Attach the underlying cause
    pub fn with_source<E>(mut self, source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        self.source = Some(Arc::new(source));
        self
    }

    /// Get the error kind
    pub fn kind(&self) -> ExErrorKind {
        self.kind
    }

    /// Get the stable error code
    pub fn code(&self) -> &'static str {
        self.kind.code()
    }

    /// Get the operation context, if any
    pub fn op(&self) -> Option<&str> {
        self.op.as_deref()
    }

    /// Get the entity kind context, if any
    pub fn entity_kind(&self) -> Option<EntityKind> {
        self.entity_kind
    }

    /// Get the object id context, if any
    pub fn object_id(&self) -> Option<i64> {
        self.object_id
    }

    /// Get the error message
    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn is_validation(&self) -> bool {
        self.kind == ExErrorKind::InvalidInput
    }

    pub fn is_fetch_failure(&self) -> bool {
        self.kind == ExErrorKind::FetchFailed
    }

    pub fn is_store_failure(&self) -> bool {
        self.kind == ExErrorKind::StoreFailed
    }
}

impl std::fmt::Display for ExError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}]", self.code())?;
        if let Some(op) = &self.op {
            write!(f, " in operation '{}'", op)?;
        }
        if !self.message.is_empty() {
            write!(f, ": {}", self.message)?;
        }
        if let Some(kind) = self.entity_kind {
            write!(f, " (entity: {})", kind)?;
        }
        if let Some(id) = self.object_id {
            write!(f, " (object_id: {})", id)?;
        }
        Ok(())
    }
}

impl std::error::Error for ExError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_deref()
            .map(|e| e as &(dyn std::error::Error + 'static))
    }
}

// ========== End Error Facility ==========

/// Validation and lookup errors raised by the entity model
///
/// These are local precondition violations: the rejected value never reaches
/// the entity.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ModelError {
    /// Required text field is empty or whitespace-only
    #[error("{field} must not be empty or whitespace-only")]
    BlankField { field: &'static str },

    /// Date of birth lies after today
    #[error("Date of birth {date_of_birth} lies in the future")]
    DateOfBirthInFuture { date_of_birth: NaiveDate },

    /// Ward bed count must be positive
    #[error("Number of beds must be greater than zero, got {count}")]
    NonPositiveBedCount { count: i32 },

    /// Discharge date would precede the admission date
    #[error("Discharge date {discharge_date} precedes admission date {admission_date}")]
    DischargeBeforeAdmission {
        admission_date: NaiveDate,
        discharge_date: NaiveDate,
    },

    /// Admission date would follow the already-set discharge date
    #[error("Admission date {admission_date} is after discharge date {discharge_date}")]
    AdmissionAfterDischarge {
        admission_date: NaiveDate,
        discharge_date: NaiveDate,
    },

    /// Lower bound of a date filter is after its upper bound
    #[error("Start date {from} is after end date {until}")]
    InvalidDateRange { from: NaiveDate, until: NaiveDate },

    /// Identifier arguments must be positive
    #[error("{entity_kind} id must be greater than zero, got {id}")]
    NonPositiveId { entity_kind: EntityKind, id: i64 },

    /// Operation requires an entity that already has a durable row
    #[error("{entity_kind} must be persistent")]
    NotPersistent { entity_kind: EntityKind },

    /// Key does not belong to this graph
    #[error("Unknown {entity_kind} key #{index}")]
    UnknownEntity { entity_kind: EntityKind, index: usize },
}

/// Conversion from ModelError to ExError
impl From<ModelError> for ExError {
    fn from(err: ModelError) -> Self {
        let message = err.to_string();
        match err {
            ModelError::NonPositiveId { entity_kind, id } => {
                ExError::new(ExErrorKind::InvalidInput)
                    .with_entity_kind(entity_kind)
                    .with_object_id(id)
                    .with_message(message)
            }

            ModelError::NotPersistent { entity_kind } => ExError::new(ExErrorKind::InvalidInput)
                .with_entity_kind(entity_kind)
                .with_message(message),

            ModelError::UnknownEntity { entity_kind, .. } => ExError::new(ExErrorKind::NotFound)
                .with_entity_kind(entity_kind)
                .with_message(message),

            ModelError::BlankField { .. }
            | ModelError::DateOfBirthInFuture { .. }
            | ModelError::NonPositiveBedCount { .. }
            | ModelError::DischargeBeforeAdmission { .. }
            | ModelError::AdmissionAfterDischarge { .. }
            | ModelError::InvalidDateRange { .. } => {
                ExError::new(ExErrorKind::InvalidInput).with_message(message)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_includes_code_op_and_context() {
        let err = ExError::new(ExErrorKind::StoreFailed)
            .with_op("remove_hospital_stay")
            .with_entity_kind(EntityKind::HospitalStay)
            .with_object_id(7)
            .with_message("no row deleted");

        let rendered = err.to_string();
        assert!(rendered.starts_with("[ERR_STORE_FAILED]"));
        assert!(rendered.contains("remove_hospital_stay"));
        assert!(rendered.contains("HospitalStay"));
        assert!(rendered.contains("object_id: 7"));
    }

    #[test]
    fn test_source_is_exposed() {
        use std::error::Error;

        let io = std::io::Error::new(std::io::ErrorKind::Other, "socket closed");
        let err = ExError::new(ExErrorKind::FetchFailed).with_source(io);

        let source = err.source().expect("source should be kept");
        assert_eq!(source.to_string(), "socket closed");
    }

    #[test]
    fn test_unknown_entity_maps_to_not_found() {
        let err: ExError = ModelError::UnknownEntity {
            entity_kind: EntityKind::Ward,
            index: 3,
        }
        .into();

        assert_eq!(err.kind(), ExErrorKind::NotFound);
        assert_eq!(err.entity_kind(), Some(EntityKind::Ward));
    }
}
