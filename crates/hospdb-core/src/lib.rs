//! HospDB Core - entity model and identity kernel
//!
//! This crate provides the in-memory half of the persistence layer:
//! - Identity state shared by every entity (`Identity`, `PersistentObject`)
//! - Patient, Ward and HospitalStay models with validated setters
//! - The `EntityGraph` that owns entity instances and hands out typed keys
//! - Factories and the explicit stay/patient association step
//! - The canonical error facility and structured logging macros
//!
//! SQL lives in `hospdb-store`; nothing here touches a connection.

pub mod errors;
pub mod logging_facility;
pub mod model;
pub mod ops;
pub mod rules;

// Re-export commonly used types
pub use errors::{ExError, ExErrorKind, ModelError, Result};
pub use model::{
    EntityKey, EntityKind, HospitalStay, Identity, Patient, PatientKey, PersistentObject, Person,
    StayKey, Ward, WardKey, INVALID_OBJECT_ID,
};
pub use ops::EntityGraph;
