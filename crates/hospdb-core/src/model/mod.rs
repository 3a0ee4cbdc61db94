pub mod hospital_stay;
pub mod identity;
pub mod keys;
pub mod patient;
pub mod person;
pub mod ward;

pub use hospital_stay::HospitalStay;
pub use identity::{EntityKind, Identity, PersistentObject, INVALID_OBJECT_ID};
pub use keys::{EntityKey, PatientKey, StayKey, WardKey};
pub use patient::Patient;
pub use person::Person;
pub use ward::Ward;
