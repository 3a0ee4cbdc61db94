use serde::Serialize;
use std::collections::HashSet;

use super::{EntityKind, Identity, PersistentObject, Person, StayKey};
use crate::errors::Result;

/// A patient: a Person with insurance data (`Person` + `Patient` tables)
///
/// The stay set holds the keys of the HospitalStay instances registered for
/// this patient in the same graph. Membership is by instance, so two stays
/// with identical fields are still two members.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Patient {
    #[serde(rename = "id")]
    identity: Identity,
    #[serde(flatten)]
    person: Person,
    health_insurance: Option<String>,
    insurance_number: Option<String>,
    #[serde(skip)]
    hospital_stays: HashSet<StayKey>,
}

impl Patient {
    /// Create a transient patient
    ///
    /// # Errors
    /// * `BlankField` - If either name is empty or whitespace-only
    pub fn new(lastname: &str, firstname: &str) -> Result<Self> {
        Ok(Self {
            identity: Identity::transient(),
            person: Person::new(lastname, firstname)?,
            health_insurance: None,
            insurance_number: None,
            hospital_stays: HashSet::new(),
        })
    }

    /// Rebuild a persistent patient from a joined `Person`/`Patient` row
    pub fn reconstruct(
        id: i64,
        person: Person,
        health_insurance: Option<String>,
        insurance_number: Option<String>,
    ) -> Self {
        Self {
            identity: Identity::persistent(id),
            person,
            health_insurance,
            insurance_number,
            hospital_stays: HashSet::new(),
        }
    }

    pub fn person(&self) -> &Person {
        &self.person
    }

    pub fn person_mut(&mut self) -> &mut Person {
        &mut self.person
    }

    pub fn health_insurance(&self) -> Option<&str> {
        self.health_insurance.as_deref()
    }

    pub fn insurance_number(&self) -> Option<&str> {
        self.insurance_number.as_deref()
    }

    pub fn set_health_insurance(&mut self, health_insurance: Option<String>) {
        self.health_insurance = health_insurance;
    }

    pub fn set_insurance_number(&mut self, insurance_number: Option<String>) {
        self.insurance_number = insurance_number;
    }

    /// Keys of the stays registered for this patient (unordered)
    pub fn hospital_stays(&self) -> &HashSet<StayKey> {
        &self.hospital_stays
    }

    /// Returns false when the stay was already registered
    pub(crate) fn register_stay(&mut self, stay: StayKey) -> bool {
        self.hospital_stays.insert(stay)
    }
}

impl PersistentObject for Patient {
    const KIND: EntityKind = EntityKind::Patient;

    fn identity(&self) -> &Identity {
        &self.identity
    }

    fn identity_mut(&mut self) -> &mut Identity {
        &mut self.identity
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ModelError;

    #[test]
    fn test_new_patient_is_transient_without_stays() {
        let patient = Patient::new("Doe", "Jane").unwrap();
        assert!(!patient.is_persistent());
        assert!(patient.hospital_stays().is_empty());
        assert_eq!(patient.health_insurance(), None);
    }

    #[test]
    fn test_empty_lastname_rejected() {
        assert_eq!(
            Patient::new("", "Jane"),
            Err(ModelError::BlankField { field: "lastname" })
        );
    }

    #[test]
    fn test_register_stay_is_set_semantics() {
        let mut patient = Patient::new("Doe", "Jane").unwrap();
        assert!(patient.register_stay(StayKey(0)));
        assert!(!patient.register_stay(StayKey(0)));
        assert!(patient.register_stay(StayKey(1)));
        assert_eq!(patient.hospital_stays().len(), 2);
    }

    #[test]
    fn test_serializes_flat_person_fields() {
        let mut patient = Patient::reconstruct(
            5,
            Person::reconstruct("Doe".to_string(), "Jane".to_string(), None),
            Some("AOK".to_string()),
            None,
        );
        patient.set_insurance_number(Some("A123".to_string()));

        let json = serde_json::to_value(&patient).unwrap();
        assert_eq!(json["id"], 5);
        assert_eq!(json["lastname"], "Doe");
        assert_eq!(json["insurance_number"], "A123");
    }
}
