use crate::errors::{ModelError, Result};
use crate::model::{
    EntityKey, EntityKind, HospitalStay, Identity, Patient, PatientKey, PersistentObject, StayKey,
    Ward, WardKey,
};

/// In-memory owner of entity instances
///
/// Every Patient, Ward and HospitalStay lives in one of three arenas and is
/// addressed by a typed key. Associations between entities are keys into the
/// same graph, so sharing a ward between stays or pointing a stay back at its
/// patient needs no reference counting.
///
/// Instances are never removed: a key stays valid for the lifetime of the
/// graph. Not thread-safe (no Arc/RwLock) - designed for single-threaded use;
/// callers that share a graph across threads must synchronize externally.
#[derive(Debug, Clone, Default)]
pub struct EntityGraph {
    patients: Vec<Patient>,
    wards: Vec<Ward>,
    stays: Vec<HospitalStay>,
}

impl EntityGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_patient(&mut self, patient: Patient) -> PatientKey {
        self.patients.push(patient);
        PatientKey(self.patients.len() - 1)
    }

    pub fn insert_ward(&mut self, ward: Ward) -> WardKey {
        self.wards.push(ward);
        WardKey(self.wards.len() - 1)
    }

    /// Add a stay whose patient and ward are already in this graph
    ///
    /// Does not register the stay with its patient; see
    /// `ops::association::register_stay`.
    ///
    /// # Errors
    /// * `UnknownEntity` - If the stay's patient or ward key is not from this graph
    pub fn insert_stay(&mut self, stay: HospitalStay) -> Result<StayKey> {
        self.patient(stay.patient())?;
        self.ward(stay.ward())?;
        self.stays.push(stay);
        Ok(StayKey(self.stays.len() - 1))
    }

    /// # Errors
    /// * `UnknownEntity` - If the key is not from this graph
    pub fn patient(&self, key: PatientKey) -> Result<&Patient> {
        self.patients
            .get(key.0)
            .ok_or_else(|| unknown(EntityKind::Patient, key.0))
    }

    /// # Errors
    /// * `UnknownEntity` - If the key is not from this graph
    pub fn patient_mut(&mut self, key: PatientKey) -> Result<&mut Patient> {
        self.patients
            .get_mut(key.0)
            .ok_or_else(|| unknown(EntityKind::Patient, key.0))
    }

    /// # Errors
    /// * `UnknownEntity` - If the key is not from this graph
    pub fn ward(&self, key: WardKey) -> Result<&Ward> {
        self.wards
            .get(key.0)
            .ok_or_else(|| unknown(EntityKind::Ward, key.0))
    }

    /// # Errors
    /// * `UnknownEntity` - If the key is not from this graph
    pub fn ward_mut(&mut self, key: WardKey) -> Result<&mut Ward> {
        self.wards
            .get_mut(key.0)
            .ok_or_else(|| unknown(EntityKind::Ward, key.0))
    }

    /// # Errors
    /// * `UnknownEntity` - If the key is not from this graph
    pub fn stay(&self, key: StayKey) -> Result<&HospitalStay> {
        self.stays
            .get(key.0)
            .ok_or_else(|| unknown(EntityKind::HospitalStay, key.0))
    }

    /// Mutable access to a stay
    ///
    /// Re-pointing the stay at another ward goes through `set_ward`; the ward
    /// key is re-checked against this graph when the stay is stored.
    ///
    /// # Errors
    /// * `UnknownEntity` - If the key is not from this graph
    pub fn stay_mut(&mut self, key: StayKey) -> Result<&mut HospitalStay> {
        self.stays
            .get_mut(key.0)
            .ok_or_else(|| unknown(EntityKind::HospitalStay, key.0))
    }

    /// Identity state of any entity in the graph
    ///
    /// # Errors
    /// * `UnknownEntity` - If the key is not from this graph
    pub fn identity(&self, key: EntityKey) -> Result<Identity> {
        Ok(match key {
            EntityKey::Patient(k) => *self.patient(k)?.identity(),
            EntityKey::Ward(k) => *self.ward(k)?.identity(),
            EntityKey::HospitalStay(k) => *self.stay(k)?.identity(),
        })
    }

    /// # Errors
    /// * `UnknownEntity` - If the key is not from this graph
    pub fn is_persistent(&self, key: EntityKey) -> Result<bool> {
        Ok(self.identity(key)?.is_persistent())
    }

    /// # Errors
    /// * `UnknownEntity` - If the key is not from this graph
    pub fn object_id(&self, key: EntityKey) -> Result<i64> {
        Ok(self.identity(key)?.object_id())
    }

    /// Record a generated key on a transient entity
    ///
    /// # Errors
    /// * `UnknownEntity` - If the key is not from this graph
    ///
    /// # Panics
    ///
    /// Panics if the entity is already persistent (see `Identity::assign`).
    pub fn assign_identity(&mut self, key: EntityKey, id: i64) -> Result<()> {
        let identity = match key {
            EntityKey::Patient(k) => self.patient_mut(k)?.identity_mut(),
            EntityKey::Ward(k) => self.ward_mut(k)?.identity_mut(),
            EntityKey::HospitalStay(k) => self.stay_mut(k)?.identity_mut(),
        };
        identity.assign(id);
        Ok(())
    }

    pub fn patients(&self) -> impl Iterator<Item = (PatientKey, &Patient)> + '_ {
        self.patients
            .iter()
            .enumerate()
            .map(|(i, p)| (PatientKey(i), p))
    }

    pub fn wards(&self) -> impl Iterator<Item = (WardKey, &Ward)> + '_ {
        self.wards.iter().enumerate().map(|(i, w)| (WardKey(i), w))
    }

    pub fn stays(&self) -> impl Iterator<Item = (StayKey, &HospitalStay)> + '_ {
        self.stays.iter().enumerate().map(|(i, s)| (StayKey(i), s))
    }

    /// Total number of instances across all arenas
    pub fn len(&self) -> usize {
        self.patients.len() + self.wards.len() + self.stays.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn unknown(entity_kind: EntityKind, index: usize) -> ModelError {
    ModelError::UnknownEntity { entity_kind, index }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn admission() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, 5).unwrap()
    }

    #[test]
    fn test_keys_are_per_instance() {
        let mut graph = EntityGraph::new();
        let a = graph.insert_ward(Ward::new("Cardiology", 10).unwrap());
        let b = graph.insert_ward(Ward::new("Cardiology", 10).unwrap());

        assert_ne!(a, b);
        assert_eq!(graph.ward(a).unwrap(), graph.ward(b).unwrap());
    }

    #[test]
    fn test_insert_stay_rejects_foreign_keys() {
        let mut graph = EntityGraph::new();
        let patient = graph.insert_patient(Patient::new("Doe", "Jane").unwrap());

        let stay = HospitalStay::new(patient, WardKey(42), admission());
        let err = graph.insert_stay(stay).unwrap_err();
        assert_eq!(
            err,
            ModelError::UnknownEntity {
                entity_kind: EntityKind::Ward,
                index: 42
            }
        );
        assert_eq!(graph.stays().count(), 0);
    }

    #[test]
    fn test_assign_identity_through_entity_key() {
        let mut graph = EntityGraph::new();
        let ward = graph.insert_ward(Ward::new("ICU", 4).unwrap());

        assert!(!graph.is_persistent(ward.into()).unwrap());
        graph.assign_identity(ward.into(), 12).unwrap();
        assert!(graph.is_persistent(ward.into()).unwrap());
        assert_eq!(graph.object_id(ward.into()).unwrap(), 12);
    }

    #[test]
    fn test_len_counts_all_arenas() {
        let mut graph = EntityGraph::new();
        assert!(graph.is_empty());
        let patient = graph.insert_patient(Patient::new("Doe", "Jane").unwrap());
        let ward = graph.insert_ward(Ward::new("ICU", 4).unwrap());
        graph
            .insert_stay(HospitalStay::new(patient, ward, admission()))
            .unwrap();
        assert_eq!(graph.len(), 3);
    }
}
