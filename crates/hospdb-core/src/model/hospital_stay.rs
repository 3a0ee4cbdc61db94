use chrono::NaiveDate;
use serde::Serialize;

use super::{EntityKind, Identity, PatientKey, PersistentObject, WardKey};
use crate::errors::Result;
use crate::rules::validation;

/// A patient's stay on a ward (`Aufenthalt` table)
///
/// Holds exactly one ward and one patient. Constructing a stay does not
/// touch the patient; registration into the patient's stay set is the
/// separate step `ops::association::register_stay`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HospitalStay {
    #[serde(rename = "id")]
    identity: Identity,
    admission_date: NaiveDate,
    discharge_date: Option<NaiveDate>,
    ward: WardKey,
    patient: PatientKey,
}

impl HospitalStay {
    /// Create a transient stay without discharge date
    pub fn new(patient: PatientKey, ward: WardKey, admission_date: NaiveDate) -> Self {
        Self {
            identity: Identity::transient(),
            admission_date,
            discharge_date: None,
            ward,
            patient,
        }
    }

    /// Rebuild a persistent stay from an `Aufenthalt` row
    pub fn reconstruct(
        id: i64,
        admission_date: NaiveDate,
        discharge_date: Option<NaiveDate>,
        ward: WardKey,
        patient: PatientKey,
    ) -> Self {
        Self {
            identity: Identity::persistent(id),
            admission_date,
            discharge_date,
            ward,
            patient,
        }
    }

    pub fn admission_date(&self) -> NaiveDate {
        self.admission_date
    }

    pub fn discharge_date(&self) -> Option<NaiveDate> {
        self.discharge_date
    }

    pub fn ward(&self) -> WardKey {
        self.ward
    }

    pub fn patient(&self) -> PatientKey {
        self.patient
    }

    /// # Errors
    /// * `AdmissionAfterDischarge` - If a discharge date is set and precedes `date`
    pub fn set_admission_date(&mut self, date: NaiveDate) -> Result<()> {
        self.admission_date = validation::check_admission_date(date, self.discharge_date)?;
        Ok(())
    }

    /// Set or clear the discharge date; clearing always succeeds
    ///
    /// # Errors
    /// * `DischargeBeforeAdmission` - If `date` precedes the admission date
    pub fn set_discharge_date(&mut self, date: Option<NaiveDate>) -> Result<()> {
        self.discharge_date = validation::check_discharge_date(self.admission_date, date)?;
        Ok(())
    }

    pub fn set_ward(&mut self, ward: WardKey) {
        self.ward = ward;
    }
}

impl PersistentObject for HospitalStay {
    const KIND: EntityKind = EntityKind::HospitalStay;

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

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn stay() -> HospitalStay {
        HospitalStay::new(PatientKey(0), WardKey(0), date(2024, 1, 5))
    }

    #[test]
    fn test_discharge_before_admission_rejected() {
        let mut stay = stay();
        let err = stay.set_discharge_date(Some(date(2024, 1, 4))).unwrap_err();
        assert!(matches!(err, ModelError::DischargeBeforeAdmission { .. }));
        assert_eq!(stay.discharge_date(), None);
    }

    #[test]
    fn test_admission_after_discharge_rejected() {
        let mut stay = stay();
        stay.set_discharge_date(Some(date(2024, 1, 10))).unwrap();

        let err = stay.set_admission_date(date(2024, 1, 11)).unwrap_err();
        assert!(matches!(err, ModelError::AdmissionAfterDischarge { .. }));
        assert_eq!(stay.admission_date(), date(2024, 1, 5));
    }

    #[test]
    fn test_clearing_discharge_date_always_accepted() {
        let mut stay = stay();
        stay.set_discharge_date(Some(date(2024, 1, 8))).unwrap();
        assert!(stay.set_discharge_date(None).is_ok());
        assert_eq!(stay.discharge_date(), None);
    }

    #[test]
    fn test_admission_can_move_freely_without_discharge() {
        let mut stay = stay();
        stay.set_admission_date(date(2030, 6, 1)).unwrap();
        assert_eq!(stay.admission_date(), date(2030, 6, 1));
    }
}
