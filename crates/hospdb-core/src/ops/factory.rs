use chrono::NaiveDate;

use super::{register_stay, EntityGraph};
use crate::errors::Result;
use crate::model::{HospitalStay, Patient, PatientKey, StayKey, Ward, WardKey};

/// Create a transient patient in the graph
///
/// # Errors
/// * `BlankField` - If either name is empty or whitespace-only
pub fn create_patient(graph: &mut EntityGraph, lastname: &str, firstname: &str) -> Result<PatientKey> {
    let patient = Patient::new(lastname, firstname)?;
    Ok(graph.insert_patient(patient))
}

/// Create a transient ward in the graph
///
/// # Errors
/// * `BlankField` - If the name is empty or whitespace-only
/// * `NonPositiveBedCount` - If `number_of_beds` is zero or negative
pub fn create_ward(graph: &mut EntityGraph, name: &str, number_of_beds: i32) -> Result<WardKey> {
    let ward = Ward::new(name, number_of_beds)?;
    Ok(graph.insert_ward(ward))
}

/// Create a transient stay without discharge date and register it with the patient
///
/// # Errors
/// * `UnknownEntity` - If `patient` or `ward` is not from this graph
pub fn create_hospital_stay(
    graph: &mut EntityGraph,
    patient: PatientKey,
    ward: WardKey,
    admission_date: NaiveDate,
) -> Result<StayKey> {
    let key = graph.insert_stay(HospitalStay::new(patient, ward, admission_date))?;
    register_stay(graph, key)?;
    Ok(key)
}
