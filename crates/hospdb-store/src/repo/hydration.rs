//! Reconstruction engine - builds entity graph instances from query rows
//!
//! Every row becomes a fresh persistent instance built straight from column
//! values, without re-running setter validation. There is no identity map:
//! reading the same row twice yields two instances with equal fields, and a
//! stay resolves its ward and patient through nested point lookups, so each
//! stay row gets its own Ward and Patient instances.

#![allow(clippy::result_large_err)]

use chrono::NaiveDate;
use hospdb_core::ops::register_stay;
use hospdb_core::rules::validation;
use hospdb_core::{
    EntityGraph, EntityKind, HospitalStay, Patient, PatientKey, Person, StayKey, Ward, WardKey,
};
use rusqlite::{params_from_iter, Connection, Row};

use crate::errors::{dangling_reference, fetch_failure, invalid_row_id, model_error, Result};
use crate::repo::criteria::{PatientCriteria, SelectBuilder, StayCriteria};

const SELECT_PATIENTS: &str = "SELECT p.ID, pe.Vorname, pe.Nachname, pe.Geburtsdatum, \
     p.Krankenkasse, p.Versicherungsnummer \
     FROM Patient p JOIN Person pe ON p.ID = pe.ID";

const SELECT_WARDS: &str = "SELECT ID, Bezeichnung, Bettenzahl FROM Station";

const SELECT_STAYS: &str = "SELECT ID, PID, SID, Aufnahmedatum, Entlassdatum FROM Aufenthalt";

struct StayRow {
    id: i64,
    patient_id: Option<i64>,
    ward_id: Option<i64>,
    admission_date: NaiveDate,
    discharge_date: Option<NaiveDate>,
}

/// Run a built SELECT and map each row
///
/// Row mappers return an inner `Result` for rows that read fine but cannot
/// become an entity; those get the operation name attached.
fn query_rows<T, F>(conn: &Connection, op: &str, query: &SelectBuilder, map: F) -> Result<Vec<T>>
where
    F: FnMut(&Row<'_>) -> rusqlite::Result<Result<T>>,
{
    let mut stmt = conn.prepare(query.sql()).map_err(|e| fetch_failure(op, e))?;
    let rows = stmt
        .query_map(params_from_iter(query.params()), map)
        .map_err(|e| fetch_failure(op, e))?
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(|e| fetch_failure(op, e))?;
    rows.into_iter()
        .map(|row| row.map_err(|e| e.with_op(op)))
        .collect()
}

/// ID column of a row, which must be a generated key
fn row_id(row: &Row<'_>, entity_kind: EntityKind) -> rusqlite::Result<Result<i64>> {
    let id: i64 = row.get(0)?;
    if id > 0 {
        Ok(Ok(id))
    } else {
        Ok(Err(invalid_row_id(entity_kind, id)))
    }
}

fn patient_from_row(row: &Row<'_>) -> rusqlite::Result<Result<Patient>> {
    let id = match row_id(row, EntityKind::Patient)? {
        Ok(id) => id,
        Err(err) => return Ok(Err(err)),
    };
    let person = Person::reconstruct(row.get(2)?, row.get(1)?, row.get(3)?);
    Ok(Ok(Patient::reconstruct(id, person, row.get(4)?, row.get(5)?)))
}

fn ward_from_row(row: &Row<'_>) -> rusqlite::Result<Result<Ward>> {
    let id = match row_id(row, EntityKind::Ward)? {
        Ok(id) => id,
        Err(err) => return Ok(Err(err)),
    };
    Ok(Ok(Ward::reconstruct(id, row.get(1)?, row.get(2)?)))
}

fn stay_from_row(row: &Row<'_>) -> rusqlite::Result<Result<StayRow>> {
    let id = match row_id(row, EntityKind::HospitalStay)? {
        Ok(id) => id,
        Err(err) => return Ok(Err(err)),
    };
    Ok(Ok(StayRow {
        id,
        patient_id: row.get(1)?,
        ward_id: row.get(2)?,
        admission_date: row.get(3)?,
        discharge_date: row.get(4)?,
    }))
}

/// Load all patients matching the criteria, ordered by id
///
/// # Errors
/// * `FetchFailed` - If the query fails or a row has a non-positive ID
pub fn find_patients(
    conn: &Connection,
    graph: &mut EntityGraph,
    criteria: &PatientCriteria,
) -> Result<Vec<PatientKey>> {
    let query = SelectBuilder::new(SELECT_PATIENTS)
        .and_opt("p.ID = ?", criteria.id)
        .and_opt("pe.Nachname LIKE ?", criteria.lastname.clone())
        .and_opt("pe.Vorname LIKE ?", criteria.firstname.clone())
        .and_date("pe.Geburtsdatum >= ?", criteria.born_from)
        .and_date("pe.Geburtsdatum <= ?", criteria.born_until)
        .order_by("p.ID");

    let patients = query_rows(conn, "get_patients", &query, patient_from_row)?;
    Ok(patients
        .into_iter()
        .map(|patient| graph.insert_patient(patient))
        .collect())
}

/// Load one patient by id
///
/// # Errors
/// * `InvalidInput` - If `id` is not positive
/// * `FetchFailed` - If the query fails
pub fn find_patient(
    conn: &Connection,
    graph: &mut EntityGraph,
    id: i64,
) -> Result<Option<PatientKey>> {
    validation::require_positive_id(EntityKind::Patient, id).map_err(model_error("get_patient"))?;
    Ok(find_patients(conn, graph, &PatientCriteria::by_id(id))?
        .into_iter()
        .next())
}

/// Load all wards, ordered by id
///
/// # Errors
/// * `FetchFailed` - If the query fails or a row has a non-positive ID
pub fn find_wards(conn: &Connection, graph: &mut EntityGraph) -> Result<Vec<WardKey>> {
    let query = SelectBuilder::new(SELECT_WARDS).order_by("ID");
    let wards = query_rows(conn, "get_wards", &query, ward_from_row)?;
    Ok(wards.into_iter().map(|ward| graph.insert_ward(ward)).collect())
}

/// Load one ward by id
///
/// # Errors
/// * `InvalidInput` - If `id` is not positive
/// * `FetchFailed` - If the query fails
pub fn find_ward(conn: &Connection, graph: &mut EntityGraph, id: i64) -> Result<Option<WardKey>> {
    validation::require_positive_id(EntityKind::Ward, id).map_err(model_error("get_ward"))?;

    let query = SelectBuilder::new(SELECT_WARDS).and("ID = ?", id);
    let ward = query_rows(conn, "get_ward", &query, ward_from_row)?
        .into_iter()
        .next();
    Ok(ward.map(|ward| graph.insert_ward(ward)))
}

/// Load all stays matching the criteria, ordered by id
///
/// Each row's ward and patient are loaded with their own point lookups.
///
/// # Errors
/// * `InvalidInput` - If `patient_id` is not positive or the date bounds are inverted
/// * `FetchFailed` - If a query fails or a row references no (or a missing) ward or patient
pub fn find_stays(
    conn: &Connection,
    graph: &mut EntityGraph,
    criteria: &StayCriteria,
) -> Result<Vec<StayKey>> {
    if let Some(patient_id) = criteria.patient_id {
        validation::require_positive_id(EntityKind::Patient, patient_id)
            .map_err(model_error("get_hospital_stays"))?;
    }
    validation::check_date_range(criteria.admitted_from, criteria.discharged_until)
        .map_err(model_error("get_hospital_stays"))?;

    let query = SelectBuilder::new(SELECT_STAYS)
        .and_opt("ID = ?", criteria.id)
        .and_opt("PID = ?", criteria.patient_id)
        .and_date("Aufnahmedatum >= ?", criteria.admitted_from)
        .and_date("Entlassdatum <= ?", criteria.discharged_until)
        .order_by("ID");

    let rows = query_rows(conn, "get_hospital_stays", &query, stay_from_row)?;

    let mut keys = Vec::with_capacity(rows.len());
    for row in rows {
        keys.push(reconstruct_stay(conn, graph, row)?);
    }
    Ok(keys)
}

/// Load one stay by id
///
/// # Errors
/// * `InvalidInput` - If `id` is not positive
/// * `FetchFailed` - If a query fails or the row's references cannot be resolved
pub fn find_stay(conn: &Connection, graph: &mut EntityGraph, id: i64) -> Result<Option<StayKey>> {
    validation::require_positive_id(EntityKind::HospitalStay, id)
        .map_err(model_error("get_hospital_stay"))?;
    Ok(find_stays(conn, graph, &StayCriteria::by_id(id))?
        .into_iter()
        .next())
}

fn reconstruct_stay(conn: &Connection, graph: &mut EntityGraph, row: StayRow) -> Result<StayKey> {
    let op = "get_hospital_stays";

    let ward = match row.ward_id.filter(|id| *id > 0) {
        Some(ward_id) => find_ward(conn, graph, ward_id)?,
        None => None,
    }
    .ok_or_else(|| dangling_reference(op, EntityKind::Ward, row.id))?;

    let patient = match row.patient_id.filter(|id| *id > 0) {
        Some(patient_id) => find_patient(conn, graph, patient_id)?,
        None => None,
    }
    .ok_or_else(|| dangling_reference(op, EntityKind::Patient, row.id))?;

    let stay = HospitalStay::reconstruct(
        row.id,
        row.admission_date,
        row.discharge_date,
        ward,
        patient,
    );
    let key = graph.insert_stay(stay).map_err(model_error(op))?;
    register_stay(graph, key).map_err(model_error(op))?;

    tracing::debug!(object_id = row.id, "hospital stay reconstructed");
    Ok(key)
}
