//! Store dispatcher
//!
//! Maps entity graph instances onto `Person`, `Patient`, `Station` and
//! `Aufenthalt` rows.

#![allow(clippy::result_large_err)]

use std::collections::HashMap;

use hospdb_core::rules::validation;
use hospdb_core::{
    EntityGraph, EntityKey, EntityKind, HospitalStay, Patient, PersistentObject, Ward,
};
use rusqlite::{Connection, OptionalExtension};

use crate::errors::{model_error, store_failure, store_rejected, Result};

/// Keys generated inside the open transaction, not yet written to the graph
type PendingIds = HashMap<EntityKey, i64>;

/// SQLite repository for the hospital entities
pub struct SqliteRepo;

impl SqliteRepo {
    /// Store an entity and return its object id
    ///
    /// A persistent entity is updated in place and keeps its id. A transient
    /// one is inserted, after any transient ward or patient it references has
    /// been inserted first. The whole cascade runs in one transaction and the
    /// generated ids are written into the graph only after commit, so a
    /// failure leaves neither rows nor half-assigned identities behind.
    ///
    /// # Errors
    /// * `NotFound` - If `key` (or a key it references) is not from this graph
    /// * `StoreFailed` - If a statement fails, no generated key comes back, or
    ///   an update finds no row
    pub fn store(conn: &mut Connection, graph: &mut EntityGraph, key: EntityKey) -> Result<i64> {
        let mut pending = PendingIds::new();

        let tx = conn.transaction().map_err(|e| store_failure("store", e))?;
        let id = Self::store_entity(&tx, graph, key, &mut pending)?;
        tx.commit().map_err(|e| store_failure("store", e))?;

        for (key, id) in pending {
            graph
                .assign_identity(key, id)
                .map_err(model_error("store"))?;
        }

        Ok(id)
    }

    fn store_entity(
        conn: &Connection,
        graph: &EntityGraph,
        key: EntityKey,
        pending: &mut PendingIds,
    ) -> Result<i64> {
        if let Some(id) = pending.get(&key) {
            return Ok(*id);
        }

        match key {
            EntityKey::Ward(k) => {
                let ward = graph.ward(k).map_err(model_error("store"))?;
                if ward.is_persistent() {
                    Self::update_ward(conn, ward)
                } else {
                    let id = Self::insert_ward(conn, ward)?;
                    pending.insert(key, id);
                    Ok(id)
                }
            }
            EntityKey::Patient(k) => {
                let patient = graph.patient(k).map_err(model_error("store"))?;
                if patient.is_persistent() {
                    Self::update_patient(conn, patient)
                } else {
                    let id = Self::insert_patient(conn, patient)?;
                    pending.insert(key, id);
                    Ok(id)
                }
            }
            EntityKey::HospitalStay(k) => {
                let stay = graph.stay(k).map_err(model_error("store"))?;
                let ward_id = Self::reference_id(conn, graph, stay.ward().into(), pending)?;
                let patient_id = Self::reference_id(conn, graph, stay.patient().into(), pending)?;

                if stay.is_persistent() {
                    Self::update_stay(conn, stay, patient_id, ward_id)
                } else {
                    let id = Self::insert_stay(conn, stay, patient_id, ward_id)?;
                    pending.insert(key, id);
                    Ok(id)
                }
            }
        }
    }

    /// Id of a referenced entity, cascading the store when it is still transient
    fn reference_id(
        conn: &Connection,
        graph: &EntityGraph,
        key: EntityKey,
        pending: &mut PendingIds,
    ) -> Result<i64> {
        if graph.is_persistent(key).map_err(model_error("store"))? {
            return graph.object_id(key).map_err(model_error("store"));
        }
        tracing::debug!(entity_kind = %key.kind(), "cascading store of transient reference");
        Self::store_entity(conn, graph, key, pending)
    }

    fn insert_ward(conn: &Connection, ward: &Ward) -> Result<i64> {
        let id = conn
            .query_row(
                "INSERT INTO Station (Bezeichnung, Bettenzahl) VALUES (?1, ?2) RETURNING ID",
                rusqlite::params![ward.name(), ward.number_of_beds()],
                |row| row.get(0),
            )
            .optional()
            .map_err(|e| store_failure("store", e))?;
        generated(id, EntityKind::Ward)
    }

    fn update_ward(conn: &Connection, ward: &Ward) -> Result<i64> {
        let rows = conn
            .execute(
                "UPDATE Station SET Bezeichnung = ?1, Bettenzahl = ?2 WHERE ID = ?3",
                rusqlite::params![ward.name(), ward.number_of_beds(), ward.object_id()],
            )
            .map_err(|e| store_failure("store", e))?;
        updated(rows, EntityKind::Ward, ward.object_id())
    }

    /// Person row first, then the Patient row keyed by the Person id
    fn insert_patient(conn: &Connection, patient: &Patient) -> Result<i64> {
        let person = patient.person();
        let id = conn
            .query_row(
                "INSERT INTO Person (Vorname, Nachname, Geburtsdatum) VALUES (?1, ?2, ?3) RETURNING ID",
                rusqlite::params![person.firstname(), person.lastname(), person.date_of_birth()],
                |row| row.get(0),
            )
            .optional()
            .map_err(|e| store_failure("store", e))?;
        let id = generated(id, EntityKind::Patient)?;

        conn.execute(
            "INSERT INTO Patient (ID, Krankenkasse, Versicherungsnummer) VALUES (?1, ?2, ?3)",
            rusqlite::params![id, patient.health_insurance(), patient.insurance_number()],
        )
        .map_err(|e| store_failure("store", e))?;

        Ok(id)
    }

    fn update_patient(conn: &Connection, patient: &Patient) -> Result<i64> {
        let person = patient.person();
        let id = patient.object_id();

        let rows = conn
            .execute(
                "UPDATE Person SET Vorname = ?1, Nachname = ?2, Geburtsdatum = ?3 WHERE ID = ?4",
                rusqlite::params![person.firstname(), person.lastname(), person.date_of_birth(), id],
            )
            .map_err(|e| store_failure("store", e))?;
        updated(rows, EntityKind::Patient, id)?;

        let rows = conn
            .execute(
                "UPDATE Patient SET Krankenkasse = ?1, Versicherungsnummer = ?2 WHERE ID = ?3",
                rusqlite::params![patient.health_insurance(), patient.insurance_number(), id],
            )
            .map_err(|e| store_failure("store", e))?;
        updated(rows, EntityKind::Patient, id)
    }

    fn insert_stay(
        conn: &Connection,
        stay: &HospitalStay,
        patient_id: i64,
        ward_id: i64,
    ) -> Result<i64> {
        let id = conn
            .query_row(
                "INSERT INTO Aufenthalt (PID, SID, Aufnahmedatum, Entlassdatum)
                 VALUES (?1, ?2, ?3, ?4) RETURNING ID",
                rusqlite::params![patient_id, ward_id, stay.admission_date(), stay.discharge_date()],
                |row| row.get(0),
            )
            .optional()
            .map_err(|e| store_failure("store", e))?;
        generated(id, EntityKind::HospitalStay)
    }

    fn update_stay(
        conn: &Connection,
        stay: &HospitalStay,
        patient_id: i64,
        ward_id: i64,
    ) -> Result<i64> {
        let rows = conn
            .execute(
                "UPDATE Aufenthalt SET PID = ?1, SID = ?2, Aufnahmedatum = ?3, Entlassdatum = ?4
                 WHERE ID = ?5",
                rusqlite::params![
                    patient_id,
                    ward_id,
                    stay.admission_date(),
                    stay.discharge_date(),
                    stay.object_id()
                ],
            )
            .map_err(|e| store_failure("store", e))?;
        updated(rows, EntityKind::HospitalStay, stay.object_id())
    }

    /// Delete a stay row by id
    ///
    /// # Errors
    /// * `InvalidInput` - If `id` is not positive
    /// * `StoreFailed` - If no row was deleted or the statement fails
    pub fn remove_hospital_stay(conn: &Connection, id: i64) -> Result<()> {
        validation::require_positive_id(EntityKind::HospitalStay, id)
            .map_err(model_error("remove_hospital_stay"))?;

        let rows = conn
            .execute("DELETE FROM Aufenthalt WHERE ID = ?1", [id])
            .map_err(|e| store_failure("remove_hospital_stay", e))?;

        if rows == 0 {
            return Err(store_rejected(
                "remove_hospital_stay",
                EntityKind::HospitalStay,
                format!("Hospital stay with id {} does not exist", id),
            )
            .with_object_id(id));
        }
        Ok(())
    }
}

fn generated(id: Option<i64>, entity_kind: EntityKind) -> Result<i64> {
    match id {
        Some(id) if id > 0 => Ok(id),
        _ => Err(store_rejected(
            "store",
            entity_kind,
            "insert returned no generated key",
        )),
    }
}

fn updated(rows: usize, entity_kind: EntityKind, id: i64) -> Result<i64> {
    if rows == 0 {
        return Err(store_rejected(
            "store",
            entity_kind,
            format!("no row with id {} to update", id),
        )
        .with_object_id(id));
    }
    Ok(id)
}
