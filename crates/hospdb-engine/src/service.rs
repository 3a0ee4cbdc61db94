//! Boundary operations of the persistence layer
//!
//! Every public operation emits exactly one start event and one end (or
//! end_error) event. Store and model code below this layer only log at debug
//! level.

#![allow(clippy::result_large_err)]

use std::time::Instant;

use chrono::NaiveDate;
use hospdb_core::errors::{ExError, ModelError};
use hospdb_core::{
    log_op_end, log_op_error, log_op_start, ops, EntityGraph, EntityKey, EntityKind, PatientKey,
    PersistentObject, StayKey, WardKey,
};
use hospdb_store::errors::Result;
use hospdb_store::repo::{hydration, stats};
use hospdb_store::{ConnectionConfig, ConnectionManager, PatientCriteria, SqliteRepo, StayCriteria};
use rusqlite::Connection;
use serde::Serialize;

/// Bed occupancy for one ward or for all wards
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BedReport {
    /// `None` when the report covers all wards
    pub ward_id: Option<i64>,
    pub free_beds: i64,
    pub allocated_beds: i64,
    pub average_stay_days: f64,
}

/// Service facade over one long-lived connection
///
/// Reads hand back keys into the caller's [`EntityGraph`]; each read inserts
/// freshly reconstructed instances. Writes take the graph mutably so that
/// generated ids can be recorded on the stored instances.
///
/// Methods take `&mut self` and perform no internal locking. Wrap the service
/// in a mutex to share it between threads.
#[derive(Debug)]
pub struct ClinicService {
    manager: ConnectionManager,
    bootstrap_schema: bool,
    /// Set on reopen, cleared once the migrations went through
    schema_pending: bool,
}

/// Run `f` between a start and an end event
fn observe<T>(op: &'static str, f: impl FnOnce() -> Result<T>) -> Result<T> {
    let start = Instant::now();
    log_op_start!(op);

    match f() {
        Ok(value) => {
            let duration_ms = start.elapsed().as_millis() as u64;
            log_op_end!(op, duration_ms = duration_ms);
            Ok(value)
        }
        Err(err) => {
            let duration_ms = start.elapsed().as_millis() as u64;
            log_op_error!(op, err.clone(), duration_ms = duration_ms);
            Err(err)
        }
    }
}

impl ClinicService {
    /// Open the connection described by `config`
    ///
    /// # Errors
    /// * `FetchFailed` - If the URL is not a SQLite location or cannot be opened
    pub fn connect(config: ConnectionConfig) -> Result<Self> {
        observe("connect", || {
            Ok(Self {
                manager: ConnectionManager::connect(config)?,
                bootstrap_schema: false,
                schema_pending: false,
            })
        })
    }

    /// Shorthand for [`ClinicService::connect`] with a URL and credentials
    ///
    /// # Errors
    /// * `FetchFailed` - If the URL is not a SQLite location or cannot be opened
    pub fn open(url: &str, user: &str, password: &str) -> Result<Self> {
        Self::connect(ConnectionConfig::new(url, user, password))
    }

    /// Apply the embedded schema migrations
    ///
    /// Once called, the schema is also re-applied whenever the connection is
    /// reopened, which keeps an in-memory database usable after `close`.
    ///
    /// # Errors
    /// * `StoreFailed` - If a migration cannot be applied
    /// * `Internal` - If an applied migration no longer matches its checksum
    pub fn init_schema(&mut self) -> Result<()> {
        observe("init_schema", || {
            hospdb_store::migrations::apply_migrations(self.manager.connection()?)
        })?;
        self.bootstrap_schema = true;
        Ok(())
    }

    /// Live connection, reopened (and re-bootstrapped) if it was closed
    ///
    /// A failed bootstrap is retried on the next call.
    fn conn(&mut self) -> Result<&mut Connection> {
        if self.bootstrap_schema && !self.manager.is_open() {
            self.schema_pending = true;
        }
        let conn = self.manager.connection()?;
        if self.schema_pending {
            hospdb_store::migrations::apply_migrations(conn)?;
            self.schema_pending = false;
        }
        Ok(conn)
    }

    pub fn is_connected(&self) -> bool {
        self.manager.is_open()
    }

    /// Close the connection; the next operation reopens it
    ///
    /// # Errors
    /// * `FetchFailed` - If SQLite refuses to close the connection
    pub fn close(&mut self) -> Result<()> {
        observe("close", || self.manager.close())
    }

    // ===== Factories =====

    /// # Errors
    /// * `InvalidInput` - If either name is blank
    pub fn create_patient(
        &self,
        graph: &mut EntityGraph,
        lastname: &str,
        firstname: &str,
    ) -> Result<PatientKey> {
        observe("create_patient", || {
            ops::create_patient(graph, lastname, firstname).map_err(with_op("create_patient"))
        })
    }

    /// # Errors
    /// * `InvalidInput` - If the name is blank or `number_of_beds` is not positive
    pub fn create_ward(
        &self,
        graph: &mut EntityGraph,
        name: &str,
        number_of_beds: i32,
    ) -> Result<WardKey> {
        observe("create_ward", || {
            ops::create_ward(graph, name, number_of_beds).map_err(with_op("create_ward"))
        })
    }

    /// Create a stay without discharge date, registered with its patient
    ///
    /// # Errors
    /// * `NotFound` - If `patient` or `ward` is not from `graph`
    pub fn create_hospital_stay(
        &self,
        graph: &mut EntityGraph,
        patient: PatientKey,
        ward: WardKey,
        admission_date: NaiveDate,
    ) -> Result<StayKey> {
        observe("create_hospital_stay", || {
            ops::create_hospital_stay(graph, patient, ward, admission_date)
                .map_err(with_op("create_hospital_stay"))
        })
    }

    // ===== Writes =====

    /// Insert or update an entity, cascading transient references
    ///
    /// # Errors
    /// * `NotFound` - If `key` is not from `graph`
    /// * `StoreFailed` - If the write fails; nothing is written and no id is assigned
    /// * `FetchFailed` - If the connection cannot be reopened
    pub fn store(&mut self, graph: &mut EntityGraph, key: impl Into<EntityKey>) -> Result<i64> {
        let key = key.into();
        let entity_kind = key.kind().as_str();
        let start = Instant::now();
        log_op_start!("store", entity_kind = entity_kind);

        let result = self
            .conn()
            .and_then(|conn| SqliteRepo::store(conn, graph, key));

        let duration_ms = start.elapsed().as_millis() as u64;
        match result {
            Ok(object_id) => {
                log_op_end!(
                    "store",
                    duration_ms = duration_ms,
                    entity_kind = entity_kind,
                    object_id = object_id
                );
                Ok(object_id)
            }
            Err(err) => {
                log_op_error!(
                    "store",
                    err.clone(),
                    duration_ms = duration_ms,
                    entity_kind = entity_kind
                );
                Err(err)
            }
        }
    }

    /// Delete a stay row by id
    ///
    /// # Errors
    /// * `InvalidInput` - If `id` is not positive
    /// * `StoreFailed` - If no stay with `id` exists
    pub fn remove_hospital_stay(&mut self, id: i64) -> Result<()> {
        observe("remove_hospital_stay", || {
            SqliteRepo::remove_hospital_stay(self.conn()?, id)
        })
    }

    // ===== Reads =====

    /// Patients matching every supplied criterion
    ///
    /// Names are matched with SQL `LIKE` as given; pass `%` explicitly for
    /// partial matches.
    ///
    /// # Errors
    /// * `FetchFailed` - If the query fails
    pub fn get_patients(
        &mut self,
        graph: &mut EntityGraph,
        lastname: Option<&str>,
        firstname: Option<&str>,
        born_from: Option<NaiveDate>,
        born_until: Option<NaiveDate>,
    ) -> Result<Vec<PatientKey>> {
        let criteria = PatientCriteria {
            id: None,
            lastname: lastname.map(str::to_string),
            firstname: firstname.map(str::to_string),
            born_from,
            born_until,
        };
        observe("get_patients", || {
            hydration::find_patients(self.conn()?, graph, &criteria)
        })
    }

    /// # Errors
    /// * `InvalidInput` - If `id` is not positive
    /// * `FetchFailed` - If the query fails
    pub fn get_patient(&mut self, graph: &mut EntityGraph, id: i64) -> Result<Option<PatientKey>> {
        observe("get_patient", || hydration::find_patient(self.conn()?, graph, id))
    }

    /// # Errors
    /// * `FetchFailed` - If the query fails
    pub fn get_wards(&mut self, graph: &mut EntityGraph) -> Result<Vec<WardKey>> {
        observe("get_wards", || hydration::find_wards(self.conn()?, graph))
    }

    /// # Errors
    /// * `InvalidInput` - If `id` is not positive
    /// * `FetchFailed` - If the query fails
    pub fn get_ward(&mut self, graph: &mut EntityGraph, id: i64) -> Result<Option<WardKey>> {
        observe("get_ward", || hydration::find_ward(self.conn()?, graph, id))
    }

    /// # Errors
    /// * `InvalidInput` - If `id` is not positive
    /// * `FetchFailed` - If a query fails or the stay's references cannot be resolved
    pub fn get_hospital_stay(&mut self, graph: &mut EntityGraph, id: i64) -> Result<Option<StayKey>> {
        observe("get_hospital_stay", || {
            hydration::find_stay(self.conn()?, graph, id)
        })
    }

    /// All stays of one patient
    ///
    /// # Errors
    /// * `InvalidInput` - If `patient_id` is not positive
    /// * `FetchFailed` - If a query fails or a stay's references cannot be resolved
    pub fn get_hospital_stays(
        &mut self,
        graph: &mut EntityGraph,
        patient_id: i64,
    ) -> Result<Vec<StayKey>> {
        observe("get_hospital_stays", || {
            hydration::find_stays(self.conn()?, graph, &StayCriteria::for_patient(patient_id))
        })
    }

    /// Stays of one patient admitted on or after `admitted_from` and
    /// discharged on or before `discharged_until`
    ///
    /// # Errors
    /// * `InvalidInput` - If `patient_id` is not positive or `admitted_from > discharged_until`
    /// * `FetchFailed` - If a query fails or a stay's references cannot be resolved
    pub fn get_hospital_stays_between(
        &mut self,
        graph: &mut EntityGraph,
        patient_id: i64,
        admitted_from: Option<NaiveDate>,
        discharged_until: Option<NaiveDate>,
    ) -> Result<Vec<StayKey>> {
        let criteria = StayCriteria {
            id: None,
            patient_id: Some(patient_id),
            admitted_from,
            discharged_until,
        };
        observe("get_hospital_stays_between", || {
            hydration::find_stays(self.conn()?, graph, &criteria)
        })
    }

    // ===== Aggregates =====

    /// Average length in days of completed stays; 0.0 when there are none
    ///
    /// # Errors
    /// * `InvalidInput` - If `ward` is given but not persistent
    /// * `NotFound` - If `ward` is not from `graph`
    /// * `FetchFailed` - If the query fails
    pub fn average_hospital_stay_duration(
        &mut self,
        graph: &EntityGraph,
        ward: Option<WardKey>,
    ) -> Result<f64> {
        observe("average_hospital_stay_duration", || {
            let ward_id = ward_filter(graph, ward, "average_hospital_stay_duration")?;
            stats::average_stay_duration(self.conn()?, ward_id)
        })
    }

    /// Number of stays without discharge date
    ///
    /// # Errors
    /// * `InvalidInput` - If `ward` is given but not persistent
    /// * `NotFound` - If `ward` is not from `graph`
    /// * `FetchFailed` - If the query fails
    pub fn allocated_beds(&mut self, graph: &EntityGraph, ward: Option<WardKey>) -> Result<i64> {
        observe("allocated_beds", || {
            let ward_id = ward_filter(graph, ward, "allocated_beds")?;
            stats::allocated_beds(self.conn()?, ward_id)
        })
    }

    /// Beds minus allocated beds
    ///
    /// # Errors
    /// * `InvalidInput` - If `ward` is given but not persistent
    /// * `NotFound` - If `ward` is not from `graph`
    /// * `FetchFailed` - If the query fails
    pub fn free_beds(&mut self, graph: &EntityGraph, ward: Option<WardKey>) -> Result<i64> {
        observe("free_beds", || {
            let ward_id = ward_filter(graph, ward, "free_beds")?;
            stats::free_beds(self.conn()?, ward_id)
        })
    }

    /// All three aggregates for one ward or across all wards
    ///
    /// # Errors
    /// * `InvalidInput` - If `ward` is given but not persistent
    /// * `NotFound` - If `ward` is not from `graph`
    /// * `FetchFailed` - If a query fails
    pub fn bed_report(&mut self, graph: &EntityGraph, ward: Option<WardKey>) -> Result<BedReport> {
        observe("bed_report", || {
            let ward_id = ward_filter(graph, ward, "bed_report")?;
            let conn = self.conn()?;
            Ok(BedReport {
                ward_id,
                free_beds: stats::free_beds(conn, ward_id)?,
                allocated_beds: stats::allocated_beds(conn, ward_id)?,
                average_stay_days: stats::average_stay_duration(conn, ward_id)?,
            })
        })
    }
}

fn with_op(op: &'static str) -> impl Fn(ModelError) -> ExError {
    move |err| ExError::from(err).with_op(op)
}

/// Object id of the ward filter, which must already have a row
fn ward_filter(graph: &EntityGraph, ward: Option<WardKey>, op: &'static str) -> Result<Option<i64>> {
    let Some(key) = ward else {
        return Ok(None);
    };
    let ward = graph.ward(key).map_err(with_op(op))?;
    if !ward.is_persistent() {
        return Err(with_op(op)(ModelError::NotPersistent {
            entity_kind: EntityKind::Ward,
        }));
    }
    Ok(Some(ward.object_id()))
}
