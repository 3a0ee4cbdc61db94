use chrono::NaiveDate;
use hospdb_core::ops::{create_hospital_stay, create_patient, create_ward};
use hospdb_core::{EntityGraph, PatientKey, StayKey, WardKey};
use rusqlite::Connection;

/// In-memory database with foreign keys on and the schema applied
#[allow(dead_code)]
pub fn setup_test_db() -> Connection {
    let mut conn = hospdb_store::db::open_in_memory().unwrap();
    hospdb_store::migrations::apply_migrations(&mut conn).unwrap();
    conn
}

#[allow(dead_code)]
pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

#[allow(dead_code)]
pub fn count_rows(conn: &Connection, table: &str) -> i64 {
    conn.query_row(&format!("SELECT COUNT(*) FROM {}", table), [], |row| {
        row.get(0)
    })
    .unwrap()
}

/// Transient Jane Doe on a transient 10-bed Cardiology ward, admitted 2024-01-05
#[allow(dead_code)]
pub fn cardiology_admission(graph: &mut EntityGraph) -> (PatientKey, WardKey, StayKey) {
    let patient = create_patient(graph, "Doe", "Jane").unwrap();
    let ward = create_ward(graph, "Cardiology", 10).unwrap();
    let stay = create_hospital_stay(graph, patient, ward, date(2024, 1, 5)).unwrap();
    (patient, ward, stay)
}
