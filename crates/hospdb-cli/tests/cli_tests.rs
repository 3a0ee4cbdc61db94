//! CLI integration tests
//!
//! Each test runs the built binary against a fresh database file in a
//! temporary directory.

use rusqlite::Connection;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use tempfile::TempDir;

fn hospdb(db_path: &Path, args: &[&str]) -> Output {
    let cli_bin = env!("CARGO_BIN_EXE_hospdb");
    let mut full_args = vec!["--url", db_path.to_str().unwrap(), "--log", "prod"];
    full_args.extend_from_slice(args);

    Command::new(cli_bin)
        .current_dir(db_path.parent().unwrap())
        .env_remove("HOSPDB_URL")
        .env_remove("HOSPDB_USER")
        .env_remove("HOSPDB_PASSWORD")
        .env_remove("HOSPDB_LOG")
        .args(full_args)
        .output()
        .expect("failed to run hospdb")
}

fn hospdb_json(db_path: &Path, args: &[&str]) -> serde_json::Value {
    let mut full_args = vec!["--json"];
    full_args.extend_from_slice(args);
    let output = hospdb(db_path, &full_args);
    assert!(
        output.status.success(),
        "hospdb {:?} failed: {}",
        args,
        String::from_utf8_lossy(&output.stderr)
    );
    serde_json::from_slice(&output.stdout).expect("stdout should be JSON")
}

fn initialized_db(temp_dir: &TempDir) -> PathBuf {
    let db_path = temp_dir.path().join("clinic.sqlite");
    let output = hospdb(&db_path, &["init"]);
    assert!(output.status.success());
    db_path
}

#[test]
fn test_init_creates_schema() {
    let temp_dir = TempDir::new().unwrap();
    let db_path = initialized_db(&temp_dir);

    let conn = Connection::open(&db_path).unwrap();
    let tables: i64 = conn
        .query_row(
            "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' \
             AND name IN ('Person', 'Patient', 'Station', 'Aufenthalt')",
            [],
            |row| row.get(0),
        )
        .unwrap();
    assert_eq!(tables, 4);
}

#[test]
fn test_admit_and_list_stays() {
    // Given: one ward and one patient
    let temp_dir = TempDir::new().unwrap();
    let db_path = initialized_db(&temp_dir);

    let ward = hospdb_json(&db_path, &["ward", "add", "--name", "Cardiology", "--beds", "10"]);
    let patient = hospdb_json(
        &db_path,
        &[
            "patient",
            "add",
            "--lastname",
            "Doe",
            "--firstname",
            "John",
            "--born",
            "1970-05-01",
        ],
    );
    let ward_id = ward["id"].as_i64().unwrap();
    let patient_id = patient["id"].as_i64().unwrap();
    assert!(ward_id > 0);
    assert!(patient_id > 0);
    assert_eq!(patient["date_of_birth"], "1970-05-01");

    // When: the patient is admitted
    let stay = hospdb_json(
        &db_path,
        &[
            "stay",
            "admit",
            "--patient",
            &patient_id.to_string(),
            "--ward",
            &ward_id.to_string(),
            "--date",
            "2024-01-10",
        ],
    );

    // Then: the stay is listed for the patient and has no discharge date
    assert_eq!(stay["patient_id"].as_i64(), Some(patient_id));
    assert_eq!(stay["ward_name"], "Cardiology");
    assert!(stay["discharge_date"].is_null());

    let stays = hospdb_json(&db_path, &["stay", "list", "--patient", &patient_id.to_string()]);
    let stays = stays.as_array().unwrap();
    assert_eq!(stays.len(), 1);
    assert_eq!(stays[0]["admission_date"], "2024-01-10");
    assert_eq!(stays[0]["patient_name"], "Doe, John");
}

#[test]
fn test_discharge_updates_bed_report() {
    let temp_dir = TempDir::new().unwrap();
    let db_path = initialized_db(&temp_dir);

    hospdb_json(&db_path, &["ward", "add", "--name", "Surgery", "--beds", "4"]);
    hospdb_json(&db_path, &["patient", "add", "--lastname", "Roe", "--firstname", "Jane"]);
    let stay = hospdb_json(
        &db_path,
        &["stay", "admit", "--patient", "1", "--ward", "1", "--date", "2024-03-01"],
    );
    let stay_id = stay["id"].as_i64().unwrap().to_string();

    let before = hospdb_json(&db_path, &["beds", "--ward", "1"]);
    assert_eq!(before["free_beds"], 3);
    assert_eq!(before["allocated_beds"], 1);

    let discharged = hospdb_json(
        &db_path,
        &["stay", "discharge", "--id", &stay_id, "--date", "2024-03-05"],
    );
    assert_eq!(discharged["discharge_date"], "2024-03-05");

    let after = hospdb_json(&db_path, &["beds"]);
    assert!(after["ward_id"].is_null());
    assert_eq!(after["free_beds"], 4);
    assert_eq!(after["allocated_beds"], 0);
    assert_eq!(after["average_stay_days"].as_f64(), Some(4.0));
}

#[test]
fn test_remove_stay() {
    let temp_dir = TempDir::new().unwrap();
    let db_path = initialized_db(&temp_dir);

    hospdb_json(&db_path, &["ward", "add", "--name", "ICU", "--beds", "2"]);
    hospdb_json(&db_path, &["patient", "add", "--lastname", "Poe", "--firstname", "Ed"]);
    hospdb_json(&db_path, &["stay", "admit", "--patient", "1", "--ward", "1"]);

    let removed = hospdb_json(&db_path, &["stay", "remove", "--id", "1"]);
    assert_eq!(removed["removed"], 1);

    let conn = Connection::open(&db_path).unwrap();
    let stays: i64 = conn
        .query_row("SELECT COUNT(*) FROM Aufenthalt", [], |row| row.get(0))
        .unwrap();
    assert_eq!(stays, 0);

    // Removing again reports the missing row
    let output = hospdb(&db_path, &["stay", "remove", "--id", "1"]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("ERR_STORE_FAILED"));
}

#[test]
fn test_patient_list_filters_by_lastname() {
    let temp_dir = TempDir::new().unwrap();
    let db_path = initialized_db(&temp_dir);

    hospdb_json(&db_path, &["patient", "add", "--lastname", "Miller", "--firstname", "Ann"]);
    hospdb_json(&db_path, &["patient", "add", "--lastname", "Meyer", "--firstname", "Bob"]);
    hospdb_json(&db_path, &["patient", "add", "--lastname", "Schulz", "--firstname", "Eve"]);

    let patients = hospdb_json(&db_path, &["patient", "list", "--lastname", "M%"]);
    let names: Vec<&str> = patients
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["lastname"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["Miller", "Meyer"]);
}

#[test]
fn test_invalid_bed_count_is_rejected() {
    let temp_dir = TempDir::new().unwrap();
    let db_path = initialized_db(&temp_dir);

    let output = hospdb(&db_path, &["ward", "add", "--name", "Empty", "--beds", "0"]);

    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("ERR_INVALID_INPUT"));
}

#[test]
fn test_admit_unknown_patient_fails() {
    let temp_dir = TempDir::new().unwrap();
    let db_path = initialized_db(&temp_dir);
    hospdb_json(&db_path, &["ward", "add", "--name", "ICU", "--beds", "2"]);

    let output = hospdb(&db_path, &["stay", "admit", "--patient", "42", "--ward", "1"]);

    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("Patient 42 not found"));
}
