#![allow(clippy::unwrap_used, clippy::expect_used)]

use chrono::NaiveDate;
use hospdb_core::errors::ModelError;
use hospdb_core::ops::{create_hospital_stay, create_patient, create_ward, register_stay};
use hospdb_core::{EntityGraph, EntityKind, HospitalStay};

fn admission() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 1, 5).unwrap()
}

#[test]
fn test_factory_registers_stay_with_patient() {
    let mut graph = EntityGraph::new();
    let patient = create_patient(&mut graph, "Doe", "Jane").unwrap();
    let ward = create_ward(&mut graph, "Cardiology", 10).unwrap();

    let stay = create_hospital_stay(&mut graph, patient, ward, admission()).unwrap();

    let stays = graph.patient(patient).unwrap().hospital_stays();
    assert_eq!(stays.len(), 1);
    assert!(stays.contains(&stay));
    assert_eq!(graph.stay(stay).unwrap().discharge_date(), None);
}

#[test]
fn test_identical_stays_are_distinct_members() {
    // Given: two stays with equal field values for the same patient
    let mut graph = EntityGraph::new();
    let patient = create_patient(&mut graph, "Doe", "Jane").unwrap();
    let ward = create_ward(&mut graph, "Cardiology", 10).unwrap();

    let a = create_hospital_stay(&mut graph, patient, ward, admission()).unwrap();
    let b = create_hospital_stay(&mut graph, patient, ward, admission()).unwrap();

    // Then: membership is by instance, not by value
    assert_eq!(graph.stay(a).unwrap(), graph.stay(b).unwrap());
    assert_eq!(graph.patient(patient).unwrap().hospital_stays().len(), 2);
}

#[test]
fn test_ward_has_no_back_reference() {
    let mut graph = EntityGraph::new();
    let patient = create_patient(&mut graph, "Doe", "Jane").unwrap();
    let ward = create_ward(&mut graph, "Cardiology", 10).unwrap();
    let before = graph.ward(ward).unwrap().clone();

    create_hospital_stay(&mut graph, patient, ward, admission()).unwrap();

    assert_eq!(graph.ward(ward).unwrap(), &before);
}

#[test]
fn test_construction_alone_does_not_register() {
    let mut graph = EntityGraph::new();
    let patient = create_patient(&mut graph, "Doe", "Jane").unwrap();
    let ward = create_ward(&mut graph, "Cardiology", 10).unwrap();

    let stay = graph
        .insert_stay(HospitalStay::new(patient, ward, admission()))
        .unwrap();
    assert!(graph.patient(patient).unwrap().hospital_stays().is_empty());

    assert!(register_stay(&mut graph, stay).unwrap());
    assert!(!register_stay(&mut graph, stay).unwrap(), "second call is a no-op");
    assert_eq!(graph.patient(patient).unwrap().hospital_stays().len(), 1);
}

#[test]
fn test_keys_from_another_graph_are_not_found() {
    let mut other = EntityGraph::new();
    let foreign_patient = create_patient(&mut other, "Roe", "Richard").unwrap();

    let mut graph = EntityGraph::new();
    let ward = create_ward(&mut graph, "Cardiology", 10).unwrap();

    let err = create_hospital_stay(&mut graph, foreign_patient, ward, admission()).unwrap_err();
    assert!(matches!(
        err,
        ModelError::UnknownEntity {
            entity_kind: EntityKind::Patient,
            ..
        }
    ));
}
