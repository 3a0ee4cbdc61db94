// Integration tests for bed and stay-duration aggregates

#![allow(clippy::unwrap_used, clippy::expect_used)]

mod common;

use common::{cardiology_admission, date, setup_test_db};
use hospdb_core::ops::{create_hospital_stay, create_ward};
use hospdb_core::EntityGraph;
use hospdb_store::repo::stats;
use hospdb_store::SqliteRepo;

#[test]
fn test_empty_database() {
    let conn = setup_test_db();

    assert_eq!(stats::average_stay_duration(&conn, None).unwrap(), 0.0);
    assert_eq!(stats::allocated_beds(&conn, None).unwrap(), 0);
    assert_eq!(stats::free_beds(&conn, None).unwrap(), 0);
}

#[test]
fn test_single_admission_allocates_one_bed() {
    // Given: Ward("Cardiology", 10) with one open stay
    let mut conn = setup_test_db();
    let mut graph = EntityGraph::new();
    let (_, ward, stay) = cardiology_admission(&mut graph);
    SqliteRepo::store(&mut conn, &mut graph, stay.into()).unwrap();
    let ward_id = graph.object_id(ward.into()).unwrap();

    // Then: 9 free, 1 allocated, per ward and overall
    assert_eq!(stats::free_beds(&conn, Some(ward_id)).unwrap(), 9);
    assert_eq!(stats::allocated_beds(&conn, Some(ward_id)).unwrap(), 1);
    assert_eq!(stats::free_beds(&conn, None).unwrap(), 9);
    assert_eq!(stats::allocated_beds(&conn, None).unwrap(), 1);
}

#[test]
fn test_discharged_stays_free_their_bed_and_count_towards_average() {
    let mut conn = setup_test_db();
    let mut graph = EntityGraph::new();
    let (patient, ward, first) = cardiology_admission(&mut graph);
    graph
        .stay_mut(first)
        .unwrap()
        .set_discharge_date(Some(date(2024, 1, 9)))
        .unwrap();
    let second = create_hospital_stay(&mut graph, patient, ward, date(2024, 2, 1)).unwrap();
    graph
        .stay_mut(second)
        .unwrap()
        .set_discharge_date(Some(date(2024, 2, 3)))
        .unwrap();
    let open = create_hospital_stay(&mut graph, patient, ward, date(2024, 3, 1)).unwrap();
    for stay in [first, second, open] {
        SqliteRepo::store(&mut conn, &mut graph, stay.into()).unwrap();
    }
    let ward_id = graph.object_id(ward.into()).unwrap();

    // Durations 4 and 2 days; the open stay is ignored
    assert_eq!(stats::average_stay_duration(&conn, Some(ward_id)).unwrap(), 3.0);
    assert_eq!(stats::allocated_beds(&conn, Some(ward_id)).unwrap(), 1);
    assert_eq!(stats::free_beds(&conn, Some(ward_id)).unwrap(), 9);
}

#[test]
fn test_ward_filter_separates_wards() {
    let mut conn = setup_test_db();
    let mut graph = EntityGraph::new();
    let (patient, cardiology, stay) = cardiology_admission(&mut graph);
    let icu = create_ward(&mut graph, "ICU", 4).unwrap();
    let icu_stay = create_hospital_stay(&mut graph, patient, icu, date(2024, 1, 6)).unwrap();
    SqliteRepo::store(&mut conn, &mut graph, stay.into()).unwrap();
    SqliteRepo::store(&mut conn, &mut graph, icu_stay.into()).unwrap();
    let icu_id = graph.object_id(icu.into()).unwrap();
    let cardiology_id = graph.object_id(cardiology.into()).unwrap();

    assert_eq!(stats::free_beds(&conn, Some(icu_id)).unwrap(), 3);
    assert_eq!(stats::free_beds(&conn, Some(cardiology_id)).unwrap(), 9);
    assert_eq!(stats::free_beds(&conn, None).unwrap(), 12);
    assert_eq!(stats::allocated_beds(&conn, None).unwrap(), 2);
}

#[test]
fn test_unknown_ward_has_no_free_beds() {
    let conn = setup_test_db();
    assert_eq!(stats::free_beds(&conn, Some(42)).unwrap(), 0);
}
