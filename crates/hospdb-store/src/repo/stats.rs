//! Bed and stay-duration aggregates
//!
//! Each query takes an optional ward id; `None` aggregates across all wards.

#![allow(clippy::result_large_err)]

use rusqlite::{params_from_iter, Connection, OptionalExtension};

use crate::errors::{fetch_failure, Result};
use crate::repo::criteria::SelectBuilder;

/// Mean length in days of stays that have both dates; 0.0 when there are none
///
/// # Errors
/// * `FetchFailed` - If the query fails
pub fn average_stay_duration(conn: &Connection, ward_id: Option<i64>) -> Result<f64> {
    let query = SelectBuilder::new(
        "SELECT AVG(julianday(Entlassdatum) - julianday(Aufnahmedatum)) FROM Aufenthalt",
    )
    .filter("Aufnahmedatum IS NOT NULL")
    .filter("Entlassdatum IS NOT NULL")
    .and_opt("SID = ?", ward_id);

    let average: Option<f64> = conn
        .query_row(query.sql(), params_from_iter(query.params()), |row| row.get(0))
        .map_err(|e| fetch_failure("average_stay_duration", e))?;

    Ok(average.unwrap_or(0.0))
}

/// Number of stays without discharge date
///
/// # Errors
/// * `FetchFailed` - If the query fails
pub fn allocated_beds(conn: &Connection, ward_id: Option<i64>) -> Result<i64> {
    let query = SelectBuilder::new("SELECT COUNT(*) FROM Aufenthalt")
        .filter("Entlassdatum IS NULL")
        .and_opt("SID = ?", ward_id);

    conn.query_row(query.sql(), params_from_iter(query.params()), |row| row.get(0))
        .map_err(|e| fetch_failure("allocated_beds", e))
}

/// Beds minus allocated beds; 0 for an unknown ward or when there are no wards
///
/// # Errors
/// * `FetchFailed` - If the query fails
pub fn free_beds(conn: &Connection, ward_id: Option<i64>) -> Result<i64> {
    const FREE_PER_WARD: &str = "Bettenzahl - (
            SELECT COUNT(*) FROM Aufenthalt
            WHERE Aufenthalt.SID = Station.ID AND Aufenthalt.Entlassdatum IS NULL
        )";

    let free: Option<Option<i64>> = match ward_id {
        Some(id) => conn
            .query_row(
                &format!("SELECT {} FROM Station WHERE Station.ID = ?1", FREE_PER_WARD),
                [id],
                |row| row.get(0),
            )
            .optional(),
        None => conn
            .query_row(
                &format!("SELECT SUM({}) FROM Station", FREE_PER_WARD),
                [],
                |row| row.get(0),
            )
            .optional(),
    }
    .map_err(|e| fetch_failure("free_beds", e))?;

    Ok(free.flatten().unwrap_or(0))
}
