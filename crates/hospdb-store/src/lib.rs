//! HospDB Store - SQLite persistence for the entity graph
//!
//! Provides:
//! - Connection configuration and the connection liveness manager
//! - Embedded, checksummed schema migrations
//! - The store dispatcher (INSERT vs UPDATE, cascade, generated keys)
//! - The reconstruction engine (criteria queries, nested point lookups)
//! - Bed and stay-duration aggregates

pub mod db;
pub mod errors;
pub mod migrations;
pub mod repo;

// Re-export key types
pub use db::{ConnectionConfig, ConnectionManager, SqliteLocation};
pub use errors::Result;
pub use repo::{PatientCriteria, SqliteRepo, StayCriteria};
