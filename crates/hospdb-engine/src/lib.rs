//! HospDB Engine - service facade
//!
//! Coordinates the entity graph (hospdb-core) with the SQLite store
//! (hospdb-store) behind one boundary type, [`ClinicService`], which owns the
//! connection and the lifecycle logging of every operation.

pub mod service;

pub use service::{BedReport, ClinicService};
