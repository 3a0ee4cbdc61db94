//! Repository layer mapping the entity graph onto the four tables
//!
//! - `sqlite_repo`: store dispatcher and removal
//! - `hydration`: reconstruction of entities from query rows
//! - `stats`: bed and stay-duration aggregates
//! - `criteria`: conjunctive WHERE clauses with positional parameters

pub mod criteria;
pub mod hydration;
pub mod sqlite_repo;
pub mod stats;

pub use criteria::{PatientCriteria, StayCriteria};
pub use sqlite_repo::SqliteRepo;
