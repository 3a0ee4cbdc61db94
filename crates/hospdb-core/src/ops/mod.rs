pub mod association;
pub mod factory;
pub mod graph;

pub use association::register_stay;
pub use factory::{create_hospital_stay, create_patient, create_ward};
pub use graph::EntityGraph;
