use super::EntityGraph;
use crate::errors::Result;
use crate::model::StayKey;

/// Register a stay in its patient's stay set
///
/// This is the one back-reference in the model: a patient knows its stays,
/// a ward does not. Factories and reconstruction call this right after
/// inserting a stay. Returns false when the stay was already registered.
///
/// # Errors
/// * `UnknownEntity` - If the stay, or the patient it points at, is not in the graph
pub fn register_stay(graph: &mut EntityGraph, stay: StayKey) -> Result<bool> {
    let patient = graph.stay(stay)?.patient();
    Ok(graph.patient_mut(patient)?.register_stay(stay))
}
