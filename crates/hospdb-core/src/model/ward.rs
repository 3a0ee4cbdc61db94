use serde::Serialize;

use super::{EntityKind, Identity, PersistentObject};
use crate::errors::Result;
use crate::rules::validation;

/// A hospital ward (`Station` table)
///
/// A ward does not know its stays; the association is one-way from
/// HospitalStay.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Ward {
    #[serde(rename = "id")]
    identity: Identity,
    name: String,
    number_of_beds: i32,
}

impl Ward {
    /// Create a transient ward
    ///
    /// # Errors
    /// * `BlankField` - If the name is empty or whitespace-only
    /// * `NonPositiveBedCount` - If `number_of_beds <= 0`
    pub fn new(name: &str, number_of_beds: i32) -> Result<Self> {
        Ok(Self {
            identity: Identity::transient(),
            name: validation::require_non_blank("name", name)?,
            number_of_beds: validation::require_positive_beds(number_of_beds)?,
        })
    }

    /// Rebuild a persistent ward from a `Station` row
    pub fn reconstruct(id: i64, name: String, number_of_beds: i32) -> Self {
        Self {
            identity: Identity::persistent(id),
            name,
            number_of_beds,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn number_of_beds(&self) -> i32 {
        self.number_of_beds
    }

    pub fn set_name(&mut self, name: &str) -> Result<()> {
        self.name = validation::require_non_blank("name", name)?;
        Ok(())
    }

    pub fn set_number_of_beds(&mut self, number_of_beds: i32) -> Result<()> {
        self.number_of_beds = validation::require_positive_beds(number_of_beds)?;
        Ok(())
    }
}

impl PersistentObject for Ward {
    const KIND: EntityKind = EntityKind::Ward;

    fn identity(&self) -> &Identity {
        &self.identity
    }

    fn identity_mut(&mut self) -> &mut Identity {
        &mut self.identity
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ModelError;

    #[test]
    fn test_new_ward_is_transient() {
        let ward = Ward::new("Cardiology", 10).unwrap();
        assert!(!ward.is_persistent());
        assert_eq!(ward.name(), "Cardiology");
        assert_eq!(ward.number_of_beds(), 10);
    }

    #[test]
    fn test_zero_beds_rejected() {
        assert_eq!(
            Ward::new("ICU", 0),
            Err(ModelError::NonPositiveBedCount { count: 0 })
        );
    }

    #[test]
    fn test_rejected_bed_count_keeps_previous_value() {
        let mut ward = Ward::new("ICU", 4).unwrap();
        assert!(ward.set_number_of_beds(-2).is_err());
        assert_eq!(ward.number_of_beds(), 4);
    }

    #[test]
    fn test_reconstructed_ward_is_persistent() {
        let ward = Ward::reconstruct(9, "Oncology".to_string(), 12);
        assert!(ward.is_persistent());
        assert_eq!(ward.object_id(), 9);
    }
}
