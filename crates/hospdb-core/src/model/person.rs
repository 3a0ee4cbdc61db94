use chrono::NaiveDate;
use serde::Serialize;

use crate::errors::Result;
use crate::rules::validation;

/// Personal data stored in the `Person` table
///
/// Person is the abstract base of Patient: it never exists as an entity of
/// its own and carries no identity. Names are kept trimmed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Person {
    firstname: String,
    lastname: String,
    date_of_birth: Option<NaiveDate>,
}

impl Person {
    /// Create a person, validating both names
    ///
    /// # Errors
    /// * `BlankField` - If either name is empty or whitespace-only
    pub fn new(lastname: &str, firstname: &str) -> Result<Self> {
        let lastname = validation::require_non_blank("lastname", lastname)?;
        let firstname = validation::require_non_blank("firstname", firstname)?;
        Ok(Self {
            firstname,
            lastname,
            date_of_birth: None,
        })
    }

    /// Rebuild a person from stored column values without validation
    pub fn reconstruct(
        lastname: String,
        firstname: String,
        date_of_birth: Option<NaiveDate>,
    ) -> Self {
        Self {
            firstname,
            lastname,
            date_of_birth,
        }
    }

    pub fn firstname(&self) -> &str {
        &self.firstname
    }

    pub fn lastname(&self) -> &str {
        &self.lastname
    }

    pub fn date_of_birth(&self) -> Option<NaiveDate> {
        self.date_of_birth
    }

    pub fn set_firstname(&mut self, firstname: &str) -> Result<()> {
        self.firstname = validation::require_non_blank("firstname", firstname)?;
        Ok(())
    }

    pub fn set_lastname(&mut self, lastname: &str) -> Result<()> {
        self.lastname = validation::require_non_blank("lastname", lastname)?;
        Ok(())
    }

    /// Set or clear the date of birth
    ///
    /// # Errors
    /// * `DateOfBirthInFuture` - If the date lies after today (UTC)
    pub fn set_date_of_birth(&mut self, date_of_birth: Option<NaiveDate>) -> Result<()> {
        if let Some(date) = date_of_birth {
            validation::require_not_in_future(date, validation::today())?;
        }
        self.date_of_birth = date_of_birth;
        Ok(())
    }
}
