//! Query criteria and the positional WHERE builder
//!
//! Only supplied criteria become clauses; parameters are bound in the order
//! their clauses were appended.

use chrono::NaiveDate;
use rusqlite::types::Value;

/// Filter for patient reads
///
/// Name criteria are matched with `LIKE` as given: no wildcards are added, so
/// `"Doe"` matches exactly and `"Do%"` matches by prefix.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PatientCriteria {
    pub id: Option<i64>,
    pub lastname: Option<String>,
    pub firstname: Option<String>,
    pub born_from: Option<NaiveDate>,
    pub born_until: Option<NaiveDate>,
}

impl PatientCriteria {
    pub fn by_id(id: i64) -> Self {
        Self {
            id: Some(id),
            ..Self::default()
        }
    }
}

/// Filter for hospital stay reads
///
/// `admitted_from` bounds the admission date from below; `discharged_until`
/// bounds the discharge date from above, which excludes open stays.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StayCriteria {
    pub id: Option<i64>,
    pub patient_id: Option<i64>,
    pub admitted_from: Option<NaiveDate>,
    pub discharged_until: Option<NaiveDate>,
}

impl StayCriteria {
    pub fn by_id(id: i64) -> Self {
        Self {
            id: Some(id),
            ..Self::default()
        }
    }

    pub fn for_patient(patient_id: i64) -> Self {
        Self {
            patient_id: Some(patient_id),
            ..Self::default()
        }
    }
}

/// SELECT statement with a conjunctive WHERE clause
#[derive(Debug, Clone)]
pub(crate) struct SelectBuilder {
    sql: String,
    params: Vec<Value>,
    has_where: bool,
}

impl SelectBuilder {
    pub(crate) fn new(select: &str) -> Self {
        Self {
            sql: select.to_string(),
            params: Vec::new(),
            has_where: false,
        }
    }

    /// Append a clause without parameters
    pub(crate) fn filter(mut self, clause: &str) -> Self {
        self.sql
            .push_str(if self.has_where { " AND " } else { " WHERE " });
        self.sql.push_str(clause);
        self.has_where = true;
        self
    }

    /// Append `clause`, which must contain exactly one `?`
    pub(crate) fn and(mut self, clause: &str, value: impl Into<Value>) -> Self {
        self.params.push(value.into());
        self.filter(clause)
    }

    pub(crate) fn and_opt<V: Into<Value>>(self, clause: &str, value: Option<V>) -> Self {
        match value {
            Some(value) => self.and(clause, value),
            None => self,
        }
    }

    pub(crate) fn and_date(self, clause: &str, date: Option<NaiveDate>) -> Self {
        self.and_opt(clause, date.map(iso_date))
    }

    pub(crate) fn order_by(mut self, order: &str) -> Self {
        self.sql.push_str(" ORDER BY ");
        self.sql.push_str(order);
        self
    }

    pub(crate) fn sql(&self) -> &str {
        &self.sql
    }

    pub(crate) fn params(&self) -> &[Value] {
        &self.params
    }
}

/// Stored form of a date (`YYYY-MM-DD`)
pub(crate) fn iso_date(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_criteria_means_no_where() {
        let builder = SelectBuilder::new("SELECT ID FROM Station").and_opt("ID = ?", None::<i64>);
        assert_eq!(builder.sql(), "SELECT ID FROM Station");
        assert!(builder.params().is_empty());
    }

    #[test]
    fn test_params_follow_append_order() {
        let builder = SelectBuilder::new("SELECT ID FROM Person")
            .and_opt("Nachname LIKE ?", Some("Doe".to_string()))
            .and_opt("Vorname LIKE ?", None::<String>)
            .and_date(
                "Geburtsdatum >= ?",
                NaiveDate::from_ymd_opt(1980, 2, 1),
            )
            .order_by("ID");

        assert_eq!(
            builder.sql(),
            "SELECT ID FROM Person WHERE Nachname LIKE ? AND Geburtsdatum >= ? ORDER BY ID"
        );
        assert_eq!(
            builder.params(),
            &[
                Value::Text("Doe".to_string()),
                Value::Text("1980-02-01".to_string())
            ]
        );
    }
}
