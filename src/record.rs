//! Schema-driven record values.
//!
//! A [`Record`] has no fixed shape: its values are keyed by the field names of the
//! owning module and typed by [`FieldValue`]. Records are never persisted.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// One field value. Relation, select and email values are carried as `Text`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Bool(bool),
    Number(f64),
    Date(NaiveDate),
    Text(String),
    Null,
}

impl FieldValue {
    pub fn text(s: impl Into<String>) -> Self {
        FieldValue::Text(s.into())
    }

    /// Dashboard truthiness: empty text, zero, NaN, `false` and null are falsy.
    pub fn is_truthy(&self) -> bool {
        match self {
            FieldValue::Bool(b) => *b,
            FieldValue::Number(n) => *n != 0.0 && !n.is_nan(),
            FieldValue::Date(_) => true,
            FieldValue::Text(s) => !s.is_empty(),
            FieldValue::Null => false,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            FieldValue::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Plain string form, used for raw display and search.
    pub fn raw_string(&self) -> String {
        match self {
            FieldValue::Bool(b) => b.to_string(),
            FieldValue::Number(n) => n.to_string(),
            FieldValue::Date(d) => d.format("%Y-%m-%d").to_string(),
            FieldValue::Text(s) => s.clone(),
            FieldValue::Null => String::new(),
        }
    }
}

impl From<bool> for FieldValue {
    fn from(b: bool) -> Self {
        FieldValue::Bool(b)
    }
}

impl From<f64> for FieldValue {
    fn from(n: f64) -> Self {
        FieldValue::Number(n)
    }
}

impl From<&str> for FieldValue {
    fn from(s: &str) -> Self {
        FieldValue::Text(s.to_string())
    }
}

impl From<NaiveDate> for FieldValue {
    fn from(d: NaiveDate) -> Self {
        FieldValue::Date(d)
    }
}

/// A record of some module. `id` is a local identifier, independent of any field named `id`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Record {
    pub id: String,
    #[serde(default)]
    pub values: HashMap<String, FieldValue>,
}

impl Record {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            values: HashMap::new(),
        }
    }

    pub fn with(mut self, field: &str, value: impl Into<FieldValue>) -> Self {
        self.values.insert(field.to_string(), value.into());
        self
    }

    pub fn get(&self, field: &str) -> Option<&FieldValue> {
        self.values.get(field)
    }

    pub fn set(&mut self, field: &str, value: FieldValue) {
        self.values.insert(field.to_string(), value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truthiness_matches_dashboard() {
        assert!(!FieldValue::text("").is_truthy());
        assert!(FieldValue::text("a").is_truthy());
        assert!(!FieldValue::Number(0.0).is_truthy());
        assert!(!FieldValue::Number(f64::NAN).is_truthy());
        assert!(FieldValue::Number(-1.0).is_truthy());
        assert!(!FieldValue::Bool(false).is_truthy());
        assert!(!FieldValue::Null.is_truthy());
        assert!(FieldValue::Date(NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()).is_truthy());
    }

    #[test]
    fn untagged_json_shape() {
        let record = Record::new("1")
            .with("name", "Ana")
            .with("price", 12.5)
            .with("active", true);
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["id"], "1");
        assert_eq!(json["values"]["name"], "Ana");
        assert_eq!(json["values"]["price"], 12.5);
        assert_eq!(json["values"]["active"], true);
    }

    #[test]
    fn raw_string_drops_integer_fraction() {
        assert_eq!(FieldValue::Number(12.0).raw_string(), "12");
        assert_eq!(FieldValue::Number(1.5).raw_string(), "1.5");
    }
}
