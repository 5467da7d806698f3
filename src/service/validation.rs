//! Form value rules: type defaults, raw-input coercion and the required-field check.

use crate::error::FormError;
use crate::record::FieldValue;
use crate::schema::{FieldDefinition, FieldType};
use chrono::NaiveDate;
use regex::Regex;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::OnceLock;

pub struct FormValidator;

impl FormValidator {
    /// Names of required fields whose value is missing or falsy, in schema order.
    pub fn missing_required(fields: &[FieldDefinition], values: &HashMap<String, FieldValue>) -> Vec<String> {
        fields
            .iter()
            .filter(|f| f.required)
            .filter(|f| !values.get(&f.name).map(FieldValue::is_truthy).unwrap_or(false))
            .map(|f| f.name.clone())
            .collect()
    }

    /// Coerce text typed into an editor. Closed choices (select, relation) are checked by the form.
    pub fn coerce_input(field: &FieldDefinition, raw: &str) -> Result<FieldValue, FormError> {
        match field.field_type {
            FieldType::Number => Ok(FieldValue::Number(parse_number_prefix(raw).unwrap_or(0.0))),
            FieldType::Date => {
                let raw = raw.trim();
                if raw.is_empty() {
                    return Ok(FieldValue::Null);
                }
                NaiveDate::parse_from_str(raw, "%Y-%m-%d")
                    .map(FieldValue::Date)
                    .map_err(|_| invalid(field, "se esperaba una fecha AAAA-MM-DD"))
            }
            FieldType::Boolean => match raw.trim().to_lowercase().as_str() {
                "true" | "on" | "1" => Ok(FieldValue::Bool(true)),
                "false" | "off" | "0" | "" => Ok(FieldValue::Bool(false)),
                _ => Err(invalid(field, "se esperaba verdadero o falso")),
            },
            FieldType::Text | FieldType::Email | FieldType::Textarea | FieldType::Select | FieldType::Relation => {
                Ok(FieldValue::text(raw))
            }
        }
    }

    /// Coerce a JSON value (HTTP body). Native JSON types map directly; strings go through [`coerce_input`](Self::coerce_input).
    pub fn coerce_json(field: &FieldDefinition, value: &Value) -> Result<FieldValue, FormError> {
        match (field.field_type, value) {
            (FieldType::Number, Value::Number(n)) => Ok(FieldValue::Number(n.as_f64().unwrap_or(0.0))),
            (FieldType::Number, Value::Null) => Ok(FieldValue::Number(0.0)),
            (FieldType::Boolean, Value::Bool(b)) => Ok(FieldValue::Bool(*b)),
            (FieldType::Boolean, Value::Null) => Ok(FieldValue::Bool(false)),
            (FieldType::Boolean, Value::Number(n)) => Ok(FieldValue::Bool(n.as_f64().unwrap_or(0.0) != 0.0)),
            (FieldType::Date, Value::Null) => Ok(FieldValue::Null),
            (_, Value::Null) => Ok(FieldValue::text("")),
            (_, Value::String(s)) => Self::coerce_input(field, s),
            (_, Value::Array(_)) | (_, Value::Object(_)) => Err(invalid(field, "se esperaba un valor simple")),
            (_, other) => Self::coerce_input(field, &other.to_string()),
        }
    }
}

fn invalid(field: &FieldDefinition, reason: &str) -> FormError {
    FormError::InvalidValue {
        field: field.name.clone(),
        reason: reason.to_string(),
    }
}

/// Initial value of an empty editor.
pub fn default_value(field_type: FieldType, today: NaiveDate) -> FieldValue {
    match field_type {
        FieldType::Number => FieldValue::Number(0.0),
        FieldType::Boolean => FieldValue::Bool(false),
        FieldType::Date => FieldValue::Date(today),
        _ => FieldValue::text(""),
    }
}

fn number_prefix() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^[+-]?(\d+\.?\d*|\.\d+)([eE][+-]?\d+)?").expect("static pattern")
    })
}

/// Leading decimal number of `raw` ("12.5kg" -> 12.5). None when there is none.
fn parse_number_prefix(raw: &str) -> Option<f64> {
    let m = number_prefix().find(raw.trim_start())?;
    m.as_str().parse::<f64>().ok().filter(|n| n.is_finite())
}
