//! Per-type value rules for schema fields.
//!
//! Every default used by the form, the blank-project path, and the
//! metadata validator comes from here.
//!
//! | type   | domain                         | default              |
//! |--------|--------------------------------|----------------------|
//! | text   | string                         | `""`                 |
//! | number | number or null                 | `null`               |
//! | date   | `YYYY-MM-DD` string, `""`, null | `""`                 |
//! | tel    | free-text string               | `""`                 |
//! | select | one of the declared options    | first option or null |

use chrono::NaiveDate;
use serde_json::{Number, Value};

use crate::types::Metadata;
use crate::verticals::schema::{FieldType, SchemaField};

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Default value for a freshly rendered field.
pub fn default_value(field_type: &FieldType) -> Value {
    match field_type {
        FieldType::Text | FieldType::Tel | FieldType::Date => Value::String(String::new()),
        FieldType::Number => Value::Null,
        FieldType::Select { options } => options
            .first()
            .map(|o| Value::String(o.clone()))
            .unwrap_or(Value::Null),
    }
}

/// Convert raw form input into a typed value.
///
/// Empty number input becomes null; empty date input stays `""`; empty
/// select input is null (unset).
pub fn parse_input(field: &SchemaField, raw: &str) -> Result<Value, String> {
    let trimmed = raw.trim();
    match &field.field_type {
        FieldType::Text | FieldType::Tel => Ok(Value::String(raw.to_string())),
        FieldType::Number => {
            if trimmed.is_empty() {
                return Ok(Value::Null);
            }
            parse_number(trimmed).ok_or_else(|| {
                format!("{}: '{}' is not a number", field.label, trimmed)
            })
        }
        FieldType::Date => {
            if trimmed.is_empty() {
                return Ok(Value::String(String::new()));
            }
            NaiveDate::parse_from_str(trimmed, DATE_FORMAT)
                .map(|d| Value::String(d.format(DATE_FORMAT).to_string()))
                .map_err(|_| format!("{}: '{}' is not a YYYY-MM-DD date", field.label, trimmed))
        }
        FieldType::Select { options } => {
            if trimmed.is_empty() {
                return Ok(Value::Null);
            }
            if options.iter().any(|o| o == trimmed) {
                Ok(Value::String(trimmed.to_string()))
            } else {
                Err(format!(
                    "{}: '{}' is not one of {}",
                    field.label,
                    trimmed,
                    options.join(", ")
                ))
            }
        }
    }
}

fn parse_number(s: &str) -> Option<Value> {
    if let Ok(i) = s.parse::<i64>() {
        return Some(Value::Number(i.into()));
    }
    s.parse::<f64>()
        .ok()
        .and_then(Number::from_f64)
        .map(Value::Number)
}

/// Check a stored value against the field's domain. Null is always allowed (unset).
pub fn validate(field: &SchemaField, value: &Value) -> Result<(), String> {
    if value.is_null() {
        return Ok(());
    }
    let ok = match &field.field_type {
        FieldType::Text | FieldType::Tel => value.is_string(),
        FieldType::Number => value.is_number(),
        FieldType::Date => match value.as_str() {
            Some("") => true,
            Some(s) => NaiveDate::parse_from_str(s, DATE_FORMAT).is_ok(),
            None => false,
        },
        FieldType::Select { options } => match value.as_str() {
            Some(s) => options.iter().any(|o| o == s),
            None => false,
        },
    };
    if ok {
        Ok(())
    } else {
        Err(format!(
            "Field '{}' ({}) has invalid value {}",
            field.name,
            field.kind().as_str(),
            value
        ))
    }
}

/// Validate every schema-declared value in a metadata map.
///
/// Keys the schema does not declare are ignored; they are carried along but
/// never rendered. Returns every problem found, not just the first.
pub fn validate_metadata(fields: &[SchemaField], metadata: &Metadata) -> Result<(), Vec<String>> {
    let errors: Vec<String> = fields
        .iter()
        .filter_map(|field| {
            metadata
                .get(&field.name)
                .and_then(|value| validate(field, value).err())
        })
        .collect();
    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Default-valued metadata for every field, in schema order.
pub fn default_metadata(fields: &[SchemaField]) -> Metadata {
    fields
        .iter()
        .map(|f| (f.name.clone(), default_value(&f.field_type)))
        .collect()
}
