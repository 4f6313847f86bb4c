use std::collections::HashSet;
use std::path::Path;

use super::embedded;
use super::schema::{FieldType, SchemaField, Vertical};
use crate::error::EngineError;
use crate::title::placeholders;
use crate::types::CORE_EVENT_KEYS;

/// Configuration seeded into an empty store at startup.
///
/// Passed to the registry explicitly so tests and deployments can swap in
/// their own set instead of the built-ins.
#[derive(Debug, Clone, Default)]
pub struct DefaultConfig {
    pub verticals: Vec<Vertical>,
}

impl DefaultConfig {
    /// The built-in verticals shipped with the app.
    pub fn builtin() -> Result<Self, EngineError> {
        let verticals = embedded::embedded_ids()
            .map(load_vertical)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { verticals })
    }

    pub fn empty() -> Self {
        Self::default()
    }
}

/// Load a built-in vertical by id.
pub fn load_vertical(id: &str) -> Result<Vertical, EngineError> {
    let json = embedded::get_embedded(id)
        .ok_or_else(|| EngineError::VerticalNotFound(id.to_string()))?;
    serde_json::from_str(json).map_err(|e| EngineError::Parse {
        what: format!("built-in vertical '{}'", id),
        message: e.to_string(),
    })
}

/// Load a vertical from a JSON file and validate it.
pub fn load_custom_vertical(path: &Path) -> Result<Vertical, EngineError> {
    let content = std::fs::read_to_string(path)?;
    let vertical: Vertical = serde_json::from_str(&content).map_err(|e| EngineError::Parse {
        what: path.display().to_string(),
        message: e.to_string(),
    })?;
    validate_vertical(&vertical)?;
    Ok(vertical)
}

/// Validate a vertical's hard invariants.
///
/// Collects every violation so the operator can fix them in one pass.
pub fn validate_vertical(vertical: &Vertical) -> Result<(), EngineError> {
    let mut errors = Vec::new();

    if vertical.label.trim().is_empty() {
        errors.push("Vertical label is required".to_string());
    }
    if vertical.id.trim().is_empty() {
        errors.push("Vertical id is required".to_string());
    }
    check_fields("fields", &vertical.fields, &mut errors);
    check_fields("event_fields", &vertical.event_fields, &mut errors);
    for field in &vertical.event_fields {
        if CORE_EVENT_KEYS.contains(&field.name.as_str()) {
            errors.push(format!(
                "event_fields: '{}' is a built-in event field",
                field.name
            ));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(EngineError::ConfigValidation(errors))
    }
}

fn check_fields(list: &str, fields: &[SchemaField], errors: &mut Vec<String>) {
    let mut seen = HashSet::new();
    for field in fields {
        if field.name.trim().is_empty() {
            errors.push(format!("{}: field name is required", list));
            continue;
        }
        if !seen.insert(field.name.as_str()) {
            errors.push(format!("{}: duplicate field name '{}'", list, field.name));
        }
        if let FieldType::Select { options } = &field.field_type {
            if options.is_empty() {
                errors.push(format!(
                    "{}: select field '{}' must declare at least one option",
                    list, field.name
                ));
            }
        }
    }
}

/// Soft problems that degrade display but are not rejected: card/table
/// columns or title placeholders naming fields the schema does not declare.
pub fn display_warnings(vertical: &Vertical) -> Vec<String> {
    let declared: HashSet<&str> = vertical.fields.iter().map(|f| f.name.as_str()).collect();
    let mut warnings = Vec::new();

    for name in &vertical.card_fields {
        if !declared.contains(name.as_str()) {
            warnings.push(format!("card field '{}' is not in the schema", name));
        }
    }
    for name in &vertical.table_fields {
        if !declared.contains(name.as_str()) {
            warnings.push(format!("table field '{}' is not in the schema", name));
        }
    }
    for name in placeholders(&vertical.title_template) {
        if !declared.contains(name.as_str()) {
            warnings.push(format!("title placeholder '{{{}}}' is not in the schema", name));
        }
    }
    warnings
}

/// List all available built-in verticals as (id, label, description).
pub fn get_available_verticals() -> Vec<(String, String, String)> {
    embedded::list_embedded()
}
