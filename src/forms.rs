//! Field lists for project create/edit forms, derived from a vertical.

use serde::Serialize;
use serde_json::Value;

use crate::field_types::{default_metadata, default_value};
use crate::templates::ids::IdGenerator;
use crate::types::{EventRecord, Metadata};
use crate::verticals::schema::{FieldKind, FieldType, SchemaField, Vertical};

/// One input the form must render.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FormField {
    pub name: String,
    pub label: String,
    #[serde(rename = "type")]
    pub kind: FieldKind,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<String>,
    pub default_value: Value,
    /// Built-in event field rather than one declared by the vertical.
    pub core: bool,
}

impl FormField {
    fn from_schema(field: &SchemaField, core: bool) -> Self {
        Self {
            name: field.name.clone(),
            label: field.label.clone(),
            kind: field.kind(),
            options: field.options().to_vec(),
            default_value: default_value(&field.field_type),
            core,
        }
    }
}

/// Everything a create/edit form needs for one vertical.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProjectForm {
    pub vertical: String,
    pub metadata_fields: Vec<FormField>,
    /// Empty when the vertical has no events.
    pub event_fields: Vec<FormField>,
}

/// Fields present on every event regardless of vertical, in render order.
pub fn core_event_fields() -> Vec<SchemaField> {
    vec![
        SchemaField::new("type", "Event Type", FieldType::Text),
        SchemaField::new("venue_name", "Venue Name", FieldType::Text),
        SchemaField::new("venue_location", "Venue Location", FieldType::Text),
        SchemaField::new("start_date", "Start Date", FieldType::Date),
        SchemaField::new("start_time", "Start Time", FieldType::Text),
        SchemaField::new("end_date", "End Date", FieldType::Date),
        SchemaField::new("end_time", "End Time", FieldType::Text),
        SchemaField::new("notes", "Notes", FieldType::Text),
    ]
}

/// Assemble the ordered form fields for a vertical.
pub fn assemble(vertical: &Vertical) -> ProjectForm {
    let metadata_fields = vertical
        .fields
        .iter()
        .map(|f| FormField::from_schema(f, false))
        .collect();

    let event_fields = if vertical.has_events {
        core_event_fields()
            .iter()
            .map(|f| FormField::from_schema(f, true))
            .chain(
                vertical
                    .event_fields
                    .iter()
                    .map(|f| FormField::from_schema(f, false)),
            )
            .collect()
    } else {
        Vec::new()
    };

    ProjectForm {
        vertical: vertical.id.clone(),
        metadata_fields,
        event_fields,
    }
}

/// Metadata for a brand-new project, every field at its default.
pub fn blank_metadata(vertical: &Vertical) -> Metadata {
    default_metadata(&vertical.fields)
}

/// A brand-new event with custom fields at their defaults.
pub fn blank_event(vertical: &Vertical, ids: &mut dyn IdGenerator) -> EventRecord {
    EventRecord {
        id: ids.next_id(),
        custom: default_metadata(&vertical.event_fields),
        ..Default::default()
    }
}
