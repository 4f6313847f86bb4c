//! Shared record types: projects, events, deliverables, team assignments,
//! and the on-disk application config.

use std::collections::HashMap;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Metadata values keyed by schema field name.
pub type Metadata = HashMap<String, Value>;

/// A project as supplied by the project store. Only the parts the engine
/// reads or writes are modelled here.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProjectRecord {
    pub id: String,
    /// Vertical id. May point at a vertical that no longer exists.
    pub vertical: String,
    /// Explicit title, used only when the title template resolves to nothing.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default)]
    pub metadata: Metadata,
    #[serde(default)]
    pub events: Vec<EventRecord>,
}

/// JSON keys `EventRecord` owns. A vertical's custom `event_fields` share the
/// same object through `custom`, so they may not reuse these names.
pub const CORE_EVENT_KEYS: &[&str] = &[
    "id",
    "type",
    "venue_name",
    "venue_location",
    "start_date",
    "start_time",
    "end_date",
    "end_time",
    "notes",
    "deliverables",
    "assignments",
];

/// One event on a project, or an event blueprint inside a template.
///
/// Blueprints use the same shape with the instance fields (dates, times,
/// venue, team) left unset.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EventRecord {
    pub id: String,
    #[serde(rename = "type", default)]
    pub event_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub venue_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub venue_location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default)]
    pub deliverables: Vec<Deliverable>,
    #[serde(default)]
    pub assignments: Vec<Assignment>,
    /// Values for the vertical's custom `event_fields`.
    #[serde(flatten)]
    pub custom: HashMap<String, Value>,
}

/// Default quantity for a newly created deliverable.
pub const DEFAULT_DELIVERABLE_QUANTITY: u32 = 1;

/// Something the studio owes the client for an event (album, edited photos, film).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Deliverable {
    pub id: String,
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default = "default_quantity")]
    pub quantity: u32,
    #[serde(default)]
    pub status: DeliverableStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

fn default_quantity() -> u32 {
    DEFAULT_DELIVERABLE_QUANTITY
}

impl Deliverable {
    /// A fresh deliverable with the standard defaults: one unit, pending, no due date.
    ///
    /// Both the form path and template instantiation go through here.
    pub fn new(id: impl Into<String>, kind: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            kind: kind.into(),
            quantity: DEFAULT_DELIVERABLE_QUANTITY,
            status: DeliverableStatus::default(),
            due_date: None,
            notes: None,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DeliverableStatus {
    #[default]
    Pending,
    #[serde(rename = "In Progress")]
    InProgress,
    Completed,
    Delivered,
}

impl DeliverableStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            DeliverableStatus::Pending => "Pending",
            DeliverableStatus::InProgress => "In Progress",
            DeliverableStatus::Completed => "Completed",
            DeliverableStatus::Delivered => "Delivered",
        }
    }
}

/// A team member booked on an event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Assignment {
    pub id: String,
    pub associate_id: String,
    #[serde(default)]
    pub role: String,
    /// Display copy of the associate's name at assignment time.
    #[serde(default)]
    pub name: String,
}

/// Application config, read from `~/.studiodesk/config.json`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// Override for the config database location.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub db_path: Option<PathBuf>,
    /// chrono format string for date cells in table views.
    #[serde(default = "default_date_format")]
    pub date_format: String,
    /// Insert the built-in verticals when the database has none.
    #[serde(default = "default_true")]
    pub seed_defaults: bool,
}

pub fn default_date_format() -> String {
    "%b %-d, %Y".to_string()
}

fn default_true() -> bool {
    true
}

impl Default for Config {
    fn default() -> Self {
        Self {
            db_path: None,
            date_format: default_date_format(),
            seed_defaults: true,
        }
    }
}
