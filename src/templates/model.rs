use serde::{Deserialize, Serialize};

use crate::types::EventRecord;

/// A reusable event/deliverable structure that can be stamped into new projects.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Template {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// Vertical id this template belongs to.
    pub vertical: String,
    /// Event blueprints: event records with no dates, venue, or team.
    #[serde(default)]
    pub events: Vec<EventRecord>,
    /// Project the events were snapshotted from, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project_id: Option<String>,
    #[serde(default)]
    pub created_at: String,
    #[serde(default)]
    pub updated_at: String,
}

/// Input for creating a template.
///
/// When `project_id` is set and `events` is empty, the events are copied
/// from that project at creation time.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TemplateDraft {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub vertical: String,
    #[serde(default)]
    pub events: Vec<EventRecord>,
    #[serde(default)]
    pub project_id: Option<String>,
}

/// Partial update for an existing template. `None` leaves the value as is.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TemplatePatch {
    pub name: Option<String>,
    pub description: Option<String>,
    pub events: Option<Vec<EventRecord>>,
}

/// Filter for template listings.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TemplateFilter {
    pub vertical: Option<String>,
}

impl TemplateFilter {
    pub fn for_vertical(vertical: impl Into<String>) -> Self {
        Self {
            vertical: Some(vertical.into()),
        }
    }
}

/// Result of stamping a template into a project.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Instantiation {
    pub events: Vec<EventRecord>,
    /// Blueprint entries that were left out, with the reason.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub skipped: Vec<SkippedBlueprint>,
}

/// A blueprint entry excluded from instantiation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedBlueprint {
    pub event_index: usize,
    /// Set when only one deliverable of the event was skipped.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deliverable_index: Option<usize>,
    pub reason: String,
}
