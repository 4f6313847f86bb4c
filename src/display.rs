//! Compact card/table projection of a project, driven by the vertical's
//! `card_fields` and `table_fields` lists.

use std::fmt::Write;

use chrono::format::{Item, StrftimeItems};
use chrono::{DateTime, NaiveDate};
use serde::Serialize;
use serde_json::Value;

use crate::title::resolve_project_title;
use crate::types::{default_date_format, ProjectRecord};
use crate::verticals::schema::{FieldKind, Vertical};

/// Card fragment: the raw typed value plus its label.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CardField {
    pub name: String,
    pub label: String,
    pub value: Value,
    /// Same value rendered as text, dates formatted.
    pub display: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TableCell {
    pub name: String,
    pub label: String,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProjectView {
    pub title: String,
    pub card_fields: Vec<CardField>,
    pub table_cells: Vec<TableCell>,
}

pub struct DisplayProjector {
    date_format: String,
}

impl Default for DisplayProjector {
    fn default() -> Self {
        Self::new(default_date_format())
    }
}

impl DisplayProjector {
    /// A format with an unknown strftime specifier is replaced by the default.
    pub fn new(date_format: impl Into<String>) -> Self {
        let date_format = date_format.into();
        if is_valid_date_format(&date_format) {
            return Self { date_format };
        }
        let fallback = default_date_format();
        log::warn!(
            "Invalid date format '{}' in config, using '{}'",
            date_format,
            fallback
        );
        Self {
            date_format: fallback,
        }
    }

    pub fn date_format(&self) -> &str {
        &self.date_format
    }

    pub fn project(&self, vertical: &Vertical, project: &ProjectRecord) -> ProjectView {
        let title = resolve_project_title(&vertical.title_template, project);

        let card_fields = vertical
            .card_fields
            .iter()
            .map(|name| {
                let value = project.metadata.get(name).cloned().unwrap_or(Value::Null);
                let display = self.render(vertical, name, &value);
                CardField {
                    name: name.clone(),
                    label: label_for(vertical, name),
                    value,
                    display,
                }
            })
            .collect();

        let table_cells = vertical
            .table_fields
            .iter()
            .map(|name| {
                let text = project
                    .metadata
                    .get(name)
                    .map(|v| self.render(vertical, name, v))
                    .unwrap_or_default();
                TableCell {
                    name: name.clone(),
                    label: label_for(vertical, name),
                    text,
                }
            })
            .collect();

        ProjectView {
            title,
            card_fields,
            table_cells,
        }
    }

    fn render(&self, vertical: &Vertical, name: &str, value: &Value) -> String {
        let is_date = vertical
            .field(name)
            .is_some_and(|f| f.kind() == FieldKind::Date);
        match value {
            Value::String(s) if is_date => self.format_date(s),
            other => value_text(other),
        }
    }

    /// Format a stored date. Unparseable input, or a format that needs more
    /// than a date (e.g. `%H`), is shown as-is.
    pub fn format_date(&self, raw: &str) -> String {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return String::new();
        }
        let parsed = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
            .ok()
            .or_else(|| {
                DateTime::parse_from_rfc3339(trimmed)
                    .ok()
                    .map(|dt| dt.date_naive())
            });
        match parsed {
            Some(date) => {
                let mut out = String::new();
                match write!(out, "{}", date.format(&self.date_format)) {
                    Ok(()) => out,
                    Err(_) => raw.to_string(),
                }
            }
            None => raw.to_string(),
        }
    }
}

fn is_valid_date_format(format: &str) -> bool {
    StrftimeItems::new(format).all(|item| !matches!(item, Item::Error))
}

fn label_for(vertical: &Vertical, name: &str) -> String {
    vertical
        .field(name)
        .map(|f| f.label.clone())
        .unwrap_or_else(|| name.to_string())
}

fn value_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::verticals::loader::load_vertical;

    fn wedding_project() -> ProjectRecord {
        let mut project = ProjectRecord {
            id: "p1".to_string(),
            vertical: "weddings".to_string(),
            ..Default::default()
        };
        for (k, v) in [
            ("groom_name", json!("John Smith")),
            ("bride_name", json!("Jane Doe")),
            ("client_name", json!("John Smith")),
            ("wedding_date", json!("2025-06-14")),
            ("package", json!("Gold")),
            ("budget", json!(4500)),
        ] {
            project.metadata.insert(k.to_string(), v);
        }
        project
    }

    #[test]
    fn test_project_view() {
        let vertical = load_vertical("weddings").unwrap();
        let view = DisplayProjector::default().project(&vertical, &wedding_project());

        assert_eq!(view.title, "John & Jane");

        assert_eq!(view.card_fields.len(), 2);
        assert_eq!(view.card_fields[0].label, "Wedding Date");
        assert_eq!(view.card_fields[0].value, json!("2025-06-14"));
        assert_eq!(view.card_fields[0].display, "Jun 14, 2025");
        assert_eq!(view.card_fields[1].value, json!("Gold"));

        let texts: Vec<&str> = view.table_cells.iter().map(|c| c.text.as_str()).collect();
        // city is missing from the metadata
        assert_eq!(texts, ["John Smith", "Jun 14, 2025", "", "Gold"]);
        assert_eq!(view.table_cells[2].label, "City");
    }

    #[test]
    fn test_unknown_field_falls_back_to_name() {
        let mut vertical = load_vertical("weddings").unwrap();
        vertical.table_fields = vec!["retired_field".to_string()];
        vertical.card_fields = vec!["retired_field".to_string()];
        let view = DisplayProjector::default().project(&vertical, &wedding_project());

        assert_eq!(view.table_cells[0].label, "retired_field");
        assert_eq!(view.table_cells[0].text, "");
        assert_eq!(view.card_fields[0].value, Value::Null);
    }

    #[test]
    fn test_format_date_variants() {
        let projector = DisplayProjector::new("%Y/%m/%d");
        assert_eq!(projector.format_date("2025-06-14"), "2025/06/14");
        assert_eq!(
            projector.format_date("2025-06-14T10:00:00+00:00"),
            "2025/06/14"
        );
        assert_eq!(projector.format_date("next spring"), "next spring");
        assert_eq!(projector.format_date(""), "");
    }

    #[test]
    fn test_invalid_date_format_falls_back_to_default() {
        let projector = DisplayProjector::new("%Q");
        assert_eq!(projector.date_format(), "%b %-d, %Y");
        assert_eq!(projector.format_date("2025-06-14"), "Jun 14, 2025");

        let vertical = load_vertical("weddings").unwrap();
        let view = projector.project(&vertical, &wedding_project());
        assert_eq!(view.card_fields[0].display, "Jun 14, 2025");
    }

    #[test]
    fn test_time_only_format_shows_raw_date() {
        let projector = DisplayProjector::new("%H:%M");
        assert_eq!(projector.date_format(), "%H:%M");
        assert_eq!(projector.format_date("2025-06-14"), "2025-06-14");
    }

    #[test]
    fn test_numbers_render_raw() {
        let mut vertical = load_vertical("weddings").unwrap();
        vertical.table_fields = vec!["budget".to_string()];
        let view = DisplayProjector::default().project(&vertical, &wedding_project());
        assert_eq!(view.table_cells[0].text, "4500");
    }
}
