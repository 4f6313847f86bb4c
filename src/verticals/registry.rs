//! CRUD over vertical definitions.
//!
//! Every write is validated in full before the store is called. The
//! registry keeps no cache, so a failed write leaves nothing to roll back.

use std::path::Path;

use serde::{Deserialize, Serialize};

use super::loader::{display_warnings, load_custom_vertical, validate_vertical, DefaultConfig};
use super::schema::{SchemaField, Vertical};
use crate::error::EngineError;
use crate::store::ConfigStore;
use crate::util::slugify;

/// Input for creating a vertical. The id is derived from the label.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct VerticalDraft {
    pub label: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub has_events: bool,
    #[serde(default)]
    pub include_in_finance_summary: bool,
    #[serde(default)]
    pub calendar_sync: bool,
    #[serde(default)]
    pub fields: Vec<SchemaField>,
    #[serde(default)]
    pub event_fields: Vec<SchemaField>,
    #[serde(default)]
    pub title_template: String,
    #[serde(default)]
    pub card_fields: Vec<String>,
    #[serde(default)]
    pub table_fields: Vec<String>,
}

/// Partial update. `None` leaves the attribute unchanged; the id never changes.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct VerticalPatch {
    pub label: Option<String>,
    pub description: Option<String>,
    pub has_events: Option<bool>,
    pub include_in_finance_summary: Option<bool>,
    pub calendar_sync: Option<bool>,
    pub fields: Option<Vec<SchemaField>>,
    pub event_fields: Option<Vec<SchemaField>>,
    pub title_template: Option<String>,
    pub card_fields: Option<Vec<String>>,
    pub table_fields: Option<Vec<String>>,
}

/// What a delete request did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum DeleteOutcome {
    /// The vertical is gone. Projects that referenced it keep the stale id.
    Deleted { dangling_projects: usize },
    /// Projects still reference the vertical; nothing was deleted.
    NeedsConfirmation { referencing_projects: usize },
}

pub struct VerticalRegistry<'a> {
    store: &'a dyn ConfigStore,
}

impl<'a> VerticalRegistry<'a> {
    pub fn new(store: &'a dyn ConfigStore) -> Self {
        Self { store }
    }

    pub fn list(&self) -> Result<Vec<Vertical>, EngineError> {
        Ok(self.store.list_verticals()?)
    }

    pub fn get(&self, id: &str) -> Result<Vertical, EngineError> {
        self.store
            .get_vertical(id)?
            .ok_or_else(|| EngineError::VerticalNotFound(id.to_string()))
    }

    /// Create a vertical with an id slugified from its label.
    ///
    /// Two labels that slugify to the same id collide; the second create is
    /// rejected rather than overwriting the first.
    pub fn create(&self, draft: VerticalDraft) -> Result<Vertical, EngineError> {
        let id = slugify(&draft.label);
        let vertical = Vertical {
            id,
            label: draft.label.trim().to_string(),
            description: draft.description,
            has_events: draft.has_events,
            include_in_finance_summary: draft.include_in_finance_summary,
            calendar_sync: draft.calendar_sync,
            fields: draft.fields,
            event_fields: draft.event_fields,
            title_template: draft.title_template,
            card_fields: draft.card_fields,
            table_fields: draft.table_fields,
        };
        self.insert_new(vertical)
    }

    /// Import a vertical from a JSON file, keeping the id it declares.
    pub fn import_file(&self, path: &Path) -> Result<Vertical, EngineError> {
        let vertical = load_custom_vertical(path)?;
        self.insert_new(vertical)
    }

    /// Pretty JSON for one vertical, in the same shape `import_file` reads.
    pub fn export_json(&self, id: &str) -> Result<String, EngineError> {
        let vertical = self.get(id)?;
        serde_json::to_string_pretty(&vertical).map_err(|e| EngineError::Parse {
            what: format!("vertical '{}'", id),
            message: e.to_string(),
        })
    }

    fn insert_new(&self, vertical: Vertical) -> Result<Vertical, EngineError> {
        validate_vertical(&vertical)?;
        if self.store.get_vertical(&vertical.id)?.is_some() {
            return Err(EngineError::invalid(format!(
                "A vertical with id '{}' already exists",
                vertical.id
            )));
        }
        log_display_warnings(&vertical);

        self.store.insert_vertical(&vertical)?;
        log::info!("Created vertical {} ({})", vertical.id, vertical.label);
        Ok(vertical)
    }

    /// Apply a partial update. Concurrent updates are last-write-wins.
    pub fn update(&self, id: &str, patch: VerticalPatch) -> Result<Vertical, EngineError> {
        let mut vertical = self.get(id)?;
        if let Some(label) = patch.label {
            vertical.label = label.trim().to_string();
        }
        if let Some(description) = patch.description {
            vertical.description = description;
        }
        if let Some(has_events) = patch.has_events {
            vertical.has_events = has_events;
        }
        if let Some(include) = patch.include_in_finance_summary {
            vertical.include_in_finance_summary = include;
        }
        if let Some(calendar_sync) = patch.calendar_sync {
            vertical.calendar_sync = calendar_sync;
        }
        if let Some(fields) = patch.fields {
            vertical.fields = fields;
        }
        if let Some(event_fields) = patch.event_fields {
            vertical.event_fields = event_fields;
        }
        if let Some(title_template) = patch.title_template {
            vertical.title_template = title_template;
        }
        if let Some(card_fields) = patch.card_fields {
            vertical.card_fields = card_fields;
        }
        if let Some(table_fields) = patch.table_fields {
            vertical.table_fields = table_fields;
        }

        validate_vertical(&vertical)?;
        log_display_warnings(&vertical);

        self.store.update_vertical(&vertical)?;
        log::info!("Updated vertical {}", vertical.id);
        Ok(vertical)
    }

    /// Delete a vertical without touching the projects that use it.
    ///
    /// If any project still references the vertical, nothing happens unless
    /// `confirmed` is set; the caller is expected to warn the operator first.
    pub fn delete(&self, id: &str, confirmed: bool) -> Result<DeleteOutcome, EngineError> {
        if self.store.get_vertical(id)?.is_none() {
            return Err(EngineError::VerticalNotFound(id.to_string()));
        }

        let referencing = self.store.count_projects_for_vertical(id)?;
        if referencing > 0 && !confirmed {
            return Ok(DeleteOutcome::NeedsConfirmation {
                referencing_projects: referencing,
            });
        }

        self.store.delete_vertical(id)?;
        if referencing > 0 {
            log::warn!(
                "Deleted vertical {} while {} projects still reference it",
                id,
                referencing
            );
        } else {
            log::info!("Deleted vertical {}", id);
        }
        Ok(DeleteOutcome::Deleted {
            dangling_projects: referencing,
        })
    }

    /// Insert the default verticals into an empty store.
    ///
    /// Returns how many were inserted; 0 if the store already had any.
    pub fn seed_defaults(&self, defaults: &DefaultConfig) -> Result<usize, EngineError> {
        if !self.store.list_verticals()?.is_empty() {
            return Ok(0);
        }
        for vertical in &defaults.verticals {
            validate_vertical(vertical)?;
        }
        self.store.insert_verticals(&defaults.verticals)?;
        log::info!("Seeded {} default verticals", defaults.verticals.len());
        Ok(defaults.verticals.len())
    }

    /// Verticals whose projects count toward the finance summary.
    pub fn finance_verticals(&self) -> Result<Vec<Vertical>, EngineError> {
        Ok(self
            .list()?
            .into_iter()
            .filter(|v| v.include_in_finance_summary)
            .collect())
    }

    /// Verticals whose events are pushed to the calendar.
    pub fn calendar_verticals(&self) -> Result<Vec<Vertical>, EngineError> {
        Ok(self
            .list()?
            .into_iter()
            .filter(|v| v.calendar_sync)
            .collect())
    }
}

fn log_display_warnings(vertical: &Vertical) {
    for warning in display_warnings(vertical) {
        log::warn!("Vertical {}: {}", vertical.id, warning);
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::db::test_utils::test_db;
    use crate::types::ProjectRecord;
    use crate::verticals::schema::FieldType;

    fn draft(label: &str) -> VerticalDraft {
        VerticalDraft {
            label: label.to_string(),
            description: "Brand and product work".to_string(),
            has_events: true,
            fields: vec![
                SchemaField::new("company_name", "Company", FieldType::Text),
                SchemaField::new("shoot_date", "Shoot Date", FieldType::Date),
            ],
            title_template: "{company_name}".to_string(),
            card_fields: vec!["shoot_date".to_string()],
            table_fields: vec!["company_name".to_string()],
            ..Default::default()
        }
    }

    #[test]
    fn test_create_derives_slug_id() {
        let db = test_db();
        let registry = VerticalRegistry::new(&db);
        let vertical = registry.create(draft("  Corporate Shoots ")).unwrap();
        assert_eq!(vertical.id, "corporate-shoots");
        assert_eq!(vertical.label, "Corporate Shoots");
        assert_eq!(registry.get("corporate-shoots").unwrap(), vertical);
    }

    #[test]
    fn test_create_rejects_slug_collision() {
        let db = test_db();
        let registry = VerticalRegistry::new(&db);
        let first = registry.create(draft("Corporate Shoots")).unwrap();

        let mut second = draft("corporate   shoots!");
        second.description = "Would overwrite".to_string();
        let err = registry.create(second).unwrap_err();
        assert!(matches!(err, EngineError::ConfigValidation(_)));
        assert_eq!(registry.get(&first.id).unwrap().description, first.description);
    }

    #[test]
    fn test_create_rejects_select_without_options() {
        let db = test_db();
        let registry = VerticalRegistry::new(&db);
        let mut d = draft("Events");
        d.fields.push(SchemaField::new("tier", "Tier", FieldType::Select { options: vec![] }));
        assert!(matches!(
            registry.create(d),
            Err(EngineError::ConfigValidation(_))
        ));
        assert!(registry.list().unwrap().is_empty());
    }

    #[test]
    fn test_create_rejects_empty_label() {
        let db = test_db();
        let registry = VerticalRegistry::new(&db);
        match registry.create(draft("   ")) {
            Err(EngineError::ConfigValidation(errors)) => {
                assert!(errors.iter().any(|e| e.contains("label")));
            }
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[test]
    fn test_create_rejects_event_field_named_like_core_key() {
        let db = test_db();
        let registry = VerticalRegistry::new(&db);
        let mut d = draft("Events");
        d.event_fields
            .push(SchemaField::new("deliverables", "Deliverables", FieldType::Text));
        assert!(matches!(
            registry.create(d),
            Err(EngineError::ConfigValidation(_))
        ));

        registry.create(draft("Corporate")).unwrap();
        let patch = VerticalPatch {
            event_fields: Some(vec![SchemaField::new("type", "Kind", FieldType::Text)]),
            ..Default::default()
        };
        assert!(matches!(
            registry.update("corporate", patch),
            Err(EngineError::ConfigValidation(_))
        ));
        assert!(registry.get("corporate").unwrap().event_fields.is_empty());
        assert!(registry.get("events").is_err());
    }

    #[test]
    fn test_create_rejects_label_without_slug_characters() {
        let db = test_db();
        let registry = VerticalRegistry::new(&db);
        match registry.create(draft("&&&")) {
            Err(EngineError::ConfigValidation(errors)) => {
                assert_eq!(errors, vec!["Vertical id is required".to_string()]);
            }
            other => panic!("expected validation error, got {:?}", other),
        }
        assert!(registry.list().unwrap().is_empty());
    }

    #[test]
    fn test_unknown_card_field_is_accepted() {
        let db = test_db();
        let registry = VerticalRegistry::new(&db);
        let mut d = draft("Events");
        d.card_fields.push("not_a_field".to_string());
        assert!(registry.create(d).is_ok());
    }

    #[test]
    fn test_update_applies_patch_and_validates() {
        let db = test_db();
        let registry = VerticalRegistry::new(&db);
        let created = registry.create(draft("Corporate")).unwrap();

        let updated = registry
            .update(
                &created.id,
                VerticalPatch {
                    label: Some("Corporate & Brand".to_string()),
                    calendar_sync: Some(true),
                    ..Default::default()
                },
            )
            .unwrap();
        assert_eq!(updated.id, "corporate");
        assert_eq!(updated.label, "Corporate & Brand");
        assert!(updated.calendar_sync);
        assert_eq!(updated.fields, created.fields);

        let bad = VerticalPatch {
            fields: Some(vec![
                SchemaField::new("a", "A", FieldType::Text),
                SchemaField::new("a", "A again", FieldType::Number),
            ]),
            ..Default::default()
        };
        assert!(matches!(
            registry.update(&created.id, bad),
            Err(EngineError::ConfigValidation(_))
        ));
        assert_eq!(registry.get("corporate").unwrap().fields, created.fields);

        assert!(matches!(
            registry.update("ghost", VerticalPatch::default()),
            Err(EngineError::VerticalNotFound(_))
        ));
    }

    #[test]
    fn test_delete_unreferenced_vertical() {
        let db = test_db();
        let registry = VerticalRegistry::new(&db);
        registry.create(draft("Corporate")).unwrap();
        assert_eq!(
            registry.delete("corporate", false).unwrap(),
            DeleteOutcome::Deleted {
                dangling_projects: 0
            }
        );
        assert!(registry.list().unwrap().is_empty());
        assert!(matches!(
            registry.delete("corporate", true),
            Err(EngineError::VerticalNotFound(_))
        ));
    }

    #[test]
    fn test_delete_referenced_vertical_requires_confirmation() {
        let db = test_db();
        let registry = VerticalRegistry::new(&db);
        registry.create(draft("Corporate")).unwrap();
        let project = ProjectRecord {
            id: "p1".to_string(),
            vertical: "corporate".to_string(),
            metadata: [("company_name".to_string(), json!("Acme"))].into_iter().collect(),
            ..Default::default()
        };
        db.upsert_project(&project).unwrap();

        assert_eq!(
            registry.delete("corporate", false).unwrap(),
            DeleteOutcome::NeedsConfirmation {
                referencing_projects: 1
            }
        );
        assert_eq!(registry.list().unwrap().len(), 1);

        assert_eq!(
            registry.delete("corporate", true).unwrap(),
            DeleteOutcome::Deleted {
                dangling_projects: 1
            }
        );
        assert!(registry.list().unwrap().is_empty());
        // The project still points at the removed id
        let stored = db.get_project("p1").unwrap().unwrap();
        assert_eq!(stored.vertical, "corporate");
    }

    #[test]
    fn test_seed_defaults_only_into_empty_store() {
        let db = test_db();
        let registry = VerticalRegistry::new(&db);
        let defaults = DefaultConfig::builtin().unwrap();
        assert_eq!(registry.seed_defaults(&defaults).unwrap(), 3);
        assert_eq!(registry.seed_defaults(&defaults).unwrap(), 0);
        let ids: Vec<String> = registry.list().unwrap().into_iter().map(|v| v.id).collect();
        assert_eq!(ids, ["weddings", "corporate", "portraits"]);
    }

    #[test]
    fn test_seed_substitute_defaults() {
        let db = test_db();
        let registry = VerticalRegistry::new(&db);
        assert_eq!(registry.seed_defaults(&DefaultConfig::empty()).unwrap(), 0);

        let custom = DefaultConfig {
            verticals: vec![events_vertical()],
        };
        assert_eq!(registry.seed_defaults(&custom).unwrap(), 1);
        assert_eq!(registry.get("events").unwrap().label, "Events");
    }

    #[test]
    fn test_seed_defaults_is_all_or_nothing() {
        let db = test_db();
        let registry = VerticalRegistry::new(&db);
        // Second copy of the same id fails at insert time
        let defaults = DefaultConfig {
            verticals: vec![events_vertical(), events_vertical()],
        };
        assert!(matches!(
            registry.seed_defaults(&defaults),
            Err(EngineError::Persistence(_))
        ));
        assert!(registry.list().unwrap().is_empty());

        assert_eq!(
            registry
                .seed_defaults(&DefaultConfig::builtin().unwrap())
                .unwrap(),
            3
        );
    }

    fn events_vertical() -> Vertical {
        Vertical {
            id: "events".to_string(),
            label: "Events".to_string(),
            description: String::new(),
            has_events: true,
            include_in_finance_summary: false,
            calendar_sync: true,
            fields: vec![],
            event_fields: vec![],
            title_template: String::new(),
            card_fields: vec![],
            table_fields: vec![],
        }
    }

    #[test]
    fn test_finance_and_calendar_filters() {
        let db = test_db();
        let registry = VerticalRegistry::new(&db);
        registry
            .seed_defaults(&DefaultConfig {
                verticals: vec![
                    crate::verticals::loader::load_vertical("portraits").unwrap(),
                    events_vertical(),
                ],
            })
            .unwrap();
        let finance: Vec<String> = registry
            .finance_verticals()
            .unwrap()
            .into_iter()
            .map(|v| v.id)
            .collect();
        assert_eq!(finance, ["portraits"]);
        let calendar: Vec<String> = registry
            .calendar_verticals()
            .unwrap()
            .into_iter()
            .map(|v| v.id)
            .collect();
        assert_eq!(calendar, ["events"]);
    }

    #[test]
    fn test_export_then_import_roundtrip() {
        let source_db = test_db();
        let source = VerticalRegistry::new(&source_db);
        source.seed_defaults(&DefaultConfig::builtin().unwrap()).unwrap();
        let exported = source.export_json("weddings").unwrap();

        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("weddings.json");
        std::fs::write(&path, &exported).unwrap();

        let target_db = test_db();
        let target = VerticalRegistry::new(&target_db);
        let imported = target.import_file(&path).unwrap();
        assert_eq!(imported, source.get("weddings").unwrap());
        assert_eq!(target.export_json("weddings").unwrap(), exported);

        // Importing the same id again collides
        assert!(matches!(
            target.import_file(&path),
            Err(EngineError::ConfigValidation(_))
        ));
    }
}
