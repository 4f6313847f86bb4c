//! Template CRUD and instantiation.
//!
//! Instantiation stamps a template's event structure into a new project:
//! every event and deliverable gets a fresh id, instance details (dates,
//! venue, team, due dates) are cleared, and deliverables restart as Pending.

use std::collections::HashSet;

use chrono::Utc;

use super::ids::IdGenerator;
use super::model::{
    Instantiation, SkippedBlueprint, Template, TemplateDraft, TemplateFilter, TemplatePatch,
};
use crate::error::EngineError;
use crate::store::ConfigStore;
use crate::types::{Deliverable, EventRecord};

/// Attempts per identifier before giving up on a generator that keeps colliding.
pub const MAX_ID_ATTEMPTS: usize = 16;

pub struct EventTemplateEngine<'a> {
    store: &'a dyn ConfigStore,
}

impl<'a> EventTemplateEngine<'a> {
    pub fn new(store: &'a dyn ConfigStore) -> Self {
        Self { store }
    }

    /// Create and persist a template.
    ///
    /// With a `project_id`, the template's events are a deep copy of that
    /// project's events as they are right now. Later edits to the project do
    /// not reach the template.
    pub fn create_template(
        &self,
        draft: TemplateDraft,
        ids: &mut dyn IdGenerator,
    ) -> Result<Template, EngineError> {
        self.check_vertical(&draft.vertical)?;

        let events = match &draft.project_id {
            Some(project_id) => {
                let events = self
                    .store
                    .get_project_events(project_id)?
                    .ok_or_else(|| {
                        EngineError::invalid(format!("Project '{}' does not exist", project_id))
                    })?;
                if !draft.events.is_empty() {
                    log::warn!(
                        "Template '{}': ignoring {} supplied events in favour of project {} snapshot",
                        draft.name,
                        draft.events.len(),
                        project_id
                    );
                }
                events
            }
            None => draft.events,
        };

        let now = Utc::now().to_rfc3339();
        let mut template = Template {
            id: self.unused_template_id(ids)?,
            name: draft.name.trim().to_string(),
            description: draft.description,
            vertical: draft.vertical,
            events,
            project_id: draft.project_id,
            created_at: now.clone(),
            updated_at: now,
        };
        validate_template(&template)?;
        assign_missing_ids(&mut template.events, ids)?;

        self.store.save_template(&template)?;
        log::info!(
            "Created template '{}' ({}) for vertical {} with {} events",
            template.name,
            template.id,
            template.vertical,
            template.events.len()
        );
        Ok(template)
    }

    /// Templates matching the filter. Read-only.
    pub fn list_templates(&self, filter: &TemplateFilter) -> Result<Vec<Template>, EngineError> {
        Ok(self.store.list_templates(filter.vertical.as_deref())?)
    }

    pub fn get_template(&self, id: &str) -> Result<Template, EngineError> {
        self.store
            .get_template(id)?
            .ok_or_else(|| EngineError::TemplateNotFound(id.to_string()))
    }

    /// Apply a partial update and persist the result. Last write wins.
    pub fn update_template(
        &self,
        id: &str,
        patch: TemplatePatch,
        ids: &mut dyn IdGenerator,
    ) -> Result<Template, EngineError> {
        let mut template = self.get_template(id)?;
        if let Some(name) = patch.name {
            template.name = name.trim().to_string();
        }
        if let Some(description) = patch.description {
            template.description = description;
        }
        if let Some(events) = patch.events {
            template.events = events;
        }
        validate_template(&template)?;
        assign_missing_ids(&mut template.events, ids)?;
        template.updated_at = Utc::now().to_rfc3339();

        self.store.save_template(&template)?;
        log::info!("Updated template {}", template.id);
        Ok(template)
    }

    pub fn delete_template(&self, id: &str) -> Result<(), EngineError> {
        if !self.store.delete_template(id)? {
            return Err(EngineError::TemplateNotFound(id.to_string()));
        }
        log::info!("Deleted template {}", id);
        Ok(())
    }

    /// Look up a template and instantiate it. An unknown id fails before any ids are drawn.
    pub fn instantiate_by_id(
        &self,
        id: &str,
        ids: &mut dyn IdGenerator,
    ) -> Result<Instantiation, EngineError> {
        let template = self.get_template(id)?;
        instantiate(&template, ids)
    }

    /// Draw a template id that no stored template uses yet.
    fn unused_template_id(&self, ids: &mut dyn IdGenerator) -> Result<String, EngineError> {
        for _ in 0..MAX_ID_ATTEMPTS {
            let id = ids.next_id();
            if !id.is_empty() && self.store.get_template(&id)?.is_none() {
                return Ok(id);
            }
            log::debug!("Template id '{}' is already in use, drawing again", id);
        }
        Err(EngineError::IdExhausted(MAX_ID_ATTEMPTS))
    }

    fn check_vertical(&self, vertical_id: &str) -> Result<(), EngineError> {
        let vertical = self.store.get_vertical(vertical_id)?.ok_or_else(|| {
            EngineError::invalid(format!("Vertical '{}' does not exist", vertical_id))
        })?;
        if !vertical.has_events {
            return Err(EngineError::invalid(format!(
                "Vertical '{}' does not use events",
                vertical_id
            )));
        }
        Ok(())
    }
}

/// Hard requirements for a storable template.
fn validate_template(template: &Template) -> Result<(), EngineError> {
    let mut errors = Vec::new();
    if template.name.is_empty() {
        errors.push("Template name is required".to_string());
    }
    if template.vertical.trim().is_empty() {
        errors.push("Template vertical is required".to_string());
    }
    if errors.is_empty() {
        Ok(())
    } else {
        Err(EngineError::ConfigValidation(errors))
    }
}

/// Give every blank or repeated event/deliverable id a fresh one.
fn assign_missing_ids(
    events: &mut [EventRecord],
    ids: &mut dyn IdGenerator,
) -> Result<(), EngineError> {
    let mut taken: HashSet<String> = HashSet::new();
    let mut needs_id = Vec::new();
    for (e, event) in events.iter().enumerate() {
        if event.id.is_empty() || !taken.insert(event.id.clone()) {
            needs_id.push((e, None));
        }
        for (d, deliverable) in event.deliverables.iter().enumerate() {
            if deliverable.id.is_empty() || !taken.insert(deliverable.id.clone()) {
                needs_id.push((e, Some(d)));
            }
        }
    }
    for (e, d) in needs_id {
        let id = fresh_id(ids, &mut taken)?;
        match d {
            None => events[e].id = id,
            Some(d) => events[e].deliverables[d].id = id,
        }
    }
    Ok(())
}

/// Draw ids until one is not in `taken`, then reserve it.
fn fresh_id(ids: &mut dyn IdGenerator, taken: &mut HashSet<String>) -> Result<String, EngineError> {
    for _ in 0..MAX_ID_ATTEMPTS {
        let id = ids.next_id();
        if !id.is_empty() && taken.insert(id.clone()) {
            return Ok(id);
        }
        log::debug!("Id generator returned a taken id '{}', drawing again", id);
    }
    Err(EngineError::IdExhausted(MAX_ID_ATTEMPTS))
}

/// Stamp a template's events into a brand-new, independently owned event list.
///
/// The template is only read. Every produced id is distinct from the
/// template's own ids and from every other produced id. Blueprints with no
/// event type, and deliverables with no type, are left out and listed in
/// `skipped`.
pub fn instantiate(
    template: &Template,
    ids: &mut dyn IdGenerator,
) -> Result<Instantiation, EngineError> {
    let mut taken: HashSet<String> = HashSet::new();
    for event in &template.events {
        taken.insert(event.id.clone());
        taken.extend(event.deliverables.iter().map(|d| d.id.clone()));
    }

    let mut result = Instantiation::default();
    for (event_index, blueprint) in template.events.iter().enumerate() {
        if blueprint.event_type.trim().is_empty() {
            log::warn!(
                "Template {}: skipping event #{} ({}) with no event type",
                template.id,
                event_index,
                blueprint.id
            );
            result.skipped.push(SkippedBlueprint {
                event_index,
                deliverable_index: None,
                reason: "event has no type".to_string(),
            });
            continue;
        }

        let mut event = EventRecord {
            id: fresh_id(ids, &mut taken)?,
            event_type: blueprint.event_type.clone(),
            notes: blueprint.notes.clone(),
            custom: blueprint.custom.clone(),
            ..Default::default()
        };

        for (deliverable_index, source) in blueprint.deliverables.iter().enumerate() {
            if source.kind.trim().is_empty() {
                log::warn!(
                    "Template {}: skipping deliverable #{} of event #{} with no type",
                    template.id,
                    deliverable_index,
                    event_index
                );
                result.skipped.push(SkippedBlueprint {
                    event_index,
                    deliverable_index: Some(deliverable_index),
                    reason: "deliverable has no type".to_string(),
                });
                continue;
            }
            event.deliverables.push(Deliverable {
                quantity: source.quantity,
                notes: source.notes.clone(),
                ..Deliverable::new(fresh_id(ids, &mut taken)?, source.kind.clone())
            });
        }

        result.events.push(event);
    }

    log::debug!(
        "Instantiated template {} into {} events ({} skipped)",
        template.id,
        result.events.len(),
        result.skipped.len()
    );
    Ok(result)
}
