use rusqlite::params;

use super::*;

/// Raw `templates` row before `events_json` is parsed.
struct TemplateRow {
    id: String,
    name: String,
    description: String,
    vertical: String,
    events_json: String,
    project_id: Option<String>,
    created_at: String,
    updated_at: String,
}

impl TemplateRow {
    fn into_template(self) -> Result<Template, DbError> {
        Ok(Template {
            id: self.id,
            name: self.name,
            description: self.description,
            vertical: self.vertical,
            events: from_json(&self.events_json)?,
            project_id: self.project_id,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

impl ConfigDb {
    // =========================================================================
    // Templates
    // =========================================================================

    fn map_template_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<TemplateRow> {
        Ok(TemplateRow {
            id: row.get(0)?,
            name: row.get(1)?,
            description: row.get(2)?,
            vertical: row.get(3)?,
            events_json: row.get(4)?,
            project_id: row.get(5)?,
            created_at: row.get(6)?,
            updated_at: row.get(7)?,
        })
    }

    /// Get templates ordered by name, optionally for one vertical only.
    pub fn get_templates(&self, vertical: Option<&str>) -> Result<Vec<Template>, DbError> {
        let mut stmt = self.conn.prepare(
            "SELECT id, name, description, vertical, events_json, project_id,
                    created_at, updated_at
             FROM templates
             WHERE ?1 IS NULL OR vertical = ?1
             ORDER BY name COLLATE NOCASE, id",
        )?;
        let rows = stmt.query_map(params![vertical], Self::map_template_row)?;
        let mut templates = Vec::new();
        for row in rows {
            templates.push(row?.into_template()?);
        }
        Ok(templates)
    }

    /// Get a template by id.
    pub fn get_template(&self, id: &str) -> Result<Option<Template>, DbError> {
        let mut stmt = self.conn.prepare(
            "SELECT id, name, description, vertical, events_json, project_id,
                    created_at, updated_at
             FROM templates WHERE id = ?1",
        )?;
        let mut rows = stmt.query_map(params![id], Self::map_template_row)?;
        match rows.next() {
            Some(row) => Ok(Some(row?.into_template()?)),
            None => Ok(None),
        }
    }

    /// Insert or update a template.
    pub fn upsert_template(&self, template: &Template) -> Result<(), DbError> {
        self.conn.execute(
            "INSERT INTO templates (
                id, name, description, vertical, events_json, project_id,
                created_at, updated_at
             ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
             ON CONFLICT(id) DO UPDATE SET
                name = excluded.name,
                description = excluded.description,
                vertical = excluded.vertical,
                events_json = excluded.events_json,
                project_id = excluded.project_id,
                updated_at = excluded.updated_at",
            params![
                template.id,
                template.name,
                template.description,
                template.vertical,
                to_json(&template.events)?,
                template.project_id,
                template.created_at,
                template.updated_at,
            ],
        )?;
        Ok(())
    }

    /// Delete a template.
    pub fn delete_template(&self, id: &str) -> Result<bool, DbError> {
        let changed = self
            .conn
            .execute("DELETE FROM templates WHERE id = ?1", params![id])?;
        Ok(changed > 0)
    }
}

#[cfg(test)]
mod tests {
    use crate::db::test_utils::test_db;
    use crate::templates::model::Template;
    use crate::types::{Deliverable, EventRecord};

    fn sample_template(id: &str, name: &str, vertical: &str) -> Template {
        Template {
            id: id.to_string(),
            name: name.to_string(),
            description: String::new(),
            vertical: vertical.to_string(),
            events: vec![EventRecord {
                id: format!("{}-evt", id),
                event_type: "Ceremony".to_string(),
                deliverables: vec![Deliverable::new(format!("{}-del", id), "Album")],
                ..Default::default()
            }],
            project_id: None,
            created_at: "2025-01-01T00:00:00Z".to_string(),
            updated_at: "2025-01-01T00:00:00Z".to_string(),
        }
    }

    #[test]
    fn test_upsert_and_get() {
        let db = test_db();
        let template = sample_template("t1", "Classic", "weddings");
        db.upsert_template(&template).unwrap();
        assert_eq!(db.get_template("t1").unwrap(), Some(template));
        assert!(db.get_template("t2").unwrap().is_none());
    }

    #[test]
    fn test_upsert_keeps_created_at() {
        let db = test_db();
        let mut template = sample_template("t1", "Classic", "weddings");
        db.upsert_template(&template).unwrap();

        template.name = "Classic Plus".to_string();
        template.created_at = "2030-01-01T00:00:00Z".to_string();
        template.updated_at = "2030-01-01T00:00:00Z".to_string();
        db.upsert_template(&template).unwrap();

        let loaded = db.get_template("t1").unwrap().unwrap();
        assert_eq!(loaded.name, "Classic Plus");
        assert_eq!(loaded.created_at, "2025-01-01T00:00:00Z");
        assert_eq!(loaded.updated_at, "2030-01-01T00:00:00Z");
    }

    #[test]
    fn test_filter_by_vertical_and_order_by_name() {
        let db = test_db();
        db.upsert_template(&sample_template("t1", "zeta", "weddings")).unwrap();
        db.upsert_template(&sample_template("t2", "Alpha", "weddings")).unwrap();
        db.upsert_template(&sample_template("t3", "Gala", "corporate")).unwrap();

        let all = db.get_templates(None).unwrap();
        let names: Vec<&str> = all.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, ["Alpha", "Gala", "zeta"]);

        let weddings = db.get_templates(Some("weddings")).unwrap();
        assert_eq!(weddings.len(), 2);
        assert!(weddings.iter().all(|t| t.vertical == "weddings"));

        assert!(db.get_templates(Some("portraits")).unwrap().is_empty());
    }

    #[test]
    fn test_delete_template() {
        let db = test_db();
        db.upsert_template(&sample_template("t1", "Classic", "weddings")).unwrap();
        assert!(db.delete_template("t1").unwrap());
        assert!(!db.delete_template("t1").unwrap());
    }
}
