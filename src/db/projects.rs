use chrono::Utc;
use rusqlite::params;

use super::*;
use crate::types::ProjectRecord;

impl ConfigDb {
    // =========================================================================
    // Projects
    //
    // Only the columns the engine reads: vertical reference, explicit title,
    // metadata, and events. Everything else about a project lives elsewhere.
    // =========================================================================

    /// Insert or update a project row.
    pub fn upsert_project(&self, project: &ProjectRecord) -> Result<(), DbError> {
        let now = Utc::now().to_rfc3339();
        self.conn.execute(
            "INSERT INTO projects (id, vertical, title, metadata_json, events_json, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)
             ON CONFLICT(id) DO UPDATE SET
                vertical = excluded.vertical,
                title = excluded.title,
                metadata_json = excluded.metadata_json,
                events_json = excluded.events_json,
                updated_at = excluded.updated_at",
            params![
                project.id,
                project.vertical,
                project.title,
                to_json(&project.metadata)?,
                to_json(&project.events)?,
                now,
            ],
        )?;
        Ok(())
    }

    /// Get a project by id.
    pub fn get_project(&self, id: &str) -> Result<Option<ProjectRecord>, DbError> {
        let mut stmt = self.conn.prepare(
            "SELECT id, vertical, title, metadata_json, events_json
             FROM projects WHERE id = ?1",
        )?;
        let mut rows = stmt.query_map(params![id], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, Option<String>>(2)?,
                row.get::<_, String>(3)?,
                row.get::<_, String>(4)?,
            ))
        })?;
        match rows.next() {
            Some(row) => {
                let (id, vertical, title, metadata_json, events_json) = row?;
                Ok(Some(ProjectRecord {
                    id,
                    vertical,
                    title,
                    metadata: from_json(&metadata_json)?,
                    events: from_json(&events_json)?,
                }))
            }
            None => Ok(None),
        }
    }

    /// Get just a project's events.
    pub fn get_project_events(&self, id: &str) -> Result<Option<Vec<EventRecord>>, DbError> {
        let raw: Option<String> = {
            let mut stmt = self
                .conn
                .prepare("SELECT events_json FROM projects WHERE id = ?1")?;
            let mut rows = stmt.query_map(params![id], |row| row.get::<_, String>(0))?;
            match rows.next() {
                Some(row) => Some(row?),
                None => None,
            }
        };
        raw.map(|json| from_json(&json)).transpose()
    }

    /// Count projects that reference a vertical id.
    pub fn count_projects_for_vertical(&self, vertical: &str) -> Result<usize, DbError> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM projects WHERE vertical = ?1",
            params![vertical],
            |row| row.get(0),
        )?;
        Ok(count as usize)
    }
}
