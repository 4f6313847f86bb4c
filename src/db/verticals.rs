use chrono::Utc;
use rusqlite::params;

use super::*;

const VERTICAL_COLUMNS: &str = "id, label, description, has_events, include_in_finance_summary,
    calendar_sync, fields_json, event_fields_json, title_template,
    card_fields_json, table_fields_json";

/// Raw `verticals` row before the JSON columns are parsed.
struct VerticalRow {
    id: String,
    label: String,
    description: String,
    has_events: bool,
    include_in_finance_summary: bool,
    calendar_sync: bool,
    fields_json: String,
    event_fields_json: String,
    title_template: String,
    card_fields_json: String,
    table_fields_json: String,
}

impl VerticalRow {
    fn into_vertical(self) -> Result<Vertical, DbError> {
        Ok(Vertical {
            id: self.id,
            label: self.label,
            description: self.description,
            has_events: self.has_events,
            include_in_finance_summary: self.include_in_finance_summary,
            calendar_sync: self.calendar_sync,
            fields: from_json(&self.fields_json)?,
            event_fields: from_json(&self.event_fields_json)?,
            title_template: self.title_template,
            card_fields: from_json(&self.card_fields_json)?,
            table_fields: from_json(&self.table_fields_json)?,
        })
    }
}

impl ConfigDb {
    // =========================================================================
    // Verticals
    // =========================================================================

    fn map_vertical_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<VerticalRow> {
        Ok(VerticalRow {
            id: row.get(0)?,
            label: row.get(1)?,
            description: row.get(2)?,
            has_events: row.get::<_, i32>(3)? != 0,
            include_in_finance_summary: row.get::<_, i32>(4)? != 0,
            calendar_sync: row.get::<_, i32>(5)? != 0,
            fields_json: row.get(6)?,
            event_fields_json: row.get(7)?,
            title_template: row.get(8)?,
            card_fields_json: row.get(9)?,
            table_fields_json: row.get(10)?,
        })
    }

    /// Get all verticals in creation order.
    pub fn get_all_verticals(&self) -> Result<Vec<Vertical>, DbError> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {} FROM verticals ORDER BY rowid",
            VERTICAL_COLUMNS
        ))?;
        let rows = stmt.query_map([], Self::map_vertical_row)?;
        let mut verticals = Vec::new();
        for row in rows {
            verticals.push(row?.into_vertical()?);
        }
        Ok(verticals)
    }

    /// Get a vertical by id.
    pub fn get_vertical(&self, id: &str) -> Result<Option<Vertical>, DbError> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {} FROM verticals WHERE id = ?1",
            VERTICAL_COLUMNS
        ))?;
        let mut rows = stmt.query_map(params![id], Self::map_vertical_row)?;
        match rows.next() {
            Some(row) => Ok(Some(row?.into_vertical()?)),
            None => Ok(None),
        }
    }

    /// Insert a new vertical. A duplicate id is a constraint error.
    pub fn insert_vertical(&self, vertical: &Vertical) -> Result<(), DbError> {
        let now = Utc::now().to_rfc3339();
        self.conn.execute(
            "INSERT INTO verticals (
                id, label, description, has_events, include_in_finance_summary,
                calendar_sync, fields_json, event_fields_json, title_template,
                card_fields_json, table_fields_json, created_at, updated_at
             ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?12)",
            params![
                vertical.id,
                vertical.label,
                vertical.description,
                vertical.has_events as i32,
                vertical.include_in_finance_summary as i32,
                vertical.calendar_sync as i32,
                to_json(&vertical.fields)?,
                to_json(&vertical.event_fields)?,
                vertical.title_template,
                to_json(&vertical.card_fields)?,
                to_json(&vertical.table_fields)?,
                now,
            ],
        )?;
        Ok(())
    }

    /// Insert a batch of verticals in one transaction. Any failure leaves
    /// none of them stored.
    pub fn insert_verticals(&self, verticals: &[Vertical]) -> Result<(), DbError> {
        self.with_transaction(|db| {
            for vertical in verticals {
                db.insert_vertical(vertical)?;
            }
            Ok(())
        })
    }

    /// Overwrite every attribute of an existing vertical.
    pub fn update_vertical(&self, vertical: &Vertical) -> Result<(), DbError> {
        let now = Utc::now().to_rfc3339();
        let changed = self.conn.execute(
            "UPDATE verticals SET
                label = ?2,
                description = ?3,
                has_events = ?4,
                include_in_finance_summary = ?5,
                calendar_sync = ?6,
                fields_json = ?7,
                event_fields_json = ?8,
                title_template = ?9,
                card_fields_json = ?10,
                table_fields_json = ?11,
                updated_at = ?12
             WHERE id = ?1",
            params![
                vertical.id,
                vertical.label,
                vertical.description,
                vertical.has_events as i32,
                vertical.include_in_finance_summary as i32,
                vertical.calendar_sync as i32,
                to_json(&vertical.fields)?,
                to_json(&vertical.event_fields)?,
                vertical.title_template,
                to_json(&vertical.card_fields)?,
                to_json(&vertical.table_fields)?,
                now,
            ],
        )?;
        if changed == 0 {
            return Err(DbError::NotFound(vertical.id.clone()));
        }
        Ok(())
    }

    /// Delete a vertical. Projects are left untouched.
    pub fn delete_vertical(&self, id: &str) -> Result<bool, DbError> {
        let changed = self
            .conn
            .execute("DELETE FROM verticals WHERE id = ?1", params![id])?;
        Ok(changed > 0)
    }
}
