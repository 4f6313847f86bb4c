//! SQLite store for vertical and template configuration.
//!
//! The database lives at `~/.studiodesk/studiodesk.db` unless the config
//! overrides it. Nested structures (field lists, events) are stored as JSON
//! columns; scalar attributes get their own columns so they can be queried.

use std::path::PathBuf;

use rusqlite::Connection;
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::store::ConfigStore;
use crate::templates::model::Template;
use crate::types::EventRecord;
use crate::verticals::schema::Vertical;

pub mod types;
pub use types::*;

pub struct ConfigDb {
    conn: Connection,
}

impl ConfigDb {
    /// Borrow the underlying connection for ad-hoc queries.
    pub fn conn_ref(&self) -> &Connection {
        &self.conn
    }

    /// Execute a closure within a SQLite transaction.
    /// Commits on Ok, rolls back on Err.
    pub fn with_transaction<F, T, E>(&self, f: F) -> Result<T, E>
    where
        F: FnOnce(&Self) -> Result<T, E>,
        E: From<DbError>,
    {
        self.conn
            .execute_batch("BEGIN IMMEDIATE")
            .map_err(|e| E::from(DbError::from(e)))?;
        match f(self) {
            Ok(val) => {
                self.conn
                    .execute_batch("COMMIT")
                    .map_err(|e| E::from(DbError::from(e)))?;
                Ok(val)
            }
            Err(e) => {
                let _ = self.conn.execute_batch("ROLLBACK");
                Err(e)
            }
        }
    }

    /// Open (or create) the database at the default path and apply the schema.
    pub fn open() -> Result<Self, DbError> {
        let path = Self::db_path()?;
        Self::open_at(path)
    }

    /// Open a database at an explicit path.
    pub fn open_at(path: PathBuf) -> Result<Self, DbError> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                std::fs::create_dir_all(parent).map_err(DbError::CreateDir)?;
            }
        }

        let conn = Connection::open(&path)?;

        // Enable WAL mode for better concurrent read performance
        conn.execute_batch("PRAGMA journal_mode=WAL;")?;

        crate::migrations::run_migrations(&conn).map_err(DbError::Migration)?;

        log::debug!("Opened config database at {}", path.display());
        Ok(Self { conn })
    }

    /// Resolve the default database path: `~/.studiodesk/studiodesk.db`.
    pub fn db_path() -> Result<PathBuf, DbError> {
        let home = dirs::home_dir().ok_or(DbError::HomeDirNotFound)?;
        Ok(home.join(".studiodesk").join("studiodesk.db"))
    }
}

/// Serialize a value for a JSON column.
pub(crate) fn to_json<T: Serialize + ?Sized>(value: &T) -> Result<String, DbError> {
    Ok(serde_json::to_string(value)?)
}

/// Parse a JSON column.
pub(crate) fn from_json<T: DeserializeOwned>(raw: &str) -> Result<T, DbError> {
    Ok(serde_json::from_str(raw)?)
}

pub mod projects;
pub mod templates;
pub mod verticals;

impl ConfigStore for ConfigDb {
    fn list_verticals(&self) -> Result<Vec<Vertical>, DbError> {
        self.get_all_verticals()
    }

    fn get_vertical(&self, id: &str) -> Result<Option<Vertical>, DbError> {
        ConfigDb::get_vertical(self, id)
    }

    fn insert_vertical(&self, vertical: &Vertical) -> Result<(), DbError> {
        ConfigDb::insert_vertical(self, vertical)
    }

    fn insert_verticals(&self, verticals: &[Vertical]) -> Result<(), DbError> {
        ConfigDb::insert_verticals(self, verticals)
    }

    fn update_vertical(&self, vertical: &Vertical) -> Result<(), DbError> {
        ConfigDb::update_vertical(self, vertical)
    }

    fn delete_vertical(&self, id: &str) -> Result<bool, DbError> {
        ConfigDb::delete_vertical(self, id)
    }

    fn count_projects_for_vertical(&self, id: &str) -> Result<usize, DbError> {
        ConfigDb::count_projects_for_vertical(self, id)
    }

    fn list_templates(&self, vertical: Option<&str>) -> Result<Vec<Template>, DbError> {
        self.get_templates(vertical)
    }

    fn get_template(&self, id: &str) -> Result<Option<Template>, DbError> {
        ConfigDb::get_template(self, id)
    }

    fn save_template(&self, template: &Template) -> Result<(), DbError> {
        self.upsert_template(template)
    }

    fn delete_template(&self, id: &str) -> Result<bool, DbError> {
        ConfigDb::delete_template(self, id)
    }

    fn get_project_events(&self, project_id: &str) -> Result<Option<Vec<EventRecord>>, DbError> {
        ConfigDb::get_project_events(self, project_id)
    }
}

// =============================================================================
// Shared test utilities
// =============================================================================
