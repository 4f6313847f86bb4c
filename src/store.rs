//! Persistence seam for verticals, templates, and project events.
//!
//! The registry and template engine only talk to storage through this
//! trait. There is no optimistic-concurrency token: the last write wins.

use crate::db::DbError;
use crate::templates::model::Template;
use crate::types::EventRecord;
use crate::verticals::schema::Vertical;

pub trait ConfigStore {
    /// All verticals in creation order.
    fn list_verticals(&self) -> Result<Vec<Vertical>, DbError>;

    fn get_vertical(&self, id: &str) -> Result<Option<Vertical>, DbError>;

    /// Insert a new vertical. Fails if the id already exists.
    fn insert_vertical(&self, vertical: &Vertical) -> Result<(), DbError>;

    /// Insert several verticals, all or none.
    fn insert_verticals(&self, verticals: &[Vertical]) -> Result<(), DbError> {
        for vertical in verticals {
            self.insert_vertical(vertical)?;
        }
        Ok(())
    }

    /// Overwrite an existing vertical, keeping its list position.
    fn update_vertical(&self, vertical: &Vertical) -> Result<(), DbError>;

    /// Delete a vertical. Returns false if it did not exist.
    fn delete_vertical(&self, id: &str) -> Result<bool, DbError>;

    /// Number of projects whose `vertical` column equals `id`.
    fn count_projects_for_vertical(&self, id: &str) -> Result<usize, DbError>;

    /// Templates, optionally restricted to one vertical, ordered by name.
    fn list_templates(&self, vertical: Option<&str>) -> Result<Vec<Template>, DbError>;

    fn get_template(&self, id: &str) -> Result<Option<Template>, DbError>;

    /// Insert or overwrite a template.
    fn save_template(&self, template: &Template) -> Result<(), DbError>;

    /// Delete a template. Returns false if it did not exist.
    fn delete_template(&self, id: &str) -> Result<bool, DbError>;

    /// A project's current events, or `None` if the project does not exist.
    fn get_project_events(&self, project_id: &str) -> Result<Option<Vec<EventRecord>>, DbError>;
}
