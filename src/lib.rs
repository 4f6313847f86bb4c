//! StudioDesk schema and template engine.
//!
//! Project types ("verticals") carry their own metadata schema, title
//! template, and card/table display rules. Reusable event templates are
//! stamped into new projects with fresh identifiers.

pub mod db;
pub mod display;
pub mod error;
pub mod field_types;
pub mod forms;
mod migrations;
pub mod state;
pub mod store;
pub mod templates;
pub mod title;
pub mod types;
pub mod util;
pub mod verticals;

pub use display::{DisplayProjector, ProjectView};
pub use error::EngineError;
pub use store::ConfigStore;
pub use title::resolve_title;
