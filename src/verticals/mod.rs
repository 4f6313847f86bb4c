//! Vertical definitions: the per-project-type schema, display, and title rules.

pub mod embedded;
pub mod loader;
pub mod registry;
pub mod schema;

pub use loader::DefaultConfig;
pub use registry::{DeleteOutcome, VerticalDraft, VerticalPatch, VerticalRegistry};
pub use schema::{FieldKind, FieldType, SchemaField, Vertical};
