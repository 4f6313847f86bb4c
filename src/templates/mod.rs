//! Reusable event/deliverable templates and their instantiation into projects.

pub mod engine;
pub mod ids;
pub mod model;

pub use engine::{instantiate, EventTemplateEngine};
pub use ids::{IdGenerator, SequentialIdGenerator, UuidIdGenerator};
pub use model::{Instantiation, SkippedBlueprint, Template, TemplateDraft, TemplateFilter, TemplatePatch};
