//! Error types for the schema and template engine
//!
//! Errors are classified by recoverability:
//! - Recoverable: invalid configuration or a stale reference the operator can correct
//! - Persistence: failures reported by the storage collaborator, passed through unchanged

use thiserror::Error;

use crate::db::DbError;

/// Error types for registry, template, and projection operations
#[derive(Debug, Error)]
pub enum EngineError {
    // Rejected before any persistence call
    #[error("Invalid configuration: {}", .0.join("; "))]
    ConfigValidation(Vec<String>),

    #[error("Vertical not found: {0}")]
    VerticalNotFound(String),

    #[error("Template not found: {0}")]
    TemplateNotFound(String),

    #[error("Could not allocate a unique identifier after {0} attempts")]
    IdExhausted(usize),

    #[error("Failed to parse {what}: {message}")]
    Parse { what: String, message: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // Collaborator failures
    #[error("Persistence error: {0}")]
    Persistence(#[from] DbError),
}

impl EngineError {
    /// Shorthand for a single-message validation failure.
    pub fn invalid(message: impl Into<String>) -> Self {
        EngineError::ConfigValidation(vec![message.into()])
    }

    /// Returns true if correcting the input is enough to succeed
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            EngineError::ConfigValidation(_)
                | EngineError::VerticalNotFound(_)
                | EngineError::TemplateNotFound(_)
                | EngineError::Parse { .. }
        )
    }

    /// Get a user-friendly recovery suggestion
    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            EngineError::ConfigValidation(_) => "Correct the highlighted fields and save again.",
            EngineError::VerticalNotFound(_) => {
                "The project type may have been deleted. Pick another project type."
            }
            EngineError::TemplateNotFound(_) => {
                "The template may have been deleted. Refresh the template list."
            }
            EngineError::IdExhausted(_) => "Try again. If it keeps failing, check the id source.",
            EngineError::Parse { .. } => "Check the file is valid JSON in the expected format.",
            EngineError::Io(_) => "Check file permissions and that the path exists.",
            EngineError::Persistence(_) => "The change was not saved. Check storage and retry.",
        }
    }
}

/// Serializable error representation for UI boundaries
#[derive(Debug, Clone, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EngineErrorPayload {
    pub message: String,
    pub error_type: ErrorType,
    pub recovery_suggestion: String,
    /// Individual validation messages, one per offending input.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub details: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorType {
    Validation,
    NotFound,
    Persistence,
    Internal,
}

impl From<&EngineError> for EngineErrorPayload {
    fn from(err: &EngineError) -> Self {
        let error_type = match err {
            EngineError::ConfigValidation(_) | EngineError::Parse { .. } => ErrorType::Validation,
            EngineError::VerticalNotFound(_) | EngineError::TemplateNotFound(_) => {
                ErrorType::NotFound
            }
            EngineError::Persistence(_) | EngineError::Io(_) => ErrorType::Persistence,
            EngineError::IdExhausted(_) => ErrorType::Internal,
        };
        let details = match err {
            EngineError::ConfigValidation(messages) => messages.clone(),
            _ => Vec::new(),
        };

        EngineErrorPayload {
            message: err.to_string(),
            error_type,
            recovery_suggestion: err.recovery_suggestion().to_string(),
            details,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_message_joins_details() {
        let err = EngineError::ConfigValidation(vec![
            "Label is required".to_string(),
            "Field 'package' is a select with no options".to_string(),
        ]);
        assert_eq!(
            err.to_string(),
            "Invalid configuration: Label is required; Field 'package' is a select with no options"
        );
        assert!(err.is_recoverable());
    }

    #[test]
    fn test_payload_classification() {
        let payload = EngineErrorPayload::from(&EngineError::TemplateNotFound("tpl-1".into()));
        assert_eq!(payload.error_type, ErrorType::NotFound);
        assert!(payload.details.is_empty());

        let payload = EngineErrorPayload::from(&EngineError::Persistence(DbError::Migration(
            "boom".into(),
        )));
        assert_eq!(payload.error_type, ErrorType::Persistence);
        assert!(!EngineError::Persistence(DbError::Migration("boom".into())).is_recoverable());
    }

    #[test]
    fn test_payload_carries_validation_details() {
        let err = EngineError::ConfigValidation(vec!["a".into(), "b".into()]);
        let payload = EngineErrorPayload::from(&err);
        assert_eq!(payload.error_type, ErrorType::Validation);
        assert_eq!(payload.details, vec!["a".to_string(), "b".to_string()]);
        let json = serde_json::to_value(&payload).unwrap();
        assert_eq!(json["errorType"], "validation");
    }
}
