//! Application layer errors.
//!
//! These errors represent failures in orchestration and I/O, not schema
//! resolution. Resolution errors are `DomainError` from `crate::domain`.

use std::path::PathBuf;
use thiserror::Error;

use crate::error::ErrorCategory;

/// Errors that occur while generating artifacts.
#[derive(Debug, Error, Clone)]
pub enum ApplicationError {
    /// No stub found at any candidate location.
    #[error("Stub not found: {path}")]
    StubNotFound { path: String },

    /// Filesystem operation failed.
    #[error("Filesystem error at {path}: {reason}")]
    FilesystemError { path: PathBuf, reason: String },

    /// The schema document could not be read or parsed.
    #[error("Failed to load schema {path}: {reason}")]
    SchemaLoad { path: PathBuf, reason: String },

    /// A fragment exists but is not a mapping.
    #[error("Fragment {path} is malformed: {reason}")]
    MalformedFragment { path: String, reason: String },

    /// An existing menu file is not a PHP array this tool can merge into.
    #[error("Menu file {path} could not be parsed: {reason}")]
    MalformedMenu { path: PathBuf, reason: String },

    /// `--model` named a model the schema does not declare.
    #[error("Model '{name}' is not declared in the schema")]
    UnknownModel { name: String },
}

impl ApplicationError {
    /// Get user-actionable suggestions.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::StubNotFound { path } => vec![
                format!("Searched: {}", path),
                "Place a stub under Modules/<Module>/Stubs to override the built-in one".into(),
            ],
            Self::FilesystemError { path, .. } => vec![
                format!("Failed to access: {}", path.display()),
                "Check that you have write permissions".into(),
                "Ensure the output root exists".into(),
            ],
            Self::SchemaLoad { path, .. } => vec![
                format!("Check that {} exists and is valid YAML", path.display()),
                "The document needs a top-level `models:` mapping".into(),
            ],
            Self::MalformedFragment { path, .. } => vec![
                format!("'{}' must be a YAML or JSON mapping", path),
            ],
            Self::MalformedMenu { path, .. } => vec![
                format!("{} was left untouched", path.display()),
                "Fix or remove the file and run generate again".into(),
            ],
            Self::UnknownModel { .. } => vec![
                "Model names are case-sensitive".into(),
                "Omit --model to generate every model".into(),
            ],
        }
    }

    /// Get error category.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::StubNotFound { .. } | Self::UnknownModel { .. } => ErrorCategory::NotFound,
            Self::FilesystemError { .. } => ErrorCategory::Internal,
            Self::SchemaLoad { .. } | Self::MalformedFragment { .. } | Self::MalformedMenu { .. } => {
                ErrorCategory::Validation
            }
        }
    }

    /// Failures scoped to one artifact; the run moves on to the next.
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, Self::SchemaLoad { .. } | Self::UnknownModel { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn schema_load_is_fatal() {
        let err = ApplicationError::SchemaLoad {
            path: "schema.yaml".into(),
            reason: "missing".into(),
        };
        assert!(!err.is_recoverable());
        assert_eq!(err.category(), ErrorCategory::Validation);
    }

    #[test]
    fn missing_stub_is_scoped_to_the_artifact() {
        let err = ApplicationError::StubNotFound {
            path: "<built-in>/model.stub".into(),
        };
        assert!(err.is_recoverable());
        assert_eq!(err.category(), ErrorCategory::NotFound);
        assert!(err.suggestions()[0].contains("model.stub"));
    }
}
