//! Unified error handling for SchemaForge Core.
//!
//! Wraps domain and application errors behind one type with
//! user-actionable suggestions and a display category.

use thiserror::Error;

use crate::application::ApplicationError;
use crate::domain::DomainError;

/// Root error type for SchemaForge Core operations.
#[derive(Debug, Error, Clone)]
pub enum ForgeError {
    /// A schema unit that cannot be resolved.
    #[error("Schema error: {0}")]
    Domain(#[from] DomainError),

    /// Orchestration, stub or filesystem failures.
    #[error("Generation error: {0}")]
    Application(#[from] ApplicationError),
}

impl ForgeError {
    /// Get user-actionable suggestions for fixing this error.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::Domain(e) => e.suggestions(),
            Self::Application(e) => e.suggestions(),
        }
    }

    /// Get error category for display/styling purposes.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Domain(e) => match e.category() {
                crate::domain::ErrorCategory::Validation => ErrorCategory::Validation,
                crate::domain::ErrorCategory::MissingInput => ErrorCategory::MissingInput,
                crate::domain::ErrorCategory::NotFound => ErrorCategory::NotFound,
                crate::domain::ErrorCategory::Internal => ErrorCategory::Internal,
            },
            Self::Application(e) => e.category(),
        }
    }

    /// Whether the run can continue with the next unit after this error.
    pub fn is_recoverable(&self) -> bool {
        match self {
            Self::Domain(_) => true,
            Self::Application(e) => e.is_recoverable(),
        }
    }
}

/// Error categories for UI display.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Validation,
    MissingInput,
    NotFound,
    Internal,
}

/// Convenient result type alias.
pub type ForgeResult<T> = Result<T, ForgeError>;
