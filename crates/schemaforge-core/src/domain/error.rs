// ============================================================================
// domain/error.rs - SCHEMA RESOLUTION ERRORS
// ============================================================================

use thiserror::Error;

/// Root domain error type.
///
/// Domain errors describe a single unit of the schema (one model, relation
/// or field) that cannot be resolved. The orchestrator reports them and moves
/// on to the next unit.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum DomainError {
    // ========================================================================
    // Validation Errors (400-level equivalent)
    // ========================================================================
    #[error("Model '{model}' has no module")]
    MissingModule { model: String },

    #[error("Unknown relation kind '{kind}' on '{relation}'")]
    UnknownRelationKind { relation: String, kind: String },

    #[error("Absolute paths not allowed: {path}")]
    AbsolutePathNotAllowed { path: String },

    // ========================================================================
    // Missing Input (recoverable, unit is skipped)
    // ========================================================================
    #[error("Relation '{relation}' ({kind}) requires '{attribute}'")]
    MissingRelationInput {
        relation: String,
        kind: &'static str,
        attribute: &'static str,
    },

    #[error("Partial field-set '{path}' not found")]
    MissingPartial { path: String },
}

impl DomainError {
    /// Get user-actionable suggestions for fixing this error.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::MissingModule { model } => vec![
                format!("Add a `module:` key to model '{}'", model),
                "Every artifact path is derived from the module name".into(),
            ],
            Self::UnknownRelationKind { relation, kind } if kind.is_empty() => vec![
                format!("Add a `type:` key to relation '{}'", relation),
                "Only this relation is skipped; the rest of the model is generated".into(),
            ],
            Self::UnknownRelationKind { kind, .. } => vec![
                format!("'{}' is not a supported relation kind", kind),
                "Supported kinds: belongsTo, hasOne, hasMany, belongsToMany, morphTo, \
                 morphOne, morphMany, morphToMany, morphedByMany, hasOneThrough, hasManyThrough"
                    .into(),
            ],
            Self::MissingRelationInput {
                relation,
                attribute,
                ..
            } => vec![format!(
                "Declare `{}` on relation '{}' in the schema",
                attribute, relation
            )],
            Self::MissingPartial { path } => vec![
                format!("Create '{}' under the module's Data directory", path),
                "Partials are YAML or JSON mappings of field name to definition".into(),
            ],
            _ => vec!["See documentation for more details".into()],
        }
    }

    /// Error category for CLI display styling.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::MissingModule { .. }
            | Self::UnknownRelationKind { .. }
            | Self::AbsolutePathNotAllowed { .. } => ErrorCategory::Validation,
            Self::MissingRelationInput { .. } | Self::MissingPartial { .. } => {
                ErrorCategory::MissingInput
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Validation,
    MissingInput,
    NotFound,
    Internal,
}
