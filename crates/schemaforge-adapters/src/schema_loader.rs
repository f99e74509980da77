//! Schema document loading.

use std::path::Path;

use tracing::{info, instrument};

use schemaforge_core::{
    application::{ApplicationError, ports::SchemaLoader},
    domain::Schema,
    error::ForgeResult,
};

/// Reads a YAML schema from disk.
#[derive(Debug, Clone, Copy, Default)]
pub struct YamlSchemaLoader;

impl YamlSchemaLoader {
    pub fn new() -> Self {
        Self
    }

    /// Parse an in-memory document; `origin` only labels errors.
    pub fn parse(source: &str, origin: &Path) -> ForgeResult<Schema> {
        if source.trim().is_empty() {
            return Err(ApplicationError::SchemaLoad {
                path: origin.to_path_buf(),
                reason: "document is empty".into(),
            }
            .into());
        }
        serde_yaml::from_str(source).map_err(|e| {
            ApplicationError::SchemaLoad {
                path: origin.to_path_buf(),
                reason: e.to_string(),
            }
            .into()
        })
    }
}

impl SchemaLoader for YamlSchemaLoader {
    #[instrument(skip(self), fields(path = %path.display()))]
    fn load(&self, path: &Path) -> ForgeResult<Schema> {
        let source = std::fs::read_to_string(path).map_err(|e| ApplicationError::SchemaLoad {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        let schema = Self::parse(&source, path)?;
        info!(models = schema.models.len(), "Schema loaded");
        Ok(schema)
    }
}
