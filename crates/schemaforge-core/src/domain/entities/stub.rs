//! Stub kinds and placeholder substitution.
//!
//! A stub is the textual skeleton of a generated file. Placeholders are
//! written `{{name}}`; unknown placeholders are left as-is so that a stub
//! authored for a newer version still renders.

use std::fmt;

use indexmap::IndexMap;

use crate::domain::{entities::common::RelativePath, error::DomainError};

/// The stubs the generators ask for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StubKind {
    Migration,
    PivotMigration,
    PolymorphicPivotMigration,
    Model,
}

impl StubKind {
    pub const ALL: [StubKind; 4] = [
        Self::Migration,
        Self::PivotMigration,
        Self::PolymorphicPivotMigration,
        Self::Model,
    ];

    /// File name of the built-in stub.
    pub const fn file_name(&self) -> &'static str {
        match self {
            Self::Migration => "migration.stub",
            Self::PivotMigration => "pivot_migration.stub",
            Self::PolymorphicPivotMigration => "polymorphic_pivot_migration.stub",
            Self::Model => "model.stub",
        }
    }

    /// Module-level override candidates, most specific first.
    ///
    /// Pivot stubs cannot be overridden per module.
    pub fn override_paths(&self, module: &str, model: &str) -> Result<Vec<RelativePath>, DomainError> {
        let stubs = RelativePath::module_dir(module)?.join("Stubs")?;
        Ok(match self {
            Self::Migration => vec![
                stubs
                    .join("Database")?
                    .join("Migrations")?
                    .join(format!("{model}.stub"))?,
            ],
            Self::Model => {
                let models = stubs.join("Models")?;
                vec![models.join(format!("{model}.stub"))?, models.join("model.stub")?]
            }
            Self::PivotMigration | Self::PolymorphicPivotMigration => Vec::new(),
        })
    }
}

impl fmt::Display for StubKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.file_name())
    }
}

/// Placeholder values for one stub rendering.
///
/// Insertion order is kept so rendering is deterministic even when one value
/// happens to contain another placeholder.
#[derive(Debug, Clone, Default)]
pub struct StubContext {
    values: IndexMap<String, String>,
}

impl StubContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.values.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    /// Replace every `{{key}}` with its value in a single left-to-right scan.
    ///
    /// Substituted text is never rescanned.
    pub fn render(&self, stub: &str) -> String {
        let mut out = String::with_capacity(stub.len());
        let mut rest = stub;
        while let Some(start) = rest.find("{{") {
            out.push_str(&rest[..start]);
            let after = &rest[start + 2..];
            match after.find("}}") {
                Some(end) if self.values.contains_key(&after[..end]) => {
                    out.push_str(&self.values[&after[..end]]);
                    rest = &after[end + 2..];
                }
                _ => {
                    out.push_str("{{");
                    rest = after;
                }
            }
        }
        out.push_str(rest);
        out
    }
}

/// Every location searched for a stub, for error messages.
pub fn describe_candidates(kind: StubKind, candidates: &[RelativePath]) -> String {
    let mut names: Vec<String> = candidates.iter().map(ToString::to_string).collect();
    names.push(format!("<built-in>/{}", kind.file_name()));
    names.join(", ")
}
