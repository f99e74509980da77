use std::fmt;

use crate::domain::entities::common::RelativePath;

/// A rendered file ready for materialization.
///
/// This is the output of every generator. It contains no business logic,
/// only data: where the file goes, what it holds and how an existing file at
/// the same path is treated.
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratedArtifact {
    pub kind: ArtifactKind,
    pub path: RelativePath,
    pub content: String,
    pub policy: WritePolicy,
}

impl GeneratedArtifact {
    pub fn new(kind: ArtifactKind, path: RelativePath, content: impl Into<String>) -> Self {
        Self {
            kind,
            path,
            content: content.into(),
            policy: WritePolicy::CreateOnly,
        }
    }

    /// Replace an existing file at the same path.
    pub fn overwriting(mut self, overwrite: bool) -> Self {
        if overwrite {
            self.policy = WritePolicy::Overwrite;
        }
        self
    }

    pub fn size(&self) -> usize {
        self.content.len()
    }
}

/// How an existing file at the artifact path is handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WritePolicy {
    /// Leave an existing file untouched and report it as skipped.
    CreateOnly,
    /// Replace whatever is there.
    Overwrite,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ArtifactKind {
    Migration,
    PivotMigration,
    Model,
    Config,
    Menu,
}

impl ArtifactKind {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Migration => "migration",
            Self::PivotMigration => "pivot migration",
            Self::Model => "model",
            Self::Config => "config",
            Self::Menu => "menu",
        }
    }
}

impl fmt::Display for ArtifactKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
