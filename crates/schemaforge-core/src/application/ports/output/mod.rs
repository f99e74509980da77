//! Driven (output) ports - implemented by infrastructure.
//!
//! These traits define what generation needs from the outside world. The
//! `schemaforge-adapters` crate provides implementations.

use std::path::Path;

use chrono::NaiveDateTime;

use crate::domain::{ArtifactKind, ConfigMap, RelativePath, Schema, StubKind};
use crate::error::ForgeResult;

/// Port for filesystem operations.
///
/// Every path is relative to the output root the adapter was built with.
///
/// Implemented by:
/// - `schemaforge_adapters::filesystem::LocalFilesystem` (production)
/// - `schemaforge_adapters::filesystem::MemoryFilesystem` (testing, dry runs)
pub trait Filesystem: Send + Sync {
    /// Create a directory and all parent directories.
    fn create_dir_all(&self, path: &Path) -> ForgeResult<()>;

    /// Write content to a file, replacing it if present.
    fn write_file(&self, path: &Path, content: &str) -> ForgeResult<()>;

    fn read_file(&self, path: &Path) -> ForgeResult<String>;

    /// File names directly inside `path`, sorted. A missing directory is empty.
    fn list_dir(&self, path: &Path) -> ForgeResult<Vec<String>>;

    /// Check if path exists.
    fn exists(&self, path: &Path) -> bool;
}

/// Port for stub lookup.
///
/// Implementations search the module override locations of
/// [`StubKind::override_paths`] before their built-in stubs.
pub trait StubStore: Send + Sync {
    /// Stub text for `kind` when generating `model` in `module`.
    ///
    /// Fails with `ApplicationError::StubNotFound` when no candidate exists.
    fn load(&self, kind: StubKind, module: &str, model: &str) -> ForgeResult<String>;
}

/// Port for partial field-sets and config includes.
pub trait FragmentLoader: Send + Sync {
    /// Load `Modules/{Module}/Data/{path}`.
    ///
    /// `Ok(None)` when the fragment does not exist.
    fn load_fragment(&self, module: &str, path: &str) -> ForgeResult<Option<ConfigMap>>;
}

/// Port for reading the schema document.
pub trait SchemaLoader: Send + Sync {
    fn load(&self, path: &Path) -> ForgeResult<Schema>;
}

/// Port for progress and diagnostics during a run.
///
/// Generators never log user-facing outcomes themselves; everything the user
/// should see goes through here.
#[cfg_attr(test, mockall::automock)]
pub trait Reporter: Send + Sync {
    fn written(&self, kind: ArtifactKind, path: &RelativePath);

    /// An artifact was left alone, e.g. the file exists and override is off.
    fn skipped(&self, kind: ArtifactKind, path: &RelativePath, reason: &str);

    /// A unit of `model` could not be generated; the run continues.
    fn warning(&self, model: &str, message: &str);
}

/// Port for the wall clock. Only migration sequencing reads it.
#[cfg_attr(test, mockall::automock)]
pub trait Clock: Send + Sync {
    fn now(&self) -> NaiveDateTime;
}
