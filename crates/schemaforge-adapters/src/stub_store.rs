//! Stub lookup.
//!
//! # Resolution order
//!
//! 1. Module overrides under `Modules/{Module}/Stubs/`, most specific first
//!    (see [`StubKind::override_paths`]).
//! 2. The stubs compiled into the binary from `stubs/`.
//!
//! Pivot stubs have no module override.

use std::path::Path;

use tracing::{debug, instrument, warn};

use schemaforge_core::{
    application::{
        ApplicationError,
        ports::{Filesystem, StubStore},
    },
    domain::StubKind,
    error::{ForgeError, ForgeResult},
};

// ── Built-in stubs ────────────────────────────────────────────────────────────

const MIGRATION: &str = include_str!("../stubs/migration.stub");
const PIVOT_MIGRATION: &str = include_str!("../stubs/pivot_migration.stub");
const POLYMORPHIC_PIVOT_MIGRATION: &str = include_str!("../stubs/polymorphic_pivot_migration.stub");
const MODEL: &str = include_str!("../stubs/model.stub");

/// The stubs that ship with the binary.
#[derive(Debug, Clone, Copy, Default)]
pub struct BuiltinStubs;

impl BuiltinStubs {
    pub fn text(kind: StubKind) -> &'static str {
        match kind {
            StubKind::Migration => MIGRATION,
            StubKind::PivotMigration => PIVOT_MIGRATION,
            StubKind::PolymorphicPivotMigration => POLYMORPHIC_PIVOT_MIGRATION,
            StubKind::Model => MODEL,
        }
    }
}

impl StubStore for BuiltinStubs {
    fn load(&self, kind: StubKind, _module: &str, _model: &str) -> ForgeResult<String> {
        Ok(Self::text(kind).to_string())
    }
}

// ── Module overrides ──────────────────────────────────────────────────────────

/// Module overrides first, then `fallback`.
#[derive(Debug, Clone)]
pub struct ModuleStubStore<F, S = BuiltinStubs> {
    filesystem: F,
    fallback: S,
}

impl<F: Filesystem> ModuleStubStore<F> {
    pub fn new(filesystem: F) -> Self {
        Self {
            filesystem,
            fallback: BuiltinStubs,
        }
    }
}

impl<F: Filesystem, S: StubStore> ModuleStubStore<F, S> {
    pub fn with_fallback(filesystem: F, fallback: S) -> Self {
        Self {
            filesystem,
            fallback,
        }
    }
}

impl<F: Filesystem, S: StubStore> StubStore for ModuleStubStore<F, S> {
    #[instrument(skip(self), fields(stub = kind.file_name()))]
    fn load(&self, kind: StubKind, module: &str, model: &str) -> ForgeResult<String> {
        for candidate in kind.override_paths(module, model)? {
            let path: &Path = candidate.as_path();
            if !self.filesystem.exists(path) {
                continue;
            }
            let text = self.filesystem.read_file(path)?;
            if text.trim().is_empty() {
                warn!(path = %candidate, "Ignoring empty stub override");
                continue;
            }
            debug!(path = %candidate, "Using module stub");
            return Ok(text);
        }

        self.fallback.load(kind, module, model).map_err(|e| match e {
            ForgeError::Application(ApplicationError::StubNotFound { path }) => {
                ApplicationError::StubNotFound {
                    path: describe_candidates(kind, module, model, &path),
                }
                .into()
            }
            other => other,
        })
    }
}

/// `a, b or c` listing every place that was searched.
fn describe_candidates(kind: StubKind, module: &str, model: &str, fallback: &str) -> String {
    let mut searched: Vec<String> = kind
        .override_paths(module, model)
        .map(|paths| paths.iter().map(ToString::to_string).collect())
        .unwrap_or_default();
    searched.push(fallback.to_string());
    match searched.split_last() {
        Some((last, rest)) if !rest.is_empty() => format!("{} or {}", rest.join(", "), last),
        _ => searched.join(""),
    }
}
