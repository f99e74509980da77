//! Schemaforge Core - Hexagonal Architecture Implementation
//!
//! This crate turns a YAML schema of models into Laravel module artifacts:
//! create-table migrations, pivot migrations, Eloquent model classes, model
//! config arrays and menu entries.
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │        schemaforge-cli (CLI)            │
//! └──────────────────┬──────────────────────┘
//!                    │ calls
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │         Application Services            │
//! │  (GenerationService, per-kind gens)     │
//! └──────────────────┬──────────────────────┘
//!                    │ uses
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │      Application Ports (Traits)         │
//! │ (Filesystem, StubStore, Reporter, ...)  │
//! └──────────────────┬──────────────────────┘
//!                    │ implemented by
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │     schemaforge-adapters (Infra)        │
//! └─────────────────────────────────────────┘
//!                    │
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │         Domain Layer (Pure Logic)       │
//! │ (naming, columns, relations, php, ...)  │
//! └─────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use schemaforge_core::prelude::*;
//!
//! let schema = schema_loader.load(Path::new("schema.yaml"))?;
//! let service = GenerationService::new(filesystem, stubs, fragments, reporter, clock);
//! let report = service.generate(&schema, &GenerateOptions::default())?;
//! ```

pub mod domain;

pub mod application;

pub mod error;

// Public API - what external crates should use
pub mod prelude {
    pub use crate::application::{
        ApplicationError, GenerateOptions, GenerationReport, GenerationService,
        ports::{Clock, Filesystem, FragmentLoader, Reporter, SchemaLoader, StubStore},
    };
    pub use crate::domain::{
        ArtifactKind, ConfigMap, ConfigValue, GeneratedArtifact, ModelRecord, RelativePath,
        Schema, StubKind,
    };
    pub use crate::error::{ForgeError, ForgeResult};
}

/// Version of the core library.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
