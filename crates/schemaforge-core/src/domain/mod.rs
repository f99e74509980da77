//! Core domain layer for SchemaForge.
//!
//! Pure resolution logic: the schema model, naming conventions, and the
//! resolvers that turn declarations into PHP fragments. Nothing here touches
//! the filesystem or the clock; those concerns sit behind the ports in the
//! application layer.
//!
//! ## Resolvers
//!
//! - [`type_resolver`]: logical type → storage, UI and cast types
//! - [`columns`]: field → migration column and index statements
//! - [`relations`]: relation → accessor shape, method source and pivot plan
//! - [`field_metadata`]: model → `fieldDefinitions` for the UI layer
//! - [`php`]: PHP array literals, both ways
pub mod columns;
pub mod entities;
pub mod error;
pub mod field_metadata;
pub mod naming;
pub mod php;
pub mod relations;
pub mod type_resolver;
pub mod value_objects;

pub use entities::{
    ArtifactKind, FieldDeclaration, ForeignKeySpec, GeneratedArtifact, MenuSection, ModelRecord,
    Modifiers, RelationDeclaration, RelativePath, Schema, StubContext, StubKind, SubmenuItem,
    WritePolicy,
};
pub use error::{DomainError, ErrorCategory};
pub use field_metadata::{FieldMetadata, build_field_metadata};
pub use relations::{AccessorKeys, AccessorShape, ClassRef, PivotPlan, build_relation_accessor, pivot_plan};
pub use value_objects::{ConfigMap, ConfigValue, ForeignAction, RelationKind};
