pub mod artifact;
pub mod common;
pub mod schema;
pub mod stub;

pub use crate::domain::DomainError;
pub use artifact::{ArtifactKind, GeneratedArtifact, WritePolicy};
pub use common::RelativePath;
pub use schema::{
    FieldDeclaration, ForeignKeySpec, MenuSection, ModelRecord, Modifiers, RelationDeclaration,
    Schema, SubmenuItem,
};
pub use stub::{StubContext, StubKind};
