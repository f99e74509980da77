//! Infrastructure adapters for SchemaForge.
//!
//! This crate implements the ports defined in
//! `schemaforge_core::application::ports`. It contains all I/O: the disk,
//! the stubs shipped with the binary, fragment and schema parsing, and the
//! wall clock.

pub mod clock;
pub mod filesystem;
pub mod fragment_loader;
pub mod reporter;
pub mod schema_loader;
pub mod stub_store;

// Re-export commonly used adapters
pub use clock::{FixedClock, SystemClock};
pub use filesystem::{LocalFilesystem, MemoryFilesystem};
pub use fragment_loader::ModuleFragmentLoader;
pub use reporter::TracingReporter;
pub use schema_loader::YamlSchemaLoader;
pub use stub_store::{BuiltinStubs, ModuleStubStore};
