//! Application layer.
//!
//! This layer contains:
//! - **Services**: the per-artifact generators and `GenerationService`
//! - **Ports**: traits for the filesystem, stubs, fragments, reporting and time
//! - **Sequencing**: migration file naming and ordering
//! - **Errors**: application-specific error types
//!
//! Schema rules live in `crate::domain`; this layer only wires them to I/O.

pub mod error;
pub mod ports;
pub mod sequencing;
pub mod services;

#[cfg(test)]
mod test_support;

pub use services::{GenerateOptions, GenerationReport, GenerationService};

// Re-export port traits (for adapter implementation)
pub use ports::{Clock, Filesystem, FragmentLoader, Reporter, SchemaLoader, StubStore};

pub use error::ApplicationError;
