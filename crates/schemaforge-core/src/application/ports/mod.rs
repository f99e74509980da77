//! Application ports (traits) for external dependencies.
//!
//! In hexagonal architecture, ports define interfaces that the application
//! needs from the outside world. Adapters in `schemaforge-adapters`
//! implement these.
//!
//! ## Port Types
//!
//! - **Driven (Output) Ports**: Called by application, implemented by infrastructure
//!   - `Filesystem`: File operations relative to the output root
//!   - `StubStore`: Stub lookup with module overrides
//!   - `FragmentLoader`: Partial field-sets and config includes
//!   - `SchemaLoader`: Schema document parsing
//!   - `Reporter`: Written/skipped/warning notifications
//!   - `Clock`: Wall clock for migration timestamps
//!
//! - **Driving (Input) Ports**: Called by external world, implemented by application
//!   - (Defined in CLI layer, implemented by services)

pub mod output;

pub use output::{Clock, Filesystem, FragmentLoader, Reporter, SchemaLoader, StubStore};

#[cfg(test)]
pub use output::{MockClock, MockReporter};
