//! Application services - one generator per artifact kind plus the
//! orchestrator that runs them model by model.

pub mod config_generator;
pub mod generation_service;
pub mod menu_generator;
pub mod migration_generator;
pub mod model_generator;

pub use config_generator::ConfigGenerator;
pub use generation_service::{
    Diagnostic, GenerateOptions, GenerationReport, GenerationService, SkippedFile, WrittenFile,
};
pub use menu_generator::{MenuGenerator, MenuKind, MenuOutcome};
pub use migration_generator::MigrationGenerator;
pub use model_generator::ModelGenerator;
