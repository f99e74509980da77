//! Generation Service - main application orchestrator.
//!
//! For every model, in declaration order:
//! 1. Main migration, then pivot migrations
//! 2. Model class
//! 3. Config file
//! 4. Sidebar, top bar and bottom bar entries
//!
//! A unit that fails is recorded and reported; the run moves on to the next
//! unit. Only a bad `--model` selection stops the run before it starts.

use std::sync::Mutex;

use serde::Serialize;
use tracing::{error, info, instrument, warn};
use uuid::Uuid;

use crate::{
    application::{
        ApplicationError,
        ports::{Clock, Filesystem, FragmentLoader, Reporter, StubStore},
        sequencing::MigrationPaths,
        services::{
            config_generator::ConfigGenerator,
            menu_generator::{MenuGenerator, MenuKind, MenuOutcome},
            migration_generator::MigrationGenerator,
            model_generator::ModelGenerator,
        },
    },
    domain::{ArtifactKind, GeneratedArtifact, ModelRecord, RelativePath, Schema, WritePolicy},
    error::{ForgeError, ForgeResult},
};

/// Knobs for one run.
#[derive(Debug, Clone)]
pub struct GenerateOptions {
    /// Overwrite existing migrations, models and configs for every model.
    pub force: bool,
    /// Render everything, write nothing.
    pub dry_run: bool,
    pub menus: bool,
    /// Restrict the run to these models. Empty means all.
    pub models: Vec<String>,
}

impl Default for GenerateOptions {
    fn default() -> Self {
        Self {
            force: false,
            dry_run: false,
            menus: true,
            models: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WrittenFile {
    pub model: String,
    pub kind: ArtifactKind,
    pub path: String,
    pub bytes: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedFile {
    pub model: String,
    pub kind: ArtifactKind,
    pub path: String,
    pub reason: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    pub model: String,
    /// Which step produced it: `schema`, `migration`, `model`, `config`, `menu`.
    pub stage: String,
    pub message: String,
}

/// Everything a run did.
#[derive(Debug, Clone, Serialize)]
pub struct GenerationReport {
    pub run_id: Uuid,
    pub dry_run: bool,
    pub models: usize,
    pub written: Vec<WrittenFile>,
    pub skipped: Vec<SkippedFile>,
    pub warnings: Vec<Diagnostic>,
    pub failures: Vec<Diagnostic>,
}

impl GenerationReport {
    fn new(dry_run: bool) -> Self {
        Self {
            run_id: Uuid::new_v4(),
            dry_run,
            models: 0,
            written: Vec::new(),
            skipped: Vec::new(),
            warnings: Vec::new(),
            failures: Vec::new(),
        }
    }

    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Main generation service.
pub struct GenerationService {
    filesystem: Box<dyn Filesystem>,
    stubs: Box<dyn StubStore>,
    fragments: Box<dyn FragmentLoader>,
    reporter: Box<dyn Reporter>,
    clock: Box<dyn Clock>,
}

impl GenerationService {
    /// Create a new generation service with the given adapters.
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// use schemaforge_core::application::GenerationService;
    ///
    /// let service = GenerationService::new(
    ///     filesystem, // impl Filesystem
    ///     stubs,      // impl StubStore
    ///     fragments,  // impl FragmentLoader
    ///     reporter,   // impl Reporter
    ///     clock,      // impl Clock
    /// );
    /// ```
    pub fn new(
        filesystem: Box<dyn Filesystem>,
        stubs: Box<dyn StubStore>,
        fragments: Box<dyn FragmentLoader>,
        reporter: Box<dyn Reporter>,
        clock: Box<dyn Clock>,
    ) -> Self {
        Self {
            filesystem,
            stubs,
            fragments,
            reporter,
            clock,
        }
    }

    /// Generate every artifact the schema describes.
    #[instrument(
        skip_all,
        fields(
            run_id = tracing::field::Empty,
            models = schema.models.len(),
            dry_run = options.dry_run
        )
    )]
    pub fn generate(&self, schema: &Schema, options: &GenerateOptions) -> ForgeResult<GenerationReport> {
        for name in &options.models {
            if schema.model(name).is_none() {
                return Err(ApplicationError::UnknownModel { name: name.clone() }.into());
            }
        }

        let mut report = GenerationReport::new(options.dry_run);
        tracing::Span::current().record("run_id", tracing::field::display(report.run_id));
        info!("Generating from schema");

        let recorder = RecordingReporter::new(self.reporter.as_ref());
        let mut paths = MigrationPaths::new(self.filesystem.as_ref(), self.clock.as_ref());

        for (name, model) in &schema.models {
            if !options.models.is_empty() && !options.models.contains(name) {
                continue;
            }
            report.models += 1;
            let run = ModelRun {
                service: self,
                reporter: &recorder,
                options,
                name,
                model,
            };
            run.execute(&mut paths, &mut report);
        }

        report.warnings = recorder.into_warnings();
        info!(
            written = report.written.len(),
            skipped = report.skipped.len(),
            warnings = report.warnings.len(),
            failures = report.failures.len(),
            "Generation finished"
        );
        Ok(report)
    }

    // -------------------------------------------------------------------------
    // Internal Helpers
    // -------------------------------------------------------------------------

    /// Write an artifact unless the policy says to leave an existing file.
    fn materialize(
        &self,
        reporter: &dyn Reporter,
        model: &str,
        artifact: GeneratedArtifact,
        dry_run: bool,
        report: &mut GenerationReport,
    ) -> ForgeResult<()> {
        let path = artifact.path.as_path();
        if artifact.policy == WritePolicy::CreateOnly && self.filesystem.exists(path) {
            let reason = "already exists; set `override: true` or pass --force";
            reporter.skipped(artifact.kind, &artifact.path, reason);
            report.skipped.push(SkippedFile {
                model: model.to_string(),
                kind: artifact.kind,
                path: artifact.path.to_string(),
                reason: reason.into(),
            });
            return Ok(());
        }

        if !dry_run {
            if let Some(parent) = path.parent() {
                self.filesystem.create_dir_all(parent)?;
            }
            self.filesystem.write_file(path, &artifact.content)?;
        }

        reporter.written(artifact.kind, &artifact.path);
        report.written.push(WrittenFile {
            model: model.to_string(),
            kind: artifact.kind,
            path: artifact.path.to_string(),
            bytes: artifact.size(),
        });
        Ok(())
    }
}

/// One model's pass through the generators.
struct ModelRun<'a> {
    service: &'a GenerationService,
    reporter: &'a RecordingReporter<'a>,
    options: &'a GenerateOptions,
    name: &'a str,
    model: &'a ModelRecord,
}

impl ModelRun<'_> {
    #[instrument(skip_all, fields(model = self.name))]
    fn execute(&self, paths: &mut MigrationPaths<'_>, report: &mut GenerationReport) {
        let module = match self.model.require_module(self.name) {
            Ok(module) => module,
            Err(e) => {
                self.reporter.warning(self.name, &e.to_string());
                self.fail(report, "schema", &e.into());
                return;
            }
        };
        let overwrite = self.model.override_existing || self.options.force;
        let stubs = self.service.stubs.as_ref();

        let migrations = MigrationGenerator::new(stubs, self.reporter);
        let main = migrations.generate_main(paths, self.name, module, self.model);
        self.write(report, "migration", main.map(|a| a.overwriting(overwrite)));
        let (pivots, pivot_failures) = migrations.generate_pivots(paths, self.name, module, self.model);
        for pivot in pivots {
            self.write(report, "migration", Ok(pivot.overwriting(overwrite)));
        }
        for e in pivot_failures {
            self.fail(report, "migration", &e);
        }

        let model = ModelGenerator::new(stubs, self.reporter).generate(self.name, module, self.model);
        self.write(report, "model", model.map(|a| a.overwriting(overwrite)));

        let config = ConfigGenerator::new(self.service.fragments.as_ref(), self.reporter)
            .generate(self.name, module, self.model);
        self.write(report, "config", config.map(|a| a.overwriting(overwrite)));

        if self.options.menus {
            let menus = MenuGenerator::new(self.service.filesystem.as_ref());
            for menu in MenuKind::ALL {
                match menus.generate(menu, self.name, module, self.model) {
                    Ok(MenuOutcome::Updated(artifact)) => self.write(report, "menu", Ok(artifact)),
                    Ok(MenuOutcome::AlreadyPresent(path)) => self.skip_menu(report, &path),
                    Ok(MenuOutcome::Disabled) => {}
                    Err(e) => self.fail(report, "menu", &e),
                }
            }
        }
    }

    fn write(&self, report: &mut GenerationReport, stage: &str, artifact: ForgeResult<GeneratedArtifact>) {
        let result = artifact.and_then(|artifact| {
            self.service
                .materialize(self.reporter, self.name, artifact, self.options.dry_run, report)
        });
        if let Err(e) = result {
            self.fail(report, stage, &e);
        }
    }

    fn skip_menu(&self, report: &mut GenerationReport, path: &RelativePath) {
        let reason = "entry already present";
        self.reporter.skipped(ArtifactKind::Menu, path, reason);
        report.skipped.push(SkippedFile {
            model: self.name.to_string(),
            kind: ArtifactKind::Menu,
            path: path.to_string(),
            reason: reason.into(),
        });
    }

    fn fail(&self, report: &mut GenerationReport, stage: &str, error: &ForgeError) {
        if error.is_recoverable() {
            warn!(model = self.name, stage, error = %error, "Unit failed");
        } else {
            error!(model = self.name, stage, error = %error, "Unit failed");
        }
        report.failures.push(Diagnostic {
            model: self.name.to_string(),
            stage: stage.to_string(),
            message: error.to_string(),
        });
    }
}

/// Forwards to the user's reporter and keeps the warnings for the report.
struct RecordingReporter<'a> {
    inner: &'a dyn Reporter,
    warnings: Mutex<Vec<Diagnostic>>,
}

impl<'a> RecordingReporter<'a> {
    fn new(inner: &'a dyn Reporter) -> Self {
        Self {
            inner,
            warnings: Mutex::new(Vec::new()),
        }
    }

    fn into_warnings(self) -> Vec<Diagnostic> {
        self.warnings
            .into_inner()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl Reporter for RecordingReporter<'_> {
    fn written(&self, kind: ArtifactKind, path: &RelativePath) {
        self.inner.written(kind, path);
    }

    fn skipped(&self, kind: ArtifactKind, path: &RelativePath, reason: &str) {
        self.inner.skipped(kind, path, reason);
    }

    fn warning(&self, model: &str, message: &str) {
        self.inner.warning(model, message);
        let diagnostic = Diagnostic {
            model: model.to_string(),
            stage: "resolve".into(),
            message: message.to_string(),
        };
        match self.warnings.lock() {
            Ok(mut warnings) => warnings.push(diagnostic),
            Err(poisoned) => poisoned.into_inner().push(diagnostic),
        }
    }
}
