//! Implementation of the `schemaforge generate` command.
//!
//! Responsibility: resolve paths and options from flags and config, wire the
//! adapters into a `GenerationService`, and display the report. No
//! generation logic lives here.

use std::path::Path;

use tracing::{debug, info, instrument};

use schemaforge_adapters::{
    LocalFilesystem, ModuleFragmentLoader, ModuleStubStore, SystemClock, TracingReporter,
    YamlSchemaLoader,
};
use schemaforge_core::{
    application::{
        GenerateOptions, GenerationReport, GenerationService,
        ports::{Reporter, SchemaLoader},
    },
    domain::Schema,
};

use crate::{
    cli::{GenerateArgs, GlobalArgs, OutputFormat},
    config::AppConfig,
    error::{CliError, CliResult, IntoCli},
    output::OutputManager,
    reporter::ConsoleReporter,
};

/// Execute the `schemaforge generate` command.
///
/// 1. Check the schema path and load the document
/// 2. Resolve the output root (flag, then `generation.output_root`)
/// 3. Run every generator through `GenerationService`
/// 4. Print the summary (or the JSON report)
#[instrument(skip_all, fields(schema = %args.schema.display()))]
pub fn execute(
    args: GenerateArgs,
    global: GlobalArgs,
    config: AppConfig,
    output: OutputManager,
) -> CliResult<()> {
    if !args.schema.is_file() {
        return Err(CliError::SchemaNotFound { path: args.schema });
    }
    let schema = YamlSchemaLoader::new().load(&args.schema)?;

    let root = args
        .root
        .clone()
        .unwrap_or_else(|| config.generation.output_root.clone());
    prepare_root(&root, args.dry_run)?;

    let options = GenerateOptions {
        force: args.force || config.generation.force,
        dry_run: args.dry_run,
        menus: config.generation.menus && !args.no_menus,
        models: args.models,
    };
    debug!(root = %root.display(), ?options, "Options resolved");

    if output.format() != OutputFormat::Json {
        output.header(&format!(
            "Generating {} model(s) into {}{}",
            selected(&schema, &options),
            root.display(),
            if options.dry_run { " (dry run)" } else { "" },
        ))?;
    }

    let verbose = global.verbose > 0;
    let report = run(&schema, &options, &root, &output, verbose)?;
    info!(
        run_id = %report.run_id,
        written = report.written.len(),
        failures = report.failures.len(),
        "Generate finished"
    );

    show_report(&report, &output, verbose)?;
    if report.is_success() {
        Ok(())
    } else {
        Err(CliError::GenerationIncomplete {
            failures: report.failures.len(),
        })
    }
}

fn run(
    schema: &Schema,
    options: &GenerateOptions,
    root: &Path,
    output: &OutputManager,
    list_skipped: bool,
) -> CliResult<GenerationReport> {
    // JSON keeps stdout clean for the report.
    let reporter: Box<dyn Reporter> = if output.format() == OutputFormat::Json {
        Box::new(TracingReporter)
    } else {
        Box::new(ConsoleReporter::new(output.clone(), list_skipped))
    };

    let service = GenerationService::new(
        Box::new(LocalFilesystem::new(root)),
        Box::new(ModuleStubStore::new(LocalFilesystem::new(root))),
        Box::new(ModuleFragmentLoader::new(LocalFilesystem::new(root))),
        reporter,
        Box::new(SystemClock),
    );
    service
        .generate(schema, options)
        .with_cli_context(|| "generation failed")
}

/// The root must exist before any relative path resolves against it.
fn prepare_root(root: &Path, dry_run: bool) -> CliResult<()> {
    if root.is_dir() {
        return Ok(());
    }
    if root.exists() {
        return Err(CliError::InvalidInput {
            message: format!("Output root '{}' is not a directory", root.display()),
            source: None,
        });
    }
    if dry_run {
        return Ok(());
    }
    std::fs::create_dir_all(root)
        .with_cli_context(|| format!("Failed to create output root '{}'", root.display()))
}

fn selected(schema: &Schema, options: &GenerateOptions) -> usize {
    if options.models.is_empty() {
        schema.models.len()
    } else {
        options.models.len()
    }
}

fn show_report(report: &GenerationReport, output: &OutputManager, verbose: bool) -> CliResult<()> {
    if output.format() == OutputFormat::Json {
        output.json(report)?;
        return Ok(());
    }

    for failure in &report.failures {
        output.error(&format!(
            "{} [{}]: {}",
            failure.model, failure.stage, failure.message
        ))?;
    }

    if !report.skipped.is_empty() && !verbose {
        output.detail("Existing files were left untouched (-v lists them)")?;
    }

    let verb = if report.dry_run { "would write" } else { "written" };
    let summary = format!(
        "{} file(s) {verb}, {} skipped, {} warning(s)",
        report.written.len(),
        report.skipped.len(),
        report.warnings.len(),
    );
    if report.is_success() {
        output.success(&summary)?;
    } else {
        output.warning(&summary)?;
    }
    Ok(())
}
