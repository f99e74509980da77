//! Diagnostics on stderr.
//!
//! Generated-file lines and the summary go to stdout through
//! [`crate::output::OutputManager`]; everything emitted with `tracing` by the
//! CLI, core and adapter crates lands here instead, so piping stdout never
//! mixes the two.
//!
//! The level comes from the flags (`-q` error, default warn, `-v` info,
//! `-vv` debug, `-vvv` trace) unless `RUST_LOG` is set. With
//! `--output-format json` each event is a JSON object.

use std::io::IsTerminal as _;

use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use crate::cli::{GlobalArgs, OutputFormat};

/// Crates whose events are shown at the flag-derived level.
const TARGETS: [&str; 3] = ["schemaforge", "schemaforge_core", "schemaforge_adapters"];

/// Install the global subscriber. Call once, before the first event.
pub fn init_logging(args: &GlobalArgs) -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(directives(level_for(args))));

    let layer = tracing_subscriber::fmt::layer()
        .with_target(false)
        .with_writer(std::io::stderr);

    let registry = tracing_subscriber::registry().with(filter);
    let installed = if args.output_format == OutputFormat::Json {
        registry.with(layer.json()).try_init()
    } else {
        let ansi = !args.no_color && std::io::stderr().is_terminal();
        registry.with(layer.with_ansi(ansi)).try_init()
    };
    installed.map_err(|e| anyhow::anyhow!("Could not install the log subscriber: {e}"))
}

/// `-q` beats any number of `-v`.
fn level_for(args: &GlobalArgs) -> &'static str {
    if args.quiet {
        return "error";
    }
    match args.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

fn directives(level: &str) -> String {
    TARGETS
        .iter()
        .map(|target| format!("{target}={level}"))
        .collect::<Vec<_>>()
        .join(",")
}
