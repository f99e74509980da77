//! Flags accepted before or after any subcommand.

use clap::Args;
use std::path::PathBuf;

#[derive(Debug, Args)]
pub struct GlobalArgs {
    /// Log more on stderr; `-v` also lists files left untouched by `generate`.
    #[arg(
        short = 'v',
        long = "verbose",
        action = clap::ArgAction::Count,
        global = true,
        help = "More diagnostics (-v, -vv, -vvv)",
        long_help = "Diagnostics written to stderr:
    (none)  - warnings and errors
    -v      - one line per model and stage; skipped files are listed
    -vv     - resolver decisions (paths, stubs, fragments)
    -vvv    - everything"
    )]
    pub verbose: u8,

    /// Only failures are printed.
    #[arg(
        short = 'q',
        long = "quiet",
        global = true,
        conflicts_with = "verbose",
        help = "Print failures only"
    )]
    pub quiet: bool,

    /// Plain terminal output. Also set by `NO_COLOR`.
    #[arg(
        long = "no-color",
        global = true,
        env = "NO_COLOR",
        help = "Disable colored output"
    )]
    pub no_color: bool,

    /// Read settings from this TOML file instead of the platform and
    /// `.schemaforge.toml` locations.
    #[arg(
        short = 'c',
        long = "config",
        global = true,
        value_name = "FILE",
        help = "Settings file (TOML)"
    )]
    pub config: Option<PathBuf>,

    /// `json` prints the generation report as a single JSON document.
    #[arg(
        long = "output-format",
        global = true,
        value_enum,
        default_value = "auto",
        help = "Report format"
    )]
    pub output_format: OutputFormat,
}

/// Report rendering on stdout.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// `human` on a terminal, `plain` when piped.
    #[default]
    Auto,
    /// Coloured lines with status glyphs.
    Human,
    Plain,
    /// The `GenerationReport` as JSON; diagnostics become JSON lines on stderr.
    Json,
}
