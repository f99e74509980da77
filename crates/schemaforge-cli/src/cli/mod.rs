//! CLI argument definitions using the clap derive API.
//!
//! This module is the *only* place that knows about argument names, aliases,
//! help text, and value enums.  No generation logic lives here.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

pub mod global;
pub use global::{GlobalArgs, OutputFormat};

// ── Top-level CLI ─────────────────────────────────────────────────────────────

/// Main CLI entry-point.
#[derive(Debug, Parser)]
#[command(
    name    = "schemaforge",
    bin_name = "schemaforge",
    version  = env!("CARGO_PKG_VERSION"),
    author   = env!("CARGO_PKG_AUTHORS"),
    about    = "\u{26a1} Schema-driven module scaffolding",
    long_about = "SchemaForge reads a YAML schema of models and writes migrations, \
                  model classes, config arrays and menu entries into a modular \
                  application tree.",
    after_help = "EXAMPLES:\n\
        \x20 schemaforge generate schema.yaml\n\
        \x20 schemaforge generate schema.yaml --root ./app --model Order --force\n\
        \x20 schemaforge generate schema.yaml --dry-run --output-format json\n\
        \x20 schemaforge completions bash > /usr/share/bash-completion/completions/schemaforge",
    arg_required_else_help = true,
    subcommand_required    = true,
)]
pub struct Cli {
    /// Flags available on every subcommand.
    #[command(flatten)]
    pub global: GlobalArgs,

    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

// ── Subcommands ───────────────────────────────────────────────────────────────

/// All available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Generate artifacts from a schema.
    #[command(
        visible_alias = "g",
        about = "Generate migrations, models, configs and menus",
        after_help = "EXAMPLES:\n\
            \x20 schemaforge generate schema.yaml\n\
            \x20 schemaforge generate schema.yaml --model Order --model OrderItem\n\
            \x20 schemaforge generate schema.yaml --no-menus --force"
    )]
    Generate(GenerateArgs),

    /// Initialise a SchemaForge configuration file.
    #[command(
        about = "Initialise configuration",
        after_help = "EXAMPLES:\n\
            \x20 schemaforge init           # platform config directory\n\
            \x20 schemaforge init --local   # .schemaforge.toml in CWD"
    )]
    Init(InitArgs),

    /// Generate shell completion scripts.
    #[command(
        about = "Generate shell completions",
        after_help = "EXAMPLES:\n\
            \x20 schemaforge completions bash > ~/.local/share/bash-completion/completions/schemaforge\n\
            \x20 schemaforge completions zsh  > ~/.zfunc/_schemaforge\n\
            \x20 schemaforge completions fish > ~/.config/fish/completions/schemaforge.fish"
    )]
    Completions(CompletionsArgs),

    /// Inspect the SchemaForge configuration.
    #[command(
        about = "Configuration management",
        subcommand,
        after_help = "EXAMPLES:\n\
            \x20 schemaforge config get generation.output_root\n\
            \x20 schemaforge config list\n\
            \x20 schemaforge config path"
    )]
    Config(ConfigCommands),
}

// ── generate ──────────────────────────────────────────────────────────────────

/// Arguments for `schemaforge generate`.
#[derive(Debug, Args)]
pub struct GenerateArgs {
    /// Schema document (YAML).
    #[arg(value_name = "SCHEMA", help = "Path to the schema file")]
    pub schema: PathBuf,

    /// Application directory that holds `Modules/`.
    #[arg(
        short = 'r',
        long = "root",
        value_name = "DIR",
        help = "Output root (default: generation.output_root)"
    )]
    pub root: Option<PathBuf>,

    /// Only generate these models.  Repeatable.
    #[arg(
        short = 'm',
        long = "model",
        value_name = "NAME",
        help = "Restrict generation to a model (repeatable)"
    )]
    pub models: Vec<String>,

    /// Overwrite existing migrations, models and configs.
    #[arg(short = 'f', long = "force", help = "Overwrite existing files")]
    pub force: bool,

    /// Preview what would be written without touching the disk.
    #[arg(long = "dry-run", help = "Show what would be written without writing")]
    pub dry_run: bool,

    /// Leave sidebar, top bar and bottom bar files alone.
    #[arg(long = "no-menus", help = "Skip menu entries")]
    pub no_menus: bool,
}

// ── init ──────────────────────────────────────────────────────────────────────

/// Arguments for `schemaforge init`.
#[derive(Debug, Args)]
pub struct InitArgs {
    /// Write to `.schemaforge.toml` in the current directory.
    #[arg(
        long = "local",
        help = "Create local configuration in current directory"
    )]
    pub local: bool,

    /// Overwrite an existing config file.
    #[arg(short = 'f', long = "force", help = "Overwrite existing configuration")]
    pub force: bool,
}

// ── completions ───────────────────────────────────────────────────────────────

/// Arguments for `schemaforge completions`.
#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Target shell.
    #[arg(value_enum, help = "Shell to generate completions for")]
    pub shell: Shell,
}

/// Supported shells for completion generation.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
    Elvish,
}

// ── config subcommands ────────────────────────────────────────────────────────

/// Subcommands for `schemaforge config`.
#[derive(Debug, Subcommand)]
pub enum ConfigCommands {
    /// Print the value of a configuration key.
    Get {
        /// Dotted key path, e.g. `generation.output_root`.
        key: String,
    },
    /// Print all configuration values.
    List,
    /// Print the path to the default configuration file.
    Path,
}

// ── tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use clap::{CommandFactory, Parser};

    #[test]
    fn verify_cli_structure() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parse_generate_command() {
        let cli = Cli::parse_from([
            "schemaforge",
            "generate",
            "schema.yaml",
            "--root",
            "app",
            "-m",
            "Order",
            "--model",
            "Invoice",
            "--dry-run",
        ]);
        let Commands::Generate(args) = cli.command else {
            panic!("expected Generate command");
        };
        assert_eq!(args.schema, PathBuf::from("schema.yaml"));
        assert_eq!(args.root, Some(PathBuf::from("app")));
        assert_eq!(args.models, ["Order", "Invoice"]);
        assert!(args.dry_run);
        assert!(!args.force);
        assert!(!args.no_menus);
    }

    #[test]
    fn generate_alias() {
        let cli = Cli::parse_from(["schemaforge", "g", "schema.yaml"]);
        assert!(matches!(cli.command, Commands::Generate(_)));
    }

    #[test]
    fn generate_requires_a_schema() {
        assert!(Cli::try_parse_from(["schemaforge", "generate"]).is_err());
    }

    #[test]
    fn quiet_and_verbose_conflict() {
        // clap should reject --quiet --verbose together
        let result = Cli::try_parse_from(["schemaforge", "--quiet", "--verbose", "config", "list"]);
        assert!(result.is_err());
    }
}
