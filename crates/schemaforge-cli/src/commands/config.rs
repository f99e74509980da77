//! `schemaforge config`: show the settings a `generate` run would use.
//!
//! Values are read from the merged [`AppConfig`], so `get` and `list`
//! reflect files, `SCHEMAFORGE_*` variables and defaults alike.

use crate::{
    cli::ConfigCommands,
    config::AppConfig,
    error::{CliError, CliResult},
    output::OutputManager,
};

pub fn execute(cmd: ConfigCommands, config: AppConfig, output: OutputManager) -> CliResult<()> {
    match cmd {
        ConfigCommands::Get { key } => {
            let value = lookup(&as_toml(&config)?, &key)?;
            output.print(&format!("{key} = {value}"))?;
        }
        ConfigCommands::List => {
            output.header("Effective settings")?;
            let text = toml::to_string_pretty(&config).map_err(|e| CliError::ConfigError {
                message: format!("Could not render settings as TOML: {e}"),
                source: Some(Box::new(e)),
            })?;
            output.print(text.trim_end())?;
        }
        ConfigCommands::Path => {
            output.print(&AppConfig::config_path().display().to_string())?;
        }
    }
    Ok(())
}

fn as_toml(config: &AppConfig) -> CliResult<toml::Value> {
    toml::Value::try_from(config).map_err(|e| CliError::ConfigError {
        message: format!("Could not render settings as TOML: {e}"),
        source: Some(Box::new(e)),
    })
}

/// Walk a dotted key such as `generation.output_root`. Only leaf values
/// can be read.
fn lookup(settings: &toml::Value, key: &str) -> CliResult<String> {
    let unknown = || CliError::ConfigError {
        message: format!("Unknown config key: '{key}'"),
        source: None,
    };

    let mut value = settings;
    for part in key.split('.') {
        value = value.get(part).ok_or_else(unknown)?;
    }
    match value {
        toml::Value::String(s) => Ok(s.clone()),
        toml::Value::Table(_) | toml::Value::Array(_) => Err(unknown()),
        scalar => Ok(scalar.to_string()),
    }
}
