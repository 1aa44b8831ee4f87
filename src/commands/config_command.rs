//! Configuration management command implementation.
//!
//! Backs the `config` subcommand's four operations: `set`/`get` a single
//! dotted key path (e.g. `dub.crossfade_ms`), `list` the effective
//! configuration, and `reset` to built-in defaults.

use crate::cli::{ConfigAction, ConfigArgs};
use crate::config::{Config, ConfigService};
use crate::error::TdseError;
use crate::Result;

/// Navigates `value` by a dotted key path, returning the leaf.
fn navigate<'a>(value: &'a toml::Value, key: &str) -> Result<&'a toml::Value> {
    let mut current = value;
    for part in key.split('.') {
        current = current
            .get(part)
            .ok_or_else(|| TdseError::config(format!("unknown configuration key: {}", key)))?;
    }
    Ok(current)
}

/// Sets the leaf at a dotted key path to `raw`, parsed as TOML when possible
/// (so booleans, numbers, and strings all round-trip) and as a bare string
/// otherwise.
fn set_by_path(value: &mut toml::Value, key: &str, raw: &str) -> Result<()> {
    let parts: Vec<&str> = key.split('.').collect();
    let mut current = value;
    for part in &parts[..parts.len() - 1] {
        current = current
            .get_mut(*part)
            .ok_or_else(|| TdseError::config(format!("unknown configuration key: {}", key)))?;
    }
    let leaf_key = parts[parts.len() - 1];
    let table = current
        .as_table_mut()
        .ok_or_else(|| TdseError::config(format!("unknown configuration key: {}", key)))?;
    if !table.contains_key(leaf_key) {
        return Err(TdseError::config(format!("unknown configuration key: {}", key)));
    }
    let parsed = raw
        .parse::<toml::Value>()
        .unwrap_or_else(|_| toml::Value::String(raw.to_string()));
    table.insert(leaf_key.to_string(), parsed);
    Ok(())
}

/// Executes a configuration management operation.
pub async fn execute(args: ConfigArgs, config_service: &dyn ConfigService) -> Result<()> {
    match args.action {
        ConfigAction::Set { key, value } => {
            let config = config_service.get_config()?;
            let mut toml_value =
                toml::Value::try_from(&config).map_err(|e| TdseError::config(format!("serialization error: {}", e)))?;
            set_by_path(&mut toml_value, &key, &value)?;
            let updated: Config = toml_value
                .try_into()
                .map_err(|e| TdseError::config(format!("deserialization error: {}", e)))?;

            let path = config_service.get_config_file_path()?;
            let toml_content = toml::to_string_pretty(&updated)
                .map_err(|e| TdseError::config(format!("TOML serialization error: {}", e)))?;
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::write(&path, toml_content)?;
            config_service.reload()?;

            println!("Set {} = {}", key, value);
            println!("Saved to: {}", path.display());
        }
        ConfigAction::Get { key } => {
            let config = config_service.get_config()?;
            let toml_value =
                toml::Value::try_from(&config).map_err(|e| TdseError::config(format!("serialization error: {}", e)))?;
            let leaf = navigate(&toml_value, &key)?;
            println!("{}", leaf);
        }
        ConfigAction::List => {
            let config = config_service.get_config()?;
            if let Ok(path) = config_service.get_config_file_path() {
                println!("# Configuration file path: {}\n", path.display());
            }
            println!(
                "{}",
                toml::to_string_pretty(&config)
                    .map_err(|e| TdseError::config(format!("TOML serialization error: {}", e)))?
            );
        }
        ConfigAction::Reset => {
            config_service.reset_to_defaults()?;
            println!("Configuration reset to default values");
            if let Ok(path) = config_service.get_config_file_path() {
                println!("Default configuration saved to: {}", path.display());
            }
        }
    }
    Ok(())
}
