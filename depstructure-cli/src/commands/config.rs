//! Configuration management CLI commands.
//!
//! Provides `config get`, `config set`, `config list`, and `config path` commands
//! for viewing and modifying configuration settings from the command line.

use std::path::Path;

use clap::Subcommand;
use depstructure::config::{ConfigFile, ConfigKey};

use super::common::config_path;
use crate::error::CliError;

/// Config subcommands.
#[derive(Debug, Subcommand)]
pub enum ConfigCommands {
    /// Get a configuration value
    Get {
        /// Configuration key in format section.key (e.g., filter.allowed_scopes)
        key: String,
    },

    /// Set a configuration value
    Set {
        /// Configuration key in format section.key (e.g., filter.allowed_scopes)
        key: String,

        /// Value to set (lists are comma separated)
        value: String,
    },

    /// List all configuration settings
    List,

    /// Show the configuration file path
    Path,
}

/// Run a config subcommand.
pub fn run(command: ConfigCommands, cli_config: Option<&Path>) -> Result<(), CliError> {
    let path = config_path(cli_config);
    match command {
        ConfigCommands::Get { key } => run_get(&key, &path),
        ConfigCommands::Set { key, value } => run_set(&key, &value, &path),
        ConfigCommands::List => run_list(&path),
        ConfigCommands::Path => {
            println!("{}", path.display());
            Ok(())
        }
    }
}

fn parse_key(key: &str) -> Result<ConfigKey, CliError> {
    key.parse().map_err(|_| {
        CliError::Config(format!(
            "Unknown configuration key '{}'. Use 'depstructure config list' to see available keys.",
            key
        ))
    })
}

/// Get a configuration value.
fn run_get(key: &str, path: &Path) -> Result<(), CliError> {
    let config_key = parse_key(key)?;
    let config = ConfigFile::load_or_default(path)?;
    let value = config_key.get(&config);

    if value.is_empty() {
        println!("(not set)");
    } else {
        println!("{}", value);
    }

    Ok(())
}

/// Set a configuration value.
fn run_set(key: &str, value: &str, path: &Path) -> Result<(), CliError> {
    let config_key = parse_key(key)?;
    let mut config = ConfigFile::load_or_default(path)?;
    config_key.set(&mut config, value)?;
    config.save_to(path)?;

    println!("Set {} = {}", config_key.name(), value);

    Ok(())
}

/// List all configuration settings.
fn run_list(path: &Path) -> Result<(), CliError> {
    let config = ConfigFile::load_or_default(path)?;

    println!("Configuration Settings ({})", path.display());
    println!("======================");
    println!();

    let mut current_section = "";

    for key in ConfigKey::all() {
        let section = key.section();

        if section != current_section {
            if !current_section.is_empty() {
                println!();
            }
            println!("[{}]", section);
            current_section = section;
        }

        let value = key.get(&config);
        if value.is_empty() {
            println!("  {} = (not set)", key.key_name());
        } else {
            println!("  {} = {}", key.key_name(), value);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_set_then_get() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("depstructure.ini");

        run(
            ConfigCommands::Set {
                key: "filter.allowed_types".to_string(),
                value: "jar,war".to_string(),
            },
            Some(path.as_path()),
        )
        .unwrap();

        let config = ConfigFile::load_from(&path).unwrap();
        assert_eq!(config.filter.allowed_types, vec!["jar", "war"]);
        run(
            ConfigCommands::Get {
                key: "filter.allowed_types".to_string(),
            },
            Some(path.as_path()),
        )
        .unwrap();
    }

    #[test]
    fn test_unknown_key() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("depstructure.ini");
        let err = run(
            ConfigCommands::Get {
                key: "nope.nothing".to_string(),
            },
            Some(path.as_path()),
        )
        .unwrap_err();
        assert!(err.to_string().contains("nope.nothing"));
    }

    #[test]
    fn test_invalid_value_not_saved() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("depstructure.ini");
        let result = run(
            ConfigCommands::Set {
                key: "generate.enabled".to_string(),
                value: "perhaps".to_string(),
            },
            Some(path.as_path()),
        );
        assert!(result.is_err());
        assert!(!path.exists());
    }
}
