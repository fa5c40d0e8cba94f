//! Common types and utilities shared across CLI commands.

use std::path::{Path, PathBuf};

use depstructure::config::{config_file_path, ConfigError, ConfigFile};
use depstructure::dictionary::Dictionary;
use depstructure::generator::load_dictionary;

use crate::error::CliError;

/// Path of the configuration file to use.
pub fn config_path(cli_config: Option<&Path>) -> PathBuf {
    cli_config
        .map(Path::to_path_buf)
        .unwrap_or_else(config_file_path)
}

/// Load the configuration file.
///
/// An explicitly given file must exist; the default file may be absent, in
/// which case defaults apply.
pub fn load_config(cli_config: Option<&Path>) -> Result<ConfigFile, CliError> {
    match cli_config {
        Some(path) => ConfigFile::load_from(path).map_err(CliError::from),
        None => match ConfigFile::load() {
            Err(ConfigError::NotFound(_)) => Ok(ConfigFile::default()),
            other => other.map_err(CliError::from),
        },
    }
}

/// Dictionary files from config, followed by those given on the command line.
pub fn dictionary_files(config: &ConfigFile, cli_files: &[PathBuf]) -> Vec<PathBuf> {
    config
        .dictionary
        .files
        .iter()
        .chain(cli_files)
        .cloned()
        .collect()
}

/// Build the layered dictionary for a run.
pub fn build_dictionary(
    config: &ConfigFile,
    cli_files: &[PathBuf],
) -> Result<Dictionary, CliError> {
    let files = dictionary_files(config, cli_files);
    let dictionary = load_dictionary(&files)?;
    tracing::debug!(
        layers = dictionary.layer_count(),
        entries = dictionary.entry_count(),
        "Dictionary ready"
    );
    Ok(dictionary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_dictionary_files_order() {
        let mut config = ConfigFile::default();
        config.dictionary.files = vec![PathBuf::from("a.dict")];
        let files = dictionary_files(&config, &[PathBuf::from("b.dict")]);
        assert_eq!(files, vec![PathBuf::from("a.dict"), PathBuf::from("b.dict")]);
    }

    #[test]
    fn test_explicit_config_must_exist() {
        let temp = TempDir::new().unwrap();
        let missing = temp.path().join("missing.ini");
        assert!(load_config(Some(missing.as_path())).is_err());
    }

    #[test]
    fn test_explicit_config_loaded() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("depstructure.ini");
        std::fs::write(&path, "[output]\npackaging = war\n").unwrap();

        let config = load_config(Some(path.as_path())).unwrap();
        assert_eq!(config.output.packaging, "war");
        assert_eq!(config_path(Some(path.as_path())), path);
    }
}
