//! Configuration file support.
//!
//! Configuration lives in an INI file (`depstructure.ini` by default):
//!
//! ```ini
//! [generate]
//! enabled = true
//! sub_deployment = false
//! print_artifact_warnings = true
//!
//! [dictionary]
//! files = etc/custom.dict, etc/overrides.dict
//!
//! [filter]
//! allowed_scopes = provided
//! excluded_artifacts = org.slf4j:*
//!
//! [output]
//! packaging = war
//! final_name = shop-1.0
//!
//! [input]
//! dependencies = target/dependencies.txt
//!
//! [sub_deployments]
//! artifacts = com.example:shop-web
//! ```
//!
//! List values are comma separated. Every key is addressable as
//! `section.key` through [`ConfigKey`].

mod file;
mod keys;

pub use file::{
    config_file_path, ConfigFile, DictionarySection, FilterSection, GenerateSection,
    InputSection, OutputSection, SkeletonSection, SubDeploymentsSection, CONFIG_FILE_NAME,
    DEFAULT_SKELETON_DIR,
};
pub use keys::ConfigKey;

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("configuration file not found: {0}")]
    NotFound(PathBuf),

    #[error("failed to parse {path}: {reason}")]
    Parse { path: PathBuf, reason: String },

    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("unknown configuration key '{0}'")]
    UnknownKey(String),

    #[error("invalid value {value:?} for {key}: {reason}")]
    InvalidValue {
        key: String,
        value: String,
        reason: String,
    },
}

/// Split a comma-separated list, dropping empty items.
pub fn parse_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_list() {
        assert_eq!(parse_list("a, b ,c"), vec!["a", "b", "c"]);
        assert_eq!(parse_list(" a,,b, "), vec!["a", "b"]);
        assert!(parse_list("").is_empty());
    }
}
