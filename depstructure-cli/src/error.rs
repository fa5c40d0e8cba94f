//! CLI error types.

use std::fmt;

use depstructure::config::ConfigError;
use depstructure::StructureError;

/// Errors reported by CLI commands.
#[derive(Debug)]
pub enum CliError {
    /// Invalid or missing configuration.
    Config(String),

    /// Reading or writing the configuration file failed.
    ConfigFile(ConfigError),

    /// Generation failed.
    Structure(StructureError),

    /// No dependency list was configured.
    MissingDependencies,

    /// A coordinate argument could not be parsed.
    InvalidCoordinate(String),

    /// Writing to standard output failed.
    Output(std::io::Error),
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::Config(msg) => write!(f, "Configuration error: {}", msg),
            CliError::ConfigFile(e) => write!(f, "Configuration error: {}", e),
            CliError::Structure(e) => write!(f, "Generation failed: {}", e),
            CliError::MissingDependencies => write!(
                f,
                "No dependency list given. Use --dependencies or set input.dependencies"
            ),
            CliError::InvalidCoordinate(msg) => write!(f, "Invalid coordinate: {}", msg),
            CliError::Output(e) => write!(f, "Failed to write output: {}", e),
        }
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CliError::ConfigFile(e) => Some(e),
            CliError::Structure(e) => Some(e),
            CliError::Output(e) => Some(e),
            CliError::Config(_)
            | CliError::MissingDependencies
            | CliError::InvalidCoordinate(_) => None,
        }
    }
}

impl From<ConfigError> for CliError {
    fn from(e: ConfigError) -> Self {
        CliError::ConfigFile(e)
    }
}

impl From<StructureError> for CliError {
    fn from(e: StructureError) -> Self {
        CliError::Structure(e)
    }
}
