//! Error types for structure generation.
//!
//! Every variant here is fatal for a run. Advisory findings (wrong scope,
//! orphan modules, ...) are [`Diagnostic`](crate::diagnostics::Diagnostic)
//! values instead and never abort.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Result type for structure generation operations.
pub type StructureResult<T> = Result<T, StructureError>;

/// Errors that abort a generation run.
#[derive(Debug, Error)]
pub enum StructureError {
    /// A dictionary source contains a malformed mapping line.
    #[error("invalid dictionary entry in {source_name} line {line}: {reason} ({content:?})")]
    Format {
        source_name: String,
        line: usize,
        content: String,
        reason: String,
    },

    /// A descriptor tree does not have the expected root element.
    #[error("{context}: root element is <{actual}>, expected <{expected}>")]
    Schema {
        context: String,
        expected: String,
        actual: String,
    },

    /// A declared sub-deployment archive carries no nested descriptor.
    #[error(
        "no deployment structure in {archive} (sub-deployment {declared}); \
         generate one for that artifact first"
    )]
    MissingNestedDescriptor { declared: String, archive: String },

    /// A declared sub-deployment does not match any resolved dependency.
    #[error("cannot find file for sub-deployment artifact {0}")]
    SubDeploymentNotFound(String),

    /// A sub-deployment declaration is not of the form `group:name`.
    #[error("invalid sub-deployment declaration {0:?}, expected group:name")]
    InvalidSubDeployment(String),

    /// A dependency list line is malformed.
    #[error("invalid dependency in {source_name} line {line}: {reason} ({content:?})")]
    DependencyFormat {
        source_name: String,
        line: usize,
        content: String,
        reason: String,
    },

    /// An exclusion pattern is not a valid glob.
    #[error("invalid exclusion pattern {pattern:?}: {reason}")]
    Pattern { pattern: String, reason: String },

    /// A descriptor document could not be parsed or written.
    #[error("malformed descriptor {source_name}: {reason}")]
    Xml { source_name: String, reason: String },

    /// Listing or reading a packaged archive failed.
    #[error("failed to read archive {path}: {reason}")]
    Archive { path: PathBuf, reason: String },

    /// Filesystem access failed.
    #[error("failed to access {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl StructureError {
    /// Wrap an I/O error with the path it occurred on.
    pub fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
