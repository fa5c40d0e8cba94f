//! Advisory findings produced during classification and after merging.
//!
//! None of these abort a run; the caller decides whether to print them.

use std::fmt;

use crate::coordinate::DependencyRecord;

/// Where in the descriptor a module reference was found.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModuleLocation {
    /// The top-level `deployment` section.
    Deployment,

    /// A `sub-deployment` section, identified by its archive name.
    SubDeployment(String),
}

impl fmt::Display for ModuleLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ModuleLocation::Deployment => write!(f, "deployment"),
            ModuleLocation::SubDeployment(name) => write!(f, "sub-deployment {}", name),
        }
    }
}

/// A non-fatal finding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Diagnostic {
    /// A dependency maps to a module but is not of an allowed scope.
    WrongScope {
        record: DependencyRecord,
        module: String,
        allowed: Vec<String>,
    },

    /// A dependency maps to a module but is not of an allowed type.
    WrongType {
        record: DependencyRecord,
        module: String,
        allowed: Vec<String>,
    },

    /// A dependency maps to a module but matches an exclusion pattern.
    Excluded {
        record: DependencyRecord,
        module: String,
    },

    /// The descriptor references a module no dependency maps to.
    OrphanModule {
        module: String,
        location: ModuleLocation,
    },

    /// The descriptor references a module whose dependency has a disallowed scope.
    WrongScopeModule {
        module: String,
        location: ModuleLocation,
        record: DependencyRecord,
    },
}

impl Diagnostic {
    /// Short machine-friendly category name.
    pub fn kind(&self) -> &'static str {
        match self {
            Diagnostic::WrongScope { .. } => "wrong-scope",
            Diagnostic::WrongType { .. } => "wrong-type",
            Diagnostic::Excluded { .. } => "excluded",
            Diagnostic::OrphanModule { .. } => "orphan-module",
            Diagnostic::WrongScopeModule { .. } => "wrong-scope-module",
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Diagnostic::WrongScope {
                record,
                module,
                allowed,
            } => write!(
                f,
                "artifact <{}> is not of required scope \"{}\", but can be included as module {}",
                record,
                allowed.join(","),
                module
            ),
            Diagnostic::WrongType {
                record, allowed, ..
            } => write!(
                f,
                "artifact <{}> is not of required type \"{}\"",
                record,
                allowed.join(",")
            ),
            Diagnostic::Excluded { record, .. } => {
                write!(f, "artifact <{}> matches excluded artifact patterns", record)
            }
            Diagnostic::OrphanModule { module, location } => {
                write!(f, "no dependencies to module {} ({})", module, location)
            }
            Diagnostic::WrongScopeModule {
                module,
                location,
                record,
            } => write!(
                f,
                "module {} ({}) does not appear with an allowed scope, dependency is <{}>",
                module, location, record
            ),
        }
    }
}
