//! Dependency identity types and the dependency list format.
//!
//! The host build tool resolves the dependency graph; this crate only sees
//! the flattened result as a list of [`DependencyRecord`]s, one per line:
//!
//! ```text
//! # group:name:type:version:scope[:path]
//! org.slf4j:slf4j-api:jar:1.7.36:provided
//! com.example:orders-web:war:2.1.0:compile:/home/ci/.m2/repository/com/example/orders-web-2.1.0.war
//! ```
//!
//! Everything after the fifth `:` is the archive path, so paths containing
//! colons (Windows drive letters) are kept intact.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::error::{StructureError, StructureResult};

/// Identity of a dependency unit: group, name and optional version.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Coordinate {
    /// Group identifier (e.g. `org.hibernate`).
    pub group: String,

    /// Artifact name within the group (e.g. `hibernate-core`).
    pub name: String,

    /// Version, absent for version-independent keys.
    pub version: Option<String>,
}

impl Coordinate {
    /// Create a versioned coordinate.
    pub fn new(
        group: impl Into<String>,
        name: impl Into<String>,
        version: impl Into<String>,
    ) -> Self {
        Self {
            group: group.into(),
            name: name.into(),
            version: Some(version.into()),
        }
    }

    /// Create a coordinate without a version.
    pub fn unversioned(group: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            group: group.into(),
            name: name.into(),
            version: None,
        }
    }

    /// The same coordinate with the version stripped.
    pub fn without_version(&self) -> Self {
        Self::unversioned(self.group.clone(), self.name.clone())
    }

    /// Whether group and name match, ignoring the version.
    pub fn same_artifact(&self, group: &str, name: &str) -> bool {
        self.group == group && self.name == name
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.version {
            Some(version) => write!(f, "{}:{}:{}", self.group, self.name, version),
            None => write!(f, "{}:{}", self.group, self.name),
        }
    }
}

/// Parses `group:name[:version]`.
impl FromStr for Coordinate {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.trim().split(':').map(str::trim).collect();
        match parts.as_slice() {
            [group, name] if !group.is_empty() && !name.is_empty() => {
                Ok(Self::unversioned(*group, *name))
            }
            [group, name, version]
                if !group.is_empty() && !name.is_empty() && !version.is_empty() =>
            {
                Ok(Self::new(*group, *name, *version))
            }
            _ => Err(format!("expected group:name[:version], got {:?}", s.trim())),
        }
    }
}

/// A resolved dependency as reported by the host build tool.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DependencyRecord {
    /// The dependency's coordinate (always versioned for resolved records).
    pub coordinate: Coordinate,

    /// Dependency scope (e.g. `provided`, `compile`).
    pub scope: String,

    /// Packaging type (e.g. `jar`, `war`).
    pub artifact_type: String,

    /// Location of the packaged archive, when the build tool reported one.
    pub file: Option<PathBuf>,
}

impl DependencyRecord {
    /// Create a record without an archive location.
    pub fn new(
        coordinate: Coordinate,
        scope: impl Into<String>,
        artifact_type: impl Into<String>,
    ) -> Self {
        Self {
            coordinate,
            scope: scope.into(),
            artifact_type: artifact_type.into(),
            file: None,
        }
    }

    /// Set the archive location.
    pub fn with_file(mut self, file: impl Into<PathBuf>) -> Self {
        self.file = Some(file.into());
        self
    }

    /// File name of the packaged archive, if known.
    pub fn archive_name(&self) -> Option<String> {
        self.file
            .as_deref()
            .and_then(Path::file_name)
            .map(|n| n.to_string_lossy().into_owned())
    }
}

impl fmt::Display for DependencyRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let version = self.coordinate.version.as_deref().unwrap_or("");
        write!(
            f,
            "{}:{}:{}:{}:{}",
            self.coordinate.group, self.coordinate.name, self.artifact_type, version, self.scope
        )
    }
}

/// Parse a dependency list document.
///
/// `source_name` is only used in error messages.
pub fn parse_dependency_list(
    content: &str,
    source_name: &str,
) -> StructureResult<Vec<DependencyRecord>> {
    let mut records = Vec::new();

    for (idx, raw) in content.lines().enumerate() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let fail = |reason: &str| StructureError::DependencyFormat {
            source_name: source_name.to_string(),
            line: idx + 1,
            content: line.to_string(),
            reason: reason.to_string(),
        };

        let fields: Vec<&str> = line.splitn(6, ':').collect();
        if fields.len() < 5 {
            return Err(fail("expected group:name:type:version:scope[:path]"));
        }

        let (group, name, artifact_type, version, scope) = (
            fields[0].trim(),
            fields[1].trim(),
            fields[2].trim(),
            fields[3].trim(),
            fields[4].trim(),
        );
        if group.is_empty() || name.is_empty() {
            return Err(fail("empty group or name"));
        }
        if scope.is_empty() {
            return Err(fail("empty scope"));
        }

        let mut record = DependencyRecord::new(
            Coordinate {
                group: group.to_string(),
                name: name.to_string(),
                version: (!version.is_empty()).then(|| version.to_string()),
            },
            scope,
            artifact_type,
        );
        if let Some(path) = fields.get(5).map(|p| p.trim()).filter(|p| !p.is_empty()) {
            record = record.with_file(path);
        }
        records.push(record);
    }

    Ok(records)
}

/// Read and parse a dependency list file.
pub fn read_dependency_list(path: &Path) -> StructureResult<Vec<DependencyRecord>> {
    let content = std::fs::read_to_string(path).map_err(|e| StructureError::io(path, e))?;
    parse_dependency_list(&content, &path.display().to_string())
}
