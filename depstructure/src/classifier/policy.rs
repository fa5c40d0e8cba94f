//! Scope, type and exclusion policy for classification.

use glob::Pattern;

use crate::coordinate::DependencyRecord;
use crate::error::{StructureError, StructureResult};

/// Scope allowed when nothing else is configured.
///
/// Dependencies the server provides at runtime are declared `provided` so
/// they are compiled against but not packaged.
pub const DEFAULT_SCOPE: &str = "provided";

/// Which dependency records may become module references.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassifierPolicy {
    /// Allowed dependency scopes. Must not be empty to admit anything.
    pub allowed_scopes: Vec<String>,

    /// Allowed artifact types; empty accepts every type.
    pub allowed_types: Vec<String>,

    /// Strict artifact patterns (`group[:name[:type[:version]]]`) to exclude.
    pub excluded_artifacts: Vec<String>,
}

impl Default for ClassifierPolicy {
    fn default() -> Self {
        Self {
            allowed_scopes: vec![DEFAULT_SCOPE.to_string()],
            allowed_types: Vec::new(),
            excluded_artifacts: Vec::new(),
        }
    }
}

impl ClassifierPolicy {
    /// Set the allowed scopes.
    pub fn with_scopes<I, S>(mut self, scopes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.allowed_scopes = scopes.into_iter().map(Into::into).collect();
        self
    }

    /// Set the allowed artifact types.
    pub fn with_types<I, S>(mut self, types: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.allowed_types = types.into_iter().map(Into::into).collect();
        self
    }

    /// Set the exclusion patterns.
    pub fn with_exclusions<I, S>(mut self, patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.excluded_artifacts = patterns.into_iter().map(Into::into).collect();
        self
    }

    /// Whether `scope` is one of the allowed scopes.
    pub fn scope_allowed(&self, scope: &str) -> bool {
        self.allowed_scopes.iter().any(|s| s == scope)
    }

    /// Whether `artifact_type` is allowed. An empty allow-list accepts all.
    pub fn type_allowed(&self, artifact_type: &str) -> bool {
        self.allowed_types.is_empty() || self.allowed_types.iter().any(|t| t == artifact_type)
    }

    /// Compile the exclusion patterns.
    pub fn exclusion_filter(&self) -> StructureResult<ExclusionFilter> {
        ExclusionFilter::new(&self.excluded_artifacts)
    }
}

/// Compiled strict artifact patterns.
///
/// Pattern tokens are matched positionally against the record's
/// `group`, `name`, `type` and `version`; a pattern with fewer tokens leaves
/// the remaining fields unconstrained. A pattern with more than four tokens
/// never matches.
#[derive(Debug, Clone, Default)]
pub struct ExclusionFilter {
    patterns: Vec<(String, Vec<Pattern>)>,
}

impl ExclusionFilter {
    /// Compile a list of patterns. Blank patterns are ignored.
    pub fn new<S: AsRef<str>>(patterns: &[S]) -> StructureResult<Self> {
        let mut compiled = Vec::with_capacity(patterns.len());

        for raw in patterns {
            let raw = raw.as_ref().trim();
            if raw.is_empty() {
                continue;
            }

            let tokens = raw
                .split(':')
                .map(|token| {
                    Pattern::new(token.trim()).map_err(|e| StructureError::Pattern {
                        pattern: raw.to_string(),
                        reason: e.to_string(),
                    })
                })
                .collect::<StructureResult<Vec<_>>>()?;
            compiled.push((raw.to_string(), tokens));
        }

        Ok(Self { patterns: compiled })
    }

    /// Whether no patterns are configured.
    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    /// The first pattern that excludes `record`, if any.
    pub fn matching_pattern(&self, record: &DependencyRecord) -> Option<&str> {
        let fields = [
            record.coordinate.group.as_str(),
            record.coordinate.name.as_str(),
            record.artifact_type.as_str(),
            record.coordinate.version.as_deref().unwrap_or(""),
        ];

        self.patterns
            .iter()
            .find(|(_, tokens)| {
                tokens.len() <= fields.len()
                    && tokens.iter().zip(fields.iter()).all(|(p, f)| p.matches(f))
            })
            .map(|(raw, _)| raw.as_str())
    }

    /// Whether any pattern excludes `record`.
    pub fn excludes(&self, record: &DependencyRecord) -> bool {
        self.matching_pattern(record).is_some()
    }
}
