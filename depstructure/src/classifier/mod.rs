//! Dependency classification.
//!
//! [`classify`] maps each resolved dependency to a module through the
//! [`Dictionary`] and filters it by the [`ClassifierPolicy`]. Every record
//! with a dictionary hit ends up in exactly one place:
//!
//! - the assignment, when scope, type and exclusion checks all pass;
//! - otherwise one diagnostic for the first failing check
//!   (scope, then type, then exclusion).
//!
//! Records without a dictionary hit are dropped silently; most dependencies
//! are ordinary libraries that get packaged, not server modules.

mod policy;

pub use policy::{ClassifierPolicy, ExclusionFilter, DEFAULT_SCOPE};

use std::collections::{HashMap, HashSet};

use crate::coordinate::DependencyRecord;
use crate::diagnostics::Diagnostic;
use crate::dictionary::Dictionary;
use crate::error::StructureResult;

/// A dependency admitted as a module reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Assignment {
    /// The dependency.
    pub record: DependencyRecord,

    /// The module it maps to.
    pub module_name: String,
}

/// Module name to the dependency that owns it.
///
/// The owner is the first admitted dependency assigned the module. A module
/// only rejected dependencies map to is owned by the first of those, so the
/// consistency report can tell an orphan module from one whose dependency
/// merely has the wrong scope.
#[derive(Debug, Clone, Default)]
pub struct ReverseIndex {
    by_module: HashMap<String, Owner>,
}

#[derive(Debug, Clone)]
struct Owner {
    record: DependencyRecord,
    admitted: bool,
}

impl ReverseIndex {
    /// Offer `record` as the owner of `module`.
    ///
    /// An admitted record replaces a rejected owner; otherwise the first
    /// record offered keeps the module.
    pub fn offer(&mut self, module: &str, record: &DependencyRecord, admitted: bool) {
        let owner = Owner {
            record: record.clone(),
            admitted,
        };
        match self.by_module.get_mut(module) {
            Some(current) if admitted && !current.admitted => *current = owner,
            Some(_) => {}
            None => {
                self.by_module.insert(module.to_string(), owner);
            }
        }
    }

    /// The owning dependency of a module.
    pub fn get(&self, module: &str) -> Option<&DependencyRecord> {
        self.by_module.get(module).map(|owner| &owner.record)
    }
}

/// Result of classifying a set of dependencies.
#[derive(Debug, Clone, Default)]
pub struct Classification {
    /// Admitted dependencies in input order.
    pub assignments: Vec<Assignment>,

    /// Module to owning dependency.
    pub reverse: ReverseIndex,

    /// Wrong-scope, wrong-type and excluded findings.
    pub diagnostics: Vec<Diagnostic>,

    /// Number of records without a dictionary hit.
    pub unmapped: usize,
}

impl Classification {
    /// Assigned module names in input order, without duplicates.
    pub fn module_names(&self) -> Vec<String> {
        let mut seen = HashSet::new();
        self.assignments
            .iter()
            .filter(|a| seen.insert(a.module_name.as_str()))
            .map(|a| a.module_name.clone())
            .collect()
    }

}

/// Classify dependency records against a dictionary and policy.
///
/// Only fails when an exclusion pattern cannot be compiled.
pub fn classify(
    records: &[DependencyRecord],
    policy: &ClassifierPolicy,
    dictionary: &Dictionary,
) -> StructureResult<Classification> {
    let exclusions = policy.exclusion_filter()?;
    let mut result = Classification::default();

    for record in records {
        let Some(module) = dictionary.resolve(&record.coordinate) else {
            tracing::trace!(artifact = %record, "No matching dictionary entry");
            result.unmapped += 1;
            continue;
        };

        let diagnostic = if !policy.scope_allowed(&record.scope) {
            Some(Diagnostic::WrongScope {
                record: record.clone(),
                module: module.to_string(),
                allowed: policy.allowed_scopes.clone(),
            })
        } else if !policy.type_allowed(&record.artifact_type) {
            Some(Diagnostic::WrongType {
                record: record.clone(),
                module: module.to_string(),
                allowed: policy.allowed_types.clone(),
            })
        } else if exclusions.excludes(record) {
            Some(Diagnostic::Excluded {
                record: record.clone(),
                module: module.to_string(),
            })
        } else {
            None
        };

        result.reverse.offer(module, record, diagnostic.is_none());

        match diagnostic {
            Some(diagnostic) => {
                tracing::debug!(
                    artifact = %record,
                    kind = diagnostic.kind(),
                    "Dependency not admitted"
                );
                result.diagnostics.push(diagnostic);
            }
            None => {
                tracing::debug!(artifact = %record, module, "Dependency mapped to module");
                result.assignments.push(Assignment {
                    record: record.clone(),
                    module_name: module.to_string(),
                });
            }
        }
    }

    tracing::info!(
        dependencies = records.len(),
        modules = result.assignments.len(),
        rejected = result.diagnostics.len(),
        unmapped = result.unmapped,
        "Classified dependencies"
    );

    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coordinate::Coordinate;
    use crate::dictionary::DictionaryBuilder;

    fn dictionary() -> Dictionary {
        DictionaryBuilder::new()
            .load_str("test", "org.x:lib=modX\norg.y:lib=modY\norg.z:lib=modZ\nalias:lib=modX")
            .unwrap()
            .build()
    }

    fn record(group: &str, scope: &str, artifact_type: &str) -> DependencyRecord {
        DependencyRecord::new(Coordinate::new(group, "lib", "1.0"), scope, artifact_type)
    }

    #[test]
    fn test_admitted_record() {
        let records = vec![record("org.x", "provided", "jar")];
        let result = classify(&records, &ClassifierPolicy::default(), &dictionary()).unwrap();

        assert_eq!(result.module_names(), vec!["modX".to_string()]);
        assert!(result.diagnostics.is_empty());
        assert_eq!(result.assignments[0].module_name, "modX");
        assert_eq!(result.reverse.get("modX"), Some(&records[0]));
    }

    #[test]
    fn test_wrong_scope() {
        let records = vec![record("org.x", "compile", "jar")];
        let result = classify(&records, &ClassifierPolicy::default(), &dictionary()).unwrap();

        assert!(result.assignments.is_empty());
        assert_eq!(result.diagnostics.len(), 1);
        assert_eq!(result.diagnostics[0].kind(), "wrong-scope");
        // Still indexed for the consistency report.
        assert!(result.reverse.get("modX").is_some());
    }

    #[test]
    fn test_scope_checked_before_type() {
        let policy = ClassifierPolicy::default().with_types(["jar"]);
        let records = vec![record("org.x", "compile", "pom")];
        let result = classify(&records, &policy, &dictionary()).unwrap();

        assert_eq!(result.diagnostics.len(), 1);
        assert_eq!(result.diagnostics[0].kind(), "wrong-scope");
    }

    #[test]
    fn test_wrong_type() {
        let policy = ClassifierPolicy::default().with_types(["jar"]);
        let records = vec![record("org.x", "provided", "pom")];
        let result = classify(&records, &policy, &dictionary()).unwrap();

        assert_eq!(result.diagnostics.len(), 1);
        assert_eq!(result.diagnostics[0].kind(), "wrong-type");
    }

    #[test]
    fn test_excluded() {
        let policy = ClassifierPolicy::default().with_exclusions(["org.y"]);
        let records = vec![record("org.x", "provided", "jar"), record("org.y", "provided", "jar")];
        let result = classify(&records, &policy, &dictionary()).unwrap();

        assert_eq!(result.module_names(), vec!["modX".to_string()]);
        assert_eq!(result.diagnostics.len(), 1);
        assert_eq!(result.diagnostics[0].kind(), "excluded");
    }

    #[test]
    fn test_unmapped_records_dropped_silently() {
        let records = vec![record("com.unknown", "provided", "jar")];
        let result = classify(&records, &ClassifierPolicy::default(), &dictionary()).unwrap();

        assert!(result.assignments.is_empty());
        assert!(result.diagnostics.is_empty());
        assert!(result.reverse.get("modX").is_none());
        assert_eq!(result.unmapped, 1);
    }

    #[test]
    fn test_module_names_deduplicated_in_order() {
        let records = vec![
            record("org.z", "provided", "jar"),
            record("org.x", "provided", "jar"),
            record("alias", "provided", "jar"),
        ];
        let result = classify(&records, &ClassifierPolicy::default(), &dictionary()).unwrap();

        assert_eq!(result.assignments.len(), 3);
        assert_eq!(result.module_names(), vec!["modZ".to_string(), "modX".to_string()]);
    }

    #[test]
    fn test_reverse_index_keeps_first_owner() {
        let records = vec![record("org.x", "provided", "jar"), record("alias", "provided", "jar")];
        let result = classify(&records, &ClassifierPolicy::default(), &dictionary()).unwrap();

        assert_eq!(result.reverse.get("modX").unwrap().coordinate.group, "org.x");
    }

    #[test]
    fn test_admitted_record_owns_module_over_rejected() {
        let records = vec![record("org.x", "compile", "jar"), record("alias", "provided", "jar")];
        let result = classify(&records, &ClassifierPolicy::default(), &dictionary()).unwrap();

        assert_eq!(result.module_names(), vec!["modX".to_string()]);
        assert_eq!(result.reverse.get("modX"), Some(&records[1]));
    }

    #[test]
    fn test_first_rejected_record_owns_unadmitted_module() {
        let records = vec![record("org.x", "compile", "jar"), record("alias", "test", "jar")];
        let result = classify(&records, &ClassifierPolicy::default(), &dictionary()).unwrap();

        assert!(result.assignments.is_empty());
        assert_eq!(result.reverse.get("modX"), Some(&records[0]));
    }

    #[test]
    fn test_invalid_exclusion_pattern_fails() {
        let policy = ClassifierPolicy::default().with_exclusions(["[broken"]);
        assert!(classify(&[], &policy, &dictionary()).is_err());
    }
}
