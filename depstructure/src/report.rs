//! Post-merge consistency checks.
//!
//! Walks every module reference in the `dependencies` of the deployment and
//! of each sub-deployment and compares it with the dependencies that mapped
//! to modules. Module nodes under other elements (`exclusions`, for example)
//! are not dependency declarations and are not checked.

use crate::classifier::{ClassifierPolicy, ReverseIndex};
use crate::descriptor::{
    section_modules, DescriptorTree, DEPLOYMENT_TAG, NAME_ATTR, SUB_DEPLOYMENT_TAG,
};
use crate::diagnostics::{Diagnostic, ModuleLocation};

/// Check a merged descriptor against the classification.
///
/// Emits [`Diagnostic::OrphanModule`] for a module no dependency maps to and
/// [`Diagnostic::WrongScopeModule`] for a module whose owning dependency
/// has a scope the policy does not allow. Never modifies the tree.
pub fn report(
    tree: &DescriptorTree,
    reverse: &ReverseIndex,
    policy: &ClassifierPolicy,
) -> Vec<Diagnostic> {
    let root = tree.root();
    let mut sections = Vec::new();

    for deployment in tree.find_children(root, DEPLOYMENT_TAG) {
        sections.push((deployment, ModuleLocation::Deployment));
    }
    for sub in tree.find_children(root, SUB_DEPLOYMENT_TAG) {
        let name = tree.attribute(sub, NAME_ATTR).unwrap_or_default().to_string();
        sections.push((sub, ModuleLocation::SubDeployment(name)));
    }

    let mut diagnostics = Vec::new();
    for (section, location) in sections {
        for module in section_modules(tree, section) {
            let diagnostic = match reverse.get(&module) {
                None => Diagnostic::OrphanModule {
                    module,
                    location: location.clone(),
                },
                Some(record) if !policy.scope_allowed(&record.scope) => {
                    Diagnostic::WrongScopeModule {
                        module,
                        location: location.clone(),
                        record: record.clone(),
                    }
                }
                Some(_) => continue,
            };
            tracing::debug!(kind = diagnostic.kind(), "{}", diagnostic);
            diagnostics.push(diagnostic);
        }
    }

    diagnostics
}
