//! Additive merging of module references into a descriptor.
//!
//! Both entry points only ever add nodes: a missing `deployment`,
//! `dependencies` or `sub-deployment` wrapper is created, and a module is
//! added unless a sibling with the same `name` is already present. Anything
//! hand-authored in the skeleton stays where it was.

mod sub_deployment;

pub use sub_deployment::SubDeploymentSpec;

use std::collections::HashSet;

use crate::descriptor::{
    prefixed_like, section_modules, DescriptorTree, NodeId, DEPENDENCIES_TAG, DEPLOYMENT_TAG,
    MODULE_TAG, NAME_ATTR, ROOT_TAG, SUB_DEPLOYMENT_TAG,
};
use crate::error::{StructureError, StructureResult};

/// Check that a tree is a deployment-structure descriptor.
pub fn validate_root(tree: &DescriptorTree, context: &str) -> StructureResult<()> {
    let actual = tree.local_tag(tree.root());
    if actual == ROOT_TAG {
        Ok(())
    } else {
        Err(StructureError::Schema {
            context: context.to_string(),
            expected: ROOT_TAG.to_string(),
            actual: tree.tag(tree.root()).to_string(),
        })
    }
}

/// Merge module names into the top-level `deployment` section.
///
/// The `deployment` node is created as the first child of the root when
/// missing. Created nodes take the namespace prefix of their parent.
/// Returns the number of module nodes added; merging the same names twice
/// adds nothing the second time.
pub fn merge_modules<S: AsRef<str>>(
    tree: &mut DescriptorTree,
    modules: &[S],
) -> StructureResult<usize> {
    validate_root(tree, "deployment structure")?;

    let root = tree.root();
    let deployment = match tree.find_child(root, DEPLOYMENT_TAG, None) {
        Some(node) => node,
        None => {
            let tag = prefixed_like(tree.tag(root), DEPLOYMENT_TAG);
            tree.create_first_child(root, &tag)
        }
    };
    let dependencies = find_or_create(tree, deployment, DEPENDENCIES_TAG, None);

    let added = insert_modules(tree, dependencies, modules.iter().map(AsRef::as_ref));
    tracing::info!(added, requested = modules.len(), "Merged deployment modules");
    Ok(added)
}

/// Merge nested descriptors into `sub-deployment` sections.
///
/// Each spec must carry a nested tree; a spec without one fails the whole
/// merge with [`StructureError::MissingNestedDescriptor`]. Modules already in
/// `top_level_modules` are not repeated at sub-deployment scope. Returns the
/// number of module nodes added across all sections.
pub fn merge_sub_deployments<S: AsRef<str>>(
    tree: &mut DescriptorTree,
    specs: &[SubDeploymentSpec],
    top_level_modules: &[S],
) -> StructureResult<usize> {
    validate_root(tree, "deployment structure")?;

    let inherited: HashSet<&str> = top_level_modules.iter().map(AsRef::as_ref).collect();
    let root = tree.root();
    let mut added = 0;

    for spec in specs {
        let archive = spec
            .resolved_archive_name
            .clone()
            .unwrap_or_else(|| spec.declared_name());

        let Some(nested) = spec.nested_tree.as_ref() else {
            return Err(StructureError::MissingNestedDescriptor {
                declared: spec.declared_name(),
                archive,
            });
        };
        validate_root(nested, &archive)?;

        let nested_modules: Vec<String> = nested
            .find_children(nested.root(), DEPLOYMENT_TAG)
            .flat_map(|deployment| section_modules(nested, deployment))
            .filter(|module| !inherited.contains(module.as_str()))
            .collect();

        let section = find_or_create(tree, root, SUB_DEPLOYMENT_TAG, Some(archive.as_str()));
        let dependencies = find_or_create(tree, section, DEPENDENCIES_TAG, None);
        let count = insert_modules(tree, dependencies, nested_modules.iter().map(String::as_str));

        tracing::info!(
            sub_deployment = %spec.declared_name(),
            archive = %archive,
            added = count,
            "Merged sub-deployment modules"
        );
        added += count;
    }

    Ok(added)
}

fn find_or_create(
    tree: &mut DescriptorTree,
    parent: NodeId,
    tag: &str,
    name: Option<&str>,
) -> NodeId {
    if let Some(node) = tree.find_child(parent, tag, name.map(|n| (NAME_ATTR, n))) {
        return node;
    }
    let node = create_prefixed(tree, parent, tag);
    if let Some(name) = name {
        tree.set_attribute(node, NAME_ATTR, name);
    }
    node
}

fn create_prefixed(tree: &mut DescriptorTree, parent: NodeId, local: &str) -> NodeId {
    let tag = prefixed_like(tree.tag(parent), local);
    tree.create_child(parent, &tag)
}

fn insert_modules<'a>(
    tree: &mut DescriptorTree,
    dependencies: NodeId,
    modules: impl Iterator<Item = &'a str>,
) -> usize {
    let mut added = 0;
    for module in modules {
        if tree
            .find_child(dependencies, MODULE_TAG, Some((NAME_ATTR, module)))
            .is_some()
        {
            tracing::trace!(module, "Module already declared");
            continue;
        }
        let node = create_prefixed(tree, dependencies, MODULE_TAG);
        tree.set_attribute(node, NAME_ATTR, module);
        tracing::debug!(module, "Added module dependency");
        added += 1;
    }
    added
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::{default_skeleton, parse_descriptor, write_descriptor};

    fn deployment_modules(tree: &DescriptorTree) -> Vec<String> {
        let deployment = tree.find_child(tree.root(), DEPLOYMENT_TAG, None).unwrap();
        section_modules(tree, deployment)
    }

    fn sub_modules(tree: &DescriptorTree, archive: &str) -> Vec<String> {
        let section = tree
            .find_child(tree.root(), SUB_DEPLOYMENT_TAG, Some((NAME_ATTR, archive)))
            .unwrap();
        section_modules(tree, section)
    }

    fn nested(modules: &[&str]) -> DescriptorTree {
        let mut tree = default_skeleton();
        merge_modules(&mut tree, modules).unwrap();
        tree
    }

    fn spec_with(archive: &str, tree: Option<DescriptorTree>) -> SubDeploymentSpec {
        let mut spec = SubDeploymentSpec::new("com.example", "web");
        spec.resolved_archive_name = Some(archive.to_string());
        spec.nested_tree = tree;
        spec
    }

    #[test]
    fn test_merge_into_empty_skeleton() {
        let mut tree = default_skeleton();
        let added = merge_modules(&mut tree, &["modA", "modB"]).unwrap();

        assert_eq!(added, 2);
        assert_eq!(deployment_modules(&tree), vec!["modA", "modB"]);
    }

    #[test]
    fn test_merge_is_idempotent() {
        let mut tree = default_skeleton();
        merge_modules(&mut tree, &["modA", "modB"]).unwrap();
        let once = tree.clone();

        let added = merge_modules(&mut tree, &["modA", "modB"]).unwrap();
        assert_eq!(added, 0);
        assert_eq!(tree, once);
    }

    #[test]
    fn test_merge_deduplicates_input() {
        let mut tree = default_skeleton();
        let added = merge_modules(&mut tree, &["modA", "modA"]).unwrap();
        assert_eq!(added, 1);
        assert_eq!(deployment_modules(&tree), vec!["modA"]);
    }

    #[test]
    fn test_merge_keeps_skeleton_content() {
        let skeleton = r#"<jboss-deployment-structure>
            <ear-subdeployments-isolated>false</ear-subdeployments-isolated>
            <deployment>
                <exclusions><module name="org.apache.log4j"/></exclusions>
                <dependencies>
                    <module name="modB" export="true"/>
                </dependencies>
            </deployment>
        </jboss-deployment-structure>"#;
        let mut tree = parse_descriptor(skeleton, "skeleton").unwrap();
        let before = tree.len();

        let added = merge_modules(&mut tree, &["modA", "modB"]).unwrap();
        assert_eq!(added, 1);
        assert_eq!(tree.len(), before + 1);
        assert_eq!(deployment_modules(&tree), vec!["modB", "modA"]);

        let deployment = tree.find_child(tree.root(), DEPLOYMENT_TAG, None).unwrap();
        let deps = tree.find_child(deployment, DEPENDENCIES_TAG, None).unwrap();
        let existing = tree.find_child(deps, MODULE_TAG, Some(("name", "modB"))).unwrap();
        assert_eq!(tree.attribute(existing, "export"), Some("true"));
        assert!(tree.find_child(deployment, "exclusions", None).is_some());
    }

    #[test]
    fn test_deployment_created_as_first_child() {
        let skeleton = r#"<jboss-deployment-structure>
            <sub-deployment name="other.war"/>
        </jboss-deployment-structure>"#;
        let mut tree = parse_descriptor(skeleton, "skeleton").unwrap();
        merge_modules(&mut tree, &["modA"]).unwrap();

        let first = tree.children(tree.root()).next().unwrap();
        assert_eq!(tree.tag(first), DEPLOYMENT_TAG);
    }

    #[test]
    fn test_namespaced_skeleton_accepted() {
        let skeleton = r#"<jbds:jboss-deployment-structure xmlns:jbds="urn:jboss:deployment-structure:1.2">
            <jbds:deployment><jbds:dependencies/></jbds:deployment>
        </jbds:jboss-deployment-structure>"#;
        let mut tree = parse_descriptor(skeleton, "skeleton").unwrap();
        merge_modules(&mut tree, &["modA"]).unwrap();

        assert_eq!(tree.find_children(tree.root(), DEPLOYMENT_TAG).count(), 1);
        assert_eq!(deployment_modules(&tree), vec!["modA"]);
        assert!(write_descriptor(&tree).unwrap().contains("<jbds:module name=\"modA\"/>"));
    }

    #[test]
    fn test_created_nodes_take_root_prefix() {
        let skeleton = r#"<jbds:jboss-deployment-structure xmlns:jbds="urn:jboss:deployment-structure:1.2"/>"#;
        let mut tree = parse_descriptor(skeleton, "skeleton").unwrap();
        merge_modules(&mut tree, &["modA"]).unwrap();
        let specs = vec![spec_with("web-1.0.war", Some(nested(&["modB"])))];
        merge_sub_deployments(&mut tree, &specs, &["modA"]).unwrap();

        let xml = write_descriptor(&tree).unwrap();
        assert!(xml.contains("<jbds:deployment>"), "{}", xml);
        assert!(xml.contains("<jbds:dependencies>"));
        assert!(xml.contains("<jbds:module name=\"modA\"/>"));
        assert!(xml.contains("<jbds:sub-deployment name=\"web-1.0.war\">"));
        assert!(xml.contains("<jbds:module name=\"modB\"/>"));
        assert!(!xml.contains("<deployment"));
    }

    #[test]
    fn test_merge_keeps_skeleton_comments() {
        let skeleton = r#"<jboss-deployment-structure>
            <!-- keep: owned by ops team -->
            <deployment><dependencies/></deployment>
        </jboss-deployment-structure>"#;
        let mut tree = parse_descriptor(skeleton, "skeleton").unwrap();
        merge_modules(&mut tree, &["modA"]).unwrap();

        let xml = write_descriptor(&tree).unwrap();
        assert!(xml.contains("<!-- keep: owned by ops team -->"));
        assert!(xml.contains("<module name=\"modA\"/>"));
    }

    #[test]
    fn test_wrong_root_is_schema_error() {
        let mut tree = DescriptorTree::new("web-app");
        let err = merge_modules(&mut tree, &["modA"]).unwrap_err();
        assert!(matches!(err, StructureError::Schema { .. }));
        assert_eq!(tree.len(), 1);
    }

    #[test]
    fn test_sub_deployment_subtracts_top_level() {
        let mut tree = default_skeleton();
        merge_modules(&mut tree, &["modA"]).unwrap();

        let specs = vec![spec_with("web-1.0.war", Some(nested(&["modA", "modC"])))];
        let added = merge_sub_deployments(&mut tree, &specs, &["modA"]).unwrap();

        assert_eq!(added, 1);
        assert_eq!(sub_modules(&tree, "web-1.0.war"), vec!["modC"]);
        assert_eq!(deployment_modules(&tree), vec!["modA"]);
    }

    #[test]
    fn test_sub_deployment_reuses_existing_section() {
        let skeleton = r#"<jboss-deployment-structure>
            <sub-deployment name="web-1.0.war">
                <dependencies><module name="modC"/></dependencies>
                <exclusions/>
            </sub-deployment>
        </jboss-deployment-structure>"#;
        let mut tree = parse_descriptor(skeleton, "skeleton").unwrap();

        let specs = vec![spec_with("web-1.0.war", Some(nested(&["modC", "modD"])))];
        merge_sub_deployments(&mut tree, &specs, &[] as &[&str]).unwrap();
        let once = tree.clone();
        merge_sub_deployments(&mut tree, &specs, &[] as &[&str]).unwrap();

        assert_eq!(tree, once);
        assert_eq!(tree.find_children(tree.root(), SUB_DEPLOYMENT_TAG).count(), 1);
        assert_eq!(sub_modules(&tree, "web-1.0.war"), vec!["modC", "modD"]);
    }

    #[test]
    fn test_missing_nested_descriptor_fails() {
        let mut tree = default_skeleton();
        let specs = vec![spec_with("web-1.0.war", None)];
        let err = merge_sub_deployments(&mut tree, &specs, &[] as &[&str]).unwrap_err();

        match err {
            StructureError::MissingNestedDescriptor { declared, archive } => {
                assert_eq!(declared, "com.example:web");
                assert_eq!(archive, "web-1.0.war");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_nested_tree_with_wrong_root_fails() {
        let mut tree = default_skeleton();
        let specs = vec![spec_with("web-1.0.war", Some(DescriptorTree::new("web-app")))];
        let err = merge_sub_deployments(&mut tree, &specs, &[] as &[&str]).unwrap_err();
        assert!(err.to_string().contains("web-1.0.war"));
    }
}
