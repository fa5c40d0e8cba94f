//! Property tests for classification and merging.
//!
//! Run with: `cargo test --test merge_properties`

use std::collections::BTreeSet;

use proptest::prelude::*;

use depstructure::classifier::{classify, ClassifierPolicy};
use depstructure::coordinate::{Coordinate, DependencyRecord};
use depstructure::descriptor::{
    default_skeleton, section_modules, DescriptorTree, DEPLOYMENT_TAG, NAME_ATTR,
    SUB_DEPLOYMENT_TAG,
};
use depstructure::dictionary::{Dictionary, DictionaryBuilder};
use depstructure::merge::{merge_modules, merge_sub_deployments, SubDeploymentSpec};

const MODULES: &[&str] = &["modA", "modB", "modC", "modD", "modE", "modF"];
const GROUPS: &[&str] = &["org.a", "org.b", "org.c", "org.d", "com.unmapped"];
const SCOPES: &[&str] = &["provided", "compile", "runtime", "system"];
const TYPES: &[&str] = &["jar", "pom", "war"];

fn module_set() -> impl Strategy<Value = Vec<&'static str>> {
    prop::collection::vec(prop::sample::select(MODULES.to_vec()), 0..10)
}

fn records() -> impl Strategy<Value = Vec<DependencyRecord>> {
    prop::collection::vec(
        (
            prop::sample::select(GROUPS.to_vec()),
            prop::sample::select(SCOPES.to_vec()),
            prop::sample::select(TYPES.to_vec()),
        )
            .prop_map(|(group, scope, artifact_type)| {
                DependencyRecord::new(Coordinate::new(group, "lib", "1.0"), scope, artifact_type)
            }),
        0..20,
    )
}

fn dictionary() -> Dictionary {
    DictionaryBuilder::new()
        .load_str(
            "props",
            "org.a:lib=modA\norg.b:lib=modB\norg.c:lib=modC\norg.d:lib=modA",
        )
        .unwrap()
        .build()
}

fn tree_with(modules: &[&str]) -> DescriptorTree {
    let mut tree = default_skeleton();
    merge_modules(&mut tree, modules).unwrap();
    tree
}

fn deployment_modules(tree: &DescriptorTree) -> Vec<String> {
    tree.find_child(tree.root(), DEPLOYMENT_TAG, None)
        .map(|deployment| section_modules(tree, deployment))
        .unwrap_or_default()
}

proptest! {
    #[test]
    fn test_merge_is_idempotent(existing in module_set(), added in module_set()) {
        let mut tree = tree_with(&existing);
        merge_modules(&mut tree, added.as_slice()).unwrap();
        let once = tree.clone();

        let second = merge_modules(&mut tree, added.as_slice()).unwrap();
        prop_assert_eq!(second, 0);
        prop_assert_eq!(tree, once);
    }

    #[test]
    fn test_merge_is_union(existing in module_set(), added in module_set()) {
        let mut tree = tree_with(&existing);
        let before = deployment_modules(&tree);
        merge_modules(&mut tree, added.as_slice()).unwrap();
        let after = deployment_modules(&tree);

        // Existing modules keep their place at the front.
        prop_assert_eq!(&after[..before.len()], before.as_slice());

        let expected: BTreeSet<&str> = existing.iter().chain(added.iter()).copied().collect();
        let actual: BTreeSet<&str> = after.iter().map(String::as_str).collect();
        prop_assert_eq!(actual, expected);
        prop_assert_eq!(after.len(), expected_len(&existing, &added));
    }

    #[test]
    fn test_sub_deployment_excludes_top_level(top in module_set(), nested in module_set()) {
        let mut tree = tree_with(&top);
        let mut spec = SubDeploymentSpec::new("com.example", "web");
        spec.resolved_archive_name = Some("web.war".to_string());
        spec.attach(tree_with(&nested));

        merge_sub_deployments(&mut tree, &[spec], top.as_slice()).unwrap();

        let section = tree
            .find_child(tree.root(), SUB_DEPLOYMENT_TAG, Some((NAME_ATTR, "web.war")))
            .unwrap();
        let merged: BTreeSet<String> = section_modules(&tree, section).into_iter().collect();
        let expected: BTreeSet<String> = nested
            .iter()
            .filter(|m| !top.contains(*m))
            .map(|m| m.to_string())
            .collect();
        prop_assert_eq!(merged, expected);
    }

    #[test]
    fn test_classification_partition(records in records()) {
        let dictionary = dictionary();
        let policy = ClassifierPolicy::default()
            .with_scopes(["provided", "system"])
            .with_types(["jar"])
            .with_exclusions(["org.c"]);

        let result = classify(&records, &policy, &dictionary).unwrap();
        let hits = records
            .iter()
            .filter(|r| dictionary.resolve(&r.coordinate).is_some())
            .count();

        prop_assert_eq!(result.assignments.len() + result.diagnostics.len(), hits);
        prop_assert_eq!(result.unmapped, records.len() - hits);

        for assignment in &result.assignments {
            prop_assert!(policy.scope_allowed(&assignment.record.scope));
            prop_assert!(policy.type_allowed(&assignment.record.artifact_type));
            prop_assert_ne!(assignment.record.coordinate.group.as_str(), "org.c");
        }
    }
}

fn expected_len(existing: &[&str], added: &[&str]) -> usize {
    existing.iter().chain(added.iter()).collect::<BTreeSet<_>>().len()
}
