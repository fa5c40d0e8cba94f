//! Deployment-structure descriptor model.
//!
//! The descriptor is held as a generic [`DescriptorTree`]; this module adds
//! the vocabulary of the `jboss-deployment-structure.xml` format and the XML
//! codec.
//!
//! ```text
//! jboss-deployment-structure
//! ├── deployment
//! │   └── dependencies
//! │       └── module name=...
//! └── sub-deployment name=<archive file name>
//!     └── dependencies
//!         └── module name=...
//! ```

mod tree;
pub mod xml;

pub use tree::{local_name, prefixed_like, DescriptorTree, NodeId, NodeKind};
pub use xml::{parse_descriptor, write_descriptor};

/// Root element of every descriptor.
pub const ROOT_TAG: &str = "jboss-deployment-structure";

/// Top-level deployment section.
pub const DEPLOYMENT_TAG: &str = "deployment";

/// Dependency list inside a deployment or sub-deployment.
pub const DEPENDENCIES_TAG: &str = "dependencies";

/// A single module reference.
pub const MODULE_TAG: &str = "module";

/// A nested deployment section.
pub const SUB_DEPLOYMENT_TAG: &str = "sub-deployment";

/// Attribute naming a module or sub-deployment archive.
pub const NAME_ATTR: &str = "name";

/// File name of a top-level descriptor.
pub const DEPLOYMENT_STRUCTURE_FILE: &str = "jboss-deployment-structure.xml";

/// File name of a descriptor generated for an artifact that will itself be
/// embedded as a sub-deployment.
pub const SUB_DEPLOYMENT_FILE: &str = "jboss-subdeployment.xml";

/// Template used when no skeleton file is present.
pub const DEFAULT_SKELETON: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<jboss-deployment-structure xmlns="urn:jboss:deployment-structure:1.2">
</jboss-deployment-structure>
"#;

/// The built-in skeleton as a tree.
pub fn default_skeleton() -> DescriptorTree {
    let mut tree = DescriptorTree::new(ROOT_TAG);
    let root = tree.root();
    tree.set_attribute(root, "xmlns", "urn:jboss:deployment-structure:1.2");
    tree
}

/// Module names under the `dependencies` of a deployment or sub-deployment
/// section, in document order.
pub fn section_modules(tree: &DescriptorTree, section: NodeId) -> Vec<String> {
    tree.find_children(section, DEPENDENCIES_TAG)
        .flat_map(|deps| tree.find_children(deps, MODULE_TAG))
        .filter_map(|module| tree.attribute(module, NAME_ATTR).map(str::to_string))
        .collect()
}
