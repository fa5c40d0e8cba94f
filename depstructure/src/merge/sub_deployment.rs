//! Sub-deployment declarations.
//!
//! A sub-deployment is declared in configuration as `group:name`. It is then
//! filled in two steps: [`locate`](SubDeploymentSpec::locate) finds the
//! packaged archive among the resolved dependencies, and
//! [`attach`](SubDeploymentSpec::attach) stores the descriptor extracted
//! from that archive.

use std::path::PathBuf;

use crate::coordinate::DependencyRecord;
use crate::descriptor::DescriptorTree;
use crate::error::{StructureError, StructureResult};

/// A declared sub-deployment and what is known about it so far.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubDeploymentSpec {
    /// Group of the embedded artifact.
    pub group: String,

    /// Name of the embedded artifact.
    pub name: String,

    /// Archive file name, once located (e.g. `orders-web-2.1.0.war`).
    pub resolved_archive_name: Option<String>,

    /// Archive path, once located.
    pub archive_path: Option<PathBuf>,

    /// Descriptor extracted from the archive, once attached.
    pub nested_tree: Option<DescriptorTree>,
}

impl SubDeploymentSpec {
    /// Create a declaration for `group:name`.
    pub fn new(group: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            group: group.into(),
            name: name.into(),
            resolved_archive_name: None,
            archive_path: None,
            nested_tree: None,
        }
    }

    /// Parse a `group:name` declaration.
    pub fn parse(declaration: &str) -> StructureResult<Self> {
        match declaration.trim().split(':').map(str::trim).collect::<Vec<_>>().as_slice() {
            [group, name] if !group.is_empty() && !name.is_empty() => Ok(Self::new(*group, *name)),
            _ => Err(StructureError::InvalidSubDeployment(declaration.to_string())),
        }
    }

    /// The declaration as written in configuration.
    pub fn declared_name(&self) -> String {
        format!("{}:{}", self.group, self.name)
    }

    /// Find the archive among resolved dependencies.
    ///
    /// Fails when no dependency matches or the match has no archive file.
    pub fn locate(&mut self, records: &[DependencyRecord]) -> StructureResult<&mut Self> {
        let record = records
            .iter()
            .find(|r| r.coordinate.same_artifact(&self.group, &self.name))
            .ok_or_else(|| StructureError::SubDeploymentNotFound(self.declared_name()))?;

        let (Some(path), Some(archive_name)) = (record.file.clone(), record.archive_name()) else {
            return Err(StructureError::SubDeploymentNotFound(self.declared_name()));
        };

        tracing::debug!(
            sub_deployment = %self.declared_name(),
            archive = %path.display(),
            "Located sub-deployment archive"
        );

        self.resolved_archive_name = Some(archive_name);
        self.archive_path = Some(path);
        Ok(self)
    }

    /// Store the descriptor extracted from the archive.
    pub fn attach(&mut self, tree: DescriptorTree) -> &mut Self {
        self.nested_tree = Some(tree);
        self
    }
}
