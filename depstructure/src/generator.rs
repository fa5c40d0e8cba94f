//! One generation run, from dependency records to a written descriptor.
//!
//! ```text
//! records ──classify──▶ Classification
//!                          │ module names
//! skeleton ───────────────▶ merge_modules ──▶ merge_sub_deployments ──▶ report
//!                                                   ▲
//! sub-deployment archives ──NestedDescriptorSource──┘
//! ```
//!
//! A [`Generator`] holds only shared read-only state (the dictionary) and its
//! options, so separate runs for different artifacts may proceed in parallel.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::archive::NestedDescriptorSource;
use crate::classifier::{classify, Classification, ClassifierPolicy};
use crate::config::ConfigFile;
use crate::coordinate::DependencyRecord;
use crate::descriptor::{
    default_skeleton, parse_descriptor, write_descriptor, DescriptorTree,
    DEPLOYMENT_STRUCTURE_FILE, SUB_DEPLOYMENT_FILE,
};
use crate::diagnostics::Diagnostic;
use crate::dictionary::Dictionary;
use crate::error::{StructureError, StructureResult};
use crate::merge::{merge_modules, merge_sub_deployments, SubDeploymentSpec};
use crate::report::report;

/// Where the generated descriptor goes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputLayout {
    pub packaging: String,
    pub build_dir: PathBuf,
    pub output_dir: PathBuf,
    pub final_name: String,
    pub destination_dir: Option<PathBuf>,
}

impl Default for OutputLayout {
    fn default() -> Self {
        Self {
            packaging: "jar".to_string(),
            build_dir: PathBuf::from("target"),
            output_dir: PathBuf::from("target/classes"),
            final_name: String::new(),
            destination_dir: None,
        }
    }
}

impl OutputLayout {
    /// Directory the descriptor is written to.
    ///
    /// An explicit destination wins. Otherwise `war` archives get
    /// `WEB-INF` and `ear` archives `META-INF` of the exploded archive
    /// directory, and everything else `META-INF` of the output directory.
    pub fn target_dir(&self) -> PathBuf {
        if let Some(dir) = &self.destination_dir {
            return dir.clone();
        }
        if self.packaging.eq_ignore_ascii_case("war") {
            self.build_dir.join(&self.final_name).join("WEB-INF")
        } else if self.packaging.eq_ignore_ascii_case("ear") {
            self.build_dir.join(&self.final_name).join("META-INF")
        } else {
            self.output_dir.join("META-INF")
        }
    }
}

/// Options for a generation run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerateOptions {
    /// Produce a descriptor; when false only classification runs.
    pub generate: bool,

    /// The artifact is itself embedded as a sub-deployment.
    pub is_sub_deployment: bool,

    /// Log rejected dependencies at warn level instead of debug.
    pub print_artifact_warnings: bool,

    pub policy: ClassifierPolicy,

    /// Directory holding `jboss-deployment-structure.xml`, if any.
    pub skeleton_dir: Option<PathBuf>,

    /// Declared sub-deployments (`group:name`).
    pub sub_deployments: Vec<String>,

    pub output: OutputLayout,
}

impl Default for GenerateOptions {
    fn default() -> Self {
        Self {
            generate: true,
            is_sub_deployment: false,
            print_artifact_warnings: false,
            policy: ClassifierPolicy::default(),
            skeleton_dir: None,
            sub_deployments: Vec::new(),
            output: OutputLayout::default(),
        }
    }
}

impl GenerateOptions {
    /// Options from a loaded configuration file.
    pub fn from_config(config: &ConfigFile) -> Self {
        Self {
            generate: config.generate.enabled,
            is_sub_deployment: config.generate.sub_deployment,
            print_artifact_warnings: config.generate.print_artifact_warnings,
            policy: config.policy(),
            skeleton_dir: Some(config.skeleton.dir.clone()),
            sub_deployments: config.sub_deployments.artifacts.clone(),
            output: OutputLayout {
                packaging: config.output.packaging.clone(),
                build_dir: config.output.build_dir.clone(),
                output_dir: config.output.output_dir.clone(),
                final_name: config.output.final_name.clone(),
                destination_dir: config.output.destination_dir.clone(),
            },
        }
    }

    /// File name of the descriptor.
    pub fn output_file_name(&self) -> &'static str {
        if self.is_sub_deployment {
            SUB_DEPLOYMENT_FILE
        } else {
            DEPLOYMENT_STRUCTURE_FILE
        }
    }

    /// Full path of the descriptor.
    pub fn output_path(&self) -> PathBuf {
        self.output.target_dir().join(self.output_file_name())
    }
}

/// Outcome of a run.
#[derive(Debug, Clone)]
pub struct Generation {
    pub classification: Classification,

    /// Merged descriptor; `None` in analysis-only mode.
    pub tree: Option<DescriptorTree>,

    /// Classification findings followed by consistency findings.
    pub diagnostics: Vec<Diagnostic>,

    /// Module nodes added to the deployment section.
    pub modules_added: usize,

    /// Module nodes added across sub-deployment sections.
    pub sub_modules_added: usize,
}

/// Build a dictionary from the built-in layer and extra files.
///
/// Files that do not exist are skipped with a warning.
pub fn load_dictionary(files: &[PathBuf]) -> StructureResult<Dictionary> {
    let mut builder = Dictionary::builder().with_builtin()?;
    for file in files {
        builder = builder.load_file_if_exists(file)?;
    }
    Ok(builder.build())
}

/// Load `<dir>/jboss-deployment-structure.xml`, or the built-in template.
pub fn load_skeleton(dir: Option<&Path>) -> StructureResult<DescriptorTree> {
    let Some(path) = dir.map(|d| d.join(DEPLOYMENT_STRUCTURE_FILE)).filter(|p| p.is_file()) else {
        tracing::debug!("No skeleton file, starting from the built-in template");
        return Ok(default_skeleton());
    };

    tracing::info!(path = %path.display(), "Using skeleton");
    let content = fs::read_to_string(&path).map_err(|e| StructureError::io(&path, e))?;
    parse_descriptor(&content, &path.display().to_string())
}

/// Runs the pipeline for one artifact.
pub struct Generator<S> {
    dictionary: Arc<Dictionary>,
    source: S,
    options: GenerateOptions,
}

impl<S: NestedDescriptorSource> Generator<S> {
    /// Create a generator.
    pub fn new(dictionary: Arc<Dictionary>, source: S, options: GenerateOptions) -> Self {
        Self {
            dictionary,
            source,
            options,
        }
    }

    /// Classify `records` and, when enabled, build the merged descriptor.
    pub fn run(&self, records: &[DependencyRecord]) -> StructureResult<Generation> {
        let classification = classify(records, &self.options.policy, &self.dictionary)?;
        for diagnostic in &classification.diagnostics {
            if self.options.print_artifact_warnings {
                tracing::warn!(kind = diagnostic.kind(), "{}", diagnostic);
            } else {
                tracing::debug!(kind = diagnostic.kind(), "{}", diagnostic);
            }
        }

        let mut diagnostics = classification.diagnostics.clone();

        if !self.options.generate {
            tracing::info!("Generation disabled, dependency analysis only");
            return Ok(Generation {
                classification,
                tree: None,
                diagnostics,
                modules_added: 0,
                sub_modules_added: 0,
            });
        }

        let specs = self.resolve_sub_deployments(records)?;
        let mut tree = load_skeleton(self.options.skeleton_dir.as_deref())?;

        let modules = classification.module_names();
        let modules_added = merge_modules(&mut tree, modules.as_slice())?;
        let sub_modules_added = merge_sub_deployments(&mut tree, &specs, modules.as_slice())?;

        let findings = report(&tree, &classification.reverse, &self.options.policy);
        for finding in &findings {
            tracing::warn!(kind = finding.kind(), "{}", finding);
        }
        diagnostics.extend(findings);

        Ok(Generation {
            classification,
            tree: Some(tree),
            diagnostics,
            modules_added,
            sub_modules_added,
        })
    }

    /// Locate every declared sub-deployment and attach its nested descriptor.
    pub fn resolve_sub_deployments(
        &self,
        records: &[DependencyRecord],
    ) -> StructureResult<Vec<SubDeploymentSpec>> {
        if !self.options.sub_deployments.is_empty() {
            tracing::info!(
                sub_deployments = ?self.options.sub_deployments,
                "Resolving sub-deployments"
            );
        }

        let mut specs = Vec::with_capacity(self.options.sub_deployments.len());
        for declaration in &self.options.sub_deployments {
            let mut spec = SubDeploymentSpec::parse(declaration)?;
            spec.locate(records)?;

            let archive = spec
                .archive_path
                .clone()
                .ok_or_else(|| StructureError::SubDeploymentNotFound(spec.declared_name()))?;
            let nested = self.source.nested_descriptor(&archive)?.ok_or_else(|| {
                StructureError::MissingNestedDescriptor {
                    declared: spec.declared_name(),
                    archive: archive.display().to_string(),
                }
            })?;

            spec.attach(nested);
            specs.push(spec);
        }
        Ok(specs)
    }

    /// Write a merged descriptor to its output location.
    pub fn write(&self, tree: &DescriptorTree) -> StructureResult<PathBuf> {
        write_output(tree, &self.options.output_path())
    }
}

/// Serialize `tree` to `path`, creating parent directories.
pub fn write_output(tree: &DescriptorTree, path: &Path) -> StructureResult<PathBuf> {
    let xml = write_descriptor(tree)?;
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| StructureError::io(parent, e))?;
    }
    fs::write(path, xml).map_err(|e| StructureError::io(path, e))?;
    tracing::info!(path = %path.display(), "Wrote deployment structure");
    Ok(path.to_path_buf())
}
