//! The `generate` command.

use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use clap::Args;
use depstructure::archive::{ArchiveDescriptorSource, ShellArchiveReader};
use depstructure::config::ConfigFile;
use depstructure::coordinate::read_dependency_list;
use depstructure::descriptor::write_descriptor;
use depstructure::generator::{GenerateOptions, Generation, Generator};

use super::common::{build_dictionary, load_config};
use crate::error::CliError;
use crate::logging;

/// Arguments for `generate`.
#[derive(Debug, Args)]
pub struct GenerateArgs {
    /// Dependency list file, one `group:name:type:version:scope[:path]` per line
    #[arg(long, value_name = "FILE")]
    pub dependencies: Option<PathBuf>,

    /// Directory containing a skeleton jboss-deployment-structure.xml
    #[arg(long, value_name = "DIR")]
    pub skeleton_dir: Option<PathBuf>,

    /// Additional dictionary file (repeatable, later files win)
    #[arg(long = "dictionary", value_name = "FILE")]
    pub dictionaries: Vec<PathBuf>,

    /// Write the descriptor to this directory instead of the packaging default
    #[arg(long, value_name = "DIR")]
    pub destination_dir: Option<PathBuf>,

    /// Print the descriptor instead of writing it
    #[arg(long)]
    pub dry_run: bool,
}

impl GenerateArgs {
    /// Apply command-line overrides to a loaded configuration.
    pub fn apply(&self, config: &mut ConfigFile) {
        if let Some(path) = &self.dependencies {
            config.input.dependencies = Some(path.clone());
        }
        if let Some(dir) = &self.skeleton_dir {
            config.skeleton.dir = dir.clone();
        }
        if let Some(dir) = &self.destination_dir {
            config.output.destination_dir = Some(dir.clone());
        }
    }
}

/// Run `generate`.
pub fn run(args: GenerateArgs, config_path: Option<&Path>, verbose: bool) -> Result<(), CliError> {
    let mut config = load_config(config_path)?;
    args.apply(&mut config);
    logging::init(verbose || config.generate.verbose);

    let dependencies = config
        .input
        .dependencies
        .clone()
        .ok_or(CliError::MissingDependencies)?;
    let records = read_dependency_list(&dependencies)?;
    tracing::info!(
        path = %dependencies.display(),
        records = records.len(),
        "Read dependency list"
    );

    let dictionary = Arc::new(build_dictionary(&config, &args.dictionaries)?);
    let generator = Generator::new(
        dictionary,
        ArchiveDescriptorSource::new(ShellArchiveReader::new()),
        GenerateOptions::from_config(&config),
    );

    let generation = generator.run(&records)?;
    print_summary(&generation);

    let Some(tree) = &generation.tree else {
        println!("Generation disabled; analysis only.");
        return Ok(());
    };

    if args.dry_run {
        let xml = write_descriptor(tree)?;
        io::stdout()
            .lock()
            .write_all(xml.as_bytes())
            .map_err(CliError::Output)?;
    } else {
        let path = generator.write(tree)?;
        println!("Wrote {}", path.display());
    }

    Ok(())
}

fn print_summary(generation: &Generation) {
    let classification = &generation.classification;
    println!(
        "Mapped {} dependencies to {} modules ({} rejected, {} unmapped)",
        classification.assignments.len(),
        classification.module_names().len(),
        classification.diagnostics.len(),
        classification.unmapped
    );
    if generation.tree.is_some() {
        println!(
            "Added {} deployment modules, {} sub-deployment modules",
            generation.modules_added, generation.sub_modules_added
        );
    }
    for diagnostic in &generation.diagnostics {
        println!("  [{}] {}", diagnostic.kind(), diagnostic);
    }
}
