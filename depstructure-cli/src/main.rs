//! depstructure CLI - Command-line interface
//!
//! Generates `jboss-deployment-structure.xml` descriptors from a resolved
//! dependency list, and inspects the module dictionary and configuration.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};

mod commands;
mod error;
mod logging;

use commands::config::ConfigCommands;
use commands::generate::GenerateArgs;
use error::CliError;

/// depstructure - deployment structure generator
#[derive(Debug, Parser)]
#[command(name = "depstructure")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Configuration file (default: ./depstructure.ini)
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Generate the deployment structure descriptor
    Generate(GenerateArgs),

    /// Show which module a coordinate resolves to
    Resolve {
        /// Coordinate as group:name[:version]
        coordinate: String,

        /// Additional dictionary file (repeatable, later files win)
        #[arg(long = "dictionary", value_name = "FILE")]
        dictionaries: Vec<PathBuf>,
    },

    /// List dictionary layers, or the entries of one layer
    Dictionary {
        /// Layer ordinal to list (0 is the built-in layer)
        #[arg(long)]
        layer: Option<usize>,

        /// Additional dictionary file (repeatable, later files win)
        #[arg(long = "dictionary", value_name = "FILE")]
        dictionaries: Vec<PathBuf>,
    },

    /// View or modify configuration
    #[command(subcommand)]
    Config(ConfigCommands),
}

fn run(cli: Cli) -> Result<(), CliError> {
    let config = cli.config.as_deref();
    match cli.command {
        Commands::Generate(args) => commands::generate::run(args, config, cli.verbose),
        Commands::Resolve {
            coordinate,
            dictionaries,
        } => {
            logging::init(cli.verbose);
            commands::resolve::run(&coordinate, &dictionaries, config)
        }
        Commands::Dictionary {
            layer,
            dictionaries,
        } => {
            logging::init(cli.verbose);
            commands::dictionary::run(layer, &dictionaries, config)
        }
        Commands::Config(command) => commands::config::run(command, config),
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}
