//! The `resolve` command: look a coordinate up in the dictionary.

use std::path::{Path, PathBuf};

use depstructure::coordinate::Coordinate;

use super::common::{build_dictionary, load_config};
use crate::error::CliError;

/// Run `resolve`.
pub fn run(
    coordinate: &str,
    dictionaries: &[PathBuf],
    config_path: Option<&Path>,
) -> Result<(), CliError> {
    let coordinate: Coordinate = coordinate.parse().map_err(CliError::InvalidCoordinate)?;
    let config = load_config(config_path)?;
    let dictionary = build_dictionary(&config, dictionaries)?;

    match dictionary.lookup(&coordinate) {
        Some(resolution) => {
            let tier = if resolution.versioned {
                "versioned"
            } else {
                "unversioned"
            };
            println!("{} -> {}", coordinate, resolution.module_name);
            println!(
                "  layer {} ({}), {} match",
                resolution.layer, resolution.source, tier
            );
        }
        None => println!("{} -> (no module)", coordinate),
    }

    Ok(())
}
