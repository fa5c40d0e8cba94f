//! The `dictionary` command: show the layers and their effective entries.

use std::path::{Path, PathBuf};

use depstructure::dictionary::Dictionary;

use super::common::{build_dictionary, load_config};
use crate::error::CliError;

/// Run `dictionary`.
///
/// Without `layer` every layer is listed with its entry count; with it, the
/// entries of that layer are printed one `key=module` per line.
pub fn run(
    layer: Option<usize>,
    dictionaries: &[PathBuf],
    config_path: Option<&Path>,
) -> Result<(), CliError> {
    let config = load_config(config_path)?;
    let dictionary = build_dictionary(&config, dictionaries)?;

    match layer {
        None => print_layers(&dictionary),
        Some(ordinal) => {
            if ordinal >= dictionary.layer_count() {
                return Err(CliError::Config(format!(
                    "No dictionary layer {} (loaded {} layers)",
                    ordinal,
                    dictionary.layer_count()
                )));
            }
            for line in layer_lines(&dictionary, ordinal) {
                println!("{}", line);
            }
        }
    }

    Ok(())
}

fn print_layers(dictionary: &Dictionary) {
    println!("Dictionary Layers (highest wins)");
    println!("================================");
    for (ordinal, source) in dictionary.sources().enumerate() {
        println!(
            "  {:>2}  {:<40} {} entries",
            ordinal,
            source,
            dictionary.layer_entries(ordinal).len()
        );
    }
}

fn layer_lines(dictionary: &Dictionary, ordinal: usize) -> Vec<String> {
    dictionary
        .layer_entries(ordinal)
        .into_iter()
        .map(|entry| format!("{}={}", entry.key, entry.module_name))
        .collect()
}
