//! depstructure - Deployment structure generation for modular application servers
//!
//! This library maps a packaged artifact's resolved dependencies to the
//! server modules they correspond to and merges those module references into
//! a `jboss-deployment-structure.xml` descriptor, leaving hand-authored
//! content in place.
//!
//! # Example
//!
//! ```
//! use depstructure::classifier::{classify, ClassifierPolicy};
//! use depstructure::coordinate::{Coordinate, DependencyRecord};
//! use depstructure::descriptor::default_skeleton;
//! use depstructure::dictionary::Dictionary;
//! use depstructure::merge::merge_modules;
//!
//! let dictionary = Dictionary::builder()
//!     .load_str("inline", "org.x:lib=modX")?
//!     .build();
//! let records = vec![DependencyRecord::new(
//!     Coordinate::new("org.x", "lib", "1.0"),
//!     "provided",
//!     "jar",
//! )];
//!
//! let classification = classify(&records, &ClassifierPolicy::default(), &dictionary)?;
//! let mut tree = default_skeleton();
//! merge_modules(&mut tree, classification.module_names().as_slice())?;
//! # Ok::<(), depstructure::StructureError>(())
//! ```

pub mod archive;
pub mod classifier;
pub mod config;
pub mod coordinate;
pub mod descriptor;
pub mod diagnostics;
pub mod dictionary;
pub mod error;
pub mod generator;
pub mod merge;
pub mod report;

pub use error::{StructureError, StructureResult};
