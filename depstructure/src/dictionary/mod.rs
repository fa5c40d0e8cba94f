//! Layered coordinate-to-module dictionary.
//!
//! A [`Dictionary`] is an ordered list of layers. Layer 0 is normally the
//! built-in mapping of the server's standard modules; every further layer is
//! a user supplied dictionary file, in the order it was configured.
//!
//! # Resolution
//!
//! Resolution is two-tiered:
//!
//! 1. `group:name:version` is looked up from the highest layer down.
//! 2. If no layer has a versioned hit, `group:name` is looked up the same way.
//!
//! So a versioned entry in any layer beats an unversioned entry in any layer,
//! and within a tier the most recently loaded layer wins. There is no
//! wildcard or partial matching.
//!
//! ```
//! use depstructure::coordinate::Coordinate;
//! use depstructure::dictionary::DictionaryBuilder;
//!
//! let dictionary = DictionaryBuilder::new()
//!     .load_str("base", "g:a=mod.base")?
//!     .load_str("override", "g:a=mod.override\ng:a:2.0=mod.two")?
//!     .build();
//!
//! assert_eq!(dictionary.resolve(&Coordinate::new("g", "a", "2.0")), Some("mod.two"));
//! assert_eq!(dictionary.resolve(&Coordinate::new("g", "a", "1.0")), Some("mod.override"));
//! # Ok::<(), depstructure::StructureError>(())
//! ```

mod parse;

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use crate::coordinate::Coordinate;
use crate::error::{StructureError, StructureResult};

/// Source name reported for the built-in layer.
pub const BUILTIN_SOURCE: &str = "<built-in>";

const BUILTIN_DICTIONARY: &str = include_str!("builtin.dict");

/// One effective mapping in a dictionary layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DictEntry {
    /// Lookup key; the version is optional.
    pub key: Coordinate,

    /// Module the key maps to.
    pub module_name: String,

    /// Ordinal of the layer holding the entry (0 = first loaded).
    pub layer: usize,
}

/// Outcome of a successful dictionary lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Resolution<'a> {
    /// The resolved module name.
    pub module_name: &'a str,

    /// Ordinal of the layer that supplied the mapping.
    pub layer: usize,

    /// Name of the source the layer was loaded from.
    pub source: &'a str,

    /// Whether the versioned key matched (as opposed to `group:name`).
    pub versioned: bool,
}

#[derive(Debug, Clone)]
struct Layer {
    ordinal: usize,
    source: String,
    entries: HashMap<Coordinate, String>,
}

/// Immutable, layered mapping from coordinates to module names.
///
/// Built once per run through [`DictionaryBuilder`]; safe to share across
/// threads afterwards.
#[derive(Debug, Clone, Default)]
pub struct Dictionary {
    layers: Vec<Layer>,
}

impl Dictionary {
    /// Start building a dictionary.
    pub fn builder() -> DictionaryBuilder {
        DictionaryBuilder::new()
    }

    /// A dictionary holding only the built-in layer.
    pub fn builtin() -> StructureResult<Self> {
        Ok(DictionaryBuilder::new().with_builtin()?.build())
    }

    /// Number of loaded layers.
    pub fn layer_count(&self) -> usize {
        self.layers.len()
    }

    /// Total number of effective entries across all layers.
    pub fn entry_count(&self) -> usize {
        self.layers.iter().map(|l| l.entries.len()).sum()
    }

    /// Source names of all layers in load order.
    pub fn sources(&self) -> impl Iterator<Item = &str> + '_ {
        self.layers.iter().map(|l| l.source.as_str())
    }

    /// All effective entries of one layer, sorted by key.
    pub fn layer_entries(&self, ordinal: usize) -> Vec<DictEntry> {
        let Some(layer) = self.layers.get(ordinal) else {
            return Vec::new();
        };
        let mut entries: Vec<DictEntry> = layer
            .entries
            .iter()
            .map(|(key, module)| DictEntry {
                key: key.clone(),
                module_name: module.clone(),
                layer: layer.ordinal,
            })
            .collect();
        entries.sort_by(|a, b| a.key.cmp(&b.key));
        entries
    }

    /// Look up a coordinate, reporting which layer and tier matched.
    pub fn lookup(&self, coordinate: &Coordinate) -> Option<Resolution<'_>> {
        if coordinate.version.is_some() {
            if let Some(hit) = self.lookup_key(coordinate, true) {
                return Some(hit);
            }
        }
        self.lookup_key(&coordinate.without_version(), false)
    }

    /// Resolve a coordinate to a module name.
    pub fn resolve(&self, coordinate: &Coordinate) -> Option<&str> {
        self.lookup(coordinate).map(|r| r.module_name)
    }

    fn lookup_key(&self, key: &Coordinate, versioned: bool) -> Option<Resolution<'_>> {
        self.layers.iter().rev().find_map(|layer| {
            layer.entries.get(key).map(|module| Resolution {
                module_name: module.as_str(),
                layer: layer.ordinal,
                source: layer.source.as_str(),
                versioned,
            })
        })
    }
}

/// Builder that appends dictionary layers in load order.
#[derive(Debug, Default)]
pub struct DictionaryBuilder {
    layers: Vec<Layer>,
}

impl DictionaryBuilder {
    /// Create an empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append the built-in layer.
    pub fn with_builtin(self) -> StructureResult<Self> {
        self.load_str(BUILTIN_SOURCE, BUILTIN_DICTIONARY)
    }

    /// Parse `content` and append it as a new layer.
    ///
    /// Fails with [`StructureError::Format`] on the first malformed line; no
    /// layer is appended in that case.
    pub fn load_str(mut self, source_name: &str, content: &str) -> StructureResult<Self> {
        let ordinal = self.layers.len();
        let mut entries = HashMap::new();

        for (key, module) in parse::parse_layer(content, source_name)? {
            if let Some(previous) = entries.insert(key.clone(), module) {
                tracing::debug!(
                    source = source_name,
                    key = %key,
                    previous = %previous,
                    "Duplicate dictionary key, later line wins"
                );
            }
        }

        tracing::debug!(
            source = source_name,
            layer = ordinal,
            entries = entries.len(),
            "Loaded dictionary layer"
        );

        self.layers.push(Layer {
            ordinal,
            source: source_name.to_string(),
            entries,
        });
        Ok(self)
    }

    /// Read a dictionary file and append it as a new layer.
    pub fn load_file(self, path: &Path) -> StructureResult<Self> {
        let content = fs::read_to_string(path).map_err(|e| StructureError::io(path, e))?;
        self.load_str(&path.display().to_string(), &content)
    }

    /// Like [`load_file`](Self::load_file), but a missing file is skipped
    /// with a warning instead of failing the run.
    pub fn load_file_if_exists(self, path: &Path) -> StructureResult<Self> {
        if !path.exists() {
            tracing::warn!(path = %path.display(), "Dictionary file not found, skipping");
            return Ok(self);
        }
        self.load_file(path)
    }

    /// Finish building.
    pub fn build(self) -> Dictionary {
        Dictionary {
            layers: self.layers,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    fn layered() -> Dictionary {
        DictionaryBuilder::new()
            .load_str("l0", "g:a=mod.l0\ng:b=mod.b")
            .unwrap()
            .load_str("l1", "g:a=mod.l1\ng:a:2.0=mod.l1.v2")
            .unwrap()
            .build()
    }

    #[test]
    fn test_versioned_entry_wins() {
        let d = layered();
        assert_eq!(d.resolve(&Coordinate::new("g", "a", "2.0")), Some("mod.l1.v2"));
    }

    #[test]
    fn test_later_layer_overrides_unversioned() {
        let d = layered();
        assert_eq!(d.resolve(&Coordinate::new("g", "a", "1.0")), Some("mod.l1"));
    }

    #[test]
    fn test_versioned_in_lower_layer_beats_unversioned_in_higher() {
        let d = DictionaryBuilder::new()
            .load_str("l0", "g:a:1.0=mod.pinned")
            .unwrap()
            .load_str("l1", "g:a=mod.any")
            .unwrap()
            .build();

        let hit = d.lookup(&Coordinate::new("g", "a", "1.0")).unwrap();
        assert_eq!(hit.module_name, "mod.pinned");
        assert_eq!(hit.layer, 0);
        assert!(hit.versioned);

        assert_eq!(d.resolve(&Coordinate::new("g", "a", "1.1")), Some("mod.any"));
    }

    #[test]
    fn test_lower_layer_still_visible() {
        let d = layered();
        let hit = d.lookup(&Coordinate::new("g", "b", "9")).unwrap();
        assert_eq!(hit.module_name, "mod.b");
        assert_eq!(hit.source, "l0");
        assert!(!hit.versioned);
    }

    #[test]
    fn test_unknown_coordinate_is_absent() {
        let d = layered();
        assert_eq!(d.resolve(&Coordinate::new("other", "a", "1.0")), None);
    }

    #[test]
    fn test_unversioned_query_skips_versioned_tier() {
        let d = layered();
        assert_eq!(d.resolve(&Coordinate::unversioned("g", "a")), Some("mod.l1"));
    }

    #[test]
    fn test_duplicate_key_in_one_layer_keeps_last() {
        let d = DictionaryBuilder::new()
            .load_str("l0", "g:a=first\ng:a=second")
            .unwrap()
            .build();
        assert_eq!(d.resolve(&Coordinate::new("g", "a", "1")), Some("second"));
        assert_eq!(d.entry_count(), 1);
    }

    #[test]
    fn test_builtin_is_layer_zero() {
        let d = DictionaryBuilder::new()
            .with_builtin()
            .unwrap()
            .load_str("custom", "org.slf4j:slf4j-api=my.slf4j")
            .unwrap()
            .build();

        assert_eq!(d.layer_count(), 2);
        assert_eq!(d.sources().next(), Some(BUILTIN_SOURCE));
        assert!(!d.layer_entries(0).is_empty());
        assert_eq!(
            d.resolve(&Coordinate::new("org.slf4j", "slf4j-api", "1.7.36")),
            Some("my.slf4j")
        );
    }

    #[test]
    fn test_builtin_parses() {
        let d = Dictionary::builtin().unwrap();
        assert_eq!(
            d.resolve(&Coordinate::new("org.hibernate", "hibernate-core", "4.2.0.Final")),
            Some("org.hibernate")
        );
    }

    #[test]
    fn test_malformed_layer_is_fatal() {
        let result = DictionaryBuilder::new().load_str("bad", "g:a=ok\ng:b");
        assert!(matches!(result, Err(StructureError::Format { line: 2, .. })));
    }

    #[test]
    fn test_load_file_if_exists_skips_missing() {
        let d = DictionaryBuilder::new()
            .load_file_if_exists(Path::new("/nonexistent/custom.dict"))
            .unwrap()
            .build();
        assert_eq!(d.layer_count(), 0);
    }

    #[test]
    fn test_load_file() {
        let temp = tempfile::TempDir::new().unwrap();
        let path = temp.path().join("custom.dict");
        fs::write(&path, "org.x:lib=modX\n").unwrap();

        let d = DictionaryBuilder::new().load_file(&path).unwrap().build();
        assert_eq!(d.resolve(&Coordinate::new("org.x", "lib", "1.0")), Some("modX"));
        assert!(d.sources().next().unwrap().ends_with("custom.dict"));
    }

    #[test]
    fn test_dictionary_is_shareable() {
        let d = Arc::new(layered());
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let d = Arc::clone(&d);
                std::thread::spawn(move || {
                    d.resolve(&Coordinate::new("g", "a", "2.0")).map(str::to_string)
                })
            })
            .collect();

        for handle in handles {
            assert_eq!(handle.join().unwrap().as_deref(), Some("mod.l1.v2"));
        }
    }
}
