//! Nested descriptor extraction from packaged archives.
//!
//! A sub-deployment archive (a `.war` or `.jar` built earlier) carries its
//! own generated descriptor. This module finds and parses it:
//!
//! - [`ArchiveReader`] lists and reads zip entries;
//! - [`ShellArchiveReader`] does that with the system `unzip` tool;
//! - [`ArchiveDescriptorSource`] picks the descriptor entry out of an archive.

use std::path::Path;
use std::process::Command;

use crate::descriptor::{parse_descriptor, DescriptorTree};
use crate::error::{StructureError, StructureResult};

/// Entry paths (lower-cased) a nested descriptor may live at.
pub const NESTED_DESCRIPTOR_LOCATIONS: [&str; 2] = [
    "meta-inf/jboss-subdeployment.xml",
    "web-inf/jboss-subdeployment.xml",
];

/// Quote an entry path so `unzip` matches it literally.
///
/// `unzip` treats entry arguments as wildcard patterns; a metacharacter is
/// matched verbatim only inside a bracket class, so `[` becomes `[[]`.
fn literal_pattern(entry: &str) -> String {
    let mut pattern = String::with_capacity(entry.len());
    for c in entry.chars() {
        match c {
            '[' | '*' | '?' => {
                pattern.push('[');
                pattern.push(c);
                pattern.push(']');
            }
            _ => pattern.push(c),
        }
    }
    pattern
}

/// Trait for reading entries of a packaged archive.
pub trait ArchiveReader: Send + Sync {
    /// List entry paths in archive order.
    fn list_entries(&self, archive: &Path) -> StructureResult<Vec<String>>;

    /// Read one entry as UTF-8 text.
    fn read_entry(&self, archive: &Path, entry: &str) -> StructureResult<String>;
}

/// Archive reader backed by the system `unzip` tool.
#[derive(Debug, Default)]
pub struct ShellArchiveReader;

impl ShellArchiveReader {
    /// Create a new shell-based reader.
    pub fn new() -> Self {
        Self
    }

    fn run_unzip(
        &self,
        archive: &Path,
        flag: &str,
        entry: Option<&str>,
    ) -> StructureResult<Vec<u8>> {
        if !archive.exists() {
            return Err(StructureError::Archive {
                path: archive.to_path_buf(),
                reason: "archive not found".to_string(),
            });
        }

        // Entry names follow the archive name on the unzip command line.
        let mut command = Command::new("unzip");
        command.arg(flag).arg(archive);
        if let Some(entry) = entry {
            command.arg(literal_pattern(entry));
        }

        let output = command.output().map_err(|e| StructureError::Archive {
            path: archive.to_path_buf(),
            reason: format!("Failed to run unzip: {}", e),
        })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(StructureError::Archive {
                path: archive.to_path_buf(),
                reason: format!("unzip {} failed: {}", flag, stderr.trim()),
            });
        }

        Ok(output.stdout)
    }
}

impl ArchiveReader for ShellArchiveReader {
    fn list_entries(&self, archive: &Path) -> StructureResult<Vec<String>> {
        let stdout = self.run_unzip(archive, "-Z1", None)?;
        Ok(String::from_utf8_lossy(&stdout)
            .lines()
            .filter(|line| !line.is_empty())
            .map(str::to_string)
            .collect())
    }

    fn read_entry(&self, archive: &Path, entry: &str) -> StructureResult<String> {
        let stdout = self.run_unzip(archive, "-p", Some(entry))?;
        String::from_utf8(stdout).map_err(|e| StructureError::Archive {
            path: archive.to_path_buf(),
            reason: format!("{} is not UTF-8: {}", entry, e),
        })
    }
}

/// Something that can produce the nested descriptor of an archive.
pub trait NestedDescriptorSource {
    /// The parsed nested descriptor, or `None` when the archive has none.
    fn nested_descriptor(&self, archive: &Path) -> StructureResult<Option<DescriptorTree>>;
}

/// Finds nested descriptors through an [`ArchiveReader`].
#[derive(Debug, Default)]
pub struct ArchiveDescriptorSource<R> {
    reader: R,
}

impl<R: ArchiveReader> ArchiveDescriptorSource<R> {
    /// Create a source over the given reader.
    pub fn new(reader: R) -> Self {
        Self { reader }
    }

    /// First entry at one of the nested descriptor locations.
    pub fn find_entry(&self, archive: &Path) -> StructureResult<Option<String>> {
        let entries = self.reader.list_entries(archive)?;
        Ok(entries.into_iter().find(|entry| is_nested_descriptor(entry)))
    }
}

impl<R: ArchiveReader> NestedDescriptorSource for ArchiveDescriptorSource<R> {
    fn nested_descriptor(&self, archive: &Path) -> StructureResult<Option<DescriptorTree>> {
        let Some(entry) = self.find_entry(archive)? else {
            tracing::debug!(archive = %archive.display(), "No nested descriptor found");
            return Ok(None);
        };

        tracing::debug!(archive = %archive.display(), entry = %entry, "Reading nested descriptor");
        let content = self.reader.read_entry(archive, &entry)?;
        let source_name = format!("{}!/{}", archive.display(), entry);
        parse_descriptor(&content, &source_name).map(Some)
    }
}

/// Whether an entry path is a nested descriptor location (case-insensitive).
pub fn is_nested_descriptor(entry: &str) -> bool {
    let lower = entry.to_lowercase();
    NESTED_DESCRIPTOR_LOCATIONS
        .iter()
        .any(|location| lower.ends_with(location))
}
