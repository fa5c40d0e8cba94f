//! Parser for the line-oriented dictionary format.
//!
//! ```text
//! # comment
//! javax.faces:jsf-impl=com.sun.jsf-impl
//! javax.faces:jsf-impl:2.0=com.sun.jsf-impl.2
//! ```

use crate::coordinate::Coordinate;
use crate::error::{StructureError, StructureResult};

/// Parse one dictionary source into `(key, module)` pairs in line order.
///
/// Blank lines and lines starting with `#` are skipped. Any other line must
/// be `group:name[:version]=module`.
pub(crate) fn parse_layer(
    content: &str,
    source_name: &str,
) -> StructureResult<Vec<(Coordinate, String)>> {
    let mut entries = Vec::new();

    for (idx, raw) in content.lines().enumerate() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let fail = |reason: String| StructureError::Format {
            source_name: source_name.to_string(),
            line: idx + 1,
            content: line.to_string(),
            reason,
        };

        let (key, module) = line
            .split_once('=')
            .ok_or_else(|| fail("missing '='".to_string()))?;

        let module = module.trim();
        if module.is_empty() {
            return Err(fail("empty module name".to_string()));
        }

        let key: Coordinate = key.parse().map_err(fail)?;
        entries.push((key, module.to_string()));
    }

    Ok(entries)
}
