//! Flat-file export of the alias set.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};

/// Overwrite `path` with one row per line.
///
/// No append, no merge: the file always reflects exactly the most
/// recent fetch.
pub fn write(path: &Path, rows: &[String]) -> Result<()> {
    fs::write(path, rows.join("\n"))
        .with_context(|| format!("Failed to write export to {:?}", path))
}
