//! Reading the inputs of a release: the manifest and the source files it
//! names, with their license headers cut off.
//!
//! License: 0BSD

use anyhow::{Context, Result};
use log::debug;
use std::fs;
use std::path::{Path, PathBuf};

/// Parses a manifest: one path per line, in concatenation order.
///
/// Surrounding whitespace is trimmed; blank lines and `#` comments are
/// ignored.
pub fn parse_manifest(text: &str) -> Vec<PathBuf> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(PathBuf::from)
        .collect()
}

/// Reads and parses the manifest file at `path`.
pub fn read_manifest(path: &Path) -> Result<Vec<PathBuf>> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("Failed to read manifest {}", path.display()))?;
    let files = parse_manifest(&text);
    debug!("Manifest {} lists {} file(s).", path.display(), files.len());
    Ok(files)
}

/// Converts `\r\n` line endings to `\n`.
pub fn normalize_line_endings(content: &str) -> String {
    content.replace("\r\n", "\n")
}

/// Drops the first `header_lines` lines of `content`.
///
/// Line endings of the remaining lines are preserved. `\r\n` is normalized
/// to `\n` first.
pub fn strip_header(content: &str, header_lines: usize) -> String {
    normalize_line_endings(content)
        .split_inclusive('\n')
        .skip(header_lines)
        .collect()
}

/// Reads the toybox header file, which is prepended verbatim apart from
/// line-ending normalization.
pub fn read_header(path: &Path) -> Result<String> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read header file {}", path.display()))?;
    Ok(normalize_line_endings(&content))
}

/// Reads the file at `path` and strips its license header.
pub fn read_source(path: &Path, header_lines: usize) -> Result<String> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read source file {}", path.display()))?;
    Ok(strip_header(&content, header_lines))
}
