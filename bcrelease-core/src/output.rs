//! Writing the merged source into the target tree.
//!
//! License: 0BSD

use anyhow::{Context, Result};
use log::{debug, info, warn};
use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use crate::config::ReleaseLayout;

const TMP_SUFFIX: &str = ".tmp";

/// Where the merged file goes inside `target_dir`.
pub fn output_path(target_dir: &Path, layout: &ReleaseLayout) -> PathBuf {
    target_dir.join(&layout.output)
}

/// Returns the current content of `path` for display, if it can be read.
///
/// Invalid UTF-8 is replaced lossily. Any other read failure is logged and
/// treated like a missing file.
pub fn read_previous(path: &Path) -> Option<String> {
    match fs::read(path) {
        Ok(bytes) => Some(String::from_utf8_lossy(&bytes).into_owned()),
        Err(e) if e.kind() == ErrorKind::NotFound => None,
        Err(e) => {
            warn!("Could not read previous output {}: {}", path.display(), e);
            None
        }
    }
}

/// Fails unless `target_dir` is an existing directory.
pub fn ensure_target_dir(target_dir: &Path) -> Result<()> {
    let meta = fs::metadata(target_dir)
        .with_context(|| format!("Target directory {} is not accessible", target_dir.display()))?;
    if !meta.is_dir() {
        anyhow::bail!("Target {} is not a directory", target_dir.display());
    }
    Ok(())
}

/// Replaces the file at `path` with `content`.
///
/// The content goes to a sibling temp file first and is renamed over `path`
/// once fully written, so a failed write never leaves a truncated file. The
/// parent directory must already exist.
pub fn write_atomic(path: &Path, content: &str) -> Result<()> {
    let mut tmp_name = path.as_os_str().to_os_string();
    tmp_name.push(TMP_SUFFIX);
    let tmp_path = PathBuf::from(tmp_name);

    {
        let mut tmp = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(&tmp_path)
            .with_context(|| format!("Failed to create temp file {}", tmp_path.display()))?;
        tmp.write_all(content.as_bytes())
            .with_context(|| format!("Failed to write temp file {}", tmp_path.display()))?;
        tmp.sync_all()?;
    }
    debug!("Wrote {} bytes to {}", content.len(), tmp_path.display());

    fs::rename(&tmp_path, path)
        .with_context(|| format!("Failed to move {} into place", tmp_path.display()))?;
    info!("Wrote {}", path.display());
    Ok(())
}
