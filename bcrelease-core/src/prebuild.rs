//! The build step that regenerates generated sources before a release.
//!
//! The command runs synchronously in the bc project root with inherited
//! stdio; nothing is read until it has finished.
//!
//! License: 0BSD

use anyhow::{Context, Result};
use log::{debug, info};
use std::path::Path;
use std::process::Command;

/// Result of running the build command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuildOutcome {
    Success,
    /// The command exited non-zero. Death by signal is reported as 1.
    Failed(i32),
}

/// Runs `command` (program followed by its arguments) in `project_root`.
///
/// An empty command is treated as an immediate success. Failing to spawn the
/// program at all is an error, not a `Failed` outcome.
pub fn run_build_step(command: &[String], project_root: &Path) -> Result<BuildOutcome> {
    let Some((program, args)) = command.split_first() else {
        debug!("No build command configured, skipping build step.");
        return Ok(BuildOutcome::Success);
    };

    info!("Running build step `{}` in {}", command.join(" "), project_root.display());
    let status = Command::new(program)
        .args(args)
        .current_dir(project_root)
        .status()
        .with_context(|| format!("Failed to launch build command `{}`", program))?;

    if status.success() {
        debug!("Build step finished successfully.");
        return Ok(BuildOutcome::Success);
    }

    let code = status.code().unwrap_or(1);
    debug!("Build step `{}` failed with exit code {}.", command.join(" "), code);
    Ok(BuildOutcome::Failed(code))
}
