//! One-shot release: build step, assembly, write.
//!
//! This is the non-interactive entry point the CLI drives. It never changes
//! the process working directory; every path is resolved against
//! `project_root` or `target_dir`.
//!
//! License: 0BSD

use anyhow::Result;
use log::info;
use std::path::PathBuf;

use crate::config::ReleaseConfig;
use crate::output::{ensure_target_dir, output_path, read_previous, write_atomic};
use crate::pipeline::{assemble, Assembly};
use crate::prebuild::{run_build_step, BuildOutcome};

/// Everything a release run needs.
#[derive(Debug, Clone)]
pub struct ReleaseOptions {
    pub config: ReleaseConfig,
    /// Root of the bc project; inputs and the build step live here.
    pub project_root: PathBuf,
    /// Root of the toybox tree that receives the merged file.
    pub target_dir: PathBuf,
    pub skip_build: bool,
    /// Assemble but do not write anything.
    pub dry_run: bool,
    /// Capture the existing output before overwriting it, for diffing.
    pub keep_previous: bool,
}

/// How a release run ended.
#[derive(Debug)]
pub enum ReleaseOutcome {
    /// The build step failed; nothing was read or written.
    BuildFailed(i32),
    /// The merged file was assembled but not written.
    DryRun { assembly: Assembly },
    /// The merged file was written to `path`.
    Written {
        path: PathBuf,
        assembly: Assembly,
        /// What `path` held before this run, when `keep_previous` was set
        /// and the old file could be read.
        previous: Option<String>,
    },
}

pub fn run_release(opts: &ReleaseOptions) -> Result<ReleaseOutcome> {
    let layout = &opts.config.layout;
    if !opts.dry_run {
        ensure_target_dir(&opts.target_dir)?;
    }

    if opts.skip_build {
        info!("Skipping build step.");
    } else if let BuildOutcome::Failed(code) = run_build_step(&layout.build_command, &opts.project_root)? {
        return Ok(ReleaseOutcome::BuildFailed(code));
    }

    let assembly = assemble(&opts.config, &opts.project_root)?;

    if opts.dry_run {
        info!("Dry run, not writing output.");
        return Ok(ReleaseOutcome::DryRun { assembly });
    }

    let path = output_path(&opts.target_dir, layout);
    let previous = if opts.keep_previous { read_previous(&path) } else { None };
    write_atomic(&path, &assembly.content)?;

    Ok(ReleaseOutcome::Written {
        path,
        assembly,
        previous,
    })
}
