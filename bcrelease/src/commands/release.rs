//! The `bcrelease` command: turn CLI arguments into a release run and report
//! its outcome.
//!
//! License: 0BSD

use anyhow::{Context, Result};
use is_terminal::IsTerminal;
use log::{debug, info};
use std::io::{self, Write};
use std::path::Path;
use std::process::ExitCode;

use bcrelease_core::{
    merge_config, output_path, read_previous, run_release, Assembly, ReleaseConfig,
    ReleaseOptions, ReleaseOutcome,
};

use crate::cli::Cli;
use crate::ui::{diff_viewer, output_format, summary};

/// Loads the built-in config, merges `--config` over it and applies the
/// rule and build overrides from the command line.
pub fn load_config(cli: &Cli) -> Result<ReleaseConfig> {
    let default_config = ReleaseConfig::load_default_rules()?;
    let user_config = cli
        .config
        .as_deref()
        .map(ReleaseConfig::load_from_file)
        .transpose()
        .context("Failed to load --config")?;

    let mut config = merge_config(default_config, user_config);
    if !cli.disable.is_empty() {
        config.rules.set_active_rules(&cli.disable);
    }
    if let Some(command) = cli.build_command_override() {
        debug!("Build command overridden: {:?}", command);
        config.layout.build_command = command;
    }
    Ok(config)
}

/// The usage line printed when no toybox directory is given.
pub fn usage_line() -> String {
    let program = std::env::args().next().unwrap_or_else(|| "bcrelease".to_string());
    format!("usage: {} toybox_dir", program)
}

/// Maps an external exit code to ours; codes outside 0..=255 become 1.
fn clamp_exit_code(code: i32) -> u8 {
    u8::try_from(code).unwrap_or(1)
}

/// Runs a release as described by `cli`.
///
/// Exits 1 after printing the usage line when no toybox directory was given,
/// and with the build step's own code when that step fails.
pub fn run_release_command(cli: &Cli) -> Result<ExitCode> {
    let Some(toybox_dir) = cli.toybox_dir.as_ref() else {
        println!("{}", usage_line());
        return Ok(ExitCode::from(1));
    };

    info!("bcrelease started. Version: {}", env!("CARGO_PKG_VERSION"));
    let config = load_config(cli)?;
    let opts = ReleaseOptions {
        config,
        project_root: cli.project_dir.clone(),
        target_dir: toybox_dir.clone(),
        skip_build: cli.skip_build,
        dry_run: cli.stdout,
        keep_previous: cli.diff,
    };

    let stderr_color = io::stderr().is_terminal();
    match run_release(&opts)? {
        ReleaseOutcome::BuildFailed(code) => Ok(ExitCode::from(clamp_exit_code(code))),
        ReleaseOutcome::DryRun { assembly } => {
            let previous = if cli.diff {
                read_previous(&output_path(toybox_dir, &opts.config.layout))
            } else {
                None
            };
            let stdout = io::stdout();
            let mut writer = stdout.lock();
            writer.write_all(assembly.content.as_bytes())?;
            writer.flush()?;
            report(cli, &assembly, previous.as_deref(), stderr_color)?;
            Ok(ExitCode::SUCCESS)
        }
        ReleaseOutcome::Written {
            path,
            assembly,
            previous,
        } => {
            if !cli.quiet {
                print_written(&path, &assembly, stderr_color)?;
            }
            report(cli, &assembly, previous.as_deref(), stderr_color)?;
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn print_written(path: &Path, assembly: &Assembly, use_color: bool) -> io::Result<()> {
    let message = format!(
        "Wrote {} ({} bytes from {} file(s)).",
        path.display(),
        assembly.content.len(),
        assembly.sources.len()
    );
    output_format::print_info_message(&mut io::stderr(), &message, use_color)
}

fn report(cli: &Cli, assembly: &Assembly, previous: Option<&str>, use_color: bool) -> Result<()> {
    let mut stderr = io::stderr();
    if cli.diff {
        if previous.is_none() {
            output_format::print_warn_message(&mut stderr, "No previous bc.c, diffing against an empty file.", use_color)?;
        }
        diff_viewer::print_diff(previous.unwrap_or(""), &assembly.content, &mut stderr, use_color)?;
    }
    if cli.summary {
        summary::print_summary(&assembly.summary, &mut stderr, use_color)?;
    }
    Ok(())
}
