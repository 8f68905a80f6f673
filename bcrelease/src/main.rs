// bcrelease/src/main.rs
//! bcrelease entry point.
//!
//! License: 0BSD

use anyhow::Result;
use bcrelease::cli::Cli;
use bcrelease::logger;
use bcrelease::run_release_command;
use clap::Parser;
use std::process::ExitCode;

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    logger::init_logger(logger::level_for_flags(cli.quiet, cli.debug));
    run_release_command(&cli)
}
