// bcrelease/src/cli.rs
//! Command-line interface definition for `bcrelease`.
//!
//! License: 0BSD

use clap::Parser;
use std::path::PathBuf;

/// Top-level CLI definition.
#[derive(Parser, Debug)]
#[command(
    name = "bcrelease",
    version = env!("CARGO_PKG_VERSION"),
    about = "Merge the bc sources into toybox's toys/pending/bc.c",
    long_about = "bcrelease concatenates the bc library and calculator sources listed in the manifest, \
                  rewrites them to toybox conventions with an ordered rule book, prepends the toybox \
                  header and writes the result to <TOYBOX_DIR>/toys/pending/bc.c."
)]
pub struct Cli {
    /// Root of the toybox checkout that receives bc.c.
    #[arg(value_name = "TOYBOX_DIR")]
    pub toybox_dir: Option<PathBuf>,

    /// Root of the bc project (manifest, sources, header, build step).
    ///
    /// Relative to the current directory, not to where the binary lives:
    /// run from the bc checkout or pass this explicitly.
    #[arg(long = "project-dir", value_name = "DIR", env = "BCRELEASE_PROJECT_DIR", default_value = ".")]
    pub project_dir: PathBuf,

    /// Path to a YAML file merged over the built-in rule book and layout.
    #[arg(long = "config", value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Rule names to drop (comma-separated).
    #[arg(long = "disable", short = 'x', value_delimiter = ',')]
    pub disable: Vec<String>,

    /// Do not run the build step before assembling.
    #[arg(long = "skip-build")]
    pub skip_build: bool,

    /// Program to run as the build step instead of the configured one.
    #[arg(long = "build-cmd", value_name = "PROGRAM")]
    pub build_cmd: Option<String>,

    /// Argument for --build-cmd (repeatable).
    #[arg(long = "build-arg", value_name = "ARG", requires = "build_cmd", allow_hyphen_values = true)]
    pub build_args: Vec<String>,

    /// Print the merged source to stdout instead of writing it.
    #[arg(long = "stdout")]
    pub stdout: bool,

    /// Show a unified diff against the previous bc.c on stderr.
    #[arg(long = "diff", short = 'D')]
    pub diff: bool,

    /// Show how many matches each rule rewrote.
    #[arg(long = "summary", short = 's')]
    pub summary: bool,

    /// Suppress all log output.
    #[arg(long, short = 'q')]
    pub quiet: bool,

    /// Enable debug logging.
    #[arg(long, short = 'd')]
    pub debug: bool,
}

impl Cli {
    /// The build command override, if `--build-cmd` was given.
    pub fn build_command_override(&self) -> Option<Vec<String>> {
        self.build_cmd.as_ref().map(|program| {
            std::iter::once(program.clone())
                .chain(self.build_args.iter().cloned())
                .collect()
        })
    }
}
