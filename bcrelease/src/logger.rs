//! Logging setup for the `bcrelease` binary.
//!
//! License: 0BSD

use env_logger::{Builder, Env};
use log::LevelFilter;

/// Initializes `env_logger` once.
///
/// `RUST_LOG` is honoured (default `warn`) unless `level_override` forces a
/// level. Calling this again is a no-op.
pub fn init_logger(level_override: Option<LevelFilter>) {
    let mut builder = Builder::from_env(Env::default().default_filter_or("warn"));
    if let Some(level) = level_override {
        builder.filter_level(level);
    }
    builder.format_timestamp(None);
    let _ = builder.try_init();
}

/// Maps the `--quiet`/`--debug` flags to a level override. `--quiet` wins.
pub fn level_for_flags(quiet: bool, debug: bool) -> Option<LevelFilter> {
    if quiet {
        Some(LevelFilter::Off)
    } else if debug {
        Some(LevelFilter::Debug)
    } else {
        None
    }
}
