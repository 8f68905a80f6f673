// bcrelease/src/lib.rs
//! # bcrelease CLI Application
//!
//! Command-line front end for `bcrelease-core`: parses arguments, sets up
//! logging, runs a release and renders its summary and diff on the terminal.
//!
//! License: 0BSD

pub mod cli;
pub mod commands;
pub mod logger;
pub mod ui;

pub use commands::release::run_release_command;
