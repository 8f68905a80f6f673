//! Prefixed, optionally colored status messages on stderr.
//!
//! License: 0BSD

use owo_colors::OwoColorize;
use std::io::{self, Write};

pub fn print_info_message<W: Write>(writer: &mut W, message: &str, use_color: bool) -> io::Result<()> {
    if use_color {
        writeln!(writer, "{} {}", "info:".cyan().bold(), message)
    } else {
        writeln!(writer, "info: {}", message)
    }
}

pub fn print_warn_message<W: Write>(writer: &mut W, message: &str, use_color: bool) -> io::Result<()> {
    if use_color {
        writeln!(writer, "{} {}", "warning:".yellow().bold(), message)
    } else {
        writeln!(writer, "warning: {}", message)
    }
}
