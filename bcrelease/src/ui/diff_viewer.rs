//! Unified diff between the previous bc.c and the freshly merged one.
//!
//! License: 0BSD

use diffy::{create_patch, Line as DiffLine};
use owo_colors::OwoColorize;
use std::io::{self, Write};

/// Writes a unified diff of `original` -> `updated`.
///
/// Removed lines are prefixed `-` (red), added lines `+` (green).
pub fn print_diff<W: Write>(original: &str, updated: &str, writer: &mut W, use_color: bool) -> io::Result<()> {
    let header = "--- previous bc.c\n+++ merged bc.c";
    if use_color {
        writeln!(writer, "{}", header.yellow().bold())?;
    } else {
        writeln!(writer, "{}", header)?;
    }

    let patch = create_patch(original, updated);
    if patch.hunks().is_empty() {
        writeln!(writer, "No changes against the previous output.")?;
        return Ok(());
    }

    for hunk in patch.hunks() {
        let old = hunk.old_range();
        let new = hunk.new_range();
        let range = format!("@@ -{},{} +{},{} @@", old.start(), old.len(), new.start(), new.len());
        if use_color {
            writeln!(writer, "{}", range.cyan())?;
        } else {
            writeln!(writer, "{}", range)?;
        }

        for line_change in hunk.lines() {
            let (prefix, text) = match line_change {
                DiffLine::Delete(s) => ("-", *s),
                DiffLine::Insert(s) => ("+", *s),
                DiffLine::Context(s) => (" ", *s),
            };
            let text = text.strip_suffix('\n').unwrap_or(text);
            match (prefix, use_color) {
                ("-", true) => writeln!(writer, "{}", format!("-{}", text).red())?,
                ("+", true) => writeln!(writer, "{}", format!("+{}", text).green())?,
                _ => writeln!(writer, "{}{}", prefix, text)?,
            }
        }
    }

    Ok(())
}
