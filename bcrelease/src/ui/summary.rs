//! Per-rule match table printed after a release.
//!
//! Rules that matched nothing are listed separately: with upstream formatting
//! changes they are the first sign that a rule has gone stale.
//!
//! License: 0BSD

use bcrelease_core::RewriteSummaryItem;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Cell, CellAlignment, Color, ContentArrangement, Table};
use owo_colors::OwoColorize;
use std::io::{self, Write};

pub fn print_summary<W: Write>(
    items: &[RewriteSummaryItem],
    writer: &mut W,
    use_color: bool,
) -> io::Result<()> {
    let (matched, unmatched): (Vec<&RewriteSummaryItem>, Vec<&RewriteSummaryItem>) =
        items.iter().partition(|item| item.occurrences > 0);

    let title = "Rewrite Summary";
    if use_color {
        writeln!(writer, "{}", title.bold())?;
    } else {
        writeln!(writer, "{}", title)?;
    }

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec!["Set", "Rule", "Matches"]);
    if use_color {
        table.enforce_styling();
    } else {
        table.force_no_tty();
    }

    for item in &matched {
        table.add_row(vec![
            Cell::new(&item.set_name),
            Cell::new(&item.rule_name).fg(Color::Cyan),
            Cell::new(item.occurrences)
                .fg(Color::Green)
                .set_alignment(CellAlignment::Right),
        ]);
    }
    writeln!(writer, "{}", table)?;

    let total: usize = matched.iter().map(|item| item.occurrences).sum();
    writeln!(writer, "{} rule(s) rewrote {} match(es).", matched.len(), total)?;

    if !unmatched.is_empty() {
        let names = unmatched
            .iter()
            .map(|item| format!("{}/{}", item.set_name, item.rule_name))
            .collect::<Vec<_>>()
            .join(", ");
        let line = format!("{} rule(s) matched nothing: {}", unmatched.len(), names);
        if use_color {
            writeln!(writer, "{}", line.yellow())?;
        } else {
            writeln!(writer, "{}", line)?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(set: &str, rule: &str, occurrences: usize) -> RewriteSummaryItem {
        RewriteSummaryItem {
            set_name: set.to_string(),
            rule_name: rule.to_string(),
            occurrences,
        }
    }

    #[test]
    fn lists_matched_rules_and_totals() {
        let items = vec![
            item("deletions", "include", 4),
            item("replacements", "true_bare", 2),
            item("deletions", "guard_endif", 0),
        ];
        let mut buf = Vec::new();
        print_summary(&items, &mut buf, false).unwrap();
        let out = String::from_utf8(buf).unwrap();

        assert!(out.contains("include"));
        assert!(out.contains("true_bare"));
        assert!(out.contains("2 rule(s) rewrote 6 match(es)."));
        assert!(out.contains("1 rule(s) matched nothing: deletions/guard_endif"));
    }

    #[test]
    fn no_unmatched_line_when_everything_matched() {
        let mut buf = Vec::new();
        print_summary(&[item("primary", "bc_main_signature", 1)], &mut buf, false).unwrap();
        let out = String::from_utf8(buf).unwrap();
        assert!(!out.contains("matched nothing"));
    }
}
