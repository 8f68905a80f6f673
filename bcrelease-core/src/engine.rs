//! Defines the `RewriteEngine` trait and the per-rule summary it reports.
//!
//! A rewrite engine owns one compiled rule set and applies it to a text
//! buffer. The pipeline drives one engine per stage.
//!
//! License: 0BSD

use anyhow::Result;

use crate::rules::compiler::CompiledRules;

/// How many matches one rule rewrote during a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RewriteSummaryItem {
    /// The set the rule belongs to (e.g., "replacements").
    pub set_name: String,
    pub rule_name: String,
    pub occurrences: usize,
}

/// A pluggable text rewriting stage.
pub trait RewriteEngine: Send + Sync {
    /// Applies every rule, in order, to the whole of `content`.
    ///
    /// Returns the rewritten text and one summary item per rule (including
    /// rules that matched nothing), in rule order.
    fn rewrite(&self, content: &str) -> Result<(String, Vec<RewriteSummaryItem>)>;

    /// The compiled rules this engine applies.
    fn compiled_rules(&self) -> &CompiledRules;
}
