//! A `RewriteEngine` implementation that applies an ordered list of regex
//! substitutions.
//!
//! License: 0BSD

use anyhow::{Context, Result};
use log::{debug, trace};
use regex::Captures;

use crate::config::{RewriteRule, RuleSetKind};
use crate::engine::{RewriteEngine, RewriteSummaryItem};
use crate::rules::compiler::{compile_rule_set, compile_rules, CompileMode, CompiledRules};

#[derive(Debug)]
pub struct RegexEngine {
    compiled_rules: CompiledRules,
}

impl RegexEngine {
    /// Compiles `rules` with the flags of the given pipeline stage.
    pub fn new(kind: RuleSetKind, rules: &[RewriteRule]) -> Result<Self> {
        let compiled_rules = compile_rule_set(kind, rules)
            .with_context(|| format!("Failed to compile '{}' rules for RegexEngine", kind))?;
        Ok(Self { compiled_rules })
    }

    /// Compiles `rules` with explicit flags, outside of any pipeline stage.
    pub fn with_mode(set_name: &str, rules: &[RewriteRule], mode: CompileMode) -> Result<Self> {
        let compiled_rules = compile_rules(set_name, rules, mode)
            .with_context(|| format!("Failed to compile '{}' rules for RegexEngine", set_name))?;
        Ok(Self { compiled_rules })
    }
}

impl RewriteEngine for RegexEngine {
    fn rewrite(&self, content: &str) -> Result<(String, Vec<RewriteSummaryItem>)> {
        let set_name = &self.compiled_rules.set_name;
        let mut buffer = content.to_string();
        let mut summary = Vec::with_capacity(self.compiled_rules.len());

        for rule in &self.compiled_rules.rules {
            let mut occurrences = 0usize;
            let rewritten = rule
                .regex
                .replace_all(&buffer, |caps: &Captures| {
                    occurrences += 1;
                    let mut dst = String::new();
                    caps.expand(&rule.replace_with, &mut dst);
                    dst
                })
                .into_owned();
            buffer = rewritten;

            if occurrences > 0 {
                debug!("[{}] rule '{}' rewrote {} match(es).", set_name, rule.name, occurrences);
            } else {
                trace!("[{}] rule '{}' matched nothing.", set_name, rule.name);
            }

            summary.push(RewriteSummaryItem {
                set_name: set_name.clone(),
                rule_name: rule.name.clone(),
                occurrences,
            });
        }

        Ok((buffer, summary))
    }

    fn compiled_rules(&self) -> &CompiledRules {
        &self.compiled_rules
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn engine(kind: RuleSetKind, rules: &[RewriteRule]) -> RegexEngine {
        RegexEngine::new(kind, rules).unwrap()
    }

    #[test]
    fn applies_rules_in_order() {
        // The second rule only matches what the first one produced.
        let rules = vec![
            RewriteRule::new("a_to_b", "a", "b"),
            RewriteRule::new("b_to_c", "b", "c"),
        ];
        let (out, summary) = engine(RuleSetKind::Replacements, &rules).rewrite("ab").unwrap();
        assert_eq!(out, "cc");
        assert_eq!(summary[0].occurrences, 1);
        assert_eq!(summary[1].occurrences, 2);
    }

    #[test]
    fn expands_capture_groups() {
        let rules = vec![RewriteRule::new("flags", "([^_])flags ", "${1}toys.optflags ")];
        let (out, _) = engine(RuleSetKind::Primary, &rules)
            .rewrite("x = flags & 1; y = my_flags & 2;")
            .unwrap();
        assert_eq!(out, "x = toys.optflags & 1; y = my_flags & 2;");
    }

    #[test]
    fn reports_untouched_rules_too() {
        let rules = vec![RewriteRule::new("never", "zzz", "")];
        let (out, summary) = engine(RuleSetKind::Deletions, &rules).rewrite("abc").unwrap();
        assert_eq!(out, "abc");
        assert_eq!(
            summary,
            vec![RewriteSummaryItem {
                set_name: "deletions".to_string(),
                rule_name: "never".to_string(),
                occurrences: 0,
            }]
        );
    }

    #[test]
    fn explicit_mode_engine() {
        let rules = vec![RewriteRule::new("caps", "^x$", "y")];
        let plain = RegexEngine::with_mode("plain", &rules, CompileMode::default()).unwrap();
        assert_eq!(plain.rewrite("x\nx").unwrap().0, "x\nx");
        let lines = RegexEngine::with_mode("lines", &rules, CompileMode::LINES).unwrap();
        assert_eq!(lines.rewrite("x\nx").unwrap().0, "y\ny");
        assert_eq!(lines.compiled_rules().set_name, "lines");
    }
}
