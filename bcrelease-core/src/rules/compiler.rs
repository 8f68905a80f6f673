//! compiler.rs - Compiles rewrite rule sets into ready-to-apply regexes.
//!
//! Every rule set is compiled with a `CompileMode` (the regex flags of its
//! pipeline stage); a rule may additionally switch flags on for itself.
//! Compilation keeps the rule order of the input.
//!
//! License: 0BSD

use log::{debug, warn};
use regex::{Regex, RegexBuilder};

use crate::config::{RewriteRule, RuleSetKind, MAX_PATTERN_LENGTH};
use crate::errors::ReleaseError;

/// Regex flags a rule set is compiled with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CompileMode {
    pub multi_line: bool,
    pub dot_matches_new_line: bool,
}

impl CompileMode {
    /// `^`/`$` anchor at line boundaries.
    pub const LINES: CompileMode = CompileMode {
        multi_line: true,
        dot_matches_new_line: false,
    };

    /// Line anchors, and `.` also matches `\n`.
    pub const SPANS: CompileMode = CompileMode {
        multi_line: true,
        dot_matches_new_line: true,
    };

    pub fn for_kind(kind: RuleSetKind) -> Self {
        match kind {
            RuleSetKind::Primary | RuleSetKind::DeletionsAll => Self::SPANS,
            RuleSetKind::Deletions | RuleSetKind::Replacements => Self::LINES,
        }
    }
}

/// A single compiled rewrite rule.
#[derive(Debug)]
pub struct CompiledRule {
    /// The compiled regular expression used for matching.
    pub regex: Regex,
    /// Replacement for every match; empty for deletions.
    pub replace_with: String,
    /// The rule's name, unique within its set.
    pub name: String,
}

/// An ordered, compiled rule set.
#[derive(Debug)]
pub struct CompiledRules {
    /// Name of the set these rules came from (e.g., "deletions").
    pub set_name: String,
    /// Rules in application order.
    pub rules: Vec<CompiledRule>,
}

impl CompiledRules {
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

/// Compiles a list of `RewriteRule`s into `CompiledRules`.
///
/// Disabled rules (`enabled: false`) and rules without a pattern are
/// skipped. All compilation errors are collected and reported together.
pub fn compile_rules(
    set_name: &str,
    rules_to_compile: &[RewriteRule],
    mode: CompileMode,
) -> Result<CompiledRules, ReleaseError> {
    debug!("Starting compilation of {} '{}' rules.", rules_to_compile.len(), set_name);

    let mut compiled_rules = Vec::with_capacity(rules_to_compile.len());
    let mut compilation_errors = Vec::new();

    for rule in rules_to_compile {
        if rule.enabled == Some(false) {
            debug!("Rule '{}' is disabled, skipping.", rule.name);
            continue;
        }

        let Some(pattern) = rule.pattern.as_ref() else {
            warn!("Skipping rule '{}' because its pattern is missing.", rule.name);
            continue;
        };

        if pattern.len() > MAX_PATTERN_LENGTH {
            compilation_errors.push(ReleaseError::PatternLengthExceeded(
                rule.name.clone(),
                pattern.len(),
                MAX_PATTERN_LENGTH,
            ));
            continue;
        }

        let regex_result = RegexBuilder::new(pattern)
            .multi_line(mode.multi_line || rule.multiline)
            .dot_matches_new_line(mode.dot_matches_new_line || rule.dot_matches_new_line)
            .size_limit(10 * (1 << 20))
            .build();

        match regex_result {
            Ok(regex) => {
                log::debug!(
                    target: "bcrelease_core::rules",
                    "Rule '{}' compiled successfully.",
                    rule.name
                );
                compiled_rules.push(CompiledRule {
                    regex,
                    replace_with: rule.replace_with.clone(),
                    name: rule.name.clone(),
                });
            }
            Err(e) => {
                compilation_errors.push(ReleaseError::RuleCompilationError(rule.name.clone(), e));
            }
        }
    }

    if !compilation_errors.is_empty() {
        let error_message = compilation_errors
            .iter()
            .map(|e| e.to_string())
            .collect::<Vec<String>>()
            .join("\n");
        return Err(ReleaseError::Fatal(format!(
            "Failed to compile {} '{}' rule(s):\n{}",
            compilation_errors.len(),
            set_name,
            error_message
        )));
    }

    debug!("Finished compiling '{}'. Total compiled: {}.", set_name, compiled_rules.len());
    Ok(CompiledRules {
        set_name: set_name.to_string(),
        rules: compiled_rules,
    })
}

/// Compiles one set of a rule book with the flags of its pipeline stage.
pub fn compile_rule_set(kind: RuleSetKind, rules: &[RewriteRule]) -> Result<CompiledRules, ReleaseError> {
    compile_rules(kind.name(), rules, CompileMode::for_kind(kind))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_rule_order() {
        let rules = vec![
            RewriteRule::new("first", "a", "b"),
            RewriteRule::new("second", "b", "c"),
        ];
        let compiled = compile_rules("test", &rules, CompileMode::LINES).unwrap();
        let names: Vec<&str> = compiled.rules.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["first", "second"]);
    }

    #[test]
    fn skips_disabled_and_patternless_rules() {
        let rules = vec![
            RewriteRule {
                enabled: Some(false),
                ..RewriteRule::new("off", "x", "")
            },
            RewriteRule {
                name: "nothing".to_string(),
                ..RewriteRule::default()
            },
            RewriteRule::new("on", "y", ""),
        ];
        let compiled = compile_rules("test", &rules, CompileMode::default()).unwrap();
        assert_eq!(compiled.len(), 1);
        assert_eq!(compiled.rules[0].name, "on");
    }

    #[test]
    fn collects_compilation_errors() {
        let rules = vec![
            RewriteRule::new("broken", "(unclosed", ""),
            RewriteRule::new("long", &"a".repeat(MAX_PATTERN_LENGTH + 1), ""),
        ];
        let err = compile_rules("test", &rules, CompileMode::LINES).unwrap_err();
        let message = err.to_string();
        assert!(message.contains("Failed to compile 2 'test' rule(s)"));
        assert!(message.contains("broken"));
        assert!(message.contains("exceeds maximum allowed"));
    }

    #[test]
    fn span_mode_lets_dot_cross_lines() {
        let rules = vec![RewriteRule::new("span", "^a.*?c$", "")];
        let spans = compile_rule_set(RuleSetKind::DeletionsAll, &rules).unwrap();
        assert!(spans.rules[0].regex.is_match("a\nb\nc"));
        let lines = compile_rule_set(RuleSetKind::Deletions, &rules).unwrap();
        assert!(!lines.rules[0].regex.is_match("a\nb\nc"));
    }

    #[test]
    fn per_rule_flags_extend_the_set_mode() {
        let rules = vec![RewriteRule {
            dot_matches_new_line: true,
            ..RewriteRule::new("span", "a.b", "")
        }];
        let compiled = compile_rule_set(RuleSetKind::Replacements, &rules).unwrap();
        assert!(compiled.rules[0].regex.is_match("a\nb"));
    }
}
