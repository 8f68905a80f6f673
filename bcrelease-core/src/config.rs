//! Configuration management for `bcrelease-core`.
//!
//! This module defines the rule book (the ordered rewrite rule sets) and the
//! release layout (where the inputs live and where the merged file goes).
//! It handles YAML (de)serialization and provides utilities for loading,
//! merging and validating configurations.
//!
//! License: 0BSD

use anyhow::{Context, Result};
use log::{debug, info, warn};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::path::{Path, PathBuf};

use crate::errors::ReleaseError;

/// Maximum allowed length for a regex pattern string.
pub const MAX_PATTERN_LENGTH: usize = 500;

/// A single rewrite rule: a pattern and what to put in place of every match.
///
/// A rule with an empty `replace_with` is a deletion rule.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct RewriteRule {
    /// Unique identifier for the rule within its set (e.g., "include").
    pub name: String,
    /// Human-readable note on what the rule adapts.
    pub description: Option<String>,
    /// The regex pattern string.
    pub pattern: Option<String>,
    /// Replacement text. `${1}` style references pull in capture groups.
    pub replace_with: String,
    /// Forces multi-line mode on top of the set's default.
    pub multiline: bool,
    /// Forces `.` to match newlines on top of the set's default.
    pub dot_matches_new_line: bool,
    /// Explicit override for enabling/disabling the rule.
    pub enabled: Option<bool>,
}

impl RewriteRule {
    /// Convenience constructor used by tests and programmatic callers.
    pub fn new(name: &str, pattern: &str, replace_with: &str) -> Self {
        Self {
            name: name.to_string(),
            pattern: Some(pattern.to_string()),
            replace_with: replace_with.to_string(),
            ..Self::default()
        }
    }

    pub fn is_deletion(&self) -> bool {
        self.replace_with.is_empty()
    }
}

/// The four rule sets of a release, in the order the pipeline runs them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RuleSetKind {
    /// Applied to the primary file alone.
    Primary,
    /// Line deletions over the whole buffer.
    Deletions,
    /// Span deletions over the whole buffer.
    DeletionsAll,
    /// Renames over the whole buffer.
    Replacements,
}

impl RuleSetKind {
    pub const ALL: [RuleSetKind; 4] = [
        RuleSetKind::Primary,
        RuleSetKind::Deletions,
        RuleSetKind::DeletionsAll,
        RuleSetKind::Replacements,
    ];

    pub fn name(self) -> &'static str {
        match self {
            RuleSetKind::Primary => "primary",
            RuleSetKind::Deletions => "deletions",
            RuleSetKind::DeletionsAll => "deletions_all",
            RuleSetKind::Replacements => "replacements",
        }
    }
}

impl fmt::Display for RuleSetKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// All rewrite rules of a release, grouped by the stage that applies them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct RuleBook {
    pub primary: Vec<RewriteRule>,
    pub deletions: Vec<RewriteRule>,
    pub deletions_all: Vec<RewriteRule>,
    pub replacements: Vec<RewriteRule>,
}

impl RuleBook {
    pub fn set(&self, kind: RuleSetKind) -> &[RewriteRule] {
        match kind {
            RuleSetKind::Primary => &self.primary,
            RuleSetKind::Deletions => &self.deletions,
            RuleSetKind::DeletionsAll => &self.deletions_all,
            RuleSetKind::Replacements => &self.replacements,
        }
    }

    fn set_mut(&mut self, kind: RuleSetKind) -> &mut Vec<RewriteRule> {
        match kind {
            RuleSetKind::Primary => &mut self.primary,
            RuleSetKind::Deletions => &mut self.deletions,
            RuleSetKind::DeletionsAll => &mut self.deletions_all,
            RuleSetKind::Replacements => &mut self.replacements,
        }
    }

    pub fn len(&self) -> usize {
        RuleSetKind::ALL.iter().map(|k| self.set(*k).len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drops the named rules from every set. Order of the survivors is kept.
    pub fn set_active_rules(&mut self, disable_rules: &[String]) {
        let disable_set: HashSet<&str> = disable_rules.iter().map(String::as_str).collect();
        let all_rule_names: HashSet<&str> = RuleSetKind::ALL
            .iter()
            .flat_map(|k| self.set(*k).iter().map(|r| r.name.as_str()))
            .collect();

        for rule_name in disable_set.difference(&all_rule_names) {
            warn!("Rule '{}' in `disable_rules` list does not exist.", rule_name);
        }

        debug!("Initial rules count before filtering: {}", self.len());
        for kind in RuleSetKind::ALL {
            self.set_mut(kind)
                .retain(|rule| !disable_set.contains(rule.name.as_str()));
        }
        debug!("Final active rules count after filtering: {}", self.len());
    }
}

/// Where a release reads its inputs from and writes its output to.
///
/// Input paths are relative to the bc project root, `output` is relative to
/// the target (toybox) directory.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct ReleaseLayout {
    /// Newline-separated list of sources to concatenate.
    pub manifest: PathBuf,
    /// The file rewritten by the `primary` rule set before it is appended.
    pub primary: PathBuf,
    /// Prepended verbatim to the final output.
    pub header: PathBuf,
    pub output: PathBuf,
    /// Number of license lines at the top of every source file.
    pub header_lines: usize,
    /// Run in the project root before anything is read. Empty to skip.
    pub build_command: Vec<String>,
}

impl Default for ReleaseLayout {
    fn default() -> Self {
        Self {
            manifest: PathBuf::from("toybox/files.txt"),
            primary: PathBuf::from("src/bc.c"),
            header: PathBuf::from("toybox/header.c"),
            output: PathBuf::from("toys/pending/bc.c"),
            header_lines: 22,
            build_command: vec!["make".to_string(), "lib/lib.c".to_string()],
        }
    }
}

/// Top-level configuration: layout plus rule book.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct ReleaseConfig {
    #[serde(default)]
    pub layout: ReleaseLayout,
    #[serde(default)]
    pub rules: RuleBook,
}

impl ReleaseConfig {
    /// Loads a configuration from a YAML file and validates its rules.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        info!("Loading custom rules from: {}", path.display());
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config: ReleaseConfig = serde_yml::from_str(&text)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;

        validate_rule_book(&config.rules)?;
        info!("Loaded {} rules from file {}.", config.rules.len(), path.display());

        Ok(config)
    }

    /// Loads the built-in rule book from the embedded configuration.
    pub fn load_default_rules() -> Result<Self> {
        debug!("Loading default rules from embedded string...");
        let default_yaml = include_str!("../config/default_rules.yaml");
        let config: ReleaseConfig =
            serde_yml::from_str(default_yaml).context("Failed to parse default rules")?;

        debug!("Loaded {} default rules.", config.rules.len());
        Ok(config)
    }
}

/// Merges a user configuration over the defaults.
///
/// The user's layout wins (fields it leaves out fall back to the built-in
/// layout when it is parsed). Within each rule set a user rule whose name
/// already exists replaces that rule at the same position; new rules are
/// appended in the user's order.
pub fn merge_config(default_config: ReleaseConfig, user_config: Option<ReleaseConfig>) -> ReleaseConfig {
    let Some(user_cfg) = user_config else {
        debug!("No user config provided, using {} default rules.", default_config.rules.len());
        return default_config;
    };

    debug!("User config provided. Merging {} user rules.", user_cfg.rules.len());
    let mut rules = default_config.rules;
    for kind in RuleSetKind::ALL {
        let merged = merge_rule_list(std::mem::take(rules.set_mut(kind)), user_cfg.rules.set(kind));
        *rules.set_mut(kind) = merged;
    }
    debug!("Final total rules after merge: {}", rules.len());

    ReleaseConfig {
        layout: user_cfg.layout,
        rules,
    }
}

fn merge_rule_list(mut base: Vec<RewriteRule>, overrides: &[RewriteRule]) -> Vec<RewriteRule> {
    for user_rule in overrides {
        match base.iter_mut().find(|r| r.name == user_rule.name) {
            Some(existing) => {
                debug!("Overriding rule '{}' in place.", user_rule.name);
                *existing = user_rule.clone();
            }
            None => base.push(user_rule.clone()),
        }
    }
    base
}

/// Validates every set of a rule book, collecting all problems in one error.
pub fn validate_rule_book(book: &RuleBook) -> Result<()> {
    let errors: Vec<String> = RuleSetKind::ALL
        .iter()
        .flat_map(|kind| validate_rules(kind.name(), book.set(*kind)))
        .collect();

    if errors.is_empty() {
        Ok(())
    } else {
        Err(ReleaseError::InvalidConfig(format!("rule validation failed:\n{}", errors.join("\n"))).into())
    }
}

/// Checks rule integrity: names, pattern presence, regex syntax and capture
/// group references in the replacement.
fn validate_rules(set_name: &str, rules: &[RewriteRule]) -> Vec<String> {
    let mut rule_names = HashSet::new();
    let mut errors = Vec::new();
    let capture_group_regex = Regex::new(r"\$\{?(\d+)\}?").expect("static regex");

    for rule in rules {
        if rule.name.is_empty() {
            errors.push(format!("[{}] A rule has an empty `name` field.", set_name));
        } else if !rule_names.insert(rule.name.as_str()) {
            errors.push(format!("[{}] Duplicate rule name found: '{}'.", set_name, rule.name));
        }

        let pattern = match &rule.pattern {
            Some(p) if !p.is_empty() => p,
            Some(_) => {
                errors.push(format!("[{}] Rule '{}' has an empty `pattern` field.", set_name, rule.name));
                continue;
            }
            None => {
                errors.push(format!("[{}] Rule '{}' is missing the `pattern` field.", set_name, rule.name));
                continue;
            }
        };

        if pattern.len() > MAX_PATTERN_LENGTH {
            errors.push(format!(
                "[{}] Rule '{}': pattern length ({}) exceeds maximum allowed ({}).",
                set_name,
                rule.name,
                pattern.len(),
                MAX_PATTERN_LENGTH
            ));
            continue;
        }

        let regex = match Regex::new(pattern) {
            Ok(r) => r,
            Err(e) => {
                errors.push(format!("[{}] Rule '{}' has an invalid regex pattern: {}", set_name, rule.name, e));
                continue;
            }
        };

        // captures_len counts the implicit whole-match group.
        let group_count = regex.captures_len() - 1;
        for cap in capture_group_regex.captures_iter(&rule.replace_with) {
            if let Some(group_num) = cap.get(1).and_then(|m| m.as_str().parse::<usize>().ok()) {
                if group_num > group_count {
                    errors.push(format!(
                        "[{}] Rule '{}': replacement references non-existent capture group '${}'.",
                        set_name, rule.name, group_num
                    ));
                }
            }
        }
    }

    errors
}
