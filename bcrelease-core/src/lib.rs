//! # bcrelease Core Library
//!
//! `bcrelease-core` merges the bc sources into the single `toys/pending/bc.c`
//! that toybox compiles. It owns the ordered rewrite rule book, compiles it
//! into regex engines, and runs the amalgamation pipeline. It has no
//! terminal or argument-parsing concerns.
//!
//! ## Modules
//!
//! * `config`: `RewriteRule`, `RuleBook`, `ReleaseLayout`, `ReleaseConfig`; YAML loading, merging, validation.
//! * `rules`: compiles rule sets into regexes with the flags of their stage.
//! * `engine`: the `RewriteEngine` trait and `RewriteSummaryItem`.
//! * `engines`: concrete engines (`RegexEngine`).
//! * `source`: manifest parsing and license header stripping.
//! * `prebuild`: the external build step run before assembly.
//! * `pipeline`: concatenation, rewriting, header, blank line collapsing.
//! * `output`: atomic write of the merged file.
//! * `release`: the one-shot run tying the above together.
//!
//! ## Usage Example
//!
//! ```rust
//! use bcrelease_core::{assemble_from_parts, ReleaseConfig};
//! use anyhow::Result;
//!
//! fn main() -> Result<()> {
//!     let config = ReleaseConfig::load_default_rules()?;
//!     let sources = vec!["#include <stdio.h>\nbool ok = true;\n".to_string()];
//!     let assembly = assemble_from_parts(&config.rules, "/* toybox header */\n", &sources, "")?;
//!     assert_eq!(assembly.content, "/* toybox header */\n\nint ok = 1;\n");
//!     Ok(())
//! }
//! ```
//!
//! ## Error Handling
//!
//! Fallible operations return `anyhow::Result` with file path context;
//! rule compilation problems are `ReleaseError` values.
//!
//! License: 0BSD

pub mod config;
pub mod engine;
pub mod engines;
pub mod errors;
pub mod output;
pub mod pipeline;
pub mod prebuild;
pub mod release;
pub mod rules;
pub mod source;

pub use config::{
    merge_config,
    validate_rule_book,
    ReleaseConfig,
    ReleaseLayout,
    RewriteRule,
    RuleBook,
    RuleSetKind,
    MAX_PATTERN_LENGTH,
};

pub use errors::ReleaseError;

pub use engine::{RewriteEngine, RewriteSummaryItem};
pub use engines::regex_engine::RegexEngine;

pub use rules::compiler::{compile_rule_set, compile_rules, CompileMode, CompiledRule, CompiledRules};

pub use pipeline::{assemble, assemble_from_parts, collapse_blank_lines, Assembly, Pipeline};
pub use prebuild::{run_build_step, BuildOutcome};
pub use release::{run_release, ReleaseOptions, ReleaseOutcome};
pub use source::{normalize_line_endings, parse_manifest, read_header, read_manifest, read_source, strip_header};
pub use output::{ensure_target_dir, output_path, read_previous, write_atomic};
