//! The amalgamation pipeline: concatenate, rewrite, prepend, normalize.
//!
//! Stages run in a fixed order over a single owned buffer:
//!
//! 1. manifest sources, license headers stripped, appended in order;
//! 2. the primary file, rewritten by the `primary` set, appended last;
//! 3. `deletions`, then `deletions_all`, then `replacements` over the buffer;
//! 4. the header file prepended verbatim;
//! 5. runs of blank lines collapsed.
//!
//! License: 0BSD

use anyhow::{Context, Result};
use log::{debug, info};
use once_cell::sync::Lazy;
use regex::Regex;
use std::path::{Path, PathBuf};

use crate::config::{ReleaseConfig, RuleBook, RuleSetKind};
use crate::engine::{RewriteEngine, RewriteSummaryItem};
use crate::engines::regex_engine::RegexEngine;
use crate::source::{read_header, read_manifest, read_source};

static BLANK_LINE_RUNS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\n\n\n+").expect("blank line regex is valid"));

/// Replaces every run of three or more newlines with exactly two.
pub fn collapse_blank_lines(text: &str) -> String {
    BLANK_LINE_RUNS.replace_all(text, "\n\n").into_owned()
}

/// The result of assembling a release in memory.
#[derive(Debug, Clone)]
pub struct Assembly {
    /// The merged source, ready to be written.
    pub content: String,
    /// Per-rule match counts, in application order across all sets.
    pub summary: Vec<RewriteSummaryItem>,
    /// Every file that went into `content`: manifest entries, then the primary file.
    pub sources: Vec<PathBuf>,
}

/// The compiled rule book, one engine per stage.
pub struct Pipeline {
    primary: Box<dyn RewriteEngine>,
    shared: Vec<Box<dyn RewriteEngine>>,
}

impl Pipeline {
    pub fn new(rules: &RuleBook) -> Result<Self> {
        let primary: Box<dyn RewriteEngine> =
            Box::new(RegexEngine::new(RuleSetKind::Primary, rules.set(RuleSetKind::Primary))?);
        let shared = [RuleSetKind::Deletions, RuleSetKind::DeletionsAll, RuleSetKind::Replacements]
            .into_iter()
            .map(|kind| -> Result<Box<dyn RewriteEngine>> {
                Ok(Box::new(RegexEngine::new(kind, rules.set(kind))?))
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self { primary, shared })
    }

    /// Runs every stage over already-stripped source bodies.
    pub fn run(
        &self,
        header: &str,
        sources: &[String],
        primary: &str,
    ) -> Result<(String, Vec<RewriteSummaryItem>)> {
        let mut content: String = sources.concat();
        let mut summary = Vec::new();

        let (primary_body, primary_summary) = self
            .primary
            .rewrite(primary)
            .context("Failed to rewrite the primary source")?;
        content.push_str(&primary_body);
        summary.extend(primary_summary);

        for engine in &self.shared {
            let set_name = &engine.compiled_rules().set_name;
            debug!("Applying {} '{}' rules to {} bytes.", engine.compiled_rules().len(), set_name, content.len());
            let (rewritten, stage_summary) = engine
                .rewrite(&content)
                .with_context(|| format!("Failed to apply '{}' rules", set_name))?;
            content = rewritten;
            summary.extend(stage_summary);
        }

        let mut merged = String::with_capacity(header.len() + content.len());
        merged.push_str(header);
        merged.push_str(&content);

        Ok((collapse_blank_lines(&merged), summary))
    }
}

/// Assembles a release from text already in memory.
///
/// `sources` and `primary` must already have their license headers removed.
pub fn assemble_from_parts(
    rules: &RuleBook,
    header: &str,
    sources: &[String],
    primary: &str,
) -> Result<Assembly> {
    let (content, summary) = Pipeline::new(rules)?.run(header, sources, primary)?;
    Ok(Assembly {
        content,
        summary,
        sources: Vec::new(),
    })
}

/// Reads every input below `project_root` and assembles the release.
pub fn assemble(config: &ReleaseConfig, project_root: &Path) -> Result<Assembly> {
    let layout = &config.layout;
    let pipeline = Pipeline::new(&config.rules)?;

    let manifest = read_manifest(&project_root.join(&layout.manifest))?;
    info!("Concatenating {} source file(s).", manifest.len());

    let mut bodies = Vec::with_capacity(manifest.len());
    let mut sources = Vec::with_capacity(manifest.len() + 1);
    for name in manifest {
        let path = project_root.join(&name);
        bodies.push(read_source(&path, layout.header_lines)?);
        sources.push(name);
    }

    let primary = read_source(&project_root.join(&layout.primary), layout.header_lines)?;
    sources.push(layout.primary.clone());

    let header = read_header(&project_root.join(&layout.header))?;

    let (content, summary) = pipeline.run(&header, &bodies, &primary)?;
    info!("Assembled {} bytes from {} file(s).", content.len(), sources.len());

    Ok(Assembly {
        content,
        summary,
        sources,
    })
}
