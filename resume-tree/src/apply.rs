//! Orchestration for `resume-tree outline` and `resume-tree apply`.

use std::fmt::Write as _;
use std::path::Path;

use anyhow::{Context, Result};
use tracing::info;

use crate::core::batch::{ActionFailure, BatchOutcome};
use crate::core::query::count_nodes;
use crate::io::actions_file::load_actions;
use crate::io::config::load_config;
use crate::io::init::EditorPaths;
use crate::io::tree_store::{load_document, write_document};
use crate::session::EditorSession;

#[derive(Debug, Clone, Default)]
pub struct ApplyOptions {
    /// Report what would change without writing the document.
    pub dry_run: bool,
}

/// What `apply` did.
#[derive(Debug, Clone)]
pub struct ApplyReport {
    pub outcome: BatchOutcome,
    /// True when the document on disk was rewritten.
    pub written: bool,
    /// Outline of the resulting document.
    pub outline: String,
}

impl ApplyReport {
    pub fn is_complete(&self) -> bool {
        self.outcome.is_complete()
    }

    /// Human-readable summary: one line per action, then the outline.
    pub fn render(&self) -> String {
        let mut out = String::new();
        for applied in &self.outcome.applied {
            let _ = writeln!(out, "ok     #{} {}", applied.index, applied.action.describe());
        }
        for failed in &self.outcome.failed {
            let kind = failed.kind.map_or("unknown", |kind| kind.as_str());
            match &failed.failure {
                ActionFailure::Invalid { issues } => {
                    let _ = writeln!(out, "failed #{} {kind}: invalid", failed.index);
                    for issue in issues {
                        let _ = writeln!(out, "         {issue}");
                    }
                }
                ActionFailure::Rejected { message } => {
                    let _ = writeln!(out, "failed #{} {message}", failed.index);
                }
            }
        }
        let _ = writeln!(
            out,
            "{} applied, {} failed{}",
            self.outcome.applied.len(),
            self.outcome.failed.len(),
            if self.written { "" } else { " (document not written)" }
        );
        out.push('\n');
        out.push_str(&self.outline);
        out
    }
}

/// Load config and document from `.resume/` into a fresh session.
pub fn open_session(root: &Path) -> Result<(EditorPaths, EditorSession)> {
    let paths = EditorPaths::new(root);
    let config = load_config(&paths.config_path).with_context(|| "load config.toml")?;
    let tree = load_document(&paths.schema_path, &paths.document_path, config.max_depth)
        .with_context(|| "load document.json")?;
    let session = EditorSession::from_config(tree, &config);
    Ok((paths, session))
}

/// Print-ready outline of the stored document.
pub fn outline_from_root(root: &Path) -> Result<String> {
    let (_, session) = open_session(root)?;
    let mut out = session.outline();
    let _ = writeln!(out, "{} nodes", count_nodes(session.tree()));
    Ok(out)
}

/// Normalize and apply the actions in `actions_path` to the stored document.
pub fn apply_from_root(root: &Path, actions_path: &Path, options: &ApplyOptions) -> Result<ApplyReport> {
    let (paths, mut session) = open_session(root)?;
    let raw = load_actions(actions_path)?;
    info!(actions = raw.len(), dry_run = options.dry_run, "applying actions");

    let outcome = session.dispatch_raw_batch(&raw);
    let written = !options.dry_run && !outcome.applied.is_empty();
    if written {
        write_document(&paths.document_path, session.tree())
            .with_context(|| "write document.json")?;
    }

    Ok(ApplyReport {
        outline: session.outline(),
        outcome,
        written,
    })
}
