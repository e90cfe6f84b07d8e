//! Validation of the `.resume/` layout, config, and document.

use std::path::Path;

use anyhow::{Context, Result, anyhow};

use crate::core::query::{count_nodes, max_depth};
use crate::io::config::load_config;
use crate::io::init::EditorPaths;
use crate::io::tree_store::load_document;

/// Summary of a document that passed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidateOutcome {
    pub roots: usize,
    pub nodes: usize,
    pub depth: usize,
}

/// Validate `.resume/` layout, config, and document (schema + invariants).
pub fn validate_workspace(root: &Path) -> Result<ValidateOutcome> {
    let paths = EditorPaths::new(root);

    ensure_dir(&paths.resume_dir)?;
    ensure_file(&paths.document_path)?;
    ensure_file(&paths.schema_path)?;

    let config = load_config(&paths.config_path).with_context(|| "load config.toml")?;
    let tree = load_document(&paths.schema_path, &paths.document_path, config.max_depth)
        .with_context(|| "load document.json")?;

    Ok(ValidateOutcome {
        roots: tree.len(),
        nodes: count_nodes(&tree),
        depth: max_depth(&tree),
    })
}

fn ensure_dir(path: &Path) -> Result<()> {
    if !path.exists() {
        return Err(anyhow!("missing directory {}", path.display()));
    }
    if !path.is_dir() {
        return Err(anyhow!("expected directory {}", path.display()));
    }
    Ok(())
}

fn ensure_file(path: &Path) -> Result<()> {
    if !path.exists() {
        return Err(anyhow!("missing file {}", path.display()));
    }
    if !path.is_file() {
        return Err(anyhow!("expected file {}", path.display()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::config::{EditorConfig, write_config};
    use crate::test_support::{TestWorkspace, sample_resume};

    #[test]
    fn fresh_workspace_is_valid_and_empty() {
        let workspace = TestWorkspace::new().expect("workspace");
        let outcome = validate_workspace(workspace.root()).expect("validate");
        assert_eq!(
            outcome,
            ValidateOutcome {
                roots: 0,
                nodes: 0,
                depth: 0
            }
        );
    }

    #[test]
    fn reports_document_shape() {
        let workspace = TestWorkspace::new().expect("workspace");
        workspace.write_document(&sample_resume()).expect("write");
        let outcome = validate_workspace(workspace.root()).expect("validate");
        assert_eq!(outcome.roots, 3);
        assert_eq!(outcome.nodes, 8);
        assert_eq!(outcome.depth, 3);
    }

    #[test]
    fn configured_depth_limit_applies() {
        let workspace = TestWorkspace::new().expect("workspace");
        workspace.write_document(&sample_resume()).expect("write");
        let config = EditorConfig {
            max_depth: 2,
            ..EditorConfig::default()
        };
        write_config(&workspace.paths().config_path, &config).expect("config");

        let err = validate_workspace(workspace.root()).expect_err("too deep");
        assert!(format!("{err:#}").contains("maximum depth of 2"));
    }

    #[test]
    fn missing_layout_is_reported() {
        let temp = tempfile::tempdir().expect("tempdir");
        let err = validate_workspace(temp.path()).expect_err("validate should fail");
        assert!(err.to_string().contains("missing directory"));
    }
}
