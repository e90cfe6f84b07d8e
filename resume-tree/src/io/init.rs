//! Initialization helpers for `.resume/` scaffolding.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow};
use tracing::info;

use super::config::{EditorConfig, write_config};
use super::tree_store::write_document;
use crate::node::empty_document;

pub(crate) const DOCUMENT_SCHEMA: &str = include_str!(concat!(
    env!("CARGO_MANIFEST_DIR"),
    "/../schemas/document/v1.schema.json"
));

/// All canonical paths within `.resume/` for a project root.
#[derive(Debug, Clone)]
pub struct EditorPaths {
    pub root: PathBuf,
    pub resume_dir: PathBuf,
    pub document_path: PathBuf,
    pub schema_path: PathBuf,
    pub config_path: PathBuf,
}

impl EditorPaths {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        let resume_dir = root.join(".resume");
        Self {
            root,
            document_path: resume_dir.join("document.json"),
            schema_path: resume_dir.join("schema.json"),
            config_path: resume_dir.join("config.toml"),
            resume_dir,
        }
    }
}

/// Options for `init_workspace`.
#[derive(Debug, Clone)]
pub struct InitOptions {
    /// If true, overwrite existing editor-owned files.
    pub force: bool,
}

/// Create `.resume/` scaffolding in `root`.
///
/// Fails if `.resume/` already exists unless `options.force` is set.
pub fn init_workspace(root: &Path, options: &InitOptions) -> Result<EditorPaths> {
    let paths = EditorPaths::new(root);
    if paths.resume_dir.exists() && !paths.resume_dir.is_dir() {
        return Err(anyhow!("init: .resume exists but is not a directory"));
    }
    if paths.resume_dir.exists() && !options.force {
        return Err(anyhow!(
            "init: .resume already exists (use --force to overwrite)"
        ));
    }

    fs::create_dir_all(&paths.resume_dir)
        .with_context(|| format!("create directory {}", paths.resume_dir.display()))?;
    write_document(&paths.document_path, &empty_document())?;
    fs::write(&paths.schema_path, DOCUMENT_SCHEMA)
        .with_context(|| format!("write file {}", paths.schema_path.display()))?;
    write_config(&paths.config_path, &EditorConfig::default())?;

    info!(dir = %paths.resume_dir.display(), "initialized workspace");
    Ok(paths)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::config::load_config;

    #[test]
    fn init_creates_expected_layout() {
        let temp = tempfile::tempdir().expect("tempdir");
        let paths = init_workspace(temp.path(), &InitOptions { force: false }).expect("init");

        assert!(paths.resume_dir.is_dir());
        assert_eq!(
            fs::read_to_string(&paths.document_path).expect("read"),
            "[]\n"
        );
        assert_eq!(
            fs::read_to_string(&paths.schema_path).expect("read"),
            DOCUMENT_SCHEMA
        );
        assert_eq!(
            load_config(&paths.config_path).expect("config"),
            EditorConfig::default()
        );
    }

    #[test]
    fn init_without_force_refuses_existing_dir() {
        let temp = tempfile::tempdir().expect("tempdir");
        init_workspace(temp.path(), &InitOptions { force: false }).expect("init");
        let err = init_workspace(temp.path(), &InitOptions { force: false }).unwrap_err();
        assert!(err.to_string().contains("already exists"));
    }

    #[test]
    fn init_with_force_resets_document() {
        let temp = tempfile::tempdir().expect("tempdir");
        let paths = init_workspace(temp.path(), &InitOptions { force: false }).expect("init");
        fs::write(&paths.document_path, r#"[{"id":"a"}]"#).expect("write");

        init_workspace(temp.path(), &InitOptions { force: true }).expect("re-init");
        assert_eq!(
            fs::read_to_string(&paths.document_path).expect("read"),
            "[]\n"
        );
    }
}
