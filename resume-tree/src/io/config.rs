//! Editor configuration stored under `.resume/config.toml`.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result, anyhow};
use serde::{Deserialize, Serialize};

use crate::core::history::DEFAULT_HISTORY_LIMIT;
use crate::core::outline::DEFAULT_TEXT_LIMIT;

/// Editor configuration (TOML).
///
/// Meant to be edited by hand. Missing fields fall back to defaults.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct EditorConfig {
    /// Snapshots kept for undo (0 = unlimited).
    pub history_limit: usize,

    /// Prefix for generated node ids (`{prefix}-{uuid}`).
    pub id_prefix: String,

    /// Deepest nesting a stored document may have.
    pub max_depth: usize,

    /// Characters of node text shown per outline line (0 = no limit).
    pub outline_text_limit: usize,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            history_limit: DEFAULT_HISTORY_LIMIT,
            id_prefix: "node".to_string(),
            max_depth: 64,
            outline_text_limit: DEFAULT_TEXT_LIMIT,
        }
    }
}

impl EditorConfig {
    pub fn validate(&self) -> Result<()> {
        if self.max_depth == 0 {
            return Err(anyhow!("max_depth must be > 0"));
        }
        if self
            .id_prefix
            .chars()
            .any(|c| !(c.is_ascii_alphanumeric() || c == '-' || c == '_'))
        {
            return Err(anyhow!(
                "id_prefix may only contain ASCII letters, digits, '-' and '_'"
            ));
        }
        Ok(())
    }
}

/// Load config from a TOML file.
///
/// If the file is missing, returns `EditorConfig::default()`.
pub fn load_config(path: &Path) -> Result<EditorConfig> {
    if !path.exists() {
        let cfg = EditorConfig::default();
        cfg.validate()?;
        return Ok(cfg);
    }
    let contents = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    let cfg: EditorConfig =
        toml::from_str(&contents).with_context(|| format!("parse {}", path.display()))?;
    cfg.validate()
        .with_context(|| format!("invalid config {}", path.display()))?;
    Ok(cfg)
}

/// Atomically write config to disk (temp file + rename).
pub fn write_config(path: &Path, cfg: &EditorConfig) -> Result<()> {
    cfg.validate()?;
    let mut buf = toml::to_string_pretty(cfg).context("serialize config toml")?;
    buf.push('\n');
    super::write_atomic(path, &buf)
}
