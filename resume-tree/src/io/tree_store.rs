//! Document load/save helpers with schema + invariant validation.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result, anyhow};
use jsonschema::validator_for;
use serde_json::Value;
use tracing::debug;

use crate::core::invariants::validate_invariants;
use crate::core::numbering::annotate_addresses;
use crate::node::Node;

/// Load and validate a document from disk (schema + invariants).
pub fn load_document(schema_path: &Path, document_path: &Path, max_depth: usize) -> Result<Vec<Node>> {
    let contents = fs::read_to_string(document_path)
        .with_context(|| format!("read document {}", document_path.display()))?;
    let value: Value = serde_json::from_str(&contents)
        .with_context(|| format!("parse document {}", document_path.display()))?;
    validate_schema(schema_path, &value)?;
    let tree: Vec<Node> = serde_json::from_value(value)
        .with_context(|| format!("deserialize document {}", document_path.display()))?;
    validate_document_invariants(&tree, max_depth)?;
    debug!(path = %document_path.display(), roots = tree.len(), "loaded document");
    Ok(tree)
}

/// Write a document as pretty JSON with freshly annotated addresses.
pub fn write_document(document_path: &Path, tree: &[Node]) -> Result<()> {
    let mut annotated = tree.to_vec();
    annotate_addresses(&mut annotated);
    let mut buf = serde_json::to_string_pretty(&annotated).context("serialize document")?;
    buf.push('\n');
    super::write_atomic(document_path, &buf)
}

fn validate_schema(schema_path: &Path, document: &Value) -> Result<()> {
    let schema_contents = fs::read_to_string(schema_path)
        .with_context(|| format!("read schema {}", schema_path.display()))?;
    let schema_value: Value = serde_json::from_str(&schema_contents)
        .with_context(|| format!("parse schema {}", schema_path.display()))?;
    let compiled =
        validator_for(&schema_value).map_err(|err| anyhow!("invalid schema: {}", err))?;
    if !compiled.is_valid(document) {
        let messages = compiled
            .iter_errors(document)
            .map(|err| err.to_string())
            .collect::<Vec<_>>();
        return Err(anyhow!(
            "document schema validation failed: {}",
            messages.join("; ")
        ));
    }
    Ok(())
}

fn validate_document_invariants(tree: &[Node], max_depth: usize) -> Result<()> {
    let errors = validate_invariants(tree, max_depth);
    if errors.is_empty() {
        return Ok(());
    }
    Err(anyhow!("document invariants failed: {}", errors.join("; ")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{TestWorkspace, node, sample_resume};

    #[test]
    fn write_then_load_keeps_structure_and_addresses() {
        let workspace = TestWorkspace::new().expect("workspace");
        let paths = workspace.paths();
        workspace.write_document(&sample_resume()).expect("write");

        let tree = load_document(&paths.schema_path, &paths.document_path, 64).expect("load");
        assert_eq!(tree.len(), 3);
        assert_eq!(tree[1].children[0].children[1].id, "acme-2");
        assert_eq!(tree[1].children[0].children[1].address.as_deref(), Some("1.0.1"));

        let raw = fs::read_to_string(&paths.document_path).expect("read");
        assert!(raw.ends_with("]\n"));
    }

    #[test]
    fn schema_violation_is_reported() {
        let workspace = TestWorkspace::new().expect("workspace");
        let paths = workspace.paths();
        fs::write(
            &paths.document_path,
            r#"[{ "id": "a", "layoutKind": "carousel" }]"#,
        )
        .expect("write");

        let err = load_document(&paths.schema_path, &paths.document_path, 64).expect_err("schema");
        assert!(err.to_string().contains("document schema validation failed"));
    }

    #[test]
    fn duplicate_ids_fail_invariants() {
        let workspace = TestWorkspace::new().expect("workspace");
        let paths = workspace.paths();
        workspace
            .write_document(&[node("a"), node("a")])
            .expect("write");

        let err = load_document(&paths.schema_path, &paths.document_path, 64).expect_err("dupes");
        assert!(err.to_string().contains("duplicate id 'a' at 1"));
    }

    #[test]
    fn missing_document_names_the_path() {
        let workspace = TestWorkspace::new().expect("workspace");
        let paths = workspace.paths();
        fs::remove_file(&paths.document_path).expect("remove");
        let err = load_document(&paths.schema_path, &paths.document_path, 64).expect_err("missing");
        assert!(err.to_string().contains("document.json"));
    }
}
