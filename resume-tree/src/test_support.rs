//! Test-only helpers for constructing documents and scratch workspaces.

use std::path::Path;

use anyhow::Result;
use tempfile::TempDir;

use crate::io::init::{EditorPaths, InitOptions, init_workspace};
use crate::io::tree_store::write_document;
use crate::node::{LayoutKind, Node};

/// Create a bare container node with no content and no children.
pub fn node(id: &str) -> Node {
    Node::new(id)
}

/// Create a node with a title and explicit layout.
pub fn titled(id: &str, title: &str, layout: LayoutKind) -> Node {
    Node {
        title: Some(title.to_string()),
        layout_kind: layout,
        ..Node::new(id)
    }
}

/// Create a list item carrying `text`.
pub fn bullet(id: &str, text: &str) -> Node {
    Node {
        text: Some(text.to_string()),
        layout_kind: LayoutKind::ListItem,
        ..Node::new(id)
    }
}

/// Create a container with children.
pub fn node_with_children(id: &str, children: Vec<Node>) -> Node {
    Node {
        children,
        ..node(id)
    }
}

/// Small resume used across tests (8 nodes, 3 levels).
///
/// ```text
/// 0     header        "Jane Doe"
/// 0.0     contact
/// 1     experience    "Experience"
/// 1.0     job-acme    "Acme"
/// 1.0.0     acme-1
/// 1.0.1     acme-2
/// 1.1     job-initech "Initech"
/// 2     skills        "Skills"
/// ```
pub fn sample_resume() -> Vec<Node> {
    let mut contact = titled("contact", "Email", LayoutKind::KeyValue);
    contact.text = Some("jane@example.com".to_string());

    vec![
        Node {
            children: vec![contact],
            ..titled("header", "Jane Doe", LayoutKind::Heading)
        },
        Node {
            children: vec![
                Node {
                    children: vec![
                        bullet("acme-1", "Shipped the billing rewrite"),
                        bullet("acme-2", "Mentored four engineers"),
                    ],
                    ..titled("job-acme", "Acme", LayoutKind::Container)
                },
                titled("job-initech", "Initech", LayoutKind::Container),
            ],
            ..titled("experience", "Experience", LayoutKind::Heading)
        },
        titled("skills", "Skills", LayoutKind::Heading),
    ]
}

/// Child ids of the node with `id`, or of the root array when `id` is `None`.
pub fn child_ids(tree: &[Node], id: Option<&str>) -> Vec<String> {
    let children = match id {
        None => tree,
        Some(id) => match crate::core::query::find_node_by_id(tree, id) {
            Some(node) => node.children.as_slice(),
            None => return Vec::new(),
        },
    };
    children.iter().map(|child| child.id.clone()).collect()
}

/// Temporary directory with an initialized `.resume/` workspace.
pub struct TestWorkspace {
    temp: TempDir,
    paths: EditorPaths,
}

impl TestWorkspace {
    pub fn new() -> Result<Self> {
        let temp = tempfile::tempdir()?;
        let paths = init_workspace(temp.path(), &InitOptions { force: false })?;
        Ok(Self { temp, paths })
    }

    pub fn root(&self) -> &Path {
        self.temp.path()
    }

    pub fn paths(&self) -> &EditorPaths {
        &self.paths
    }

    pub fn write_document(&self, tree: &[Node]) -> Result<()> {
        write_document(&self.paths.document_path, tree)
    }
}
