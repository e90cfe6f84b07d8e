//! Document node model.
//!
//! A document is a forest: an ordered list of root [`Node`]s. Identity lives in
//! [`Node::id`]; [`Node::address`] is only a cache of the node's current
//! position and is rewritten by [`crate::core::numbering::annotate_addresses`].

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Open, free-form map used for style hints and metadata.
pub type PropertyMap = BTreeMap<String, Value>;

/// Rendering hint for a node. The engine never branches on it when mutating.
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "kebab-case")]
pub enum LayoutKind {
    Heading,
    Paragraph,
    ListItem,
    KeyValue,
    Grid,
    #[default]
    Container,
}

impl LayoutKind {
    pub fn as_str(self) -> &'static str {
        match self {
            LayoutKind::Heading => "heading",
            LayoutKind::Paragraph => "paragraph",
            LayoutKind::ListItem => "list-item",
            LayoutKind::KeyValue => "key-value",
            LayoutKind::Grid => "grid",
            LayoutKind::Container => "container",
        }
    }

    /// Parse a layout name written in any common casing (`list_item`,
    /// `ListItem`, `list-item`) plus a few producer synonyms.
    pub fn parse_loose(raw: &str) -> Option<Self> {
        let folded: String = raw
            .trim()
            .chars()
            .filter(|c| !matches!(c, '-' | '_' | ' '))
            .flat_map(char::to_lowercase)
            .collect();
        match folded.as_str() {
            "heading" | "header" | "title" | "section" => Some(LayoutKind::Heading),
            "paragraph" | "text" | "summary" => Some(LayoutKind::Paragraph),
            "listitem" | "bullet" | "item" => Some(LayoutKind::ListItem),
            "keyvalue" | "kv" | "pair" => Some(LayoutKind::KeyValue),
            "grid" => Some(LayoutKind::Grid),
            "container" | "group" => Some(LayoutKind::Container),
            _ => None,
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Node {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default)]
    pub layout_kind: LayoutKind,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub style_hints: PropertyMap,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub metadata: PropertyMap,
    #[serde(default)]
    pub children: Vec<Node>,
}

impl Node {
    /// Empty container with the given id.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            address: None,
            title: None,
            text: None,
            layout_kind: LayoutKind::default(),
            style_hints: PropertyMap::new(),
            metadata: PropertyMap::new(),
            children: Vec::new(),
        }
    }

    /// Build a brand-new node from a draft. Children always start empty.
    pub fn from_draft(id: impl Into<String>, draft: &NodeDraft) -> Self {
        Self {
            title: draft.title.clone(),
            text: draft.text.clone(),
            layout_kind: draft.layout_kind.unwrap_or_default(),
            style_hints: draft.style.clone(),
            metadata: draft.metadata.clone(),
            ..Self::new(id)
        }
    }

    pub fn has_content(&self) -> bool {
        non_blank(self.title.as_deref()) || non_blank(self.text.as_deref())
    }

    /// Merge `patch` onto this node.
    ///
    /// `title`, `text` and `layout_kind` are replaced when present; `style`
    /// and `metadata` are merged key by key.
    pub fn apply_patch(&mut self, patch: &NodePatch) {
        if let Some(title) = &patch.title {
            self.title = Some(title.clone());
        }
        if let Some(text) = &patch.text {
            self.text = Some(text.clone());
        }
        if let Some(layout) = patch.layout_kind {
            self.layout_kind = layout;
        }
        for (key, value) in &patch.style {
            self.style_hints.insert(key.clone(), value.clone());
        }
        for (key, value) in &patch.metadata {
            self.metadata.insert(key.clone(), value.clone());
        }
    }
}

/// Content for a node that does not exist yet.
///
/// Drafts never carry an id: the engine assigns a fresh one on insertion.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct NodeDraft {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub layout_kind: Option<LayoutKind>,
    #[serde(default, alias = "styleHints", skip_serializing_if = "BTreeMap::is_empty")]
    pub style: PropertyMap,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub metadata: PropertyMap,
}

impl NodeDraft {
    pub fn has_content(&self) -> bool {
        non_blank(self.title.as_deref()) || non_blank(self.text.as_deref())
    }
}

/// Partial update for an existing node.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct NodePatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub layout_kind: Option<LayoutKind>,
    #[serde(default, alias = "styleHints", skip_serializing_if = "BTreeMap::is_empty")]
    pub style: PropertyMap,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub metadata: PropertyMap,
}

impl NodePatch {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.text.is_none()
            && self.layout_kind.is_none()
            && self.style.is_empty()
            && self.metadata.is_empty()
    }
}

/// A freshly initialized document has no nodes.
pub fn empty_document() -> Vec<Node> {
    Vec::new()
}

fn non_blank(value: Option<&str>) -> bool {
    value.is_some_and(|s| !s.trim().is_empty())
}
