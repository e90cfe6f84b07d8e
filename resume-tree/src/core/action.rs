//! The closed set of structural edits a producer may request.
//!
//! Every address in an action refers to the numbering of the tree the action
//! is applied to. Parent-target fields accept [`ROOT_ADDRESS`] for the root
//! array.
//!
//! [`ROOT_ADDRESS`]: crate::core::numbering::ROOT_ADDRESS

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::node::{NodeDraft, NodePatch};

/// Discriminant of an [`AgentAction`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ActionKind {
    AppendChild,
    InsertSibling,
    ReplaceText,
    Update,
    Move,
    Remove,
    Reorder,
}

impl ActionKind {
    pub const ALL: [ActionKind; 7] = [
        ActionKind::AppendChild,
        ActionKind::InsertSibling,
        ActionKind::ReplaceText,
        ActionKind::Update,
        ActionKind::Move,
        ActionKind::Remove,
        ActionKind::Reorder,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ActionKind::AppendChild => "appendChild",
            ActionKind::InsertSibling => "insertSibling",
            ActionKind::ReplaceText => "replaceText",
            ActionKind::Update => "update",
            ActionKind::Move => "move",
            ActionKind::Remove => "remove",
            ActionKind::Reorder => "reorder",
        }
    }

    /// Match a kind name regardless of casing and separators
    /// (`append_child`, `APPEND-CHILD`, `appendChild`), plus a few verbs
    /// producers commonly use instead of the canonical name.
    pub fn parse_loose(raw: &str) -> Option<Self> {
        let folded: String = raw
            .trim()
            .chars()
            .filter(|c| !matches!(c, '-' | '_' | ' '))
            .flat_map(char::to_lowercase)
            .collect();
        match folded.as_str() {
            "appendchild" | "append" | "addchild" => Some(ActionKind::AppendChild),
            "insertsibling" | "insertafter" => Some(ActionKind::InsertSibling),
            "replacetext" | "settext" => Some(ActionKind::ReplaceText),
            "update" | "edit" | "patch" => Some(ActionKind::Update),
            "move" => Some(ActionKind::Move),
            "remove" | "delete" => Some(ActionKind::Remove),
            "reorder" | "sort" => Some(ActionKind::Reorder),
            _ => None,
        }
    }
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One requested mutation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum AgentAction {
    /// Create `node` as the last child of `parent` (`"0"` = new root node).
    AppendChild { parent: String, node: NodeDraft },
    /// Create `node` right after `after`, under the same parent.
    InsertSibling { after: String, node: NodeDraft },
    /// Overwrite only the `text` field.
    ReplaceText { id: String, text: String },
    /// Shallow-merge `patch` onto the node.
    Update { id: String, patch: NodePatch },
    /// Re-parent `id` under `new_parent` (`"0"` = root) at `position`,
    /// appending when no position is given.
    Move {
        id: String,
        new_parent: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        position: Option<usize>,
    },
    /// Delete the node and its subtree.
    Remove { id: String },
    /// Reorder the direct children of `id` (`"0"` = root).
    Reorder { id: String, order: Vec<String> },
}

impl AgentAction {
    pub fn kind(&self) -> ActionKind {
        match self {
            AgentAction::AppendChild { .. } => ActionKind::AppendChild,
            AgentAction::InsertSibling { .. } => ActionKind::InsertSibling,
            AgentAction::ReplaceText { .. } => ActionKind::ReplaceText,
            AgentAction::Update { .. } => ActionKind::Update,
            AgentAction::Move { .. } => ActionKind::Move,
            AgentAction::Remove { .. } => ActionKind::Remove,
            AgentAction::Reorder { .. } => ActionKind::Reorder,
        }
    }

    /// Human-readable summary used for history entries.
    pub fn describe(&self) -> String {
        match self {
            AgentAction::AppendChild { parent, node } => {
                let label = draft_label(node);
                if parent == crate::core::numbering::ROOT_ADDRESS {
                    format!("Append {label} at top level")
                } else {
                    format!("Append {label} under {parent}")
                }
            }
            AgentAction::InsertSibling { after, node } => {
                format!("Insert {} after {after}", draft_label(node))
            }
            AgentAction::ReplaceText { id, .. } => format!("Replace text of {id}"),
            AgentAction::Update { id, patch } => {
                let mut fields = Vec::new();
                if patch.title.is_some() {
                    fields.push("title");
                }
                if patch.text.is_some() {
                    fields.push("text");
                }
                if patch.layout_kind.is_some() {
                    fields.push("layout");
                }
                if !patch.style.is_empty() {
                    fields.push("style");
                }
                if !patch.metadata.is_empty() {
                    fields.push("metadata");
                }
                format!("Update {id} ({})", fields.join(", "))
            }
            AgentAction::Move {
                id,
                new_parent,
                position,
            } => match position {
                Some(position) => format!("Move {id} to {new_parent} at {position}"),
                None => format!("Move {id} to {new_parent}"),
            },
            AgentAction::Remove { id } => format!("Remove {id}"),
            AgentAction::Reorder { id, .. } => format!("Reorder children of {id}"),
        }
    }
}

fn draft_label(draft: &NodeDraft) -> String {
    match draft.title.as_deref().or(draft.text.as_deref()) {
        Some(label) => {
            let short: String = label.chars().take(40).collect();
            format!("\"{short}\"")
        }
        None => draft.layout_kind.unwrap_or_default().as_str().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn actions_use_kind_tag_and_camel_case_fields() {
        let action = AgentAction::Move {
            id: "1.0".to_string(),
            new_parent: "0".to_string(),
            position: Some(2),
        };
        let value = serde_json::to_value(&action).expect("serialize");
        assert_eq!(
            value,
            json!({ "kind": "move", "id": "1.0", "newParent": "0", "position": 2 })
        );
    }

    #[test]
    fn canonical_json_deserializes_into_the_union() {
        let action: AgentAction = serde_json::from_value(json!({
            "kind": "appendChild",
            "parent": "1",
            "node": { "title": "Globex", "layoutKind": "container" }
        }))
        .expect("deserialize");
        assert_eq!(action.kind(), ActionKind::AppendChild);
        assert_eq!(action.describe(), "Append \"Globex\" under 1");
    }

    #[test]
    fn parse_loose_folds_case_and_separators() {
        assert_eq!(ActionKind::parse_loose("append_child"), Some(ActionKind::AppendChild));
        assert_eq!(ActionKind::parse_loose("INSERT-SIBLING"), Some(ActionKind::InsertSibling));
        assert_eq!(ActionKind::parse_loose("delete"), Some(ActionKind::Remove));
        assert_eq!(ActionKind::parse_loose("explode"), None);
        for kind in ActionKind::ALL {
            assert_eq!(ActionKind::parse_loose(kind.as_str()), Some(kind));
        }
    }
}
