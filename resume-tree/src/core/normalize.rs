//! Normalization of loosely shaped, producer-emitted action JSON.
//!
//! Language models rarely emit the canonical action shape verbatim. This
//! module rewrites the common deviations (alternate discriminator keys,
//! snake_case field names, numeric addresses, flattened node content) into
//! the canonical form, logs every rewrite at `debug`, and hands the result to
//! [`validate_raw_action`]. Anything it does not recognize is left in place so
//! validation rejects it instead of guessing.

use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::core::action::{ActionKind, AgentAction};
use crate::core::validator::{ValidationIssue, has_blocking, validate_raw_action};
use crate::node::LayoutKind;

const KIND_KEYS: [&str; 3] = ["kind", "type", "action"];
const CONTENT_KEYS: [&str; 6] = ["title", "text", "layoutKind", "layout", "style", "metadata"];

/// Normalize and validate one raw action.
///
/// Returns the typed action, or every blocking and non-blocking issue found
/// when the action cannot be applied.
pub fn normalize_action(raw: &Value) -> Result<AgentAction, Vec<ValidationIssue>> {
    let Some(object) = raw.as_object() else {
        return Err(vec![ValidationIssue::error("action", "must be a JSON object")]);
    };

    let mut fields = object.clone();
    let mut warnings = Vec::new();
    if let Some(kind) = normalize_kind(&mut fields) {
        rename_aliases(&mut fields, kind);
        coerce_addresses(&mut fields, kind);
        coerce_position(&mut fields);
        lift_content(&mut fields, kind);
        for key in ["node", "patch"] {
            if let Some(Value::Object(content)) = fields.get_mut(key) {
                normalize_content(content, key, &mut warnings);
            }
        }
    }

    let value = Value::Object(fields);
    let mut issues = validate_raw_action(&value);
    if has_blocking(&issues) {
        issues.extend(warnings);
        return Err(issues);
    }

    match serde_json::from_value::<AgentAction>(value) {
        Ok(action) => {
            for issue in warnings.iter().chain(&issues) {
                warn!(kind = %action.kind(), %issue, "action accepted with warning");
            }
            Ok(action)
        }
        Err(err) => {
            issues.push(ValidationIssue::error("action", err.to_string()));
            Err(issues)
        }
    }
}

/// Resolve the discriminator into a canonical `kind` string.
fn normalize_kind(fields: &mut Map<String, Value>) -> Option<ActionKind> {
    let (key, raw) = KIND_KEYS.iter().find_map(|key| match fields.get(*key) {
        Some(Value::String(raw)) => Some((*key, raw.clone())),
        _ => None,
    })?;
    let kind = ActionKind::parse_loose(&raw)?;

    if key != "kind" {
        fields.remove(key);
        debug!(from = key, "moved action discriminator to 'kind'");
    }
    if raw != kind.as_str() {
        debug!(raw = %raw, kind = %kind, "normalized action kind");
    }
    fields.insert("kind".to_string(), Value::String(kind.as_str().to_string()));
    Some(kind)
}

fn field_aliases(kind: ActionKind) -> &'static [(&'static str, &'static [&'static str])] {
    const ID: &[&str] = &["nodeId", "node_id", "target", "address"];
    match kind {
        ActionKind::AppendChild => &[("parent", &["parentId", "parent_id", "parentAddress", "target"])],
        ActionKind::InsertSibling => {
            &[("after", &["afterId", "after_id", "sibling", "target", "id"])]
        }
        ActionKind::ReplaceText => &[("id", ID), ("text", &["content", "value"])],
        ActionKind::Update => &[("id", ID), ("patch", &["changes", "updates", "fields"])],
        ActionKind::Move => &[
            ("id", ID),
            (
                "newParent",
                &["new_parent", "newParentId", "new_parent_id", "parent", "parentId", "to"],
            ),
            ("position", &["index", "at"]),
        ],
        ActionKind::Remove => &[("id", ID)],
        ActionKind::Reorder => &[
            ("id", &["parent", "parentId", "parent_id", "nodeId", "target"]),
            ("order", &["children", "ids", "newOrder", "new_order"]),
        ],
    }
}

/// Move aliased fields to their canonical names, never overwriting a field
/// that is already present.
fn rename_aliases(fields: &mut Map<String, Value>, kind: ActionKind) {
    for (canonical, aliases) in field_aliases(kind) {
        if fields.contains_key(*canonical) {
            continue;
        }
        let Some(alias) = aliases.iter().find(|alias| fields.contains_key(**alias)) else {
            continue;
        };
        if let Some(value) = fields.remove(*alias) {
            debug!(%kind, from = *alias, to = *canonical, "renamed action field");
            fields.insert((*canonical).to_string(), value);
        }
    }
}

fn address_fields(kind: ActionKind) -> &'static [&'static str] {
    match kind {
        ActionKind::AppendChild => &["parent"],
        ActionKind::InsertSibling => &["after"],
        ActionKind::Move => &["id", "newParent"],
        ActionKind::ReplaceText
        | ActionKind::Update
        | ActionKind::Remove
        | ActionKind::Reorder => &["id"],
    }
}

fn coerce_addresses(fields: &mut Map<String, Value>, kind: ActionKind) {
    for field in address_fields(kind) {
        if let Some(value) = fields.get_mut(*field) {
            coerce_address(value, field);
        }
    }
    if let Some(Value::Array(entries)) = fields.get_mut("order") {
        for entry in entries {
            coerce_address(entry, "order");
        }
    }
}

fn coerce_address(value: &mut Value, field: &str) {
    match value {
        // Only whole numbers are unambiguous: `1.10` parses as 1.1.
        Value::Number(number) if number.is_u64() => {
            let text = number.to_string();
            debug!(field, address = %text, "coerced numeric address to string");
            *value = Value::String(text);
        }
        Value::Number(number) => {
            warn!(field, value = %number, "left fractional numeric address for validation");
        }
        Value::String(text) if text.trim() != text.as_str() => {
            debug!(field, "trimmed address");
            *text = text.trim().to_string();
        }
        _ => {}
    }
}

fn coerce_position(fields: &mut Map<String, Value>) {
    match fields.get("position") {
        Some(Value::Null) => {
            fields.remove("position");
        }
        Some(Value::String(text)) => {
            if let Ok(position) = text.trim().parse::<u64>() {
                debug!(position, "parsed string position");
                fields.insert("position".to_string(), Value::from(position));
            }
        }
        _ => {}
    }
}

/// Build `node`/`patch` from top-level content fields when the producer
/// flattened them into the action.
fn lift_content(fields: &mut Map<String, Value>, kind: ActionKind) {
    let target = match kind {
        ActionKind::AppendChild | ActionKind::InsertSibling => "node",
        ActionKind::Update => "patch",
        _ => return,
    };
    if fields.contains_key(target) {
        return;
    }

    let mut content = Map::new();
    for key in CONTENT_KEYS {
        if let Some(value) = fields.remove(key) {
            content.insert(key.to_string(), value);
        }
    }
    if !content.is_empty() {
        debug!(%kind, field = target, "lifted top-level content into nested object");
        fields.insert(target.to_string(), Value::Object(content));
    }
}

fn normalize_content(
    content: &mut Map<String, Value>,
    field: &str,
    warnings: &mut Vec<ValidationIssue>,
) {
    for (canonical, alias) in [
        ("layoutKind", "layout_kind"),
        ("layoutKind", "layout"),
        ("style", "style_hints"),
    ] {
        if !content.contains_key(canonical) {
            if let Some(value) = content.remove(alias) {
                debug!(field, from = alias, to = canonical, "renamed node field");
                content.insert(canonical.to_string(), value);
            }
        }
    }

    if let Some(Value::String(raw)) = content.get("layoutKind").cloned() {
        let layout = match LayoutKind::parse_loose(&raw) {
            Some(layout) => layout,
            None => {
                warnings.push(ValidationIssue::warning(
                    format!("{field}.layoutKind"),
                    format!("unknown layout '{raw}', using 'container'"),
                ));
                LayoutKind::Container
            }
        };
        if raw != layout.as_str() {
            debug!(field, raw = %raw, layout = layout.as_str(), "normalized layout kind");
            content.insert(
                "layoutKind".to_string(),
                Value::String(layout.as_str().to_string()),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::{NodeDraft, NodePatch};
    use serde_json::json;

    #[test]
    fn canonical_action_passes_through_unchanged() {
        let raw = json!({ "kind": "remove", "id": "1.2" });
        assert_eq!(
            normalize_action(&raw).expect("valid"),
            AgentAction::Remove { id: "1.2".to_string() }
        );
    }

    #[test]
    fn type_discriminator_and_snake_case_fields_are_fixed() {
        let raw = json!({
            "type": "append_child",
            "parent_id": 1,
            "node": { "title": "Globex", "layout_kind": "Container" }
        });
        let action = normalize_action(&raw).expect("normalized");
        assert_eq!(
            action,
            AgentAction::AppendChild {
                parent: "1".to_string(),
                node: NodeDraft {
                    title: Some("Globex".to_string()),
                    layout_kind: Some(LayoutKind::Container),
                    ..NodeDraft::default()
                },
            }
        );
    }

    #[test]
    fn move_aliases_and_string_position() {
        let raw = json!({
            "action": "MOVE",
            "nodeId": "1.0.1",
            "new_parent": "1.1",
            "index": "0"
        });
        assert_eq!(
            normalize_action(&raw).expect("normalized"),
            AgentAction::Move {
                id: "1.0.1".to_string(),
                new_parent: "1.1".to_string(),
                position: Some(0),
            }
        );
    }

    #[test]
    fn flattened_content_is_lifted_into_node_and_patch() {
        let raw = json!({ "kind": "insertSibling", "after": "2", "text": "Rust, SQL", "layout": "bullet" });
        let AgentAction::InsertSibling { node, .. } = normalize_action(&raw).expect("insert") else {
            panic!("expected insertSibling");
        };
        assert_eq!(node.text.as_deref(), Some("Rust, SQL"));
        assert_eq!(node.layout_kind, Some(LayoutKind::ListItem));

        let raw = json!({ "kind": "edit", "target": "0", "title": "Jane Q. Doe" });
        assert_eq!(
            normalize_action(&raw).expect("update"),
            AgentAction::Update {
                id: "0".to_string(),
                patch: NodePatch {
                    title: Some("Jane Q. Doe".to_string()),
                    ..NodePatch::default()
                },
            }
        );
    }

    #[test]
    fn replace_text_accepts_content_alias() {
        let raw = json!({ "kind": "set_text", "id": "1.0.0", "content": "Led the billing rewrite" });
        assert_eq!(
            normalize_action(&raw).expect("normalized"),
            AgentAction::ReplaceText {
                id: "1.0.0".to_string(),
                text: "Led the billing rewrite".to_string(),
            }
        );
    }

    #[test]
    fn reorder_entries_are_coerced_to_strings() {
        let raw = json!({ "kind": "reorder", "id": "0", "order": [2, "0", 1] });
        assert_eq!(
            normalize_action(&raw).expect("normalized"),
            AgentAction::Reorder {
                id: "0".to_string(),
                order: vec!["2".to_string(), "0".to_string(), "1".to_string()],
            }
        );
    }

    #[test]
    fn fractional_numeric_address_is_rejected_not_shortened() {
        let issues = normalize_action(&json!({ "kind": "remove", "id": 1.10 })).expect_err("float");
        assert!(
            issues
                .iter()
                .any(|issue| issue.field == "id" && issue.message == "must be a string")
        );

        let issues = normalize_action(&json!({ "kind": "reorder", "id": "0", "order": [1.10, 0] }))
            .expect_err("float entry");
        assert!(issues.iter().any(|issue| issue.field == "order" && issue.is_blocking()));

        assert_eq!(
            normalize_action(&json!({ "kind": "remove", "id": 3 })).expect("integer"),
            AgentAction::Remove { id: "3".to_string() }
        );
    }

    #[test]
    fn unknown_layout_falls_back_to_container() {
        let raw = json!({ "kind": "appendChild", "parent": "0", "node": { "title": "X", "layoutKind": "carousel" } });
        let AgentAction::AppendChild { node, .. } = normalize_action(&raw).expect("append") else {
            panic!("expected appendChild");
        };
        assert_eq!(node.layout_kind, Some(LayoutKind::Container));
    }

    #[test]
    fn unknown_kind_is_rejected_not_guessed() {
        let issues = normalize_action(&json!({ "kind": "explode", "id": "1" })).expect_err("unknown");
        assert_eq!(issues[0].field, "kind");
        assert!(issues[0].message.contains("explode"));

        let issues = normalize_action(&json!({ "id": "1" })).expect_err("missing kind");
        assert_eq!(issues[0].to_string(), "error: kind: is required");

        let issues = normalize_action(&json!("remove 1")).expect_err("not an object");
        assert_eq!(issues[0].field, "action");
    }

    #[test]
    fn blocking_issues_survive_normalization() {
        let issues = normalize_action(&json!({ "kind": "remove", "id": "first" })).expect_err("bad address");
        assert!(issues.iter().any(|issue| issue.field == "id" && issue.is_blocking()));

        let issues = normalize_action(&json!({ "kind": "appendChild", "parent": "0" })).expect_err("no node");
        assert!(issues.iter().any(|issue| issue.field == "node"));
    }
}
