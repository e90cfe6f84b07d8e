//! Structural validation of actions before they reach the engine.
//!
//! Validation is shape-only: it never looks at a tree. Whether an address
//! resolves is decided by the engine against the current numbering.

use std::collections::HashSet;
use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;
use serde_json::Value;

use crate::core::action::{ActionKind, AgentAction};
use crate::core::numbering::is_root_address;
use crate::node::{LayoutKind, NodeDraft, NodePatch};

/// Text longer than this is accepted but flagged.
pub const LONG_TEXT_CHARS: usize = 2000;

static ADDRESS_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d+(\.\d+)*$").expect("address pattern should compile"));

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Blocks application.
    Error,
    /// Reported only.
    Warning,
}

/// One field-level finding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationIssue {
    pub field: String,
    pub message: String,
    pub severity: Severity,
}

impl ValidationIssue {
    pub fn error(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
            severity: Severity::Error,
        }
    }

    pub fn warning(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
            severity: Severity::Warning,
        }
    }

    pub fn is_blocking(&self) -> bool {
        self.severity == Severity::Error
    }
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self.severity {
            Severity::Error => "error",
            Severity::Warning => "warning",
        };
        write!(f, "{label}: {}: {}", self.field, self.message)
    }
}

/// True if any issue has `Error` severity.
pub fn has_blocking(issues: &[ValidationIssue]) -> bool {
    issues.iter().any(ValidationIssue::is_blocking)
}

/// True if `address` is a dotted list of indices (`"2"`, `"1.0.3"`).
pub fn is_address_syntax(address: &str) -> bool {
    ADDRESS_PATTERN.is_match(address)
}

/// Validate a typed action.
pub fn validate_action(action: &AgentAction) -> Vec<ValidationIssue> {
    let mut issues = Vec::new();
    match action {
        AgentAction::AppendChild { parent, node } => {
            check_address(&mut issues, "parent", parent);
            check_draft(&mut issues, node);
        }
        AgentAction::InsertSibling { after, node } => {
            check_address(&mut issues, "after", after);
            check_draft(&mut issues, node);
        }
        AgentAction::ReplaceText { id, text } => {
            check_address(&mut issues, "id", id);
            if text.trim().is_empty() {
                issues.push(ValidationIssue::error("text", "must not be empty"));
            }
            check_text_length(&mut issues, "text", Some(text));
        }
        AgentAction::Update { id, patch } => {
            check_address(&mut issues, "id", id);
            check_patch(&mut issues, patch);
        }
        AgentAction::Move { id, new_parent, .. } => {
            check_address(&mut issues, "id", id);
            check_address(&mut issues, "newParent", new_parent);
            if is_root_address(id) {
                issues.push(ValidationIssue::warning(
                    "id",
                    "'0' names the first top-level node here, not the root",
                ));
            }
        }
        AgentAction::Remove { id } => {
            check_address(&mut issues, "id", id);
        }
        AgentAction::Reorder { id, order } => {
            check_address(&mut issues, "id", id);
            check_order(&mut issues, id, order);
        }
    }
    issues
}

/// Validate an untyped JSON action in canonical shape.
///
/// Catches what a typed value cannot express (unknown kind, missing fields,
/// non-array `order`), then runs [`validate_action`] on the parsed value.
pub fn validate_raw_action(raw: &Value) -> Vec<ValidationIssue> {
    let mut issues = Vec::new();
    let Some(object) = raw.as_object() else {
        issues.push(ValidationIssue::error("action", "must be a JSON object"));
        return issues;
    };

    let kind = match object.get("kind") {
        None => {
            issues.push(ValidationIssue::error("kind", "is required"));
            return issues;
        }
        Some(Value::String(name)) => match canonical_kind(name) {
            Some(kind) => kind,
            None => {
                issues.push(ValidationIssue::error(
                    "kind",
                    format!("unknown action kind '{name}'"),
                ));
                return issues;
            }
        },
        Some(_) => {
            issues.push(ValidationIssue::error("kind", "must be a string"));
            return issues;
        }
    };

    for field in required_fields(kind) {
        match object.get(*field) {
            None | Some(Value::Null) => {
                issues.push(ValidationIssue::error(*field, "is required"));
            }
            Some(value) => check_raw_field(&mut issues, field, value),
        }
    }
    if let Some(position) = object.get("position") {
        if !position.is_null() && !position.is_u64() {
            issues.push(ValidationIssue::error(
                "position",
                "must be a non-negative integer",
            ));
        }
    }
    if has_blocking(&issues) {
        return issues;
    }

    match serde_json::from_value::<AgentAction>(raw.clone()) {
        Ok(action) => issues.extend(validate_action(&action)),
        Err(err) => issues.push(ValidationIssue::error(kind.as_str(), err.to_string())),
    }
    issues
}

fn canonical_kind(name: &str) -> Option<ActionKind> {
    ActionKind::ALL
        .into_iter()
        .find(|kind| kind.as_str() == name)
}

/// Fields every action of `kind` must carry.
pub fn required_fields(kind: ActionKind) -> &'static [&'static str] {
    match kind {
        ActionKind::AppendChild => &["parent", "node"],
        ActionKind::InsertSibling => &["after", "node"],
        ActionKind::ReplaceText => &["id", "text"],
        ActionKind::Update => &["id", "patch"],
        ActionKind::Move => &["id", "newParent"],
        ActionKind::Remove => &["id"],
        ActionKind::Reorder => &["id", "order"],
    }
}

fn check_raw_field(issues: &mut Vec<ValidationIssue>, field: &str, value: &Value) {
    match field {
        "node" | "patch" => {
            if !value.is_object() {
                issues.push(ValidationIssue::error(field, "must be an object"));
            }
        }
        "order" => match value.as_array() {
            None => issues.push(ValidationIssue::error(field, "must be an array")),
            Some(entries) => {
                if entries.iter().any(|entry| !entry.is_string()) {
                    issues.push(ValidationIssue::error(field, "entries must be address strings"));
                }
            }
        },
        _ => {
            if !value.is_string() {
                issues.push(ValidationIssue::error(field, "must be a string"));
            }
        }
    }
}

fn check_address(issues: &mut Vec<ValidationIssue>, field: &str, address: &str) {
    if address.trim().is_empty() {
        issues.push(ValidationIssue::error(field, "must not be empty"));
    } else if !is_address_syntax(address) {
        issues.push(ValidationIssue::error(
            field,
            format!("'{address}' is not a dotted index address"),
        ));
    }
}

fn check_draft(issues: &mut Vec<ValidationIssue>, draft: &NodeDraft) {
    if !draft.has_content() {
        issues.push(ValidationIssue::error(
            "node",
            "needs a non-empty title or text",
        ));
    }
    if draft.layout_kind == Some(LayoutKind::Heading) && draft.title.is_none() {
        issues.push(ValidationIssue::warning("node.title", "heading has no title"));
    }
    check_text_length(issues, "node.text", draft.text.as_deref());
}

fn check_patch(issues: &mut Vec<ValidationIssue>, patch: &NodePatch) {
    if patch.is_empty() {
        issues.push(ValidationIssue::warning("patch", "is empty; update is a no-op"));
    }
    check_text_length(issues, "patch.text", patch.text.as_deref());
}

fn check_text_length(issues: &mut Vec<ValidationIssue>, field: &str, text: Option<&str>) {
    if let Some(text) = text {
        let chars = text.chars().count();
        if chars > LONG_TEXT_CHARS {
            issues.push(ValidationIssue::warning(
                field,
                format!("is {chars} characters long"),
            ));
        }
    }
}

fn check_order(issues: &mut Vec<ValidationIssue>, parent: &str, order: &[String]) {
    if order.is_empty() {
        issues.push(ValidationIssue::warning("order", "is empty; reorder is a no-op"));
        return;
    }
    let mut seen = HashSet::new();
    for entry in order {
        if !is_address_syntax(entry) {
            issues.push(ValidationIssue::error(
                "order",
                format!("'{entry}' is not a dotted index address"),
            ));
            continue;
        }
        if !is_direct_child_address(parent, entry) {
            issues.push(ValidationIssue::error(
                "order",
                format!("'{entry}' is not a direct child of '{parent}'"),
            ));
        }
        if !seen.insert(entry.as_str()) {
            issues.push(ValidationIssue::warning(
                "order",
                format!("'{entry}' is listed more than once"),
            ));
        }
    }
}

fn is_direct_child_address(parent: &str, candidate: &str) -> bool {
    if is_root_address(parent) {
        return !candidate.contains('.');
    }
    candidate
        .strip_prefix(parent)
        .and_then(|rest| rest.strip_prefix('.'))
        .is_some_and(|rest| !rest.is_empty() && !rest.contains('.'))
}
