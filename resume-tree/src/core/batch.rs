//! Sequential application of action lists with per-action failure reporting.

use serde::Serialize;
use serde_json::Value;
use tracing::{debug, info};

use crate::core::action::{ActionKind, AgentAction};
use crate::core::engine::{apply_action_with, check_depth};
use crate::core::error::ActionError;
use crate::core::ids::IdGenerator;
use crate::core::normalize::normalize_action;
use crate::core::numbering::compute_numbering;
use crate::core::validator::ValidationIssue;
use crate::node::Node;

/// Why one action of a batch did not apply.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "reason", rename_all = "camelCase")]
pub enum ActionFailure {
    /// The raw JSON could not be normalized into an action.
    Invalid { issues: Vec<ValidationIssue> },
    /// The engine refused the action against the tree at that point.
    Rejected { message: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FailedAction {
    /// Position in the submitted list.
    pub index: usize,
    /// `None` when the kind itself could not be determined.
    pub kind: Option<ActionKind>,
    pub failure: ActionFailure,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AppliedAction {
    pub index: usize,
    pub action: AgentAction,
}

/// Result of a batch. `tree` reflects every applied action.
#[derive(Debug, Clone, PartialEq)]
pub struct BatchOutcome {
    pub tree: Vec<Node>,
    pub applied: Vec<AppliedAction>,
    pub failed: Vec<FailedAction>,
}

impl BatchOutcome {
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Apply `actions` in order. Each action addresses the tree as left by the
/// actions before it, so numbering is recomputed after every success.
///
/// No depth limit is enforced; [`crate::session::EditorSession`] applies the
/// configured one.
pub fn apply_batch<G: IdGenerator + ?Sized>(
    tree: &[Node],
    actions: &[AgentAction],
    ids: &mut G,
) -> BatchOutcome {
    run(tree, typed_entries(actions), ids, 0, |_, _| {})
}

/// Normalize each raw value, then apply the survivors as [`apply_batch`]
/// does. Values that fail normalization are reported and skipped.
pub fn apply_raw_batch<G: IdGenerator + ?Sized>(
    tree: &[Node],
    raw: &[Value],
    ids: &mut G,
) -> BatchOutcome {
    run(tree, raw_entries(raw), ids, 0, |_, _| {})
}

pub(crate) type Entry = Result<AgentAction, (Option<ActionKind>, Vec<ValidationIssue>)>;

pub(crate) fn typed_entries(actions: &[AgentAction]) -> Vec<Entry> {
    actions.iter().cloned().map(Ok).collect()
}

pub(crate) fn raw_entries(raw: &[Value]) -> Vec<Entry> {
    raw.iter()
        .map(|value| normalize_action(value).map_err(|issues| (raw_kind(value), issues)))
        .collect()
}

/// Shared batch loop. An action whose result nests deeper than `max_depth`
/// (0 = no limit) is rejected. `on_applied` sees each applied action together
/// with the tree it produced.
pub(crate) fn run<G, F>(
    tree: &[Node],
    entries: Vec<Entry>,
    ids: &mut G,
    max_depth: usize,
    mut on_applied: F,
) -> BatchOutcome
where
    G: IdGenerator + ?Sized,
    F: FnMut(&AppliedAction, &[Node]),
{
    let mut current = tree.to_vec();
    let mut numbering = compute_numbering(&current);
    let mut applied = Vec::new();
    let mut failed = Vec::new();

    for (index, entry) in entries.into_iter().enumerate() {
        let action = match entry {
            Ok(action) => action,
            Err((kind, issues)) => {
                debug!(index, "skipping action that failed normalization");
                failed.push(FailedAction {
                    index,
                    kind,
                    failure: ActionFailure::Invalid { issues },
                });
                continue;
            }
        };

        let result = apply_action_with(&current, &numbering, &action, ids)
            .and_then(|next| check_depth(&next, action.kind(), max_depth).map(|()| next));
        match result {
            Ok(next) => {
                current = next;
                numbering = compute_numbering(&current);
                let step = AppliedAction { index, action };
                on_applied(&step, &current);
                applied.push(step);
            }
            Err(err) => {
                debug!(index, error = %err, "action rejected");
                failed.push(FailedAction {
                    index,
                    kind: Some(err.kind()),
                    failure: failure_from(err),
                });
            }
        }
    }

    info!(
        applied = applied.len(),
        failed = failed.len(),
        "batch finished"
    );
    BatchOutcome {
        tree: current,
        applied,
        failed,
    }
}

fn failure_from(err: ActionError) -> ActionFailure {
    match err {
        ActionError::Invalid { issues, .. } => ActionFailure::Invalid { issues },
        other => ActionFailure::Rejected {
            message: other.to_string(),
        },
    }
}

fn raw_kind(value: &Value) -> Option<ActionKind> {
    ["kind", "type", "action"]
        .into_iter()
        .find_map(|key| value.get(key).and_then(Value::as_str))
        .and_then(ActionKind::parse_loose)
}
