//! Applies one action to a copy of a document.
//!
//! The engine is pure: it deep-clones its input, resolves every address
//! against the numbering it was handed, and either returns the new forest or
//! an [`ActionError`]. The input tree is never touched, so stored history
//! snapshots stay valid no matter what happens here.

use tracing::debug;

use crate::core::action::{ActionKind, AgentAction};
use crate::core::error::ActionError;
use crate::core::ids::{IdGenerator, UuidIds};
use crate::core::numbering::{Numbering, is_root_address};
use crate::core::query::{
    children_mut, clone_tree, count_nodes, find_node_by_id, find_node_by_id_mut, find_parent_of,
    is_descendant_of, max_depth, remove_node,
};
use crate::core::validator::{ValidationIssue, validate_action};
use crate::node::Node;

/// Generated ids that collide with existing ones are redrawn this many times.
const MAX_ID_ATTEMPTS: usize = 16;

/// Apply `action` using random UUID ids for created nodes.
pub fn apply_action(
    tree: &[Node],
    numbering: &Numbering,
    action: &AgentAction,
) -> Result<Vec<Node>, ActionError> {
    apply_action_with(tree, numbering, action, &mut UuidIds::default())
}

/// Apply `action`, drawing ids for created nodes from `ids`.
///
/// `numbering` must have been computed from `tree`; addresses from any other
/// snapshot are meaningless here.
pub fn apply_action_with<G: IdGenerator + ?Sized>(
    tree: &[Node],
    numbering: &Numbering,
    action: &AgentAction,
    ids: &mut G,
) -> Result<Vec<Node>, ActionError> {
    let kind = action.kind();
    let blocking: Vec<ValidationIssue> = validate_action(action)
        .into_iter()
        .filter(ValidationIssue::is_blocking)
        .collect();
    if !blocking.is_empty() {
        return Err(ActionError::Invalid {
            kind,
            issues: blocking,
        });
    }

    debug!(%kind, "applying action");
    let mut next = clone_tree(tree);
    match action {
        AgentAction::AppendChild { parent, node } => {
            let parent_id = resolve_parent(numbering, kind, parent)?;
            let id = fresh_id(&next, ids, kind)?;
            let children = children_mut(&mut next, parent_id.as_deref())
                .ok_or_else(|| not_found(kind, parent))?;
            children.push(Node::from_draft(id, node));
        }
        AgentAction::InsertSibling { after, node } => {
            let after_id = resolve(numbering, kind, after)?;
            let slot = find_parent_of(&next, &after_id).ok_or_else(|| not_found(kind, after))?;
            let parent_id = slot.parent.map(|parent| parent.id.clone());
            let index = slot.index + 1;
            let id = fresh_id(&next, ids, kind)?;
            let siblings = children_mut(&mut next, parent_id.as_deref())
                .ok_or_else(|| not_found(kind, after))?;
            siblings.insert(index, Node::from_draft(id, node));
        }
        AgentAction::ReplaceText { id, text } => {
            let target = resolve(numbering, kind, id)?;
            let node = find_node_by_id_mut(&mut next, &target).ok_or_else(|| not_found(kind, id))?;
            node.text = Some(text.clone());
        }
        AgentAction::Update { id, patch } => {
            let target = resolve(numbering, kind, id)?;
            let node = find_node_by_id_mut(&mut next, &target).ok_or_else(|| not_found(kind, id))?;
            node.apply_patch(patch);
        }
        AgentAction::Move {
            id,
            new_parent,
            position,
        } => apply_move(&mut next, numbering, id, new_parent, *position)?,
        AgentAction::Remove { id } => {
            let target = resolve(numbering, kind, id)?;
            remove_node(&mut next, &target).ok_or_else(|| not_found(kind, id))?;
        }
        AgentAction::Reorder { id, order } => apply_reorder(&mut next, numbering, id, order)?,
    }

    debug!(%kind, nodes = count_nodes(&next), "action applied");
    Ok(next)
}

fn apply_move(
    tree: &mut Vec<Node>,
    numbering: &Numbering,
    address: &str,
    new_parent: &str,
    position: Option<usize>,
) -> Result<(), ActionError> {
    let kind = ActionKind::Move;
    let node_id = resolve(numbering, kind, address)?;
    let parent_id = resolve_parent(numbering, kind, new_parent)?;

    if let Some(parent_id) = parent_id.as_deref() {
        if parent_id == node_id || is_descendant_of(tree, &node_id, parent_id) {
            return Err(ActionError::Structural {
                kind,
                reason: format!(
                    "cannot move '{address}' under itself or its descendant '{new_parent}'"
                ),
            });
        }
    }

    // Detach first, then look the destination up by id so sibling indices
    // reflect the post-removal state.
    let moved = remove_node(tree, &node_id).ok_or_else(|| not_found(kind, address))?;
    let siblings =
        children_mut(tree, parent_id.as_deref()).ok_or_else(|| not_found(kind, new_parent))?;
    let index = position.map_or(siblings.len(), |position| position.min(siblings.len()));
    siblings.insert(index, moved);
    Ok(())
}

fn apply_reorder(
    tree: &mut Vec<Node>,
    numbering: &Numbering,
    address: &str,
    order: &[String],
) -> Result<(), ActionError> {
    let kind = ActionKind::Reorder;
    let parent_id = resolve_parent(numbering, kind, address)?;

    let mut wanted: Vec<(String, &str)> = Vec::with_capacity(order.len());
    for entry in order {
        let id = resolve(numbering, kind, entry)?;
        if !wanted.iter().any(|(seen, _)| *seen == id) {
            wanted.push((id, entry.as_str()));
        }
    }

    let children =
        children_mut(tree, parent_id.as_deref()).ok_or_else(|| not_found(kind, address))?;
    if let Some((_, entry)) = wanted
        .iter()
        .find(|(id, _)| !children.iter().any(|child| child.id == *id))
    {
        return Err(ActionError::Structural {
            kind,
            reason: format!("'{entry}' is not a direct child of '{address}'"),
        });
    }

    let mut remaining = std::mem::take(children);
    let mut reordered = Vec::with_capacity(remaining.len());
    for (id, _) in &wanted {
        if let Some(pos) = remaining.iter().position(|child| child.id == *id) {
            reordered.push(remaining.remove(pos));
        }
    }
    // Unlisted children keep their relative order after the listed ones.
    reordered.extend(remaining);
    *children = reordered;
    Ok(())
}

/// Reject a result tree nested deeper than `limit` levels (0 = no limit).
///
/// Callers that persist documents run this on every tree the engine returns,
/// so nothing is stored that the document loader would refuse.
pub fn check_depth(tree: &[Node], kind: ActionKind, limit: usize) -> Result<(), ActionError> {
    if limit > 0 && max_depth(tree) > limit {
        return Err(ActionError::Structural {
            kind,
            reason: format!("nesting exceeds the maximum depth of {limit}"),
        });
    }
    Ok(())
}

fn resolve(numbering: &Numbering, kind: ActionKind, address: &str) -> Result<String, ActionError> {
    numbering
        .resolve_address(address)
        .map(str::to_string)
        .ok_or_else(|| not_found(kind, address))
}

/// Resolve a parent-target address; `None` is the root array.
fn resolve_parent(
    numbering: &Numbering,
    kind: ActionKind,
    address: &str,
) -> Result<Option<String>, ActionError> {
    if is_root_address(address) {
        return Ok(None);
    }
    resolve(numbering, kind, address).map(Some)
}

fn fresh_id<G: IdGenerator + ?Sized>(
    tree: &[Node],
    ids: &mut G,
    kind: ActionKind,
) -> Result<String, ActionError> {
    for _ in 0..MAX_ID_ATTEMPTS {
        let id = ids.next_id();
        if !id.is_empty() && find_node_by_id(tree, &id).is_none() {
            return Ok(id);
        }
        debug!(%id, "generated id already in use");
    }
    Err(ActionError::Structural {
        kind,
        reason: "could not generate a unique node id".to_string(),
    })
}

fn not_found(kind: ActionKind, address: &str) -> ActionError {
    ActionError::NotFound {
        kind,
        address: address.to_string(),
    }
}
