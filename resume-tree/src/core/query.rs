//! Read-only lookups and small structural helpers over a document forest.

use crate::node::Node;

/// Location of a node inside its parent's children.
///
/// `parent == None` means the node sits in the root array at `index`.
#[derive(Debug, Clone, Copy)]
pub struct ParentSlot<'a> {
    pub parent: Option<&'a Node>,
    pub index: usize,
}

/// Depth-first search for `id`.
pub fn find_node_by_id<'a>(tree: &'a [Node], id: &str) -> Option<&'a Node> {
    for node in tree {
        if node.id == id {
            return Some(node);
        }
        if let Some(found) = find_node_by_id(&node.children, id) {
            return Some(found);
        }
    }
    None
}

pub fn find_node_by_id_mut<'a>(tree: &'a mut [Node], id: &str) -> Option<&'a mut Node> {
    for node in &mut *tree {
        if node.id == id {
            return Some(node);
        }
        if let Some(found) = find_node_by_id_mut(&mut node.children, id) {
            return Some(found);
        }
    }
    None
}

/// Find the parent slot of `id`. Root-level matches report `parent: None`.
pub fn find_parent_of<'a>(tree: &'a [Node], id: &str) -> Option<ParentSlot<'a>> {
    if let Some(index) = tree.iter().position(|node| node.id == id) {
        return Some(ParentSlot {
            parent: None,
            index,
        });
    }
    find_parent_inner(tree, id)
}

fn find_parent_inner<'a>(nodes: &'a [Node], id: &str) -> Option<ParentSlot<'a>> {
    for node in nodes {
        if let Some(index) = node.children.iter().position(|child| child.id == id) {
            return Some(ParentSlot {
                parent: Some(node),
                index,
            });
        }
        if let Some(found) = find_parent_inner(&node.children, id) {
            return Some(found);
        }
    }
    None
}

/// Children array of `parent_id`, or the root array when `parent_id` is `None`.
pub fn children_mut<'a>(tree: &'a mut Vec<Node>, parent_id: Option<&str>) -> Option<&'a mut Vec<Node>> {
    match parent_id {
        None => Some(tree),
        Some(id) => find_node_by_id_mut(tree, id).map(|node| &mut node.children),
    }
}

/// Detach the node with `id` (and its whole subtree) from wherever it lives.
pub fn remove_node(tree: &mut Vec<Node>, id: &str) -> Option<Node> {
    if let Some(pos) = tree.iter().position(|node| node.id == id) {
        return Some(tree.remove(pos));
    }
    for node in &mut *tree {
        if let Some(removed) = remove_node(&mut node.children, id) {
            return Some(removed);
        }
    }
    None
}

/// Deep copy. Nodes own all their data, so the copy shares nothing with `tree`.
pub fn clone_tree(tree: &[Node]) -> Vec<Node> {
    tree.to_vec()
}

/// Total number of nodes across the forest.
pub fn count_nodes(tree: &[Node]) -> usize {
    tree.iter()
        .map(|node| 1 + count_nodes(&node.children))
        .sum()
}

/// True if `id` lives somewhere below `ancestor_id` (not counting equality).
pub fn is_descendant_of(tree: &[Node], ancestor_id: &str, id: &str) -> bool {
    find_node_by_id(tree, ancestor_id)
        .is_some_and(|ancestor| find_node_by_id(&ancestor.children, id).is_some())
}

/// All ids in depth-first pre-order.
pub fn collect_ids(tree: &[Node]) -> Vec<&str> {
    let mut ids = Vec::new();
    collect_ids_inner(tree, &mut ids);
    ids
}

fn collect_ids_inner<'a>(nodes: &'a [Node], ids: &mut Vec<&'a str>) {
    for node in nodes {
        ids.push(node.id.as_str());
        collect_ids_inner(&node.children, ids);
    }
}

/// Number of levels in the forest (`0` for an empty document).
pub fn max_depth(tree: &[Node]) -> usize {
    tree.iter()
        .map(|node| 1 + max_depth(&node.children))
        .max()
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{node, node_with_children, sample_resume};

    #[test]
    fn find_parent_reports_root_level_as_none() {
        let tree = vec![node("a"), node("b")];
        let slot = find_parent_of(&tree, "b").expect("slot");
        assert!(slot.parent.is_none());
        assert_eq!(slot.index, 1);
    }

    #[test]
    fn find_parent_reports_nested_parent_and_index() {
        let tree = vec![node_with_children("a", vec![node("a1"), node("a2")])];
        let slot = find_parent_of(&tree, "a2").expect("slot");
        assert_eq!(slot.parent.map(|p| p.id.as_str()), Some("a"));
        assert_eq!(slot.index, 1);
        assert!(find_parent_of(&tree, "missing").is_none());
    }

    #[test]
    fn count_and_depth_cover_the_whole_forest() {
        let tree = sample_resume();
        assert_eq!(count_nodes(&tree), 8);
        assert_eq!(max_depth(&tree), 3);
        assert_eq!(max_depth(&[]), 0);
    }

    #[test]
    fn clone_is_isolated_from_original() {
        let tree = sample_resume();
        let mut copy = clone_tree(&tree);
        copy[0].title = Some("changed".to_string());
        copy[1].children.clear();
        assert_ne!(copy, tree);
        assert_eq!(tree, sample_resume());
    }

    #[test]
    fn remove_node_detaches_nested_subtree() {
        let mut tree = vec![node_with_children("a", vec![node_with_children("b", vec![node("c")])])];
        let removed = remove_node(&mut tree, "b").expect("removed");
        assert_eq!(removed.children.len(), 1);
        assert!(tree[0].children.is_empty());
        assert!(remove_node(&mut tree, "c").is_none());
    }

    #[test]
    fn descendant_check_walks_the_subtree_only() {
        let tree = vec![
            node_with_children("a", vec![node_with_children("b", vec![node("c")])]),
            node("d"),
        ];
        assert!(is_descendant_of(&tree, "a", "c"));
        assert!(!is_descendant_of(&tree, "c", "a"));
        assert!(!is_descendant_of(&tree, "a", "a"));
        assert!(!is_descendant_of(&tree, "a", "d"));
    }

    #[test]
    fn collect_ids_is_pre_order() {
        let tree = vec![node_with_children("a", vec![node("b")]), node("c")];
        assert_eq!(collect_ids(&tree), vec!["a", "b", "c"]);
    }
}
