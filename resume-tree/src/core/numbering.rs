//! Positional addressing for document nodes.
//!
//! An address is the dot-joined list of 0-based sibling indices from the root
//! array down to the node (`"1.0.2"`). Addresses are a function of tree shape
//! only, so any mutation invalidates every [`Numbering`] computed before it.

use std::collections::HashMap;

use crate::node::Node;

/// Reserved parent-target address meaning "the root array".
///
/// Only parent-target fields (`appendChild.parent`, `move.newParent`,
/// `reorder.id`) read it this way; node-target fields resolve `"0"` normally.
pub const ROOT_ADDRESS: &str = "0";

/// Bidirectional address/id table for one tree snapshot.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Numbering {
    by_address: HashMap<String, String>,
    by_id: HashMap<String, String>,
}

impl Numbering {
    /// Id currently sitting at `address`.
    pub fn resolve_address(&self, address: &str) -> Option<&str> {
        self.by_address.get(address).map(String::as_str)
    }

    /// Address of the node with `id`.
    pub fn resolve_id(&self, id: &str) -> Option<&str> {
        self.by_id.get(id).map(String::as_str)
    }

    pub fn contains_address(&self, address: &str) -> bool {
        self.by_address.contains_key(address)
    }

    pub fn len(&self) -> usize {
        self.by_address.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_address.is_empty()
    }
}

/// Number every node with one depth-first, pre-order pass.
pub fn compute_numbering(tree: &[Node]) -> Numbering {
    let mut numbering = Numbering::default();
    let mut path = Vec::new();
    number_nodes(tree, &mut path, &mut numbering);
    numbering
}

fn number_nodes(nodes: &[Node], path: &mut Vec<usize>, numbering: &mut Numbering) {
    for (index, node) in nodes.iter().enumerate() {
        path.push(index);
        let address = format_address(path);
        numbering
            .by_address
            .insert(address.clone(), node.id.clone());
        numbering.by_id.insert(node.id.clone(), address);
        number_nodes(&node.children, path, numbering);
        path.pop();
    }
}

/// Write each node's current address into its `address` cache.
pub fn annotate_addresses(tree: &mut [Node]) {
    let mut path = Vec::new();
    annotate_inner(tree, &mut path);
}

fn annotate_inner(nodes: &mut [Node], path: &mut Vec<usize>) {
    for (index, node) in nodes.iter_mut().enumerate() {
        path.push(index);
        node.address = Some(format_address(path));
        annotate_inner(&mut node.children, path);
        path.pop();
    }
}

/// Render an index path as a dotted address.
pub fn format_address(path: &[usize]) -> String {
    path.iter()
        .map(usize::to_string)
        .collect::<Vec<_>>()
        .join(".")
}

pub fn is_root_address(address: &str) -> bool {
    address == ROOT_ADDRESS
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::query::collect_ids;
    use crate::test_support::{node, node_with_children, sample_resume};
    use std::collections::HashSet;

    #[test]
    fn numbering_is_deterministic() {
        let tree = sample_resume();
        assert_eq!(compute_numbering(&tree), compute_numbering(&tree));
    }

    #[test]
    fn every_node_gets_a_distinct_address() {
        let tree = sample_resume();
        let numbering = compute_numbering(&tree);
        let ids = collect_ids(&tree);
        assert_eq!(numbering.len(), ids.len());

        let addresses: HashSet<&str> = ids
            .iter()
            .map(|id| numbering.resolve_id(id).expect("address"))
            .collect();
        assert_eq!(addresses.len(), ids.len());
    }

    #[test]
    fn addresses_round_trip_to_ids() {
        let tree = sample_resume();
        let numbering = compute_numbering(&tree);
        for id in collect_ids(&tree) {
            let address = numbering.resolve_id(id).expect("address");
            assert_eq!(numbering.resolve_address(address), Some(id));
        }
    }

    #[test]
    fn addresses_are_zero_based_index_paths() {
        let tree = sample_resume();
        let numbering = compute_numbering(&tree);
        assert_eq!(numbering.resolve_id("header"), Some("0"));
        assert_eq!(numbering.resolve_id("contact"), Some("0.0"));
        assert_eq!(numbering.resolve_id("acme-2"), Some("1.0.1"));
        assert_eq!(numbering.resolve_id("skills"), Some("2"));
    }

    #[test]
    fn unknown_addresses_do_not_resolve() {
        let numbering = compute_numbering(&[node("a")]);
        assert_eq!(numbering.resolve_address("9.9.9"), None);
        assert_eq!(numbering.resolve_address("not an address"), None);
        assert_eq!(numbering.resolve_id("missing"), None);
    }

    #[test]
    fn annotate_writes_cache_matching_numbering() {
        let mut tree = vec![node_with_children("a", vec![node("b")])];
        annotate_addresses(&mut tree);
        assert_eq!(tree[0].address.as_deref(), Some("0"));
        assert_eq!(tree[0].children[0].address.as_deref(), Some("0.0"));
    }

    #[test]
    fn empty_tree_has_empty_numbering() {
        let numbering = compute_numbering(&[]);
        assert!(numbering.is_empty());
        assert!(!numbering.contains_address(ROOT_ADDRESS));
    }
}
