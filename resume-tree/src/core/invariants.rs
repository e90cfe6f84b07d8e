//! Document invariants the JSON Schema cannot express.

use std::collections::HashSet;

use crate::core::numbering::format_address;
use crate::node::Node;

/// Check semantic invariants of a loaded document:
/// - Every id is non-empty
/// - No duplicate ids anywhere in the forest
/// - Nesting does not exceed `max_depth` levels (0 disables the check)
///
/// Messages name the offending node by address.
pub fn validate_invariants(tree: &[Node], max_depth: usize) -> Vec<String> {
    let mut errors = Vec::new();
    let mut seen = HashSet::new();
    let mut path = Vec::new();
    for (index, node) in tree.iter().enumerate() {
        path.push(index);
        validate_node(node, &mut path, &mut seen, &mut errors, max_depth);
        path.pop();
    }
    errors
}

fn validate_node<'a>(
    node: &'a Node,
    path: &mut Vec<usize>,
    seen: &mut HashSet<&'a str>,
    errors: &mut Vec<String>,
    max_depth: usize,
) {
    let address = format_address(path);
    if node.id.trim().is_empty() {
        errors.push(format!("{address}: id must not be empty"));
    } else if !seen.insert(node.id.as_str()) {
        errors.push(format!("duplicate id '{}' at {address}", node.id));
    }

    if max_depth > 0 && path.len() == max_depth + 1 {
        errors.push(format!(
            "{address}: nesting exceeds the maximum depth of {max_depth}"
        ));
        return;
    }

    for (index, child) in node.children.iter().enumerate() {
        path.push(index);
        validate_node(child, path, seen, errors, max_depth);
        path.pop();
    }
}
