//! Numbered plain-text outline of a document.
//!
//! Producers see addresses only through this view, so every line leads with
//! the address the engine will resolve.

use std::fmt::Write as _;

use crate::core::numbering::Numbering;
use crate::node::Node;

/// Default per-line text budget in characters.
pub const DEFAULT_TEXT_LIMIT: usize = 80;

/// Render one line per node, indented two spaces per level:
///
/// ```text
/// 1 [heading] Experience
///   1.0 [container] Acme
///     1.0.0 [list-item] Shipped the billing rewrite
/// ```
///
/// Title and text are joined with ` - ` and the text is cut at `text_limit`
/// characters (0 = no limit).
pub fn render_outline(tree: &[Node], numbering: &Numbering, text_limit: usize) -> String {
    let mut out = String::new();
    render_level(tree, numbering, text_limit, 0, &mut out);
    out
}

fn render_level(
    nodes: &[Node],
    numbering: &Numbering,
    text_limit: usize,
    depth: usize,
    out: &mut String,
) {
    for node in nodes {
        let address = numbering.resolve_id(&node.id).unwrap_or("?");
        let _ = write!(
            out,
            "{:indent$}{address} [{}]",
            "",
            node.layout_kind.as_str(),
            indent = depth * 2
        );
        let label = label(node, text_limit);
        if !label.is_empty() {
            out.push(' ');
            out.push_str(&label);
        }
        out.push('\n');
        render_level(&node.children, numbering, text_limit, depth + 1, out);
    }
}

fn label(node: &Node, text_limit: usize) -> String {
    let title = node.title.as_deref().map(str::trim).filter(|t| !t.is_empty());
    let text = node
        .text
        .as_deref()
        .map(|text| single_line(text, text_limit))
        .filter(|t| !t.is_empty());
    match (title, text) {
        (Some(title), Some(text)) => format!("{title} - {text}"),
        (Some(title), None) => title.to_string(),
        (None, Some(text)) => text,
        (None, None) => String::new(),
    }
}

fn single_line(text: &str, limit: usize) -> String {
    let flat = text.split_whitespace().collect::<Vec<_>>().join(" ");
    if limit == 0 || flat.chars().count() <= limit {
        return flat;
    }
    let mut cut: String = flat.chars().take(limit).collect();
    cut.push_str("...");
    cut
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::numbering::compute_numbering;
    use crate::test_support::{bullet, node, sample_resume};

    #[test]
    fn outline_lists_every_node_with_its_address() {
        let tree = sample_resume();
        let outline = render_outline(&tree, &compute_numbering(&tree), 80);
        let expected = "\
0 [heading] Jane Doe
  0.0 [key-value] Email - jane@example.com
1 [heading] Experience
  1.0 [container] Acme
    1.0.0 [list-item] Shipped the billing rewrite
    1.0.1 [list-item] Mentored four engineers
  1.1 [container] Initech
2 [heading] Skills
";
        assert_eq!(outline, expected);
    }

    #[test]
    fn long_and_multiline_text_is_flattened_and_cut() {
        let tree = vec![bullet("b", "Built\n  a   very long line"), node("empty")];
        let outline = render_outline(&tree, &compute_numbering(&tree), 12);
        assert_eq!(outline, "0 [list-item] Built a very...\n1 [container]\n");
    }
}
