//! Text rendering of a forest, for debugging and tests.
//!
//! Each tree renders as a tagged block. The block shows the tree's language,
//! the node of the parent grammar it is anchored at, the root node and the
//! named nodes below it. An embedded tree is printed in place of its first
//! anchor node; further anchors of a combined tree print as a one-line
//! `<lang ... />` marker.
//!
//! ```text
//! <php>
//! program [0, 0] - [0, 29]
//!   <html text [0, 0] - [0, 5]>
//!   document [0, 0] - [0, 29]
//!     element [0, 0] - [0, 29]
//!   ...
//!   </html>
//!   php_tag [0, 5] - [0, 10]
//! ...
//! </php>
//! ```

use std::fmt::{self, Write};

use tree_sitter::Node;

use crate::languages::tree_sitter_utils::format_node;
use crate::tree::LanguageTree;

const INDENT: &str = "  ";

/// Render the forest rooted at `tree`.
#[must_use]
pub fn visualize(tree: &LanguageTree) -> String {
    Visualizer(tree).to_string()
}

/// [`Display`](fmt::Display) adapter behind [`visualize`].
pub struct Visualizer<'a>(pub &'a LanguageTree);

impl fmt::Display for Visualizer<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_tree(f, self.0, None, 0)
    }
}

fn indent(f: &mut dyn Write, depth: usize) -> fmt::Result {
    for _ in 0..depth {
        f.write_str(INDENT)?;
    }
    Ok(())
}

fn write_tree(
    f: &mut dyn Write,
    tree: &LanguageTree,
    anchor: Option<Node<'_>>,
    depth: usize,
) -> fmt::Result {
    indent(f, depth)?;
    write!(f, "<{}", tree.language())?;
    if let Some(anchor) = anchor {
        write!(f, " {}", format_node(&anchor))?;
    }
    writeln!(f, ">")?;

    let mut rendered = vec![false; tree.children().len()];
    match tree.root_node() {
        Some(root) => {
            indent(f, depth)?;
            writeln!(f, "{}", format_node(&root))?;
            write_named_children(f, tree, root, depth + 1, &mut rendered)?;
        }
        None => {
            indent(f, depth)?;
            writeln!(f, "(unparsed)")?;
        }
    }

    // Trees whose anchors were never reached still belong in the output.
    for (child, done) in tree.children().iter().zip(&rendered) {
        if !done {
            write_tree(f, child, None, depth + 1)?;
        }
    }

    indent(f, depth)?;
    writeln!(f, "</{}>", tree.language())
}

fn write_named_children(
    f: &mut dyn Write,
    tree: &LanguageTree,
    node: Node<'_>,
    depth: usize,
    rendered: &mut [bool],
) -> fmt::Result {
    let mut cursor = node.walk();
    if !cursor.goto_first_child() {
        return Ok(());
    }

    loop {
        let child = cursor.node();
        if child.is_named() {
            write_node(f, tree, child, cursor.field_name(), depth, rendered)?;
        }
        if !cursor.goto_next_sibling() {
            return Ok(());
        }
    }
}

fn write_node(
    f: &mut dyn Write,
    tree: &LanguageTree,
    node: Node<'_>,
    field: Option<&str>,
    depth: usize,
    rendered: &mut [bool],
) -> fmt::Result {
    if let Some(index) = anchored_child(tree, &node) {
        let child = &tree.children()[index];
        if rendered[index] {
            indent(f, depth)?;
            return writeln!(f, "<{} {} />", child.language(), format_node(&node));
        }
        rendered[index] = true;
        return write_tree(f, child, Some(node), depth);
    }

    indent(f, depth)?;
    if let Some(field) = field {
        write!(f, "{field}: ")?;
    }
    writeln!(f, "{}", format_node(&node))?;
    write_named_children(f, tree, node, depth + 1, rendered)
}

/// Index of the child tree that owns `node`: the node must be non-empty and
/// lie inside one of the child's included ranges.
fn anchored_child(tree: &LanguageTree, node: &Node<'_>) -> Option<usize> {
    if node.start_byte() == node.end_byte() {
        return None;
    }
    let span = node.range();
    tree.children().iter().position(|child| {
        child.in_range(&span)
            && child
                .ranges()
                .iter()
                .any(|r| r.start_byte <= span.start_byte && span.end_byte <= r.end_byte)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Language;

    fn parsed(language: Language, source: &str) -> LanguageTree {
        let mut tree = LanguageTree::new(language, Vec::new(), Vec::new()).expect("grammar loads");
        tree.parse(source.as_bytes()).expect("parse succeeds");
        tree
    }

    #[test]
    fn unparsed_tree_renders_placeholder() {
        let tree = LanguageTree::new(Language::Css, Vec::new(), Vec::new()).expect("grammar loads");

        assert_eq!(visualize(&tree), "<css>\n(unparsed)\n</css>\n");
    }

    #[test]
    fn leaf_tree_renders_fields() {
        let tree = parsed(Language::JavaScript, "a = 1");

        let output = visualize(&tree);

        assert!(output.starts_with("<javascript>\nprogram [0, 0] - [0, 5]\n"));
        assert!(output.contains("left: identifier [0, 0] - [0, 1]"));
        assert!(output.contains("right: number [0, 4] - [0, 5]"));
        assert!(output.ends_with("</javascript>\n"));
    }

    #[test]
    fn combined_child_renders_once() {
        let tree = parsed(Language::Php, "<div><?php $var = 2; ?></div>");

        let output = visualize(&tree);

        assert_eq!(output.matches("<html text [0, 0] - [0, 5]>").count(), 1);
        assert_eq!(output.matches("</html>").count(), 1);
        assert!(output.contains("  <html text [0, 0] - [0, 5]>\n"));
        assert!(output.contains("<html text [0, 23] - [0, 29] />"));
        assert!(output.contains("assignment_expression"));
    }

    #[test]
    fn nested_injections_indent_deeper() {
        let tree = parsed(Language::Html, "<script>let a = 1;</script>");

        let output = visualize(&tree);

        assert!(output.contains("\n    <javascript raw_text [0, 8] - [0, 18]>\n"));
        assert!(output.contains("</javascript>"));
    }
}
