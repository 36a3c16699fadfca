//! YAML renderer — the primary output format.
//!
//! Emits block-style YAML with two-space indentation and every node's head
//! comment rendered as `#` lines immediately above it. Scalars are written
//! plain whenever safe and double-quoted otherwise.

use crate::model::{DocNode, Document, NodeKind};
use crate::render::Renderer;
use regex::Regex;
use std::sync::LazyLock;

/// Scalars matching this are safe to emit without quotes. `::` is allowed so
/// symbolic identifiers like `Level::Info` stay readable; a lone `:` is not.
static RE_PLAIN_SCALAR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9_](?:::|[A-Za-z0-9_.+/@-])*$").unwrap());

pub struct YamlRenderer;

impl Renderer for YamlRenderer {
    fn render(&self, doc: &Document) -> String {
        let mut out = String::new();
        if !doc.head_comment.is_empty() {
            write_comment(&mut out, &doc.head_comment, 0);
            out.push('\n');
        }
        render_node(&mut out, &doc.root, 0);
        out
    }

    fn file_extension(&self) -> &str {
        "yaml"
    }
}

fn render_node(out: &mut String, node: &DocNode, indent: usize) {
    match node.kind {
        NodeKind::Scalar => {
            pad(out, indent);
            out.push_str(&scalar_text(&node.value));
            out.push('\n');
        }
        NodeKind::Mapping => render_mapping(out, node, indent),
        NodeKind::Sequence => render_sequence(out, node, indent),
    }
}

fn render_mapping(out: &mut String, node: &DocNode, indent: usize) {
    for pair in node.children.chunks(2) {
        let [key, value] = pair else {
            // Guarded by the DocNode constructor; an odd pair is unreachable.
            continue;
        };
        if !key.head_comment.is_empty() {
            write_comment(out, &key.head_comment, indent);
        }
        pad(out, indent);
        out.push_str(&scalar_text(&key.value));
        out.push(':');
        match value.kind {
            NodeKind::Scalar => {
                out.push(' ');
                out.push_str(&scalar_text(&value.value));
                out.push('\n');
            }
            NodeKind::Mapping if value.children.is_empty() => out.push_str(" {}\n"),
            NodeKind::Sequence if value.children.is_empty() => out.push_str(" []\n"),
            NodeKind::Mapping => {
                out.push('\n');
                render_mapping(out, value, indent + 1);
            }
            NodeKind::Sequence => {
                out.push('\n');
                render_sequence(out, value, indent + 1);
            }
        }
    }
}

fn render_sequence(out: &mut String, node: &DocNode, indent: usize) {
    for elem in &node.children {
        if !elem.head_comment.is_empty() {
            write_comment(out, &elem.head_comment, indent);
        }
        match elem.kind {
            NodeKind::Scalar => {
                pad(out, indent);
                out.push_str("- ");
                out.push_str(&scalar_text(&elem.value));
                out.push('\n');
            }
            NodeKind::Mapping if elem.children.is_empty() => {
                pad(out, indent);
                out.push_str("- {}\n");
            }
            NodeKind::Sequence if elem.children.is_empty() => {
                pad(out, indent);
                out.push_str("- []\n");
            }
            NodeKind::Mapping => {
                pad(out, indent);
                out.push_str("-\n");
                render_mapping(out, elem, indent + 1);
            }
            NodeKind::Sequence => {
                pad(out, indent);
                out.push_str("-\n");
                render_sequence(out, elem, indent + 1);
            }
        }
    }
}

/// Write a head comment, one `#` line per comment line. A line that is
/// already a bare `#` (the part separator) is written as-is.
fn write_comment(out: &mut String, comment: &str, indent: usize) {
    for line in comment.split('\n') {
        pad(out, indent);
        if line.is_empty() {
            out.push_str("#\n");
        } else if line.starts_with('#') {
            out.push_str(line);
            out.push('\n');
        } else {
            out.push_str("# ");
            out.push_str(line);
            out.push('\n');
        }
    }
}

fn pad(out: &mut String, indent: usize) {
    for _ in 0..indent {
        out.push_str("  ");
    }
}

fn scalar_text(value: &str) -> String {
    if RE_PLAIN_SCALAR.is_match(value) {
        value.to_string()
    } else {
        quote(value)
    }
}

fn quote(value: &str) -> String {
    let mut quoted = String::with_capacity(value.len() + 2);
    quoted.push('"');
    for ch in value.chars() {
        match ch {
            '"' => quoted.push_str("\\\""),
            '\\' => quoted.push_str("\\\\"),
            '\n' => quoted.push_str("\\n"),
            '\t' => quoted.push_str("\\t"),
            '\r' => quoted.push_str("\\r"),
            _ => quoted.push(ch),
        }
    }
    quoted.push('"');
    quoted
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::DocNode;

    fn doc(root: DocNode) -> Document {
        Document {
            head_comment: String::new(),
            root,
        }
    }

    #[test]
    fn plain_scalars_unquoted() {
        assert_eq!(scalar_text("hello"), "hello");
        assert_eq!(scalar_text("8"), "8");
        assert_eq!(scalar_text("true"), "true");
        assert_eq!(scalar_text("Level::Info"), "Level::Info");
    }

    #[test]
    fn unsafe_scalars_quoted() {
        assert_eq!(scalar_text(""), "\"\"");
        assert_eq!(scalar_text("two words"), "\"two words\"");
        assert_eq!(scalar_text(":"), "\":\"");
        assert_eq!(scalar_text("a\"b"), "\"a\\\"b\"");
    }

    #[test]
    fn simple_mapping() {
        let root = DocNode::mapping(vec![
            DocNode::scalar("x"),
            DocNode::scalar("hello"),
        ]);
        assert_eq!(YamlRenderer.render(&doc(root)), "x: hello\n");
    }

    #[test]
    fn key_comment_above_entry() {
        let root = DocNode::mapping(vec![
            DocNode::scalar("x").with_head_comment("X is cool".to_string()),
            DocNode::scalar("hello"),
        ]);
        assert_eq!(YamlRenderer.render(&doc(root)), "# X is cool\nx: hello\n");
    }

    #[test]
    fn continuation_separator_renders_as_bare_hash() {
        let root = DocNode::mapping(vec![
            DocNode::scalar("y").with_head_comment("type doc\n#\nfield doc".to_string()),
            DocNode::scalar("false"),
        ]);
        assert_eq!(
            YamlRenderer.render(&doc(root)),
            "# type doc\n#\n# field doc\ny: false\n"
        );
    }

    #[test]
    fn nested_mapping_indents() {
        let inner = DocNode::mapping(vec![DocNode::scalar("a"), DocNode::scalar("1")]);
        let root = DocNode::mapping(vec![DocNode::scalar("outer"), inner]);
        assert_eq!(YamlRenderer.render(&doc(root)), "outer:\n  a: 1\n");
    }

    #[test]
    fn sequence_with_element_comments() {
        let seq = DocNode::sequence(vec![
            DocNode::scalar("hello"),
            DocNode::scalar("abc").with_head_comment("does it?".to_string()),
        ]);
        let root = DocNode::mapping(vec![DocNode::scalar("values"), seq]);
        assert_eq!(
            YamlRenderer.render(&doc(root)),
            "values:\n  - hello\n  # does it?\n  - abc\n"
        );
    }

    #[test]
    fn empty_collections_inline() {
        let root = DocNode::mapping(vec![
            DocNode::scalar("m"),
            DocNode::mapping(vec![]),
            DocNode::scalar("s"),
            DocNode::sequence(vec![]),
        ]);
        assert_eq!(YamlRenderer.render(&doc(root)), "m: {}\ns: []\n");
    }

    #[test]
    fn document_heading_followed_by_blank_line() {
        let document = Document {
            head_comment: "the defaults".to_string(),
            root: DocNode::mapping(vec![DocNode::scalar("a"), DocNode::scalar("1")]),
        };
        assert_eq!(YamlRenderer.render(&document), "# the defaults\n\na: 1\n");
    }

    #[test]
    fn empty_key_quoted() {
        let root = DocNode::mapping(vec![DocNode::scalar(""), DocNode::scalar("1")]);
        assert_eq!(YamlRenderer.render(&doc(root)), "\"\": 1\n");
    }
}
