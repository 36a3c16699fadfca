//! JSON renderer — structured output for tooling integration.
//!
//! Comments have no JSON spelling and are dropped; the tree shape and the
//! written ordering of keys and elements are preserved.

use crate::model::{DocNode, Document, NodeKind};
use crate::render::Renderer;
use regex::Regex;
use std::sync::LazyLock;

static RE_NUMBER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^-?(?:0|[1-9][0-9]*)(?:\.[0-9]+)?$").unwrap());

pub struct JsonRenderer;

impl Renderer for JsonRenderer {
    fn render(&self, doc: &Document) -> String {
        let mut out = String::new();
        render_node(&mut out, &doc.root, 0);
        out.push('\n');
        out
    }

    fn file_extension(&self) -> &str {
        "json"
    }
}

fn render_node(out: &mut String, node: &DocNode, indent: usize) {
    match node.kind {
        NodeKind::Scalar => out.push_str(&scalar_text(&node.value)),
        NodeKind::Mapping => {
            if node.children.is_empty() {
                out.push_str("{}");
                return;
            }
            out.push_str("{\n");
            let pairs = node.children.chunks(2).collect::<Vec<_>>();
            for (i, pair) in pairs.iter().enumerate() {
                let [key, value] = *pair else { continue };
                pad(out, indent + 1);
                out.push_str(&format!("\"{}\": ", json_escape(&key.value)));
                render_node(out, value, indent + 1);
                if i < pairs.len() - 1 {
                    out.push(',');
                }
                out.push('\n');
            }
            pad(out, indent);
            out.push('}');
        }
        NodeKind::Sequence => {
            if node.children.is_empty() {
                out.push_str("[]");
                return;
            }
            out.push_str("[\n");
            for (i, elem) in node.children.iter().enumerate() {
                pad(out, indent + 1);
                render_node(out, elem, indent + 1);
                if i < node.children.len() - 1 {
                    out.push(',');
                }
                out.push('\n');
            }
            pad(out, indent);
            out.push(']');
        }
    }
}

/// Numbers and booleans keep their literal spelling; everything else is a
/// JSON string. The walker erased source types, so the text decides.
fn scalar_text(value: &str) -> String {
    if value == "true" || value == "false" || RE_NUMBER.is_match(value) {
        value.to_string()
    } else {
        format!("\"{}\"", json_escape(value))
    }
}

fn pad(out: &mut String, indent: usize) {
    for _ in 0..indent {
        out.push_str("  ");
    }
}

fn json_escape(s: &str) -> String {
    s.replace('\\', "\\\\")
        .replace('"', "\\\"")
        .replace('\n', "\\n")
        .replace('\r', "\\r")
        .replace('\t', "\\t")
}
