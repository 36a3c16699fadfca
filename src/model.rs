//! Data model for the generated document — format-agnostic.

/// Complete document: the walked defaults tree plus its heading comment.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct Document {
    /// Doc comment of the defaults declaration, rendered above the tree.
    pub head_comment: String,
    pub root: DocNode,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    Scalar,
    Mapping,
    Sequence,
}

impl Default for NodeKind {
    fn default() -> Self {
        NodeKind::Scalar
    }
}

/// One node of the output tree.
///
/// A mapping's children alternate key, value, key, value, … in the order the
/// source literal wrote them. A sequence's children are its elements. The
/// head comment, if any, is rendered immediately before the node.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct DocNode {
    pub kind: NodeKind,
    pub value: String,
    pub children: Vec<DocNode>,
    pub head_comment: String,
}

/// Separator line placed between independently sourced comment parts.
const COMMENT_CONTINUATION: &str = "\n#\n";

impl DocNode {
    pub fn scalar(value: impl Into<String>) -> DocNode {
        DocNode {
            kind: NodeKind::Scalar,
            value: value.into(),
            ..DocNode::default()
        }
    }

    pub fn mapping(children: Vec<DocNode>) -> DocNode {
        debug_assert!(children.len() % 2 == 0, "mapping children must be key/value pairs");
        DocNode {
            kind: NodeKind::Mapping,
            children,
            ..DocNode::default()
        }
    }

    pub fn sequence(children: Vec<DocNode>) -> DocNode {
        DocNode {
            kind: NodeKind::Sequence,
            children,
            ..DocNode::default()
        }
    }

    pub fn with_head_comment(mut self, comment: String) -> DocNode {
        self.head_comment = comment;
        self
    }

    /// Append further comment text without displacing what the node already
    /// carries (sequence elements pick up their preceding comment after the
    /// element itself has been walked).
    pub fn append_head_comment(&mut self, comment: &str) {
        if comment.is_empty() {
            return;
        }
        if self.head_comment.is_empty() {
            self.head_comment = comment.to_string();
        } else {
            self.head_comment.push_str(COMMENT_CONTINUATION);
            self.head_comment.push_str(comment);
        }
    }
}

/// Join comment parts in priority order into one head comment.
///
/// Parts are separated by a bare `#` line so each source of documentation
/// stays visually distinct in the rendered output. Empty parts are dropped;
/// an empty result means no comment at all.
pub fn join_docs(parts: &[String]) -> String {
    let present: Vec<&str> = parts
        .iter()
        .map(|p| p.trim_end_matches('\n'))
        .filter(|p| !p.is_empty())
        .collect();
    present.join(COMMENT_CONTINUATION)
}
