//! # Data Models
//!
//! Arena-backed syntax tree built from a parsed Go source file.

use crate::golit;

/// Index of a node inside its [`SyntaxTree`] arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) usize);

/// Location of a node in the original source (0-based rows and byte columns).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Span {
    /// Offset of the first byte.
    pub start_byte: usize,
    /// Offset one past the last byte.
    pub end_byte: usize,
    /// Row of the first byte.
    pub start_row: usize,
    /// Byte column of the first byte.
    pub start_column: usize,
    /// Row of the last byte.
    pub end_row: usize,
}

impl Span {
    /// Whether the node starts and ends on the same row.
    pub fn is_single_line(&self) -> bool {
        self.start_row == self.end_row
    }
}

/// How a struct tag literal is delimited.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LiteralStyle {
    /// `` `json:"name"` ``
    Raw,
    /// `"json:\"name\""`
    Interpreted,
}

/// The tag attached to a field declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagLiteral {
    /// Delimiter style of the literal.
    pub style: LiteralStyle,
    /// Location of the literal in the original source.
    pub span: Span,
    /// Current literal text, delimiters included.
    pub text: String,
}

impl TagLiteral {
    /// Decodes the literal into the tag string it denotes.
    ///
    /// Returns `None` for an interpreted literal with invalid escapes.
    pub fn content(&self) -> Option<String> {
        match self.style {
            LiteralStyle::Raw => self
                .text
                .strip_prefix('`')
                .and_then(|s| s.strip_suffix('`'))
                .map(str::to_string),
            LiteralStyle::Interpreted => golit::unquote(&self.text),
        }
    }

    /// Replaces the literal with one denoting `content`, keeping the delimiter style.
    pub fn set_content(&mut self, content: &str) {
        self.text = match self.style {
            LiteralStyle::Raw if !content.contains('`') => format!("`{}`", content),
            _ => golit::quote(content),
        };
    }
}

/// A single member of a struct type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDecl {
    /// Declared names; empty for an embedded field.
    pub names: Vec<String>,
    /// Type text as written.
    pub ty: String,
    /// Optional struct tag.
    pub tag: Option<TagLiteral>,
}

/// The closed set of node kinds the transformer distinguishes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeKind {
    /// The file root.
    SourceFile,
    /// `Name <type>` inside a type declaration.
    TypeSpec {
        /// Declared type name.
        name: String,
    },
    /// `struct { ... }`
    StructType,
    /// The braces-delimited member list of a struct.
    FieldList,
    /// A struct member.
    Field(FieldDecl),
    /// A line or block comment.
    Comment,
    /// Any other grammar node, by tree-sitter kind.
    Other(&'static str),
}

/// A node of the arena.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    /// Variant payload.
    pub kind: NodeKind,
    /// Location in the original source.
    pub span: Span,
    /// Enclosing node, `None` for the root.
    pub parent: Option<NodeId>,
    /// Named children in source order.
    pub children: Vec<NodeId>,
}

/// Syntax tree of one source file.
///
/// Owns the source text and every node; dropped as a whole after emission.
#[derive(Debug, Clone)]
pub struct SyntaxTree {
    file_name: String,
    source: String,
    nodes: Vec<Node>,
}

impl SyntaxTree {
    pub(crate) fn new(file_name: &str, source: &str, nodes: Vec<Node>) -> Self {
        Self {
            file_name: file_name.to_string(),
            source: source.to_string(),
            nodes,
        }
    }

    /// The virtual file name given to the parser.
    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    /// The original source text.
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Original text covered by `span`.
    pub fn text(&self, span: &Span) -> &str {
        self.source
            .get(span.start_byte..span.end_byte)
            .unwrap_or_default()
    }

    /// The `source_file` node. The arena is never empty.
    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    /// Looks up a node.
    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }

    /// Looks up a node for mutation.
    pub fn node_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.nodes[id.0]
    }

    /// Number of nodes in the arena.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Always false: a parsed file has at least its root.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Node ids in depth-first pre-order, children in source order.
    pub fn preorder(&self) -> Vec<NodeId> {
        let mut order = Vec::with_capacity(self.nodes.len());
        let mut stack = vec![self.root()];
        while let Some(id) = stack.pop() {
            order.push(id);
            stack.extend(self.node(id).children.iter().rev().copied());
        }
        order
    }

    /// Field declarations in source order.
    pub fn fields(&self) -> impl Iterator<Item = (NodeId, &FieldDecl)> + '_ {
        self.preorder()
            .into_iter()
            .filter_map(move |id| match &self.node(id).kind {
                NodeKind::Field(field) => Some((id, field)),
                _ => None,
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn literal(style: LiteralStyle, text: &str) -> TagLiteral {
        TagLiteral {
            style,
            span: Span::default(),
            text: text.to_string(),
        }
    }

    #[test]
    fn test_raw_literal_content() {
        let mut tag = literal(LiteralStyle::Raw, "`json:\"a_b\"`");
        assert_eq!(tag.content().as_deref(), Some("json:\"a_b\""));
        tag.set_content("json:\"aB\"");
        assert_eq!(tag.text, "`json:\"aB\"`");
    }

    #[test]
    fn test_interpreted_literal_content() {
        let mut tag = literal(LiteralStyle::Interpreted, r#""json:\"a_b\"""#);
        assert_eq!(tag.content().as_deref(), Some("json:\"a_b\""));
        tag.set_content("json:\"aB\"");
        assert_eq!(tag.text, r#""json:\"aB\"""#);
    }

    #[test]
    fn test_raw_literal_falls_back_to_quotes_for_backticks() {
        let mut tag = literal(LiteralStyle::Raw, "``");
        tag.set_content("a`b");
        assert_eq!(tag.text, "\"a`b\"");
    }
}
