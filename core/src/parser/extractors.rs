//! # Tree Extraction
//!
//! Parses Go source with tree-sitter and copies the named nodes into a
//! [`SyntaxTree`] arena.

use crate::error::{AppError, AppResult, ParseError};
use crate::parser::models::{
    FieldDecl, LiteralStyle, Node, NodeId, NodeKind, Span, SyntaxTree, TagLiteral,
};
use tree_sitter::Parser;

/// Parses `source` into a syntax tree.
///
/// `file_name` is only used to label parse errors.
pub fn parse_source(source: &str, file_name: &str) -> AppResult<SyntaxTree> {
    let mut parser = Parser::new();
    parser
        .set_language(&tree_sitter_go::language())
        .map_err(|e| AppError::General(format!("Failed to load Go grammar: {}", e)))?;

    let tree = parser
        .parse(source, None)
        .ok_or_else(|| AppError::General(format!("Parser produced no tree for {}", file_name)))?;

    let root = tree.root_node();
    if root.has_error() {
        return Err(AppError::Parse(locate_error(root, source, file_name)));
    }

    let mut builder = ArenaBuilder {
        source,
        nodes: Vec::new(),
    };
    builder.push(root, None);

    Ok(SyntaxTree::new(file_name, source, builder.nodes))
}

struct ArenaBuilder<'s> {
    source: &'s str,
    nodes: Vec<Node>,
}

impl ArenaBuilder<'_> {
    fn push(&mut self, ts: tree_sitter::Node<'_>, parent: Option<NodeId>) -> NodeId {
        let id = NodeId(self.nodes.len());
        let kind = self.classify(ts);
        self.nodes.push(Node {
            kind,
            span: span_of(ts),
            parent,
            children: Vec::new(),
        });

        let mut cursor = ts.walk();
        let children: Vec<_> = ts.named_children(&mut cursor).collect();
        for child in children {
            let child_id = self.push(child, Some(id));
            self.nodes[id.0].children.push(child_id);
        }
        id
    }

    fn classify(&self, ts: tree_sitter::Node<'_>) -> NodeKind {
        match ts.kind() {
            "source_file" => NodeKind::SourceFile,
            "type_spec" => NodeKind::TypeSpec {
                name: ts
                    .child_by_field_name("name")
                    .map(|n| self.text(n).to_string())
                    .unwrap_or_default(),
            },
            "struct_type" => NodeKind::StructType,
            "field_declaration_list" => NodeKind::FieldList,
            "field_declaration" => NodeKind::Field(self.field(ts)),
            "comment" => NodeKind::Comment,
            other => NodeKind::Other(other),
        }
    }

    fn field(&self, ts: tree_sitter::Node<'_>) -> FieldDecl {
        let mut cursor = ts.walk();
        let names = ts
            .children_by_field_name("name", &mut cursor)
            .map(|n| self.text(n).to_string())
            .collect();

        let ty = ts
            .child_by_field_name("type")
            .map(|n| self.text(n).to_string())
            .unwrap_or_default();

        let tag = ts.child_by_field_name("tag").and_then(|n| {
            let style = match n.kind() {
                "raw_string_literal" => LiteralStyle::Raw,
                "interpreted_string_literal" => LiteralStyle::Interpreted,
                _ => return None,
            };
            Some(TagLiteral {
                style,
                span: span_of(n),
                text: self.text(n).to_string(),
            })
        });

        FieldDecl { names, ty, tag }
    }

    fn text(&self, ts: tree_sitter::Node<'_>) -> &str {
        self.source.get(ts.byte_range()).unwrap_or_default()
    }
}

fn span_of(ts: tree_sitter::Node<'_>) -> Span {
    let start = ts.start_position();
    Span {
        start_byte: ts.start_byte(),
        end_byte: ts.end_byte(),
        start_row: start.row,
        start_column: start.column,
        end_row: ts.end_position().row,
    }
}

/// Finds the first `ERROR` or `MISSING` node in pre-order and describes it.
fn locate_error(root: tree_sitter::Node<'_>, source: &str, file_name: &str) -> ParseError {
    let mut stack = vec![root];
    while let Some(node) = stack.pop() {
        if node.is_error() || node.is_missing() {
            let pos = node.start_position();
            let message = if node.is_missing() {
                format!("missing `{}`", node.kind())
            } else {
                let snippet: String = source
                    .get(node.byte_range())
                    .unwrap_or_default()
                    .lines()
                    .next()
                    .unwrap_or_default()
                    .trim()
                    .chars()
                    .take(24)
                    .collect();
                if snippet.is_empty() {
                    "unexpected end of input".to_string()
                } else {
                    format!("unexpected `{}`", snippet)
                }
            };
            return ParseError {
                file: file_name.to_string(),
                line: pos.row + 1,
                column: pos.column + 1,
                message,
            };
        }

        let mut cursor = node.walk();
        let children: Vec<_> = node.children(&mut cursor).collect();
        stack.extend(children.into_iter().rev());
    }

    ParseError {
        file: file_name.to_string(),
        line: 1,
        column: 1,
        message: "syntax error".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SOURCE: &str = r#"package conf

// CacheRef points at a cache.
type CacheRef struct {
	Name      string `json:"name,omitempty"`
	Namespace string "json:\"namespace\""
	*Embedded
	A, B int
}
"#;

    #[test]
    fn test_parse_fields() {
        let tree = parse_source(SOURCE, "conf.go").unwrap();
        let fields: Vec<&FieldDecl> = tree.fields().map(|(_, f)| f).collect();
        assert_eq!(fields.len(), 4);

        assert_eq!(fields[0].names, vec!["Name"]);
        assert_eq!(fields[0].ty, "string");
        let tag = fields[0].tag.as_ref().unwrap();
        assert_eq!(tag.style, LiteralStyle::Raw);
        assert_eq!(tag.text, "`json:\"name,omitempty\"`");
        assert_eq!(tree.text(&tag.span), tag.text);

        let tag = fields[1].tag.as_ref().unwrap();
        assert_eq!(tag.style, LiteralStyle::Interpreted);
        assert_eq!(tag.content().as_deref(), Some("json:\"namespace\""));

        assert!(fields[2].names.is_empty());
        assert!(fields[2].tag.is_none());
        assert_eq!(fields[3].names, vec!["A", "B"]);
    }

    #[test]
    fn test_parse_keeps_comments_and_type_names() {
        let tree = parse_source(SOURCE, "conf.go").unwrap();
        let kinds: Vec<&NodeKind> = tree.preorder().into_iter().map(|id| &tree.node(id).kind).collect();
        assert_eq!(kinds[0], &NodeKind::SourceFile);
        assert!(kinds.contains(&&NodeKind::Comment));
        assert!(kinds.contains(&&NodeKind::TypeSpec {
            name: "CacheRef".into()
        }));
    }

    #[test]
    fn test_parent_links() {
        let tree = parse_source(SOURCE, "conf.go").unwrap();
        let (id, _) = tree.fields().next().unwrap();
        let parent = tree.node(id).parent.unwrap();
        assert_eq!(tree.node(parent).kind, NodeKind::FieldList);
        assert!(tree.node(tree.root()).parent.is_none());
    }

    #[test]
    fn test_parse_error_position() {
        let code = "package conf\n\ntype T struct {\n\tA string `json:\"a\"`\n";
        match parse_source(code, "broken.go") {
            Err(AppError::Parse(err)) => {
                assert_eq!(err.file, "broken.go");
                assert!(err.line >= 3, "line: {}", err.line);
                assert!(err.to_string().starts_with("broken.go:"));
            }
            other => panic!("expected parse error, got {:?}", other),
        }
    }
}
