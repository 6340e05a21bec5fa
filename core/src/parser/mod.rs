#![deny(missing_docs)]

//! # Parser Module
//!
//! Handles parsing of Go source code using the tree-sitter Go grammar.
//! Produces an arena-owned syntax tree that keeps comments and exact byte
//! positions so unmodified regions can be re-emitted verbatim.

pub mod extractors;
pub mod models;

pub use extractors::parse_source;
pub use models::{
    FieldDecl, LiteralStyle, Node, NodeId, NodeKind, Span, SyntaxTree, TagLiteral,
};
