#![deny(missing_docs)]

//! # tagcase core
//!
//! Rewrites the names in Go struct tags (`json:"my_field"` -> `json:"myField"`)
//! while leaving every other byte of the file as it was.
//!
//! The pipeline is `parse_source` -> `rewrite` -> `emit`, composed by
//! [`transform`] and [`transform_with`].

/// Shared error types.
pub mod error;

/// Identifier case conversion.
pub mod case;

/// Go string literal escapes.
pub mod golit;

/// Struct tag mini-syntax.
pub mod tags;

/// Go source parsing.
pub mod parser;

/// Tag rewriting over the syntax tree.
pub mod rewriter;

/// Source re-emission.
pub mod emitter;

/// Run options.
pub mod config;

/// The parse-rewrite-emit pipeline.
pub mod transform;

pub use case::to_lower_camel_case;
pub use config::{TransformOptions, DEFAULT_KEY};
pub use emitter::emit;
pub use error::{AppError, AppResult, ParseError};
pub use parser::{parse_source, SyntaxTree};
pub use rewriter::{rewrite, RewriteReport};
pub use tags::{Tag, TagError, TagItem, TagList};
pub use transform::{transform, transform_with, Transformed};
