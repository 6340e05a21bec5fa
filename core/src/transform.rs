//! # Transform Pipeline
//!
//! Parse, rewrite, emit. Nothing survives between calls.

use crate::config::TransformOptions;
use crate::emitter::emit;
use crate::error::AppResult;
use crate::parser::parse_source;
use crate::rewriter::{rewrite, RewriteReport};
use tracing::debug;

/// File name used in diagnostics when the caller supplies none.
pub const DEFAULT_FILE_NAME: &str = "<input>";

/// Result of a transformation run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transformed {
    /// The rewritten source.
    pub text: String,
    /// What the rewriter did.
    pub report: RewriteReport,
    changed: bool,
}

impl Transformed {
    /// Whether the output differs from the input.
    pub fn changed(&self) -> bool {
        self.changed
    }
}

/// Rewrites the `key` tag names of every struct field in `source` to lower camel case.
pub fn transform(source: &str, key: &str) -> AppResult<String> {
    transform_with(source, DEFAULT_FILE_NAME, &TransformOptions::new(key)).map(|t| t.text)
}

/// Like [`transform`], with full options and a file name for diagnostics.
pub fn transform_with(
    source: &str,
    file_name: &str,
    options: &TransformOptions,
) -> AppResult<Transformed> {
    options.validate()?;

    let mut tree = parse_source(source, file_name)?;
    let report = rewrite(&mut tree, options)?;
    let text = emit(&tree)?;

    debug!(
        "{}: {} field(s), {} tagged, {} renamed, {} malformed",
        file_name, report.fields, report.tagged, report.renamed, report.malformed
    );

    Ok(Transformed {
        changed: text != source,
        text,
        report,
    })
}
