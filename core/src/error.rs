//! # Error Handling
//!
//! Provides the unified `AppError` enum used across the workspace.

use derive_more::{Display, From};

/// A syntax error reported while parsing Go source.
///
/// Positions are 1-based, matching the `file:line:col` form used by the Go toolchain.
#[derive(Debug, Clone, PartialEq, Eq, Display)]
#[display("{file}:{line}:{column}: {message}")]
pub struct ParseError {
    /// Virtual file name supplied by the caller.
    pub file: String,
    /// 1-based line.
    pub line: usize,
    /// 1-based column (in bytes).
    pub column: usize,
    /// Human readable description.
    pub message: String,
}

impl std::error::Error for ParseError {}

/// The Global Error Enum.
///
/// We use `derive_more` for boilerplate.
/// Note: String errors default to `General`.
#[derive(Debug, Display, From)]
pub enum AppError {
    /// Wrapper for standard IO errors.
    #[display("IO Error: {_0}")]
    Io(std::io::Error),

    /// The input is not valid Go source.
    #[display("Parse Error: {_0}")]
    Parse(ParseError),

    /// The rewritten tree could not be emitted as valid source.
    #[from(ignore)]
    #[display("Format Error: {_0}")]
    Format(String),

    /// A struct tag could not be parsed (strict mode only).
    #[from(ignore)]
    #[display("Tag Error: {_0}")]
    Tag(String),

    /// Invalid configuration file or value.
    #[from(ignore)]
    #[display("Config Error: {_0}")]
    Config(String),

    /// Generic errors.
    #[display("General Error: {_0}")]
    General(String),
}

/// Manual implementation of the standard Error trait.
impl std::error::Error for AppError {}

/// Helper type alias for Result using AppError.
pub type AppResult<T> = Result<T, AppError>;
