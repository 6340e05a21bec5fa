//! # Configuration
//!
//! Options controlling a transformation run, loadable from YAML.

use crate::error::{AppError, AppResult};
use serde::Deserialize;
use std::fs;
use std::path::Path;

/// Tag key rewritten when none is configured.
pub const DEFAULT_KEY: &str = "json";

/// Options for one transformation run.
///
/// ```yaml
/// key: json
/// strict: false
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TransformOptions {
    /// The tag key whose name gets rewritten.
    pub key: String,
    /// Fail on malformed tags instead of passing them through.
    pub strict: bool,
}

impl Default for TransformOptions {
    fn default() -> Self {
        Self {
            key: DEFAULT_KEY.to_string(),
            strict: false,
        }
    }
}

impl TransformOptions {
    /// Options rewriting `key` in lenient mode.
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            ..Self::default()
        }
    }

    /// Sets strict mode.
    pub fn with_strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    /// Parses options from a YAML document. Missing fields take their defaults.
    pub fn from_yaml_str(yaml: &str) -> AppResult<Self> {
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        let options: Self = serde_yaml::from_str(yaml)
            .map_err(|e| AppError::Config(format!("Invalid options: {}", e)))?;
        options.validate()?;
        Ok(options)
    }

    /// Reads options from a YAML file.
    pub fn load(path: &Path) -> AppResult<Self> {
        let content = fs::read_to_string(path)?;
        Self::from_yaml_str(&content)
            .map_err(|e| AppError::Config(format!("{}: {}", path.display(), e)))
    }

    /// Checks that the key could appear in a struct tag.
    pub fn validate(&self) -> AppResult<()> {
        if self.key.is_empty() {
            return Err(AppError::Config("Tag key must not be empty".into()));
        }
        if let Some(bad) = self
            .key
            .chars()
            .find(|c| *c <= ' ' || *c == ':' || *c == '"' || *c == '\u{7f}')
        {
            return Err(AppError::Config(format!(
                "Tag key '{}' contains invalid character {:?}",
                self.key, bad
            )));
        }
        Ok(())
    }
}
