//! # Option Resolution
//!
//! Merges the optional YAML config file with command line flags.

use crate::error::CliResult;
use std::path::Path;
use tagcase_core::TransformOptions;

/// Flags shared by every subcommand.
#[derive(clap::Args, Debug, Clone, Default)]
pub struct TagArgs {
    /// Tag key whose names are rewritten (overrides the config file).
    #[clap(long, env = "TAGCASE_KEY")]
    pub key: Option<String>,

    /// Fail on malformed struct tags instead of keeping them.
    #[clap(long)]
    pub strict: bool,
}

/// Builds the run options: defaults, then the config file, then flags.
pub fn resolve(config: Option<&Path>, args: &TagArgs) -> CliResult<TransformOptions> {
    let mut options = match config {
        Some(path) => TransformOptions::load(path)?,
        None => TransformOptions::default(),
    };

    if let Some(key) = &args.key {
        options.key = key.clone();
    }
    if args.strict {
        options.strict = true;
    }

    options.validate()?;
    Ok(options)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_defaults_without_config() {
        let options = resolve(None, &TagArgs::default()).unwrap();
        assert_eq!(options, TransformOptions::default());
    }

    #[test]
    fn test_flags_override_config() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("tagcase.yaml");
        fs::write(&path, "key: yaml\nstrict: false\n").unwrap();

        let from_file = resolve(Some(&path), &TagArgs::default()).unwrap();
        assert_eq!(from_file.key, "yaml");

        let args = TagArgs {
            key: Some("bson".into()),
            strict: true,
        };
        let merged = resolve(Some(&path), &args).unwrap();
        assert_eq!(merged, TransformOptions::new("bson").with_strict(true));
    }

    #[test]
    fn test_invalid_key_flag() {
        let args = TagArgs {
            key: Some("bad key".into()),
            strict: false,
        };
        assert!(resolve(None, &args).is_err());
    }
}
