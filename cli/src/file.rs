#![deny(missing_docs)]

//! # File Command
//!
//! Rewrites one Go file into a destination path, optionally removing the input
//! afterwards (the `go:generate` flow: `tagcase file --rm x.pb.go zz_x.pb.go`).

use crate::error::CliResult;
use std::fs;
use std::path::{Path, PathBuf};
use tagcase_core::{transform_with, TransformOptions};
use tracing::info;

/// Arguments for the file command.
#[derive(clap::Args, Debug, Clone)]
pub struct FileArgs {
    /// Go source file to read.
    pub infile: PathBuf,

    /// Destination of the rewritten source.
    pub outfile: PathBuf,

    /// Remove the input file after a successful rewrite.
    #[clap(long)]
    pub rm: bool,

    #[clap(flatten)]
    pub tags: crate::options::TagArgs,
}

/// Executes the file command.
///
/// The output is only written once the whole pipeline has succeeded.
pub fn execute(args: &FileArgs, options: &TransformOptions) -> CliResult<()> {
    let source = fs::read_to_string(&args.infile)?;
    let name = args.infile.display().to_string();

    let result = transform_with(&source, &name, options)?;
    fs::write(&args.outfile, &result.text)?;

    info!(
        "{} -> {}: {} tag name(s) rewritten",
        name,
        args.outfile.display(),
        result.report.renamed
    );

    if args.rm && !same_file(&args.infile, &args.outfile) {
        fs::remove_file(&args.infile)?;
        info!("removed {}", name);
    }

    Ok(())
}

fn same_file(a: &Path, b: &Path) -> bool {
    match (fs::canonicalize(a), fs::canonicalize(b)) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::TagArgs;
    use tempfile::tempdir;

    const INPUT: &str = "package p\n\ntype T struct {\n\tCacheRef string `json:\"cache_ref,omitempty\"`\n}\n";

    fn args(dir: &Path, rm: bool) -> FileArgs {
        FileArgs {
            infile: dir.join("cache.pb.go"),
            outfile: dir.join("zz_cache.pb.go"),
            rm,
            tags: TagArgs::default(),
        }
    }

    #[test]
    fn test_execute_writes_outfile() {
        let dir = tempdir().unwrap();
        let args = args(dir.path(), false);
        fs::write(&args.infile, INPUT).unwrap();

        execute(&args, &TransformOptions::default()).unwrap();

        let out = fs::read_to_string(&args.outfile).unwrap();
        assert!(out.contains("`json:\"cacheRef,omitempty\"`"));
        assert!(args.infile.exists());
    }

    #[test]
    fn test_execute_removes_infile() {
        let dir = tempdir().unwrap();
        let args = args(dir.path(), true);
        fs::write(&args.infile, INPUT).unwrap();

        execute(&args, &TransformOptions::default()).unwrap();

        assert!(!args.infile.exists());
        assert!(args.outfile.exists());
    }

    #[test]
    fn test_rm_keeps_file_rewritten_in_place() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("cache.go");
        fs::write(&path, INPUT).unwrap();
        let args = FileArgs {
            infile: path.clone(),
            outfile: path.clone(),
            rm: true,
            tags: TagArgs::default(),
        };

        execute(&args, &TransformOptions::default()).unwrap();

        assert!(fs::read_to_string(&path).unwrap().contains("cacheRef"));
    }

    #[test]
    fn test_parse_failure_writes_nothing() {
        let dir = tempdir().unwrap();
        let args = args(dir.path(), true);
        fs::write(&args.infile, "package p\n\ntype T struct {\n").unwrap();

        assert!(execute(&args, &TransformOptions::default()).is_err());
        assert!(!args.outfile.exists());
        assert!(args.infile.exists());
    }
}
