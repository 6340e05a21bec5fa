#![deny(missing_docs)]

//! # Dir Command
//!
//! Rewrites every Go file below a directory in place. Each file is an
//! independent transformation; the first failure stops the walk.

use crate::error::{CliError, CliResult};
use std::fs;
use std::path::{Path, PathBuf};
use tagcase_core::{transform_with, TransformOptions};
use tracing::{debug, info, warn};
use walkdir::{DirEntry, WalkDir};

/// Arguments for the dir command.
#[derive(clap::Args, Debug, Clone)]
pub struct DirArgs {
    /// Root directory to scan for `.go` files.
    pub dir: PathBuf,

    /// Report files that would change without writing them; fails if any would.
    #[clap(long)]
    pub check: bool,

    #[clap(flatten)]
    pub tags: crate::options::TagArgs,
}

/// Executes the dir command, returning the files that changed (or would change).
pub fn execute(args: &DirArgs, options: &TransformOptions) -> CliResult<Vec<PathBuf>> {
    if !args.dir.is_dir() {
        return Err(CliError::General(format!(
            "Directory not found: {:?}",
            args.dir
        )));
    }

    let mut changed = Vec::new();
    let walker = WalkDir::new(&args.dir)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| !is_skipped_dir(e));

    let mut unread = 0;
    for entry in walker.filter_map(|e| readable(e, &mut unread)) {
        let path = entry.path();
        if entry.file_type().is_file() && path.extension().is_some_and(|ext| ext == "go") {
            if process_file(path, options, args.check)? {
                changed.push(path.to_path_buf());
            }
        }
    }

    if args.check && unread > 0 {
        return Err(CliError::General(format!(
            "{} path(s) could not be read",
            unread
        )));
    }

    if args.check && !changed.is_empty() {
        for path in &changed {
            warn!("{} needs rewriting", path.display());
        }
        return Err(CliError::General(format!(
            "{} file(s) need rewriting",
            changed.len()
        )));
    }

    info!("{} file(s) rewritten", changed.len());
    Ok(changed)
}

/// Hidden directories and `vendor/` are never descended into; the root always is.
fn is_skipped_dir(entry: &DirEntry) -> bool {
    if entry.depth() == 0 || !entry.file_type().is_dir() {
        return false;
    }
    let name = entry.file_name().to_string_lossy();
    name.starts_with('.') || name == "vendor"
}

/// Logs and counts walk errors such as permission denied.
fn readable(entry: walkdir::Result<DirEntry>, unread: &mut usize) -> Option<DirEntry> {
    match entry {
        Ok(entry) => Some(entry),
        Err(err) => {
            warn!("skipping unreadable path: {}", err);
            *unread += 1;
            None
        }
    }
}

fn process_file(path: &Path, options: &TransformOptions, check: bool) -> CliResult<bool> {
    let source = fs::read_to_string(path)?;
    let result = transform_with(&source, &path.display().to_string(), options)?;

    if !result.changed() {
        debug!("{} unchanged", path.display());
        return Ok(false);
    }
    if !check {
        fs::write(path, &result.text)?;
    }
    Ok(true)
}
