#![deny(missing_docs)]

//! # tagcase CLI
//!
//! Command Line Interface for the Go struct tag normalizer.
//!
//! Supported Commands:
//! - `file`: Rewrites one file into a destination path (`go:generate` friendly).
//! - `dir`: Rewrites every `.go` file under a directory in place, or checks it.

use crate::error::CliResult;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod dir;
mod error;
mod file;
mod options;

#[derive(Parser, Debug)]
#[clap(
    author,
    version,
    about = "Rewrites Go struct tag names to lower camel case"
)]
struct Cli {
    /// YAML file with the default options (`key`, `strict`).
    #[clap(long, global = true, env = "TAGCASE_CONFIG")]
    config: Option<PathBuf>,

    /// Enable debug logging.
    #[clap(short, long, global = true)]
    verbose: bool,

    #[clap(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Rewrite INFILE into OUTFILE.
    File(file::FileArgs),
    /// Rewrite all Go files below a directory in place.
    Dir(dir::DirArgs),
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "tagcase={lvl},tagcase_core={lvl}",
            lvl = default_level
        ))
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() -> CliResult<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = cli.config.as_deref();
    match &cli.command {
        Commands::File(args) => {
            let options = options::resolve(config, &args.tags)?;
            file::execute(args, &options)?;
        }
        Commands::Dir(args) => {
            let options = options::resolve(config, &args.tags)?;
            dir::execute(args, &options)?;
        }
    }

    Ok(())
}
