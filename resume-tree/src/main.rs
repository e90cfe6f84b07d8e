//! Command-line front end for editing an addressable resume document.
//!
//! Operates on `.resume/` in the current directory: the document
//! (`document.json`), its schema, and `config.toml`.

use std::path::{Path, PathBuf};

use anyhow::Result;
use clap::{Parser, Subcommand};

use resume_tree::apply::{ApplyOptions, apply_from_root, outline_from_root};
use resume_tree::exit_codes;
use resume_tree::io::init::{InitOptions, init_workspace};
use resume_tree::logging;
use resume_tree::validate::validate_workspace;

#[derive(Parser)]
#[command(
    name = "resume-tree",
    version,
    about = "Addressable resume document editor"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Create `.resume/` with an empty document, schema, and config.
    Init {
        /// Overwrite existing files.
        #[arg(short, long)]
        force: bool,
    },
    /// Check the document against the schema and invariants.
    Validate,
    /// Print the numbered outline of the document.
    Outline,
    /// Apply a JSON list of actions to the document.
    Apply {
        /// File holding the actions (array, or `{ "actions": [...] }`).
        actions: PathBuf,
        /// Report results without writing the document.
        #[arg(long)]
        dry_run: bool,
    },
}

fn main() {
    logging::init();
    match run() {
        Ok(code) => std::process::exit(code),
        Err(err) => {
            eprintln!("{:#}", err);
            std::process::exit(exit_codes::INVALID);
        }
    }
}

fn run() -> Result<i32> {
    let cli = Cli::parse();
    let root = Path::new(".");
    match cli.command {
        Command::Init { force } => {
            let paths = init_workspace(root, &InitOptions { force })?;
            println!("initialized {}", paths.resume_dir.display());
            Ok(exit_codes::OK)
        }
        Command::Validate => {
            let outcome = validate_workspace(root)?;
            println!(
                "ok: {} nodes ({} top-level, depth {})",
                outcome.nodes, outcome.roots, outcome.depth
            );
            Ok(exit_codes::OK)
        }
        Command::Outline => {
            print!("{}", outline_from_root(root)?);
            Ok(exit_codes::OK)
        }
        Command::Apply { actions, dry_run } => {
            let report = apply_from_root(root, &actions, &ApplyOptions { dry_run })?;
            print!("{}", report.render());
            if report.is_complete() {
                Ok(exit_codes::OK)
            } else {
                Ok(exit_codes::PARTIAL)
            }
        }
    }
}
