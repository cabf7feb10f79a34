//! CLI entry point for plaintodo.

use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use plaintodo_app::{MutationEngine, ProjectConfig, ReportService};
use tracing_subscriber::{EnvFilter, filter::LevelFilter, fmt::format::FmtSpan};

mod commands;

/// Plaintext todo lists with range edits and one-level undo.
#[derive(Parser, Debug)]
#[command(
    name = "plaintodo",
    version,
    about = "plaintodo: pending and done tasks kept in two plaintext files"
)]
struct Cli {
    /// Directory holding the list files (defaults to current).
    #[arg(long)]
    dir: Option<PathBuf>,

    /// Pending list file, relative to the list directory.
    #[arg(long)]
    pending_file: Option<PathBuf>,

    /// Completed list file, relative to the list directory.
    #[arg(long)]
    completed_file: Option<PathBuf>,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Show numbered pending tasks, optionally only those carrying a tag.
    Ls {
        /// Tag or tag prefix to filter by.
        tag: Option<String>,
        /// Show the completed list instead.
        #[arg(long)]
        done: bool,
        #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
        format: OutputFormat,
    },

    /// Show both lists, optionally only tasks carrying a tag.
    All {
        /// Tag or tag prefix to filter by.
        tag: Option<String>,
    },

    /// Append a task to the pending list.
    Add {
        #[arg(required = true, num_args = 1..)]
        text: Vec<String>,
    },

    /// Delete pending tasks by line range.
    Del { range: String },

    /// Replace pending tasks by line range.
    Change {
        range: String,
        #[arg(required = true, num_args = 1..)]
        text: Vec<String>,
    },

    /// Move pending tasks to the completed list.
    Done { range: String },

    /// Move completed tasks back to the pending list.
    Undone { range: String },

    /// Undo the last change, or redo it when run twice.
    Revert,

    /// Show changes to the pending list since the last snapshot.
    Diff,

    /// Tally tags across both lists.
    Report {
        #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
        format: OutputFormat,
    },

    /// Expand a tag prefix to a known tag.
    Expand { partial: String },
}

#[derive(Clone, Copy, Debug, Default, ValueEnum, PartialEq, Eq)]
enum OutputFormat {
    #[default]
    Table,
    Json,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    install_tracing();

    let stdout = io::stdout();
    let mut out = stdout.lock();
    execute_command(cli, &mut out)?;
    out.flush()?;
    Ok(())
}

fn execute_command<W: Write>(cli: Cli, out: &mut W) -> Result<()> {
    let Cli {
        dir,
        pending_file,
        completed_file,
        cmd,
    } = cli;
    let dir = dir.unwrap_or_else(|| PathBuf::from("."));

    let mut config = ProjectConfig::from_dir(&dir)?;
    if let Some(pending) = pending_file {
        config.lists.pending = pending;
    }
    if let Some(completed) = completed_file {
        config.lists.completed = completed;
    }
    config.validate()?;

    let store = config.open_store(&dir);
    store.ensure_files()?;
    let engine = MutationEngine::new(&store);
    let reports = ReportService::new(&store);
    commands::run(cmd, &engine, &reports, out)
}

fn install_tracing() {
    // RUST_LOG overrides the default INFO level.
    let filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy();
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_span_events(FmtSpan::NONE)
        .with_writer(io::stderr)
        .compact()
        .try_init();
}
