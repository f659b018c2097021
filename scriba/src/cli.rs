//! CLI argument definitions using clap.

use clap::{Parser, Subcommand};
use eyre::{Context, Result};
use scriba_core::store::HistoryStore;
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "scriba")]
#[command(about = "Transcribe recordings via AssemblyAI and export the results")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Upload a recording, wait for the transcript, and display it
    Transcribe(crate::transcribe::Args),

    /// Render a stored transcript as speaker blocks
    View(crate::view::Args),

    /// Write a stored transcript as TXT, Markdown, SRT, or JSON
    Export(crate::export::Args),

    /// List or prune recent transcriptions
    History(crate::history::Args),
}

/// Execute CLI command - separated for testing.
pub fn run_cli(cli: Cli) -> Result<()> {
    tracing::debug!(?cli, "parsed arguments");

    match cli.command {
        Commands::Transcribe(args) => crate::transcribe::execute(args.try_into()?),
        Commands::View(args) => crate::view::execute(args.try_into()?),
        Commands::Export(args) => crate::export::execute(args.try_into()?),
        Commands::History(args) => crate::history::execute(args.try_into()?),
    }
}

/// History location flags shared by subcommands.
#[derive(clap::Args, Clone, Debug)]
pub struct StoreArgs {
    /// History location (default: platform data directory)
    #[arg(long, env = "SCRIBA_DATA_DIR")]
    pub data_dir: Option<PathBuf>,
}

impl StoreArgs {
    /// Open the history store this invocation points at.
    pub fn open(&self) -> Result<HistoryStore> {
        match &self.data_dir {
            Some(dir) => Ok(HistoryStore::at(dir)),
            None => HistoryStore::open_default().wrap_err("failed to locate data directory"),
        }
    }
}
