//! History subcommand - list and prune recent transcriptions.

use crate::cli::StoreArgs;
use color_eyre::Section;
use eyre::{eyre, Result};
use scriba_core::store::HistoryStore;

/// CLI arguments for the history commands.
#[derive(clap::Args, Debug)]
pub struct Args {
    #[command(subcommand)]
    pub action: Option<Action>,

    #[command(flatten)]
    pub store: StoreArgs,
}

#[derive(Debug, clap::Subcommand)]
pub enum Action {
    /// Remove one entry and its stored transcript
    Rm {
        /// History id to remove
        id: String,
    },

    /// Remove every entry
    Clear,
}

/// Resolved configuration for the history commands.
#[derive(Debug)]
pub struct Config {
    pub action: Option<Action>,
    pub store: StoreArgs,
}

impl TryFrom<Args> for Config {
    type Error = eyre::Error;

    fn try_from(args: Args) -> Result<Self> {
        Ok(Self {
            action: args.action,
            store: args.store,
        })
    }
}

pub fn execute(config: Config) -> Result<()> {
    let store = config.store.open()?;

    match config.action {
        None => list(&store),
        Some(Action::Rm { id }) => remove(&store, &id),
        Some(Action::Clear) => {
            store.clear()?;
            println!("History cleared");
            Ok(())
        }
    }
}

fn list(store: &HistoryStore) -> Result<()> {
    let records = store.list();

    if records.is_empty() {
        println!("No recent transcriptions");
        return Ok(());
    }

    for meta in records {
        println!("{}  {}  {:>6}  {}", meta.id, meta.date, meta.duration, meta.name);
    }

    Ok(())
}

fn remove(store: &HistoryStore, id: &str) -> Result<()> {
    match store.remove(id)? {
        Some(meta) => {
            println!("Removed {} ({})", meta.id, meta.name);
            Ok(())
        }
        None => Err(eyre!("no history entry with id {id}"))
            .suggestion("run `scriba history` to list stored ids"),
    }
}
