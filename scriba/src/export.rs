//! Export subcommand - write a stored transcript in a chosen format.

use crate::cli::StoreArgs;
use clap::ArgGroup;
use color_eyre::Section;
use eyre::{Context, Result};
use scriba_core::export::{base_file_name, render, Format};
use scriba_core::types::Transcript;
use std::path::{Path, PathBuf};

/// CLI arguments for exporting.
#[derive(clap::Args, Debug)]
#[command(group(ArgGroup::new("source").required(true).args(["id", "input"])))]
pub struct Args {
    /// History id of the transcript to export
    pub id: Option<String>,

    /// Raw transcript JSON file to export instead of a history entry
    #[arg(long, value_name = "FILE")]
    pub input: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum)]
    pub format: Format,

    /// Output path (default: {name}.{ext} in the current directory)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    #[command(flatten)]
    pub store: StoreArgs,
}

/// Where the transcript to export comes from.
#[derive(Debug)]
pub enum Source {
    History(String),
    File(PathBuf),
}

/// Resolved configuration for exporting.
#[derive(Debug)]
pub struct Config {
    pub source: Source,
    pub format: Format,
    pub output: Option<PathBuf>,
    pub store: StoreArgs,
}

impl TryFrom<Args> for Config {
    type Error = eyre::Error;

    fn try_from(args: Args) -> Result<Self> {
        // clap's ArgGroup guarantees exactly one of the two is present.
        let source = match (args.id, args.input) {
            (Some(id), None) => Source::History(id),
            (None, Some(path)) => Source::File(path),
            _ => unreachable!("source group is required and exclusive"),
        };

        Ok(Self {
            source,
            format: args.format,
            output: args.output,
            store: args.store,
        })
    }
}

pub fn execute(config: Config) -> Result<()> {
    let (transcript, name) = load_source(&config)?;

    let base = base_file_name(&name);

    let content = render(&transcript, config.format, base)
        .wrap_err_with(|| format!("failed to render {:?} export", config.format))?;

    let output = config
        .output
        .unwrap_or_else(|| PathBuf::from(format!("{base}.{}", config.format.extension())));

    std::fs::write(&output, content)
        .wrap_err_with(|| format!("failed to write export: {:?}", output.display()))?;

    tracing::info!(
        path = ?output.display(),
        mime = config.format.mime_type(),
        "export written"
    );

    Ok(())
}

/// Load the transcript plus the name its export derives from.
fn load_source(config: &Config) -> Result<(Transcript, String)> {
    match &config.source {
        Source::History(id) => {
            let store = config.store.open()?;

            // The stored upload name drives the export file name; fall back
            // to the id when the index entry is gone.
            let name = store
                .list()
                .into_iter()
                .find(|meta| &meta.id == id)
                .map(|meta| meta.name)
                .unwrap_or_else(|| id.clone());

            let transcript = store
                .load(id)
                .wrap_err_with(|| format!("failed to load transcript {id}"))
                .suggestion("run `scriba history` to list stored ids")?;

            Ok((transcript, name))
        }
        Source::File(path) => {
            let raw = std::fs::read_to_string(path)
                .wrap_err_with(|| format!("failed to read transcript: {:?}", path.display()))?;

            let transcript = serde_json::from_str(&raw)
                .wrap_err_with(|| format!("not a valid transcript document: {:?}", path.display()))?;

            Ok((transcript, file_name(path)))
        }
    }
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default()
}
