//! View subcommand - render a stored transcript as speaker blocks.

use crate::cli::StoreArgs;
use color_eyre::Section;
use eyre::{Context, Result};
use scriba_core::normalize::{
    filter_segments, format_clock, group_speaker_blocks, palette_slot, PALETTE_SIZE,
};
use scriba_core::types::Transcript;
use std::io::IsTerminal;

/// ANSI foreground colors backing the speaker palette, indexed by
/// [`palette_slot`].
const PALETTE: [&str; PALETTE_SIZE] = [
    "\x1b[34m", // blue
    "\x1b[32m", // green
    "\x1b[35m", // magenta
    "\x1b[33m", // yellow
    "\x1b[95m", // bright magenta
    "\x1b[96m", // bright cyan
    "\x1b[36m", // cyan
    "\x1b[31m", // red
];

/// Color for blocks without a speaker label.
const NEUTRAL: &str = "\x1b[90m";

const RESET: &str = "\x1b[0m";

/// CLI arguments for viewing a stored transcript.
#[derive(clap::Args, Debug)]
pub struct Args {
    /// History id of the transcript
    pub id: String,

    /// Only show segments containing this text (case-insensitive)
    #[arg(short, long)]
    pub search: Option<String>,

    /// Print the raw transcript text instead of speaker blocks
    #[arg(long)]
    pub raw: bool,

    /// Disable colored output
    #[arg(long)]
    pub no_color: bool,

    #[command(flatten)]
    pub store: StoreArgs,
}

/// Resolved configuration for viewing.
#[derive(Debug)]
pub struct Config {
    pub id: String,
    pub search: Option<String>,
    pub raw: bool,
    pub color: bool,
    pub store: StoreArgs,
}

impl TryFrom<Args> for Config {
    type Error = eyre::Error;

    fn try_from(args: Args) -> Result<Self> {
        Ok(Self {
            id: args.id,
            search: args.search,
            raw: args.raw,
            color: !args.no_color && std::io::stdout().is_terminal(),
            store: args.store,
        })
    }
}

pub fn execute(config: Config) -> Result<()> {
    let store = config.store.open()?;

    let transcript = store
        .load(&config.id)
        .wrap_err_with(|| format!("failed to load transcript {}", config.id))
        .suggestion("run `scriba history` to list stored ids")?;

    if config.raw {
        println!("{}", transcript.text);
        return Ok(());
    }

    print!(
        "{}",
        render_blocks(&transcript, config.search.as_deref(), config.color)
    );

    Ok(())
}

/// Render speaker blocks (or the raw-text fallback) for the terminal.
pub fn render_blocks(transcript: &Transcript, search: Option<&str>, color: bool) -> String {
    let Some(feed) = transcript.display_feed() else {
        if transcript.text.is_empty() {
            return "No transcript available\n".to_string();
        }
        return format!("{}\n", transcript.text);
    };

    let visible = match search {
        Some(query) => filter_segments(feed.segments, query),
        None => feed.segments.iter().collect(),
    };

    if visible.is_empty() {
        return format!("No results found for \"{}\"\n", search.unwrap_or_default());
    }

    let unit = feed.kind.time_unit();
    let mut out = String::new();

    for block in group_speaker_blocks(visible) {
        let label = match &block.speaker {
            Some(speaker) => format!("Speaker {speaker}"),
            None => "Unknown Speaker".to_string(),
        };

        if color {
            let code = match &block.speaker {
                Some(speaker) => PALETTE[palette_slot(speaker)],
                None => NEUTRAL,
            };
            out.push_str(&format!("{code}{label}{RESET}"));
        } else {
            out.push_str(&label);
        }

        out.push_str(&format!(
            "  [{} - {}]\n",
            format_clock(unit.to_seconds(block.start)),
            format_clock(unit.to_seconds(block.end))
        ));

        out.push_str(&block.text);
        out.push_str("\n\n");
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use scriba_core::types::TranscriptSegment;

    fn segment(speaker: &str, start: f64, end: f64, text: &str) -> TranscriptSegment {
        TranscriptSegment {
            speaker: Some(speaker.to_string()),
            start,
            end,
            text: text.to_string(),
            ..Default::default()
        }
    }

    fn transcript() -> Transcript {
        Transcript {
            text: "hi there hello".to_string(),
            utterances: Some(vec![
                segment("A", 0.0, 2.0, "hi"),
                segment("A", 2.0, 4.0, "there"),
                segment("B", 4.0, 6.0, "hello"),
            ]),
            ..Default::default()
        }
    }

    #[test]
    fn renders_merged_speaker_blocks() {
        let out = render_blocks(&transcript(), None, false);

        assert!(out.contains("Speaker A  [00:00:00 - 00:00:04]\nhi there\n"));
        assert!(out.contains("Speaker B  [00:00:04 - 00:00:06]\nhello\n"));
    }

    #[test]
    fn word_feed_times_are_treated_as_millis() {
        let t = Transcript {
            words: Some(vec![segment("A", 0.0, 65500.0, "hallo")]),
            ..Default::default()
        };

        let out = render_blocks(&t, None, false);
        assert!(out.contains("[00:00:00 - 00:01:05]"));
    }

    #[test]
    fn falls_back_to_raw_text_without_segments() {
        let t = Transcript {
            text: "just text".to_string(),
            ..Default::default()
        };

        assert_eq!(render_blocks(&t, None, false), "just text\n");
    }

    #[test]
    fn empty_transcript_has_a_notice() {
        let out = render_blocks(&Transcript::default(), None, false);
        assert_eq!(out, "No transcript available\n");
    }

    #[test]
    fn search_filters_before_grouping() {
        let out = render_blocks(&transcript(), Some("hello"), false);

        assert!(out.contains("Speaker B"));
        assert!(!out.contains("Speaker A"));
    }

    #[test]
    fn fruitless_search_reports_no_results() {
        let out = render_blocks(&transcript(), Some("zzz"), false);
        assert_eq!(out, "No results found for \"zzz\"\n");
    }

    #[test]
    fn color_codes_wrap_speaker_labels() {
        let out = render_blocks(&transcript(), None, true);
        assert!(out.contains(&format!("{}Speaker A{}", PALETTE[0], RESET)));
    }
}
