//! Transcript serialization to plain text, Markdown, SRT, and JSON.
//!
//! Rendering is pure and deterministic: the same transcript and format
//! always produce byte-identical output. Callers write the result to disk
//! only after rendering succeeded, so a failed export leaves no partial
//! file behind.

use crate::error::ExportError;
use crate::types::{Transcript, TranscriptSegment};
use srtlib::{Subtitle, Timestamp};

/// Cue span used when a transcript has no segments: a single subtitle over
/// a fixed five-minute window.
const FALLBACK_CUE_END_MS: u32 = 300_000;

/// Base name used when the upload file name yields no usable stem.
const DEFAULT_BASE_NAME: &str = "transcript";

/// Output formats supported by the exporter.
#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum Format {
    /// Raw transcript text
    Txt,
    /// Markdown with per-segment headings
    Md,
    /// SRT subtitles
    Srt,
    /// Full transcript document
    Json,
}

impl Format {
    /// File extension for this format.
    pub fn extension(self) -> &'static str {
        match self {
            Format::Txt => "txt",
            Format::Md => "md",
            Format::Srt => "srt",
            Format::Json => "json",
        }
    }

    /// MIME type of the rendered payload.
    pub fn mime_type(self) -> &'static str {
        match self {
            Format::Txt | Format::Srt => "text/plain",
            Format::Md => "text/markdown",
            Format::Json => "application/json",
        }
    }
}

/// File name stem for exports: the upload name truncated at the first dot
/// (`meeting.notes.mp3` becomes `meeting`). Names without a usable stem
/// fall back to `transcript`.
pub fn base_file_name(file_name: &str) -> &str {
    match file_name.split('.').next() {
        Some(stem) if !stem.is_empty() => stem,
        _ => DEFAULT_BASE_NAME,
    }
}

/// Render a transcript in the requested format.
///
/// `base_name` only affects the Markdown header; pass the stem from
/// [`base_file_name`].
pub fn render(
    transcript: &Transcript,
    format: Format,
    base_name: &str,
) -> Result<String, ExportError> {
    match format {
        Format::Txt => Ok(transcript.text.clone()),
        Format::Md => Ok(to_markdown(transcript, base_name)),
        Format::Srt => Ok(to_srt(transcript)),
        Format::Json => Ok(serde_json::to_string_pretty(transcript)?),
    }
}

/// Markdown rendition: one `##` heading per segment with a `[MM:SS]`
/// timecode and an optional bold speaker prefix. Falls back to the raw
/// text when the transcript has no exportable segments.
fn to_markdown(transcript: &Transcript, base_name: &str) -> String {
    let mut out = format!("# Transcript: {base_name}\n\n");

    match transcript.export_feed() {
        Some(segments) => {
            for segment in segments {
                out.push_str(&format!("## [{}]\n", markdown_timecode(segment.start)));
                if let Some(speaker) = segment.speaker_label() {
                    out.push_str(&format!("**Speaker {speaker}**: "));
                }
                out.push_str(&segment.text);
                out.push_str("\n\n");
            }
        }
        None => out.push_str(&transcript.text),
    }

    out
}

/// `MM:SS` timecode from a seconds offset, both parts floor-divided and
/// zero-padded to two digits.
fn markdown_timecode(seconds: f64) -> String {
    format!(
        "{:02}:{:02}",
        (seconds / 60.0).floor() as u64,
        (seconds % 60.0).floor() as u64
    )
}

/// SRT rendition: one numbered cue per segment with an optional
/// `Speaker {id}: ` prefix. A transcript without exportable segments emits
/// a single cue over the fixed fallback window containing the raw text.
fn to_srt(transcript: &Transcript) -> String {
    let subtitles = match transcript.export_feed() {
        Some(segments) => segments
            .iter()
            .zip(1..)
            .map(|(segment, index)| create_subtitle(segment, index))
            .collect(),
        None => vec![Subtitle::new(
            1,
            Timestamp::from_milliseconds(0),
            Timestamp::from_milliseconds(FALLBACK_CUE_END_MS),
            transcript.text.clone(),
        )],
    };

    display_subtitles(&subtitles)
}

/// Create a subtitle cue from a segment.
fn create_subtitle(segment: &TranscriptSegment, index: usize) -> Subtitle {
    let text = match segment.speaker_label() {
        Some(speaker) => format!("Speaker {speaker}: {}", segment.text),
        None => segment.text.clone(),
    };

    Subtitle::new(
        index,
        secs_to_timestamp(segment.start),
        secs_to_timestamp(segment.end),
        text,
    )
}

/// Convert seconds to an SRT timestamp.
fn secs_to_timestamp(secs: f64) -> Timestamp {
    Timestamp::from_milliseconds((secs * 1000.0) as u32)
}

/// Format subtitles as SRT file content.
fn display_subtitles(subtitles: &[Subtitle]) -> String {
    let mut out = subtitles
        .iter()
        .map(|s| s.to_string())
        .collect::<Vec<_>>()
        .join("\n\n");
    out.push('\n');
    out
}
