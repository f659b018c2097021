//! scriba-core: transcript model, normalizer, exporter, and history store.
//!
//! This crate holds everything that computes over an already-fetched
//! transcript; nothing here talks to the network.
//!
//! # Architecture
//!
//! - [`types`]: the [`types::Transcript`] wire model and its segment feeds
//! - [`normalize`]: merges timed segments into speaker-turn blocks
//! - [`export`]: serializes a transcript to plain text, Markdown, SRT, or JSON
//! - [`store`]: file-backed history of recent transcriptions
//!
//! # Quick Start
//!
//! ```no_run
//! use scriba_core::export::{render, Format};
//! use scriba_core::normalize::group_speaker_blocks;
//! use scriba_core::types::Transcript;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let raw = std::fs::read_to_string("transcript.json")?;
//! let transcript: Transcript = serde_json::from_str(&raw)?;
//!
//! if let Some(feed) = transcript.display_feed() {
//!     for block in group_speaker_blocks(feed.segments) {
//!         println!("{:?}: {}", block.speaker, block.text);
//!     }
//! }
//!
//! let srt = render(&transcript, Format::Srt, "recording")?;
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod export;
pub mod normalize;
pub mod store;
pub mod types;
