//! Core transcript types.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Text segment with timestamps.
///
/// One timed span of transcribed text, possibly tagged with a speaker label.
/// `start`/`end` units follow the feed the segment came from: seconds for
/// `utterances` and `segments`, milliseconds for `words` (see
/// [`FeedKind::time_unit`]).
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct TranscriptSegment {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    /// Transcribed text
    #[serde(default)]
    pub text: String,

    /// Start offset in the feed's time unit
    #[serde(default)]
    pub start: f64,

    /// End offset in the feed's time unit
    #[serde(default)]
    pub end: f64,

    /// Diarization label, absent when the feed is not diarized
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub speaker: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f64>,

    /// Wire fields this crate does not interpret (utterance-level `words`,
    /// channel info, ...), preserved so JSON export stays lossless.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl TranscriptSegment {
    /// Speaker label, with empty strings treated as absent.
    pub fn speaker_label(&self) -> Option<&str> {
        self.speaker.as_deref().filter(|label| !label.is_empty())
    }
}

/// Full result of a transcription job: raw text plus zero or more segment
/// arrays. At most one segment array is authoritative at a time; see
/// [`Transcript::display_feed`] and [`Transcript::export_feed`] for the
/// fixed selection precedence.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Transcript {
    /// Job id assigned by the service
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    /// Complete transcript text
    #[serde(default)]
    pub text: String,

    /// Diarized speaker turns, seconds-based
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub utterances: Option<Vec<TranscriptSegment>>,

    /// Word-level timings, milliseconds-based
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub words: Option<Vec<TranscriptSegment>>,

    /// Plain timed segments, seconds-based
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub segments: Option<Vec<TranscriptSegment>>,

    /// Audio length in seconds, as reported by the service
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub audio_duration: Option<f64>,

    /// Remaining wire fields, carried verbatim for lossless JSON export
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Which segment array of a [`Transcript`] is authoritative.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FeedKind {
    Utterances,
    Words,
    Segments,
}

impl FeedKind {
    /// Unit of the `start`/`end` offsets carried by this feed. The units are
    /// the transcription service's contract, not negotiable here.
    pub fn time_unit(self) -> TimeUnit {
        match self {
            FeedKind::Words => TimeUnit::Millis,
            FeedKind::Utterances | FeedKind::Segments => TimeUnit::Seconds,
        }
    }
}

/// Time unit of a segment feed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TimeUnit {
    Seconds,
    Millis,
}

impl TimeUnit {
    /// Convert an offset in this unit to seconds.
    pub fn to_seconds(self, value: f64) -> f64 {
        match self {
            TimeUnit::Seconds => value,
            TimeUnit::Millis => value / 1000.0,
        }
    }
}

/// An authoritative segment array together with its [`FeedKind`].
#[derive(Clone, Copy, Debug)]
pub struct SegmentFeed<'a> {
    pub kind: FeedKind,
    pub segments: &'a [TranscriptSegment],
}

impl Transcript {
    /// Segment feed used for on-screen rendering: `utterances` if non-empty,
    /// else `words`, else `segments`. `None` means the caller falls back to
    /// the raw [`text`](Transcript::text).
    pub fn display_feed(&self) -> Option<SegmentFeed<'_>> {
        if let Some(segments) = non_empty(&self.utterances) {
            Some(SegmentFeed { kind: FeedKind::Utterances, segments })
        } else if let Some(segments) = non_empty(&self.words) {
            Some(SegmentFeed { kind: FeedKind::Words, segments })
        } else if let Some(segments) = non_empty(&self.segments) {
            Some(SegmentFeed { kind: FeedKind::Segments, segments })
        } else {
            None
        }
    }

    /// Segment feed used by the exporters: `utterances` if non-empty, else
    /// `segments`. Word-level timings are never exported as cues, so there
    /// is deliberately no `words` fallback here.
    pub fn export_feed(&self) -> Option<&[TranscriptSegment]> {
        non_empty(&self.utterances).or_else(|| non_empty(&self.segments))
    }
}

fn non_empty(feed: &Option<Vec<TranscriptSegment>>) -> Option<&[TranscriptSegment]> {
    feed.as_deref().filter(|segments| !segments.is_empty())
}

/// One contiguous run of same-speaker segments merged for display.
///
/// Derived and ephemeral; never persisted. `start`/`end` stay in the unit of
/// the feed the blocks were built from.
#[derive(Clone, Debug, PartialEq)]
pub struct SpeakerBlock {
    pub speaker: Option<String>,
    pub start: f64,
    pub end: f64,
    pub text: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn segment(text: &str) -> TranscriptSegment {
        TranscriptSegment {
            text: text.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn display_feed_prefers_utterances() {
        let transcript = Transcript {
            utterances: Some(vec![segment("u")]),
            words: Some(vec![segment("w")]),
            segments: Some(vec![segment("s")]),
            ..Default::default()
        };

        let feed = transcript.display_feed().unwrap();
        assert_eq!(feed.kind, FeedKind::Utterances);
        assert_eq!(feed.segments[0].text, "u");
    }

    #[test]
    fn display_feed_skips_empty_arrays() {
        let transcript = Transcript {
            utterances: Some(vec![]),
            words: Some(vec![segment("w")]),
            ..Default::default()
        };

        let feed = transcript.display_feed().unwrap();
        assert_eq!(feed.kind, FeedKind::Words);
        assert_eq!(feed.kind.time_unit(), TimeUnit::Millis);
    }

    #[test]
    fn display_feed_none_without_segments() {
        let transcript = Transcript {
            text: "just text".to_string(),
            ..Default::default()
        };

        assert!(transcript.display_feed().is_none());
    }

    #[test]
    fn export_feed_never_uses_words() {
        let transcript = Transcript {
            words: Some(vec![segment("w")]),
            ..Default::default()
        };

        assert!(transcript.export_feed().is_none());
    }

    #[test]
    fn export_feed_falls_back_to_segments() {
        let transcript = Transcript {
            utterances: Some(vec![]),
            segments: Some(vec![segment("s")]),
            ..Default::default()
        };

        let feed = transcript.export_feed().unwrap();
        assert_eq!(feed[0].text, "s");
    }

    #[test]
    fn unknown_wire_fields_survive_round_trip() {
        let raw = r#"{
            "id": "t1",
            "text": "hello",
            "status": "completed",
            "language_code": "de",
            "utterances": [{"text": "hello", "start": 0.0, "end": 1.0, "words": []}]
        }"#;

        let transcript: Transcript = serde_json::from_str(raw).unwrap();
        assert_eq!(transcript.extra["status"], "completed");

        let serialized = serde_json::to_string(&transcript).unwrap();
        let reparsed: Transcript = serde_json::from_str(&serialized).unwrap();
        assert_eq!(transcript, reparsed);
    }

    #[test]
    fn empty_speaker_label_reads_as_absent() {
        let segment = TranscriptSegment {
            speaker: Some(String::new()),
            ..Default::default()
        };

        assert_eq!(segment.speaker_label(), None);
    }

    #[test]
    fn millis_convert_to_seconds() {
        assert_eq!(TimeUnit::Millis.to_seconds(1500.0), 1.5);
        assert_eq!(TimeUnit::Seconds.to_seconds(1.5), 1.5);
    }
}
