//! Regroups timed segments into speaker-turn blocks for display.

use crate::types::{SpeakerBlock, TranscriptSegment};

/// Number of distinct speaker colors before palette slots repeat.
pub const PALETTE_SIZE: usize = 8;

/// Case-insensitive substring filter over segment text.
///
/// Applied *before* grouping, so narrowing the query also changes how the
/// surviving segments merge: dropping a non-matching segment in the middle
/// of a same-speaker run splits that run into two blocks.
pub fn filter_segments<'a>(
    segments: &'a [TranscriptSegment],
    query: &str,
) -> Vec<&'a TranscriptSegment> {
    let query = query.trim().to_lowercase();

    if query.is_empty() {
        return segments.iter().collect();
    }

    segments
        .iter()
        .filter(|segment| segment.text.to_lowercase().contains(&query))
        .collect()
}

/// Merge consecutive same-speaker segments into speaker blocks.
///
/// Single left-to-right pass: a block closes exactly where the speaker label
/// changes, merged text is space-joined, and `end` tracks the last merged
/// segment. Input order is preserved.
///
/// A feed without speaker labels (first segment carries none) is not merged
/// at all; every segment becomes its own speaker-less block.
pub fn group_speaker_blocks<'a, I>(segments: I) -> Vec<SpeakerBlock>
where
    I: IntoIterator<Item = &'a TranscriptSegment>,
{
    let mut segments = segments.into_iter().peekable();
    let diarized = segments.peek().is_some_and(|first| first.speaker.is_some());

    let mut blocks = Vec::new();
    let mut current: Option<SpeakerBlock> = None;

    for segment in segments {
        if !diarized {
            blocks.push(block_from(segment));
            continue;
        }

        match current.take() {
            Some(mut block) if block.speaker == segment.speaker => {
                block.end = segment.end;
                block.text.push(' ');
                block.text.push_str(&segment.text);
                current = Some(block);
            }
            closed => {
                blocks.extend(closed);
                current = Some(block_from(segment));
            }
        }
    }

    blocks.extend(current);
    blocks
}

/// Seed a block from a single segment.
fn block_from(segment: &TranscriptSegment) -> SpeakerBlock {
    SpeakerBlock {
        speaker: segment.speaker.clone(),
        start: segment.start,
        end: segment.end,
        text: segment.text.clone(),
    }
}

/// Palette slot for a speaker label.
///
/// The first run of ASCII digits in the label selects the slot, wrapped to
/// [`PALETTE_SIZE`]; labels without digits collapse to slot 0. The mapping is
/// stable: equal labels always land on the same slot.
pub fn palette_slot(speaker: &str) -> usize {
    let digits: String = speaker
        .chars()
        .skip_while(|c| !c.is_ascii_digit())
        .take_while(|c| c.is_ascii_digit())
        .collect();

    digits.parse::<usize>().unwrap_or(0) % PALETTE_SIZE
}

/// Wall-clock `HH:MM:SS` label for a seconds offset.
///
/// Invalid inputs (negative, NaN) render as `00:00:00`.
pub fn format_clock(seconds: f64) -> String {
    if !seconds.is_finite() || seconds < 0.0 {
        return "00:00:00".to_string();
    }

    let total = seconds as u64;
    format!("{:02}:{:02}:{:02}", total / 3600, (total % 3600) / 60, total % 60)
}
