//! Segment merging.
//!
//! Collapses a segment list into a chronologically sorted,
//! pairwise-disjoint one. Two segments fuse when the later one starts
//! within the adjacency tolerance of the earlier one's end; a hard cut
//! between clips less than a couple of seconds apart reads as a stutter,
//! so near-adjacent footage is kept continuous instead.

use std::cmp::Ordering;
use tracing::debug;
use wreel_models::Segment;

/// Merge overlapping and near-adjacent segments.
///
/// Input order does not matter; output is sorted by start time and
/// pairwise-disjoint. Field resolution on fuse follows
/// [`Segment::absorb`]: union span, higher-rank tag (companion plus
/// scenery fuse into the combined tag), max score, OR'd flags.
pub fn merge_segments(mut segments: Vec<Segment>, tolerance_secs: f64) -> Vec<Segment> {
    if segments.len() <= 1 {
        return segments;
    }

    segments.sort_by(compare_chronological);

    let before = segments.len();
    let mut merged: Vec<Segment> = Vec::with_capacity(segments.len());
    for segment in segments {
        match merged.last_mut() {
            Some(last) if segment.span.start_secs <= last.span.end_secs + tolerance_secs => {
                last.absorb(&segment);
            }
            _ => merged.push(segment),
        }
    }

    if merged.len() < before {
        debug!(
            before = before,
            after = merged.len(),
            tolerance_secs = tolerance_secs,
            "Merged adjacent segments"
        );
    }
    merged
}

/// Stable chronological order: by start, then by end.
pub(crate) fn compare_chronological(a: &Segment, b: &Segment) -> Ordering {
    a.span
        .start_secs
        .partial_cmp(&b.span.start_secs)
        .unwrap_or(Ordering::Equal)
        .then(
            a.span
                .end_secs
                .partial_cmp(&b.span.end_secs)
                .unwrap_or(Ordering::Equal),
        )
}
