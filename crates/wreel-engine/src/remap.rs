//! Reel-time mapping.
//!
//! Once the cut list is final, every annotation timestamp is translated
//! from the original walk clock onto the reel clock so the player can
//! seek straight to it. An instant that was cut has no reel time; the
//! item keeps its original text and is flagged as not in the reel.
//!
//! Rewriting is idempotent: the first pass stores the pre-rewrite text
//! in the item's `original_*` sibling, and any item already carrying
//! that marker is left alone. Historical data that was partially
//! processed can be run through the pipeline again safely.

use tracing::debug;
use wreel_models::{
    format_seconds, parse_clamped, HighlightReel, MoodSample, TimelineItem, WalkAnnotations,
};

/// Translate an original-clock instant onto the reel clock.
///
/// Scans the sorted, disjoint segment list accumulating a running reel
/// offset; the first segment containing the instant wins. Spans are
/// start-inclusive and end-exclusive here, so an instant sitting exactly
/// on a cut boundary counts as cut.
pub fn reel_time(original_secs: f64, reel: &HighlightReel) -> Option<f64> {
    let mut offset = 0.0_f64;
    for segment in &reel.segments {
        if segment.span.contains(original_secs) {
            return Some(offset + (original_secs - segment.span.start_secs));
        }
        offset += segment.duration_secs();
    }
    None
}

/// Rewrite one timestamp field in place.
///
/// No-op when the mapped marker is already present or the text does not
/// parse. On success the original text moves into the sibling field and
/// the primary field holds the reel-clock time; a cut instant keeps its
/// original text with `in_reel` false.
fn rewrite_instant(
    time: &mut String,
    original: &mut Option<String>,
    in_reel: &mut bool,
    duration_secs: f64,
    reel: &HighlightReel,
) {
    if original.is_some() {
        return;
    }
    let Some(secs) = parse_clamped(time, duration_secs) else {
        return;
    };
    *original = Some(time.clone());
    match reel_time(secs, reel) {
        Some(mapped) => {
            *time = format_seconds(mapped);
            *in_reel = true;
        }
        None => {
            *in_reel = false;
        }
    }
}

/// Rewrite every annotation timestamp onto the reel clock.
///
/// Candidate intervals need both endpoints inside the reel to count as
/// surviving; everything else is a single instant.
pub fn rewrite_annotations(annotations: &mut WalkAnnotations, reel: &HighlightReel) {
    let duration = annotations.duration_secs;

    for candidate in &mut annotations.candidates {
        if candidate.is_mapped() {
            continue;
        }
        let (Some(start), Some(end)) = (
            parse_clamped(&candidate.start, duration),
            parse_clamped(&candidate.end, duration),
        ) else {
            continue;
        };
        candidate.original_start = Some(candidate.start.clone());
        candidate.original_end = Some(candidate.end.clone());
        match (reel_time(start, reel), reel_time(end, reel)) {
            (Some(mapped_start), Some(mapped_end)) => {
                candidate.start = format_seconds(mapped_start);
                candidate.end = format_seconds(mapped_end);
                candidate.in_reel = true;
            }
            _ => {
                candidate.in_reel = false;
            }
        }
    }

    for companion in &mut annotations.companions {
        for occurrence in &mut companion.occurrences {
            rewrite_instant(
                &mut occurrence.time,
                &mut occurrence.original_time,
                &mut occurrence.in_reel,
                duration,
                reel,
            );
        }
    }
    for moment in &mut annotations.sceneries {
        rewrite_instant(
            &mut moment.timestamp,
            &mut moment.original_timestamp,
            &mut moment.in_reel,
            duration,
            reel,
        );
    }
    for event in &mut annotations.feedings {
        rewrite_instant(
            &mut event.timestamp,
            &mut event.original_timestamp,
            &mut event.in_reel,
            duration,
            reel,
        );
    }
    for alert in &mut annotations.alerts {
        rewrite_instant(
            &mut alert.timestamp,
            &mut alert.original_timestamp,
            &mut alert.in_reel,
            duration,
            reel,
        );
    }
    for point in &mut annotations.mood {
        rewrite_instant(
            &mut point.time,
            &mut point.original_time,
            &mut point.in_reel,
            duration,
            reel,
        );
    }
    for entry in &mut annotations.timeline {
        rewrite_instant(
            &mut entry.time,
            &mut entry.original_time,
            &mut entry.in_reel,
            duration,
            reel,
        );
    }

    debug!(
        walk_id = %annotations.walk_id,
        "Rewrote annotation timestamps onto the reel clock"
    );
}

/// Reel-clock copy of the normalized mood grid.
///
/// Samples whose instant was cut are dropped; survivors carry reel time.
pub fn filter_mood(samples: &[MoodSample], reel: &HighlightReel) -> Vec<MoodSample> {
    samples
        .iter()
        .filter_map(|sample| {
            reel_time(sample.time_secs, reel)
                .map(|mapped| MoodSample::new(mapped, sample.value))
        })
        .collect()
}

/// Reel-clock copy of the normalized activity timeline.
pub fn filter_timeline(items: &[TimelineItem], reel: &HighlightReel) -> Vec<TimelineItem> {
    items
        .iter()
        .filter_map(|item| {
            reel_time(item.time_secs, reel).map(|mapped| TimelineItem {
                time_secs: mapped,
                ..item.clone()
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use wreel_models::{
        CandidateInterval, Companion, MoodPoint, Occurrence, Segment, TimeSpan, WalkId,
    };

    fn reel() -> HighlightReel {
        HighlightReel::from_segments(vec![
            Segment::ai_scored(TimeSpan::new(0.0, 10.0), Some(12.0)),
            Segment::companion(TimeSpan::new(57.0, 64.0), "Biscuit"),
        ])
    }

    #[test]
    fn test_reel_time_inside_first_segment() {
        assert_eq!(reel_time(4.0, &reel()), Some(4.0));
    }

    #[test]
    fn test_reel_time_accumulates_offset() {
        // 10s of reel before the second segment; 62s sits 5s into it.
        assert_eq!(reel_time(62.0, &reel()), Some(15.0));
    }

    #[test]
    fn test_reel_time_absent_in_gaps_and_past_the_end() {
        assert_eq!(reel_time(30.0, &reel()), None);
        assert_eq!(reel_time(80.0, &reel()), None);
    }

    #[test]
    fn test_reel_time_boundaries() {
        let reel = reel();
        assert_eq!(reel_time(0.0, &reel), Some(0.0));
        assert_eq!(reel_time(57.0, &reel), Some(10.0));
        // End boundaries are exclusive; the instant was cut.
        assert_eq!(reel_time(10.0, &reel), None);
    }

    #[test]
    fn test_monotonic_over_surviving_instants() {
        let reel = reel();
        let mapped: Vec<f64> = (0..90)
            .filter_map(|t| reel_time(t as f64, &reel))
            .collect();
        for pair in mapped.windows(2) {
            assert!(pair[0] <= pair[1]);
        }
    }

    fn annotations() -> WalkAnnotations {
        let mut annotations = WalkAnnotations::new(WalkId::from_string("walk-remap"), 90.0);
        annotations
            .candidates
            .push(CandidateInterval::new("0:00", "0:09").with_score(12.0));
        annotations.companions.push(Companion::new(
            "Biscuit",
            vec![Occurrence::new("1:02", 4.0), Occurrence::new("0:30", 2.0)],
        ));
        annotations.mood.push(MoodPoint::new("1:00", 75.0));
        annotations
    }

    #[test]
    fn test_rewrite_moves_original_into_sibling() {
        let mut annotations = annotations();
        rewrite_annotations(&mut annotations, &reel());

        let candidate = &annotations.candidates[0];
        assert_eq!(candidate.original_start.as_deref(), Some("0:00"));
        assert_eq!(candidate.original_end.as_deref(), Some("0:09"));
        assert!(candidate.in_reel);

        let sighted = &annotations.companions[0].occurrences[0];
        assert_eq!(sighted.original_time.as_deref(), Some("1:02"));
        assert_eq!(sighted.time, "0:15");
        assert!(sighted.in_reel);
    }

    #[test]
    fn test_rewrite_flags_cut_instants() {
        let mut annotations = annotations();
        rewrite_annotations(&mut annotations, &reel());

        let cut = &annotations.companions[0].occurrences[1];
        assert!(!cut.in_reel);
        // Cut instants keep their original text.
        assert_eq!(cut.time, "0:30");
        assert_eq!(cut.original_time.as_deref(), Some("0:30"));
    }

    #[test]
    fn test_rewrite_candidate_requires_both_endpoints() {
        let mut annotations = annotations();
        // Start survives but the end falls in cut footage.
        annotations.candidates[0].end = "0:30".to_string();
        rewrite_annotations(&mut annotations, &reel());
        let candidate = &annotations.candidates[0];
        assert!(!candidate.in_reel);
        assert_eq!(candidate.start, "0:00");
        assert_eq!(candidate.end, "0:30");
        assert!(candidate.is_mapped());
    }

    #[test]
    fn test_rewrite_is_idempotent() {
        let mut annotations = annotations();
        rewrite_annotations(&mut annotations, &reel());
        let after_first = serde_json::to_string(&annotations).unwrap();
        rewrite_annotations(&mut annotations, &reel());
        let after_second = serde_json::to_string(&annotations).unwrap();
        assert_eq!(after_first, after_second);
    }

    #[test]
    fn test_rewrite_skips_malformed_timestamps() {
        let mut annotations = annotations();
        annotations.mood.push(MoodPoint::new("??", 40.0));
        rewrite_annotations(&mut annotations, &reel());
        let broken = &annotations.mood[1];
        assert_eq!(broken.time, "??");
        assert!(broken.original_time.is_none());
        assert!(!broken.in_reel);
    }

    #[test]
    fn test_filter_mood_keeps_and_remaps_survivors() {
        let samples = vec![
            MoodSample::new(5.0, 60),
            MoodSample::new(30.0, 40),
            MoodSample::new(60.0, 80),
        ];
        let filtered = filter_mood(&samples, &reel());
        assert_eq!(filtered.len(), 2);
        assert_eq!(filtered[0], MoodSample::new(5.0, 60));
        assert_eq!(filtered[1], MoodSample::new(13.0, 80));
    }

    #[test]
    fn test_filter_timeline_drops_cut_items() {
        let items = vec![
            TimelineItem::observed(2.0, "Leaving home", "paw"),
            TimelineItem::observed(40.0, "Crossing the park", "run"),
        ];
        let filtered = filter_timeline(&items, &reel());
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].time_secs, 2.0);
        assert_eq!(filtered[0].label, "Leaving home");
    }
}
