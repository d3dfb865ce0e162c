//! Scenery fallback.
//!
//! The final trim can legitimately squeeze every scenic view out of the
//! reel, which leaves a walk full of beautiful footage looking like a
//! string of close-ups. When the source annotations had at least one
//! qualifying scenery moment and none survived, the single best one is
//! re-inserted, provided the reel stays under the hard ceiling.

use std::cmp::Ordering;
use tracing::{debug, info};
use wreel_models::{Segment, SceneryMoment, TimeSpan, WalkAnnotations};

use crate::config::CuratorConfig;
use crate::merge::merge_segments;
use crate::trim::total_duration_secs;

/// Re-insert one scenery segment when the trim removed them all.
///
/// Best means: near a companion occurrence first, then longest dwell,
/// then earliest. Nearness is judged against occurrence timestamps in
/// the annotations rather than surviving segments, since the companion
/// footage itself may not have survived the trim.
pub fn restore_scenery_coverage(
    segments: Vec<Segment>,
    annotations: &WalkAnnotations,
    config: &CuratorConfig,
) -> Vec<Segment> {
    let duration = annotations.duration_secs;

    let occurrence_instants: Vec<f64> = annotations
        .companions
        .iter()
        .flat_map(|c| c.occurrences.iter())
        .filter_map(|o| o.time_secs(duration))
        .collect();

    let mut qualifying: Vec<(&SceneryMoment, f64, bool)> = Vec::new();
    for moment in &annotations.sceneries {
        if moment.dwell_secs < config.scenery_min_dwell_secs {
            continue;
        }
        let Some(t) = moment.time_secs(duration) else {
            continue;
        };
        let near = occurrence_instants
            .iter()
            .any(|&ot| (t - ot).abs() <= config.near_companion_radius_secs);
        qualifying.push((moment, t, near));
    }

    if qualifying.is_empty() {
        return segments;
    }
    let any_covered = qualifying
        .iter()
        .any(|(_, t, _)| segments.iter().any(|s| s.span.contains_closed(*t)));
    if any_covered {
        return segments;
    }

    qualifying.sort_by(|a, b| {
        b.2.cmp(&a.2)
            .then(
                b.0.dwell_secs
                    .partial_cmp(&a.0.dwell_secs)
                    .unwrap_or(Ordering::Equal),
            )
            .then(a.1.partial_cmp(&b.1).unwrap_or(Ordering::Equal))
    });
    let (moment, t, near) = qualifying[0];

    let span = TimeSpan::clamped(
        t - config.scenery_pre_roll_secs,
        t + moment.dwell_secs.min(config.scenery_max_clip_secs),
        duration,
    );
    let insert = Segment::scenery(span)
        .with_high_quality(moment.high_quality)
        .with_near_companion(near);

    let mut widened = segments.clone();
    widened.push(insert);
    let widened = merge_segments(widened, config.merge_tolerance_secs);
    let total = total_duration_secs(&widened);
    if total <= config.ceiling_secs {
        info!(
            at_secs = format!("{:.1}", t),
            total_secs = format!("{:.1}", total),
            "Restored one scenery segment after trim"
        );
        widened
    } else {
        debug!(
            total_secs = format!("{:.1}", total),
            "Scenery restore would breach the ceiling, skipped"
        );
        segments
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wreel_models::{Companion, Occurrence, WalkId};

    fn config() -> CuratorConfig {
        CuratorConfig::default()
    }

    fn annotations(duration_secs: f64) -> WalkAnnotations {
        WalkAnnotations::new(WalkId::from_string("walk-fallback"), duration_secs)
    }

    fn ai(start: f64, end: f64) -> Segment {
        Segment::ai_scored(TimeSpan::new(start, end), Some(20.0))
    }

    #[test]
    fn test_no_qualifying_scenery_leaves_reel_alone() {
        let mut annotations = annotations(600.0);
        annotations.sceneries.push(SceneryMoment::new("1:00", 2.0));
        let segments = vec![ai(0.0, 30.0)];
        let restored = restore_scenery_coverage(segments.clone(), &annotations, &config());
        assert_eq!(restored.len(), 1);
    }

    #[test]
    fn test_surviving_scenery_coverage_blocks_restore() {
        let mut annotations = annotations(600.0);
        annotations.sceneries.push(SceneryMoment::new("0:10", 4.0));
        annotations.sceneries.push(SceneryMoment::new("5:00", 6.0));
        // The moment at t=10 sits inside kept footage; that counts as
        // scenery coverage even though the other moment was lost.
        let segments = vec![ai(0.0, 30.0)];
        let restored = restore_scenery_coverage(segments.clone(), &annotations, &config());
        assert_eq!(restored.len(), 1);
    }

    #[test]
    fn test_best_moment_restored_when_all_lost() {
        let mut annotations = annotations(600.0);
        annotations.sceneries.push(SceneryMoment::new("4:00", 4.0));
        annotations.sceneries.push(SceneryMoment::new("5:00", 6.0));
        let segments = vec![ai(0.0, 60.0)];
        let restored = restore_scenery_coverage(segments, &annotations, &config());
        assert_eq!(restored.len(), 2);
        // Longer dwell wins; clip is capped at the scenery maximum.
        assert_eq!(restored[1].span, TimeSpan::new(298.0, 305.0));
    }

    #[test]
    fn test_near_companion_moment_beats_longer_dwell() {
        let mut annotations = annotations(600.0);
        annotations.companions.push(Companion::new(
            "Biscuit",
            vec![Occurrence::new("4:05", 4.0)],
        ));
        annotations.sceneries.push(SceneryMoment::new("4:00", 4.0));
        annotations.sceneries.push(SceneryMoment::new("8:00", 6.0));
        let segments = vec![ai(0.0, 60.0)];
        let restored = restore_scenery_coverage(segments, &annotations, &config());
        assert_eq!(restored.len(), 2);
        assert_eq!(restored[1].span.start_secs, 238.0);
        assert!(restored[1].near_companion);
    }

    #[test]
    fn test_restore_skipped_at_the_ceiling() {
        let mut annotations = annotations(600.0);
        annotations.sceneries.push(SceneryMoment::new("8:00", 6.0));
        // 122s already in the reel; a 7s insert would land at 129.
        let segments = vec![ai(0.0, 122.0)];
        let restored = restore_scenery_coverage(segments.clone(), &annotations, &config());
        assert_eq!(restored.len(), 1);
        assert_eq!(total_duration_secs(&restored), 122.0);
    }

    #[test]
    fn test_restored_segment_merges_with_adjacent_footage() {
        let mut annotations = annotations(600.0);
        annotations.sceneries.push(SceneryMoment::new("1:03", 4.0));
        // Kept footage ends at 60; the insert spans [61, 67] and fuses.
        let segments = vec![ai(0.0, 60.0)];
        let restored = restore_scenery_coverage(segments, &annotations, &config());
        assert_eq!(restored.len(), 1);
        assert_eq!(restored[0].span, TimeSpan::new(0.0, 67.0));
    }
}
