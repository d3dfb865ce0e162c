//! Event-class coverage.
//!
//! The provider's candidate intervals routinely miss moments the product
//! promises to show: a companion the dog keeps meeting, a scenic view, a
//! feeding stop, a safety incident. Each pass here walks one event class
//! and synthesizes a small segment around every event the reel does not
//! already contain. Pre-roll and clip lengths are class-specific so a
//! companion gets a beat of approach footage while an alert stays tight.
//!
//! The caller re-merges after each pass; synthesized segments that land
//! next to existing footage fuse instead of stuttering.

use tracing::debug;
use wreel_models::{
    Companion, FeedingEvent, SafetyAlert, SceneryMoment, Segment, SegmentSource, TimeSpan,
};

use crate::config::CuratorConfig;

/// Whether an instant is already inside some segment (edges count).
fn covered(segments: &[Segment], t: f64) -> bool {
    segments.iter().any(|s| s.span.contains_closed(t))
}

/// Whether a span sits within `radius` of any companion-flavored segment.
fn near_companion_footage(segments: &[Segment], span: &TimeSpan, radius_secs: f64) -> bool {
    segments
        .iter()
        .filter(|s| s.source.has_companion_flavor())
        .any(|s| span.gap_to(&s.span) <= radius_secs)
}

/// Guarantee footage of every companion occurrence.
///
/// Each uncovered occurrence gets a segment from `pre_roll` before the
/// sighting to `max(occurrence duration, min clip)` after it. Every
/// occurrence is considered individually; a companion seen five times can
/// contribute five segments (later trimming decides what survives).
pub fn ensure_companion_coverage(
    mut segments: Vec<Segment>,
    companions: &[Companion],
    duration_secs: f64,
    config: &CuratorConfig,
) -> Vec<Segment> {
    let mut added = 0;
    for companion in companions {
        for occurrence in &companion.occurrences {
            let Some(t) = occurrence.time_secs(duration_secs) else {
                continue;
            };
            if covered(&segments, t) {
                continue;
            }
            let clip = occurrence.duration_secs.max(config.companion_min_clip_secs);
            let span = TimeSpan::clamped(
                t - config.companion_pre_roll_secs,
                t + clip,
                duration_secs,
            );
            segments.push(Segment::companion(span, companion.name.clone()));
            added += 1;
        }
    }

    if added > 0 {
        debug!(added = added, "Synthesized companion coverage segments");
    }
    segments
}

/// Guarantee footage of every qualifying scenery moment.
///
/// A moment must have at least the minimum dwell to qualify. If the
/// moment already sits inside a companion-tagged segment, that segment is
/// upgraded in place to the combined tag; the scenery arrived for free
/// inside footage we were keeping anyway. Otherwise an uncovered moment
/// gets its own segment, flagged near-companion when it falls within the
/// configured radius of existing companion footage.
pub fn ensure_scenery_coverage(
    mut segments: Vec<Segment>,
    sceneries: &[SceneryMoment],
    duration_secs: f64,
    config: &CuratorConfig,
) -> Vec<Segment> {
    let mut added = 0;
    let mut upgraded = 0;
    for moment in sceneries {
        if moment.dwell_secs < config.scenery_min_dwell_secs {
            continue;
        }
        let Some(t) = moment.time_secs(duration_secs) else {
            continue;
        };

        if let Some(holder) = segments
            .iter_mut()
            .find(|s| s.span.contains_closed(t) && s.source == SegmentSource::Companion)
        {
            holder.source = SegmentSource::CompanionScenery;
            holder.high_quality |= moment.high_quality;
            upgraded += 1;
            continue;
        }
        if covered(&segments, t) {
            continue;
        }

        let clip = moment.dwell_secs.min(config.scenery_max_clip_secs);
        let span = TimeSpan::clamped(
            t - config.scenery_pre_roll_secs,
            t + clip,
            duration_secs,
        );
        let near = near_companion_footage(&segments, &span, config.near_companion_radius_secs);
        segments.push(
            Segment::scenery(span)
                .with_high_quality(moment.high_quality)
                .with_near_companion(near),
        );
        added += 1;
    }

    if added > 0 || upgraded > 0 {
        debug!(
            added = added,
            upgraded = upgraded,
            "Guaranteed scenery coverage"
        );
    }
    segments
}

/// Guarantee footage of every feeding event.
pub fn ensure_feeding_coverage(
    mut segments: Vec<Segment>,
    feedings: &[FeedingEvent],
    duration_secs: f64,
    config: &CuratorConfig,
) -> Vec<Segment> {
    let mut added = 0;
    for event in feedings {
        let Some(t) = event.time_secs(duration_secs) else {
            continue;
        };
        if covered(&segments, t) {
            continue;
        }
        let span = TimeSpan::clamped(
            t - config.feeding_pre_roll_secs,
            t + config.feeding_clip_secs,
            duration_secs,
        );
        segments.push(Segment::feeding(span));
        added += 1;
    }

    if added > 0 {
        debug!(added = added, "Synthesized feeding coverage segments");
    }
    segments
}

/// Guarantee footage of every safety alert.
///
/// Danger alerts get a slightly longer clip than warnings.
pub fn ensure_safety_coverage(
    mut segments: Vec<Segment>,
    alerts: &[SafetyAlert],
    duration_secs: f64,
    config: &CuratorConfig,
) -> Vec<Segment> {
    let mut added = 0;
    for alert in alerts {
        let Some(t) = alert.time_secs(duration_secs) else {
            continue;
        };
        if covered(&segments, t) {
            continue;
        }
        let clip = match alert.severity {
            wreel_models::AlertSeverity::Danger => config.danger_clip_secs,
            wreel_models::AlertSeverity::Warning => config.warning_clip_secs,
        };
        let span = TimeSpan::clamped(
            t - config.safety_pre_roll_secs,
            t + clip,
            duration_secs,
        );
        segments.push(Segment::safety(span));
        added += 1;
    }

    if added > 0 {
        debug!(added = added, "Synthesized safety coverage segments");
    }
    segments
}

#[cfg(test)]
mod tests {
    use super::*;
    use wreel_models::{AlertSeverity, Occurrence};

    fn config() -> CuratorConfig {
        CuratorConfig::default()
    }

    fn ai(start: f64, end: f64) -> Segment {
        Segment::ai_scored(TimeSpan::new(start, end), Some(10.0))
    }

    #[test]
    fn test_uncovered_occurrence_gets_pre_roll_and_clip() {
        let companions = vec![Companion::new("Biscuit", vec![Occurrence::new("1:00", 4.0)])];
        let segments =
            ensure_companion_coverage(vec![ai(0.0, 10.0)], &companions, 90.0, &config());
        assert_eq!(segments.len(), 2);
        assert_eq!(segments[1].span, TimeSpan::new(57.0, 64.0));
        assert_eq!(segments[1].companion.as_deref(), Some("Biscuit"));
    }

    #[test]
    fn test_short_occurrence_uses_minimum_clip() {
        let companions = vec![Companion::new("Biscuit", vec![Occurrence::new("1:00", 1.0)])];
        let segments = ensure_companion_coverage(vec![], &companions, 90.0, &config());
        assert_eq!(segments[0].span, TimeSpan::new(57.0, 63.0));
    }

    #[test]
    fn test_covered_occurrence_adds_nothing() {
        let companions = vec![Companion::new("Biscuit", vec![Occurrence::new("0:05", 4.0)])];
        let segments =
            ensure_companion_coverage(vec![ai(0.0, 10.0)], &companions, 90.0, &config());
        assert_eq!(segments.len(), 1);
    }

    #[test]
    fn test_second_occurrence_inside_first_synthesis_is_covered() {
        let companions = vec![Companion::new(
            "Biscuit",
            vec![Occurrence::new("1:00", 4.0), Occurrence::new("1:02", 2.0)],
        )];
        let segments = ensure_companion_coverage(vec![], &companions, 300.0, &config());
        assert_eq!(segments.len(), 1);
    }

    #[test]
    fn test_occurrence_near_walk_start_is_clamped() {
        let companions = vec![Companion::new("Biscuit", vec![Occurrence::new("0:01", 4.0)])];
        let segments = ensure_companion_coverage(vec![], &companions, 90.0, &config());
        assert_eq!(segments[0].span, TimeSpan::new(0.0, 5.0));
    }

    #[test]
    fn test_malformed_occurrence_time_is_skipped() {
        let companions = vec![Companion::new(
            "Biscuit",
            vec![Occurrence::new("not-a-time", 4.0), Occurrence::new("1:00", 4.0)],
        )];
        let segments = ensure_companion_coverage(vec![], &companions, 300.0, &config());
        assert_eq!(segments.len(), 1);
        assert_eq!(segments[0].span, TimeSpan::new(57.0, 64.0));
    }

    #[test]
    fn test_scenery_below_min_dwell_is_ignored() {
        let sceneries = vec![SceneryMoment::new("0:30", 2.0)];
        let segments = ensure_scenery_coverage(vec![], &sceneries, 90.0, &config());
        assert!(segments.is_empty());
    }

    #[test]
    fn test_scenery_inside_companion_segment_upgrades_tag() {
        let companion = Segment::companion(TimeSpan::new(25.0, 35.0), "Biscuit");
        let sceneries = vec![SceneryMoment::new("0:30", 4.0).with_high_quality(true)];
        let segments = ensure_scenery_coverage(vec![companion], &sceneries, 90.0, &config());
        assert_eq!(segments.len(), 1);
        assert_eq!(segments[0].source, SegmentSource::CompanionScenery);
        assert!(segments[0].high_quality);
    }

    #[test]
    fn test_scenery_inside_plain_segment_adds_nothing() {
        let sceneries = vec![SceneryMoment::new("0:05", 4.0)];
        let segments = ensure_scenery_coverage(vec![ai(0.0, 10.0)], &sceneries, 90.0, &config());
        assert_eq!(segments.len(), 1);
        assert_eq!(segments[0].source, SegmentSource::AiScored);
    }

    #[test]
    fn test_uncovered_scenery_synthesized_with_near_flag() {
        let companion = Segment::companion(TimeSpan::new(20.0, 27.0), "Biscuit");
        let sceneries = vec![SceneryMoment::new("0:33", 4.0)];
        let segments = ensure_scenery_coverage(vec![companion], &sceneries, 90.0, &config());
        assert_eq!(segments.len(), 2);
        assert_eq!(segments[1].span, TimeSpan::new(31.0, 37.0));
        assert!(segments[1].near_companion);
    }

    #[test]
    fn test_far_scenery_is_not_flagged_near() {
        let companion = Segment::companion(TimeSpan::new(20.0, 27.0), "Biscuit");
        let sceneries = vec![SceneryMoment::new("1:20", 6.0)];
        let segments = ensure_scenery_coverage(vec![companion], &sceneries, 120.0, &config());
        assert_eq!(segments.len(), 2);
        assert!(!segments[1].near_companion);
        // Dwell is capped at the scenery clip maximum.
        assert_eq!(segments[1].span, TimeSpan::new(78.0, 85.0));
    }

    #[test]
    fn test_feeding_event_gets_fixed_clip() {
        let feedings = vec![FeedingEvent::new("0:40", "treat", "ate")];
        let segments = ensure_feeding_coverage(vec![], &feedings, 90.0, &config());
        assert_eq!(segments[0].span, TimeSpan::new(39.0, 43.0));
        assert_eq!(segments[0].source, SegmentSource::Feeding);
    }

    #[test]
    fn test_safety_clip_length_depends_on_severity() {
        let alerts = vec![
            SafetyAlert::new("0:20", AlertSeverity::Danger, "loose dog"),
            SafetyAlert::new("1:00", AlertSeverity::Warning, "broken glass"),
        ];
        let segments = ensure_safety_coverage(vec![], &alerts, 120.0, &config());
        assert_eq!(segments[0].span, TimeSpan::new(19.0, 24.0));
        assert_eq!(segments[1].span, TimeSpan::new(59.0, 63.0));
    }

    #[test]
    fn test_covered_alert_adds_nothing() {
        let alerts = vec![SafetyAlert::new("0:05", AlertSeverity::Danger, "traffic")];
        let segments = ensure_safety_coverage(vec![ai(0.0, 10.0)], &alerts, 90.0, &config());
        assert_eq!(segments.len(), 1);
        assert_eq!(segments[0].source, SegmentSource::AiScored);
    }
}
