//! Reel segment models.
//!
//! A [`Segment`] is a time interval in the source walk tagged with why it
//! was included. The tag set is closed and carries a fixed merge-priority
//! ladder; combining two tags never falls back to string comparison.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::timespan::TimeSpan;

/// Why a segment is part of the reel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum SegmentSource {
    /// Interval proposed by the annotation provider with a raw score
    AiScored,
    /// Synthesized around a recurring companion occurrence
    Companion,
    /// Synthesized around a scenic dwell moment
    Scenery,
    /// Companion footage that also contains a scenic moment
    CompanionScenery,
    /// Synthesized around a feeding event
    Feeding,
    /// Synthesized around a safety alert
    Safety,
}

impl SegmentSource {
    /// Merge-priority ladder. Higher rank wins when two segments fuse.
    pub fn merge_rank(&self) -> u8 {
        match self {
            SegmentSource::Safety => 100,
            SegmentSource::CompanionScenery => 95,
            SegmentSource::Companion => 80,
            SegmentSource::Feeding => 60,
            SegmentSource::Scenery => 40,
            SegmentSource::AiScored => 10,
        }
    }

    /// Whether this tag carries companion footage.
    pub fn has_companion_flavor(&self) -> bool {
        matches!(self, SegmentSource::Companion | SegmentSource::CompanionScenery)
    }

    /// Whether this tag carries scenery footage.
    pub fn has_scenery_flavor(&self) -> bool {
        matches!(self, SegmentSource::Scenery | SegmentSource::CompanionScenery)
    }

    /// Resolve the tag of a merged segment.
    ///
    /// A companion flavor on one side and a scenery flavor on the other
    /// fuse into [`SegmentSource::CompanionScenery`]; otherwise the higher
    /// rank wins. Safety never loses its tag, it outranks everything.
    pub fn combine(self, other: SegmentSource) -> SegmentSource {
        let has_safety = self == SegmentSource::Safety || other == SegmentSource::Safety;
        let companion = self.has_companion_flavor() || other.has_companion_flavor();
        let scenery = self.has_scenery_flavor() || other.has_scenery_flavor();
        if !has_safety && companion && scenery {
            SegmentSource::CompanionScenery
        } else if self.merge_rank() >= other.merge_rank() {
            self
        } else {
            other
        }
    }

    /// Tag name as used in logs and output JSON.
    pub fn as_str(&self) -> &'static str {
        match self {
            SegmentSource::AiScored => "ai_scored",
            SegmentSource::Companion => "companion",
            SegmentSource::Scenery => "scenery",
            SegmentSource::CompanionScenery => "companion_scenery",
            SegmentSource::Feeding => "feeding",
            SegmentSource::Safety => "safety",
        }
    }
}

impl fmt::Display for SegmentSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A time interval selected for the highlight reel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Segment {
    /// Interval on the original walk clock
    pub span: TimeSpan,

    /// Why this interval was selected
    pub source: SegmentSource,

    /// Raw provider score (ai-scored candidates only)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub score: Option<f64>,

    /// Companion name when the footage covers a recurring companion
    #[serde(skip_serializing_if = "Option::is_none")]
    pub companion: Option<String>,

    /// Provider marked the underlying scenery moment as visually strong
    #[serde(default)]
    pub high_quality: bool,

    /// Scenery synthesized within 10s of companion footage
    #[serde(default)]
    pub near_companion: bool,
}

impl Segment {
    /// Create a segment with no score or flags.
    pub fn new(span: TimeSpan, source: SegmentSource) -> Self {
        Self {
            span,
            source,
            score: None,
            companion: None,
            high_quality: false,
            near_companion: false,
        }
    }

    /// Segment from a provider candidate interval.
    pub fn ai_scored(span: TimeSpan, score: Option<f64>) -> Self {
        Self { score, ..Self::new(span, SegmentSource::AiScored) }
    }

    /// Segment synthesized around a companion occurrence.
    pub fn companion(span: TimeSpan, name: impl Into<String>) -> Self {
        Self {
            companion: Some(name.into()),
            ..Self::new(span, SegmentSource::Companion)
        }
    }

    /// Segment synthesized around a scenery moment.
    pub fn scenery(span: TimeSpan) -> Self {
        Self::new(span, SegmentSource::Scenery)
    }

    /// Segment synthesized around a feeding event.
    pub fn feeding(span: TimeSpan) -> Self {
        Self::new(span, SegmentSource::Feeding)
    }

    /// Segment synthesized around a safety alert.
    pub fn safety(span: TimeSpan) -> Self {
        Self::new(span, SegmentSource::Safety)
    }

    /// Set the high-quality flag.
    pub fn with_high_quality(mut self, high_quality: bool) -> Self {
        self.high_quality = high_quality;
        self
    }

    /// Set the near-companion flag.
    pub fn with_near_companion(mut self, near_companion: bool) -> Self {
        self.near_companion = near_companion;
        self
    }

    /// Length of the segment in seconds.
    pub fn duration_secs(&self) -> f64 {
        self.span.duration_secs()
    }

    /// Fold another segment into this one, keeping the union span.
    ///
    /// Tag resolution follows [`SegmentSource::combine`]; scores keep the
    /// max, boolean flags OR, and a companion name from either side
    /// survives.
    pub fn absorb(&mut self, other: &Segment) {
        self.span.end_secs = self.span.end_secs.max(other.span.end_secs);
        self.source = self.source.combine(other.source);
        self.score = match (self.score, other.score) {
            (Some(a), Some(b)) => Some(a.max(b)),
            (a, b) => a.or(b),
        };
        if self.companion.is_none() {
            self.companion = other.companion.clone();
        }
        self.high_quality |= other.high_quality;
        self.near_companion |= other.near_companion;
    }
}

/// The finished highlight reel: chronologically sorted, pairwise-disjoint
/// segments on the original walk clock.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct HighlightReel {
    /// Ordered cut list
    pub segments: Vec<Segment>,
}

impl HighlightReel {
    /// Wrap an already-sorted, disjoint segment list.
    pub fn from_segments(segments: Vec<Segment>) -> Self {
        Self { segments }
    }

    /// Number of segments in the reel.
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    /// Whether the reel contains no segments.
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Total reel duration in seconds.
    pub fn total_duration_secs(&self) -> f64 {
        self.segments.iter().map(Segment::duration_secs).sum()
    }

    /// Whether an original-clock time is retained in the reel.
    pub fn covers(&self, t: f64) -> bool {
        self.segments.iter().any(|s| s.span.contains_closed(t))
    }

    /// Structural sanity check: sorted, disjoint, inside the walk.
    pub fn is_well_formed(&self, duration_secs: f64) -> bool {
        let mut prev_end = 0.0_f64;
        for segment in &self.segments {
            if segment.span.start_secs < prev_end - 1e-9 {
                return false;
            }
            if segment.span.end_secs > duration_secs + 1e-9 {
                return false;
            }
            prev_end = segment.span.end_secs;
        }
        true
    }
}

/// Summary statistics for a finished reel.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ReelStats {
    /// Number of segments in the reel
    pub segment_count: usize,
    /// Total reel duration in seconds
    pub total_secs: f64,
    /// Segments per source tag
    pub ai_scored: usize,
    pub companion: usize,
    pub scenery: usize,
    pub companion_scenery: usize,
    pub feeding: usize,
    pub safety: usize,
}

/// Compute summary statistics for a reel.
pub fn compute_reel_stats(reel: &HighlightReel) -> ReelStats {
    let mut stats = ReelStats {
        segment_count: reel.len(),
        total_secs: reel.total_duration_secs(),
        ..ReelStats::default()
    };
    for segment in &reel.segments {
        match segment.source {
            SegmentSource::AiScored => stats.ai_scored += 1,
            SegmentSource::Companion => stats.companion += 1,
            SegmentSource::Scenery => stats.scenery += 1,
            SegmentSource::CompanionScenery => stats.companion_scenery += 1,
            SegmentSource::Feeding => stats.feeding += 1,
            SegmentSource::Safety => stats.safety += 1,
        }
    }
    stats
}

#[cfg(test)]
mod tests {
    use super::*;

    fn span(start: f64, end: f64) -> TimeSpan {
        TimeSpan::new(start, end)
    }

    #[test]
    fn test_merge_rank_ladder() {
        assert!(SegmentSource::Safety.merge_rank() > SegmentSource::CompanionScenery.merge_rank());
        assert!(SegmentSource::CompanionScenery.merge_rank() > SegmentSource::Companion.merge_rank());
        assert!(SegmentSource::Companion.merge_rank() > SegmentSource::Feeding.merge_rank());
        assert!(SegmentSource::Feeding.merge_rank() > SegmentSource::Scenery.merge_rank());
        assert!(SegmentSource::Scenery.merge_rank() > SegmentSource::AiScored.merge_rank());
    }

    #[test]
    fn test_combine_companion_and_scenery_fuse() {
        assert_eq!(
            SegmentSource::Companion.combine(SegmentSource::Scenery),
            SegmentSource::CompanionScenery
        );
        assert_eq!(
            SegmentSource::Scenery.combine(SegmentSource::CompanionScenery),
            SegmentSource::CompanionScenery
        );
    }

    #[test]
    fn test_combine_safety_never_demoted() {
        assert_eq!(
            SegmentSource::Safety.combine(SegmentSource::CompanionScenery),
            SegmentSource::Safety
        );
        assert_eq!(
            SegmentSource::Companion.combine(SegmentSource::Safety),
            SegmentSource::Safety
        );
    }

    #[test]
    fn test_combine_higher_rank_wins() {
        assert_eq!(
            SegmentSource::Feeding.combine(SegmentSource::AiScored),
            SegmentSource::Feeding
        );
        assert_eq!(
            SegmentSource::AiScored.combine(SegmentSource::Companion),
            SegmentSource::Companion
        );
    }

    #[test]
    fn test_absorb_keeps_union_and_best_fields() {
        let mut left = Segment::ai_scored(span(0.0, 10.0), Some(8.0));
        let right = Segment::companion(span(8.0, 15.0), "Biscuit").with_high_quality(true);
        left.absorb(&right);
        assert_eq!(left.span, span(0.0, 15.0));
        assert_eq!(left.source, SegmentSource::Companion);
        assert_eq!(left.score, Some(8.0));
        assert_eq!(left.companion.as_deref(), Some("Biscuit"));
        assert!(left.high_quality);
    }

    #[test]
    fn test_absorb_never_shrinks_span() {
        let mut outer = Segment::scenery(span(0.0, 20.0));
        let inner = Segment::feeding(span(5.0, 9.0));
        outer.absorb(&inner);
        assert_eq!(outer.span, span(0.0, 20.0));
        assert_eq!(outer.source, SegmentSource::Feeding);
    }

    #[test]
    fn test_reel_totals_and_coverage() {
        let reel = HighlightReel::from_segments(vec![
            Segment::ai_scored(span(0.0, 10.0), Some(12.0)),
            Segment::companion(span(57.0, 64.0), "Biscuit"),
        ]);
        assert_eq!(reel.len(), 2);
        assert_eq!(reel.total_duration_secs(), 17.0);
        assert!(reel.covers(62.0));
        assert!(!reel.covers(30.0));
        assert!(reel.is_well_formed(90.0));
    }

    #[test]
    fn test_is_well_formed_rejects_overlap() {
        let reel = HighlightReel::from_segments(vec![
            Segment::scenery(span(0.0, 10.0)),
            Segment::scenery(span(8.0, 15.0)),
        ]);
        assert!(!reel.is_well_formed(60.0));
    }

    #[test]
    fn test_compute_reel_stats() {
        let reel = HighlightReel::from_segments(vec![
            Segment::ai_scored(span(0.0, 10.0), Some(12.0)),
            Segment::companion(span(20.0, 27.0), "Biscuit"),
            Segment::safety(span(49.0, 54.0)),
        ]);
        let stats = compute_reel_stats(&reel);
        assert_eq!(stats.segment_count, 3);
        assert_eq!(stats.total_secs, 22.0);
        assert_eq!(stats.ai_scored, 1);
        assert_eq!(stats.companion, 1);
        assert_eq!(stats.safety, 1);
        assert_eq!(stats.scenery, 0);
    }
}
