//! Curation pipeline.
//!
//! One [`WalkCurator::curate`] call takes a walk's raw annotations and
//! produces everything playback needs: the bounded highlight reel, the
//! annotations rewritten onto the reel clock, and the normalized signal
//! pairs. The whole pass is pure, synchronous computation over the
//! snapshot it is given; persistence and video extraction live with the
//! caller.
//!
//! # Stages
//! 1. Normalize the mood curve and activity timeline.
//! 2. Parse candidate intervals into scored segments.
//! 3. Merge near-adjacent segments, pre-trim if over budget.
//! 4. Guarantee coverage per event class, re-merging after each.
//! 5. Final trim with the safety and companion exceptions.
//! 6. Restore one scenery segment if the trim removed them all.
//! 7. Rewrite annotations and derive reel-clock signal copies.
//!
//! Determinism is load-bearing: identical inputs produce identical reels
//! and mappings, which is what makes re-running over historical walks
//! safe.

use tracing::info;
use wreel_models::{
    compute_reel_stats, CuratedWalk, HighlightReel, Segment, WalkAnnotations,
};

use crate::config::CuratorConfig;
use crate::coverage::{
    ensure_companion_coverage, ensure_feeding_coverage, ensure_safety_coverage,
    ensure_scenery_coverage,
};
use crate::fallback::restore_scenery_coverage;
use crate::merge::merge_segments;
use crate::normalize::{normalize_mood, normalize_timeline};
use crate::remap::{filter_mood, filter_timeline, rewrite_annotations};
use crate::trim::{trim_candidates, trim_final};

/// The curation engine for one deployment.
pub struct WalkCurator {
    config: CuratorConfig,
}

impl WalkCurator {
    /// Create a curator with the given configuration.
    pub fn new(config: CuratorConfig) -> Self {
        Self { config }
    }

    /// Create a curator with default configuration.
    pub fn with_defaults() -> Self {
        Self::new(CuratorConfig::default())
    }

    /// Get the configuration.
    pub fn config(&self) -> &CuratorConfig {
        &self.config
    }

    /// Run one full curation pass over a walk's annotations.
    ///
    /// A walk with no usable candidate intervals yields an empty reel;
    /// that is a valid output telling the caller to fall back to the
    /// uncut video. The annotations are still rewritten (everything
    /// flagged as cut) so the output shape is uniform.
    pub fn curate(&self, mut annotations: WalkAnnotations) -> CuratedWalk {
        let duration = annotations.duration_secs;
        info!(
            walk_id = %annotations.walk_id,
            duration_secs = format!("{:.1}", duration),
            candidates = annotations.candidates.len(),
            "Curating walk"
        );

        let mood = normalize_mood(&annotations.mood, duration, &self.config);
        let timeline = normalize_timeline(&annotations.timeline, &mood, duration, &self.config);

        let candidate_segments: Vec<Segment> = annotations
            .candidates
            .iter()
            .filter_map(|c| {
                c.time_span(duration)
                    .map(|span| Segment::ai_scored(span, c.score))
            })
            .collect();

        let reel = if candidate_segments.is_empty() {
            info!(
                walk_id = %annotations.walk_id,
                "No usable candidate intervals, emitting an empty reel"
            );
            HighlightReel::default()
        } else {
            self.build_reel(candidate_segments, &annotations)
        };

        rewrite_annotations(&mut annotations, &reel);
        let mood_reel = filter_mood(&mood, &reel);
        let timeline_reel = filter_timeline(&timeline, &reel);
        let stats = compute_reel_stats(&reel);

        info!(
            walk_id = %annotations.walk_id,
            segments = stats.segment_count,
            total_secs = format!("{:.1}", stats.total_secs),
            "Curation complete"
        );

        CuratedWalk {
            walk_id: annotations.walk_id.clone(),
            reel,
            stats,
            annotations,
            mood,
            mood_reel,
            timeline,
            timeline_reel,
        }
    }

    /// Segment-selection stages, from scored candidates to the cut list.
    fn build_reel(
        &self,
        candidate_segments: Vec<Segment>,
        annotations: &WalkAnnotations,
    ) -> HighlightReel {
        let tolerance = self.config.merge_tolerance_secs;
        let duration = annotations.duration_secs;

        let mut segments = merge_segments(candidate_segments, tolerance);
        segments = trim_candidates(segments, annotations, &self.config);

        segments =
            ensure_companion_coverage(segments, &annotations.companions, duration, &self.config);
        segments = merge_segments(segments, tolerance);
        segments =
            ensure_scenery_coverage(segments, &annotations.sceneries, duration, &self.config);
        segments = merge_segments(segments, tolerance);
        segments =
            ensure_feeding_coverage(segments, &annotations.feedings, duration, &self.config);
        segments = merge_segments(segments, tolerance);
        segments = ensure_safety_coverage(segments, &annotations.alerts, duration, &self.config);
        segments = merge_segments(segments, tolerance);

        segments = trim_final(segments, &self.config);
        segments = restore_scenery_coverage(segments, annotations, &self.config);

        HighlightReel::from_segments(segments)
    }
}
