//! Budget trimming.
//!
//! Two greedy passes share one skeleton: sort by a priority function,
//! accept segments while they fit the budget, then restore chronological
//! order. The passes differ in when they run and what happens to a
//! segment that does not fit.
//!
//! [`trim_candidates`] runs on the raw candidate set before any coverage
//! is synthesized and simply drops the overflow, preferring candidates
//! whose footage happens to cover a companion sighting or a long scenic
//! dwell. [`trim_final`] runs after all coverage passes and carries two
//! exceptions: safety footage is compressed rather than dropped, and the
//! only remaining segment for a companion may overrun the budget by a
//! bounded amount. Losing an alert or showing zero footage of a known
//! companion is worse than a slightly long reel.

use std::collections::HashSet;
use tracing::{debug, info};
use wreel_models::{Segment, SegmentSource, WalkAnnotations};

use crate::config::CuratorConfig;
use crate::merge::compare_chronological;

/// Sum of segment lengths in seconds.
pub(crate) fn total_duration_secs(segments: &[Segment]) -> f64 {
    segments.iter().map(Segment::duration_secs).sum()
}

/// What a trim pass did, for logging.
pub(crate) struct TrimOutcome {
    pub segments: Vec<Segment>,
    pub total_secs: f64,
    pub compressed: usize,
    pub dropped: usize,
}

/// Per-pass policy for segments that do not fit the remaining budget.
pub(crate) trait OverageRule {
    /// Observe a segment that was accepted.
    fn on_accepted(&mut self, _segment: &Segment) {}

    /// Decide the fate of a segment that does not fit.
    ///
    /// `remaining_secs` is what is left of the budget (negative once an
    /// earlier exception overran it); `ceiling_remaining_secs` is what is
    /// left below the hard ceiling. Return the seconds to keep, or `None`
    /// to drop the segment. A rule can never extend a segment.
    fn over_budget(
        &mut self,
        segment: &Segment,
        remaining_secs: f64,
        ceiling_remaining_secs: f64,
    ) -> Option<f64>;
}

/// Rule that drops everything over budget.
struct DropOverage;

impl OverageRule for DropOverage {
    fn over_budget(&mut self, _segment: &Segment, _remaining: f64, _ceiling: f64) -> Option<f64> {
        None
    }
}

/// Greedy-accept segments in priority order until the budget is spent.
///
/// Sorting is stable, so equal-priority segments keep their incoming
/// chronological order. The survivors are re-sorted chronologically.
pub(crate) fn trim_to_budget<P, R>(
    mut segments: Vec<Segment>,
    budget_secs: f64,
    ceiling_secs: f64,
    priority: P,
    rule: &mut R,
) -> TrimOutcome
where
    P: Fn(&Segment) -> f64,
    R: OverageRule,
{
    segments.sort_by(|a, b| {
        priority(b)
            .partial_cmp(&priority(a))
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    let mut kept: Vec<Segment> = Vec::with_capacity(segments.len());
    let mut total = 0.0_f64;
    let mut compressed = 0;
    let mut dropped = 0;

    for mut segment in segments {
        let len = segment.duration_secs();
        if total + len <= budget_secs {
            total += len;
            rule.on_accepted(&segment);
            kept.push(segment);
            continue;
        }

        match rule.over_budget(&segment, budget_secs - total, ceiling_secs - total) {
            Some(keep_len) => {
                let keep_len = keep_len.min(len);
                if keep_len < len {
                    segment.span.end_secs = segment.span.start_secs + keep_len;
                    compressed += 1;
                }
                total += segment.duration_secs();
                rule.on_accepted(&segment);
                kept.push(segment);
            }
            None => dropped += 1,
        }
    }

    kept.sort_by(compare_chronological);
    TrimOutcome {
        segments: kept,
        total_secs: total,
        compressed,
        dropped,
    }
}

/// Trim the raw candidate set down to the budget before coverage runs.
///
/// No-op while the candidates already fit. Priority is the candidate's
/// own score, plus a flat bonus when its span covers a companion
/// occurrence or a scenic dwell of at least the bonus threshold; those
/// candidates would otherwise lose to flashier but emptier footage.
pub fn trim_candidates(
    segments: Vec<Segment>,
    annotations: &WalkAnnotations,
    config: &CuratorConfig,
) -> Vec<Segment> {
    let before_secs = total_duration_secs(&segments);
    if before_secs <= config.budget_secs {
        debug!(
            total_secs = format!("{:.1}", before_secs),
            "Candidates fit the budget, no pre-trim"
        );
        return segments;
    }

    let duration = annotations.duration_secs;
    let mut bonus_instants: Vec<f64> = Vec::new();
    for companion in &annotations.companions {
        for occurrence in &companion.occurrences {
            if let Some(t) = occurrence.time_secs(duration) {
                bonus_instants.push(t);
            }
        }
    }
    for moment in &annotations.sceneries {
        if moment.dwell_secs >= config.bonus_dwell_secs {
            if let Some(t) = moment.time_secs(duration) {
                bonus_instants.push(t);
            }
        }
    }

    let priority = |segment: &Segment| {
        let base = segment.score.unwrap_or(0.0);
        if bonus_instants
            .iter()
            .any(|&t| segment.span.contains_closed(t))
        {
            base + config.coverage_bonus
        } else {
            base
        }
    };

    let outcome = trim_to_budget(
        segments,
        config.budget_secs,
        config.ceiling_secs,
        priority,
        &mut DropOverage,
    );
    info!(
        before_secs = format!("{:.1}", before_secs),
        after_secs = format!("{:.1}", outcome.total_secs),
        dropped = outcome.dropped,
        "Pre-trimmed candidate set"
    );
    outcome.segments
}

/// Tag-ladder priority for the final trim.
fn final_priority(segment: &Segment) -> f64 {
    match segment.source {
        SegmentSource::Safety => 100.0,
        SegmentSource::CompanionScenery => 95.0,
        SegmentSource::Companion => 80.0,
        SegmentSource::Feeding => 60.0,
        SegmentSource::Scenery => {
            if segment.near_companion {
                85.0
            } else if segment.high_quality {
                75.0
            } else {
                50.0
            }
        }
        SegmentSource::AiScored => match segment.score {
            Some(score) if score >= 15.0 => 30.0,
            Some(score) if score >= 10.0 => 20.0,
            _ => 10.0,
        },
    }
}

/// Final-trim exceptions: compress safety, never orphan a companion.
struct FinalTrimRule<'a> {
    config: &'a CuratorConfig,
    seen_companions: HashSet<String>,
}

impl OverageRule for FinalTrimRule<'_> {
    fn on_accepted(&mut self, segment: &Segment) {
        if let Some(name) = &segment.companion {
            self.seen_companions.insert(name.clone());
        }
    }

    fn over_budget(
        &mut self,
        segment: &Segment,
        remaining_secs: f64,
        ceiling_remaining_secs: f64,
    ) -> Option<f64> {
        let len = segment.duration_secs();

        if segment.source == SegmentSource::Safety {
            // Compress into whatever budget is left; once the budget is
            // gone, keep a floor-length clip as overage. Dropping is only
            // allowed when even that would breach the ceiling.
            let keep = if remaining_secs > 0.0 {
                remaining_secs.min(len)
            } else {
                self.config.safety_floor_secs.min(len)
            };
            if keep > ceiling_remaining_secs {
                return None;
            }
            return Some(keep);
        }

        if let Some(name) = &segment.companion {
            if !self.seen_companions.contains(name) {
                if remaining_secs >= self.config.companion_floor_secs {
                    return Some(remaining_secs.min(len));
                }
                // Compressing to fit would leave too little of the only
                // footage of this companion; allow bounded overage instead.
                let keep = len
                    .min(remaining_secs + self.config.companion_overage_secs)
                    .min(ceiling_remaining_secs);
                if keep >= self.config.companion_floor_secs {
                    return Some(keep);
                }
            }
        }

        None
    }
}

/// Trim the fully-covered segment list down to the budget.
///
/// No-op while the segments already fit. Runs after every coverage pass,
/// so the priority ladder ranks tags rather than raw scores.
pub fn trim_final(segments: Vec<Segment>, config: &CuratorConfig) -> Vec<Segment> {
    let before_secs = total_duration_secs(&segments);
    if before_secs <= config.budget_secs {
        debug!(
            total_secs = format!("{:.1}", before_secs),
            "Reel fits the budget, no final trim"
        );
        return segments;
    }

    let mut rule = FinalTrimRule {
        config,
        seen_companions: HashSet::new(),
    };
    let outcome = trim_to_budget(
        segments,
        config.budget_secs,
        config.ceiling_secs,
        final_priority,
        &mut rule,
    );
    info!(
        before_secs = format!("{:.1}", before_secs),
        after_secs = format!("{:.1}", outcome.total_secs),
        compressed = outcome.compressed,
        dropped = outcome.dropped,
        "Final trim applied"
    );
    outcome.segments
}
