//! Signal normalization.
//!
//! The provider's mood curve and activity timeline are sparse, unsorted
//! and occasionally malformed. The player UI wants neither: it binds to
//! an evenly spaced mood grid and an activity list with a predictable
//! number of entries. This module cleans both signals once, up front, on
//! the original walk clock; the reel-filtered views are derived later by
//! the remapper.
//!
//! # Strategy
//! - Mood: clean the control points (clamp, round, sort, dedupe per
//!   second), pin both walk boundaries, then resample onto an even grid
//!   sized by walk duration.
//! - Timeline: clean and dedupe entries, enforce the icon allow-list,
//!   then push the entry count into the target band. Too few entries are
//!   backfilled from the most expressive mood samples, then from generic
//!   filler; too many are thinned proportionally, always keeping the
//!   first and last.

use tracing::debug;
use wreel_models::{
    is_allowed_icon, MoodPoint, MoodSample, TimelineEntry, TimelineItem, FALLBACK_ICON,
};

use crate::config::CuratorConfig;

/// Resample the sparse mood curve onto an even grid.
///
/// An empty or wholly unparseable curve yields an empty grid; the UI
/// hides the mood lane entirely rather than inventing one.
pub fn normalize_mood(
    points: &[MoodPoint],
    duration_secs: f64,
    config: &CuratorConfig,
) -> Vec<MoodSample> {
    if duration_secs <= 0.0 {
        return Vec::new();
    }

    let mut control: Vec<(f64, f64)> = points
        .iter()
        .filter_map(|p| {
            p.time_secs(duration_secs)
                .map(|t| (t, p.value.clamp(0.0, 100.0).round()))
        })
        .collect();
    control.sort_by(|a, b| a.0.partial_cmp(&b.0).unwrap_or(std::cmp::Ordering::Equal));

    // Same-second readings collapse to the later one.
    let mut deduped: Vec<(f64, f64)> = Vec::with_capacity(control.len());
    for point in control {
        match deduped.last_mut() {
            Some(last) if last.0.floor() == point.0.floor() => *last = point,
            _ => deduped.push(point),
        }
    }

    if deduped.is_empty() {
        return Vec::new();
    }

    // Pin both walk boundaries so interpolation is defined everywhere.
    if deduped[0].0 > 0.0 {
        let first_value = deduped[0].1;
        deduped.insert(0, (0.0, first_value));
    }
    if deduped[deduped.len() - 1].0 < duration_secs {
        let last_value = deduped[deduped.len() - 1].1;
        deduped.push((duration_secs, last_value));
    }

    let grid_size = ((duration_secs / config.mood_grid_divisor).round() as usize)
        .clamp(config.mood_grid_min, config.mood_grid_max);

    let samples: Vec<MoodSample> = (0..grid_size)
        .map(|i| {
            let t = duration_secs * i as f64 / (grid_size - 1) as f64;
            let value = interpolate(&deduped, t).round().clamp(0.0, 100.0) as u8;
            MoodSample::new(t, value)
        })
        .collect();

    debug!(
        control_points = deduped.len(),
        grid_size = grid_size,
        "Resampled mood curve"
    );
    samples
}

/// Normalize the activity timeline into the target entry band.
pub fn normalize_timeline(
    entries: &[TimelineEntry],
    mood: &[MoodSample],
    duration_secs: f64,
    config: &CuratorConfig,
) -> Vec<TimelineItem> {
    if duration_secs <= 0.0 {
        return Vec::new();
    }

    let mut items: Vec<TimelineItem> = entries
        .iter()
        .filter_map(|e| {
            e.time_secs(duration_secs).map(|t| {
                let icon = if is_allowed_icon(&e.icon) {
                    e.icon.clone()
                } else {
                    FALLBACK_ICON.to_string()
                };
                TimelineItem::observed(t, e.label.clone(), icon)
            })
        })
        .collect();
    items.sort_by(|a, b| {
        a.time_secs
            .partial_cmp(&b.time_secs)
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    // Near-identical times collapse to the first.
    let mut deduped: Vec<TimelineItem> = Vec::with_capacity(items.len());
    for item in items {
        let duplicate = deduped
            .last()
            .is_some_and(|last| item.time_secs - last.time_secs < config.timeline_dedupe_radius_secs);
        if !duplicate {
            deduped.push(item);
        }
    }
    let mut items = deduped;

    if items.len() > config.timeline_max_entries {
        items = downsample(items, config.timeline_max_entries);
    }

    if items.len() < config.timeline_min_entries {
        backfill_from_mood(&mut items, mood, config);
    }
    if items.len() < config.timeline_min_entries {
        fill_with_generic(&mut items, duration_secs, config);
    }

    items.sort_by(|a, b| {
        a.time_secs
            .partial_cmp(&b.time_secs)
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    debug!(entries = items.len(), "Normalized activity timeline");
    items
}

/// Piecewise-linear interpolation over sorted control points.
fn interpolate(control: &[(f64, f64)], t: f64) -> f64 {
    if t <= control[0].0 {
        return control[0].1;
    }
    let last = control[control.len() - 1];
    if t >= last.0 {
        return last.1;
    }
    for pair in control.windows(2) {
        let (t0, v0) = pair[0];
        let (t1, v1) = pair[1];
        if t <= t1 {
            if t1 - t0 <= f64::EPSILON {
                return v1;
            }
            let fraction = (t - t0) / (t1 - t0);
            return v0 + (v1 - v0) * fraction;
        }
    }
    last.1
}

/// Add entries at the mood samples deviating most from neutral.
fn backfill_from_mood(items: &mut Vec<TimelineItem>, mood: &[MoodSample], config: &CuratorConfig) {
    let mut candidates: Vec<&MoodSample> = mood.iter().collect();
    candidates.sort_by(|a, b| {
        let da = (a.value as f64 - 50.0).abs();
        let db = (b.value as f64 - 50.0).abs();
        db.partial_cmp(&da).unwrap_or(std::cmp::Ordering::Equal)
    });

    for sample in candidates {
        if items.len() >= config.timeline_min_entries {
            break;
        }
        let too_close = items
            .iter()
            .any(|item| (item.time_secs - sample.time_secs).abs() <= config.backfill_radius_secs);
        if too_close {
            continue;
        }
        let (label, icon) = mood_entry(sample.value);
        items.push(TimelineItem::synthesized(sample.time_secs, label, icon));
    }
}

/// Add evenly spaced generic entries to approach the minimum.
fn fill_with_generic(items: &mut Vec<TimelineItem>, duration_secs: f64, config: &CuratorConfig) {
    let slots = config.timeline_min_entries;
    for slot in 0..slots {
        if items.len() >= config.timeline_min_entries {
            break;
        }
        let t = duration_secs * (slot as f64 + 0.5) / slots as f64;
        let too_close = items
            .iter()
            .any(|item| (item.time_secs - t).abs() <= config.filler_radius_secs);
        if too_close {
            continue;
        }
        items.push(TimelineItem::synthesized(t, "On the move", FALLBACK_ICON));
    }
}

/// Canned label and icon for a backfilled mood value.
fn mood_entry(value: u8) -> (&'static str, &'static str) {
    if value >= 80 {
        ("Full zoomies", "run")
    } else if value >= 50 {
        ("Tail wags all around", "play")
    } else if value > 25 {
        ("Easy strolling", "paw")
    } else {
        ("Quiet moment", "rest")
    }
}

/// Thin an oversized list proportionally, keeping the first and last.
fn downsample(items: Vec<TimelineItem>, target: usize) -> Vec<TimelineItem> {
    if items.len() <= target || target < 2 {
        return items;
    }
    let last_index = items.len() - 1;
    let step = last_index as f64 / (target - 1) as f64;
    (0..target)
        .map(|k| items[(k as f64 * step).round() as usize].clone())
        .collect()
}
