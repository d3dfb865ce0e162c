//! Time interval arithmetic on the source-walk clock.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// A half-open-ish interval `[start, end]` in seconds on the original walk.
///
/// Invariants: `0 <= start <= end`. Constructors enforce ordering; callers
/// that need clamping into the walk use [`TimeSpan::clamped`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct TimeSpan {
    /// Start offset in seconds
    pub start_secs: f64,
    /// End offset in seconds
    pub end_secs: f64,
}

impl TimeSpan {
    /// Create a span, swapping endpoints if given in reverse order.
    pub fn new(start_secs: f64, end_secs: f64) -> Self {
        if end_secs < start_secs {
            Self { start_secs: end_secs, end_secs: start_secs }
        } else {
            Self { start_secs, end_secs }
        }
    }

    /// Create a span clamped into `[0, duration_secs]`.
    pub fn clamped(start_secs: f64, end_secs: f64, duration_secs: f64) -> Self {
        let duration_secs = duration_secs.max(0.0);
        Self::new(
            start_secs.clamp(0.0, duration_secs),
            end_secs.clamp(0.0, duration_secs),
        )
    }

    /// Length of the span in seconds.
    pub fn duration_secs(&self) -> f64 {
        (self.end_secs - self.start_secs).max(0.0)
    }

    /// Whether the span has zero length.
    pub fn is_empty(&self) -> bool {
        self.duration_secs() <= 0.0
    }

    /// Whether `t` falls inside the span, start inclusive, end exclusive.
    ///
    /// Used for reel-time mapping so a time sitting exactly on a cut
    /// boundary belongs to the next kept span, not the previous one.
    pub fn contains(&self, t: f64) -> bool {
        t >= self.start_secs && t < self.end_secs
    }

    /// Whether `t` falls inside the span with both endpoints inclusive.
    ///
    /// Used for coverage checks: an event sitting exactly on a segment
    /// edge counts as covered.
    pub fn contains_closed(&self, t: f64) -> bool {
        t >= self.start_secs && t <= self.end_secs
    }

    /// Whether two spans share at least one instant.
    pub fn overlaps(&self, other: &TimeSpan) -> bool {
        self.start_secs <= other.end_secs && other.start_secs <= self.end_secs
    }

    /// Gap in seconds between two spans (zero when they touch or overlap).
    pub fn gap_to(&self, other: &TimeSpan) -> f64 {
        if self.overlaps(other) {
            0.0
        } else if self.end_secs < other.start_secs {
            other.start_secs - self.end_secs
        } else {
            self.start_secs - other.end_secs
        }
    }

    /// Distance from a point to the span (zero when inside).
    pub fn distance_to(&self, t: f64) -> f64 {
        if t < self.start_secs {
            self.start_secs - t
        } else if t > self.end_secs {
            t - self.end_secs
        } else {
            0.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_swaps_reversed_endpoints() {
        let span = TimeSpan::new(10.0, 4.0);
        assert_eq!(span.start_secs, 4.0);
        assert_eq!(span.end_secs, 10.0);
    }

    #[test]
    fn test_clamped_respects_walk_bounds() {
        let span = TimeSpan::clamped(-3.0, 700.0, 600.0);
        assert_eq!(span.start_secs, 0.0);
        assert_eq!(span.end_secs, 600.0);
    }

    #[test]
    fn test_duration_and_empty() {
        assert_eq!(TimeSpan::new(10.0, 17.0).duration_secs(), 7.0);
        assert!(TimeSpan::new(5.0, 5.0).is_empty());
    }

    #[test]
    fn test_contains_half_open_vs_closed() {
        let span = TimeSpan::new(10.0, 20.0);
        assert!(span.contains(10.0));
        assert!(!span.contains(20.0));
        assert!(span.contains_closed(20.0));
        assert!(!span.contains_closed(20.1));
    }

    #[test]
    fn test_overlaps_and_gap() {
        let a = TimeSpan::new(0.0, 10.0);
        let b = TimeSpan::new(12.0, 20.0);
        let c = TimeSpan::new(8.0, 15.0);
        assert!(!a.overlaps(&b));
        assert!(a.overlaps(&c));
        assert_eq!(a.gap_to(&b), 2.0);
        assert_eq!(b.gap_to(&a), 2.0);
        assert_eq!(a.gap_to(&c), 0.0);
    }

    #[test]
    fn test_distance_to_point() {
        let span = TimeSpan::new(10.0, 20.0);
        assert_eq!(span.distance_to(4.0), 6.0);
        assert_eq!(span.distance_to(15.0), 0.0);
        assert_eq!(span.distance_to(27.0), 7.0);
    }
}
