//! Normalized display signals.
//!
//! The provider's sparse mood curve and activity timeline are irregular
//! and sometimes malformed; the normalizer turns them into the
//! fixed-cardinality numeric sequences the player UI binds to directly.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Icon keywords the player UI knows how to draw.
pub const ALLOWED_ICONS: &[&str] = &[
    "paw", "run", "play", "rest", "sniff", "food", "water", "meet", "view", "alert",
];

/// Icon substituted for anything outside [`ALLOWED_ICONS`].
pub const FALLBACK_ICON: &str = "paw";

/// Whether the player UI can draw this icon keyword.
pub fn is_allowed_icon(icon: &str) -> bool {
    ALLOWED_ICONS.contains(&icon)
}

/// One sample on the resampled mood grid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct MoodSample {
    /// Sample time in seconds
    pub time_secs: f64,

    /// Mood estimate in `[0, 100]`
    pub value: u8,
}

impl MoodSample {
    pub fn new(time_secs: f64, value: u8) -> Self {
        Self { time_secs, value }
    }
}

/// One entry on the normalized activity timeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct TimelineItem {
    /// Entry time in seconds
    pub time_secs: f64,

    /// Short activity label
    pub label: String,

    /// Icon keyword, guaranteed to be in [`ALLOWED_ICONS`]
    pub icon: String,

    /// Entry was synthesized by the normalizer, not observed
    #[serde(default)]
    pub synthesized: bool,
}

impl TimelineItem {
    /// An entry taken from a provider annotation.
    pub fn observed(time_secs: f64, label: impl Into<String>, icon: impl Into<String>) -> Self {
        Self {
            time_secs,
            label: label.into(),
            icon: icon.into(),
            synthesized: false,
        }
    }

    /// An entry synthesized to reach the minimum cardinality.
    pub fn synthesized(time_secs: f64, label: impl Into<String>, icon: impl Into<String>) -> Self {
        Self {
            time_secs,
            label: label.into(),
            icon: icon.into(),
            synthesized: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_icon_allow_list() {
        assert!(is_allowed_icon("paw"));
        assert!(is_allowed_icon("alert"));
        assert!(!is_allowed_icon("rocket"));
        assert!(!is_allowed_icon(""));
    }

    #[test]
    fn test_fallback_icon_is_allowed() {
        assert!(is_allowed_icon(FALLBACK_ICON));
    }

    #[test]
    fn test_timeline_item_constructors() {
        let observed = TimelineItem::observed(42.0, "Chasing squirrels", "run");
        assert!(!observed.synthesized);
        let filler = TimelineItem::synthesized(60.0, "On the move", "paw");
        assert!(filler.synthesized);
    }
}
