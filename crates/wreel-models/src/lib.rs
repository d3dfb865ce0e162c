//! Shared data models for the WalkReel curation engine.
//!
//! This crate provides Serde-serializable types for:
//! - Walk annotations as produced by the annotation provider
//! - Reel segments, the finished highlight reel, and its statistics
//! - Normalized mood/timeline display signals
//! - Timestamp parsing and formatting at the text boundary

pub mod annotations;
pub mod curated;
pub mod segment;
pub mod signals;
pub mod timespan;
pub mod timestamp;

// Re-export common types
pub use annotations::{
    AlertSeverity, CandidateInterval, Companion, FeedingEvent, MoodPoint, Occurrence,
    SafetyAlert, SceneryMoment, TimelineEntry, WalkAnnotations, WalkId,
};
pub use curated::CuratedWalk;
pub use segment::{compute_reel_stats, HighlightReel, ReelStats, Segment, SegmentSource};
pub use signals::{is_allowed_icon, MoodSample, TimelineItem, ALLOWED_ICONS, FALLBACK_ICON};
pub use timespan::TimeSpan;
pub use timestamp::{
    format_seconds, normalize_timestamp, parse_clamped, parse_timestamp, TimestampError,
};
