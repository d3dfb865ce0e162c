//! Walk annotation models.
//!
//! These types mirror the JSON the annotation provider emits for one walk:
//! candidate intervals, recurring companions, scenery moments, feeding
//! events, safety alerts, plus the sparse mood curve and activity timeline.
//!
//! Every timestamped item carries two extra fields maintained by the
//! curation pipeline: an `original_*` sibling holding the pre-rewrite
//! timestamp text (its presence marks the item as already mapped) and an
//! `in_reel` flag saying whether the instant survived the cut.

use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use crate::timespan::TimeSpan;
use crate::timestamp::parse_clamped;

/// Unique identifier for a recorded walk.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(transparent)]
pub struct WalkId(pub String);

impl WalkId {
    /// Generate a new random walk ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// Create from an existing string.
    pub fn from_string(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    /// Get the inner string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for WalkId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for WalkId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for WalkId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for WalkId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Severity of a safety alert.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum AlertSeverity {
    /// Immediate hazard (traffic, aggressive animal, toxic food)
    Danger,
    /// Worth reviewing but not urgent
    Warning,
}

impl AlertSeverity {
    pub fn as_str(&self) -> &'static str {
        match self {
            AlertSeverity::Danger => "danger",
            AlertSeverity::Warning => "warning",
        }
    }
}

impl fmt::Display for AlertSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// An "interesting" interval proposed by the annotation provider.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct CandidateInterval {
    /// Start timestamp (M:SS)
    pub start: String,

    /// End timestamp (M:SS)
    pub end: String,

    /// Provider interest score
    #[serde(skip_serializing_if = "Option::is_none")]
    pub score: Option<f64>,

    /// Why the provider flagged this interval
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,

    /// Pre-rewrite start timestamp, set once by the mapper
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_start: Option<String>,

    /// Pre-rewrite end timestamp, set once by the mapper
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_end: Option<String>,

    /// Whether the interval survived into the reel
    #[serde(default)]
    pub in_reel: bool,
}

impl CandidateInterval {
    /// Create a candidate with just the interval text.
    pub fn new(start: impl Into<String>, end: impl Into<String>) -> Self {
        Self {
            start: start.into(),
            end: end.into(),
            score: None,
            reason: None,
            original_start: None,
            original_end: None,
            in_reel: false,
        }
    }

    /// Set the provider score.
    pub fn with_score(mut self, score: f64) -> Self {
        self.score = Some(score);
        self
    }

    /// Set the provider reason.
    pub fn with_reason(mut self, reason: impl Into<String>) -> Self {
        self.reason = Some(reason.into());
        self
    }

    /// Parse the interval to a span clamped into the walk.
    ///
    /// Returns `None` when either endpoint is malformed or the interval
    /// is reversed; such candidates are skipped, never fatal.
    pub fn time_span(&self, duration_secs: f64) -> Option<TimeSpan> {
        let start = parse_clamped(&self.start, duration_secs)?;
        let end = parse_clamped(&self.end, duration_secs)?;
        if end < start {
            return None;
        }
        Some(TimeSpan::new(start, end))
    }

    /// Whether the mapper has already rewritten this interval.
    pub fn is_mapped(&self) -> bool {
        self.original_start.is_some() || self.original_end.is_some()
    }
}

/// A single sighting of a recurring companion.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct Occurrence {
    /// Timestamp of the sighting (M:SS)
    pub time: String,

    /// How long the companion stays in frame, in seconds
    #[serde(default)]
    pub duration_secs: f64,

    /// Pre-rewrite timestamp, set once by the mapper
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_time: Option<String>,

    /// Whether the sighting survived into the reel
    #[serde(default)]
    pub in_reel: bool,
}

impl Occurrence {
    pub fn new(time: impl Into<String>, duration_secs: f64) -> Self {
        Self {
            time: time.into(),
            duration_secs,
            original_time: None,
            in_reel: false,
        }
    }

    /// Parsed, clamped occurrence time.
    pub fn time_secs(&self, duration_secs: f64) -> Option<f64> {
        parse_clamped(&self.time, duration_secs)
    }
}

/// A companion (dog, person) the walker keeps meeting.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct Companion {
    /// Name assigned by the provider ("Biscuit", "the corgi")
    pub name: String,

    /// Species if the provider could tell
    #[serde(skip_serializing_if = "Option::is_none")]
    pub species: Option<String>,

    /// Free-text description
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Every sighting of this companion during the walk
    #[serde(default)]
    pub occurrences: Vec<Occurrence>,
}

impl Companion {
    pub fn new(name: impl Into<String>, occurrences: Vec<Occurrence>) -> Self {
        Self {
            name: name.into(),
            species: None,
            description: None,
            occurrences,
        }
    }
}

/// A moment where the camera dwells on scenery.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct SceneryMoment {
    /// Timestamp of the dwell (M:SS)
    pub timestamp: String,

    /// How long the camera lingered, in seconds
    #[serde(default)]
    pub dwell_secs: f64,

    /// Free-text description of the view
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Provider marked this view as visually strong
    #[serde(default)]
    pub high_quality: bool,

    /// Pre-rewrite timestamp, set once by the mapper
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_timestamp: Option<String>,

    /// Whether the moment survived into the reel
    #[serde(default)]
    pub in_reel: bool,
}

impl SceneryMoment {
    pub fn new(timestamp: impl Into<String>, dwell_secs: f64) -> Self {
        Self {
            timestamp: timestamp.into(),
            dwell_secs,
            description: None,
            high_quality: false,
            original_timestamp: None,
            in_reel: false,
        }
    }

    /// Set the high-quality flag.
    pub fn with_high_quality(mut self, high_quality: bool) -> Self {
        self.high_quality = high_quality;
        self
    }

    /// Parsed, clamped dwell time.
    pub fn time_secs(&self, duration_secs: f64) -> Option<f64> {
        parse_clamped(&self.timestamp, duration_secs)
    }
}

/// A feeding or drinking event.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct FeedingEvent {
    /// Timestamp of the event (M:SS)
    pub timestamp: String,

    /// What was consumed ("treat", "water")
    pub item: String,

    /// What happened ("ate", "drank", "sniffed")
    pub action: String,

    /// Pre-rewrite timestamp, set once by the mapper
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_timestamp: Option<String>,

    /// Whether the event survived into the reel
    #[serde(default)]
    pub in_reel: bool,
}

impl FeedingEvent {
    pub fn new(
        timestamp: impl Into<String>,
        item: impl Into<String>,
        action: impl Into<String>,
    ) -> Self {
        Self {
            timestamp: timestamp.into(),
            item: item.into(),
            action: action.into(),
            original_timestamp: None,
            in_reel: false,
        }
    }

    /// Parsed, clamped event time.
    pub fn time_secs(&self, duration_secs: f64) -> Option<f64> {
        parse_clamped(&self.timestamp, duration_secs)
    }
}

/// A safety alert raised by the provider.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct SafetyAlert {
    /// Timestamp of the alert (M:SS)
    pub timestamp: String,

    /// How urgent the alert is
    pub severity: AlertSeverity,

    /// Human-readable description of the hazard
    pub message: String,

    /// Pre-rewrite timestamp, set once by the mapper
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_timestamp: Option<String>,

    /// Whether the alert survived into the reel
    #[serde(default)]
    pub in_reel: bool,
}

impl SafetyAlert {
    pub fn new(
        timestamp: impl Into<String>,
        severity: AlertSeverity,
        message: impl Into<String>,
    ) -> Self {
        Self {
            timestamp: timestamp.into(),
            severity,
            message: message.into(),
            original_timestamp: None,
            in_reel: false,
        }
    }

    /// Parsed, clamped alert time.
    pub fn time_secs(&self, duration_secs: f64) -> Option<f64> {
        parse_clamped(&self.timestamp, duration_secs)
    }
}

/// One point on the sparse mood curve.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct MoodPoint {
    /// Timestamp of the reading (M:SS)
    pub time: String,

    /// Mood estimate in `[0, 100]`
    pub value: f64,

    /// Pre-rewrite timestamp, set once by the mapper
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_time: Option<String>,

    /// Whether the reading survived into the reel
    #[serde(default)]
    pub in_reel: bool,
}

impl MoodPoint {
    pub fn new(time: impl Into<String>, value: f64) -> Self {
        Self {
            time: time.into(),
            value,
            original_time: None,
            in_reel: false,
        }
    }

    /// Parsed, clamped reading time.
    pub fn time_secs(&self, duration_secs: f64) -> Option<f64> {
        parse_clamped(&self.time, duration_secs)
    }
}

/// One entry on the sparse activity timeline.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct TimelineEntry {
    /// Timestamp of the activity (M:SS)
    pub time: String,

    /// Short activity label ("Chasing squirrels")
    pub label: String,

    /// Icon keyword for the UI
    #[serde(default)]
    pub icon: String,

    /// Pre-rewrite timestamp, set once by the mapper
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_time: Option<String>,

    /// Whether the activity survived into the reel
    #[serde(default)]
    pub in_reel: bool,
}

impl TimelineEntry {
    pub fn new(time: impl Into<String>, label: impl Into<String>, icon: impl Into<String>) -> Self {
        Self {
            time: time.into(),
            label: label.into(),
            icon: icon.into(),
            original_time: None,
            in_reel: false,
        }
    }

    /// Parsed, clamped entry time.
    pub fn time_secs(&self, duration_secs: f64) -> Option<f64> {
        parse_clamped(&self.time, duration_secs)
    }
}

/// Everything the annotation provider produced for one walk.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct WalkAnnotations {
    /// Walk this annotation set belongs to
    pub walk_id: WalkId,

    /// Total source video duration in seconds
    pub duration_secs: f64,

    /// When the provider finished analyzing
    #[serde(skip_serializing_if = "Option::is_none")]
    pub analyzed_at: Option<DateTime<Utc>>,

    /// Candidate "interesting" intervals
    #[serde(default)]
    pub candidates: Vec<CandidateInterval>,

    /// Recurring companions and their sightings
    #[serde(default)]
    pub companions: Vec<Companion>,

    /// Scenic dwell moments
    #[serde(default)]
    pub sceneries: Vec<SceneryMoment>,

    /// Feeding and drinking events
    #[serde(default)]
    pub feedings: Vec<FeedingEvent>,

    /// Safety alerts
    #[serde(default)]
    pub alerts: Vec<SafetyAlert>,

    /// Sparse mood curve
    #[serde(default)]
    pub mood: Vec<MoodPoint>,

    /// Sparse activity timeline
    #[serde(default)]
    pub timeline: Vec<TimelineEntry>,
}

impl WalkAnnotations {
    /// Create an empty annotation set for a walk.
    pub fn new(walk_id: WalkId, duration_secs: f64) -> Self {
        Self {
            walk_id,
            duration_secs,
            analyzed_at: None,
            candidates: Vec::new(),
            companions: Vec::new(),
            sceneries: Vec::new(),
            feedings: Vec::new(),
            alerts: Vec::new(),
            mood: Vec::new(),
            timeline: Vec::new(),
        }
    }

    /// Validate the annotation set before curation.
    pub fn validate(&self) -> Result<(), String> {
        if self.walk_id.as_str().is_empty() {
            return Err("Walk ID is required".to_string());
        }

        if !self.duration_secs.is_finite() || self.duration_secs <= 0.0 {
            return Err(format!(
                "Walk duration must be a positive number of seconds, got {}",
                self.duration_secs
            ));
        }

        for companion in &self.companions {
            if companion.name.trim().is_empty() {
                return Err("Companion name cannot be empty".to_string());
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_annotations() -> WalkAnnotations {
        WalkAnnotations::new(WalkId::from_string("walk-1"), 600.0)
    }

    #[test]
    fn test_candidate_time_span_parses_and_clamps() {
        let candidate = CandidateInterval::new("0:30", "12:00");
        let span = candidate.time_span(600.0).unwrap();
        assert_eq!(span.start_secs, 30.0);
        assert_eq!(span.end_secs, 600.0);
    }

    #[test]
    fn test_candidate_time_span_rejects_garbage() {
        assert!(CandidateInterval::new("abc", "1:00").time_span(600.0).is_none());
        assert!(CandidateInterval::new("2:00", "1:00").time_span(600.0).is_none());
    }

    #[test]
    fn test_candidate_is_mapped_after_either_sibling_set() {
        let mut candidate = CandidateInterval::new("0:10", "0:20");
        assert!(!candidate.is_mapped());
        candidate.original_start = Some("0:10".to_string());
        assert!(candidate.is_mapped());
    }

    #[test]
    fn test_validate_accepts_well_formed_input() {
        let mut annotations = base_annotations();
        annotations.companions.push(Companion::new(
            "Biscuit",
            vec![Occurrence::new("1:00", 4.0)],
        ));
        assert!(annotations.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_nonpositive_duration() {
        let mut annotations = base_annotations();
        annotations.duration_secs = 0.0;
        assert!(annotations.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_unnamed_companion() {
        let mut annotations = base_annotations();
        annotations.companions.push(Companion::new("  ", vec![]));
        assert!(annotations.validate().is_err());
    }

    #[test]
    fn test_annotations_deserialize_with_missing_collections() {
        let json = r#"{"walk_id": "walk-9", "duration_secs": 300.0}"#;
        let annotations: WalkAnnotations = serde_json::from_str(json).unwrap();
        assert_eq!(annotations.walk_id.as_str(), "walk-9");
        assert!(annotations.candidates.is_empty());
        assert!(annotations.mood.is_empty());
    }

    #[test]
    fn test_alert_severity_round_trips() {
        let alert = SafetyAlert::new("0:50", AlertSeverity::Danger, "off-leash dog ahead");
        let json = serde_json::to_string(&alert).unwrap();
        assert!(json.contains("\"danger\""));
        let back: SafetyAlert = serde_json::from_str(&json).unwrap();
        assert_eq!(back.severity, AlertSeverity::Danger);
    }
}
