//! Curation configuration.

/// Tunable knobs for one curation pass.
///
/// Defaults match the product targets: a roughly two-minute reel with a
/// hard 125-second ceiling. Everything here is plain data; the engine
/// itself holds no other state.
#[derive(Debug, Clone)]
pub struct CuratorConfig {
    /// Target reel length in seconds
    pub budget_secs: f64,
    /// Hard ceiling the reel must never exceed
    pub ceiling_secs: f64,
    /// Segments closer than this merge into one (seconds)
    pub merge_tolerance_secs: f64,

    /// Stage-1 score bonus for candidates covering companion or scenery events
    pub coverage_bonus: f64,
    /// Minimum scenery dwell for the stage-1 bonus (seconds)
    pub bonus_dwell_secs: f64,

    /// Seconds of lead-in before a companion occurrence
    pub companion_pre_roll_secs: f64,
    /// Minimum seconds kept after a companion occurrence
    pub companion_min_clip_secs: f64,
    /// Minimum dwell for a scenery moment to qualify (seconds)
    pub scenery_min_dwell_secs: f64,
    /// Seconds of lead-in before a scenery moment
    pub scenery_pre_roll_secs: f64,
    /// Maximum seconds kept after a scenery moment
    pub scenery_max_clip_secs: f64,
    /// Scenery within this distance of companion footage is "near" (seconds)
    pub near_companion_radius_secs: f64,
    /// Seconds of lead-in before a feeding event
    pub feeding_pre_roll_secs: f64,
    /// Seconds kept after a feeding event
    pub feeding_clip_secs: f64,
    /// Seconds of lead-in before a safety alert
    pub safety_pre_roll_secs: f64,
    /// Seconds kept after a danger alert
    pub danger_clip_secs: f64,
    /// Seconds kept after a warning alert
    pub warning_clip_secs: f64,

    /// Shortest a safety segment may be compressed to (seconds)
    pub safety_floor_secs: f64,
    /// Budget overage allowed to keep a companion's only segment (seconds)
    pub companion_overage_secs: f64,
    /// Shortest a companion segment may be compressed to (seconds)
    pub companion_floor_secs: f64,

    /// Mood grid size is `duration / this`, clamped below
    pub mood_grid_divisor: f64,
    /// Minimum mood grid size
    pub mood_grid_min: usize,
    /// Maximum mood grid size
    pub mood_grid_max: usize,
    /// Minimum activity timeline entries after normalization
    pub timeline_min_entries: usize,
    /// Maximum activity timeline entries after normalization
    pub timeline_max_entries: usize,
    /// Mood-backfill entries keep this distance from existing entries (seconds)
    pub backfill_radius_secs: f64,
    /// Generic filler entries keep this distance from existing entries (seconds)
    pub filler_radius_secs: f64,
    /// Timeline entries closer than this are duplicates (seconds)
    pub timeline_dedupe_radius_secs: f64,
}

impl Default for CuratorConfig {
    fn default() -> Self {
        Self {
            budget_secs: 120.0,
            ceiling_secs: 125.0,
            merge_tolerance_secs: 2.0,
            coverage_bonus: 50.0,
            bonus_dwell_secs: 5.0,
            companion_pre_roll_secs: 3.0,
            companion_min_clip_secs: 3.0,
            scenery_min_dwell_secs: 3.0,
            scenery_pre_roll_secs: 2.0,
            scenery_max_clip_secs: 5.0,
            near_companion_radius_secs: 10.0,
            feeding_pre_roll_secs: 1.0,
            feeding_clip_secs: 3.0,
            safety_pre_roll_secs: 1.0,
            danger_clip_secs: 4.0,
            warning_clip_secs: 3.0,
            safety_floor_secs: 3.0,
            companion_overage_secs: 5.0,
            companion_floor_secs: 3.0,
            mood_grid_divisor: 12.0,
            mood_grid_min: 20,
            mood_grid_max: 30,
            timeline_min_entries: 15,
            timeline_max_entries: 20,
            backfill_radius_secs: 12.0,
            filler_radius_secs: 8.0,
            timeline_dedupe_radius_secs: 1.0,
        }
    }
}

impl CuratorConfig {
    /// Create config from environment variables, falling back to defaults.
    ///
    /// Only the operational knobs are exposed; the per-class pre-rolls and
    /// clip lengths are product decisions, not deployment ones.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            budget_secs: std::env::var("WREEL_BUDGET_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.budget_secs),
            ceiling_secs: std::env::var("WREEL_CEILING_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.ceiling_secs),
            merge_tolerance_secs: std::env::var("WREEL_MERGE_TOLERANCE_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.merge_tolerance_secs),
            ..defaults
        }
    }

    /// Config for a shorter teaser reel.
    pub fn teaser() -> Self {
        Self {
            budget_secs: 45.0,
            ceiling_secs: 50.0,
            ..Default::default()
        }
    }

    /// Validate internal consistency.
    pub fn validate(&self) -> Result<(), String> {
        if !self.budget_secs.is_finite() || self.budget_secs <= 0.0 {
            return Err("Budget must be a positive number of seconds".to_string());
        }

        if self.ceiling_secs < self.budget_secs {
            return Err(format!(
                "Ceiling ({}s) must be at least the budget ({}s)",
                self.ceiling_secs, self.budget_secs
            ));
        }

        if self.merge_tolerance_secs < 0.0 {
            return Err("Merge tolerance cannot be negative".to_string());
        }

        if self.mood_grid_min < 2 || self.mood_grid_min > self.mood_grid_max {
            return Err(format!(
                "Mood grid bounds are inconsistent: min {}, max {}",
                self.mood_grid_min, self.mood_grid_max
            ));
        }

        if self.timeline_min_entries > self.timeline_max_entries {
            return Err(format!(
                "Timeline bounds are inconsistent: min {}, max {}",
                self.timeline_min_entries, self.timeline_max_entries
            ));
        }

        Ok(())
    }
}
