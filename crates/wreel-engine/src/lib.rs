#![deny(unreachable_patterns)]
//! Highlight reel curation for WalkReel.
//!
//! This crate turns one walk's raw annotations into a bounded highlight
//! reel plus everything playback needs to seek inside it:
//! - Signal normalization (mood grid, activity timeline)
//! - Candidate merging and per-class coverage guarantees
//! - Greedy budget trimming with safety and companion exceptions
//! - Reel-time mapping and in-place annotation rewriting
//!
//! The engine is pure and deterministic: no I/O, no shared state, same
//! input always gives the same reel.

pub mod config;
pub mod coverage;
pub mod fallback;
pub mod merge;
pub mod normalize;
pub mod pipeline;
pub mod remap;
pub mod trim;

pub use config::CuratorConfig;
pub use coverage::{
    ensure_companion_coverage, ensure_feeding_coverage, ensure_safety_coverage,
    ensure_scenery_coverage,
};
pub use fallback::restore_scenery_coverage;
pub use merge::merge_segments;
pub use normalize::{normalize_mood, normalize_timeline};
pub use pipeline::WalkCurator;
pub use remap::{filter_mood, filter_timeline, reel_time, rewrite_annotations};
pub use trim::{trim_candidates, trim_final};
