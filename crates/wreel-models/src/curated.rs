//! Curation output bundle.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::annotations::{WalkAnnotations, WalkId};
use crate::segment::{HighlightReel, ReelStats};
use crate::signals::{MoodSample, TimelineItem};

/// Everything one curation pass produces for a walk.
///
/// The reel is the cut list handed to the extraction stage; the rewritten
/// annotations and the normalized signal pairs are handed to playback.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct CuratedWalk {
    /// Walk this output belongs to
    pub walk_id: WalkId,

    /// Final cut list on the original walk clock
    pub reel: HighlightReel,

    /// Summary statistics for the reel
    pub stats: ReelStats,

    /// Input annotations with timestamps rewritten onto the reel clock
    pub annotations: WalkAnnotations,

    /// Normalized mood curve on the original walk clock
    pub mood: Vec<MoodSample>,

    /// Mood curve restricted to instants retained in the reel
    pub mood_reel: Vec<MoodSample>,

    /// Normalized activity timeline on the original walk clock
    pub timeline: Vec<TimelineItem>,

    /// Activity timeline restricted to instants retained in the reel
    pub timeline_reel: Vec<TimelineItem>,
}
