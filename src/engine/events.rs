use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::aggregation::TimeBucket;
use crate::models::{BoundingBox, EmotionSample, TrackingSession};
use crate::narrative::{OverallAnalysis, TimelineEntry};

/// Per-tick signal for the presentation layer.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FrameUpdate {
    pub timestamp_ms: u64,
    /// Live-track count after this frame.
    pub face_count: usize,
    /// True while at least one track has a stabilized `Present` state.
    pub stable_face_detected: bool,
    pub boxes: Vec<BoundingBox>,
    /// The first sample accepted this frame, when the detector produced
    /// emotion scores.
    pub current_sample: Option<EmotionSample>,
}

/// Everything a completed session hands off for storage or display. The
/// engine performs no I/O itself; subscribers persist this verbatim.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionOutcome {
    pub session: TrackingSession,
    /// Raw per-subject sample sequences, in key order.
    pub sequences: Vec<Vec<EmotionSample>>,
    pub rejected_samples: u64,
    pub buckets: Vec<TimeBucket>,
    pub timeline: Vec<TimelineEntry>,
    pub overall: OverallAnalysis,
}

/// The single typed event stream the engine publishes. One broadcast,
/// fanned out to however many subscribers care (presentation, persistence);
/// no result threading through intermediate layers.
#[derive(Debug, Clone)]
pub enum EngineEvent {
    Frame(FrameUpdate),
    SessionClosed(Arc<SessionOutcome>),
}
