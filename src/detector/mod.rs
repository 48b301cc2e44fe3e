//! Boundary traits for the external face/emotion detector and the capture
//! source. The engine treats both as black boxes: a detector turns a frame
//! into zero or more raw detections, a frame source supplies frames at
//! whatever rate the capture hardware manages.

use thiserror::Error;

use crate::models::{RawDetection, VideoFrame};

#[derive(Debug, Error)]
pub enum DetectorError {
    /// No model is loaded. At session start this is surfaced to the caller as
    /// a persistent error; per-frame it degrades to "no detection".
    #[error("no detector model is loaded")]
    ModelNotLoaded,

    #[error("frame decode failed: {0}")]
    FrameDecode(String),

    #[error("detector backend failure: {0}")]
    Backend(String),
}

/// Per-frame classifier boundary. Implementations wrap whatever model the
/// host application ships; the engine only sees uniform raw detections.
pub trait FaceDetector: Send {
    /// Cheap readiness probe, called once before a session starts. A failure
    /// here keeps the pipeline in a visibly degraded state instead of
    /// silently producing meaningless data.
    fn ensure_ready(&self) -> Result<(), DetectorError>;

    /// Detect faces and emotion scores in one frame. Returning an empty Vec
    /// means "no face this frame" and is not an error.
    fn detect(&mut self, frame: &VideoFrame) -> Result<Vec<RawDetection>, DetectorError>;
}

/// Pull contract for video frames, decoupled from any UI runtime. `None`
/// means no frame is available this tick, never an error; the engine must
/// not assume a fixed delta between frames.
pub trait FrameSource: Send {
    fn next_frame(&mut self) -> Option<VideoFrame>;
}
