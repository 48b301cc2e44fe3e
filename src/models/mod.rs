pub mod detection;
pub mod sample;
pub mod session;

pub use detection::{BoundingBox, EmotionScore, RawDetection, VideoFrame};
pub use sample::{dominant_label, EmotionSample};
pub use session::{SessionStatus, TrackingSession};
