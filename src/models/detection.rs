use std::sync::Arc;

use serde::{Deserialize, Serialize};

/// Axis-aligned face bounding box in frame pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoundingBox {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl BoundingBox {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn center(&self) -> (f64, f64) {
        (self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    /// Euclidean distance between the centers of two boxes.
    pub fn center_distance(&self, other: &BoundingBox) -> f64 {
        let (ax, ay) = self.center();
        let (bx, by) = other.center();
        ((ax - bx).powi(2) + (ay - by).powi(2)).sqrt()
    }
}

/// One emotion label with its detector-reported intensity, clamped to [0, 100].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmotionScore {
    pub label: String,
    pub intensity: f64,
}

impl EmotionScore {
    pub fn new(label: impl Into<String>, intensity: f64) -> Self {
        Self {
            label: label.into(),
            intensity: intensity.clamp(0.0, 100.0),
        }
    }
}

/// A single detector output for one frame. Ephemeral: produced and consumed
/// within one tick, never persisted.
#[derive(Debug, Clone)]
pub struct RawDetection {
    pub bounding_box: BoundingBox,
    /// Per-emotion intensities, absent when the detector only localized a face.
    pub emotions: Option<Vec<EmotionScore>>,
    /// Milliseconds since capture start, stamped by the capture source.
    pub timestamp_ms: u64,
}

/// A frame handle from the capture source. Pixel data is shared, not copied,
/// so dropping the handle on session stop releases the underlying buffer.
#[derive(Debug, Clone)]
pub struct VideoFrame {
    pub timestamp_ms: u64,
    pub width: u32,
    pub height: u32,
    pub data: Arc<Vec<u8>>,
}

impl VideoFrame {
    pub fn new(timestamp_ms: u64, width: u32, height: u32, data: Vec<u8>) -> Self {
        Self {
            timestamp_ms,
            width,
            height,
            data: Arc::new(data),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn center_distance_is_symmetric() {
        let a = BoundingBox::new(0.0, 0.0, 100.0, 100.0);
        let b = BoundingBox::new(30.0, 40.0, 100.0, 100.0);
        assert!((a.center_distance(&b) - 50.0).abs() < f64::EPSILON);
        assert!((b.center_distance(&a) - 50.0).abs() < f64::EPSILON);
    }

    #[test]
    fn emotion_score_clamps_intensity() {
        assert_eq!(EmotionScore::new("happy", 130.0).intensity, 100.0);
        assert_eq!(EmotionScore::new("sad", -5.0).intensity, 0.0);
    }
}
