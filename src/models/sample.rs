use serde::{Deserialize, Serialize};

use super::detection::EmotionScore;

/// One timestamped emotion reading attributed to a single subject.
/// Immutable once appended to a sequence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmotionSample {
    /// Milliseconds since session start.
    pub timestamp_ms: u64,
    pub emotions: Vec<EmotionScore>,
    pub dominant_emotion: String,
    pub face_detected: bool,
}

impl EmotionSample {
    /// Build a sample from detector scores. The dominant emotion is the label
    /// with the highest intensity; ties go to the earlier label.
    pub fn from_scores(timestamp_ms: u64, emotions: Vec<EmotionScore>) -> Self {
        let dominant_emotion = dominant_label(&emotions).unwrap_or_default();
        Self {
            timestamp_ms,
            emotions,
            dominant_emotion,
            face_detected: true,
        }
    }
}

/// Label with the maximum intensity, first-seen order breaking ties.
pub fn dominant_label(emotions: &[EmotionScore]) -> Option<String> {
    let mut best: Option<&EmotionScore> = None;
    for score in emotions {
        match best {
            Some(current) if score.intensity <= current.intensity => {}
            _ => best = Some(score),
        }
    }
    best.map(|score| score.label.clone())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dominant_picks_highest_intensity() {
        let sample = EmotionSample::from_scores(
            0,
            vec![
                EmotionScore::new("neutral", 40.0),
                EmotionScore::new("happy", 75.0),
                EmotionScore::new("sad", 10.0),
            ],
        );
        assert_eq!(sample.dominant_emotion, "happy");
        assert!(sample.face_detected);
    }

    #[test]
    fn dominant_tie_goes_to_first_seen() {
        let scores = vec![
            EmotionScore::new("surprised", 50.0),
            EmotionScore::new("happy", 50.0),
        ];
        assert_eq!(dominant_label(&scores).as_deref(), Some("surprised"));
    }

    #[test]
    fn dominant_of_empty_is_none() {
        assert_eq!(dominant_label(&[]), None);
    }
}
