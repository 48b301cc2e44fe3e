use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::config::AggregationConfig;
use crate::models::EmotionSample;

/// One fixed-width interval of merged samples. Derived data: recomputed from
/// a snapshot, never mutated in place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeBucket {
    #[serde(rename = "startTimestamp")]
    pub start_ms: u64,
    #[serde(rename = "bucketWidthMs")]
    pub width_ms: u64,
    /// Mean intensity per label, over only the samples that reported that
    /// label.
    #[serde(rename = "perEmotionAverageIntensity")]
    pub average_intensity: BTreeMap<String, f64>,
    #[serde(rename = "dominantEmotion")]
    pub dominant_emotion: String,
    #[serde(rename = "sampleCount")]
    pub sample_count: usize,
}

#[derive(Default)]
struct BucketAccumulator {
    /// Sum and count per label; a label missing from a sample is excluded
    /// from that label's mean, not treated as zero.
    totals: BTreeMap<String, (f64, usize)>,
    /// Labels in first-seen order, the documented dominant-emotion
    /// tie-break.
    label_order: Vec<String>,
    sample_count: usize,
}

impl BucketAccumulator {
    fn add(&mut self, sample: &EmotionSample) {
        self.sample_count += 1;
        for score in &sample.emotions {
            if !self.totals.contains_key(&score.label) {
                self.label_order.push(score.label.clone());
            }
            let entry = self.totals.entry(score.label.clone()).or_insert((0.0, 0));
            entry.0 += score.intensity;
            entry.1 += 1;
        }
    }

    fn finish(self, start_ms: u64, width_ms: u64) -> TimeBucket {
        let average_intensity: BTreeMap<String, f64> = self
            .totals
            .iter()
            .map(|(label, (sum, count))| (label.clone(), sum / *count as f64))
            .collect();

        // Highest mean wins; ties go to the label seen first in this bucket.
        let mut dominant_emotion = String::new();
        let mut best = f64::NEG_INFINITY;
        for label in &self.label_order {
            let mean = average_intensity[label];
            if mean > best {
                best = mean;
                dominant_emotion = label.clone();
            }
        }

        TimeBucket {
            start_ms,
            width_ms,
            average_intensity,
            dominant_emotion,
            sample_count: self.sample_count,
        }
    }
}

/// Merge any number of sample sequences into sorted, sparse time buckets.
/// Samples carrying no emotion scores contribute nothing and are skipped;
/// an empty input yields an empty Vec.
pub fn aggregate(sequences: &[Vec<EmotionSample>], config: &AggregationConfig) -> Vec<TimeBucket> {
    let width_ms = config.bucket_width_ms.max(1);
    let mut accumulators: BTreeMap<u64, BucketAccumulator> = BTreeMap::new();

    for sequence in sequences {
        for sample in sequence {
            if sample.emotions.is_empty() {
                continue;
            }
            let boundary = sample.timestamp_ms - sample.timestamp_ms % width_ms;
            accumulators.entry(boundary).or_default().add(sample);
        }
    }

    accumulators
        .into_iter()
        .map(|(start_ms, accumulator)| accumulator.finish(start_ms, width_ms))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::EmotionScore;

    fn sample(timestamp_ms: u64, scores: &[(&str, f64)]) -> EmotionSample {
        EmotionSample::from_scores(
            timestamp_ms,
            scores
                .iter()
                .map(|(label, intensity)| EmotionScore::new(*label, *intensity))
                .collect(),
        )
    }

    fn config(width: u64) -> AggregationConfig {
        AggregationConfig {
            bucket_width_ms: width,
        }
    }

    #[test]
    fn empty_input_yields_no_buckets() {
        assert!(aggregate(&[], &config(1000)).is_empty());
        assert!(aggregate(&[Vec::new()], &config(1000)).is_empty());
    }

    #[test]
    fn averages_two_viewers_per_bucket() {
        // Two disjoint single-viewer sequences merge into per-bucket means.
        let a = vec![
            sample(0, &[("happy", 80.0)]),
            sample(1000, &[("happy", 40.0)]),
        ];
        let b = vec![
            sample(0, &[("happy", 60.0)]),
            sample(1000, &[("happy", 20.0)]),
        ];

        let buckets = aggregate(&[a, b], &config(1000));
        assert_eq!(buckets.len(), 2);
        assert_eq!(buckets[0].start_ms, 0);
        assert_eq!(buckets[0].average_intensity["happy"], 70.0);
        assert_eq!(buckets[1].start_ms, 1000);
        assert_eq!(buckets[1].average_intensity["happy"], 30.0);
        assert_eq!(buckets[0].sample_count, 2);
    }

    #[test]
    fn aggregation_is_idempotent() {
        let sequences = vec![
            vec![
                sample(100, &[("happy", 55.0), ("neutral", 30.0)]),
                sample(1100, &[("sad", 20.0)]),
            ],
            vec![sample(450, &[("happy", 65.0)])],
        ];
        let first = aggregate(&sequences, &config(1000));
        let second = aggregate(&sequences, &config(1000));
        assert_eq!(first, second);
    }

    #[test]
    fn merged_aggregation_matches_weighted_mean_of_parts() {
        let a = vec![
            sample(0, &[("happy", 90.0)]),
            sample(200, &[("happy", 70.0)]),
            sample(400, &[("happy", 50.0)]),
        ];
        let b = vec![sample(100, &[("happy", 10.0)])];

        let merged = aggregate(&[a.clone(), b.clone()], &config(1000));
        let only_a = aggregate(&[a], &config(1000));
        let only_b = aggregate(&[b], &config(1000));

        let expected = (only_a[0].average_intensity["happy"] * 3.0
            + only_b[0].average_intensity["happy"])
            / 4.0;
        assert!((merged[0].average_intensity["happy"] - expected).abs() < 1e-9);
        assert_eq!(merged[0].sample_count, 4);
    }

    #[test]
    fn missing_label_is_excluded_from_mean_not_zeroed() {
        let sequences = vec![vec![
            sample(0, &[("happy", 80.0), ("surprised", 20.0)]),
            sample(500, &[("happy", 40.0)]),
        ]];
        let buckets = aggregate(&sequences, &config(1000));
        assert_eq!(buckets[0].average_intensity["happy"], 60.0);
        // Only one sample reported "surprised": mean is 20, not 10.
        assert_eq!(buckets[0].average_intensity["surprised"], 20.0);
    }

    #[test]
    fn dominant_is_highest_mean_with_first_seen_tie_break() {
        let sequences = vec![vec![sample(0, &[("surprised", 50.0), ("happy", 50.0)])]];
        let buckets = aggregate(&sequences, &config(1000));
        assert_eq!(buckets[0].dominant_emotion, "surprised");

        let sequences = vec![vec![sample(0, &[("neutral", 30.0), ("angry", 45.0)])]];
        let buckets = aggregate(&sequences, &config(1000));
        assert_eq!(buckets[0].dominant_emotion, "angry");
    }

    #[test]
    fn buckets_are_sparse_and_sorted() {
        let sequences = vec![vec![
            sample(0, &[("happy", 10.0)]),
            sample(5200, &[("happy", 20.0)]),
        ]];
        let buckets = aggregate(&sequences, &config(1000));
        assert_eq!(buckets.len(), 2);
        assert_eq!(buckets[0].start_ms, 0);
        assert_eq!(buckets[1].start_ms, 5000);
    }

    #[test]
    fn bucket_serializes_with_wire_field_names() {
        let buckets = aggregate(
            &[vec![sample(0, &[("happy", 80.0)])]],
            &config(1000),
        );
        let value = serde_json::to_value(&buckets[0]).unwrap();
        assert_eq!(value["startTimestamp"], 0);
        assert_eq!(value["bucketWidthMs"], 1000);
        assert_eq!(value["dominantEmotion"], "happy");
        assert_eq!(value["sampleCount"], 1);
        assert_eq!(value["perEmotionAverageIntensity"]["happy"], 80.0);
    }

    #[test]
    fn emotionless_samples_are_skipped() {
        let sequences = vec![vec![EmotionSample {
            timestamp_ms: 0,
            emotions: Vec::new(),
            dominant_emotion: String::new(),
            face_detected: false,
        }]];
        assert!(aggregate(&sequences, &config(1000)).is_empty());
    }
}
