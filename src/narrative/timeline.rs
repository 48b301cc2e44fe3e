use serde::{Deserialize, Serialize};

use crate::aggregation::TimeBucket;
use crate::classifier::{ClassifierRules, IntensityLevel};
use crate::config::NarrativeConfig;

use super::format_timestamp;

/// One discrete emotional moment on the session timeline. Derived from a run
/// of adjacent buckets sharing the same dominant emotion at the same
/// classified level; ordering is timestamp-ascending and stable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimelineEntry {
    /// Run start formatted `m:ss` from session start.
    pub timestamp: String,
    /// Classified level tag of the run's dominant emotion.
    pub state: String,
    pub description: String,
    /// Top-N labels by mean intensity within the run.
    pub dominant_emotions: Vec<String>,
    /// Set when at least one dominant label classified High or VeryHigh.
    pub notable_emotions: bool,
}

/// A run of adjacent buckets that reads as one moment.
struct BucketRun<'a> {
    start_ms: u64,
    dominant: &'a str,
    level: Option<IntensityLevel>,
    buckets: Vec<&'a TimeBucket>,
}

/// Build the chronological timeline. Buckets arrive sorted from the
/// aggregator; adjacent buckets with the same dominant emotion and the same
/// classified level merge into a single entry.
pub fn build_timeline(
    buckets: &[TimeBucket],
    rules: &ClassifierRules,
    config: &NarrativeConfig,
) -> Vec<TimelineEntry> {
    let mut runs: Vec<BucketRun> = Vec::new();

    for bucket in buckets {
        let level = rules
            .classify(
                &bucket.dominant_emotion,
                dominant_mean(bucket).unwrap_or(0.0),
            )
            .map(|c| c.level);

        match runs.last_mut() {
            Some(run) if run.dominant == bucket.dominant_emotion && run.level == level => {
                run.buckets.push(bucket);
            }
            _ => runs.push(BucketRun {
                start_ms: bucket.start_ms,
                dominant: &bucket.dominant_emotion,
                level,
                buckets: vec![bucket],
            }),
        }
    }

    runs.into_iter()
        .map(|run| entry_for_run(run, rules, config))
        .collect()
}

fn entry_for_run(run: BucketRun, rules: &ClassifierRules, config: &NarrativeConfig) -> TimelineEntry {
    // Per-label mean across the run's buckets, over buckets reporting the
    // label; label order follows first appearance within the run.
    let mut order: Vec<&str> = Vec::new();
    for bucket in &run.buckets {
        for label in bucket.average_intensity.keys() {
            if !order.contains(&label.as_str()) {
                order.push(label);
            }
        }
    }
    let mut means: Vec<(&str, f64)> = order
        .iter()
        .map(|label| {
            let (sum, count) = run
                .buckets
                .iter()
                .filter_map(|bucket| bucket.average_intensity.get(*label))
                .fold((0.0, 0usize), |(sum, count), mean| (sum + mean, count + 1));
            (*label, sum / count.max(1) as f64)
        })
        .collect();
    means.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
    means.truncate(config.top_n);

    let notable_emotions = means.iter().any(|(label, mean)| {
        rules
            .classify(label, *mean)
            .is_some_and(|c| c.level.is_notable())
    });

    let dominant_mean = means
        .iter()
        .find(|(label, _)| *label == run.dominant)
        .map(|(_, mean)| *mean)
        .unwrap_or(0.0);
    let classification = rules.classify(run.dominant, dominant_mean);

    TimelineEntry {
        timestamp: format_timestamp(run.start_ms),
        state: classification
            .as_ref()
            .map(|c| c.level.as_str().to_string())
            .unwrap_or_else(|| "unknown".to_string()),
        description: classification
            .map(|c| c.description)
            .unwrap_or_default(),
        dominant_emotions: means.into_iter().map(|(label, _)| label.to_string()).collect(),
        notable_emotions,
    }
}

/// Mean intensity of the bucket's own dominant label.
fn dominant_mean(bucket: &TimeBucket) -> Option<f64> {
    bucket
        .average_intensity
        .get(&bucket.dominant_emotion)
        .copied()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn bucket(start_ms: u64, scores: &[(&str, f64)]) -> TimeBucket {
        let average_intensity: BTreeMap<String, f64> = scores
            .iter()
            .map(|(label, mean)| (label.to_string(), *mean))
            .collect();
        let dominant_emotion = scores
            .iter()
            .fold(("", f64::NEG_INFINITY), |best, (label, mean)| {
                if *mean > best.1 {
                    (label, *mean)
                } else {
                    best
                }
            })
            .0
            .to_string();
        TimeBucket {
            start_ms,
            width_ms: 1000,
            average_intensity,
            dominant_emotion,
            sample_count: 1,
        }
    }

    #[test]
    fn one_entry_per_distinct_bucket() {
        let buckets = vec![
            bucket(0, &[("happy", 80.0), ("neutral", 20.0)]),
            bucket(1000, &[("surprised", 95.0)]),
        ];
        let entries = build_timeline(
            &buckets,
            &ClassifierRules::default(),
            &NarrativeConfig::default(),
        );
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].timestamp, "0:00");
        assert_eq!(entries[0].state, "high");
        assert_eq!(entries[0].dominant_emotions[0], "happy");
        assert_eq!(entries[1].timestamp, "0:01");
        assert_eq!(entries[1].state, "veryHigh");
    }

    #[test]
    fn similar_adjacent_buckets_merge_into_one_run() {
        let buckets = vec![
            bucket(0, &[("happy", 75.0)]),
            bucket(1000, &[("happy", 82.0)]),
            bucket(2000, &[("happy", 71.0)]),
            bucket(3000, &[("sad", 45.0)]),
        ];
        let entries = build_timeline(
            &buckets,
            &ClassifierRules::default(),
            &NarrativeConfig::default(),
        );
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].timestamp, "0:00");
        assert_eq!(entries[0].state, "high");
        assert_eq!(entries[1].timestamp, "0:03");
        assert_eq!(entries[1].state, "moderate");
    }

    #[test]
    fn same_dominant_at_different_level_does_not_merge() {
        let buckets = vec![
            bucket(0, &[("happy", 50.0)]),
            bucket(1000, &[("happy", 95.0)]),
        ];
        let entries = build_timeline(
            &buckets,
            &ClassifierRules::default(),
            &NarrativeConfig::default(),
        );
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].state, "moderate");
        assert_eq!(entries[1].state, "veryHigh");
    }

    #[test]
    fn notable_flag_tracks_high_levels() {
        let buckets = vec![
            bucket(0, &[("happy", 30.0), ("neutral", 25.0)]),
            bucket(1000, &[("angry", 85.0)]),
        ];
        let entries = build_timeline(
            &buckets,
            &ClassifierRules::default(),
            &NarrativeConfig::default(),
        );
        assert!(!entries[0].notable_emotions);
        assert!(entries[1].notable_emotions);
    }

    #[test]
    fn dominant_emotions_are_capped_at_top_n() {
        let buckets = vec![bucket(
            0,
            &[
                ("happy", 80.0),
                ("surprised", 60.0),
                ("neutral", 40.0),
                ("sad", 20.0),
            ],
        )];
        let entries = build_timeline(
            &buckets,
            &ClassifierRules::default(),
            &NarrativeConfig { top_n: 2 },
        );
        assert_eq!(entries[0].dominant_emotions, vec!["happy", "surprised"]);
    }

    #[test]
    fn unknown_label_degrades_to_empty_narrative() {
        let buckets = vec![bucket(0, &[("confused", 88.0)])];
        let entries = build_timeline(
            &buckets,
            &ClassifierRules::default(),
            &NarrativeConfig::default(),
        );
        assert_eq!(entries[0].state, "unknown");
        assert!(entries[0].description.is_empty());
    }

    #[test]
    fn empty_buckets_yield_empty_timeline() {
        let entries = build_timeline(
            &[],
            &ClassifierRules::default(),
            &NarrativeConfig::default(),
        );
        assert!(entries.is_empty());
    }
}
