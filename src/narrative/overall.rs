use serde::{Deserialize, Serialize};

use crate::aggregation::TimeBucket;
use crate::classifier::ClassifierRules;
use crate::config::NarrativeConfig;

use super::format_timestamp;

/// Whole-session qualitative analysis. Recomputed on demand from the full
/// bucket set, never incrementally patched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OverallAnalysis {
    pub primary_response: String,
    pub emotional_pattern: String,
    pub notable_observation: String,
    /// Top-N labels by mean intensity across all buckets.
    pub dominant_emotions: Vec<String>,
    /// False when no samples were captured; the text fields then carry
    /// explicit "no data" statements rather than being absent.
    pub has_data: bool,
}

impl OverallAnalysis {
    fn no_data() -> Self {
        Self {
            primary_response: "No emotional response data was captured.".to_string(),
            emotional_pattern: "No emotional arc is available for this session.".to_string(),
            notable_observation: "Nothing notable was recorded.".to_string(),
            dominant_emotions: Vec::new(),
            has_data: false,
        }
    }
}

/// Build the overall analysis from the full bucket set. All three narrative
/// fields are deterministic templates selected from the classified
/// session-wide dominant emotions.
pub fn build_overall(
    buckets: &[TimeBucket],
    rules: &ClassifierRules,
    config: &NarrativeConfig,
) -> OverallAnalysis {
    if buckets.is_empty() {
        return OverallAnalysis::no_data();
    }

    // Session-wide mean per label over the buckets reporting it, in
    // first-seen order so equal means resolve deterministically.
    let mut order: Vec<&str> = Vec::new();
    for bucket in buckets {
        for label in bucket.average_intensity.keys() {
            if !order.contains(&label.as_str()) {
                order.push(label);
            }
        }
    }
    let mut means: Vec<(&str, f64)> = order
        .iter()
        .map(|label| {
            let (sum, count) = buckets
                .iter()
                .filter_map(|bucket| bucket.average_intensity.get(*label))
                .fold((0.0, 0usize), |(sum, count), mean| (sum + mean, count + 1));
            (*label, sum / count.max(1) as f64)
        })
        .collect();
    means.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
    means.truncate(config.top_n);

    let dominant_emotions: Vec<String> =
        means.iter().map(|(label, _)| label.to_string()).collect();

    let primary_response = match means.first() {
        Some((label, mean)) => match rules.classify(label, *mean) {
            Some(c) => format!("Viewers responded primarily with {}. {}", label, c.description),
            None => format!("Viewers responded primarily with {}.", label),
        },
        None => "No emotional response stood out.".to_string(),
    };

    OverallAnalysis {
        primary_response,
        emotional_pattern: pattern_text(buckets),
        notable_observation: observation_text(buckets, rules),
        dominant_emotions,
        has_data: true,
    }
}

/// Compare first-half and second-half mean intensity to name the arc.
fn pattern_text(buckets: &[TimeBucket]) -> String {
    if buckets.len() < 2 {
        return "The session was too short to show an emotional arc.".to_string();
    }

    let distinct_dominants = {
        let mut seen: Vec<&str> = Vec::new();
        for bucket in buckets {
            if !seen.contains(&bucket.dominant_emotion.as_str()) {
                seen.push(&bucket.dominant_emotion);
            }
        }
        seen.len()
    };
    if distinct_dominants >= 3 {
        return "Responses shifted between several dominant emotions over the session."
            .to_string();
    }

    let mid = buckets.len() / 2;
    let first = mean_bucket_intensity(&buckets[..mid]);
    let second = mean_bucket_intensity(&buckets[mid..]);

    if second > first * 1.15 {
        "Emotional intensity built as the session progressed.".to_string()
    } else if second < first * 0.85 {
        "Emotional intensity tapered off after an early peak.".to_string()
    } else {
        "Emotional intensity held steady across the session.".to_string()
    }
}

fn mean_bucket_intensity(buckets: &[TimeBucket]) -> f64 {
    if buckets.is_empty() {
        return 0.0;
    }
    let total: f64 = buckets
        .iter()
        .filter_map(|bucket| {
            bucket
                .average_intensity
                .get(&bucket.dominant_emotion)
                .copied()
        })
        .sum();
    total / buckets.len() as f64
}

/// Call out the single strongest peak, when one classified High or above.
fn observation_text(buckets: &[TimeBucket], rules: &ClassifierRules) -> String {
    let mut peak: Option<(&TimeBucket, &str, f64)> = None;
    for bucket in buckets {
        for (label, mean) in &bucket.average_intensity {
            let notable = rules
                .classify(label, *mean)
                .is_some_and(|c| c.level.is_notable());
            if !notable {
                continue;
            }
            match peak {
                Some((_, _, best)) if *mean <= best => {}
                _ => peak = Some((bucket, label, *mean)),
            }
        }
    }

    match peak {
        Some((bucket, label, _)) => format!(
            "{} peaked at {}.",
            capitalize(label),
            format_timestamp(bucket.start_ms)
        ),
        None => "No strongly elevated emotional moments stood out.".to_string(),
    }
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}
