use std::collections::HashMap;

use super::{IntensityClassification, IntensityLevel, ThresholdTier};

/// Default tier boundaries shared by the built-in labels, scanned top-down.
/// `VeryLow` is the unconditional fallback.
const DEFAULT_THRESHOLDS: [(IntensityLevel, f64); 5] = [
    (IntensityLevel::VeryHigh, 90.0),
    (IntensityLevel::High, 70.0),
    (IntensityLevel::Moderate, 40.0),
    (IntensityLevel::Low, 15.0),
    (IntensityLevel::VeryLow, 0.0),
];

/// Per-label threshold tables. Static configuration: looked up at runtime,
/// never mutated by the pipeline.
#[derive(Debug, Clone)]
pub struct ClassifierRules {
    tables: HashMap<String, Vec<ThresholdTier>>,
}

impl Default for ClassifierRules {
    fn default() -> Self {
        let mut rules = Self::empty();
        rules.set_default_table(
            "happy",
            [
                ("Overwhelming delight", "Viewers were visibly thrilled throughout this stretch."),
                ("Strong enjoyment", "Clear positive engagement with frequent smiling responses."),
                ("Mild amusement", "A warm but measured positive response."),
                ("Faint positivity", "Occasional flickers of enjoyment, nothing sustained."),
                ("No positive response", "Little to no visible enjoyment registered."),
            ],
        );
        rules.set_default_table(
            "sad",
            [
                ("Deep sadness", "Viewers appeared strongly moved or downcast."),
                ("Marked sadness", "A clearly somber emotional response."),
                ("Noticeable melancholy", "Intermittent signs of a subdued mood."),
                ("Slight wistfulness", "Brief, mild hints of sadness."),
                ("No sadness", "No meaningful sad response registered."),
            ],
        );
        rules.set_default_table(
            "angry",
            [
                ("Intense frustration", "Viewers reacted with strong visible irritation."),
                ("Clear annoyance", "A pronounced negative, agitated response."),
                ("Mild irritation", "Occasional signs of displeasure."),
                ("Faint tension", "Barely perceptible friction in the response."),
                ("No anger", "No irritated response registered."),
            ],
        );
        rules.set_default_table(
            "fearful",
            [
                ("Acute alarm", "Viewers showed strong startle or anxiety responses."),
                ("Marked unease", "A clearly anxious, on-edge response."),
                ("Noticeable apprehension", "Intermittent wariness toward the content."),
                ("Slight nervousness", "Brief, mild hints of tension."),
                ("No fear response", "No anxious response registered."),
            ],
        );
        rules.set_default_table(
            "disgusted",
            [
                ("Strong aversion", "Viewers visibly recoiled from the content."),
                ("Clear distaste", "A pronounced negative, repelled response."),
                ("Mild distaste", "Occasional signs of discomfort."),
                ("Faint discomfort", "Barely perceptible aversion."),
                ("No aversion", "No repelled response registered."),
            ],
        );
        rules.set_default_table(
            "surprised",
            [
                ("Complete astonishment", "Viewers were repeatedly caught off guard."),
                ("Strong surprise", "Clear startle and raised-attention responses."),
                ("Moderate surprise", "The content produced some unexpected moments."),
                ("Mild curiosity", "Slightly raised attention without real surprise."),
                ("No surprise", "Nothing appeared to catch viewers off guard."),
            ],
        );
        rules.set_default_table(
            "neutral",
            [
                ("Fully impassive", "Viewers stayed almost entirely expressionless."),
                ("Largely neutral", "Attention without much emotional movement."),
                ("Even-keeled", "A balanced, low-arousal viewing state."),
                ("Slightly neutral", "Neutral stretches between stronger reactions."),
                ("Rarely neutral", "Viewers were almost never at rest."),
            ],
        );
        rules
    }
}

impl ClassifierRules {
    /// No tables configured; every classification returns `None`.
    pub fn empty() -> Self {
        Self {
            tables: HashMap::new(),
        }
    }

    /// Install a table for `label` using the default thresholds and the given
    /// per-tier texts, highest tier first.
    pub fn set_default_table(&mut self, label: &str, texts: [(&str, &str); 5]) {
        let tiers = DEFAULT_THRESHOLDS
            .iter()
            .zip(texts.iter())
            .map(|(&(level, threshold), &(summary, description))| ThresholdTier {
                level,
                threshold,
                summary: summary.to_string(),
                description: description.to_string(),
            })
            .collect();
        self.set_table(label, tiers);
    }

    /// Install a custom table for `label`. Tiers are kept in descending
    /// threshold order regardless of input order.
    pub fn set_table(&mut self, label: &str, mut tiers: Vec<ThresholdTier>) {
        tiers.sort_by(|a, b| {
            b.threshold
                .partial_cmp(&a.threshold)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        self.tables.insert(label.to_string(), tiers);
    }

    /// Map an intensity to its qualitative tier for `label`. First-match-wins
    /// from the highest tier down, `>=` on the threshold. Unknown labels
    /// return `None`; the lowest tier catches anything that slips past the
    /// configured thresholds.
    pub fn classify(&self, label: &str, intensity: f64) -> Option<IntensityClassification> {
        let tiers = self.tables.get(label)?;
        let tier = tiers
            .iter()
            .find(|tier| intensity >= tier.threshold)
            .or_else(|| tiers.last())?;
        Some(IntensityClassification {
            level: tier.level,
            summary: tier.summary.clone(),
            description: tier.description.clone(),
        })
    }

    pub fn has_label(&self, label: &str) -> bool {
        self.tables.contains_key(label)
    }
}
