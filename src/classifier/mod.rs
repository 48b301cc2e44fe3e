//! Rule-engine classification of numeric emotion intensity into qualitative
//! narrative tiers. Lookup scans each label's threshold table from the
//! highest tier down, first match wins, and an intensity equal to a
//! threshold meets it. Labels with no configured table produce no narrative
//! at all; callers treat that as "nothing to say", not an error.

pub mod rules;

pub use rules::ClassifierRules;

use serde::{Deserialize, Serialize};

/// Ordered qualitative intensity tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum IntensityLevel {
    VeryLow,
    Low,
    Moderate,
    High,
    VeryHigh,
}

impl IntensityLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            IntensityLevel::VeryLow => "veryLow",
            IntensityLevel::Low => "low",
            IntensityLevel::Moderate => "moderate",
            IntensityLevel::High => "high",
            IntensityLevel::VeryHigh => "veryHigh",
        }
    }

    /// Levels worth calling out in a narrative.
    pub fn is_notable(&self) -> bool {
        matches!(self, IntensityLevel::High | IntensityLevel::VeryHigh)
    }
}

/// One threshold rule: met when intensity >= threshold.
#[derive(Debug, Clone)]
pub struct ThresholdTier {
    pub level: IntensityLevel,
    pub threshold: f64,
    pub summary: String,
    pub description: String,
}

/// Result of classifying one (label, intensity) pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IntensityClassification {
    pub level: IntensityLevel,
    pub summary: String,
    pub description: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn levels_are_ordered() {
        assert!(IntensityLevel::VeryLow < IntensityLevel::Low);
        assert!(IntensityLevel::Moderate < IntensityLevel::High);
        assert!(IntensityLevel::High < IntensityLevel::VeryHigh);
    }

    #[test]
    fn notable_levels() {
        assert!(IntensityLevel::High.is_notable());
        assert!(IntensityLevel::VeryHigh.is_notable());
        assert!(!IntensityLevel::Moderate.is_notable());
    }
}
