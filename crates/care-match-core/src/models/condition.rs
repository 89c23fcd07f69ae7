//! Condition profile models.

use serde::{Deserialize, Serialize};

/// Weight of a matched phrase.
pub const PHRASE_WEIGHT: u32 = 5;
/// Weight of a matched primary keyword.
pub const PRIMARY_WEIGHT: u32 = 3;
/// Weight of a matched secondary keyword.
pub const SECONDARY_WEIGHT: u32 = 2;
/// Weight of a matched supporting keyword.
pub const SUPPORTING_WEIGHT: u32 = 1;

/// Keyword/phrase evidence describing one diagnosis category.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ConditionProfile {
    /// Short identifier, reported as the suggestion name (e.g., "ASD")
    pub code: String,
    /// Localized label shown to parents
    pub display_name: String,
    /// English label
    pub english_name: String,
    /// Strong indicators - weight 3
    #[serde(default)]
    pub primary_keywords: Vec<String>,
    /// Related indicators - weight 2
    #[serde(default)]
    pub secondary_keywords: Vec<String>,
    /// Weak indicators - weight 1
    #[serde(default)]
    pub supporting_keywords: Vec<String>,
    /// Multi-word phrases - weight 5
    #[serde(default)]
    pub phrases: Vec<String>,
    /// Keywords hinting at symptom intensity
    #[serde(default)]
    pub severity_keywords: SeverityKeywords,
}

impl ConditionProfile {
    /// Create an empty profile with the given labels.
    pub fn new(code: &str, display_name: &str, english_name: &str) -> Self {
        Self {
            code: code.to_string(),
            display_name: display_name.to_string(),
            english_name: english_name.to_string(),
            primary_keywords: Vec::new(),
            secondary_keywords: Vec::new(),
            supporting_keywords: Vec::new(),
            phrases: Vec::new(),
            severity_keywords: SeverityKeywords::default(),
        }
    }

    /// Highest score reachable from phrases and keyword tiers.
    ///
    /// Severity hits are not part of the denominator.
    pub fn max_possible_score(&self) -> u32 {
        self.phrases.len() as u32 * PHRASE_WEIGHT
            + self.primary_keywords.len() as u32 * PRIMARY_WEIGHT
            + self.secondary_keywords.len() as u32 * SECONDARY_WEIGHT
            + self.supporting_keywords.len() as u32 * SUPPORTING_WEIGHT
    }

    /// Iterate over every keyword and phrase in the profile.
    pub fn all_entries(&self) -> impl Iterator<Item = &String> {
        self.phrases
            .iter()
            .chain(&self.primary_keywords)
            .chain(&self.secondary_keywords)
            .chain(&self.supporting_keywords)
            .chain(self.severity_keywords.iter().flat_map(|(_, kws)| kws.iter()))
    }
}

/// Coarse symptom intensity.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "lowercase")]
pub enum SeverityLevel {
    #[default]
    Low,
    Medium,
    High,
}

impl SeverityLevel {
    /// Score contributed by each matched keyword of this level.
    pub fn weight(self) -> u32 {
        match self {
            SeverityLevel::High => 5,
            SeverityLevel::Medium => 3,
            SeverityLevel::Low => 1,
        }
    }

    /// Parse a level name, case-insensitively.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "high" => Some(SeverityLevel::High),
            "medium" => Some(SeverityLevel::Medium),
            "low" => Some(SeverityLevel::Low),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            SeverityLevel::High => "high",
            SeverityLevel::Medium => "medium",
            SeverityLevel::Low => "low",
        }
    }
}

/// Severity keyword lists by level.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct SeverityKeywords {
    #[serde(default)]
    pub high: Vec<String>,
    #[serde(default)]
    pub medium: Vec<String>,
    #[serde(default)]
    pub low: Vec<String>,
}

impl SeverityKeywords {
    /// Levels in evaluation order: high, medium, low.
    pub fn iter(&self) -> impl Iterator<Item = (SeverityLevel, &[String])> {
        [
            (SeverityLevel::High, self.high.as_slice()),
            (SeverityLevel::Medium, self.medium.as_slice()),
            (SeverityLevel::Low, self.low.as_slice()),
        ]
        .into_iter()
    }
}
