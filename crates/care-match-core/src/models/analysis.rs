//! Symptom analysis models.

use serde::{Deserialize, Serialize};

use super::SeverityLevel;

/// Free-text input to a symptom classifier.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct SymptomInput {
    /// Parent's description of the child's symptoms
    pub symptoms: String,
    /// Relevant medical history
    #[serde(default)]
    pub medical_history: String,
    /// Services the child already received
    #[serde(default)]
    pub previous_services: String,
}

impl SymptomInput {
    /// Create an input with only a symptoms description.
    pub fn new(symptoms: impl Into<String>) -> Self {
        Self {
            symptoms: symptoms.into(),
            medical_history: String::new(),
            previous_services: String::new(),
        }
    }

    pub fn with_medical_history(mut self, history: impl Into<String>) -> Self {
        self.medical_history = history.into();
        self
    }

    pub fn with_previous_services(mut self, services: impl Into<String>) -> Self {
        self.previous_services = services.into();
        self
    }

    /// All three fields joined by single spaces.
    pub fn combined_text(&self) -> String {
        format!(
            "{} {} {}",
            self.symptoms, self.medical_history, self.previous_services
        )
    }
}

/// Score of one condition profile against an input.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ConditionScore {
    /// Condition code (e.g., "ASD")
    pub name: String,
    /// English label
    pub english_name: String,
    /// Localized label
    pub display_name: String,
    /// Overall confidence (0.0 - 1.0)
    pub confidence: f64,
    /// Sum of keyword, phrase and severity weights
    pub total_score: u32,
    /// Denominator used for the raw confidence
    pub max_possible_score: u32,
    /// Deduplicated evidence, first-seen order
    pub matching_keywords: Vec<String>,
    pub phrase_matches: u32,
    pub primary_matches: u32,
    pub secondary_matches: u32,
    pub supporting_matches: u32,
    pub severity_level: SeverityLevel,
    pub severity_score: u32,
}

/// Overall risk derived from the top suggestion.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub enum RiskLevel {
    #[default]
    Low,
    Medium,
    High,
}

impl RiskLevel {
    /// Parse a risk level name, case-insensitively.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "high" => Some(RiskLevel::High),
            "medium" => Some(RiskLevel::Medium),
            "low" => Some(RiskLevel::Low),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            RiskLevel::High => "High",
            RiskLevel::Medium => "Medium",
            RiskLevel::Low => "Low",
        }
    }
}

/// Adequacy of the symptoms description.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum QualityLevel {
    Low,
    Medium,
    High,
}

impl QualityLevel {
    pub fn as_str(self) -> &'static str {
        match self {
            QualityLevel::Low => "low",
            QualityLevel::Medium => "medium",
            QualityLevel::High => "high",
        }
    }
}

/// Input quality assessment with guidance for the parent.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct InputQuality {
    pub level: QualityLevel,
    pub message: String,
    pub recommendation: Option<String>,
}

/// Which classifier produced a result.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AnalysisSource {
    /// The local keyword engine
    #[default]
    #[serde(rename = "local_ai")]
    LocalRules,
    /// An external model (e.g., Groq or Gemini)
    External { provider: String, model: String },
}

impl AnalysisSource {
    pub fn label(&self) -> &str {
        match self {
            AnalysisSource::LocalRules => "local_ai",
            AnalysisSource::External { provider, .. } => provider,
        }
    }
}

/// Result of one classification call.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AnalysisResult {
    /// Suggestions sorted by confidence, highest first
    pub suggested_conditions: Vec<ConditionScore>,
    pub risk_level: RiskLevel,
    /// Confidence of the top suggestion, 0 if none
    pub analysis_confidence: f64,
    /// Matched primary/secondary keywords (deduplicated, capped)
    pub analyzed_keywords: Vec<String>,
    /// Matched phrases (deduplicated, capped)
    pub matched_phrases: Vec<String>,
    /// Primary and secondary hits before deduplication
    pub total_matches: u32,
    pub quality: InputQuality,
    pub source: AnalysisSource,
    /// Free-text advice, only provided by external classifiers
    pub recommendations: Option<String>,
}

impl AnalysisResult {
    /// Top suggestion, if any.
    pub fn top_condition(&self) -> Option<&ConditionScore> {
        self.suggested_conditions.first()
    }

    /// Whether the result carries no suggestions.
    pub fn is_empty(&self) -> bool {
        self.suggested_conditions.is_empty()
    }

    /// Serialize to JSON for the calling layer.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}
