//! Local symptom analyzer.
//!
//! Pipeline: Normalization → Tiered Scoring → Ranking → Risk/Quality

mod dictionary;
mod fallback;
mod normalizer;
mod scorer;

pub use dictionary::*;
pub use fallback::*;
pub use normalizer::*;
pub use scorer::{assess_quality, compute_confidence, derive_risk_level};

use serde_json::Value;
use thiserror::Error;
use tracing::{debug, info};

use crate::config::{AnalyzerConfig, ConfigError};
use crate::models::{AnalysisResult, AnalysisSource, SymptomInput};
use scorer::{dedup_capped, score_profile};

/// Analyzer errors.
#[derive(Error, Debug)]
pub enum AnalysisError {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Dictionary error: {0}")]
    Dictionary(#[from] DictionaryError),

    #[error("Config error: {0}")]
    Config(#[from] ConfigError),
}

pub type AnalysisOutcome<T> = Result<T, AnalysisError>;

/// Errors a classifier reports instead of a result.
#[derive(Error, Debug)]
pub enum ClassifyError {
    #[error("Classifier unavailable: {0}")]
    Unavailable(String),
}

/// Anything that can turn symptom text into an analysis.
///
/// The local [`Analyzer`] always answers; external classifiers may report
/// [`ClassifyError::Unavailable`] so a [`FallbackChain`] can move on.
pub trait SymptomClassifier: Send + Sync {
    /// Short name used in logs.
    fn name(&self) -> &str;

    fn classify(&self, input: &SymptomInput) -> Result<AnalysisResult, ClassifyError>;
}

/// Keyword-based analyzer over an immutable condition dictionary.
#[derive(Debug, Clone)]
pub struct Analyzer {
    dictionary: ConditionDictionary,
    config: AnalyzerConfig,
}

impl Default for Analyzer {
    fn default() -> Self {
        Self::new(ConditionDictionary::builtin())
    }
}

impl Analyzer {
    /// Create an analyzer with default thresholds.
    pub fn new(dictionary: ConditionDictionary) -> Self {
        Self {
            dictionary,
            config: AnalyzerConfig::default(),
        }
    }

    /// Create an analyzer with custom thresholds.
    pub fn with_config(dictionary: ConditionDictionary, config: AnalyzerConfig) -> AnalysisOutcome<Self> {
        config.validate()?;
        Ok(Self { dictionary, config })
    }

    /// Analyze symptoms with optional history and previous services.
    pub fn analyze(&self, symptoms: &str, medical_history: &str, previous_services: &str) -> AnalysisResult {
        let input = SymptomInput {
            symptoms: symptoms.to_string(),
            medical_history: medical_history.to_string(),
            previous_services: previous_services.to_string(),
        };
        self.analyze_input(&input)
    }

    /// Analyze a structured input.
    pub fn analyze_input(&self, input: &SymptomInput) -> AnalysisResult {
        let full_text = normalize_text(&input.combined_text());

        let mut suggestions = Vec::new();
        let mut analyzed_keywords = Vec::new();
        let mut matched_phrases = Vec::new();

        for (profile, compiled) in self.dictionary.iter_compiled() {
            let profile_match = score_profile(
                profile,
                compiled,
                &full_text,
                self.config.max_condition_keywords,
            );

            // Evidence is collected whether or not the condition qualifies.
            analyzed_keywords.extend(profile_match.analyzed_keywords);
            matched_phrases.extend(profile_match.matched_phrases);

            let score = profile_match.score;
            if score.confidence > self.config.min_confidence {
                debug!(
                    condition = %score.name,
                    confidence = score.confidence,
                    severity = score.severity_level.as_str(),
                    "condition matched"
                );
                suggestions.push(score);
            }
        }

        // Stable: ties keep dictionary order.
        suggestions.sort_by(|a, b| {
            b.confidence
                .partial_cmp(&a.confidence)
                .unwrap_or(std::cmp::Ordering::Equal)
        });

        let risk_level = derive_risk_level(suggestions.first());
        let analysis_confidence = suggestions.first().map_or(0.0, |top| top.confidence);
        let total_matches = analyzed_keywords.len() as u32;

        info!(
            suggestions = suggestions.len(),
            risk_level = risk_level.as_str(),
            analysis_confidence,
            "symptom analysis complete"
        );

        AnalysisResult {
            suggested_conditions: suggestions,
            risk_level,
            analysis_confidence,
            analyzed_keywords: dedup_capped(analyzed_keywords, self.config.max_analyzed_keywords),
            matched_phrases: dedup_capped(matched_phrases, self.config.max_matched_phrases),
            total_matches,
            quality: assess_quality(&input.symptoms, &self.config),
            source: AnalysisSource::LocalRules,
            recommendations: None,
        }
    }

    /// Analyze a loosely typed JSON request body.
    pub fn analyze_value(&self, request: &Value) -> AnalysisOutcome<AnalysisResult> {
        let input = SymptomInput::from_value(request)?;
        Ok(self.analyze_input(&input))
    }

    pub fn dictionary(&self) -> &ConditionDictionary {
        &self.dictionary
    }

    pub fn config(&self) -> &AnalyzerConfig {
        &self.config
    }
}

impl SymptomClassifier for Analyzer {
    fn name(&self) -> &str {
        "local_ai"
    }

    fn classify(&self, input: &SymptomInput) -> Result<AnalysisResult, ClassifyError> {
        Ok(self.analyze_input(input))
    }
}

impl SymptomInput {
    /// Build an input from a JSON object without coercing non-string values.
    ///
    /// `symptoms` is required. `medical_history` and `previous_services` may
    /// be absent or null.
    pub fn from_value(value: &Value) -> AnalysisOutcome<Self> {
        let object = value
            .as_object()
            .ok_or_else(|| AnalysisError::InvalidArgument("request must be a JSON object".into()))?;

        let symptoms = match object.get("symptoms") {
            Some(Value::String(s)) => s.clone(),
            Some(other) => {
                return Err(AnalysisError::InvalidArgument(format!(
                    "symptoms must be a string, got {}",
                    json_type(other)
                )))
            }
            None => return Err(AnalysisError::InvalidArgument("symptoms is required".into())),
        };

        Ok(Self {
            symptoms,
            medical_history: optional_text(object.get("medical_history"), "medical_history")?,
            previous_services: optional_text(object.get("previous_services"), "previous_services")?,
        })
    }
}

fn optional_text(value: Option<&Value>, field: &str) -> AnalysisOutcome<String> {
    match value {
        None | Some(Value::Null) => Ok(String::new()),
        Some(Value::String(s)) => Ok(s.clone()),
        Some(other) => Err(AnalysisError::InvalidArgument(format!(
            "{} must be a string, got {}",
            field,
            json_type(other)
        ))),
    }
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
