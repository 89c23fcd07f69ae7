//! Analysis extraction from LLM output.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use strsim::jaro_winkler;
use thiserror::Error;

use care_match_core::analyzer::assess_quality;
use care_match_core::models::{AnalysisResult, AnalysisSource, ConditionProfile, ConditionScore, RiskLevel, SeverityLevel};
use care_match_core::{AnalyzerConfig, ConditionDictionary};

/// Minimum Jaro-Winkler similarity for a model-supplied name to map onto a
/// dictionary profile.
pub const NAME_MATCH_THRESHOLD: f64 = 0.9;

/// Extraction errors.
#[derive(Error, Debug)]
pub enum ExtractionError {
    #[error("JSON parse error: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("Invalid response format: {0}")]
    InvalidFormat(String),

    #[error("Backend error: {0}")]
    Backend(String),
}

pub type ExtractionResult<T> = Result<T, ExtractionError>;

/// Raw analysis as returned by the model. Every field is optional.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawAnalysis {
    #[serde(default)]
    pub suggested_conditions: Vec<RawCondition>,
    #[serde(default)]
    pub risk_level: Option<String>,
    #[serde(default)]
    pub analysis_confidence: Option<Value>,
    #[serde(default)]
    pub analyzed_keywords: Vec<String>,
    #[serde(default)]
    pub recommendations: Option<String>,
}

/// One condition suggested by the model.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawCondition {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub english_name: Option<String>,
    /// Number or numeric string
    #[serde(default)]
    pub confidence: Option<Value>,
    #[serde(default)]
    pub matching_keywords: Vec<String>,
    #[serde(default)]
    pub severity_level: Option<String>,
    #[serde(default)]
    pub reasoning: Option<String>,
}

/// Locate the JSON object in a model response.
///
/// Prefers a ```json fenced block, otherwise takes the outermost braces so
/// prose before or after the object is ignored.
pub fn extract_json_block(text: &str) -> ExtractionResult<&str> {
    if let Some(fence) = text.find("```json") {
        let body = &text[fence + "```json".len()..];
        if let Some(end) = body.find("```") {
            return Ok(body[..end].trim());
        }
    }

    let json_start = text.find('{').ok_or_else(|| {
        ExtractionError::InvalidFormat("No JSON object found in response".into())
    })?;
    let json_end = text.rfind('}').ok_or_else(|| {
        ExtractionError::InvalidFormat("No closing brace found in response".into())
    })?;
    if json_end < json_start {
        return Err(ExtractionError::InvalidFormat("Unbalanced braces in response".into()));
    }

    Ok(&text[json_start..=json_end])
}

/// Parse a model response into a raw analysis.
pub fn parse_analysis_response(text: &str) -> ExtractionResult<RawAnalysis> {
    let json = extract_json_block(text)?;
    let raw: RawAnalysis = serde_json::from_str(json)?;
    Ok(raw)
}

/// Read a confidence given as a number or numeric string, clamped to [0, 1].
/// Anything unreadable counts as 0.
pub fn lenient_confidence(value: Option<&Value>) -> f64 {
    let parsed = match value {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    match parsed {
        Some(c) if c.is_finite() => c.clamp(0.0, 1.0),
        _ => 0.0,
    }
}

/// Map a model-supplied condition name onto a dictionary profile.
///
/// Exact code or English name first (ignoring case), then the closest
/// label by Jaro-Winkler similarity at or above [`NAME_MATCH_THRESHOLD`].
pub fn canonicalize_condition<'a>(
    name: &str,
    dictionary: &'a ConditionDictionary,
) -> Option<&'a ConditionProfile> {
    if let Some(profile) = dictionary.find_by_label(name) {
        return Some(profile);
    }

    let wanted = name.trim().to_lowercase();
    let mut best: Option<(&ConditionProfile, f64)> = None;

    for profile in dictionary.profiles() {
        for label in [&profile.code, &profile.english_name] {
            let similarity = jaro_winkler(&wanted, &label.to_lowercase());
            if similarity >= NAME_MATCH_THRESHOLD && best.map_or(true, |(_, s)| similarity > s) {
                best = Some((profile, similarity));
            }
        }
    }

    best.map(|(profile, _)| profile)
}

/// Convert a raw model analysis into the shared result shape.
///
/// Known conditions take the dictionary's code and localized names; unknown
/// ones keep the model's wording. Quality always reflects the input text.
pub fn to_analysis_result(
    raw: RawAnalysis,
    dictionary: &ConditionDictionary,
    symptoms: &str,
    config: &AnalyzerConfig,
    source: AnalysisSource,
) -> AnalysisResult {
    let mut suggestions: Vec<ConditionScore> = raw
        .suggested_conditions
        .iter()
        .map(|condition| to_condition_score(condition, dictionary))
        .collect();

    // Stable: ties keep the model's order.
    suggestions.sort_by(|a, b| {
        b.confidence
            .partial_cmp(&a.confidence)
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    let risk_level = raw
        .risk_level
        .as_deref()
        .and_then(RiskLevel::parse)
        .unwrap_or_default();

    AnalysisResult {
        suggested_conditions: suggestions,
        risk_level,
        analysis_confidence: lenient_confidence(raw.analysis_confidence.as_ref()),
        total_matches: raw.analyzed_keywords.len() as u32,
        analyzed_keywords: raw.analyzed_keywords,
        matched_phrases: Vec::new(),
        quality: assess_quality(symptoms, config),
        source,
        recommendations: raw.recommendations.filter(|r| !r.trim().is_empty()),
    }
}

fn to_condition_score(condition: &RawCondition, dictionary: &ConditionDictionary) -> ConditionScore {
    let raw_name = condition
        .name
        .as_deref()
        .or(condition.english_name.as_deref())
        .unwrap_or("Unknown");

    let (name, english_name, display_name) = match canonicalize_condition(raw_name, dictionary) {
        Some(profile) => (
            profile.code.clone(),
            profile.english_name.clone(),
            profile.display_name.clone(),
        ),
        None => {
            let english = condition.english_name.clone().unwrap_or_else(|| raw_name.to_string());
            (raw_name.to_string(), english.clone(), english)
        }
    };

    ConditionScore {
        name,
        english_name,
        display_name,
        confidence: lenient_confidence(condition.confidence.as_ref()),
        total_score: 0,
        max_possible_score: 0,
        matching_keywords: condition.matching_keywords.clone(),
        phrase_matches: 0,
        primary_matches: 0,
        secondary_matches: 0,
        supporting_matches: 0,
        severity_level: condition
            .severity_level
            .as_deref()
            .and_then(SeverityLevel::parse)
            .unwrap_or_default(),
        severity_score: 0,
    }
}
