//! Care-Match Core Library
//!
//! Local symptom analysis and institution recommendation for a
//! care-coordination app connecting parents, specialists and institutions.
//!
//! # Architecture
//!
//! ```text
//! Symptoms + History + Services
//!              │
//!        Normalization
//!              │
//!   ┌──────────▼──────────┐
//!   │  Condition scoring  │  phrases (5) / primary (3) /
//!   │  (per profile)      │  secondary (2) / supporting (1) / severity
//!   └──────────┬──────────┘
//!              │
//!   Ranked suggestions + risk level + input quality
//!              │
//!   ┌──────────▼──────────┐
//!   │ Institution ranker  │◄── institutions + services (fetched by caller)
//!   └──────────┬──────────┘
//!              ▼
//!     Top 10 institutions
//! ```
//!
//! # Core Principle
//!
//! **Suggestions are screening hints, not diagnoses.** The engine is pure:
//! no I/O, no global state. Host applications own persistence and transport.
//!
//! # Modules
//!
//! - [`analyzer`]: Normalizer, condition dictionary, scorer, fallback chain
//! - [`recommender`]: Institution ranker and target-condition derivation
//! - [`models`]: Domain types (ConditionProfile, AnalysisResult, etc.)
//! - [`config`]: Analyzer and ranker tunables

pub mod analyzer;
pub mod config;
pub mod models;
pub mod recommender;

// Re-export commonly used types
pub use analyzer::{
    normalize_text, Analyzer, ClassifyError, ConditionDictionary, FallbackChain,
    SymptomClassifier,
};
pub use config::{AnalyzerConfig, RankerConfig};
pub use models::{
    AnalysisResult, AnalysisSource, ConditionProfile, ConditionScore, InstitutionCandidate,
    RankedInstitution, RiskLevel, ServiceOffering, SeverityLevel, SymptomInput,
};
pub use recommender::{target_conditions, InstitutionRanker, NamedCondition};

// UniFFI setup - using proc macros
uniffi::setup_scaffolding!();

use std::sync::Arc;

// =========================================================================
// FFI Error Type
// =========================================================================

#[derive(Debug, thiserror::Error, uniffi::Error)]
pub enum CareMatchError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Dictionary error: {0}")]
    DictionaryError(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl From<analyzer::AnalysisError> for CareMatchError {
    fn from(e: analyzer::AnalysisError) -> Self {
        match e {
            analyzer::AnalysisError::InvalidArgument(msg) => CareMatchError::InvalidInput(msg),
            other => CareMatchError::DictionaryError(other.to_string()),
        }
    }
}

impl From<analyzer::DictionaryError> for CareMatchError {
    fn from(e: analyzer::DictionaryError) -> Self {
        CareMatchError::DictionaryError(e.to_string())
    }
}

impl From<serde_json::Error> for CareMatchError {
    fn from(e: serde_json::Error) -> Self {
        CareMatchError::SerializationError(e.to_string())
    }
}

// =========================================================================
// Factory Functions (exported to FFI)
// =========================================================================

/// Create an analyzer over the built-in condition profiles.
#[uniffi::export]
pub fn open_analyzer() -> Arc<CareMatchCore> {
    Arc::new(CareMatchCore {
        analyzer: Analyzer::default(),
        ranker: InstitutionRanker::new(),
    })
}

/// Create an analyzer over condition profiles given as a JSON array.
#[uniffi::export]
pub fn open_analyzer_with_dictionary(json: String) -> Result<Arc<CareMatchCore>, CareMatchError> {
    let dictionary = ConditionDictionary::from_json(&json)?;
    Ok(Arc::new(CareMatchCore {
        analyzer: Analyzer::new(dictionary),
        ranker: InstitutionRanker::new(),
    }))
}

// =========================================================================
// Main API Object
// =========================================================================

/// Stateless engine handle; safe to share across threads.
#[derive(uniffi::Object)]
pub struct CareMatchCore {
    analyzer: Analyzer,
    ranker: InstitutionRanker,
}

#[uniffi::export]
impl CareMatchCore {
    /// Analyze symptoms with optional medical history and previous services.
    pub fn analyze(
        &self,
        symptoms: String,
        medical_history: Option<String>,
        previous_services: Option<String>,
    ) -> FfiAnalysisResult {
        self.analyzer
            .analyze(
                &symptoms,
                medical_history.as_deref().unwrap_or_default(),
                previous_services.as_deref().unwrap_or_default(),
            )
            .into()
    }

    /// Analyze a JSON request body, rejecting non-string text fields.
    pub fn analyze_json(&self, request: String) -> Result<String, CareMatchError> {
        let value: serde_json::Value = serde_json::from_str(&request)?;
        let result = self.analyzer.analyze_value(&value)?;
        Ok(result.to_json()?)
    }

    /// Rank institutions against suggested condition names.
    pub fn recommend(
        &self,
        condition_names: Vec<String>,
        institutions: Vec<FfiInstitution>,
        preferred_city: Option<String>,
    ) -> Vec<FfiRankedInstitution> {
        let candidates: Vec<InstitutionCandidate> =
            institutions.into_iter().map(|i| i.into()).collect();
        self.ranker
            .recommend(&condition_names, &candidates, preferred_city.as_deref())
            .into_iter()
            .map(|r| r.into())
            .collect()
    }

    /// Normalize text the same way keywords are matched.
    pub fn normalize_text(&self, text: String) -> String {
        analyzer::normalize_text(&text)
    }

    /// Condition names of the built-in or loaded dictionary.
    pub fn condition_codes(&self) -> Vec<String> {
        self.analyzer
            .dictionary()
            .profiles()
            .iter()
            .map(|p| p.code.clone())
            .collect()
    }
}

// =========================================================================
// FFI Types
// =========================================================================

/// FFI-safe analysis result.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiAnalysisResult {
    pub suggested_conditions: Vec<FfiConditionScore>,
    pub risk_level: String,
    pub analysis_confidence: f64,
    pub analyzed_keywords: Vec<String>,
    pub matched_phrases: Vec<String>,
    pub quality: String,
    pub quality_message: String,
    pub quality_recommendation: Option<String>,
}

impl From<AnalysisResult> for FfiAnalysisResult {
    fn from(result: AnalysisResult) -> Self {
        Self {
            suggested_conditions: result
                .suggested_conditions
                .into_iter()
                .map(|c| c.into())
                .collect(),
            risk_level: result.risk_level.as_str().to_string(),
            analysis_confidence: result.analysis_confidence,
            analyzed_keywords: result.analyzed_keywords,
            matched_phrases: result.matched_phrases,
            quality: result.quality.level.as_str().to_string(),
            quality_message: result.quality.message,
            quality_recommendation: result.quality.recommendation,
        }
    }
}

/// FFI-safe condition score.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiConditionScore {
    pub name: String,
    pub english_name: String,
    pub display_name: String,
    pub confidence: f64,
    pub matching_keywords: Vec<String>,
    pub severity_level: String,
}

impl From<ConditionScore> for FfiConditionScore {
    fn from(score: ConditionScore) -> Self {
        Self {
            name: score.name,
            english_name: score.english_name,
            display_name: score.display_name,
            confidence: score.confidence,
            matching_keywords: score.matching_keywords,
            severity_level: score.severity_level.as_str().to_string(),
        }
    }
}

/// FFI-safe service offering.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiServiceOffering {
    pub category: String,
    pub target_conditions: Vec<String>,
}

/// FFI-safe institution candidate.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiInstitution {
    pub id: u64,
    pub name: String,
    pub city: String,
    pub region: Option<String>,
    pub address: Option<String>,
    pub services: Vec<FfiServiceOffering>,
}

impl From<FfiInstitution> for InstitutionCandidate {
    fn from(inst: FfiInstitution) -> Self {
        InstitutionCandidate {
            id: inst.id,
            name: inst.name,
            city: inst.city,
            region: inst.region,
            address: inst.address,
            services: inst
                .services
                .into_iter()
                .map(|s| ServiceOffering {
                    category: s.category,
                    target_conditions: s.target_conditions,
                })
                .collect(),
        }
    }
}

/// FFI-safe ranked institution.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiRankedInstitution {
    pub id: u64,
    pub name: String,
    pub city: String,
    pub region: Option<String>,
    pub address: Option<String>,
    pub match_score: f64,
    pub matching_specialties: Vec<String>,
    pub total_services: u32,
}

impl From<RankedInstitution> for FfiRankedInstitution {
    fn from(ranked: RankedInstitution) -> Self {
        Self {
            id: ranked.id,
            name: ranked.name,
            city: ranked.city,
            region: ranked.region,
            address: ranked.address,
            match_score: ranked.match_score,
            matching_specialties: ranked.matching_specialties,
            total_services: ranked.total_services,
        }
    }
}
