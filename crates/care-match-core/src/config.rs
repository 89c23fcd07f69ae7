//! Analyzer and ranker configuration.
//!
//! Both configs are resolved once by the host and passed into the engine at
//! construction time. `Default` reproduces the production thresholds.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Configuration errors.
#[derive(Error, Debug, PartialEq)]
pub enum ConfigError {
    #[error("{field} must be within [0, 1], got {value}")]
    OutOfRange { field: &'static str, value: f64 },

    #[error("{0} must be greater than zero")]
    Zero(&'static str),

    #[error("quality thresholds must be increasing: low {low}, high {high}")]
    QualityThresholds { low: usize, high: usize },
}

/// Tunables for the local symptom analyzer.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AnalyzerConfig {
    /// Conditions at or below this confidence are dropped
    pub min_confidence: f64,
    /// Evidence kept per condition
    pub max_condition_keywords: usize,
    /// Analyzed keywords kept in the result
    pub max_analyzed_keywords: usize,
    /// Matched phrases kept in the result
    pub max_matched_phrases: usize,
    /// Below this word count the input quality is low
    pub quality_medium_words: usize,
    /// Below this word count the input quality is medium
    pub quality_high_words: usize,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            min_confidence: 0.15,
            max_condition_keywords: 8,
            max_analyzed_keywords: 15,
            max_matched_phrases: 15,
            quality_medium_words: 10,
            quality_high_words: 30,
        }
    }
}

impl AnalyzerConfig {
    /// Check that every threshold is usable.
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_unit("min_confidence", self.min_confidence)?;
        if self.max_condition_keywords == 0 {
            return Err(ConfigError::Zero("max_condition_keywords"));
        }
        if self.quality_medium_words >= self.quality_high_words {
            return Err(ConfigError::QualityThresholds {
                low: self.quality_medium_words,
                high: self.quality_high_words,
            });
        }
        Ok(())
    }
}

/// Tunables for the institution ranker.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct RankerConfig {
    /// Added per matching service offering
    pub service_weight: f64,
    /// Added when the institution is in the preferred city
    pub city_bonus: f64,
    /// Maximum number of institutions returned
    pub max_results: usize,
}

impl Default for RankerConfig {
    fn default() -> Self {
        Self {
            service_weight: 0.4,
            city_bonus: 0.3,
            max_results: 10,
        }
    }
}

impl RankerConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_unit("service_weight", self.service_weight)?;
        check_unit("city_bonus", self.city_bonus)?;
        if self.max_results == 0 {
            return Err(ConfigError::Zero("max_results"));
        }
        Ok(())
    }
}

fn check_unit(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::OutOfRange { field, value })
    }
}
