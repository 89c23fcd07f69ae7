//! Classifier fallback chain.
//!
//! External classifiers are tried in order; the first one returning at least
//! one suggestion wins. The local analyzer answers when none do.

use std::sync::Arc;

use tracing::{info, warn};

use super::{Analyzer, SymptomClassifier};
use crate::models::{AnalysisResult, SymptomInput};

/// Ordered list of classifiers ending in the local analyzer.
pub struct FallbackChain {
    external: Vec<Arc<dyn SymptomClassifier>>,
    local: Analyzer,
}

impl FallbackChain {
    /// Create a chain that only uses the local analyzer.
    pub fn new(local: Analyzer) -> Self {
        Self {
            external: Vec::new(),
            local,
        }
    }

    /// Append an external classifier, tried before the local analyzer.
    pub fn with_classifier(mut self, classifier: Arc<dyn SymptomClassifier>) -> Self {
        self.external.push(classifier);
        self
    }

    /// Classify with the first classifier that produces suggestions.
    pub fn classify(&self, input: &SymptomInput) -> AnalysisResult {
        for classifier in &self.external {
            match classifier.classify(input) {
                Ok(result) if !result.is_empty() => {
                    info!(classifier = classifier.name(), "external analysis accepted");
                    return result;
                }
                Ok(_) => {
                    warn!(classifier = classifier.name(), "no suggestions, falling back");
                }
                Err(e) => {
                    warn!(classifier = classifier.name(), error = %e, "classifier failed, falling back");
                }
            }
        }

        self.local.analyze_input(input)
    }

    pub fn local(&self) -> &Analyzer {
        &self.local
    }

    /// Number of external classifiers in the chain.
    pub fn external_count(&self) -> usize {
        self.external.len()
    }
}
