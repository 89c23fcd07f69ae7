//! External classifier over a chat-completion backend.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use serde::Serialize;
use tracing::{info, warn};

use crate::config::LlmConfig;
use crate::extraction::{parse_analysis_response, to_analysis_result, ExtractionError, ExtractionResult, RawAnalysis};
use crate::prompts::{build_chat_request, build_health_request, ChatRequest};
use care_match_core::models::{AnalysisResult, AnalysisSource, SymptomInput};
use care_match_core::{AnalyzerConfig, ClassifyError, ConditionDictionary, SymptomClassifier};

/// Transport that sends a chat request and returns the reply text.
///
/// Hosts supply the HTTP client; the API key is passed per call so the
/// backend holds no credentials of its own.
pub trait CompletionBackend: Send + Sync {
    fn complete(&self, request: &ChatRequest, api_key: &str) -> anyhow::Result<String>;
}

/// Provider health.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum HealthStatus {
    /// No API key configured
    Disabled,
    Healthy { model: String },
    Error { message: String },
}

/// Symptom classifier backed by a hosted model.
pub struct LlmClassifier<B: CompletionBackend> {
    config: LlmConfig,
    backend: B,
    dictionary: ConditionDictionary,
    analyzer_config: AnalyzerConfig,
}

impl<B: CompletionBackend> LlmClassifier<B> {
    /// Create a classifier that maps names onto the built-in dictionary.
    pub fn new(config: LlmConfig, backend: B) -> Self {
        Self {
            config,
            backend,
            dictionary: ConditionDictionary::builtin(),
            analyzer_config: AnalyzerConfig::default(),
        }
    }

    /// Map model output onto a different dictionary.
    pub fn with_dictionary(mut self, dictionary: ConditionDictionary) -> Self {
        self.dictionary = dictionary;
        self
    }

    pub fn config(&self) -> &LlmConfig {
        &self.config
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Check the provider with a minimal request.
    pub fn check_health(&self) -> HealthStatus {
        let Some(api_key) = self.config.api_key.as_deref() else {
            return HealthStatus::Disabled;
        };

        match self.backend.complete(&build_health_request(&self.config), api_key) {
            Ok(_) => HealthStatus::Healthy {
                model: self.config.model.clone(),
            },
            Err(e) => HealthStatus::Error {
                message: e.to_string(),
            },
        }
    }

    /// Send the analysis request and parse the reply.
    fn request_analysis(&self, input: &SymptomInput, api_key: &str) -> ExtractionResult<RawAnalysis> {
        let request = build_chat_request(&self.config, input);
        info!(provider = self.config.provider.label(), model = %self.config.model, "sending analysis request");

        let reply = self
            .backend
            .complete(&request, api_key)
            .map_err(|e| ExtractionError::Backend(e.to_string()))?;

        parse_analysis_response(&reply)
    }

    fn source(&self) -> AnalysisSource {
        AnalysisSource::External {
            provider: self.config.provider.label().to_string(),
            model: self.config.model.clone(),
        }
    }
}

impl<B: CompletionBackend> SymptomClassifier for LlmClassifier<B> {
    fn name(&self) -> &str {
        self.config.provider.label()
    }

    fn classify(&self, input: &SymptomInput) -> Result<AnalysisResult, ClassifyError> {
        let api_key = self
            .config
            .api_key
            .as_deref()
            .ok_or_else(|| ClassifyError::Unavailable("API key not configured".into()))?;

        let raw = self.request_analysis(input, api_key).map_err(|e| {
            match &e {
                ExtractionError::Backend(_) => {
                    warn!(provider = self.name(), error = %e, "completion request failed")
                }
                _ => warn!(provider = self.name(), error = %e, "unparseable model response"),
            }
            ClassifyError::Unavailable(e.to_string())
        })?;

        let result = to_analysis_result(
            raw,
            &self.dictionary,
            &input.symptoms,
            &self.analyzer_config,
            self.source(),
        );

        info!(
            provider = self.name(),
            suggestions = result.suggested_conditions.len(),
            risk_level = result.risk_level.as_str(),
            "external analysis complete"
        );

        Ok(result)
    }
}

/// Backend returning a canned reply, for testing without network access.
pub struct MockBackend {
    reply: Result<String, String>,
    calls: AtomicUsize,
    last_request: Mutex<Option<ChatRequest>>,
}

impl MockBackend {
    /// Always answer with `reply`.
    pub fn replying(reply: impl Into<String>) -> Self {
        Self::with_reply(Ok(reply.into()))
    }

    /// Always fail with `message`.
    pub fn failing(message: impl Into<String>) -> Self {
        Self::with_reply(Err(message.into()))
    }

    fn with_reply(reply: Result<String, String>) -> Self {
        Self {
            reply,
            calls: AtomicUsize::new(0),
            last_request: Mutex::new(None),
        }
    }

    /// Number of requests received.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// The most recent request, if any.
    pub fn last_request(&self) -> Option<ChatRequest> {
        self.last_request.lock().ok().and_then(|guard| guard.clone())
    }
}

impl CompletionBackend for MockBackend {
    fn complete(&self, request: &ChatRequest, _api_key: &str) -> anyhow::Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Ok(mut guard) = self.last_request.lock() {
            *guard = Some(request.clone());
        }

        match &self.reply {
            Ok(text) => Ok(text.clone()),
            Err(message) => Err(anyhow::anyhow!("{}", message)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LlmProvider;
    use care_match_core::models::RiskLevel;

    const REPLY: &str = r#"```json
{
  "suggested_conditions": [
    {"name": "ADHD", "english_name": "Attention Deficit Hyperactivity Disorder", "confidence": 0.72, "severity_level": "medium"}
  ],
  "risk_level": "High",
  "analysis_confidence": 0.72,
  "analyzed_keywords": ["cannot sit still"],
  "recommendations": "Consult a developmental pediatrician"
}
```"#;

    fn groq(key: Option<&str>) -> LlmConfig {
        LlmConfig::new(LlmProvider::Groq, key.map(String::from))
    }

    #[test]
    fn test_classify() {
        let classifier = LlmClassifier::new(groq(Some("key")), MockBackend::replying(REPLY));
        let input = SymptomInput::new("He cannot sit still").with_previous_services("speech therapy");

        let result = classifier.classify(&input).unwrap();

        assert_eq!(result.top_condition().unwrap().name, "ADHD");
        assert_eq!(result.risk_level, RiskLevel::High);
        assert_eq!(
            result.source,
            AnalysisSource::External {
                provider: "groq_ai".into(),
                model: "llama-3.1-8b-instant".into(),
            }
        );

        let request = classifier.backend().last_request().unwrap();
        assert!(request.user_prompt().unwrap().contains("speech therapy"));
    }

    #[test]
    fn test_missing_key_is_unavailable() {
        let classifier = LlmClassifier::new(groq(None), MockBackend::replying(REPLY));

        let err = classifier.classify(&SymptomInput::new("anything")).unwrap_err();
        assert!(matches!(err, ClassifyError::Unavailable(_)));
        assert_eq!(classifier.backend().calls(), 0);
    }

    #[test]
    fn test_backend_error_is_unavailable() {
        let classifier = LlmClassifier::new(groq(Some("key")), MockBackend::failing("429 rate limited"));

        let err = classifier.classify(&SymptomInput::new("anything")).unwrap_err();
        assert!(matches!(err, ClassifyError::Unavailable(msg) if msg.contains("429")));
    }

    #[test]
    fn test_backend_failure_is_reported_as_backend_error() {
        let classifier = LlmClassifier::new(groq(Some("key")), MockBackend::failing("connection reset"));

        let err = classifier
            .request_analysis(&SymptomInput::new("anything"), "key")
            .unwrap_err();
        assert!(matches!(&err, ExtractionError::Backend(msg) if msg == "connection reset"));

        let err = classifier.classify(&SymptomInput::new("anything")).unwrap_err();
        assert!(matches!(err, ClassifyError::Unavailable(msg) if msg == "Backend error: connection reset"));
    }

    #[test]
    fn test_unparseable_reply_is_not_a_backend_error() {
        let classifier = LlmClassifier::new(groq(Some("key")), MockBackend::replying("Sorry, I can't."));

        let err = classifier
            .request_analysis(&SymptomInput::new("anything"), "key")
            .unwrap_err();
        assert!(matches!(err, ExtractionError::InvalidFormat(_)));
    }

    #[test]
    fn test_unparseable_reply_is_unavailable() {
        let classifier = LlmClassifier::new(groq(Some("key")), MockBackend::replying("Sorry, I can't."));

        assert!(classifier.classify(&SymptomInput::new("anything")).is_err());
    }

    #[test]
    fn test_check_health() {
        let disabled = LlmClassifier::new(groq(None), MockBackend::replying("hi"));
        assert_eq!(disabled.check_health(), HealthStatus::Disabled);

        let healthy = LlmClassifier::new(groq(Some("key")), MockBackend::replying("hi"));
        assert_eq!(
            healthy.check_health(),
            HealthStatus::Healthy {
                model: "llama-3.1-8b-instant".into()
            }
        );
        assert_eq!(healthy.backend().last_request().unwrap().max_tokens, 10);

        let broken = LlmClassifier::new(groq(Some("key")), MockBackend::failing("timeout"));
        assert_eq!(
            broken.check_health(),
            HealthStatus::Error {
                message: "timeout".into()
            }
        );
    }

    #[test]
    fn test_health_serialization() {
        let json = serde_json::to_string(&HealthStatus::Disabled).unwrap();
        assert_eq!(json, r#"{"status":"disabled"}"#);
    }
}
