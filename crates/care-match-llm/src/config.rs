//! External model configuration.

use serde::{Deserialize, Serialize};

/// Hosted model providers.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LlmProvider {
    Groq,
    Gemini,
}

impl LlmProvider {
    /// Environment variable holding the provider's API key.
    pub fn api_key_var(self) -> &'static str {
        match self {
            LlmProvider::Groq => "GROQ_API_KEY",
            LlmProvider::Gemini => "GEMINI_API_KEY",
        }
    }

    pub fn default_model(self) -> &'static str {
        match self {
            LlmProvider::Groq => "llama-3.1-8b-instant",
            LlmProvider::Gemini => "gemini-1.5-flash-latest",
        }
    }

    /// Source label reported on results.
    pub fn label(self) -> &'static str {
        match self {
            LlmProvider::Groq => "groq_ai",
            LlmProvider::Gemini => "external_ai",
        }
    }
}

/// Settings for one external classifier.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LlmConfig {
    pub provider: LlmProvider,
    pub model: String,
    /// Absent key disables the classifier
    #[serde(skip_serializing)]
    pub api_key: Option<String>,
    pub temperature: f64,
    pub max_tokens: u32,
}

impl LlmConfig {
    /// Config with the provider's default model and sampling settings.
    pub fn new(provider: LlmProvider, api_key: Option<String>) -> Self {
        Self {
            provider,
            model: provider.default_model().to_string(),
            api_key: api_key.filter(|key| !key.trim().is_empty()),
            temperature: 0.2,
            max_tokens: 800,
        }
    }

    /// Groq config with the key read from `GROQ_API_KEY`.
    pub fn groq_from_env() -> Self {
        Self::from_env(LlmProvider::Groq)
    }

    /// Gemini config with the key read from `GEMINI_API_KEY`.
    pub fn gemini_from_env() -> Self {
        Self::from_env(LlmProvider::Gemini)
    }

    fn from_env(provider: LlmProvider) -> Self {
        Self::new(provider, std::env::var(provider.api_key_var()).ok())
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn is_enabled(&self) -> bool {
        self.api_key.is_some()
    }
}
