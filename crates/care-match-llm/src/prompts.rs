//! Prompts for external symptom classification.
//!
//! Requests use the OpenAI-style chat body that Groq accepts directly.

use serde::{Deserialize, Serialize};

use crate::config::LlmConfig;
use care_match_core::SymptomInput;

/// System prompt for developmental screening.
pub const SYSTEM_PROMPT: &str = "You are a pediatric developmental specialist AI assistant. \
Analyze symptoms and provide structured medical assessments in JSON format only.";

/// Required output shape, shown to the model verbatim.
const OUTPUT_FORMAT: &str = r#"{
  "suggested_conditions": [
    {
      "name": "ASD",
      "english_name": "Autism Spectrum Disorder",
      "confidence": 0.85,
      "matching_keywords": ["eye contact", "repetitive movements", "isolation"],
      "severity_level": "medium",
      "reasoning": "Brief explanation"
    }
  ],
  "risk_level": "Medium",
  "analysis_confidence": 0.85,
  "analyzed_keywords": ["eye contact", "repetitive", "social"],
  "recommendations": "Brief recommendation for parents"
}"#;

/// User prompt for one analysis. Empty history and services are omitted.
pub fn make_analysis_prompt(symptoms: &str, medical_history: &str, previous_services: &str) -> String {
    let mut prompt = String::from(
        "Analyze the following child's symptoms and provide a structured medical assessment.\n\n",
    );

    prompt.push_str("**Child's Symptoms:**\n");
    prompt.push_str(symptoms.trim());
    prompt.push_str("\n\n");

    if !medical_history.trim().is_empty() {
        prompt.push_str("**Medical History:**\n");
        prompt.push_str(medical_history.trim());
        prompt.push_str("\n\n");
    }

    if !previous_services.trim().is_empty() {
        prompt.push_str("**Previous Services:**\n");
        prompt.push_str(previous_services.trim());
        prompt.push_str("\n\n");
    }

    prompt.push_str(
        "**Important Instructions:**\n\
1. Focus ONLY on these conditions: ASD (Autism Spectrum Disorder), ADHD (Attention Deficit Hyperactivity Disorder), Down Syndrome, Speech & Language Disorders\n\
2. Provide confidence scores (0.0 to 1.0) for each condition\n\
3. Identify matching keywords from the symptoms\n\
4. Assess severity level (low, medium, high)\n\
5. Determine overall risk level\n\n",
    );

    prompt.push_str("**Required Output Format (JSON ONLY - no other text):**\n");
    prompt.push_str(OUTPUT_FORMAT);
    prompt.push_str(
        "\n\n**Analysis Rules:**\n\
- Only include conditions with confidence > 0.3\n\
- Sort by confidence (highest first)\n\
- Risk level: Low (<0.4), Medium (0.4-0.7), High (>0.7)\n\
- Be specific with keywords\n\
- Consider child development context\n\n\
Provide ONLY the JSON output, no additional text.",
    );

    prompt
}

/// One chat message.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system".into(),
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".into(),
            content: content.into(),
        }
    }
}

/// Chat completion request body.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChatRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,
    pub max_tokens: u32,
}

impl ChatRequest {
    /// Text of the last user message.
    pub fn user_prompt(&self) -> Option<&str> {
        self.messages
            .iter()
            .rev()
            .find(|m| m.role == "user")
            .map(|m| m.content.as_str())
    }
}

/// Build the analysis request for a symptom description.
pub fn build_chat_request(config: &LlmConfig, input: &SymptomInput) -> ChatRequest {
    ChatRequest {
        model: config.model.clone(),
        messages: vec![
            ChatMessage::system(SYSTEM_PROMPT),
            ChatMessage::user(make_analysis_prompt(
                &input.symptoms,
                &input.medical_history,
                &input.previous_services,
            )),
        ],
        temperature: Some(config.temperature),
        max_tokens: config.max_tokens,
    }
}

/// Minimal request used to check provider health.
pub fn build_health_request(config: &LlmConfig) -> ChatRequest {
    ChatRequest {
        model: config.model.clone(),
        messages: vec![ChatMessage::user("Hello")],
        temperature: None,
        max_tokens: 10,
    }
}
