//! LLM adapter for external symptom classification.
//!
//! Wraps hosted chat models (Groq, Gemini) behind the core
//! [`SymptomClassifier`](care_match_core::SymptomClassifier) trait so a
//! [`FallbackChain`](care_match_core::FallbackChain) can try them before the
//! local analyzer. Transport is supplied by the host via [`CompletionBackend`].

pub mod classifier;
pub mod config;
pub mod extraction;
pub mod prompts;

pub use classifier::*;
pub use config::*;
pub use extraction::*;
pub use prompts::*;
