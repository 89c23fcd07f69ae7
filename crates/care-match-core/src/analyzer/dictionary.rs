//! Condition dictionary: the closed set of profiles the analyzer scores.
//!
//! A dictionary is built once, validated, and never mutated afterwards.
//! Every keyword and phrase is normalized at construction so scoring only
//! normalizes the input text.

use std::collections::HashSet;

use thiserror::Error;

use super::normalizer::normalize_text;
use crate::models::{ConditionProfile, SeverityKeywords, SeverityLevel};

/// Dictionary construction errors.
#[derive(Error, Debug)]
pub enum DictionaryError {
    #[error("Dictionary has no condition profiles")]
    Empty,

    #[error("Condition profile has an empty code")]
    EmptyCode,

    #[error("Duplicate condition code: {0}")]
    DuplicateCode(String),

    #[error("Entry {entry:?} of condition {code} is empty after normalization")]
    EmptyEntry { code: String, entry: String },

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type DictionaryResult<T> = Result<T, DictionaryError>;

/// A keyword with its normalized form.
#[derive(Debug, Clone)]
pub(crate) struct Term {
    pub original: String,
    pub normalized: String,
}

impl Term {
    fn new(original: &str) -> Self {
        Self {
            original: original.to_string(),
            normalized: normalize_text(original),
        }
    }

    /// Whole-term substring match.
    pub fn found_in(&self, text: &str) -> bool {
        text.contains(&self.normalized)
    }

    /// Every word of the term appears somewhere in the text.
    pub fn words_found_in(&self, text: &str) -> bool {
        self.normalized.split(' ').all(|word| text.contains(word))
    }
}

/// A profile with all entries pre-normalized.
#[derive(Debug, Clone)]
pub(crate) struct CompiledProfile {
    pub phrases: Vec<Term>,
    pub primary: Vec<Term>,
    pub secondary: Vec<Term>,
    pub supporting: Vec<Term>,
    pub severity: Vec<(SeverityLevel, Vec<Term>)>,
}

impl CompiledProfile {
    fn compile(profile: &ConditionProfile) -> Self {
        Self {
            phrases: compile_terms(&profile.phrases),
            primary: compile_terms(&profile.primary_keywords),
            secondary: compile_terms(&profile.secondary_keywords),
            supporting: compile_terms(&profile.supporting_keywords),
            severity: profile
                .severity_keywords
                .iter()
                .map(|(level, keywords)| (level, compile_terms(keywords)))
                .collect(),
        }
    }
}

fn compile_terms(entries: &[String]) -> Vec<Term> {
    entries.iter().map(|e| Term::new(e)).collect()
}

/// Immutable set of condition profiles.
#[derive(Debug, Clone)]
pub struct ConditionDictionary {
    profiles: Vec<ConditionProfile>,
    compiled: Vec<CompiledProfile>,
}

impl ConditionDictionary {
    /// Build a dictionary, rejecting entries that would match any input.
    pub fn new(profiles: Vec<ConditionProfile>) -> DictionaryResult<Self> {
        if profiles.is_empty() {
            return Err(DictionaryError::Empty);
        }

        let mut codes = HashSet::new();
        for profile in &profiles {
            if profile.code.trim().is_empty() {
                return Err(DictionaryError::EmptyCode);
            }
            if !codes.insert(profile.code.as_str()) {
                return Err(DictionaryError::DuplicateCode(profile.code.clone()));
            }
            if let Some(entry) = profile
                .all_entries()
                .find(|entry| normalize_text(entry).is_empty())
            {
                return Err(DictionaryError::EmptyEntry {
                    code: profile.code.clone(),
                    entry: entry.clone(),
                });
            }
        }

        let compiled = profiles.iter().map(CompiledProfile::compile).collect();
        Ok(Self { profiles, compiled })
    }

    /// Load profiles from a JSON array.
    pub fn from_json(json: &str) -> DictionaryResult<Self> {
        let profiles: Vec<ConditionProfile> = serde_json::from_str(json)?;
        Self::new(profiles)
    }

    pub fn profiles(&self) -> &[ConditionProfile] {
        &self.profiles
    }

    pub fn len(&self) -> usize {
        self.profiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.profiles.is_empty()
    }

    /// Look up a profile by code.
    pub fn get(&self, code: &str) -> Option<&ConditionProfile> {
        self.profiles.iter().find(|p| p.code == code)
    }

    /// Find a profile by code or English name, ignoring case.
    pub fn find_by_label(&self, label: &str) -> Option<&ConditionProfile> {
        let wanted = label.trim().to_lowercase();
        self.profiles.iter().find(|p| {
            p.code.to_lowercase() == wanted || p.english_name.to_lowercase() == wanted
        })
    }

    /// Profiles paired with their compiled terms, in dictionary order.
    pub(crate) fn iter_compiled(&self) -> impl Iterator<Item = (&ConditionProfile, &CompiledProfile)> {
        self.profiles.iter().zip(self.compiled.iter())
    }

    /// The built-in developmental condition profiles.
    pub fn builtin() -> Self {
        let profiles = builtin_profiles();
        let compiled = profiles.iter().map(CompiledProfile::compile).collect();
        Self { profiles, compiled }
    }
}

impl Default for ConditionDictionary {
    fn default() -> Self {
        Self::builtin()
    }
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

/// Default condition profiles.
fn builtin_profiles() -> Vec<ConditionProfile> {
    vec![autism_profile(), adhd_profile(), down_syndrome_profile(), speech_profile()]
}

fn autism_profile() -> ConditionProfile {
    let mut profile = ConditionProfile::new("ASD", "اضطراب طيف التوحد", "Autism Spectrum Disorder");
    profile.primary_keywords = strings(&[
        "autism", "spectrum", "eye contact", "isolation", "withdrawal",
        "fixed routine", "repetitive movements", "flapping", "repetition",
    ]);
    profile.secondary_keywords = strings(&[
        "communication", "interaction", "social", "isolation", "loneliness",
        "repetition", "routine", "stereotypical", "movements", "spinning",
        "language", "speech", "delay", "echolalia", "repeating",
        "sensitivity", "sensory", "sounds", "lights", "touch",
    ]);
    profile.supporting_keywords = strings(&[
        "shy", "prefers to be alone", "does not play with children",
        "limited interests", "obsession", "attachment to objects",
        "difficulty with change", "anger when changing", "tantrums",
    ]);
    profile.severity_keywords = SeverityKeywords {
        high: strings(&[
            "nonverbal", "no communication", "no response", "severe aggression",
            "self-harm", "complete isolation", "constant screaming",
        ]),
        medium: strings(&[
            "limited communication", "little speech", "difficulty interacting",
            "frequent tantrums", "many repetitive movements",
        ]),
        low: strings(&["very shy", "prefers to be alone", "slow communication", "some repetition"]),
    };
    profile.phrases = strings(&[
        "does not respond to his name",
        "avoids eye contact",
        "repeats same movements",
        "very sensitive to sounds",
        "flaps his hands",
        "does not point to objects",
    ]);
    profile
}

fn adhd_profile() -> ConditionProfile {
    let mut profile = ConditionProfile::new(
        "ADHD",
        "اضطراب فرط الحركة ونقص الانتباه",
        "Attention Deficit Hyperactivity Disorder",
    );
    profile.primary_keywords = strings(&[
        "adhd", "hyperactivity", "overactive", "attention deficit",
        "cannot sit still", "impulsive", "hasty",
    ]);
    profile.secondary_keywords = strings(&[
        "movement", "activity", "hyper", "jumping", "running", "restless",
        "attention", "focus", "distracted", "daydreaming", "forgetful",
        "impulsive", "interrupting", "patience", "waiting", "quick",
        "forgetting", "losing", "items", "tasks", "assignments",
        "fidgety", "nervous", "anxious",
    ]);
    profile.supporting_keywords = strings(&[
        "difficulty sitting", "talks a lot", "interrupts others",
        "does not wait his turn", "answers before question ends",
        "forgets homework", "loses belongings", "disorganized",
    ]);
    profile.severity_keywords = SeverityKeywords {
        high: strings(&[
            "never sits", "always moving", "danger to himself", "severe aggression",
            "uncontrollable",
        ]),
        medium: strings(&["very active", "difficulty focusing", "impulsive", "very forgetful"]),
        low: strings(&["active", "sometimes forgets", "slightly distracted", "restless sometimes"]),
    };
    profile.phrases = strings(&[
        "cannot sit still",
        "keeps jumping",
        "interrupts everyone",
        "forgets his stuff daily",
        "does not wait his turn",
        "answers before the question ends",
    ]);
    profile
}

fn down_syndrome_profile() -> ConditionProfile {
    let mut profile = ConditionProfile::new("Down Syndrome", "متلازمة داون", "Down Syndrome");
    profile.primary_keywords = strings(&[
        "down", "chromosome", "down syndrome", "special features", "almond eyes",
    ]);
    profile.secondary_keywords = strings(&[
        "features", "face", "eyes", "almond", "protruding tongue",
        "delayed development", "motor delay", "mental delay", "cognitive delay",
        "weak muscles", "hypotonia", "extra flexibility", "softness",
        "speech difficulty", "talking difficulty", "understanding difficulty",
        "heart", "congenital", "defect", "health issues",
    ]);
    profile.supporting_keywords = strings(&[
        "short height", "short fingers", "short neck",
        "slow learning", "needs more time", "difficulty understanding",
        "hearing problems", "vision problems", "heart problems",
    ]);
    profile.severity_keywords = SeverityKeywords {
        high: strings(&[
            "severe delay", "cannot walk", "cannot talk", "serious medical problems",
            "congenital defects",
        ]),
        medium: strings(&["moderate delay", "needs support", "slow learning", "some health problems"]),
        low: strings(&["mild delay", "progressing slowly", "minor problems"]),
    };
    profile.phrases = strings(&[
        "almond-shaped eyes",
        "tongue sticks out",
        "muscle weakness",
        "delayed walking",
        "difficulty speaking",
    ]);
    profile
}

fn speech_profile() -> ConditionProfile {
    let mut profile = ConditionProfile::new(
        "Speech & Language Disorder",
        "اضطراب النطق واللغة",
        "Speech and Language Disorders",
    );
    profile.primary_keywords = strings(&[
        "speech", "language delay", "late talking", "nonverbal",
        "stuttering", "stammering", "lisp",
    ]);
    profile.secondary_keywords = strings(&[
        "talking", "language", "voice", "few words",
        "repeating letters", "difficulty pronouncing", "wrong sound",
        "delay", "slow speech", "understanding", "expression", "short sentences",
    ]);
    profile.supporting_keywords = strings(&[
        "uses gestures", "points instead of speaking", "hard to understand",
        "letter r", "letter s", "letter th",
        "unclear speech", "mumbled", "confused",
    ]);
    profile.severity_keywords = SeverityKeywords {
        high: strings(&["completely mute", "no speech", "language loss", "no words"]),
        medium: strings(&[
            "limited speech", "obvious delay", "pronunciation problems", "10-20 words only",
        ]),
        low: strings(&["minor errors", "slight delay", "single letter issue", "mild stutter"]),
    };
    profile.phrases = strings(&[
        "says only few words",
        "uses gestures to communicate",
        "difficulty pronouncing letters",
        "stutters when speaking",
        "speech is not clear",
    ]);
    profile
}
