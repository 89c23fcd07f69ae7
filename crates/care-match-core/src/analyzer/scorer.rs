//! Tiered keyword scoring.
//!
//! Weights:
//! - Phrase: 5
//! - Primary keyword: 3 (multi-word keywords match word by word)
//! - Secondary keyword: 2
//! - Supporting keyword: 1
//! - Severity keyword: 5 / 3 / 1 for high / medium / low

use std::collections::HashSet;

use super::dictionary::CompiledProfile;
use super::normalizer::word_count;
use crate::config::AnalyzerConfig;
use crate::models::{
    ConditionProfile, ConditionScore, InputQuality, QualityLevel, RiskLevel, SeverityLevel,
    PHRASE_WEIGHT, PRIMARY_WEIGHT, SECONDARY_WEIGHT, SUPPORTING_WEIGHT,
};

/// Upper bound of the diversity bonus.
const MAX_DIVERSITY_BONUS: f64 = 0.2;

/// Score of one profile plus the evidence it contributes to the whole result.
#[derive(Debug, Clone)]
pub(crate) struct ProfileMatch {
    pub score: ConditionScore,
    /// Matched primary and secondary keywords, in match order
    pub analyzed_keywords: Vec<String>,
    /// Matched phrases, in match order
    pub matched_phrases: Vec<String>,
}

/// Score one profile against normalized text.
pub(crate) fn score_profile(
    profile: &ConditionProfile,
    compiled: &CompiledProfile,
    full_text: &str,
    max_keywords: usize,
) -> ProfileMatch {
    let mut total_score = 0;
    let mut matched: Vec<String> = Vec::new();
    let mut analyzed_keywords = Vec::new();
    let mut matched_phrases = Vec::new();

    let mut phrase_matches = 0;
    for term in compiled.phrases.iter().filter(|t| t.found_in(full_text)) {
        phrase_matches += 1;
        total_score += PHRASE_WEIGHT;
        matched.push(term.original.clone());
        matched_phrases.push(term.original.clone());
    }

    let mut primary_matches = 0;
    for term in compiled.primary.iter().filter(|t| t.words_found_in(full_text)) {
        primary_matches += 1;
        total_score += PRIMARY_WEIGHT;
        matched.push(term.original.clone());
        analyzed_keywords.push(term.original.clone());
    }

    let mut secondary_matches = 0;
    for term in compiled.secondary.iter().filter(|t| t.found_in(full_text)) {
        secondary_matches += 1;
        total_score += SECONDARY_WEIGHT;
        matched.push(term.original.clone());
        analyzed_keywords.push(term.original.clone());
    }

    let mut supporting_matches = 0;
    for term in compiled.supporting.iter().filter(|t| t.found_in(full_text)) {
        supporting_matches += 1;
        total_score += SUPPORTING_WEIGHT;
        matched.push(term.original.clone());
    }

    // Levels run high -> medium -> low; the last level with a hit wins
    // while every hit level adds to the score.
    let mut severity_level = SeverityLevel::Low;
    let mut severity_score = 0;
    for (level, terms) in &compiled.severity {
        let hits = terms.iter().filter(|t| t.found_in(full_text)).count() as u32;
        if hits > 0 {
            severity_level = *level;
            let level_score = hits * level.weight();
            severity_score += level_score;
            total_score += level_score;
        }
    }

    let max_possible_score = profile.max_possible_score();
    let confidence = compute_confidence(
        total_score,
        max_possible_score,
        phrase_matches,
        primary_matches,
        secondary_matches,
    );

    ProfileMatch {
        score: ConditionScore {
            name: profile.code.clone(),
            english_name: profile.english_name.clone(),
            display_name: profile.display_name.clone(),
            confidence,
            total_score,
            max_possible_score,
            matching_keywords: dedup_capped(matched, max_keywords),
            phrase_matches,
            primary_matches,
            secondary_matches,
            supporting_matches,
            severity_level,
            severity_score,
        },
        analyzed_keywords,
        matched_phrases,
    }
}

/// Confidence from raw score and match diversity, clamped to [0, 1].
pub fn compute_confidence(
    total_score: u32,
    max_possible_score: u32,
    phrase_matches: u32,
    primary_matches: u32,
    secondary_matches: u32,
) -> f64 {
    let raw = if max_possible_score > 0 {
        f64::from(total_score) / f64::from(max_possible_score)
    } else {
        0.0
    };

    let bonus = (f64::from(phrase_matches) * 0.1
        + f64::from(primary_matches) * 0.05
        + f64::from(secondary_matches) * 0.02)
        .min(MAX_DIVERSITY_BONUS);

    (raw + bonus).min(1.0)
}

/// Overall risk from the top suggestion. First matching rule wins.
pub fn derive_risk_level(top: Option<&ConditionScore>) -> RiskLevel {
    let Some(top) = top else {
        return RiskLevel::Low;
    };
    let high = top.severity_level == SeverityLevel::High;

    if top.confidence > 0.7 && high {
        RiskLevel::High
    } else if top.confidence > 0.6 && high {
        RiskLevel::High
    } else if top.confidence > 0.5 || top.severity_level == SeverityLevel::Medium {
        RiskLevel::Medium
    } else if top.confidence > 0.3 {
        RiskLevel::Medium
    } else {
        RiskLevel::Low
    }
}

/// Judge whether the raw symptoms text is detailed enough.
pub fn assess_quality(symptoms: &str, config: &AnalyzerConfig) -> InputQuality {
    let words = word_count(symptoms);

    if words < config.quality_medium_words {
        InputQuality {
            level: QualityLevel::Low,
            message: "The description is too short. Please add more details for better accuracy."
                .into(),
            recommendation: Some(
                "Include details about: behavior, social interaction, communication skills, and daily activities."
                    .into(),
            ),
        }
    } else if words < config.quality_high_words {
        InputQuality {
            level: QualityLevel::Medium,
            message: "Good description but could use more details.".into(),
            recommendation: Some("Try to add specific examples from daily behavior.".into()),
        }
    } else {
        InputQuality {
            level: QualityLevel::High,
            message: "Detailed and sufficient description for accurate analysis.".into(),
            recommendation: None,
        }
    }
}

/// Deduplicate keeping first-seen order, then truncate.
pub(crate) fn dedup_capped(items: Vec<String>, cap: usize) -> Vec<String> {
    let mut seen = HashSet::new();
    items
        .into_iter()
        .filter(|item| seen.insert(item.clone()))
        .take(cap)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzer::dictionary::ConditionDictionary;
    use crate::analyzer::normalizer::normalize_text;
    use crate::models::SeverityKeywords;

    fn score(profile: ConditionProfile, text: &str) -> ProfileMatch {
        let dictionary = ConditionDictionary::new(vec![profile]).unwrap();
        let (profile, compiled) = dictionary.iter_compiled().next().unwrap();
        score_profile(profile, compiled, &normalize_text(text), 8)
    }

    fn make_score(confidence: f64, severity_level: SeverityLevel) -> ConditionScore {
        ConditionScore {
            name: "X".into(),
            english_name: "X".into(),
            display_name: "X".into(),
            confidence,
            total_score: 0,
            max_possible_score: 0,
            matching_keywords: vec![],
            phrase_matches: 0,
            primary_matches: 0,
            secondary_matches: 0,
            supporting_matches: 0,
            severity_level,
            severity_score: 0,
        }
    }

    #[test]
    fn test_tier_weights() {
        let mut profile = ConditionProfile::new("X", "x", "X");
        profile.phrases = vec!["sits alone".into()];
        profile.primary_keywords = vec!["eye contact".into()];
        profile.secondary_keywords = vec!["social".into()];
        profile.supporting_keywords = vec!["shy".into()];

        let result = score(profile, "He sits alone, is shy and social, no contact with the eye");

        assert_eq!(result.score.total_score, 5 + 3 + 2 + 1);
        assert_eq!(result.score.max_possible_score, 11);
        assert_eq!(result.score.phrase_matches, 1);
        assert_eq!(result.score.primary_matches, 1);
        assert_eq!(result.score.secondary_matches, 1);
        assert_eq!(result.score.supporting_matches, 1);
        assert_eq!(result.matched_phrases, vec!["sits alone".to_string()]);
        // supporting keywords are not part of the global evidence
        assert_eq!(
            result.analyzed_keywords,
            vec!["eye contact".to_string(), "social".to_string()]
        );
        assert_eq!(
            result.score.matching_keywords,
            vec!["sits alone", "eye contact", "social", "shy"]
        );
    }

    #[test]
    fn test_secondary_requires_whole_term() {
        let mut profile = ConditionProfile::new("X", "x", "X");
        profile.secondary_keywords = vec!["eye contact".into()];

        let result = score(profile, "no contact with the eye");
        assert_eq!(result.score.secondary_matches, 0);
        assert_eq!(result.score.total_score, 0);
    }

    #[test]
    fn test_severity_last_level_wins() {
        let mut profile = ConditionProfile::new("X", "x", "X");
        profile.primary_keywords = vec!["anything".into()];
        profile.severity_keywords = SeverityKeywords {
            high: vec!["nonverbal".into()],
            medium: vec!["frequent tantrums".into()],
            low: vec!["very shy".into(), "some repetition".into()],
        };

        let result = score(profile, "nonverbal, very shy, some repetition");

        // high hit then low hits: level ends at low, score keeps both
        assert_eq!(result.score.severity_level, SeverityLevel::Low);
        assert_eq!(result.score.severity_score, 5 + 2);
        assert_eq!(result.score.total_score, 7);
    }

    #[test]
    fn test_no_severity_hits_defaults_low() {
        let mut profile = ConditionProfile::new("X", "x", "X");
        profile.primary_keywords = vec!["anything".into()];

        let result = score(profile, "nothing relevant");
        assert_eq!(result.score.severity_level, SeverityLevel::Low);
        assert_eq!(result.score.severity_score, 0);
        assert_eq!(result.score.confidence, 0.0);
    }

    #[test]
    fn test_compute_confidence() {
        // raw 13/106 plus bonus capped at 0.2
        let confidence = compute_confidence(13, 106, 2, 1, 0);
        assert!((confidence - (13.0 / 106.0 + 0.2)).abs() < 1e-9);

        // small bonus below the cap
        let confidence = compute_confidence(2, 100, 0, 0, 1);
        assert!((confidence - 0.04).abs() < 1e-9);

        assert_eq!(compute_confidence(0, 0, 0, 0, 0), 0.0);
        assert_eq!(compute_confidence(500, 10, 3, 3, 3), 1.0);
    }

    #[test]
    fn test_risk_level_rules() {
        assert_eq!(derive_risk_level(None), RiskLevel::Low);
        assert_eq!(
            derive_risk_level(Some(&make_score(0.75, SeverityLevel::High))),
            RiskLevel::High
        );
        assert_eq!(
            derive_risk_level(Some(&make_score(0.65, SeverityLevel::High))),
            RiskLevel::High
        );
        assert_eq!(
            derive_risk_level(Some(&make_score(0.55, SeverityLevel::Low))),
            RiskLevel::Medium
        );
        assert_eq!(
            derive_risk_level(Some(&make_score(0.2, SeverityLevel::Medium))),
            RiskLevel::Medium
        );
        assert_eq!(
            derive_risk_level(Some(&make_score(0.35, SeverityLevel::High))),
            RiskLevel::Medium
        );
        assert_eq!(
            derive_risk_level(Some(&make_score(0.25, SeverityLevel::High))),
            RiskLevel::Low
        );
    }

    #[test]
    fn test_quality_levels() {
        let config = AnalyzerConfig::default();

        let five = "one two three four five";
        assert_eq!(assess_quality(five, &config).level, QualityLevel::Low);

        let twenty = vec!["word"; 20].join(" ");
        let medium = assess_quality(&twenty, &config);
        assert_eq!(medium.level, QualityLevel::Medium);
        assert!(medium.recommendation.is_some());

        let forty = vec!["word"; 40].join(" ");
        let high = assess_quality(&forty, &config);
        assert_eq!(high.level, QualityLevel::High);
        assert!(high.recommendation.is_none());

        assert_eq!(assess_quality("", &config).level, QualityLevel::Low);
    }

    #[test]
    fn test_dedup_capped() {
        let items = vec!["a", "b", "a", "c", "d"]
            .into_iter()
            .map(String::from)
            .collect();
        assert_eq!(dedup_capped(items, 3), vec!["a", "b", "c"]);
    }
}
