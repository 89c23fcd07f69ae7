//! Institution recommendation.
//!
//! Scoring:
//! - Each service targeting a suggested condition: +0.4 (accumulates)
//! - Institution in the preferred city: +0.3
//! - Final score clamped to 1.0

use tracing::info;

use crate::config::{ConfigError, RankerConfig};
use crate::models::{AnalysisResult, ConditionScore, InstitutionCandidate, RankedInstitution};

/// Confidence a suggestion needs before it is used to look up institutions.
const TARGET_CONFIDENCE: f64 = 0.3;

/// Something that names a condition (a suggestion, or a plain name).
pub trait NamedCondition {
    fn condition_name(&self) -> &str;
}

impl NamedCondition for ConditionScore {
    fn condition_name(&self) -> &str {
        &self.name
    }
}

impl NamedCondition for String {
    fn condition_name(&self) -> &str {
        self
    }
}

impl NamedCondition for &str {
    fn condition_name(&self) -> &str {
        self
    }
}

/// Ranks caller-supplied institutions against suggested conditions.
#[derive(Debug, Clone, Default)]
pub struct InstitutionRanker {
    config: RankerConfig,
}

impl InstitutionRanker {
    /// Create a ranker with default weights.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a ranker with custom weights.
    pub fn with_config(config: RankerConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Rank institutions, best first, capped to the configured maximum.
    pub fn recommend<C: NamedCondition>(
        &self,
        conditions: &[C],
        institutions: &[InstitutionCandidate],
        preferred_city: Option<&str>,
    ) -> Vec<RankedInstitution> {
        if conditions.is_empty() {
            return Vec::new();
        }

        let names: Vec<&str> = conditions.iter().map(|c| c.condition_name()).collect();

        let mut ranked: Vec<RankedInstitution> = institutions
            .iter()
            .map(|institution| self.score_institution(institution, &names, preferred_city))
            .collect();

        // Stable: ties keep input order.
        ranked.sort_by(|a, b| {
            b.match_score
                .partial_cmp(&a.match_score)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        ranked.truncate(self.config.max_results);

        info!(
            candidates = institutions.len(),
            returned = ranked.len(),
            "institution ranking complete"
        );

        ranked
    }

    /// Score a single institution.
    fn score_institution(
        &self,
        institution: &InstitutionCandidate,
        names: &[&str],
        preferred_city: Option<&str>,
    ) -> RankedInstitution {
        let mut score = 0.0;
        let mut matching_specialties: Vec<String> = Vec::new();

        for service in institution.services.iter().filter(|s| s.targets_any(names)) {
            score += self.config.service_weight;
            if !matching_specialties.contains(&service.category) {
                matching_specialties.push(service.category.clone());
            }
        }

        if preferred_city.is_some_and(|city| city == institution.city) {
            score += self.config.city_bonus;
        }

        RankedInstitution {
            id: institution.id,
            name: institution.name.clone(),
            city: institution.city.clone(),
            region: institution.region.clone(),
            address: institution.address.clone(),
            match_score: f64::min(score, 1.0),
            matching_specialties,
            total_services: institution.services.len() as u32,
        }
    }
}

/// Condition names to look institutions up by.
///
/// Order: the confirmed diagnosis, then suggestions above 0.3 confidence,
/// deduplicated. Falls back to the suspected condition when nothing else
/// is known.
pub fn target_conditions(
    confirmed_diagnosis: Option<&str>,
    analysis: Option<&AnalysisResult>,
    suspected_condition: Option<&str>,
) -> Vec<String> {
    let mut targets: Vec<String> = Vec::new();

    if let Some(diagnosis) = confirmed_diagnosis {
        push_unique(&mut targets, diagnosis);
    }

    if let Some(analysis) = analysis {
        for condition in analysis
            .suggested_conditions
            .iter()
            .filter(|c| c.confidence > TARGET_CONFIDENCE)
        {
            push_unique(&mut targets, &condition.name);
        }
    }

    if targets.is_empty() {
        if let Some(suspected) = suspected_condition {
            push_unique(&mut targets, suspected);
        }
    }

    targets
}

fn push_unique(targets: &mut Vec<String>, name: &str) {
    if !name.is_empty() && !targets.iter().any(|t| t == name) {
        targets.push(name.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzer::Analyzer;
    use crate::models::ServiceOffering;

    fn institution(id: u64, city: &str, services: Vec<ServiceOffering>) -> InstitutionCandidate {
        let mut candidate = InstitutionCandidate::new(id, format!("Center {}", id), city.into());
        candidate.services = services;
        candidate
    }

    #[test]
    fn test_city_and_service_match() {
        let ranker = InstitutionRanker::new();
        let institutions = vec![institution(1, "Riyadh", vec![ServiceOffering::new("Speech", &["ASD"])])];

        let ranked = ranker.recommend(&["ASD"], &institutions, Some("Riyadh"));

        assert_eq!(ranked.len(), 1);
        assert_eq!(ranked[0].id, 1);
        assert!((ranked[0].match_score - 0.7).abs() < 1e-9);
        assert_eq!(ranked[0].matching_specialties, vec!["Speech"]);
        assert_eq!(ranked[0].total_services, 1);
    }

    #[test]
    fn test_empty_conditions() {
        let ranker = InstitutionRanker::new();
        let institutions = vec![institution(1, "Riyadh", vec![ServiceOffering::new("Speech", &["ASD"])])];
        let none: [&str; 0] = [];

        assert!(ranker.recommend(&none, &institutions, Some("Riyadh")).is_empty());
    }

    #[test]
    fn test_score_accumulates_and_clamps() {
        let ranker = InstitutionRanker::new();
        let institutions = vec![institution(
            1,
            "Jeddah",
            vec![
                ServiceOffering::new("Speech", &["ASD"]),
                ServiceOffering::new("Behavioral", &["ASD", "ADHD"]),
                ServiceOffering::new("Speech", &["ADHD"]),
                ServiceOffering::new("Physio", &["Down Syndrome"]),
            ],
        )];

        let ranked = ranker.recommend(&["ASD", "ADHD"], &institutions, Some("Jeddah"));

        // 3 x 0.4 + 0.3 clamps to 1.0
        assert_eq!(ranked[0].match_score, 1.0);
        assert_eq!(ranked[0].matching_specialties, vec!["Speech", "Behavioral"]);
        assert_eq!(ranked[0].total_services, 4);
    }

    #[test]
    fn test_ordering_is_stable() {
        let ranker = InstitutionRanker::new();
        let speech = || vec![ServiceOffering::new("Speech", &["ASD"])];
        let institutions = vec![
            institution(1, "Dammam", vec![]),
            institution(2, "Dammam", speech()),
            institution(3, "Dammam", speech()),
            institution(4, "Riyadh", speech()),
        ];

        let ranked = ranker.recommend(&["ASD"], &institutions, Some("Riyadh"));
        let ids: Vec<u64> = ranked.iter().map(|r| r.id).collect();

        assert_eq!(ids, vec![4, 2, 3, 1]);
        assert_eq!(ranked[3].match_score, 0.0);
    }

    #[test]
    fn test_city_must_match_exactly() {
        let ranker = InstitutionRanker::new();
        let institutions = vec![institution(1, "Riyadh", vec![])];

        let ranked = ranker.recommend(&["ASD"], &institutions, Some("riyadh"));
        assert_eq!(ranked[0].match_score, 0.0);

        let ranked = ranker.recommend(&["ASD"], &institutions, None);
        assert_eq!(ranked[0].match_score, 0.0);
    }

    #[test]
    fn test_capped_results() {
        let ranker = InstitutionRanker::new();
        let institutions: Vec<InstitutionCandidate> =
            (1..=25).map(|id| institution(id, "Riyadh", vec![])).collect();

        assert_eq!(ranker.recommend(&["ASD"], &institutions, None).len(), 10);

        let small = InstitutionRanker::with_config(RankerConfig {
            max_results: 3,
            ..Default::default()
        })
        .unwrap();
        assert_eq!(small.recommend(&["ASD"], &institutions, None).len(), 3);
    }

    #[test]
    fn test_recommend_from_analysis() {
        let analysis = Analyzer::default().analyze("avoids eye contact and flaps his hands", "", "");
        let institutions = vec![
            institution(1, "Riyadh", vec![ServiceOffering::new("Physio", &["Down Syndrome"])]),
            institution(2, "Riyadh", vec![ServiceOffering::new("ABA", &["ASD"])]),
        ];

        let ranked = InstitutionRanker::new().recommend(&analysis.suggested_conditions, &institutions, None);
        assert_eq!(ranked[0].id, 2);
        assert_eq!(ranked[0].matching_specialties, vec!["ABA"]);
    }

    #[test]
    fn test_target_conditions() {
        let analysis = Analyzer::default().analyze("avoids eye contact and flaps his hands constantly", "", "");
        let asd = analysis.top_condition().unwrap().confidence;
        assert!(asd > 0.3);

        assert_eq!(
            target_conditions(Some("ADHD"), Some(&analysis), Some("Speech & Language Disorder")),
            vec!["ADHD", "ASD"]
        );
        assert_eq!(target_conditions(Some("ASD"), Some(&analysis), None), vec!["ASD"]);
        assert_eq!(target_conditions(None, None, Some("ADHD")), vec!["ADHD"]);
        assert!(target_conditions(None, None, None).is_empty());
    }
}
