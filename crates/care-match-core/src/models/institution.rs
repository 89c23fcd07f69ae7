//! Institution and service offering models.

use serde::{Deserialize, Serialize};

/// A service an institution offers (e.g., a session type).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ServiceOffering {
    /// Category label (e.g., "Speech", "Behavioral")
    pub category: String,
    /// Condition names this service targets
    #[serde(default)]
    pub target_conditions: Vec<String>,
}

impl ServiceOffering {
    pub fn new(category: &str, target_conditions: &[&str]) -> Self {
        Self {
            category: category.to_string(),
            target_conditions: target_conditions.iter().map(|c| c.to_string()).collect(),
        }
    }

    /// Check if this service targets any of the given condition names.
    pub fn targets_any(&self, names: &[&str]) -> bool {
        self.target_conditions
            .iter()
            .any(|target| names.contains(&target.as_str()))
    }
}

/// An institution considered by the ranker, fetched by the caller.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct InstitutionCandidate {
    pub id: u64,
    pub name: String,
    pub city: String,
    pub region: Option<String>,
    pub address: Option<String>,
    /// Services offered by this institution
    #[serde(default)]
    pub services: Vec<ServiceOffering>,
}

impl InstitutionCandidate {
    /// Create a candidate with required fields.
    pub fn new(id: u64, name: String, city: String) -> Self {
        Self {
            id,
            name,
            city,
            region: None,
            address: None,
            services: Vec::new(),
        }
    }
}

/// An institution with its match against the suggested conditions.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RankedInstitution {
    pub id: u64,
    pub name: String,
    pub city: String,
    pub region: Option<String>,
    pub address: Option<String>,
    /// Match score (0.0 - 1.0)
    pub match_score: f64,
    /// Deduplicated categories of matching services
    pub matching_specialties: Vec<String>,
    /// Number of services the institution offers
    pub total_services: u32,
}
