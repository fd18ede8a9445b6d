//! Extracted feature records and the reply parser.

use serde::{Deserialize, Serialize};

/// Criticality assigned when a reply fragment carries no colon-separated
/// label.
pub const UNKNOWN_CRITICALITY: &str = "Unknown";

/// One feature extracted from the requirement corpus. Criticality is
/// free text straight from the model, not a closed enum.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Feature {
    pub name: String,
    pub criticality: String,
}

impl Feature {
    pub fn new(name: impl Into<String>, criticality: impl Into<String>) -> Self {
        Self { name: name.into(), criticality: criticality.into() }
    }
}

impl std::fmt::Display for Feature {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.name, self.criticality)
    }
}

/// Parse a feature-enumeration reply into `(name, criticality)` pairs.
///
/// Deliberately permissive: the reply is split on commas, and each fragment
/// on its first colon. A fragment without a colon degrades to criticality
/// [`UNKNOWN_CRITICALITY`] rather than failing. Every comma-separated
/// fragment yields exactly one feature, so malformed model output produces
/// a partial or garbled list, never an error.
pub fn parse_features(reply: &str) -> Vec<Feature> {
    reply
        .split(',')
        .map(|fragment| match fragment.split_once(':') {
            Some((name, criticality)) => Feature::new(name.trim(), criticality.trim()),
            None => Feature::new(fragment.trim(), UNKNOWN_CRITICALITY),
        })
        .collect()
}

/// Join features as "name: criticality" fragments for embedding in prompts.
pub fn format_features(features: &[Feature]) -> String {
    features.iter().map(Feature::to_string).collect::<Vec<_>>().join(", ")
}
