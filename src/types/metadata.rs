//! Artifact metadata describing the trained pipeline

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Per-feature summary statistics from the training data.
///
/// Every field is optional: older artifact exports omit them, and values may
/// be non-finite when the training column was degenerate. Consumers must
/// apply their own fallbacks.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct FeatureStats {
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub mean: Option<f64>,
}

/// Parsed `metadata.json` for a trained pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Metadata {
    /// Name of the predicted quantity (e.g. "revenue").
    pub target: String,

    /// Input feature names in the exact order the preprocessor expects.
    pub feature_names_in: Vec<String>,

    /// Summary statistics keyed by feature name. May be missing entries.
    #[serde(default)]
    pub feature_summary: HashMap<String, FeatureStats>,

    /// Candidate model identifiers produced by training.
    #[serde(default)]
    pub models: Vec<String>,
}

impl Metadata {
    /// Look up summary statistics for a feature.
    ///
    /// Unknown features get an empty record rather than an error, so the
    /// form builder can fall back to its default bounds.
    pub fn stats_for(&self, feature: &str) -> FeatureStats {
        self.feature_summary
            .get(feature)
            .copied()
            .unwrap_or_default()
    }
}
