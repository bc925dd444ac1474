//! Dynamic form construction from artifact metadata
//!
//! Input controls are derived from per-feature training statistics. The
//! statistics may be missing, non-finite, or degenerate (a constant feature
//! has min == max), so every bound goes through a fallback chain that always
//! yields a usable, non-degenerate range.

use crate::types::{FeatureStats, Metadata};
use serde::Serialize;

/// Descriptor of one bounded numeric input control.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InputField {
    pub name: String,
    pub min: f64,
    pub max: f64,
    /// Initial value shown in the control.
    pub value: f64,
}

/// Derive `(min, max, default)` bounds from feature statistics.
///
/// Fallbacks: a missing or non-finite minimum becomes `0.0`; a missing,
/// non-finite or inverted maximum becomes `min + 1.0`; a missing or
/// non-finite mean becomes the midpoint. A finite mean is clamped into the
/// derived range.
pub fn derive_bounds(stats: &FeatureStats) -> (f64, f64, f64) {
    let min = stats.min.filter(|v| v.is_finite()).unwrap_or(0.0);

    let max = match stats.max.filter(|v| v.is_finite()) {
        Some(v) if v > min => v,
        _ => min + 1.0,
    };

    let value = match stats.mean.filter(|v| v.is_finite()) {
        Some(v) => v.clamp(min, max),
        None => (min + max) / 2.0,
    };

    (min, max, value)
}

/// Build one input descriptor per feature, in `feature_names_in` order.
///
/// Pure function of the metadata; calling it twice yields identical fields.
pub fn build_fields(metadata: &Metadata) -> Vec<InputField> {
    metadata
        .feature_names_in
        .iter()
        .map(|name| {
            let (min, max, value) = derive_bounds(&metadata.stats_for(name));
            InputField {
                name: name.clone(),
                min,
                max,
                value,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn stats(min: Option<f64>, max: Option<f64>, mean: Option<f64>) -> FeatureStats {
        FeatureStats { min, max, mean }
    }

    #[test]
    fn test_well_formed_stats_pass_through() {
        let bounds = derive_bounds(&stats(Some(10.0), Some(20.0), Some(15.0)));
        assert_eq!(bounds, (10.0, 20.0, 15.0));
    }

    #[test]
    fn test_missing_stats_default_to_unit_range() {
        let bounds = derive_bounds(&FeatureStats::default());
        assert_eq!(bounds, (0.0, 1.0, 0.5));
    }

    #[test]
    fn test_constant_feature_widens_range() {
        // min == max, as produced by a constant training column.
        let bounds = derive_bounds(&stats(Some(1000.0), Some(1000.0), Some(1000.0)));
        assert_eq!(bounds, (1000.0, 1001.0, 1000.0));
    }

    #[test]
    fn test_inverted_range_widens_from_min() {
        let bounds = derive_bounds(&stats(Some(5.0), Some(2.0), None));
        assert_eq!(bounds, (5.0, 6.0, 5.5));
    }

    #[test]
    fn test_non_finite_stats_fall_back() {
        let bounds = derive_bounds(&stats(
            Some(f64::NEG_INFINITY),
            Some(f64::NAN),
            Some(f64::INFINITY),
        ));
        assert_eq!(bounds, (0.0, 1.0, 0.5));
    }

    #[test]
    fn test_out_of_range_mean_is_clamped() {
        let bounds = derive_bounds(&stats(Some(0.0), Some(10.0), Some(50.0)));
        assert_eq!(bounds, (0.0, 10.0, 10.0));
    }

    fn sample_metadata() -> Metadata {
        let mut feature_summary = HashMap::new();
        feature_summary.insert(
            "budget".to_string(),
            stats(Some(1000.0), Some(90000.0), Some(25000.0)),
        );
        Metadata {
            target: "revenue".to_string(),
            feature_names_in: vec!["budget".to_string(), "runtime".to_string()],
            feature_summary,
            models: vec!["linear".to_string()],
        }
    }

    #[test]
    fn test_fields_follow_feature_order() {
        let fields = build_fields(&sample_metadata());

        assert_eq!(fields.len(), 2);
        assert_eq!(fields[0].name, "budget");
        assert_eq!(fields[0].value, 25000.0);
        // No stats for runtime: fallback bounds.
        assert_eq!(fields[1].name, "runtime");
        assert_eq!((fields[1].min, fields[1].max, fields[1].value), (0.0, 1.0, 0.5));
    }

    #[test]
    fn test_build_fields_is_idempotent() {
        let metadata = sample_metadata();
        assert_eq!(build_fields(&metadata), build_fields(&metadata));
    }
}
