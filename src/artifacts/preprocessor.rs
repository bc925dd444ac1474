//! Preprocessor artifact
//!
//! A self-describing JSON document exported by the training pipeline. The
//! rest of the crate only calls [`Transformer::transform`] on it.

use crate::artifacts::Transformer;
use crate::error::PredictError;
use serde::{Deserialize, Serialize};

/// A fitted preprocessing transformer restored from `preprocessor.json`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PreprocessorArtifact {
    /// Pass the row through unchanged.
    Identity,

    /// Z-score scaling with per-column mean and scale.
    Standard { mean: Vec<f64>, scale: Vec<f64> },

    /// Min-max scaling to [0, 1] with per-column minimum and range.
    MinMax { min: Vec<f64>, range: Vec<f64> },
}

impl PreprocessorArtifact {
    /// Number of input columns this transformer was fitted on, or `None`
    /// for stateless kinds.
    pub fn n_features_in(&self) -> Option<usize> {
        match self {
            Self::Identity => None,
            Self::Standard { mean, .. } => Some(mean.len()),
            Self::MinMax { min, .. } => Some(min.len()),
        }
    }

    /// Check internal consistency of the fitted parameters.
    pub fn validate(&self) -> Result<(), String> {
        match self {
            Self::Identity => Ok(()),
            Self::Standard { mean, scale } if mean.len() != scale.len() => Err(format!(
                "standard scaler has {} means but {} scales",
                mean.len(),
                scale.len()
            )),
            Self::MinMax { min, range } if min.len() != range.len() => Err(format!(
                "minmax scaler has {} minimums but {} ranges",
                min.len(),
                range.len()
            )),
            _ => Ok(()),
        }
    }

    fn check_width(&self, got: usize) -> Result<(), PredictError> {
        match self.n_features_in() {
            Some(expected) if expected != got => {
                Err(PredictError::FeatureMismatch { expected, got })
            }
            _ => Ok(()),
        }
    }
}

impl Transformer for PreprocessorArtifact {
    fn transform(&self, row: &[f64]) -> Result<Vec<f64>, PredictError> {
        self.check_width(row.len())?;

        let features = match self {
            Self::Identity => row.to_vec(),
            Self::Standard { mean, scale } => row
                .iter()
                .zip(mean.iter().zip(scale))
                .map(|(&x, (&m, &s))| if s != 0.0 { (x - m) / s } else { 0.0 })
                .collect(),
            Self::MinMax { min, range } => row
                .iter()
                .zip(min.iter().zip(range))
                .map(|(&x, (&lo, &r))| if r != 0.0 { (x - lo) / r } else { 0.0 })
                .collect(),
        };

        Ok(features)
    }
}
