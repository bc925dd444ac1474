//! Artifact loading and the capability traits the core depends on

pub mod model;
pub mod preprocessor;
pub mod store;

pub use model::ModelArtifact;
pub use preprocessor::PreprocessorArtifact;
pub use store::ArtifactStore;

use crate::error::PredictError;

/// A fitted row-to-feature-vector transformation.
///
/// The row carries one value per input feature, in `feature_names_in` order.
/// Internal semantics (encoding, scaling) are opaque to callers.
pub trait Transformer {
    fn transform(&self, row: &[f64]) -> Result<Vec<f64>, PredictError>;
}

/// A fitted predictor mapping a feature vector to a single target estimate.
pub trait Predictor {
    fn predict(&self, features: &[f64]) -> Result<f64, PredictError>;
}
