//! Error taxonomy for artifact loading and prediction

use std::path::PathBuf;
use thiserror::Error;

/// Terminal failures while opening the artifact directory.
///
/// Any of these halts the session: the operator must regenerate the
/// artifacts via the training export and restart.
#[derive(Error, Debug)]
pub enum ArtifactError {
    #[error("required artifact missing: {path}. Run the training export to regenerate the artifact directory")]
    MissingArtifact { path: PathBuf },

    #[error("malformed artifact {path}: {reason}")]
    Malformed { path: PathBuf, reason: String },

    #[error("no models available: none of the models listed in metadata could be loaded")]
    NoModelsAvailable,

    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Recoverable failures while serving a single prediction.
///
/// The session stays usable; the user can adjust inputs and resubmit.
#[derive(Error, Debug)]
pub enum PredictError {
    /// A feature had no submitted value. The form populates every feature,
    /// so hitting this means an internal invariant was violated.
    #[error("no value provided for feature `{0}`")]
    IncompleteInput(String),

    #[error("unknown model `{0}`")]
    UnknownModel(String),

    #[error("feature count mismatch: expected {expected}, got {got}")]
    FeatureMismatch { expected: usize, got: usize },

    #[error("inference failed: {0}")]
    Inference(String),
}
