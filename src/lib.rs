//! Revenue Predictor Library
//!
//! An interactive front-end for a trained regression pipeline: loads a
//! preprocessor and fitted models from an artifact directory and serves a
//! web form that predicts the target quantity from user-entered features.

pub mod artifacts;
pub mod config;
pub mod error;
pub mod form;
pub mod inference;
pub mod metrics;
pub mod server;
pub mod types;

pub use artifacts::{ArtifactStore, ModelArtifact, Predictor, PreprocessorArtifact, Transformer};
pub use config::AppConfig;
pub use error::{ArtifactError, PredictError};
pub use form::{build_fields, InputField};
pub use server::AppServer;
pub use types::{Metadata, Prediction};
