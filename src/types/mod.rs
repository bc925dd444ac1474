//! Shared data types

pub mod metadata;
pub mod prediction;

pub use metadata::{FeatureStats, Metadata};
pub use prediction::Prediction;
