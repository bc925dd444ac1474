//! Inference invocation: assemble a row, transform, predict

use crate::artifacts::{ArtifactStore, Predictor, Transformer};
use crate::error::PredictError;
use crate::types::Prediction;
use std::collections::BTreeMap;
use tracing::debug;

impl ArtifactStore {
    /// Run one prediction from submitted form values.
    ///
    /// The row is assembled by feature name in `feature_names_in` order, so
    /// callers may present inputs in any order as long as every feature has
    /// a value.
    pub fn predict(
        &self,
        model_name: &str,
        form: &BTreeMap<String, f64>,
    ) -> Result<Prediction, PredictError> {
        let model = self
            .model(model_name)
            .ok_or_else(|| PredictError::UnknownModel(model_name.to_string()))?;

        let row = assemble_row(&self.metadata().feature_names_in, form)?;
        let features = self.preprocessor().transform(&row)?;
        let value = model.predict(&features)?;

        debug!(model = %model_name, value, "prediction complete");

        Ok(Prediction::new(
            self.metadata().target.clone(),
            value,
            model_name.to_string(),
            form.clone(),
        ))
    }
}

/// Collect form values into a single row in feature order.
fn assemble_row(
    feature_names: &[String],
    form: &BTreeMap<String, f64>,
) -> Result<Vec<f64>, PredictError> {
    feature_names
        .iter()
        .map(|name| {
            form.get(name)
                .copied()
                .ok_or_else(|| PredictError::IncompleteInput(name.clone()))
        })
        .collect()
}
