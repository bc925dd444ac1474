//! Model artifacts
//!
//! Each `model_<name>.json` is a self-describing JSON document with the
//! fitted parameters of one regressor.

use crate::artifacts::Predictor;
use crate::error::PredictError;
use serde::{Deserialize, Serialize};

/// One node of an array-encoded regression tree.
///
/// A node is a leaf when both children are absent; `value` is only
/// meaningful on leaves.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TreeNode {
    /// Split feature index (unused on leaves)
    #[serde(default)]
    pub feature: usize,
    /// Split threshold: `x[feature] <= threshold` goes left
    #[serde(default)]
    pub threshold: f64,
    pub left: Option<usize>,
    pub right: Option<usize>,
    #[serde(default)]
    pub value: f64,
}

/// A single regression tree, nodes indexed from the root at 0.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tree {
    pub nodes: Vec<TreeNode>,
}

impl Tree {
    fn predict(&self, features: &[f64]) -> Result<f64, PredictError> {
        let mut idx = 0;
        // A well-formed tree reaches a leaf in at most nodes.len() hops.
        for _ in 0..=self.nodes.len() {
            let node = self.nodes.get(idx).ok_or_else(|| {
                PredictError::Inference(format!("tree node index {idx} out of range"))
            })?;

            match (node.left, node.right) {
                (None, None) => return Ok(node.value),
                (Some(left), Some(right)) => {
                    let x = features.get(node.feature).ok_or_else(|| {
                        PredictError::FeatureMismatch {
                            expected: node.feature + 1,
                            got: features.len(),
                        }
                    })?;
                    idx = if *x <= node.threshold { left } else { right };
                }
                _ => {
                    return Err(PredictError::Inference(
                        "tree node with a single child".to_string(),
                    ))
                }
            }
        }
        Err(PredictError::Inference(
            "cycle in tree structure".to_string(),
        ))
    }
}

/// A fitted model restored from a `model_<name>.json` artifact.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ModelArtifact {
    /// Ordinary least squares / ridge style linear regressor.
    Linear {
        coefficients: Vec<f64>,
        intercept: f64,
    },

    /// Ensemble of regression trees; the prediction is the per-tree mean.
    Forest { trees: Vec<Tree> },
}

impl Predictor for ModelArtifact {
    fn predict(&self, features: &[f64]) -> Result<f64, PredictError> {
        match self {
            Self::Linear {
                coefficients,
                intercept,
            } => {
                if coefficients.len() != features.len() {
                    return Err(PredictError::FeatureMismatch {
                        expected: coefficients.len(),
                        got: features.len(),
                    });
                }
                let dot: f64 = coefficients
                    .iter()
                    .zip(features)
                    .map(|(c, x)| c * x)
                    .sum();
                Ok(intercept + dot)
            }
            Self::Forest { trees } => {
                if trees.is_empty() {
                    return Err(PredictError::Inference(
                        "forest artifact contains no trees".to_string(),
                    ));
                }
                let sum = trees
                    .iter()
                    .map(|tree| tree.predict(features))
                    .sum::<Result<f64, PredictError>>()?;
                Ok(sum / trees.len() as f64)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn leaf(value: f64) -> TreeNode {
        TreeNode {
            feature: 0,
            threshold: 0.0,
            left: None,
            right: None,
            value,
        }
    }

    fn split(feature: usize, threshold: f64, left: usize, right: usize) -> TreeNode {
        TreeNode {
            feature,
            threshold,
            left: Some(left),
            right: Some(right),
            value: 0.0,
        }
    }

    #[test]
    fn test_linear_prediction() {
        let model = ModelArtifact::Linear {
            coefficients: vec![2.0, -1.0],
            intercept: 10.0,
        };
        let value = model.predict(&[3.0, 4.0]).unwrap();
        assert_eq!(value, 12.0);
    }

    #[test]
    fn test_linear_width_mismatch() {
        let model = ModelArtifact::Linear {
            coefficients: vec![1.0, 1.0],
            intercept: 0.0,
        };
        let err = model.predict(&[1.0]).unwrap_err();
        assert!(matches!(err, PredictError::FeatureMismatch { .. }));
    }

    #[test]
    fn test_tree_traversal() {
        // x[0] <= 5 -> 100, otherwise x[1] <= 1 -> 200 else 300
        let tree = Tree {
            nodes: vec![
                split(0, 5.0, 1, 2),
                leaf(100.0),
                split(1, 1.0, 3, 4),
                leaf(200.0),
                leaf(300.0),
            ],
        };
        let model = ModelArtifact::Forest { trees: vec![tree] };

        assert_eq!(model.predict(&[3.0, 0.0]).unwrap(), 100.0);
        assert_eq!(model.predict(&[7.0, 0.5]).unwrap(), 200.0);
        assert_eq!(model.predict(&[7.0, 2.0]).unwrap(), 300.0);
    }

    #[test]
    fn test_forest_averages_trees() {
        let model = ModelArtifact::Forest {
            trees: vec![Tree { nodes: vec![leaf(10.0)] }, Tree { nodes: vec![leaf(30.0)] }],
        };
        assert_eq!(model.predict(&[]).unwrap(), 20.0);
    }

    #[test]
    fn test_empty_forest_rejected() {
        let model = ModelArtifact::Forest { trees: Vec::new() };
        let err = model.predict(&[1.0]).unwrap_err();
        assert!(matches!(err, PredictError::Inference(_)));
    }

    #[test]
    fn test_malformed_tree_cycle_detected() {
        // Node 0 routes to itself on both branches.
        let tree = Tree {
            nodes: vec![split(0, 5.0, 0, 0)],
        };
        let model = ModelArtifact::Forest { trees: vec![tree] };
        let err = model.predict(&[1.0]).unwrap_err();
        assert!(matches!(err, PredictError::Inference(_)));
    }

    #[test]
    fn test_tagged_deserialization() {
        let json = r#"{"kind": "linear", "coefficients": [2.0], "intercept": 0.0}"#;
        let model: ModelArtifact = serde_json::from_str(json).unwrap();
        assert_eq!(model.predict(&[21.0]).unwrap(), 42.0);
    }
}
