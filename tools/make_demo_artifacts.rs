//! Demo Artifact Generator
//!
//! Writes a complete sample artifact directory (metadata, preprocessor and
//! two models) so the predictor can be tried without a real training export.

use anyhow::{Context, Result};
use revenue_predictor::artifacts::model::{Tree, TreeNode};
use revenue_predictor::artifacts::store::{model_file_name, METADATA_FILE, PREPROCESSOR_FILE};
use revenue_predictor::artifacts::{ModelArtifact, PreprocessorArtifact};
use revenue_predictor::types::{FeatureStats, Metadata};
use serde::Serialize;
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use tracing::info;

fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("make_demo_artifacts=info".parse()?),
        )
        .init();

    let args: Vec<String> = std::env::args().collect();
    let out_dir = args.get(1).map(|s| s.as_str()).unwrap_or("artifacts");

    info!(dir = %out_dir, "Generating demo artifacts");
    fs::create_dir_all(out_dir).context("Failed to create artifact directory")?;
    let out_dir = Path::new(out_dir);

    let metadata = demo_metadata();
    write_json(&out_dir.join(METADATA_FILE), &metadata)?;

    write_json(&out_dir.join(PREPROCESSOR_FILE), &demo_preprocessor())?;

    write_json(&out_dir.join(model_file_name("linear")), &demo_linear())?;
    write_json(&out_dir.join(model_file_name("rf")), &demo_forest())?;

    info!(
        predicts = %metadata.target,
        features = metadata.feature_names_in.len(),
        models = metadata.models.len(),
        "Demo artifacts written"
    );

    Ok(())
}

fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value)?;
    fs::write(path, json).context(format!("Failed to write {}", path.display()))?;
    info!(path = %path.display(), "Artifact written");
    Ok(())
}

fn demo_metadata() -> Metadata {
    let mut feature_summary = HashMap::new();
    feature_summary.insert(
        "budget".to_string(),
        stats(100_000.0, 300_000_000.0, 40_000_000.0),
    );
    feature_summary.insert("runtime".to_string(), stats(60.0, 200.0, 110.0));
    feature_summary.insert("popularity".to_string(), stats(0.5, 300.0, 21.0));
    feature_summary.insert("vote_average".to_string(), stats(2.0, 9.0, 6.3));

    Metadata {
        target: "revenue".to_string(),
        feature_names_in: vec![
            "budget".to_string(),
            "runtime".to_string(),
            "popularity".to_string(),
            "vote_average".to_string(),
        ],
        feature_summary,
        models: vec!["linear".to_string(), "rf".to_string()],
    }
}

fn stats(min: f64, max: f64, mean: f64) -> FeatureStats {
    FeatureStats {
        min: Some(min),
        max: Some(max),
        mean: Some(mean),
    }
}

fn demo_preprocessor() -> PreprocessorArtifact {
    PreprocessorArtifact::Standard {
        mean: vec![40_000_000.0, 110.0, 21.0, 6.3],
        scale: vec![55_000_000.0, 22.0, 30.0, 0.9],
    }
}

fn demo_linear() -> ModelArtifact {
    ModelArtifact::Linear {
        coefficients: vec![110_000_000.0, 5_000_000.0, 25_000_000.0, 15_000_000.0],
        intercept: 90_000_000.0,
    }
}

fn demo_forest() -> ModelArtifact {
    // Small hand-built trees splitting on scaled budget and popularity.
    let budget_tree = Tree {
        nodes: vec![
            split(0, 0.0, 1, 2),
            leaf(35_000_000.0),
            split(0, 1.5, 3, 4),
            leaf(160_000_000.0),
            leaf(420_000_000.0),
        ],
    };
    let popularity_tree = Tree {
        nodes: vec![
            split(2, 0.5, 1, 2),
            leaf(60_000_000.0),
            leaf(280_000_000.0),
        ],
    };
    let blend_tree = Tree {
        nodes: vec![
            split(0, 0.8, 1, 4),
            split(3, 0.0, 2, 3),
            leaf(40_000_000.0),
            leaf(95_000_000.0),
            leaf(320_000_000.0),
        ],
    };

    ModelArtifact::Forest {
        trees: vec![budget_tree, popularity_tree, blend_tree],
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

fn leaf(value: f64) -> TreeNode {
    TreeNode {
        feature: 0,
        threshold: 0.0,
        left: None,
        right: None,
        value,
    }
}
