//! Revenue Predictor - Main Entry Point
//!
//! Loads the trained pipeline artifacts and serves the interactive
//! prediction form.

use anyhow::{Context, Result};
use revenue_predictor::{
    config::AppConfig,
    form::build_fields,
    metrics::{MetricsReporter, PredictionMetrics},
    server::AppServer,
    ArtifactStore,
};
use std::sync::Arc;
use tracing::{error, info};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("revenue_predictor=info".parse()?),
        )
        .init();

    info!("Starting Revenue Predictor");

    // Load configuration
    let config = AppConfig::load()?;
    info!(
        artifact_dir = %config.artifacts.dir,
        "Configuration loaded successfully"
    );

    // Load pipeline artifacts; any failure here is terminal
    let store = match ArtifactStore::open(&config.artifacts.dir) {
        Ok(store) => Arc::new(store),
        Err(e) => {
            error!(dir = %config.artifacts.dir, error = %e, "Failed to open artifact store");
            return Err(e).context("artifact loading failed; fix the artifact directory and restart");
        }
    };
    info!(
        predicts = %store.metadata().target,
        models = ?store.model_names(),
        "Artifact store ready with {} models",
        store.model_count()
    );

    let fields = build_fields(store.metadata());
    info!(features = fields.len(), "Input form prepared");

    // Initialize metrics and start the periodic reporter
    let metrics = Arc::new(PredictionMetrics::new());
    let metrics_clone = metrics.clone();
    tokio::spawn(async move {
        let reporter = MetricsReporter::new(metrics_clone, 30);
        reporter.start().await;
    });

    // Serve until stopped
    let server = AppServer::new(store, metrics);
    server.run(&config.server.host, config.server.port).await
}
