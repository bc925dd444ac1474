//! Prediction throughput and latency tracking

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::RwLock;
use std::time::{Duration, Instant};
use tracing::info;

/// Metrics collector for the prediction service
pub struct PredictionMetrics {
    /// Total successful predictions served
    pub predictions_served: AtomicU64,
    /// Total failed prediction attempts
    pub predictions_failed: AtomicU64,
    /// Predictions per model name
    by_model: RwLock<HashMap<String, u64>>,
    /// Serving latencies (in microseconds)
    latencies_us: RwLock<Vec<u64>>,
    /// Start time for rate calculation
    start_time: Instant,
}

impl PredictionMetrics {
    /// Create a new metrics collector
    pub fn new() -> Self {
        Self {
            predictions_served: AtomicU64::new(0),
            predictions_failed: AtomicU64::new(0),
            by_model: RwLock::new(HashMap::new()),
            latencies_us: RwLock::new(Vec::with_capacity(1000)),
            start_time: Instant::now(),
        }
    }

    /// Record a successfully served prediction
    pub fn record_prediction(&self, model: &str, latency: Duration) {
        self.predictions_served.fetch_add(1, Ordering::Relaxed);

        if let Ok(mut by_model) = self.by_model.write() {
            *by_model.entry(model.to_string()).or_insert(0) += 1;
        }

        if let Ok(mut latencies) = self.latencies_us.write() {
            latencies.push(latency.as_micros() as u64);
            // Keep only recent samples for memory efficiency
            if latencies.len() > 10000 {
                latencies.drain(0..5000);
            }
        }
    }

    /// Record a failed prediction attempt
    pub fn record_failure(&self) {
        self.predictions_failed.fetch_add(1, Ordering::Relaxed);
    }

    /// Get serving latency statistics
    pub fn get_latency_stats(&self) -> LatencyStats {
        let latencies = self.latencies_us.read().unwrap();
        if latencies.is_empty() {
            return LatencyStats::default();
        }

        let mut sorted: Vec<u64> = latencies.clone();
        sorted.sort();

        let sum: u64 = sorted.iter().sum();
        let count = sorted.len();

        LatencyStats {
            count: count as u64,
            mean_us: sum / count as u64,
            p50_us: sorted[count / 2],
            p95_us: sorted[(count as f64 * 0.95) as usize],
            max_us: *sorted.last().unwrap_or(&0),
        }
    }

    /// Get prediction counts per model
    pub fn get_by_model(&self) -> HashMap<String, u64> {
        self.by_model.read().unwrap().clone()
    }

    /// Get current serving rate (predictions per second)
    pub fn get_throughput(&self) -> f64 {
        let elapsed = self.start_time.elapsed().as_secs_f64();
        if elapsed > 0.0 {
            self.predictions_served.load(Ordering::Relaxed) as f64 / elapsed
        } else {
            0.0
        }
    }

    /// Print summary statistics
    pub fn print_summary(&self) {
        let served = self.predictions_served.load(Ordering::Relaxed);
        let failed = self.predictions_failed.load(Ordering::Relaxed);
        if served == 0 && failed == 0 {
            return;
        }

        let latency = self.get_latency_stats();
        info!(
            served,
            failed,
            throughput = format!("{:.2}/s", self.get_throughput()),
            latency_mean_us = latency.mean_us,
            latency_p95_us = latency.p95_us,
            "prediction metrics summary"
        );
        for (model, count) in self.get_by_model() {
            info!(model = %model, count, "predictions by model");
        }
    }
}

impl Default for PredictionMetrics {
    fn default() -> Self {
        Self::new()
    }
}

/// Serving latency statistics
#[derive(Debug, Default)]
pub struct LatencyStats {
    pub count: u64,
    pub mean_us: u64,
    pub p50_us: u64,
    pub p95_us: u64,
    pub max_us: u64,
}

/// Periodic reporter that logs metrics summaries
pub struct MetricsReporter {
    metrics: std::sync::Arc<PredictionMetrics>,
    interval_secs: u64,
}

impl MetricsReporter {
    pub fn new(metrics: std::sync::Arc<PredictionMetrics>, interval_secs: u64) -> Self {
        Self {
            metrics,
            interval_secs,
        }
    }

    /// Start the periodic reporting task
    pub async fn start(self) {
        let mut interval = tokio::time::interval(Duration::from_secs(self.interval_secs));
        loop {
            interval.tick().await;
            self.metrics.print_summary();
        }
    }
}
