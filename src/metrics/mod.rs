/*!
 * # Metrics Module
 *
 * Prometheus counters and histograms for the planning pipeline, exported in
 * text format at `/metrics`.
 *
 * - `planning_computations_total`: successful pipeline runs
 * - `planning_computation_failures_total{error_type}`: failed runs by error kind
 * - `planning_computation_seconds`: pipeline latency
 * - `series_cache_hits_total` / `series_cache_misses_total`: history memoization
 */

use lazy_static::lazy_static;
use prometheus::{
    Encoder, Histogram, HistogramOpts, IntCounter, IntCounterVec, Registry, TextEncoder,
};
use std::time::Duration;
use thiserror::Error;
use tracing::warn;

#[derive(Debug, Error)]
pub enum MetricsError {
    #[error("Failed to export metrics: {0}")]
    ExportError(String),
}

lazy_static! {
    static ref REGISTRY: Registry = build_registry();
    static ref PLANNING_COMPUTATIONS: IntCounter = IntCounter::new(
        "planning_computations_total",
        "Total number of successful planning computations"
    )
    .expect("metric can be created");
    static ref PLANNING_FAILURES: IntCounterVec = IntCounterVec::new(
        prometheus::Opts::new(
            "planning_computation_failures_total",
            "Total number of failed planning computations"
        ),
        &["error_type"]
    )
    .expect("metric can be created");
    static ref PLANNING_LATENCY: Histogram = Histogram::with_opts(
        HistogramOpts::new(
            "planning_computation_seconds",
            "Time spent running the planning pipeline"
        )
        .buckets(vec![0.0001, 0.0005, 0.001, 0.005, 0.01, 0.05, 0.1, 0.5])
    )
    .expect("metric can be created");
    static ref SERIES_CACHE_HITS: IntCounter = IntCounter::new(
        "series_cache_hits_total",
        "Sales history lookups served from cache"
    )
    .expect("metric can be created");
    static ref SERIES_CACHE_MISSES: IntCounter = IntCounter::new(
        "series_cache_misses_total",
        "Sales history lookups that required generation"
    )
    .expect("metric can be created");
}

fn build_registry() -> Registry {
    let registry = Registry::new();
    let collectors: Vec<Box<dyn prometheus::core::Collector>> = vec![
        Box::new(PLANNING_COMPUTATIONS.clone()),
        Box::new(PLANNING_FAILURES.clone()),
        Box::new(PLANNING_LATENCY.clone()),
        Box::new(SERIES_CACHE_HITS.clone()),
        Box::new(SERIES_CACHE_MISSES.clone()),
    ];
    for collector in collectors {
        if let Err(err) = registry.register(collector) {
            warn!("Failed to register metric: {}", err);
        }
    }
    registry
}

/// Records the outcome of one pipeline run.
pub fn record_computation(outcome: Result<(), &'static str>, elapsed: Duration) {
    PLANNING_LATENCY.observe(elapsed.as_secs_f64());
    match outcome {
        Ok(()) => PLANNING_COMPUTATIONS.inc(),
        Err(error_type) => PLANNING_FAILURES.with_label_values(&[error_type]).inc(),
    }
}

pub fn record_cache_lookup(hit: bool) {
    if hit {
        SERIES_CACHE_HITS.inc();
    } else {
        SERIES_CACHE_MISSES.inc();
    }
}

/// Point-in-time view of the counters, reported by the detailed health check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct MetricsSnapshot {
    pub computations: u64,
    pub cache_hits: u64,
    pub cache_misses: u64,
}

pub fn snapshot() -> MetricsSnapshot {
    MetricsSnapshot {
        computations: PLANNING_COMPUTATIONS.get(),
        cache_hits: SERIES_CACHE_HITS.get(),
        cache_misses: SERIES_CACHE_MISSES.get(),
    }
}

/// Renders all registered metrics in the Prometheus text exposition format.
pub fn export_metrics() -> Result<String, MetricsError> {
    let encoder = TextEncoder::new();
    let families = REGISTRY.gather();
    let mut buffer = Vec::new();
    encoder
        .encode(&families, &mut buffer)
        .map_err(|e| MetricsError::ExportError(e.to_string()))?;
    String::from_utf8(buffer).map_err(|e| MetricsError::ExportError(e.to_string()))
}
