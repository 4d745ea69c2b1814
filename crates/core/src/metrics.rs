//! Prometheus metrics for core components.
//!
//! This module provides metrics for:
//! - Per-source indexer requests (outcome, latency)
//! - Aggregation results

use once_cell::sync::Lazy;
use prometheus::{HistogramOpts, HistogramVec, IntCounterVec, Opts};

// =============================================================================
// Sources
// =============================================================================

/// Indexer requests total by source and outcome.
pub static SOURCE_REQUESTS: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new(
            "seedscout_source_requests_total",
            "Total indexer requests",
        ),
        &["source", "status"], // "success", "error", "cancelled"
    )
    .unwrap()
});

/// Indexer request duration in seconds.
pub static SOURCE_DURATION: Lazy<HistogramVec> = Lazy::new(|| {
    HistogramVec::new(
        HistogramOpts::new(
            "seedscout_source_duration_seconds",
            "Duration of indexer requests",
        )
        .buckets(vec![0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0, 20.0, 30.0]),
        &["source"],
    )
    .unwrap()
});

// =============================================================================
// Aggregation
// =============================================================================

/// Candidates returned per aggregation, after dedup and filtering.
pub static CANDIDATES_RETURNED: Lazy<HistogramVec> = Lazy::new(|| {
    HistogramVec::new(
        HistogramOpts::new(
            "seedscout_candidates_returned",
            "Number of candidates returned per aggregation",
        )
        .buckets(vec![0.0, 1.0, 5.0, 10.0, 20.0, 40.0, 80.0]),
        &[],
    )
    .unwrap()
});

/// Get all core metrics for registration.
pub fn all_metrics() -> Vec<Box<dyn prometheus::core::Collector>> {
    vec![
        Box::new(SOURCE_REQUESTS.clone()),
        Box::new(SOURCE_DURATION.clone()),
        Box::new(CANDIDATES_RETURNED.clone()),
    ]
}
