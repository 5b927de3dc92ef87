//! Prometheus metrics for core components.
//!
//! This module provides metrics for:
//! - Worker pool (active tasks, analysis duration)
//! - Line pipelines (dispatched and returned sheets, reorder buffer depth)
//! - Controller (finished lines)
//!
//! The collectors are not registered anywhere; the binary owns the registry.

use once_cell::sync::Lazy;
use prometheus::{Histogram, HistogramOpts, IntCounter, IntCounterVec, IntGauge, IntGaugeVec, Opts};

// =============================================================================
// Worker Pool Metrics
// =============================================================================

/// Analysis tasks currently holding a worker slot.
pub static WORKER_POOL_ACTIVE: Lazy<IntGauge> = Lazy::new(|| {
    IntGauge::new(
        "sheetline_worker_pool_active",
        "Number of analysis tasks currently running",
    )
    .unwrap()
});

/// Analysis duration in seconds.
pub static ANALYSIS_DURATION: Lazy<Histogram> = Lazy::new(|| {
    Histogram::with_opts(
        HistogramOpts::new(
            "sheetline_analysis_duration_seconds",
            "Duration of a single sheet analysis",
        )
        .buckets(vec![0.0005, 0.001, 0.005, 0.01, 0.05, 0.1, 0.5, 1.0, 5.0]),
    )
    .unwrap()
});

// =============================================================================
// Line Pipeline Metrics
// =============================================================================

/// Sheets submitted to the worker pool, per line.
pub static SHEETS_DISPATCHED: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new(
            "sheetline_sheets_dispatched_total",
            "Total sheets submitted for analysis",
        ),
        &["line"],
    )
    .unwrap()
});

/// Sheets handed back to their line, per line.
pub static SHEETS_RETURNED: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new(
            "sheetline_sheets_returned_total",
            "Total sheets returned to their production line",
        ),
        &["line"],
    )
    .unwrap()
});

/// Analyzed sheets waiting for a predecessor, per line.
pub static REORDER_BUFFER_DEPTH: Lazy<IntGaugeVec> = Lazy::new(|| {
    IntGaugeVec::new(
        Opts::new(
            "sheetline_reorder_buffer_depth",
            "Analyzed sheets waiting for an earlier sheet to finish",
        ),
        &["line"],
    )
    .unwrap()
});

// =============================================================================
// Controller Metrics
// =============================================================================

/// Lines that reached the finished state.
pub static LINES_FINISHED: Lazy<IntCounter> = Lazy::new(|| {
    IntCounter::new(
        "sheetline_lines_finished_total",
        "Total production lines fully drained",
    )
    .unwrap()
});

// =============================================================================
// Helper functions
// =============================================================================

/// Get all core metrics for registration in a registry.
pub fn all_metrics() -> Vec<Box<dyn prometheus::core::Collector>> {
    vec![
        // Worker pool
        Box::new(WORKER_POOL_ACTIVE.clone()),
        Box::new(ANALYSIS_DURATION.clone()),
        // Line pipelines
        Box::new(SHEETS_DISPATCHED.clone()),
        Box::new(SHEETS_RETURNED.clone()),
        Box::new(REORDER_BUFFER_DEPTH.clone()),
        // Controller
        Box::new(LINES_FINISHED.clone()),
    ]
}
