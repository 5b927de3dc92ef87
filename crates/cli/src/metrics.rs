//! Prometheus registry for the core collectors.

use anyhow::{Context, Result};
use prometheus::{Encoder, Registry, TextEncoder};

fn build_registry() -> Result<Registry> {
    let registry = Registry::new();
    for metric in sheetline_core::metrics::all_metrics() {
        registry
            .register(metric)
            .context("Failed to register core metric")?;
    }
    Ok(registry)
}

/// Encode every core metric in the Prometheus text format.
pub fn encode_metrics() -> Result<String> {
    let registry = build_registry()?;
    let encoder = TextEncoder::new();
    let mut buffer = Vec::new();
    encoder
        .encode(&registry.gather(), &mut buffer)
        .context("Failed to encode metrics")?;
    String::from_utf8(buffer).context("Metrics output is not UTF-8")
}
