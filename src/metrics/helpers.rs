//! Metrics helper structs for convenient metric recording

use prometheus::{Encoder, TextEncoder};

use super::{
    RENDERS_PARTIAL_TOTAL, RENDERS_TOTAL, STORE_LOADS_TOTAL, STORE_SAVE_ERRORS_TOTAL,
    TEMPLATES_STORED, TEMPLATE_OPERATIONS_TOTAL,
};

/// Encode all metrics to Prometheus text format
pub fn encode_metrics() -> Result<String, prometheus::Error> {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    let mut buffer = Vec::new();
    encoder.encode(&metric_families, &mut buffer)?;
    Ok(String::from_utf8(buffer).unwrap_or_default())
}

/// Helper struct for recording store metrics
pub struct StoreMetrics;

impl StoreMetrics {
    /// Record a collection load from the given source
    pub fn record_load(source: &str) {
        STORE_LOADS_TOTAL.with_label_values(&[source]).inc();
    }

    /// Record a failed save
    pub fn record_save_error() {
        STORE_SAVE_ERRORS_TOTAL.inc();
    }

    /// Record a template mutation
    pub fn record_operation(operation: &str) {
        TEMPLATE_OPERATIONS_TOTAL
            .with_label_values(&[operation])
            .inc();
    }

    /// Set the current template count
    pub fn set_stored(count: usize) {
        TEMPLATES_STORED.set(count as i64);
    }
}

/// Helper struct for recording render metrics
pub struct RenderMetrics;

impl RenderMetrics {
    /// Record a render and whether it left placeholders unresolved
    pub fn record_render(unresolved: usize) {
        RENDERS_TOTAL.inc();
        if unresolved > 0 {
            RENDERS_PARTIAL_TOTAL.inc();
        }
    }
}
