//! Prometheus metrics for the template manager.
//!
//! This module provides metrics for monitoring template usage:
//! - Store metrics (loads by source, save failures, stored template count)
//! - Mutation metrics (create, update, delete)
//! - Render metrics

mod helpers;

pub use helpers::{encode_metrics, RenderMetrics, StoreMetrics};

use lazy_static::lazy_static;
use prometheus::{
    register_int_counter, register_int_counter_vec, register_int_gauge, IntCounter,
    IntCounterVec, IntGauge,
};

/// Prefix for all metrics
const METRIC_PREFIX: &str = "email_templates";

lazy_static! {
    // ============================================================================
    // Store Metrics
    // ============================================================================

    /// Collection loads by where the collection came from
    pub static ref STORE_LOADS_TOTAL: IntCounterVec = register_int_counter_vec!(
        format!("{}_store_loads_total", METRIC_PREFIX),
        "Total template collection loads by source",
        &["source"]
    ).unwrap();

    /// Failed writes to the storage backend
    pub static ref STORE_SAVE_ERRORS_TOTAL: IntCounter = register_int_counter!(
        format!("{}_store_save_errors_total", METRIC_PREFIX),
        "Total failed template collection saves"
    ).unwrap();

    /// Number of templates currently held by the store
    pub static ref TEMPLATES_STORED: IntGauge = register_int_gauge!(
        format!("{}_stored", METRIC_PREFIX),
        "Number of templates currently stored"
    ).unwrap();

    /// Template mutations by operation
    pub static ref TEMPLATE_OPERATIONS_TOTAL: IntCounterVec = register_int_counter_vec!(
        format!("{}_operations_total", METRIC_PREFIX),
        "Total template mutations by operation",
        &["operation"]
    ).unwrap();

    // ============================================================================
    // Render Metrics
    // ============================================================================

    /// Emails rendered
    pub static ref RENDERS_TOTAL: IntCounter = register_int_counter!(
        format!("{}_renders_total", METRIC_PREFIX),
        "Total emails rendered"
    ).unwrap();

    /// Renders that left at least one placeholder unresolved
    pub static ref RENDERS_PARTIAL_TOTAL: IntCounter = register_int_counter!(
        format!("{}_renders_partial_total", METRIC_PREFIX),
        "Total renders with unresolved placeholders"
    ).unwrap();
}
