//! # Metrics
//!
//! Prometheus metrics for monitoring the controller.
//!
//! ## Metrics Exposed
//!
//! - `glue_job_reconciliations_total` - Total number of reconciliations
//! - `glue_job_reconciliation_errors_total` - Total number of reconciliation errors
//! - `glue_job_reconciliation_duration_seconds` - Duration of reconciliation passes
//! - `glue_job_aws_operations_total` - Glue API operations by operation
//! - `glue_job_aws_operation_errors_total` - Failed Glue API operations by operation
//! - `glue_job_aws_operation_duration_seconds` - Duration of Glue API operations
//! - `glue_job_requeues_total` - Requeues by trigger

use anyhow::Result;
use prometheus::{Histogram, HistogramVec, IntCounter, IntCounterVec, Registry};
use std::sync::LazyLock;

pub(crate) static REGISTRY: LazyLock<Registry> = LazyLock::new(Registry::new);

static RECONCILIATIONS_TOTAL: LazyLock<IntCounter> = LazyLock::new(|| {
    IntCounter::new(
        "glue_job_reconciliations_total",
        "Total number of reconciliations",
    )
    .expect("Failed to create RECONCILIATIONS_TOTAL metric - this should never happen")
});

static RECONCILIATION_ERRORS_TOTAL: LazyLock<IntCounter> = LazyLock::new(|| {
    IntCounter::new(
        "glue_job_reconciliation_errors_total",
        "Total number of reconciliation errors",
    )
    .expect("Failed to create RECONCILIATION_ERRORS_TOTAL metric - this should never happen")
});

static RECONCILIATION_DURATION: LazyLock<Histogram> = LazyLock::new(|| {
    Histogram::with_opts(
        prometheus::HistogramOpts::new(
            "glue_job_reconciliation_duration_seconds",
            "Duration of reconciliation in seconds",
        )
        .buckets(vec![0.1, 0.5, 1.0, 2.0, 5.0, 10.0, 30.0]),
    )
    .expect("Failed to create RECONCILIATION_DURATION metric - this should never happen")
});

static AWS_OPERATIONS_TOTAL: LazyLock<IntCounterVec> = LazyLock::new(|| {
    IntCounterVec::new(
        prometheus::Opts::new(
            "glue_job_aws_operations_total",
            "Total number of AWS Glue API operations",
        ),
        &["operation"],
    )
    .expect("Failed to create AWS_OPERATIONS_TOTAL metric - this should never happen")
});

static AWS_OPERATION_ERRORS_TOTAL: LazyLock<IntCounterVec> = LazyLock::new(|| {
    IntCounterVec::new(
        prometheus::Opts::new(
            "glue_job_aws_operation_errors_total",
            "Total number of failed AWS Glue API operations",
        ),
        &["operation"],
    )
    .expect("Failed to create AWS_OPERATION_ERRORS_TOTAL metric - this should never happen")
});

static AWS_OPERATION_DURATION: LazyLock<HistogramVec> = LazyLock::new(|| {
    HistogramVec::new(
        prometheus::HistogramOpts::new(
            "glue_job_aws_operation_duration_seconds",
            "Duration of AWS Glue API operations in seconds",
        )
        .buckets(vec![0.1, 0.5, 1.0, 2.0, 5.0]),
        &["operation"],
    )
    .expect("Failed to create AWS_OPERATION_DURATION metric - this should never happen")
});

static REQUEUES_TOTAL: LazyLock<IntCounterVec> = LazyLock::new(|| {
    IntCounterVec::new(
        prometheus::Opts::new("glue_job_requeues_total", "Total number of requeues"),
        &["trigger"],
    )
    .expect("Failed to create REQUEUES_TOTAL metric - this should never happen")
});

/// Register all metrics with the registry
///
/// # Errors
///
/// Fails when a metric is registered twice.
pub fn register_metrics() -> Result<()> {
    REGISTRY.register(Box::new(RECONCILIATIONS_TOTAL.clone()))?;
    REGISTRY.register(Box::new(RECONCILIATION_ERRORS_TOTAL.clone()))?;
    REGISTRY.register(Box::new(RECONCILIATION_DURATION.clone()))?;
    REGISTRY.register(Box::new(AWS_OPERATIONS_TOTAL.clone()))?;
    REGISTRY.register(Box::new(AWS_OPERATION_ERRORS_TOTAL.clone()))?;
    REGISTRY.register(Box::new(AWS_OPERATION_DURATION.clone()))?;
    REGISTRY.register(Box::new(REQUEUES_TOTAL.clone()))?;
    Ok(())
}

pub fn increment_reconciliations() {
    RECONCILIATIONS_TOTAL.inc();
}

pub fn increment_reconciliation_errors() {
    RECONCILIATION_ERRORS_TOTAL.inc();
}

pub fn observe_reconciliation_duration(duration: f64) {
    RECONCILIATION_DURATION.observe(duration);
}

pub fn record_glue_operation(operation: &str, duration: f64) {
    AWS_OPERATIONS_TOTAL.with_label_values(&[operation]).inc();
    AWS_OPERATION_DURATION
        .with_label_values(&[operation])
        .observe(duration);
}

pub fn increment_glue_operation_errors(operation: &str) {
    AWS_OPERATIONS_TOTAL.with_label_values(&[operation]).inc();
    AWS_OPERATION_ERRORS_TOTAL.with_label_values(&[operation]).inc();
}

pub fn increment_requeues_total(trigger: &str) {
    REQUEUES_TOTAL.with_label_values(&[trigger]).inc();
}
