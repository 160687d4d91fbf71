//! Prometheus metrics for reporting-service.

use once_cell::sync::Lazy;
use prometheus::{
    register_counter_vec, register_histogram_vec, CounterVec, HistogramVec, TextEncoder,
};

/// Database query duration histogram.
pub static DB_QUERY_DURATION: Lazy<HistogramVec> = Lazy::new(|| {
    register_histogram_vec!(
        "reporting_db_query_duration_seconds",
        "Database query duration in seconds",
        &["operation"],
        vec![0.001, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0]
    )
    .expect("Failed to register db_query_duration")
});

/// Ledger build counter by outcome.
pub static LEDGER_BUILDS_TOTAL: Lazy<CounterVec> = Lazy::new(|| {
    register_counter_vec!(
        "reporting_ledger_builds_total",
        "Total number of ledger builds",
        &["outcome"] // ok, error
    )
    .expect("Failed to register ledger_builds_total")
});

/// Report render counter by mode and source.
pub static REPORT_RENDERS_TOTAL: Lazy<CounterVec> = Lazy::new(|| {
    register_counter_vec!(
        "reporting_report_renders_total",
        "Total number of report renders",
        &["mode", "source"] // live|invoice_date, computed|snapshot
    )
    .expect("Failed to register report_renders_total")
});

/// Lifecycle transition counter.
pub static LIFECYCLE_TRANSITIONS_TOTAL: Lazy<CounterVec> = Lazy::new(|| {
    register_counter_vec!(
        "reporting_lifecycle_transitions_total",
        "Total report period lifecycle transitions",
        &["transition", "outcome"] // finalize|submit|unfinalize, ok|conflict|error
    )
    .expect("Failed to register lifecycle_transitions_total")
});

/// Approval command counter.
pub static APPROVAL_COMMANDS_TOTAL: Lazy<CounterVec> = Lazy::new(|| {
    register_counter_vec!(
        "reporting_approval_commands_total",
        "Total approve/reject/archive commands",
        &["command", "kind", "outcome"]
    )
    .expect("Failed to register approval_commands_total")
});

/// Bulk item counter by result.
pub static BULK_ITEMS_TOTAL: Lazy<CounterVec> = Lazy::new(|| {
    register_counter_vec!(
        "reporting_bulk_items_total",
        "Total bulk-operation items by result",
        &["operation", "result"] // archive, succeeded|failed
    )
    .expect("Failed to register bulk_items_total")
});

/// Error counter for alerting.
pub static ERRORS_TOTAL: Lazy<CounterVec> = Lazy::new(|| {
    register_counter_vec!(
        "reporting_errors_total",
        "Total number of errors by type",
        &["error_type"]
    )
    .expect("Failed to register errors_total")
});

/// Initialize all metrics (forces lazy initialization).
pub fn init_metrics() {
    Lazy::force(&DB_QUERY_DURATION);
    Lazy::force(&LEDGER_BUILDS_TOTAL);
    Lazy::force(&REPORT_RENDERS_TOTAL);
    Lazy::force(&LIFECYCLE_TRANSITIONS_TOTAL);
    Lazy::force(&APPROVAL_COMMANDS_TOTAL);
    Lazy::force(&BULK_ITEMS_TOTAL);
    Lazy::force(&ERRORS_TOTAL);
}

/// Get metrics in Prometheus text format.
pub fn get_metrics() -> String {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    encoder
        .encode_to_string(&metric_families)
        .unwrap_or_default()
}
