//! Metrics for the recommender service.
//!
//! - Prometheus recorder installation and export
//! - Sync-run and similarity-query metrics
//! - Axum middleware for per-route request metrics
//!
//! # Example
//!
//! ```rust,ignore
//! use observability::{init_metrics, metrics_handler, SyncMetrics};
//!
//! init_metrics();
//! SyncMetrics::record_run("success", 120, 0, 3.2);
//!
//! let app = Router::new().route("/metrics", get(metrics_handler));
//! ```

pub mod middleware;
pub mod queries;
pub mod sync;

pub use middleware::metrics_middleware;
pub use queries::QueryMetrics;
pub use sync::SyncMetrics;

use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use once_cell::sync::OnceCell;
use tracing::{info, warn};

static METRICS_HANDLE: OnceCell<PrometheusHandle> = OnceCell::new();

/// Install the Prometheus recorder.
///
/// Only the first call installs anything. If another recorder already owns
/// the global slot, metrics stay disabled and `None` is returned.
pub fn init_metrics() -> Option<&'static PrometheusHandle> {
    if let Some(handle) = METRICS_HANDLE.get() {
        return Some(handle);
    }

    match PrometheusBuilder::new().install_recorder() {
        Ok(handle) => {
            register_metric_descriptions();
            info!("Prometheus metrics recorder initialized");
            Some(METRICS_HANDLE.get_or_init(|| handle))
        }
        Err(e) => {
            warn!(error = %e, "Failed to install Prometheus recorder, metrics disabled");
            None
        }
    }
}

pub fn get_metrics_handle() -> Option<&'static PrometheusHandle> {
    METRICS_HANDLE.get()
}

/// Axum handler for the /metrics endpoint
pub async fn metrics_handler() -> String {
    match get_metrics_handle() {
        Some(handle) => handle.render(),
        None => "# Metrics not initialized\n".to_string(),
    }
}

fn register_metric_descriptions() {
    use metrics::{describe_counter, describe_gauge, describe_histogram};

    // HTTP
    describe_counter!("http_requests_total", "Total number of HTTP requests");
    describe_histogram!(
        "http_request_duration_seconds",
        "HTTP request duration in seconds"
    );
    describe_counter!(
        "http_requests_errors_total",
        "Total number of HTTP request errors"
    );

    // Sync
    describe_counter!("sync_runs_total", "Sync runs by final status");
    describe_counter!(
        "sync_products_total",
        "Products handled by sync runs, by outcome"
    );
    describe_histogram!("sync_run_duration_seconds", "Sync run duration in seconds");
    describe_gauge!(
        "sync_last_run_timestamp_seconds",
        "Unix time at which the last sync run completed"
    );

    // Queries
    describe_counter!("similarity_queries_total", "Similarity queries by kind and outcome");
    describe_histogram!(
        "similarity_query_duration_seconds",
        "Similarity query duration in seconds"
    );
    describe_histogram!(
        "similarity_query_hits",
        "Number of recommendations returned per query"
    );
}
