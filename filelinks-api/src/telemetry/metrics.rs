//! Prometheus Metrics Definitions
//!
//! Defines the FILELINKS metrics and exposes a /metrics endpoint for
//! Prometheus scraping.

use axum::{http::StatusCode, response::IntoResponse};
use once_cell::sync::Lazy;
use prometheus::{
    register_counter_vec, register_histogram, register_histogram_vec, CounterVec, Encoder,
    Histogram, HistogramVec, TextEncoder,
};

use crate::error::{ApiError, ApiResult};

/// HTTP request latency buckets (seconds)
const HTTP_LATENCY_BUCKETS: &[f64] = &[
    0.001, 0.005, 0.010, 0.025, 0.050, 0.100, 0.250, 0.500, 1.0, 2.5, 5.0, 10.0,
];

/// Number of elements per batch request
const BATCH_SIZE_BUCKETS: &[f64] = &[1.0, 2.0, 5.0, 10.0, 25.0, 50.0, 100.0, 250.0];

/// Global metrics instance - initialized once at startup
pub static METRICS: Lazy<ApiResult<FileLinksMetrics>> = Lazy::new(FileLinksMetrics::new);

/// How a batch request ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BatchResult {
    /// Every item was created
    Success,
    /// At least one item was rejected
    Rejected,
    /// The body was structurally invalid; nothing was attempted
    StructuralError,
    /// An infrastructure failure aborted the batch
    Aborted,
}

impl BatchResult {
    pub fn as_str(&self) -> &'static str {
        match self {
            BatchResult::Success => "success",
            BatchResult::Rejected => "rejected",
            BatchResult::StructuralError => "structural_error",
            BatchResult::Aborted => "aborted",
        }
    }
}

/// Container for all FILELINKS metrics.
#[derive(Clone)]
pub struct FileLinksMetrics {
    /// HTTP request counter - labels: method, path, status
    pub http_requests_total: CounterVec,

    /// HTTP request duration histogram - labels: method, path
    pub http_request_duration_seconds: HistogramVec,

    /// Batch request counter - labels: result
    pub batch_requests_total: CounterVec,

    /// Per-item outcome counter - labels: outcome (created/rejected)
    pub batch_items_total: CounterVec,

    /// Elements per batch request
    pub batch_size: Histogram,
}

fn registration_error(name: &str, e: prometheus::Error) -> ApiError {
    ApiError::internal_error(format!("Failed to register {}: {}", name, e))
}

impl FileLinksMetrics {
    /// Create and register all metrics with Prometheus.
    pub fn new() -> ApiResult<Self> {
        Ok(Self {
            http_requests_total: register_counter_vec!(
                "filelinks_http_requests_total",
                "Total number of HTTP requests",
                &["method", "path", "status"]
            )
            .map_err(|e| registration_error("http_requests_total", e))?,

            http_request_duration_seconds: register_histogram_vec!(
                "filelinks_http_request_duration_seconds",
                "HTTP request duration in seconds",
                &["method", "path"],
                HTTP_LATENCY_BUCKETS.to_vec()
            )
            .map_err(|e| registration_error("http_request_duration_seconds", e))?,

            batch_requests_total: register_counter_vec!(
                "filelinks_batch_requests_total",
                "Total number of batch file link requests",
                &["result"]
            )
            .map_err(|e| registration_error("batch_requests_total", e))?,

            batch_items_total: register_counter_vec!(
                "filelinks_batch_items_total",
                "File link items processed by batch requests",
                &["outcome"]
            )
            .map_err(|e| registration_error("batch_items_total", e))?,

            batch_size: register_histogram!(
                "filelinks_batch_size",
                "Number of elements submitted per batch request",
                BATCH_SIZE_BUCKETS.to_vec()
            )
            .map_err(|e| registration_error("batch_size", e))?,
        })
    }

    /// Record an HTTP request.
    pub fn record_http_request(&self, method: &str, path: &str, status: u16, duration_secs: f64) {
        let status_str = status.to_string();
        self.http_requests_total
            .with_label_values(&[method, path, &status_str])
            .inc();
        self.http_request_duration_seconds
            .with_label_values(&[method, path])
            .observe(duration_secs);
    }

    /// Record a finished batch and its item outcomes.
    pub fn record_batch(&self, result: BatchResult, created: usize, rejected: usize) {
        self.batch_requests_total
            .with_label_values(&[result.as_str()])
            .inc();
        self.batch_items_total
            .with_label_values(&["created"])
            .inc_by(created as f64);
        self.batch_items_total
            .with_label_values(&["rejected"])
            .inc_by(rejected as f64);
    }

    pub fn observe_batch_size(&self, size: usize) {
        self.batch_size.observe(size as f64);
    }
}

/// Run `f` against the global metrics if they registered successfully.
pub fn with_metrics(f: impl FnOnce(&FileLinksMetrics)) {
    match METRICS.as_ref() {
        Ok(metrics) => f(metrics),
        Err(e) => tracing::debug!(error = %e, "Metrics unavailable"),
    }
}

/// Handler for GET /metrics endpoint.
///
/// Returns Prometheus text format metrics.
#[utoipa::path(
    get,
    path = "/metrics",
    tag = "Observability",
    responses(
        (status = 200, description = "Prometheus metrics in text format", content_type = "text/plain"),
        (status = 500, description = "Failed to encode metrics"),
    ),
)]
pub async fn metrics_handler() -> impl IntoResponse {
    // Registers the collectors on first scrape.
    Lazy::force(&METRICS);

    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    let mut buffer = Vec::new();

    match encoder.encode(&metric_families, &mut buffer) {
        Ok(_) => (
            StatusCode::OK,
            [("content-type", "text/plain; version=0.0.4; charset=utf-8")],
            buffer,
        ),
        Err(e) => {
            tracing::error!(error = %e, "Failed to encode metrics");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                [("content-type", "text/plain")],
                format!("Failed to encode metrics: {}", e).into_bytes(),
            )
        }
    }
}
