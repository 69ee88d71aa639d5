//! Prometheus metrics for the BeanHub server.
//!
//! A global recorder is installed once at startup; `/metrics` renders its
//! current state in the Prometheus text format.

use std::sync::OnceLock;
use std::time::Duration;

use metrics::{counter, gauge, histogram};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};

static PROMETHEUS_HANDLE: OnceLock<PrometheusHandle> = OnceLock::new();

/// Metric names as constants for consistency.
pub mod names {
    pub const HTTP_REQUESTS_TOTAL: &str = "http_requests_total";
    pub const HTTP_REQUEST_DURATION_SECONDS: &str = "http_request_duration_seconds";
    pub const CACHE_HITS_TOTAL: &str = "cache_hits_total";
    pub const CACHE_MISSES_TOTAL: &str = "cache_misses_total";
    pub const CACHE_ENTRIES: &str = "cache_entries";
}

/// Installs the global Prometheus recorder.
///
/// Returns `false` when a recorder is already installed (tests initialize
/// repeatedly); recording macros silently no-op until this has succeeded
/// once.
pub fn init_metrics() -> bool {
    if PROMETHEUS_HANDLE.get().is_some() {
        return false;
    }
    match PrometheusBuilder::new().install_recorder() {
        Ok(handle) => {
            let _ = PROMETHEUS_HANDLE.set(handle);
            true
        }
        Err(err) => {
            tracing::warn!(error = %err, "Failed to install Prometheus recorder");
            false
        }
    }
}

/// Renders the current metrics in Prometheus text format.
pub fn render_metrics() -> Option<String> {
    PROMETHEUS_HANDLE.get().map(|handle| handle.render())
}

/// Records one handled HTTP request.
pub fn record_http_request(method: &str, path: &str, status: u16, duration: Duration) {
    let status_class = match status {
        200..=299 => "2xx",
        300..=399 => "3xx",
        400..=499 => "4xx",
        _ => "5xx",
    };
    let path = normalize_path(path);

    counter!(
        names::HTTP_REQUESTS_TOTAL,
        "method" => method.to_string(),
        "path" => path.clone(),
        "status" => status.to_string(),
        "status_class" => status_class,
    )
    .increment(1);

    histogram!(
        names::HTTP_REQUEST_DURATION_SECONDS,
        "method" => method.to_string(),
        "path" => path,
    )
    .record(duration.as_secs_f64());
}

/// Records a cache hit for one key family (`all`, `id`, `search`, `day`).
pub fn record_cache_hit(family: &str) {
    counter!(names::CACHE_HITS_TOTAL, "family" => family.to_string()).increment(1);
}

/// Records a cache miss for one key family.
pub fn record_cache_miss(family: &str) {
    counter!(names::CACHE_MISSES_TOTAL, "family" => family.to_string()).increment(1);
}

/// Publishes the current number of live cache entries.
pub fn set_cache_entries(count: usize) {
    gauge!(names::CACHE_ENTRIES).set(count as f64);
}

/// Collapses id path segments so metric cardinality stays bounded.
///
/// Only all-digit segments are rewritten; named segments such as `search`
/// and `bean-of-the-day` pass through unchanged.
fn normalize_path(path: &str) -> String {
    path.split('/')
        .map(|segment| {
            if !segment.is_empty() && segment.bytes().all(|b| b.is_ascii_digit()) {
                "{id}"
            } else {
                segment
            }
        })
        .collect::<Vec<_>>()
        .join("/")
}
