//! Metrics collection and exposition.
//!
//! # Metrics
//! - `staledesk_requests_total` (counter): requests by method, status, route
//! - `staledesk_request_duration_seconds` (histogram): latency distribution
//! - `staledesk_contact_events_total` (counter): store mutations by event
//! - `staledesk_contacts` (gauge): contacts currently stored
//!
//! Recording is a no-op until [`init_metrics`] installs the exporter.

use std::net::SocketAddr;
use std::time::Instant;

use metrics::{counter, gauge, histogram};
use metrics_exporter_prometheus::PrometheusBuilder;

/// Install the Prometheus exporter with its own HTTP listener on `addr`.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics endpoint listening"),
        Err(e) => tracing::error!(address = %addr, error = %e, "Failed to install metrics exporter"),
    }
}

/// Record a completed HTTP request.
pub fn record_request(method: &str, status: u16, route: &str, start: Instant) {
    let method = method.to_string();
    let status = status.to_string();
    let route = route.to_string();

    counter!(
        "staledesk_requests_total",
        "method" => method.clone(),
        "status" => status.clone(),
        "route" => route.clone()
    )
    .increment(1);
    histogram!(
        "staledesk_request_duration_seconds",
        "method" => method,
        "status" => status,
        "route" => route
    )
    .record(start.elapsed().as_secs_f64());
}

/// Record a contact store mutation (`created`, `updated`, `deleted`).
pub fn record_contact_event(event: &'static str) {
    counter!("staledesk_contact_events_total", "event" => event).increment(1);
}

/// Record the current number of stored contacts.
pub fn record_store_size(size: usize) {
    gauge!("staledesk_contacts").set(size as f64);
}
