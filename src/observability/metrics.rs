//! Metrics collection and exposition.
//!
//! # Metrics
//! - `contact_submissions_total` (counter): submissions by outcome (created, invalid, failed)
//! - `contact_rate_limited_total` (counter): requests rejected by the rate policy
//! - `contact_origin_rejected_total` (counter): requests rejected by the origin policy
//! - `contact_notifications_total` (counter): notifications by outcome (sent, failed)
//! - `contact_rate_limit_tracked_clients` (gauge): live rate windows after a sweep
//!
//! Without an installed recorder every call is a no-op.

use std::net::SocketAddr;

use metrics_exporter_prometheus::PrometheusBuilder;

/// Start the Prometheus scrape endpoint on `addr`.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics endpoint listening"),
        Err(e) => tracing::error!(address = %addr, error = %e, "Failed to install metrics exporter"),
    }
}

pub fn record_submission(outcome: &'static str) {
    metrics::counter!("contact_submissions_total", "outcome" => outcome).increment(1);
}

pub fn record_rate_limited() {
    metrics::counter!("contact_rate_limited_total").increment(1);
}

pub fn record_origin_rejected() {
    metrics::counter!("contact_origin_rejected_total").increment(1);
}

pub fn record_notification(outcome: &'static str) {
    metrics::counter!("contact_notifications_total", "outcome" => outcome).increment(1);
}

pub fn record_tracked_clients(count: usize) {
    metrics::gauge!("contact_rate_limit_tracked_clients").set(count as f64);
}
