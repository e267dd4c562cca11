//! Metrics collection and exposition.
//!
//! # Metrics
//! - `whitelist_transactions_total` (counter): submitted/confirmed/failed/reverted
//! - `whitelist_refreshes_total` (counter): state reads by kind and outcome
//! - `whitelist_wrong_network_total` (counter): rejected connections
//! - `whitelist_addresses` (gauge): last observed whitelist size
//!
//! Recording is a no-op until a recorder is installed with [`init_metrics`].

use metrics::{counter, gauge};
use metrics_exporter_prometheus::PrometheusBuilder;
use std::net::SocketAddr;

/// Install the Prometheus recorder and its scrape endpoint.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics endpoint listening"),
        Err(e) => tracing::error!(error = %e, "Failed to install metrics exporter"),
    }
}

/// Record a transaction lifecycle step.
pub fn record_transaction(outcome: &'static str) {
    counter!("whitelist_transactions_total", "outcome" => outcome).increment(1);
}

/// Record a read of contract state.
pub fn record_refresh(kind: &'static str, success: bool) {
    let outcome = if success { "ok" } else { "error" };
    counter!("whitelist_refreshes_total", "kind" => kind, "outcome" => outcome).increment(1);
}

/// Record a connection rejected for being on the wrong chain.
pub fn record_wrong_network() {
    counter!("whitelist_wrong_network_total").increment(1);
}

/// Record the whitelist size last read from the contract.
pub fn record_whitelisted(count: u32) {
    gauge!("whitelist_addresses").set(f64::from(count));
}
