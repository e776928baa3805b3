//! Metrics collection.
//!
//! # Metrics
//! - `workers_config_loads_total` (counter): loads by outcome
//! - `workers_config_submits_total` (counter): submits by outcome
//! - `workers_config_patch_fields` (histogram): changed fields per submit
//! - `workers_config_request_duration_seconds` (histogram): API latency by method, status

use std::time::Instant;

use metrics::{counter, histogram};

/// Record a load attempt.
pub fn record_load(outcome: &'static str) {
    counter!("workers_config_loads_total", "outcome" => outcome).increment(1);
}

/// Record a submit attempt and its patch size.
pub fn record_submit(outcome: &'static str, changed_fields: usize) {
    counter!("workers_config_submits_total", "outcome" => outcome).increment(1);
    if changed_fields > 0 {
        histogram!("workers_config_patch_fields").record(changed_fields as f64);
    }
}

/// Record a settings API request. Status 0 means no response was received.
pub fn record_request(method: &'static str, status: u16, start: Instant) {
    histogram!(
        "workers_config_request_duration_seconds",
        "method" => method,
        "status" => status.to_string()
    )
    .record(start.elapsed().as_secs_f64());
}
