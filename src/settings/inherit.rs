//! Inherited attribute resolution.
//!
//! Worker types that leave an attribute unset run with their parent's value.
//! Queue workers inherit from `queue_worker_base`, which in turn inherits
//! from `worker_base`; every other worker type inherits from `worker_base`.
//! This view is read-only: edits only ever target a worker's own leaves.

use crate::settings::document::{Attribute, ConfigDocument};
use crate::settings::flatten::{field_path, FlatFields};

/// Root of the worker hierarchy.
pub const WORKER_BASE: &str = "worker_base";

/// Parent section shared by queue-backed workers.
pub const QUEUE_WORKER_BASE: &str = "queue_worker_base";

/// Worker types that inherit from `queue_worker_base`.
pub const QUEUE_WORKERS: [&str; 7] = [
    "ems_metrics_collector_worker",
    "ems_metrics_processor_worker",
    "ems_refresh_worker",
    "generic_worker",
    "priority_worker",
    "reporting_worker",
    "smart_proxy_worker",
];

/// Parent section of a worker type, if any.
pub fn parent_of(worker: &str) -> Option<&'static str> {
    match worker {
        WORKER_BASE => None,
        QUEUE_WORKER_BASE => Some(WORKER_BASE),
        w if QUEUE_WORKERS.contains(&w) => Some(QUEUE_WORKER_BASE),
        _ => Some(WORKER_BASE),
    }
}

/// The value a worker runs with: its own, or the nearest ancestor's.
pub fn effective_value(doc: &ConfigDocument, worker: &str, attribute: Attribute) -> Option<u64> {
    let mut section = Some(worker);
    while let Some(name) = section {
        if let Some(value) = doc.get(name, attribute) {
            return Some(value);
        }
        section = parent_of(name);
    }
    None
}

/// Flat view of every worker's effective values.
pub fn effective_fields(doc: &ConfigDocument) -> FlatFields {
    doc.workers()
        .flat_map(|(worker, _)| {
            Attribute::ALL.into_iter().filter_map(move |attribute| {
                effective_value(doc, worker, attribute).map(|value| (field_path(worker, attribute), value))
            })
        })
        .collect()
}
