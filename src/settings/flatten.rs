//! Flat field view of a settings document.
//!
//! Each attribute leaf is addressed by `"{worker_type}.{attribute}"`. Only
//! leaves are addressable; worker sections have no path of their own.

use std::collections::BTreeMap;

use crate::settings::document::{Attribute, ConfigDocument, PATH_SEPARATOR};
use crate::settings::error::{SettingsError, SettingsResult};

/// Field path to value. Sorted for deterministic iteration.
pub type FlatFields = BTreeMap<String, u64>;

/// Join a worker type and attribute into a field path.
pub fn field_path(worker: &str, attribute: Attribute) -> String {
    format!("{}{}{}", worker, PATH_SEPARATOR, attribute.as_str())
}

/// Split a field path into worker type and attribute.
pub fn split_path(path: &str) -> Option<(&str, Attribute)> {
    let (worker, attribute) = path.split_once(PATH_SEPARATOR)?;
    if worker.is_empty() {
        return None;
    }
    Some((worker, attribute.parse().ok()?))
}

/// One entry per attribute leaf.
pub fn flatten(doc: &ConfigDocument) -> FlatFields {
    doc.workers()
        .flat_map(|(worker, attrs)| {
            attrs
                .iter()
                .map(move |(attribute, value)| (field_path(worker, attribute), value))
        })
        .collect()
}

/// Write `fields` over a copy of `template`.
///
/// Every path must already exist in `template`; the flat view can change
/// values but never introduce workers or attributes.
pub fn unflatten(fields: &FlatFields, template: &ConfigDocument) -> SettingsResult<ConfigDocument> {
    let mut doc = template.clone();
    for (path, value) in fields {
        let (worker, attribute) = split_path(path)
            .filter(|(worker, attribute)| template.get(worker, *attribute).is_some())
            .ok_or_else(|| SettingsError::UnknownField { path: path.clone() })?;
        doc.worker_entry(worker).set(attribute, *value);
    }
    Ok(doc)
}
