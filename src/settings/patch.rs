//! Minimal patch documents.

use serde_json::{Map, Value};

use crate::settings::diff::Diff;
use crate::settings::document::{ConfigDocument, WORKERS_KEY};
use crate::settings::error::{SettingsError, SettingsResult};
use crate::settings::flatten::split_path;

/// A settings document holding only changed workers and attributes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PatchDocument {
    doc: ConfigDocument,
}

impl PatchDocument {
    pub fn is_empty(&self) -> bool {
        self.doc.is_empty()
    }

    pub fn document(&self) -> &ConfigDocument {
        &self.doc
    }

    /// The `workers` object alone.
    pub fn workers_value(&self) -> Value {
        self.doc.workers_value()
    }

    /// Request body: `{ "workers": <patch> }`.
    pub fn to_request_body(&self) -> Value {
        let mut root = Map::new();
        root.insert(WORKERS_KEY.to_string(), self.workers_value());
        Value::Object(root)
    }
}

/// Nest a diff into a patch document.
///
/// Worker sections are created only for workers with at least one change.
pub fn build_patch(diff: &Diff) -> SettingsResult<PatchDocument> {
    let mut doc = ConfigDocument::new();
    for (path, value) in diff.iter() {
        let (worker, attribute) = split_path(path).ok_or_else(|| SettingsError::UnknownField {
            path: path.to_string(),
        })?;
        doc.worker_entry(worker).set(attribute, value);
    }
    Ok(PatchDocument { doc })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::diff::diff;
    use crate::settings::flatten::FlatFields;
    use serde_json::json;

    fn fields(entries: &[(&str, u64)]) -> FlatFields {
        entries.iter().map(|(k, v)| (k.to_string(), *v)).collect()
    }

    #[test]
    fn test_empty_diff() {
        let patch = build_patch(&Diff::default()).unwrap();
        assert!(patch.is_empty());
        assert_eq!(patch.workers_value(), json!({}));
        assert_eq!(patch.to_request_body(), json!({ "workers": {} }));
    }

    #[test]
    fn test_single_change_has_no_siblings() {
        let b = fields(&[
            ("smart_proxy_worker.count", 2),
            ("smart_proxy_worker.memory_threshold", 576_716_800),
            ("ui_worker.count", 1),
        ]);
        let mut c = b.clone();
        c.insert("smart_proxy_worker.count".into(), 1);

        let patch = build_patch(&diff(&b, &c).unwrap()).unwrap();
        assert_eq!(patch.workers_value(), json!({ "smart_proxy_worker": { "count": 1 } }));
        assert_eq!(
            serde_json::to_string(&patch.to_request_body()).unwrap(),
            r#"{"workers":{"smart_proxy_worker":{"count":1}}}"#
        );
    }

    #[test]
    fn test_changes_grouped_per_worker() {
        let b = fields(&[
            ("generic_worker.count", 2),
            ("generic_worker.memory_threshold", 524_288_000),
            ("priority_worker.count", 2),
            ("priority_worker.memory_threshold", 419_430_400),
            ("reporting_worker.count", 2),
        ]);
        let mut c = b.clone();
        c.insert("generic_worker.count".into(), 3);
        c.insert("generic_worker.memory_threshold".into(), 600 << 20);
        c.insert("priority_worker.memory_threshold".into(), 500 << 20);

        let patch = build_patch(&diff(&b, &c).unwrap()).unwrap();
        assert_eq!(
            patch.workers_value(),
            json!({
                "generic_worker": { "count": 3, "memory_threshold": 629145600u64 },
                "priority_worker": { "memory_threshold": 524288000u64 },
            })
        );
        assert!(patch.document().worker("reporting_worker").is_none());
    }

    #[test]
    fn test_bad_path_is_rejected() {
        let d: Diff = [("no_separator".to_string(), 1)].into_iter().collect();
        assert!(matches!(build_patch(&d), Err(SettingsError::UnknownField { .. })));
    }
}
