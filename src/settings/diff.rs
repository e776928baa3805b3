//! Baseline/current comparison.

use std::collections::BTreeMap;

use crate::settings::error::{SettingsError, SettingsResult};
use crate::settings::flatten::FlatFields;

/// Changed field paths paired with their new values.
///
/// Paths are unique, so this is a set of `(path, value)` pairs; iteration
/// order is sorted by path and carries no meaning.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Diff {
    changes: BTreeMap<String, u64>,
}

impl Diff {
    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }

    pub fn len(&self) -> usize {
        self.changes.len()
    }

    pub fn get(&self, path: &str) -> Option<u64> {
        self.changes.get(path).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, u64)> {
        self.changes.iter().map(|(path, value)| (path.as_str(), *value))
    }

    pub fn paths(&self) -> impl Iterator<Item = &str> {
        self.changes.keys().map(String::as_str)
    }
}

impl FromIterator<(String, u64)> for Diff {
    fn from_iter<I: IntoIterator<Item = (String, u64)>>(iter: I) -> Self {
        Self {
            changes: iter.into_iter().collect(),
        }
    }
}

/// Fields whose current value differs from the baseline.
///
/// Both snapshots must cover the same paths.
pub fn diff(baseline: &FlatFields, current: &FlatFields) -> SettingsResult<Diff> {
    let missing: Vec<String> = baseline
        .keys()
        .filter(|path| !current.contains_key(*path))
        .cloned()
        .collect();
    let extra: Vec<String> = current
        .keys()
        .filter(|path| !baseline.contains_key(*path))
        .cloned()
        .collect();

    if !missing.is_empty() || !extra.is_empty() {
        return Err(SettingsError::KeySetMismatch { missing, extra });
    }

    Ok(current
        .iter()
        .filter(|(path, value)| baseline.get(*path) != Some(*value))
        .map(|(path, value)| (path.clone(), *value))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fields(entries: &[(&str, u64)]) -> FlatFields {
        entries.iter().map(|(k, v)| (k.to_string(), *v)).collect()
    }

    #[test]
    fn test_identical_snapshots() {
        let b = fields(&[("ui_worker.count", 1), ("ui_worker.memory_threshold", 1 << 30)]);
        assert!(diff(&b, &b).unwrap().is_empty());
        assert!(diff(&FlatFields::new(), &FlatFields::new()).unwrap().is_empty());
    }

    #[test]
    fn test_single_change() {
        let b = fields(&[("smart_proxy_worker.count", 2), ("smart_proxy_worker.memory_threshold", 576_716_800)]);
        let mut c = b.clone();
        c.insert("smart_proxy_worker.count".into(), 1);

        let d = diff(&b, &c).unwrap();
        assert_eq!(d.len(), 1);
        assert_eq!(d.get("smart_proxy_worker.count"), Some(1));
        assert_eq!(d.get("smart_proxy_worker.memory_threshold"), None);
    }

    #[test]
    fn test_reverted_edit_is_not_a_change() {
        let b = fields(&[("generic_worker.count", 2)]);
        let mut c = b.clone();
        c.insert("generic_worker.count".into(), 4);
        c.insert("generic_worker.count".into(), 2);
        assert!(diff(&b, &c).unwrap().is_empty());
    }

    #[test]
    fn test_key_set_mismatch() {
        let b = fields(&[("a_worker.count", 1), ("b_worker.count", 1)]);
        let c = fields(&[("a_worker.count", 1), ("c_worker.count", 1)]);
        assert_eq!(
            diff(&b, &c),
            Err(SettingsError::KeySetMismatch {
                missing: vec!["b_worker.count".into()],
                extra: vec!["c_worker.count".into()],
            })
        );
    }

    #[test]
    fn test_deterministic() {
        let b = fields(&[("a_worker.count", 1), ("b_worker.count", 1), ("c_worker.count", 1)]);
        let c = fields(&[("c_worker.count", 3), ("a_worker.count", 2), ("b_worker.count", 1)]);
        let first = diff(&b, &c).unwrap();
        assert_eq!(first, diff(&b, &c).unwrap());
        assert_eq!(first.paths().collect::<Vec<_>>(), vec!["a_worker.count", "c_worker.count"]);
    }
}
