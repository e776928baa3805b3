//! Baseline replacement after a successful patch exchange.

use serde_json::Value;

use crate::settings::document::{build, ConfigDocument};
use crate::settings::error::SettingsResult;
use crate::settings::flatten::{flatten, FlatFields};

/// A fresh baseline and the matching clean current snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reconciled {
    pub baseline: ConfigDocument,
    pub current: FlatFields,
}

/// Rebuild the baseline from the server's post-patch document.
///
/// The response replaces `old_baseline` wholesale; the server may have
/// applied more than the patch asked for. On error the caller keeps the old
/// baseline.
pub fn reconcile(old_baseline: &ConfigDocument, server_response: &Value) -> SettingsResult<Reconciled> {
    let baseline = build(server_response)?;
    let current = flatten(&baseline);

    let previous = flatten(old_baseline);
    let changed = current
        .iter()
        .filter(|(path, value)| previous.get(*path) != Some(*value))
        .count();
    let dropped = previous.keys().filter(|path| !current.contains_key(*path)).count();

    tracing::debug!(
        fields = current.len(),
        changed,
        dropped,
        "Reconciled baseline from server response"
    );

    Ok(Reconciled { baseline, current })
}
