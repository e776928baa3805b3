//! Settings backend abstraction.

use std::future::Future;

use serde_json::Value;

use crate::client::types::TransportResult;

/// The remote side of an editing session.
///
/// `load` fetches the full settings document for a server; `patch` sends a
/// partial document and returns the full post-patch document.
pub trait SettingsBackend: Send + Sync {
    fn load(&self, server_id: &str) -> impl Future<Output = TransportResult<Value>> + Send;

    fn patch(&self, server_id: &str, body: &Value) -> impl Future<Output = TransportResult<Value>> + Send;
}
