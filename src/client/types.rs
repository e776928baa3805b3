//! Transport error definitions.

use thiserror::Error;

/// Errors reported by a settings backend.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    /// The API answered with a non-success status.
    #[error("Settings API returned status {0}")]
    Status(u16),

    /// The request could not be sent or the connection failed.
    #[error("Request error: {0}")]
    Request(String),

    /// The request did not complete in time.
    #[error("Request timeout after {0} seconds")]
    Timeout(u64),

    /// The response body was not valid JSON.
    #[error("Invalid response body: {0}")]
    Decode(String),

    /// The settings address could not be built.
    #[error("Invalid settings address: {0}")]
    Address(String),
}

/// Result type for backend calls.
pub type TransportResult<T> = Result<T, TransportError>;
