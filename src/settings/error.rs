//! Error definitions for the worker settings engine.

use thiserror::Error;

/// Errors raised while building, flattening or diffing a worker settings document.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SettingsError {
    /// A size literal did not match `<number>.<unit>` or used an unknown unit.
    #[error("Malformed size literal: {value:?}")]
    MalformedLiteral { value: String },

    /// An attribute value was neither an integer nor a size literal.
    #[error("Unsupported value for {worker}.{attribute}: {found}")]
    UnsupportedAttributeType {
        worker: String,
        attribute: String,
        found: String,
    },

    /// Attribute name outside the recognized vocabulary.
    #[error("Unrecognized attribute {worker}.{attribute}")]
    UnrecognizedAttribute { worker: String, attribute: String },

    /// Worker or attribute name that cannot be addressed as a field path.
    #[error("Invalid name {name:?}: names must be non-empty and must not contain '.'")]
    InvalidName { name: String },

    /// The document does not have the `workers` shape.
    #[error("Malformed settings document: {0}")]
    MalformedDocument(String),

    /// A field path outside the loaded document's key universe.
    #[error("Unknown field: {path}")]
    UnknownField { path: String },

    /// Baseline and current snapshots no longer share the same key set.
    #[error("Key set mismatch: missing {missing:?}, extra {extra:?}")]
    KeySetMismatch {
        missing: Vec<String>,
        extra: Vec<String>,
    },
}

/// Result type for settings engine operations.
pub type SettingsResult<T> = Result<T, SettingsError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = SettingsError::MalformedLiteral {
            value: "two.gigabytes".into(),
        };
        assert_eq!(err.to_string(), "Malformed size literal: \"two.gigabytes\"");

        let err = SettingsError::UnknownField {
            path: "ui_worker.poll".into(),
        };
        assert!(err.to_string().contains("ui_worker.poll"));
    }
}
