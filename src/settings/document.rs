//! Worker settings document model.
//!
//! # Responsibilities
//! - Build a typed document from the JSON body returned by the settings API
//! - Resolve size literals once, at build time
//! - Render the typed document back to JSON with integer values only
//!
//! # Design Decisions
//! - Worker and attribute order follows the source document
//! - The attribute vocabulary is closed; anything else fails the build

use std::fmt;
use std::str::FromStr;

use serde_json::{Map, Value};

use crate::settings::error::{SettingsError, SettingsResult};
use crate::settings::literal::parse_size;

/// Top-level key holding the worker sections.
pub const WORKERS_KEY: &str = "workers";

/// Separator between worker type and attribute in a field path.
pub const PATH_SEPARATOR: char = '.';

/// Recognized worker attributes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Attribute {
    Count,
    MemoryThreshold,
    ConnectionPoolSize,
}

impl Attribute {
    pub const ALL: [Attribute; 3] = [
        Attribute::Count,
        Attribute::MemoryThreshold,
        Attribute::ConnectionPoolSize,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            Attribute::Count => "count",
            Attribute::MemoryThreshold => "memory_threshold",
            Attribute::ConnectionPoolSize => "connection_pool_size",
        }
    }

    /// Whether the attribute may be written as a size literal.
    pub const fn accepts_size_literal(self) -> bool {
        matches!(self, Attribute::MemoryThreshold)
    }
}

impl fmt::Display for Attribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Attribute {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Attribute::ALL
            .into_iter()
            .find(|attr| attr.as_str() == s)
            .ok_or(())
    }
}

/// Attribute values of a single worker type, in document order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WorkerAttributes {
    entries: Vec<(Attribute, u64)>,
}

impl WorkerAttributes {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, attribute: Attribute) -> Option<u64> {
        self.entries
            .iter()
            .find(|(attr, _)| *attr == attribute)
            .map(|(_, value)| *value)
    }

    /// Set an attribute, appending it if absent. Returns the previous value.
    pub fn set(&mut self, attribute: Attribute, value: u64) -> Option<u64> {
        match self.entries.iter_mut().find(|(attr, _)| *attr == attribute) {
            Some((_, slot)) => Some(std::mem::replace(slot, value)),
            None => {
                self.entries.push((attribute, value));
                None
            }
        }
    }

    pub fn contains(&self, attribute: Attribute) -> bool {
        self.get(attribute).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Attribute, u64)> + '_ {
        self.entries.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn to_value(&self) -> Value {
        let map: Map<String, Value> = self
            .entries
            .iter()
            .map(|(attr, value)| (attr.as_str().to_string(), Value::from(*value)))
            .collect();
        Value::Object(map)
    }
}

/// Typed worker settings document: worker type name to attributes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigDocument {
    workers: Vec<(String, WorkerAttributes)>,
}

impl ConfigDocument {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn worker(&self, name: &str) -> Option<&WorkerAttributes> {
        self.workers
            .iter()
            .find(|(worker, _)| worker == name)
            .map(|(_, attrs)| attrs)
    }

    /// Mutable access to a worker section, creating it on first use.
    pub fn worker_entry(&mut self, name: &str) -> &mut WorkerAttributes {
        let index = match self.workers.iter().position(|(worker, _)| worker == name) {
            Some(index) => index,
            None => {
                self.workers.push((name.to_string(), WorkerAttributes::new()));
                self.workers.len() - 1
            }
        };
        &mut self.workers[index].1
    }

    pub fn get(&self, worker: &str, attribute: Attribute) -> Option<u64> {
        self.worker(worker).and_then(|attrs| attrs.get(attribute))
    }

    pub fn workers(&self) -> impl Iterator<Item = (&str, &WorkerAttributes)> {
        self.workers
            .iter()
            .map(|(name, attrs)| (name.as_str(), attrs))
    }

    /// Number of worker sections.
    pub fn len(&self) -> usize {
        self.workers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.workers.is_empty()
    }

    /// Total number of attribute leaves.
    pub fn leaf_count(&self) -> usize {
        self.workers.iter().map(|(_, attrs)| attrs.len()).sum()
    }

    /// The `workers` object, without the wrapping key.
    pub fn workers_value(&self) -> Value {
        let map: Map<String, Value> = self
            .workers
            .iter()
            .map(|(name, attrs)| (name.clone(), attrs.to_value()))
            .collect();
        Value::Object(map)
    }
}

/// Build a typed document from a `{ "workers": { ... } }` JSON body.
pub fn build(document: &Value) -> SettingsResult<ConfigDocument> {
    let workers = document
        .get(WORKERS_KEY)
        .ok_or_else(|| SettingsError::MalformedDocument(format!("missing `{}` key", WORKERS_KEY)))?
        .as_object()
        .ok_or_else(|| SettingsError::MalformedDocument(format!("`{}` is not an object", WORKERS_KEY)))?;

    let mut doc = ConfigDocument::new();
    for (worker, section) in workers {
        check_name(worker)?;
        let section = section.as_object().ok_or_else(|| {
            SettingsError::MalformedDocument(format!("worker `{}` is not an object", worker))
        })?;

        let attrs = doc.worker_entry(worker);
        for (name, raw) in section {
            let attribute: Attribute = name.parse().map_err(|_| SettingsError::UnrecognizedAttribute {
                worker: worker.clone(),
                attribute: name.clone(),
            })?;
            attrs.set(attribute, resolve_value(worker, attribute, raw)?);
        }
    }

    tracing::debug!(
        workers = doc.len(),
        fields = doc.leaf_count(),
        "Built worker settings document"
    );
    Ok(doc)
}

/// Render a typed document as `{ "workers": { ... } }` with integer leaves.
pub fn render(doc: &ConfigDocument) -> Value {
    let mut root = Map::new();
    root.insert(WORKERS_KEY.to_string(), doc.workers_value());
    Value::Object(root)
}

pub(crate) fn check_name(name: &str) -> SettingsResult<()> {
    if name.is_empty() || name.contains(PATH_SEPARATOR) {
        return Err(SettingsError::InvalidName {
            name: name.to_string(),
        });
    }
    Ok(())
}

fn resolve_value(worker: &str, attribute: Attribute, raw: &Value) -> SettingsResult<u64> {
    let unsupported = |found: String| SettingsError::UnsupportedAttributeType {
        worker: worker.to_string(),
        attribute: attribute.as_str().to_string(),
        found,
    };

    match raw {
        Value::Number(n) => n.as_u64().ok_or_else(|| unsupported(format!("number {}", n))),
        Value::String(text) if attribute.accepts_size_literal() => parse_size(text),
        Value::String(text) => Err(unsupported(format!("string {:?}", text))),
        Value::Null => Err(unsupported("null".to_string())),
        Value::Bool(b) => Err(unsupported(format!("boolean {}", b))),
        Value::Array(_) => Err(unsupported("array".to_string())),
        Value::Object(_) => Err(unsupported("object".to_string())),
    }
}
