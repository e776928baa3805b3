//! Configuration schema definitions.
//!
//! This module defines the configuration structure for the settings client.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

/// Root configuration for the workers settings client.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct ClientConfig {
    /// Settings API endpoint.
    pub api: ApiConfig,

    /// The server whose workers are being configured.
    pub server: ServerConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Settings API configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Base URL of the management API (e.g., "https://manageiq.example.com").
    pub base_url: String,

    /// Settings path template; `{id}` is replaced by the server id.
    pub settings_path: String,

    /// Request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:3000".to_string(),
            settings_path: "/api/servers/{id}/settings".to_string(),
            timeout_secs: 30,
        }
    }
}

/// Identity of the configured server. Only used for addressing and messages.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Server id used in the settings address.
    pub id: String,

    /// Display name.
    pub name: String,

    /// Product name shown in confirmation messages.
    pub product: String,

    /// Zone the server belongs to.
    pub zone: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            id: "1".to_string(),
            name: String::new(),
            product: "ManageIQ".to_string(),
            zone: "default".to_string(),
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ClientConfig::default();
        assert_eq!(config.api.timeout_secs, 30);
        assert!(config.api.settings_path.contains("{id}"));
        assert_eq!(config.server.product, "ManageIQ");
        assert_eq!(config.observability.log_level, "info");
    }

    #[test]
    fn test_partial_toml() {
        let config: ClientConfig = toml::from_str(
            r#"
            [server]
            id = "42"
            zone = "East"
            "#,
        )
        .unwrap();
        assert_eq!(config.server.id, "42");
        assert_eq!(config.server.zone, "East");
        assert_eq!(config.server.product, "ManageIQ");
        assert_eq!(config.api.base_url, "http://localhost:3000");
    }
}
