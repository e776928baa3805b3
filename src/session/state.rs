//! Session states and server identity.

use std::fmt;

use crate::config::ServerConfig;

/// Lifecycle of an editing session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SessionState {
    /// Waiting for the settings document.
    Loading,
    /// Current matches the baseline.
    Clean,
    /// Current has unsaved changes.
    Dirty,
    /// The document could not be loaded; nothing is editable.
    LoadError,
}

impl SessionState {
    /// Whether fields may be read and edited.
    pub fn is_editable(self) -> bool {
        matches!(self, SessionState::Clean | SessionState::Dirty)
    }
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SessionState::Loading => "loading",
            SessionState::Clean => "clean",
            SessionState::Dirty => "dirty",
            SessionState::LoadError => "load error",
        };
        f.write_str(name)
    }
}

/// The server being configured. Opaque to the engine apart from addressing
/// and the confirmation message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerContext {
    pub server_id: String,
    pub server_name: String,
    pub product: String,
    pub zone: String,
}

impl ServerContext {
    /// Message shown after a successful save.
    pub fn saved_message(&self) -> String {
        format!(
            "Configuration settings saved for {} Server \"{} [{}]\" in Zone \"{}\"",
            self.product, self.server_name, self.server_id, self.zone
        )
    }
}

impl From<&ServerConfig> for ServerContext {
    fn from(config: &ServerConfig) -> Self {
        Self {
            server_id: config.id.clone(),
            server_name: config.name.clone(),
            product: config.product.clone(),
            zone: config.zone.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_saved_message() {
        let context = ServerContext {
            server_id: "1".into(),
            server_name: "Server 1".into(),
            product: "ManageIQ".into(),
            zone: "Default zone".into(),
        };
        assert_eq!(
            context.saved_message(),
            "Configuration settings saved for ManageIQ Server \"Server 1 [1]\" in Zone \"Default zone\""
        );
    }

    #[test]
    fn test_editable_states() {
        assert!(SessionState::Clean.is_editable());
        assert!(SessionState::Dirty.is_editable());
        assert!(!SessionState::Loading.is_editable());
        assert!(!SessionState::LoadError.is_editable());
    }
}
