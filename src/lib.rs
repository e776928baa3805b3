//! Worker settings diff & patch client.
//!
//! Loads a server's worker settings, exposes them as flat editable fields,
//! and sends back only what changed.

pub mod client;
pub mod config;
pub mod observability;
pub mod session;
pub mod settings;

pub use client::{HttpSettingsBackend, SettingsBackend};
pub use config::ClientConfig;
pub use session::{EditSession, ServerContext, SessionState};
