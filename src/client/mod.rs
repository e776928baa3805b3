//! Settings API client subsystem.
//!
//! # Data Flow
//! ```text
//! EditSession
//!     → backend.rs (SettingsBackend trait)
//!     → http.rs (reqwest GET / PATCH with request ids and timeouts)
//!     → types.rs (TransportError)
//! ```

pub mod backend;
pub mod http;
pub mod types;

pub use backend::SettingsBackend;
pub use http::HttpSettingsBackend;
pub use types::{TransportError, TransportResult};
