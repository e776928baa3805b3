//! Session error definitions.

use thiserror::Error;

use crate::client::TransportError;
use crate::session::state::SessionState;
use crate::settings::SettingsError;

/// Why a load left the session in `LoadError`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LoadFailure {
    #[error("Load transport failure: {0}")]
    Transport(#[from] TransportError),

    #[error("Invalid settings document: {0}")]
    Document(#[from] SettingsError),
}

/// Errors returned by an editing session.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    /// The load failed; the session is in `LoadError`.
    #[error("{message} ({cause})")]
    Load { message: String, cause: LoadFailure },

    /// The patch could not be delivered; edits are kept.
    #[error("Submit transport failure: {0}")]
    SubmitTransportFailure(TransportError),

    #[error(transparent)]
    Settings(#[from] SettingsError),

    /// A submit for this session is already in flight.
    #[error("A submit is already in progress")]
    SubmitInFlight,

    /// The operation needs an editable session.
    #[error("Session is not editable (state: {0})")]
    NotEditable(SessionState),

    /// The session was re-initialized while the request was in flight; its
    /// result was discarded.
    #[error("Response discarded: session was re-initialized")]
    Superseded,
}

/// Result type for session operations.
pub type SessionResult<T> = Result<T, SessionError>;
