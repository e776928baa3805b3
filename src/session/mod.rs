//! Editing session subsystem.
//!
//! # State Machine
//! ```text
//! Loading ──load ok──▶ Clean ──set_field──▶ Dirty
//!    │                   ▲                    │
//!    │                   └────submit ok───────┤
//!    │                                        └─submit fails─▶ Dirty (edits kept)
//!    └──load fails──▶ LoadError
//! ```
//!
//! # Design Decisions
//! - The session owns its baseline and current snapshot; nothing is global
//! - Collaborators are injected: `SettingsBackend` for I/O, `SessionObserver`
//!   for busy signals and notices

pub mod editor;
pub mod error;
pub mod observer;
pub mod state;

pub use editor::{EditSession, SubmitOutcome};
pub use error::{LoadFailure, SessionError, SessionResult};
pub use observer::{Notice, NoticeLevel, SessionObserver, TracingObserver, LOAD_FAILURE_MESSAGE};
pub use state::{ServerContext, SessionState};
