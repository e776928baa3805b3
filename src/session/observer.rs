//! Notifications from a session to its UI layer.

use std::sync::Arc;

/// Message shown when the settings document cannot be loaded.
pub const LOAD_FAILURE_MESSAGE: &str = "Could not fetch the data";

/// Message shown when a patch could not be delivered.
pub const SUBMIT_FAILURE_MESSAGE: &str = "Could not save the data";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Success,
    Error,
}

/// A user-facing message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Success,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            message: message.into(),
        }
    }
}

/// Receives busy signals around load/submit and user-facing notices.
pub trait SessionObserver: Send + Sync {
    fn busy_started(&self) {}

    fn busy_finished(&self) {}

    fn notify(&self, _notice: &Notice) {}
}

/// Discards every signal.
impl SessionObserver for () {}

impl<T: SessionObserver + ?Sized> SessionObserver for Arc<T> {
    fn busy_started(&self) {
        (**self).busy_started()
    }

    fn busy_finished(&self) {
        (**self).busy_finished()
    }

    fn notify(&self, notice: &Notice) {
        (**self).notify(notice)
    }
}

/// Writes notices to the log.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingObserver;

impl SessionObserver for TracingObserver {
    fn busy_started(&self) {
        tracing::trace!("Operation started");
    }

    fn busy_finished(&self) {
        tracing::trace!("Operation finished");
    }

    fn notify(&self, notice: &Notice) {
        match notice.level {
            NoticeLevel::Success => tracing::info!(message = %notice.message, "Notice"),
            NoticeLevel::Error => tracing::error!(message = %notice.message, "Notice"),
        }
    }
}
