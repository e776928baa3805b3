//! Editing session over a server's worker settings.
//!
//! # Responsibilities
//! - Own the baseline document and the current flat snapshot
//! - Load, edit, diff, submit and reconcile
//! - Signal busy state and notices to the observer
//!
//! # Design Decisions
//! - One submit in flight per generation; edits are rejected meanwhile
//! - Every load and re-initialization bumps a generation counter; a response
//!   that returns under an older generation is discarded
//! - The state lock is never held across an await point

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use arc_swap::{ArcSwap, ArcSwapOption};

use crate::client::SettingsBackend;
use crate::observability::metrics;
use crate::session::error::{LoadFailure, SessionError, SessionResult};
use crate::session::observer::{
    Notice, SessionObserver, TracingObserver, LOAD_FAILURE_MESSAGE, SUBMIT_FAILURE_MESSAGE,
};
use crate::session::state::{ServerContext, SessionState};
use crate::settings::{
    build, build_patch, diff, flatten, reconcile, ConfigDocument, Diff, FlatFields, PatchDocument,
    SettingsError,
};

/// Result of a successful submit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Nothing changed; no request was sent.
    NoChanges,
    /// The patch was applied and the baseline replaced.
    Saved { patch: PatchDocument, changed: usize },
}

#[derive(Debug)]
struct Inner {
    state: SessionState,
    baseline_fields: FlatFields,
    current: FlatFields,
    load_error: Option<String>,
    /// Generation of the submit awaiting its response, if any.
    submit_generation: Option<u64>,
}

impl Inner {
    fn loading() -> Self {
        Self {
            state: SessionState::Loading,
            baseline_fields: FlatFields::new(),
            current: FlatFields::new(),
            load_error: None,
            submit_generation: None,
        }
    }

    fn refresh_state(&mut self) {
        self.state = if self.current == self.baseline_fields {
            SessionState::Clean
        } else {
            SessionState::Dirty
        };
    }
}

/// Clears the in-flight marker when the submit finishes or is dropped.
///
/// A marker left by an older generation has already been replaced along with
/// the rest of the state, so only a matching one is cleared.
struct SubmitGuard<'a> {
    inner: &'a Mutex<Inner>,
    generation: u64,
}

impl Drop for SubmitGuard<'_> {
    fn drop(&mut self) {
        let mut inner = self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        if inner.submit_generation == Some(self.generation) {
            inner.submit_generation = None;
        }
    }
}

/// Pairs `busy_started` with `busy_finished`, even when the request future
/// is dropped.
struct BusyGuard<'a, O: SessionObserver>(&'a O);

impl<'a, O: SessionObserver> BusyGuard<'a, O> {
    fn new(observer: &'a O) -> Self {
        observer.busy_started();
        Self(observer)
    }
}

impl<O: SessionObserver> Drop for BusyGuard<'_, O> {
    fn drop(&mut self) {
        self.0.busy_finished();
    }
}

/// An editing session for one server's worker settings.
pub struct EditSession<B, O = TracingObserver> {
    backend: B,
    observer: O,
    context: ArcSwap<ServerContext>,
    baseline: ArcSwapOption<ConfigDocument>,
    inner: Mutex<Inner>,
    generation: AtomicU64,
}

impl<B: SettingsBackend> EditSession<B> {
    /// Create a session that reports notices through `tracing`.
    pub fn new(backend: B, context: ServerContext) -> Self {
        Self::with_observer(backend, TracingObserver, context)
    }
}

impl<B: SettingsBackend, O: SessionObserver> EditSession<B, O> {
    pub fn with_observer(backend: B, observer: O, context: ServerContext) -> Self {
        Self {
            backend,
            observer,
            context: ArcSwap::from_pointee(context),
            baseline: ArcSwapOption::empty(),
            inner: Mutex::new(Inner::loading()),
            generation: AtomicU64::new(0),
        }
    }

    pub fn state(&self) -> SessionState {
        self.lock().state
    }

    pub fn context(&self) -> Arc<ServerContext> {
        self.context.load_full()
    }

    /// The last server-confirmed document, once loaded.
    pub fn baseline(&self) -> Option<Arc<ConfigDocument>> {
        self.baseline.load_full()
    }

    /// Snapshot of the current field values.
    pub fn current(&self) -> FlatFields {
        self.lock().current.clone()
    }

    pub fn field(&self, path: &str) -> Option<u64> {
        self.lock().current.get(path).copied()
    }

    /// Stable message describing the last load failure.
    pub fn load_error(&self) -> Option<String> {
        self.lock().load_error.clone()
    }

    pub fn is_dirty(&self) -> bool {
        self.state() == SessionState::Dirty
    }

    /// Whether a submit of the current generation awaits its response.
    pub fn is_submitting(&self) -> bool {
        let inner = self.lock();
        self.submit_in_flight(&inner)
    }

    /// Changes a submit would send right now.
    pub fn pending_changes(&self) -> SessionResult<Diff> {
        let inner = self.lock();
        Self::require_editable(&inner)?;
        Ok(diff(&inner.baseline_fields, &inner.current)?)
    }

    /// Switch the session to another server. Any in-flight load or submit
    /// for the previous server is discarded when it completes.
    pub fn reinitialize(&self, context: ServerContext) {
        let mut inner = self.lock();
        self.generation.fetch_add(1, Ordering::AcqRel);
        tracing::info!(server_id = %context.server_id, "Session re-initialized");
        self.context.store(Arc::new(context));
        self.baseline.store(None);
        *inner = Inner::loading();
    }

    /// Fetch the settings document and make it the baseline.
    ///
    /// On failure the session moves to `LoadError` and nothing is populated.
    pub async fn load(&self) -> SessionResult<()> {
        let generation = {
            let mut inner = self.lock();
            let generation = self.generation.fetch_add(1, Ordering::AcqRel) + 1;
            self.baseline.store(None);
            *inner = Inner::loading();
            generation
        };
        let server_id = self.context.load().server_id.clone();

        let response = {
            let _busy = BusyGuard::new(&self.observer);
            self.backend.load(&server_id).await
        };

        let mut inner = self.lock();
        if self.generation.load(Ordering::Acquire) != generation {
            tracing::debug!(%server_id, "Discarding superseded load response");
            metrics::record_load("superseded");
            return Err(SessionError::Superseded);
        }

        let document = response
            .map_err(LoadFailure::from)
            .and_then(|body| build(&body).map_err(LoadFailure::from));

        match document {
            Ok(document) => {
                let fields = flatten(&document);
                tracing::info!(%server_id, fields = fields.len(), "Worker settings loaded");
                self.baseline.store(Some(Arc::new(document)));
                inner.baseline_fields = fields.clone();
                inner.current = fields;
                inner.state = SessionState::Clean;
                metrics::record_load("success");
                Ok(())
            }
            Err(cause) => {
                tracing::warn!(%server_id, error = %cause, "Failed to load worker settings");
                inner.state = SessionState::LoadError;
                inner.load_error = Some(LOAD_FAILURE_MESSAGE.to_string());
                metrics::record_load("failure");
                drop(inner);

                self.observer.notify(&Notice::error(LOAD_FAILURE_MESSAGE));
                Err(SessionError::Load {
                    message: LOAD_FAILURE_MESSAGE.to_string(),
                    cause,
                })
            }
        }
    }

    /// Set one field of the current snapshot.
    pub fn set_field(&self, path: &str, value: u64) -> SessionResult<()> {
        let mut inner = self.lock();
        self.require_idle(&inner)?;
        Self::require_editable(&inner)?;
        match inner.current.get_mut(path) {
            Some(slot) => *slot = value,
            None => {
                return Err(SettingsError::UnknownField {
                    path: path.to_string(),
                }
                .into())
            }
        }
        inner.refresh_state();
        tracing::debug!(path, value, state = %inner.state, "Field updated");
        Ok(())
    }

    /// Discard every unsaved edit.
    pub fn reset(&self) -> SessionResult<()> {
        let mut inner = self.lock();
        self.require_idle(&inner)?;
        Self::require_editable(&inner)?;
        inner.current = inner.baseline_fields.clone();
        inner.state = SessionState::Clean;
        Ok(())
    }

    /// Send the pending changes and adopt the server's document as the new
    /// baseline.
    ///
    /// An empty diff short-circuits without a request. Transport failures
    /// leave the baseline and the edits untouched.
    pub async fn submit(&self) -> SessionResult<SubmitOutcome> {
        let (changes, generation) = {
            let mut inner = self.lock();
            self.require_idle(&inner)?;
            Self::require_editable(&inner)?;
            let changes = diff(&inner.baseline_fields, &inner.current)?;
            let generation = self.generation.load(Ordering::Acquire);
            inner.submit_generation = Some(generation);
            (changes, generation)
        };
        let _guard = SubmitGuard {
            inner: &self.inner,
            generation,
        };

        if changes.is_empty() {
            tracing::info!("No changes to save");
            metrics::record_submit("noop", 0);
            return Ok(SubmitOutcome::NoChanges);
        }

        let patch = build_patch(&changes)?;
        let context = self.context.load_full();
        tracing::debug!(
            server_id = %context.server_id,
            paths = ?changes.paths().collect::<Vec<_>>(),
            "Submitting worker settings patch"
        );

        let response = {
            let _busy = BusyGuard::new(&self.observer);
            self.backend
                .patch(&context.server_id, &patch.to_request_body())
                .await
        };

        let body = match response {
            Ok(body) => body,
            Err(e) => {
                tracing::warn!(server_id = %context.server_id, error = %e, "Failed to save worker settings");
                metrics::record_submit("failure", changes.len());
                self.observer.notify(&Notice::error(SUBMIT_FAILURE_MESSAGE));
                return Err(SessionError::SubmitTransportFailure(e));
            }
        };

        let mut inner = self.lock();
        if self.generation.load(Ordering::Acquire) != generation {
            tracing::debug!(server_id = %context.server_id, "Discarding superseded submit response");
            metrics::record_submit("superseded", changes.len());
            return Err(SessionError::Superseded);
        }

        let old_baseline = self.baseline.load_full().unwrap_or_default();
        let reconciled = match reconcile(&old_baseline, &body) {
            Ok(reconciled) => reconciled,
            Err(e) => {
                tracing::error!(error = %e, "Server returned an invalid settings document");
                metrics::record_submit("invalid_response", changes.len());
                drop(inner);
                self.observer.notify(&Notice::error(SUBMIT_FAILURE_MESSAGE));
                return Err(e.into());
            }
        };

        self.baseline.store(Some(Arc::new(reconciled.baseline)));
        inner.baseline_fields = reconciled.current.clone();
        inner.current = reconciled.current;
        inner.state = SessionState::Clean;
        drop(inner);

        tracing::info!(
            server_id = %context.server_id,
            changed_fields = changes.len(),
            "Worker settings saved"
        );
        metrics::record_submit("success", changes.len());
        self.observer.notify(&Notice::success(context.saved_message()));

        Ok(SubmitOutcome::Saved {
            patch,
            changed: changes.len(),
        })
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn submit_in_flight(&self, inner: &Inner) -> bool {
        inner.submit_generation == Some(self.generation.load(Ordering::Acquire))
    }

    fn require_idle(&self, inner: &Inner) -> SessionResult<()> {
        if self.submit_in_flight(inner) {
            Err(SessionError::SubmitInFlight)
        } else {
            Ok(())
        }
    }

    fn require_editable(inner: &Inner) -> SessionResult<()> {
        if inner.state.is_editable() {
            Ok(())
        } else {
            Err(SessionError::NotEditable(inner.state))
        }
    }
}
