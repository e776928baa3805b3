//! Worker settings diff & patch engine.
//!
//! # Data Flow
//! ```text
//! GET response (JSON)
//!     → document.rs (build: typed tree, literals resolved via literal.rs)
//!     → flatten.rs (baseline + current flat snapshots)
//!     → edits mutate current
//!     → diff.rs (changed paths only)
//!     → patch.rs (minimal nested document)
//!     → PATCH request body
//!
//! PATCH response (JSON)
//!     → reconcile.rs (rebuild baseline, reset current)
//! ```
//!
//! # Design Decisions
//! - Values are resolved to integers once, at build time
//! - Every stage is a pure function over owned snapshots
//! - The baseline is replaced wholesale, never merged field by field

pub mod diff;
pub mod document;
pub mod error;
pub mod flatten;
pub mod inherit;
pub mod literal;
pub mod patch;
pub mod reconcile;

pub use diff::{diff, Diff};
pub use document::{build, render, Attribute, ConfigDocument, WorkerAttributes};
pub use error::{SettingsError, SettingsResult};
pub use flatten::{flatten, unflatten, FlatFields};
pub use patch::{build_patch, PatchDocument};
pub use reconcile::{reconcile, Reconciled};
