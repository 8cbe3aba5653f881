//! Live input binder: keeps text surfaces transliterated as the user edits them.
//!
//! `Binder` discovers qualifying surfaces through a `HostDocument`, wires one
//! `FieldBinding` per surface, and re-scans whenever the host reports that
//! the document structure changed. Each binding rewrites the full field value
//! on every input notification, restores the caret, and re-dispatches the
//! notification so the host's own reactive layer sees the update.

mod binder;
mod binding;
mod host;
mod registry;
mod types;

pub mod headless;

#[cfg(test)]
mod tests;

pub use binder::Binder;
pub use binding::FieldBinding;
pub use host::{HostDocument, InputListener, MutationListener};
pub use registry::BindRegistry;
pub use types::{BindState, ChangeOutcome, EditEvent, SurfaceId};
