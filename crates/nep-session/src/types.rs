use std::fmt;

use crate::host::HostDocument;

/// Opaque identity of a text-input surface, assigned by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SurfaceId(pub u64);

impl fmt::Display for SurfaceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "surface#{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BindState {
    Unbound,
    /// Terminal for the surface's lifetime.
    Bound,
}

/// Snapshot of a surface taken when an input notification arrives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditEvent {
    pub full_text: String,
    /// Selection start in host units; `None` if the host cannot report it.
    pub caret_offset: Option<usize>,
}

impl EditEvent {
    /// Read value and caret from `host`. Returns `None` if the surface is gone.
    pub fn capture(host: &dyn HostDocument, id: SurfaceId) -> Option<EditEvent> {
        let full_text = host.value(id)?;
        let caret_offset = host.selection_start(id);
        Some(EditEvent {
            full_text,
            caret_offset,
        })
    }
}

/// What one pass of the change handler did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeOutcome {
    /// The handler was already running for this surface.
    Suppressed,
    /// The host no longer knows the surface.
    Missing,
    /// Value was already fully transliterated; nothing written.
    Unchanged,
    /// Value rewritten, caret restored, notification re-dispatched.
    Rewritten { caret: Option<usize> },
}
