use std::cell::Cell;

use tracing::{debug, debug_span, trace};

use nep_core::Keymap;

use crate::host::HostDocument;
use crate::types::{ChangeOutcome, EditEvent, SurfaceId};

/// Per-surface state of a bound field.
pub struct FieldBinding {
    id: SurfaceId,
    /// Set while this binding's handler is running.
    converting: Cell<bool>,
    rewrites: Cell<u64>,
    suppressed: Cell<u64>,
    last_outcome: Cell<Option<ChangeOutcome>>,
}

/// Clears the re-entrancy flag on every exit path, unwinding included.
struct ConvertingGuard<'a>(&'a Cell<bool>);

impl<'a> ConvertingGuard<'a> {
    /// Returns `None` if the flag is already set.
    fn enter(flag: &'a Cell<bool>) -> Option<Self> {
        if flag.replace(true) {
            None
        } else {
            Some(Self(flag))
        }
    }
}

impl Drop for ConvertingGuard<'_> {
    fn drop(&mut self) {
        self.0.set(false);
    }
}

impl FieldBinding {
    pub(crate) fn new(id: SurfaceId) -> Self {
        Self {
            id,
            converting: Cell::new(false),
            rewrites: Cell::new(0),
            suppressed: Cell::new(0),
            last_outcome: Cell::new(None),
        }
    }

    pub fn id(&self) -> SurfaceId {
        self.id
    }

    pub fn is_converting(&self) -> bool {
        self.converting.get()
    }

    /// Number of passes that wrote a new value.
    pub fn rewrites(&self) -> u64 {
        self.rewrites.get()
    }

    /// Number of re-entrant calls that were ignored.
    pub fn suppressed(&self) -> u64 {
        self.suppressed.get()
    }

    pub fn last_outcome(&self) -> Option<ChangeOutcome> {
        self.last_outcome.get()
    }

    /// Run the change handler for one input notification.
    ///
    /// Reads the whole value, transliterates it, and writes it back only if it
    /// changed. The caret offset captured before the write is restored as is:
    /// the keymap is one char to one char and BMP-only, so offsets line up.
    pub fn handle_input(&self, host: &dyn HostDocument, keymap: &Keymap) -> ChangeOutcome {
        let Some(_guard) = ConvertingGuard::enter(&self.converting) else {
            trace!(surface = %self.id, "re-entrant input ignored");
            self.suppressed.set(self.suppressed.get() + 1);
            return ChangeOutcome::Suppressed;
        };
        let _span = debug_span!("handle_input", surface = %self.id).entered();

        let outcome = match EditEvent::capture(host, self.id) {
            None => {
                debug!("surface no longer present");
                ChangeOutcome::Missing
            }
            Some(event) if keymap.is_fixed_point(&event.full_text) => ChangeOutcome::Unchanged,
            Some(event) => {
                let converted = keymap.transliterate(&event.full_text);
                host.set_value(self.id, &converted);
                if let Some(caret) = event.caret_offset {
                    host.set_selection(self.id, caret, caret);
                }
                self.rewrites.set(self.rewrites.get() + 1);
                debug!(
                    caret = ?event.caret_offset,
                    len = converted.chars().count(),
                    "rewrote value"
                );
                // Record before dispatch so listeners see this pass's result.
                self.last_outcome.set(Some(ChangeOutcome::Rewritten {
                    caret: event.caret_offset,
                }));
                host.dispatch_input(self.id);
                ChangeOutcome::Rewritten {
                    caret: event.caret_offset,
                }
            }
        };

        self.last_outcome.set(Some(outcome));
        outcome
    }
}
