mod reentrancy;

use std::cell::Cell;
use std::rc::Rc;

use crate::headless::{MemoryDocument, SurfaceKind};
use crate::host::HostDocument;
use crate::types::SurfaceId;
use crate::Binder;

/// Document with one text area, bound by an activated binder.
pub(super) fn bound_doc() -> (MemoryDocument, Rc<Binder>, SurfaceId) {
    let doc = MemoryDocument::new();
    let id = doc.insert_surface(SurfaceKind::TextArea);
    let binder = Binder::with_global_keymap();
    binder.activate(&doc);
    (doc, binder, id)
}

/// Count notifications that bubble to the document root, like a framework
/// observer persisting the field value would.
pub(super) fn observe_root(doc: &MemoryDocument) -> Rc<Cell<u64>> {
    let seen = Rc::new(Cell::new(0));
    let counter = Rc::clone(&seen);
    doc.add_document_listener(Rc::new(move |_: &dyn HostDocument, _: SurfaceId| {
        counter.set(counter.get() + 1);
    }));
    seen
}

pub(super) fn value(doc: &MemoryDocument, id: SurfaceId) -> String {
    doc.value(id).unwrap_or_default()
}
