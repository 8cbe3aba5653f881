//! In-memory document host for tests and terminal frontends.
//!
//! Behaves like a browser page for the parts the binder touches: offsets are
//! counted in `char`s, setting a value moves the caret to the end, native
//! edits fire an input notification, and structural changes are queued and
//! delivered as one batch on `flush_mutations` (as a `MutationObserver`
//! would on the next microtask).

use std::cell::{Cell, RefCell};
use std::collections::BTreeMap;

use crate::host::{HostDocument, InputListener, MutationListener};
use crate::types::SurfaceId;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SurfaceKind {
    /// Multi-line text area; the only kind the binder picks up.
    TextArea,
    /// Single-line input; present in the document but not qualifying.
    TextInput,
}

struct Surface {
    kind: SurfaceKind,
    attached: bool,
    value: String,
    sel_start: usize,
    sel_end: usize,
    listeners: Vec<InputListener>,
    notifications: u64,
}

impl Surface {
    fn len(&self) -> usize {
        self.value.chars().count()
    }
}

#[derive(Default)]
pub struct MemoryDocument {
    next_id: Cell<u64>,
    surfaces: RefCell<BTreeMap<SurfaceId, Surface>>,
    /// Listeners on the document root, reached by bubbling.
    document_listeners: RefCell<Vec<InputListener>>,
    mutation_listeners: RefCell<Vec<MutationListener>>,
    pending_mutations: Cell<usize>,
}

fn byte_offset(s: &str, char_offset: usize) -> usize {
    s.char_indices()
        .nth(char_offset)
        .map_or(s.len(), |(i, _)| i)
}

impl MemoryDocument {
    pub fn new() -> Self {
        Self::default()
    }

    fn alloc_id(&self) -> SurfaceId {
        let id = self.next_id.get() + 1;
        self.next_id.set(id);
        SurfaceId(id)
    }

    fn queue_mutation(&self) {
        self.pending_mutations.set(self.pending_mutations.get() + 1);
    }

    /// Append a surface to the document.
    pub fn insert_surface(&self, kind: SurfaceKind) -> SurfaceId {
        let id = self.create_detached(kind);
        self.attach(id);
        id
    }

    /// Create a surface that is not (yet) part of the document.
    pub fn create_detached(&self, kind: SurfaceKind) -> SurfaceId {
        let id = self.alloc_id();
        self.surfaces.borrow_mut().insert(
            id,
            Surface {
                kind,
                attached: false,
                value: String::new(),
                sel_start: 0,
                sel_end: 0,
                listeners: Vec::new(),
                notifications: 0,
            },
        );
        id
    }

    pub fn attach(&self, id: SurfaceId) {
        if let Some(s) = self.surfaces.borrow_mut().get_mut(&id) {
            if !s.attached {
                s.attached = true;
                self.queue_mutation();
            }
        }
    }

    /// Take the surface out of the tree, keeping it (and its listeners) alive.
    pub fn detach(&self, id: SurfaceId) {
        if let Some(s) = self.surfaces.borrow_mut().get_mut(&id) {
            if s.attached {
                s.attached = false;
                self.queue_mutation();
            }
        }
    }

    /// Remove and drop the surface with all of its listeners.
    pub fn remove(&self, id: SurfaceId) {
        let removed = self.surfaces.borrow_mut().remove(&id);
        if matches!(removed, Some(ref s) if s.attached) {
            self.queue_mutation();
        }
    }

    /// Deliver queued structural changes as one batch. Returns whether any
    /// mutation listener ran.
    pub fn flush_mutations(&self) -> bool {
        if self.pending_mutations.replace(0) == 0 {
            return false;
        }
        let listeners: Vec<MutationListener> = self.mutation_listeners.borrow().clone();
        for listener in &listeners {
            listener(self);
        }
        !listeners.is_empty()
    }

    pub fn pending_mutations(&self) -> usize {
        self.pending_mutations.get()
    }

    /// Observe every input notification that bubbles to the document root.
    pub fn add_document_listener(&self, listener: InputListener) {
        self.document_listeners.borrow_mut().push(listener);
    }

    /// Native edit: replace the selection with `text`, put the caret after
    /// it, and fire an input notification.
    pub fn type_text(&self, id: SurfaceId, text: &str) {
        {
            let mut surfaces = self.surfaces.borrow_mut();
            let Some(s) = surfaces.get_mut(&id) else {
                return;
            };
            let (start, end) = (s.sel_start.min(s.sel_end), s.sel_start.max(s.sel_end));
            let lo = byte_offset(&s.value, start);
            let hi = byte_offset(&s.value, end);
            s.value.replace_range(lo..hi, text);
            let caret = start + text.chars().count();
            s.sel_start = caret;
            s.sel_end = caret;
        }
        self.dispatch_input(id);
    }

    /// Native edit: delete the selection, or the char before the caret.
    pub fn delete_backward(&self, id: SurfaceId) {
        {
            let mut surfaces = self.surfaces.borrow_mut();
            let Some(s) = surfaces.get_mut(&id) else {
                return;
            };
            let (mut start, end) = (s.sel_start.min(s.sel_end), s.sel_start.max(s.sel_end));
            if start == end {
                if start == 0 {
                    return;
                }
                start -= 1;
            }
            let lo = byte_offset(&s.value, start);
            let hi = byte_offset(&s.value, end);
            s.value.replace_range(lo..hi, "");
            s.sel_start = start;
            s.sel_end = start;
        }
        self.dispatch_input(id);
    }

    /// Whole-value native change (autocomplete, undo): the caret lands at
    /// `caret`, clamped to the new length.
    pub fn replace_value(&self, id: SurfaceId, value: &str, caret: usize) {
        {
            let mut surfaces = self.surfaces.borrow_mut();
            let Some(s) = surfaces.get_mut(&id) else {
                return;
            };
            s.value = value.to_string();
            let caret = caret.min(s.len());
            s.sel_start = caret;
            s.sel_end = caret;
        }
        self.dispatch_input(id);
    }

    /// User moves the caret or selects; no notification.
    pub fn select(&self, id: SurfaceId, start: usize, end: usize) {
        self.set_selection(id, start, end);
    }

    pub fn selection(&self, id: SurfaceId) -> Option<(usize, usize)> {
        self.surfaces
            .borrow()
            .get(&id)
            .map(|s| (s.sel_start, s.sel_end))
    }

    pub fn kind(&self, id: SurfaceId) -> Option<SurfaceKind> {
        self.surfaces.borrow().get(&id).map(|s| s.kind)
    }

    pub fn is_attached(&self, id: SurfaceId) -> bool {
        self.surfaces.borrow().get(&id).is_some_and(|s| s.attached)
    }

    /// Input notifications dispatched on `id`, native and synthetic.
    pub fn notifications(&self, id: SurfaceId) -> u64 {
        self.surfaces.borrow().get(&id).map_or(0, |s| s.notifications)
    }

    pub fn listener_count(&self, id: SurfaceId) -> usize {
        self.surfaces.borrow().get(&id).map_or(0, |s| s.listeners.len())
    }

    pub fn mutation_listener_count(&self) -> usize {
        self.mutation_listeners.borrow().len()
    }
}

impl HostDocument for MemoryDocument {
    fn surfaces(&self) -> Vec<SurfaceId> {
        self.surfaces
            .borrow()
            .iter()
            .filter(|(_, s)| s.attached && s.kind == SurfaceKind::TextArea)
            .map(|(id, _)| *id)
            .collect()
    }

    fn value(&self, id: SurfaceId) -> Option<String> {
        self.surfaces.borrow().get(&id).map(|s| s.value.clone())
    }

    fn set_value(&self, id: SurfaceId, value: &str) {
        if let Some(s) = self.surfaces.borrow_mut().get_mut(&id) {
            s.value = value.to_string();
            let end = s.len();
            s.sel_start = end;
            s.sel_end = end;
        }
    }

    fn selection_start(&self, id: SurfaceId) -> Option<usize> {
        self.surfaces.borrow().get(&id).map(|s| s.sel_start)
    }

    fn set_selection(&self, id: SurfaceId, start: usize, end: usize) {
        if let Some(s) = self.surfaces.borrow_mut().get_mut(&id) {
            let len = s.len();
            s.sel_start = start.min(len);
            s.sel_end = end.min(len).max(s.sel_start);
        }
    }

    fn add_input_listener(&self, id: SurfaceId, listener: InputListener) {
        if let Some(s) = self.surfaces.borrow_mut().get_mut(&id) {
            s.listeners.push(listener);
        }
    }

    fn dispatch_input(&self, id: SurfaceId) {
        let listeners: Vec<InputListener> = {
            let mut surfaces = self.surfaces.borrow_mut();
            let Some(s) = surfaces.get_mut(&id) else {
                return;
            };
            s.notifications += 1;
            let mut listeners = s.listeners.clone();
            if s.attached {
                listeners.extend(self.document_listeners.borrow().iter().cloned());
            }
            listeners
        };
        for listener in &listeners {
            listener(self, id);
        }
    }

    fn observe_mutations(&self, listener: MutationListener) {
        self.mutation_listeners.borrow_mut().push(listener);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::rc::Rc;

    #[test]
    fn test_type_text_inserts_at_caret() {
        let doc = MemoryDocument::new();
        let id = doc.insert_surface(SurfaceKind::TextArea);
        doc.type_text(id, "ac");
        doc.select(id, 1, 1);
        doc.type_text(id, "b");
        assert_eq!(doc.value(id).as_deref(), Some("abc"));
        assert_eq!(doc.selection(id), Some((2, 2)));
        assert_eq!(doc.notifications(id), 2);
    }

    #[test]
    fn test_type_text_replaces_selection() {
        let doc = MemoryDocument::new();
        let id = doc.insert_surface(SurfaceKind::TextArea);
        doc.type_text(id, "नमस्ते");
        doc.select(id, 1, 2);
        doc.type_text(id, "x");
        assert_eq!(doc.value(id).as_deref(), Some("नxस्ते"));
        assert_eq!(doc.selection(id), Some((2, 2)));
    }

    #[test]
    fn test_delete_backward() {
        let doc = MemoryDocument::new();
        let id = doc.insert_surface(SurfaceKind::TextArea);
        doc.type_text(id, "abc");
        doc.delete_backward(id);
        assert_eq!(doc.value(id).as_deref(), Some("ab"));
        doc.select(id, 0, 0);
        doc.delete_backward(id);
        assert_eq!(doc.value(id).as_deref(), Some("ab"));
        // no-op at start fires nothing
        assert_eq!(doc.notifications(id), 2);
    }

    #[test]
    fn test_set_value_moves_caret_to_end() {
        let doc = MemoryDocument::new();
        let id = doc.insert_surface(SurfaceKind::TextArea);
        doc.set_value(id, "नमस्ते");
        assert_eq!(doc.selection(id), Some((6, 6)));
    }

    #[test]
    fn test_surfaces_only_attached_text_areas() {
        let doc = MemoryDocument::new();
        let a = doc.insert_surface(SurfaceKind::TextArea);
        let _input = doc.insert_surface(SurfaceKind::TextInput);
        let detached = doc.create_detached(SurfaceKind::TextArea);
        assert_eq!(doc.surfaces(), vec![a]);
        doc.attach(detached);
        assert_eq!(doc.surfaces(), vec![a, detached]);
    }

    #[test]
    fn test_mutations_batched_until_flush() {
        let doc = MemoryDocument::new();
        let calls = Rc::new(Cell::new(0));
        let c = Rc::clone(&calls);
        doc.observe_mutations(Rc::new(move |_: &dyn HostDocument| c.set(c.get() + 1)));
        doc.insert_surface(SurfaceKind::TextArea);
        doc.insert_surface(SurfaceKind::TextArea);
        assert_eq!(doc.pending_mutations(), 2);
        assert_eq!(calls.get(), 0);
        assert!(doc.flush_mutations());
        assert_eq!(calls.get(), 1);
        assert!(!doc.flush_mutations());
        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn test_detached_surface_does_not_bubble() {
        let doc = MemoryDocument::new();
        let seen = Rc::new(Cell::new(0));
        let s = Rc::clone(&seen);
        doc.add_document_listener(Rc::new(move |_: &dyn HostDocument, _: SurfaceId| {
            s.set(s.get() + 1)
        }));
        let id = doc.insert_surface(SurfaceKind::TextArea);
        doc.type_text(id, "a");
        doc.detach(id);
        doc.type_text(id, "b");
        assert_eq!(seen.get(), 1);
        assert_eq!(doc.notifications(id), 2);
    }
}
