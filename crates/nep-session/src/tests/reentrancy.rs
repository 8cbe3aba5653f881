use std::cell::RefCell;

use super::*;
use crate::types::ChangeOutcome;

#[test]
fn test_synthetic_notification_does_not_recurse() {
    let (doc, binder, id) = bound_doc();
    let root = observe_root(&doc);

    doc.type_text(id, "k");

    let binding = binder.binding(id).unwrap();
    assert_eq!(binding.rewrites(), 1);
    // The synthetic dispatch re-entered the binder's own listener once.
    assert_eq!(binding.suppressed(), 1);
    assert!(!binding.is_converting());
    assert_eq!(root.get(), 2);
}

#[test]
fn test_nested_handler_call_is_suppressed() {
    let (doc, binder, id) = bound_doc();
    let binding = binder.binding(id).unwrap();
    let keymap = binder.keymap();
    let outcomes = Rc::new(RefCell::new(Vec::new()));

    let seen = Rc::clone(&outcomes);
    let nested = Rc::clone(&binding);
    doc.add_document_listener(Rc::new(move |host: &dyn HostDocument, _: SurfaceId| {
        seen.borrow_mut().push(nested.handle_input(host, keymap));
    }));

    doc.type_text(id, "s");

    // First from inside the synthetic dispatch, then from the native one
    // after the binder finished.
    assert_eq!(
        *outcomes.borrow(),
        vec![ChangeOutcome::Suppressed, ChangeOutcome::Unchanged]
    );
    assert_eq!(binding.rewrites(), 1);
    assert_eq!(value(&doc, id), "\u{0938}");
}

#[test]
fn test_observer_redispatching_is_bounded() {
    let (doc, binder, id) = bound_doc();
    let depth = Rc::new(Cell::new(0u32));
    let max_depth = Rc::new(Cell::new(0u32));

    let (d, m) = (Rc::clone(&depth), Rc::clone(&max_depth));
    doc.add_document_listener(Rc::new(move |host: &dyn HostDocument, id: SurfaceId| {
        d.set(d.get() + 1);
        m.set(m.get().max(d.get()));
        if d.get() < 4 {
            host.dispatch_input(id);
        }
        d.set(d.get() - 1);
    }));

    doc.type_text(id, "namaste");

    let binding = binder.binding(id).unwrap();
    assert_eq!(binding.rewrites(), 1);
    assert!(binding.suppressed() >= 1);
    assert!(!binding.is_converting());
    assert_eq!(max_depth.get(), 4);
    assert_eq!(value(&doc, id), nep_core::transliterate("namaste"));
}

#[test]
fn test_write_during_synthetic_dispatch_waits_for_next_event() {
    let (doc, binder, id) = bound_doc();
    let calls = Rc::new(Cell::new(0u32));

    let c = Rc::clone(&calls);
    doc.add_document_listener(Rc::new(move |host: &dyn HostDocument, id: SurfaceId| {
        c.set(c.get() + 1);
        // Framework writes stale roman text back while the guard is held.
        if c.get() == 1 {
            let current = host.value(id).unwrap_or_default();
            host.set_value(id, &format!("{current}k"));
        }
    }));

    doc.type_text(id, "a");
    assert_eq!(value(&doc, id), "\u{093E}k");
    assert_eq!(binder.binding(id).unwrap().rewrites(), 1);

    doc.dispatch_input(id);
    assert_eq!(value(&doc, id), "\u{093E}\u{0915}");
    assert_eq!(binder.binding(id).unwrap().rewrites(), 2);
}

#[test]
fn test_guard_scoped_per_surface() {
    let doc = MemoryDocument::new();
    let a = doc.insert_surface(SurfaceKind::TextArea);
    let b = doc.insert_surface(SurfaceKind::TextArea);
    let binder = Binder::with_global_keymap();
    binder.activate(&doc);

    // Typing into `a` mirrors the roman keystroke into `b` from inside a's
    // synthetic notification; b's own binding must still convert it.
    doc.add_document_listener(Rc::new(move |host: &dyn HostDocument, id: SurfaceId| {
        if id == a && host.value(b).is_some_and(|v| v.is_empty()) {
            host.set_value(b, "k");
            host.dispatch_input(b);
        }
    }));

    doc.type_text(a, "k");
    assert_eq!(value(&doc, a), "\u{0915}");
    assert_eq!(value(&doc, b), "\u{0915}");
}
