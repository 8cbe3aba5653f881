//! `web-sys` host: binds the page's text areas through the DOM.
//!
//! Surfaces are the elements matched by `binder.selector`. Input
//! notifications are `binder.event` events, and structural changes come from
//! one `MutationObserver` on `<body>`. Caret offsets are the DOM's UTF-16
//! `selectionStart`; the keymap only maps BMP characters to BMP characters,
//! so those offsets survive a rewrite unchanged.
//!
//! Surface ids live in a `WeakMap` keyed by the element, so a node that is
//! moved or reattached keeps its id without this host keeping it alive.
//! Elements that have left the document are dropped on the next scan, along
//! with their listeners.

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::{Rc, Weak};

use gloo_events::EventListener;
use js_sys::WeakMap;
use tracing::{debug, warn};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{
    Document, Event, EventInit, HtmlTextAreaElement, MutationObserver, MutationObserverInit,
};

use nep_core::settings::{settings, BinderSettings, DocumentTarget};
use nep_session::{HostDocument, InputListener, MutationListener, SurfaceId};

type ObserverCallback = Closure<dyn FnMut(js_sys::Array, MutationObserver)>;

/// A connected element and the listeners installed on it.
struct Tracked {
    element: HtmlTextAreaElement,
    listeners: Vec<EventListener>,
}

struct Inner {
    document: Document,
    selector: String,
    event: String,
    observe_subtree: bool,
    /// Element to surface id.
    ids: WeakMap,
    elements: RefCell<HashMap<SurfaceId, Tracked>>,
    next_id: Cell<u64>,
    observers: RefCell<Vec<(MutationObserver, ObserverCallback)>>,
}

impl Drop for Inner {
    fn drop(&mut self) {
        for (observer, _) in self.observers.get_mut().iter() {
            observer.disconnect();
        }
    }
}

#[derive(Clone)]
pub struct BrowserDocument {
    inner: Rc<Inner>,
}

impl BrowserDocument {
    pub fn new(document: Document, binder: &BinderSettings) -> Self {
        Self {
            inner: Rc::new(Inner {
                document,
                selector: binder.selector.clone(),
                event: binder.event.clone(),
                observe_subtree: binder.observe_subtree,
                ids: WeakMap::new(),
                elements: RefCell::new(HashMap::new()),
                next_id: Cell::new(0),
                observers: RefCell::new(Vec::new()),
            }),
        }
    }

    /// Host over the document selected by `binder.document`: this window's
    /// own document, or the embedding page's when running in an iframe.
    pub fn from_settings() -> Result<Self, JsValue> {
        let binder = &settings().binder;
        let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
        let window = match binder.document {
            DocumentTarget::Current => window,
            DocumentTarget::Parent => window.parent()?.unwrap_or(window),
        };
        let document = window
            .document()
            .ok_or_else(|| JsValue::from_str("window has no document"))?;
        Ok(Self::new(document, binder))
    }

    fn from_weak(inner: &Weak<Inner>) -> Option<Self> {
        inner.upgrade().map(|inner| Self { inner })
    }

    /// Number of elements currently tracked.
    pub fn tracked_count(&self) -> usize {
        self.inner.elements.borrow().len()
    }

    fn element(&self, id: SurfaceId) -> Option<HtmlTextAreaElement> {
        self.inner
            .elements
            .borrow()
            .get(&id)
            .map(|t| t.element.clone())
    }

    fn id_for(&self, el: HtmlTextAreaElement) -> SurfaceId {
        let id = match self.inner.ids.get(&el).as_f64() {
            Some(n) => SurfaceId(n as u64),
            None => {
                let id = SurfaceId(self.inner.next_id.get() + 1);
                self.inner.next_id.set(id.0);
                self.inner.ids.set(&el, &JsValue::from_f64(id.0 as f64));
                id
            }
        };
        self.inner
            .elements
            .borrow_mut()
            .entry(id)
            .or_insert_with(|| Tracked {
                element: el,
                listeners: Vec::new(),
            });
        id
    }

    /// Forget elements that are no longer in the document.
    fn drop_disconnected(&self) {
        self.inner.elements.borrow_mut().retain(|id, t| {
            let connected = t.element.is_connected();
            if !connected {
                debug!(surface = %id, "element left the document");
            }
            connected
        });
    }
}

impl HostDocument for BrowserDocument {
    fn surfaces(&self) -> Vec<SurfaceId> {
        self.drop_disconnected();
        let nodes = match self.inner.document.query_selector_all(&self.inner.selector) {
            Ok(nodes) => nodes,
            Err(e) => {
                warn!(selector = %self.inner.selector, error = ?e, "surface query failed");
                return Vec::new();
            }
        };
        (0..nodes.length())
            .filter_map(|i| nodes.get(i))
            .filter_map(|node| node.dyn_into::<HtmlTextAreaElement>().ok())
            .map(|el| self.id_for(el))
            .collect()
    }

    fn value(&self, id: SurfaceId) -> Option<String> {
        self.element(id).map(|el| el.value())
    }

    fn set_value(&self, id: SurfaceId, value: &str) {
        if let Some(el) = self.element(id) {
            el.set_value(value);
        }
    }

    fn selection_start(&self, id: SurfaceId) -> Option<usize> {
        let el = self.element(id)?;
        match el.selection_start() {
            Ok(start) => start.map(|s| s as usize),
            Err(e) => {
                warn!(surface = %id, error = ?e, "selectionStart unavailable");
                None
            }
        }
    }

    fn set_selection(&self, id: SurfaceId, start: usize, end: usize) {
        let Some(el) = self.element(id) else {
            return;
        };
        if let Err(e) = el.set_selection_range(start as u32, end as u32) {
            warn!(surface = %id, error = ?e, "setSelectionRange failed");
        }
    }

    fn add_input_listener(&self, id: SurfaceId, listener: InputListener) {
        let mut elements = self.inner.elements.borrow_mut();
        let Some(tracked) = elements.get_mut(&id) else {
            return;
        };
        let host = Rc::downgrade(&self.inner);
        let handle = EventListener::new(
            &tracked.element,
            self.inner.event.clone(),
            move |_event| {
                if let Some(host) = BrowserDocument::from_weak(&host) {
                    listener(&host, id);
                }
            },
        );
        tracked.listeners.push(handle);
    }

    fn dispatch_input(&self, id: SurfaceId) {
        let Some(el) = self.element(id) else {
            return;
        };
        let init = EventInit::new();
        init.set_bubbles(true);
        let dispatched = Event::new_with_event_init_dict(&self.inner.event, &init)
            .and_then(|event| el.dispatch_event(&event));
        if let Err(e) = dispatched {
            warn!(surface = %id, error = ?e, "synthetic input dispatch failed");
        }
    }

    fn observe_mutations(&self, listener: MutationListener) {
        let Some(body) = self.inner.document.body() else {
            warn!("document has no body; mutation watch not installed");
            return;
        };
        let host = Rc::downgrade(&self.inner);
        let callback: ObserverCallback =
            Closure::new(move |_records: js_sys::Array, _observer: MutationObserver| {
                if let Some(host) = BrowserDocument::from_weak(&host) {
                    listener(&host);
                }
            });
        let observer = match MutationObserver::new(callback.as_ref().unchecked_ref()) {
            Ok(observer) => observer,
            Err(e) => {
                warn!(error = ?e, "MutationObserver unavailable");
                return;
            }
        };
        let options = MutationObserverInit::new();
        options.set_child_list(true);
        options.set_subtree(self.inner.observe_subtree);
        if let Err(e) = observer.observe_with_options(&body, &options) {
            warn!(error = ?e, "MutationObserver.observe failed");
            return;
        }
        self.inner.observers.borrow_mut().push((observer, callback));
    }
}

thread_local! {
    static PAGE_HOST: RefCell<Option<BrowserDocument>> = const { RefCell::new(None) };
}

/// Entry point for the page: bind every text area now and as it appears.
#[wasm_bindgen]
pub fn start_nepali_typing() -> Result<(), JsValue> {
    let host = BrowserDocument::from_settings()?;
    let binder = crate::attach(&host);
    debug!(bound = binder.bound_count(), "browser binder started");
    // Listeners only hold the host weakly; keep it for the page's lifetime.
    PAGE_HOST.with(|slot| *slot.borrow_mut() = Some(host));
    Ok(())
}
