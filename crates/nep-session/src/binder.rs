use std::cell::{Cell, RefCell};
use std::rc::Rc;

use tracing::{debug, debug_span};

use nep_core::Keymap;

use crate::binding::FieldBinding;
use crate::host::HostDocument;
use crate::registry::BindRegistry;
use crate::types::{BindState, SurfaceId};

/// Discovers qualifying surfaces and binds each exactly once.
pub struct Binder {
    keymap: &'static Keymap,
    registry: RefCell<BindRegistry>,
    watching: Cell<bool>,
}

impl Binder {
    pub fn new(keymap: &'static Keymap) -> Rc<Self> {
        Rc::new(Self {
            keymap,
            registry: RefCell::new(BindRegistry::new()),
            watching: Cell::new(false),
        })
    }

    /// Binder over the process-wide keymap.
    pub fn with_global_keymap() -> Rc<Self> {
        Self::new(Keymap::global())
    }

    pub fn keymap(&self) -> &'static Keymap {
        self.keymap
    }

    /// Bind every surface present now, then keep binding new ones as the
    /// host reports structural changes. Returns how many surfaces were bound
    /// by the initial scan. Calling it again only re-scans.
    pub fn activate(self: &Rc<Self>, host: &dyn HostDocument) -> usize {
        let _span = debug_span!("activate").entered();
        let bound = self.scan_and_bind(host);
        if !self.watching.replace(true) {
            let binder = Rc::clone(self);
            host.observe_mutations(Rc::new(move |host: &dyn HostDocument| {
                binder.scan_and_bind(host);
            }));
            debug!("mutation watch installed");
        }
        bound
    }

    /// Release bindings of surfaces the host no longer has, then bind any
    /// qualifying surface not yet bound. Returns the number of new bindings.
    pub fn scan_and_bind(&self, host: &dyn HostDocument) -> usize {
        let surfaces = host.surfaces();
        self.release_gone(host);

        let mut newly_bound = 0;
        for id in surfaces {
            if self.bind(host, id) {
                newly_bound += 1;
            }
        }
        if newly_bound > 0 {
            debug!(newly_bound, total = self.bound_count(), "scan bound new surfaces");
        }
        newly_bound
    }

    /// Drop bindings whose surface the host reports as gone. Detached
    /// surfaces still have a value and keep their binding.
    fn release_gone(&self, host: &dyn HostDocument) -> usize {
        let gone: Vec<SurfaceId> = self
            .registry
            .borrow()
            .ids()
            .filter(|&id| host.value(id).is_none())
            .collect();
        let mut registry = self.registry.borrow_mut();
        for &id in &gone {
            registry.release(id);
            debug!(surface = %id, "released");
        }
        gone.len()
    }

    /// Bind a single surface. Returns `false` if it was already bound.
    pub fn bind(&self, host: &dyn HostDocument, id: SurfaceId) -> bool {
        let Some(binding) = self.registry.borrow_mut().try_bind(id) else {
            return false;
        };
        let keymap = self.keymap;
        host.add_input_listener(
            id,
            Rc::new(move |host: &dyn HostDocument, _id: SurfaceId| {
                binding.handle_input(host, keymap);
            }),
        );
        debug!(surface = %id, "bound");
        true
    }

    pub fn state(&self, id: SurfaceId) -> BindState {
        self.registry.borrow().state(id)
    }

    pub fn binding(&self, id: SurfaceId) -> Option<Rc<FieldBinding>> {
        self.registry.borrow().get(id)
    }

    pub fn bound_count(&self) -> usize {
        self.registry.borrow().len()
    }

    pub fn is_watching(&self) -> bool {
        self.watching.get()
    }
}
