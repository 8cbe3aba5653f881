use std::collections::HashMap;
use std::rc::Rc;

use crate::binding::FieldBinding;
use crate::types::{BindState, SurfaceId};

/// Typed record of which surfaces are already bound.
#[derive(Default)]
pub struct BindRegistry {
    bound: HashMap<SurfaceId, Rc<FieldBinding>>,
}

impl BindRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self, id: SurfaceId) -> BindState {
        if self.bound.contains_key(&id) {
            BindState::Bound
        } else {
            BindState::Unbound
        }
    }

    /// Create the binding for `id`. Returns `None` if it was already bound.
    pub fn try_bind(&mut self, id: SurfaceId) -> Option<Rc<FieldBinding>> {
        if self.bound.contains_key(&id) {
            return None;
        }
        let binding = Rc::new(FieldBinding::new(id));
        self.bound.insert(id, Rc::clone(&binding));
        Some(binding)
    }

    /// Forget the binding for `id`, returning it if it existed.
    pub fn release(&mut self, id: SurfaceId) -> Option<Rc<FieldBinding>> {
        self.bound.remove(&id)
    }

    pub fn ids(&self) -> impl Iterator<Item = SurfaceId> + '_ {
        self.bound.keys().copied()
    }

    pub fn get(&self, id: SurfaceId) -> Option<Rc<FieldBinding>> {
        self.bound.get(&id).cloned()
    }

    pub fn len(&self) -> usize {
        self.bound.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bound.is_empty()
    }
}
