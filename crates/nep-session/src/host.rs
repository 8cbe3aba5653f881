use std::rc::Rc;

use crate::types::SurfaceId;

/// Called for every input notification on a surface, native or synthetic.
pub type InputListener = Rc<dyn Fn(&dyn HostDocument, SurfaceId)>;

/// Called after the document structure changed (a batch of mutations).
pub type MutationListener = Rc<dyn Fn(&dyn HostDocument)>;

/// The slice of a live document the binder needs.
///
/// All methods take `&self`: dispatching a notification runs listeners that
/// call back into the host, so implementations must use interior mutability
/// and release their own borrows before invoking a listener.
pub trait HostDocument {
    /// Qualifying surfaces currently attached to the document, in document order.
    fn surfaces(&self) -> Vec<SurfaceId>;

    /// Full text value, or `None` if the surface does not exist.
    fn value(&self, id: SurfaceId) -> Option<String>;

    fn set_value(&self, id: SurfaceId, value: &str);

    /// Selection start (the caret when the selection is collapsed).
    fn selection_start(&self, id: SurfaceId) -> Option<usize>;

    fn set_selection(&self, id: SurfaceId, start: usize, end: usize);

    fn add_input_listener(&self, id: SurfaceId, listener: InputListener);

    /// Raise a bubbling input notification on `id`, synchronously.
    fn dispatch_input(&self, id: SurfaceId);

    /// Subscribe to structural changes anywhere in the document subtree.
    fn observe_mutations(&self, listener: MutationListener);
}
