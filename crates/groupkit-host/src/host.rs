//! Traits the host editor implements

use groupkit_core::ObjectHandle;

/// Access to host-managed scene objects.
///
/// Handles may go stale at any time between calls. Queries on a dead
/// handle return `false`/`None` and setters on a dead handle do nothing.
/// Setting a flag to the value it already has must leave the object
/// unchanged.
pub trait ObjectHost {
    /// Whether the handle still resolves to a live object
    fn is_alive(&self, handle: ObjectHandle) -> bool;

    /// Display name of the object
    fn object_name(&self, handle: ObjectHandle) -> Option<String>;

    /// Visibility flag, `None` for dead handles
    fn is_active(&self, handle: ObjectHandle) -> Option<bool>;

    /// Not-editable flag, `None` for dead handles
    fn is_locked(&self, handle: ObjectHandle) -> Option<bool>;

    fn set_active(&mut self, handle: ObjectHandle, active: bool);

    fn set_locked(&mut self, handle: ObjectHandle, locked: bool);

    /// Put the object back into its unmanaged state: visible and editable
    fn release(&mut self, handle: ObjectHandle) {
        self.set_active(handle, true);
        self.set_locked(handle, false);
    }
}

/// Read and replace the editor's current selection
pub trait SelectionHost {
    fn selection(&self) -> Vec<ObjectHandle>;

    fn set_selection(&mut self, objects: &[ObjectHandle]);
}

/// Host undo system. Called before a mutation of persistent group state.
pub trait UndoHost {
    fn record_checkpoint(&mut self, label: &str);
}

/// Everything the group controller needs from the editor
pub trait EditorHost: ObjectHost + SelectionHost + UndoHost {}

impl<T: ObjectHost + SelectionHost + UndoHost> EditorHost for T {}
