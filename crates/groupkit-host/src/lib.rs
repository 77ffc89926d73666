//! groupkit Host - the editor side of the group panel
//!
//! The group store never owns scene objects. Everything it knows about
//! them goes through the traits in this crate:
//! - [`ObjectHost`] - liveness checks plus the "active" and "locked" flags
//! - [`SelectionHost`] - read and replace the editor selection
//! - [`UndoHost`] - register an undo checkpoint before a mutation
//!
//! [`SceneHost`] bundles an ECS-backed [`SceneWorld`] with a selection and
//! an undo journal, and is what the tests drive.

mod host;
mod selection;
mod undo;
mod world;

pub use host::{EditorHost, ObjectHost, SelectionHost, UndoHost};
pub use selection::SelectionState;
pub use undo::{Checkpoint, UndoJournal};
pub use world::{ObjectFlags, ObjectName, SceneWorld};

use groupkit_core::ObjectHandle;

/// Reference editor host: a scene, its selection, and an undo journal
#[derive(Default)]
pub struct SceneHost {
    pub world: SceneWorld,
    pub selection: SelectionState,
    pub undo: UndoJournal,
}

impl SceneHost {
    pub fn new() -> Self {
        Self::default()
    }

    /// Spawn one object per name and return their handles in order
    pub fn spawn_all<'a>(&mut self, names: impl IntoIterator<Item = &'a str>) -> Vec<ObjectHandle> {
        names.into_iter().map(|n| self.world.spawn(n)).collect()
    }

    /// Replace the current selection
    pub fn select(&mut self, objects: &[ObjectHandle]) {
        self.selection.set(objects);
    }
}

impl ObjectHost for SceneHost {
    fn is_alive(&self, handle: ObjectHandle) -> bool {
        self.world.contains(handle)
    }

    fn object_name(&self, handle: ObjectHandle) -> Option<String> {
        self.world.name(handle)
    }

    fn is_active(&self, handle: ObjectHandle) -> Option<bool> {
        self.world.flags(handle).map(|f| f.active)
    }

    fn is_locked(&self, handle: ObjectHandle) -> Option<bool> {
        self.world.flags(handle).map(|f| f.locked)
    }

    fn set_active(&mut self, handle: ObjectHandle, active: bool) {
        self.world.set_active(handle, active);
    }

    fn set_locked(&mut self, handle: ObjectHandle, locked: bool) {
        self.world.set_locked(handle, locked);
    }
}

impl SelectionHost for SceneHost {
    fn selection(&self) -> Vec<ObjectHandle> {
        self.selection.get().to_vec()
    }

    fn set_selection(&mut self, objects: &[ObjectHandle]) {
        self.selection.set(objects);
    }
}

impl UndoHost for SceneHost {
    fn record_checkpoint(&mut self, label: &str) {
        self.undo.record(label);
    }
}
