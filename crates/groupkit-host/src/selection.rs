//! Editor selection state

use groupkit_core::ObjectHandle;

/// The set of currently selected objects, in selection order
#[derive(Debug, Clone, Default)]
pub struct SelectionState {
    objects: Vec<ObjectHandle>,
}

impl SelectionState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self) -> &[ObjectHandle] {
        &self.objects
    }

    /// Replace the selection; repeated handles are kept once
    pub fn set(&mut self, objects: &[ObjectHandle]) {
        self.objects.clear();
        for obj in objects {
            if !self.objects.contains(obj) {
                self.objects.push(*obj);
            }
        }
    }

    pub fn clear(&mut self) {
        self.objects.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }
}
