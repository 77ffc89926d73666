//! SceneWorld - ECS-backed scene with stable object handles

use bimap::BiMap;
use groupkit_core::{GroupError, ObjectHandle, Result};

/// Display name of a scene object
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectName(pub String);

/// Editor flags the group panel drives
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ObjectFlags {
    /// Visible in the scene
    pub active: bool,
    /// Locked from editing
    pub locked: bool,
}

impl Default for ObjectFlags {
    fn default() -> Self {
        Self {
            active: true,
            locked: false,
        }
    }
}

/// A minimal editor scene
///
/// Wraps hecs::World with:
/// - Stable ObjectHandle mapping that is never recycled
/// - Name and flag components per object
pub struct SceneWorld {
    world: hecs::World,
    /// Bidirectional mapping: ObjectHandle <-> hecs::Entity
    handles: BiMap<ObjectHandle, hecs::Entity>,
    next_handle: u64,
}

impl Default for SceneWorld {
    fn default() -> Self {
        Self::new()
    }
}

impl SceneWorld {
    pub fn new() -> Self {
        Self {
            world: hecs::World::new(),
            handles: BiMap::new(),
            next_handle: 1,
        }
    }

    /// Spawn a new visible, editable object
    pub fn spawn(&mut self, name: impl Into<String>) -> ObjectHandle {
        let handle = ObjectHandle(self.next_handle);
        self.next_handle += 1;

        let entity = self
            .world
            .spawn((ObjectName(name.into()), ObjectFlags::default()));
        self.handles.insert(handle, entity);
        handle
    }

    /// Destroy an object. Handles to it become permanently invalid.
    pub fn despawn(&mut self, handle: ObjectHandle) -> Result<()> {
        let (_, entity) = self
            .handles
            .remove_by_left(&handle)
            .ok_or(GroupError::InvalidMember(handle))?;

        self.world
            .despawn(entity)
            .map_err(|_| GroupError::InvalidMember(handle))?;
        log::debug!("despawned object {}", handle);
        Ok(())
    }

    /// Check if a handle resolves to a live object
    pub fn contains(&self, handle: ObjectHandle) -> bool {
        self.entity(handle)
            .map(|e| self.world.contains(e))
            .unwrap_or(false)
    }

    pub fn name(&self, handle: ObjectHandle) -> Option<String> {
        let entity = self.entity(handle)?;
        let name = self.world.get::<&ObjectName>(entity).ok()?;
        Some(name.0.clone())
    }

    pub fn flags(&self, handle: ObjectHandle) -> Option<ObjectFlags> {
        let entity = self.entity(handle)?;
        let flags = self.world.get::<&ObjectFlags>(entity).ok()?;
        Some(*flags)
    }

    pub fn set_active(&mut self, handle: ObjectHandle, active: bool) {
        if let Some(flags) = self.flags_mut(handle) {
            flags.active = active;
        }
    }

    pub fn set_locked(&mut self, handle: ObjectHandle, locked: bool) {
        if let Some(flags) = self.flags_mut(handle) {
            flags.locked = locked;
        }
    }

    /// Number of live objects
    pub fn len(&self) -> usize {
        self.handles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }

    /// Handles of all live objects, in spawn order
    pub fn handles(&self) -> Vec<ObjectHandle> {
        let mut handles: Vec<_> = self.handles.left_values().copied().collect();
        handles.sort();
        handles
    }

    fn entity(&self, handle: ObjectHandle) -> Option<hecs::Entity> {
        self.handles.get_by_left(&handle).copied()
    }

    fn flags_mut(&mut self, handle: ObjectHandle) -> Option<&mut ObjectFlags> {
        let entity = self.entity(handle)?;
        self.world.query_one_mut::<&mut ObjectFlags>(entity).ok()
    }
}
