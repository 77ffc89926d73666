//! A single named group of objects

use groupkit_core::{GroupId, ObjectHandle};
use groupkit_host::ObjectHost;

/// A named set of object handles with frozen/hidden state.
///
/// Members are kept unique. Their order is the order they were first
/// added, which only matters for display and serialization.
#[derive(Debug, Clone)]
pub struct Group {
    id: GroupId,
    name: String,
    members: Vec<ObjectHandle>,
    frozen: bool,
    hidden: bool,
}

impl Group {
    /// Create a group with fresh id; repeated members are kept once
    pub fn new(name: impl Into<String>, members: impl IntoIterator<Item = ObjectHandle>) -> Self {
        let mut group = Self {
            id: GroupId::new(),
            name: name.into(),
            members: Vec::new(),
            frozen: false,
            hidden: false,
        };
        group.add_members(members);
        group
    }

    pub fn with_state(mut self, frozen: bool, hidden: bool) -> Self {
        self.frozen = frozen;
        self.hidden = hidden;
        self
    }

    pub fn id(&self) -> GroupId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    pub fn members(&self) -> &[ObjectHandle] {
        &self.members
    }

    pub fn frozen(&self) -> bool {
        self.frozen
    }

    pub fn hidden(&self) -> bool {
        self.hidden
    }

    /// Set the frozen flag. Member objects are not touched.
    pub fn set_frozen(&mut self, frozen: bool) {
        self.frozen = frozen;
    }

    /// Set the hidden flag. Member objects are not touched.
    pub fn set_hidden(&mut self, hidden: bool) {
        self.hidden = hidden;
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn contains(&self, handle: ObjectHandle) -> bool {
        self.members.contains(&handle)
    }

    /// Whether any member is in `objects`
    pub fn intersects(&self, objects: &[ObjectHandle]) -> bool {
        self.members.iter().any(|m| objects.contains(m))
    }

    /// Add objects not already present. Returns the ones actually added.
    pub fn add_members(&mut self, objects: impl IntoIterator<Item = ObjectHandle>) -> Vec<ObjectHandle> {
        let mut added = Vec::new();
        for obj in objects {
            if !self.members.contains(&obj) {
                self.members.push(obj);
                added.push(obj);
            }
        }
        added
    }

    /// Remove every member found in `objects`. Returns how many were removed.
    pub fn remove_members(&mut self, objects: &[ObjectHandle]) -> usize {
        let before = self.members.len();
        self.members.retain(|m| !objects.contains(m));
        before - self.members.len()
    }

    pub fn remove_member(&mut self, handle: ObjectHandle) -> bool {
        self.remove_members(&[handle]) > 0
    }

    /// Replace the whole member set
    pub fn set_members(&mut self, objects: impl IntoIterator<Item = ObjectHandle>) {
        self.members.clear();
        self.add_members(objects);
    }

    /// Drop members the host no longer knows about. Returns how many were dropped.
    pub fn clean<H: ObjectHost + ?Sized>(&mut self, host: &H) -> usize {
        let before = self.members.len();
        self.members.retain(|m| host.is_alive(*m));
        before - self.members.len()
    }
}
