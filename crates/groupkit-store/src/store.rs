//! GroupStore - the ordered list of groups in a scene

use crate::group::Group;
use groupkit_core::{GroupError, GroupId, ObjectHandle, Result};
use groupkit_host::ObjectHost;
use std::collections::BTreeSet;

/// Direction for [`GroupStore::reorder`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Towards index 0
    Up,
    /// Towards the end of the list
    Down,
}

/// Ordered collection of groups.
///
/// Order is user-visible. Indices stay put between mutations except for
/// reorder and removal; everything else addresses groups by [`GroupId`].
#[derive(Debug, Clone, Default)]
pub struct GroupStore {
    groups: Vec<Group>,
}

impl GroupStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a new group. Repeated members are kept once; empty is fine.
    pub fn create(
        &mut self,
        name: impl Into<String>,
        members: impl IntoIterator<Item = ObjectHandle>,
    ) -> GroupId {
        self.insert(Group::new(name, members))
    }

    /// Append an already-built group
    pub fn insert(&mut self, group: Group) -> GroupId {
        let id = group.id();
        log::debug!("group {} '{}' created with {} members", id, group.name(), group.len());
        self.groups.push(group);
        id
    }

    pub fn get(&self, id: GroupId) -> Option<&Group> {
        self.groups.iter().find(|g| g.id() == id)
    }

    pub fn get_mut(&mut self, id: GroupId) -> Option<&mut Group> {
        self.groups.iter_mut().find(|g| g.id() == id)
    }

    /// Like [`get_mut`](Self::get_mut) but fails with `NotFound`
    pub fn group_mut(&mut self, id: GroupId) -> Result<&mut Group> {
        self.get_mut(id).ok_or(GroupError::NotFound(id))
    }

    pub fn get_at(&self, index: usize) -> Option<&Group> {
        self.groups.get(index)
    }

    pub fn index_of(&self, id: GroupId) -> Option<usize> {
        self.groups.iter().position(|g| g.id() == id)
    }

    pub fn contains(&self, id: GroupId) -> bool {
        self.index_of(id).is_some()
    }

    /// Group ids in display order
    pub fn ids(&self) -> Vec<GroupId> {
        self.groups.iter().map(|g| g.id()).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Group> {
        self.groups.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Group> {
        self.groups.iter_mut()
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Groups that list `handle` as a member, in display order
    pub fn groups_containing(&self, handle: ObjectHandle) -> Vec<GroupId> {
        self.groups
            .iter()
            .filter(|g| g.contains(handle))
            .map(|g| g.id())
            .collect()
    }

    pub fn rename(&mut self, id: GroupId, name: impl Into<String>) -> Result<()> {
        let group = self.group_mut(id)?;
        group.set_name(name);
        Ok(())
    }

    /// Remove a group. Its live members are made visible and editable
    /// again; the objects themselves are not deleted.
    pub fn remove<H: ObjectHost + ?Sized>(&mut self, id: GroupId, host: &mut H) -> Result<Group> {
        let index = self.index_of(id).ok_or(GroupError::NotFound(id))?;
        Ok(self.remove_index(index, host))
    }

    /// Remove several groups by id.
    ///
    /// Every id is checked before anything is removed, so an unknown id
    /// leaves the store untouched. Repeated ids count once. Removed groups
    /// are returned in the order they appeared in the store.
    pub fn remove_many<H: ObjectHost + ?Sized>(
        &mut self,
        ids: &[GroupId],
        host: &mut H,
    ) -> Result<Vec<Group>> {
        if let Some(missing) = ids.iter().find(|id| !self.contains(**id)) {
            return Err(GroupError::NotFound(*missing));
        }

        let wanted: BTreeSet<GroupId> = ids.iter().copied().collect();
        let targets: Vec<GroupId> = self
            .groups
            .iter()
            .map(|g| g.id())
            .filter(|id| wanted.contains(id))
            .collect();

        let mut removed = Vec::with_capacity(targets.len());
        for id in targets {
            // Re-resolve each time; earlier removals shift positions.
            if let Some(index) = self.index_of(id) {
                removed.push(self.remove_index(index, host));
            }
        }
        Ok(removed)
    }

    /// Remove groups by position. Positions are resolved to ids before
    /// anything is removed; out-of-range positions are ignored.
    pub fn remove_at_indices<H: ObjectHost + ?Sized>(
        &mut self,
        indices: &[usize],
        host: &mut H,
    ) -> Vec<Group> {
        let ids: Vec<GroupId> = indices
            .iter()
            .filter_map(|i| self.groups.get(*i).map(|g| g.id()))
            .collect();

        // All ids were just read from the store, so this cannot miss.
        self.remove_many(&ids, host).unwrap_or_default()
    }

    /// Remove every group, releasing all members
    pub fn clear_all<H: ObjectHost + ?Sized>(&mut self, host: &mut H) -> usize {
        let count = self.groups.len();
        while !self.groups.is_empty() {
            let last = self.groups.len() - 1;
            self.remove_index(last, host);
        }
        log::info!("cleared {} groups", count);
        count
    }

    /// Swap a group with its neighbour. Returns whether it moved; at
    /// either end of the list this is a no-op.
    pub fn reorder(&mut self, id: GroupId, direction: Direction) -> Result<bool> {
        let index = self.index_of(id).ok_or(GroupError::NotFound(id))?;

        let target = match direction {
            Direction::Up if index > 0 => index - 1,
            Direction::Down if index + 1 < self.groups.len() => index + 1,
            _ => return Ok(false),
        };

        self.groups.swap(index, target);
        log::debug!("group {} moved {:?} to index {}", id, direction, target);
        Ok(true)
    }

    pub fn move_up(&mut self, id: GroupId) -> Result<bool> {
        self.reorder(id, Direction::Up)
    }

    pub fn move_down(&mut self, id: GroupId) -> Result<bool> {
        self.reorder(id, Direction::Down)
    }

    /// Replace several groups with one holding the union of their members.
    ///
    /// The source groups are removed as by [`remove_many`](Self::remove_many),
    /// which releases their members; the merged group starts neither frozen
    /// nor hidden and is appended at the end.
    pub fn merge<H: ObjectHost + ?Sized>(
        &mut self,
        ids: &[GroupId],
        name: impl Into<String>,
        host: &mut H,
    ) -> Result<GroupId> {
        let removed = self.remove_many(ids, host)?;
        let members: Vec<ObjectHandle> = removed
            .iter()
            .flat_map(|g| g.members().iter().copied())
            .filter(|m| host.is_alive(*m))
            .collect();

        let id = self.create(name, members);
        log::info!("merged {} groups into group {}", removed.len(), id);
        Ok(id)
    }

    /// Drop dead handles from every group. Returns how many were dropped.
    pub fn clean_invalid_members<H: ObjectHost + ?Sized>(&mut self, host: &H) -> usize {
        let purged: usize = self.groups.iter_mut().map(|g| g.clean(host)).sum();
        if purged > 0 {
            log::debug!("purged {} invalid members", purged);
        }
        purged
    }

    /// Drop groups with no live members. Returns how many were dropped.
    pub fn remove_empty<H: ObjectHost + ?Sized>(&mut self, host: &H) -> usize {
        self.clean_invalid_members(host);
        let before = self.groups.len();
        self.groups.retain(|g| !g.is_empty());
        before - self.groups.len()
    }

    /// Rebuild a group from `objects`.
    ///
    /// The old members are released, dead handles in `objects` are
    /// skipped, and the group's frozen and hidden flags are reset.
    pub fn rebuild<H: ObjectHost + ?Sized>(
        &mut self,
        id: GroupId,
        objects: &[ObjectHandle],
        host: &mut H,
    ) -> Result<()> {
        let group = self.get_mut(id).ok_or(GroupError::NotFound(id))?;
        group.clean(host);
        for member in group.members() {
            host.release(*member);
        }

        group.set_members(objects.iter().copied().filter(|o| host.is_alive(*o)));
        group.set_frozen(false);
        group.set_hidden(false);
        Ok(())
    }

    fn remove_index<H: ObjectHost + ?Sized>(&mut self, index: usize, host: &mut H) -> Group {
        let mut group = self.groups.remove(index);
        group.clean(host);
        for member in group.members() {
            host.release(*member);
        }
        log::debug!("group {} '{}' removed", group.id(), group.name());
        group
    }
}
