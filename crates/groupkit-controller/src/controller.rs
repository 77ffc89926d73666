//! GroupController - group operations driven by the editor panel
//!
//! Every method is called from the host's UI thread in response to one
//! event and finishes before returning. Selection changes requested while
//! an event is being dispatched are queued and applied on the next redraw.

use crate::config::GroupsConfig;
use crate::policy::{resolve_conflicts, ConflictResolver, MembershipConflict};
use groupkit_core::{GroupError, GroupId, ObjectHandle, Result};
use groupkit_host::EditorHost;
use groupkit_store::{Direction, GroupStore};
use std::collections::BTreeSet;

/// A selection change waiting for the next redraw
#[derive(Debug, Clone, PartialEq, Eq)]
enum PendingSelection {
    /// Select the group's members as they are at redraw time
    Group(GroupId),
    Objects(Vec<ObjectHandle>),
}

/// Owns the groups of one open document together with the editor host.
///
/// Create one per document and drop it when the document closes; there is
/// no process-wide instance.
pub struct GroupController<H: EditorHost> {
    store: GroupStore,
    host: H,
    config: GroupsConfig,
    pending_selection: Option<PendingSelection>,
    highlighted: BTreeSet<GroupId>,
}

impl<H: EditorHost> GroupController<H> {
    /// Controller over an empty store with default config
    pub fn new(host: H) -> Self {
        Self::with_store(GroupStore::new(), host, GroupsConfig::default())
    }

    /// Controller over groups loaded from the document
    pub fn with_store(store: GroupStore, host: H, config: GroupsConfig) -> Self {
        let mut controller = Self {
            store,
            host,
            config,
            pending_selection: None,
            highlighted: BTreeSet::new(),
        };
        controller.on_selection_changed();
        controller
    }

    pub fn store(&self) -> &GroupStore {
        &self.store
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    pub fn config(&self) -> &GroupsConfig {
        &self.config
    }

    pub fn set_config(&mut self, config: GroupsConfig) {
        self.config = config;
    }

    /// Hand the groups and host back, e.g. when the document is saved and closed
    pub fn into_parts(self) -> (GroupStore, H) {
        (self.store, self.host)
    }

    // ---- Selection ----

    /// Groups with at least one member in `selection`
    pub fn compute_selection_overlap(&self, selection: &[ObjectHandle]) -> BTreeSet<GroupId> {
        if selection.is_empty() {
            return BTreeSet::new();
        }
        self.store
            .iter()
            .filter(|g| g.intersects(selection))
            .map(|g| g.id())
            .collect()
    }

    /// Recompute the highlighted groups from the host's current selection
    pub fn on_selection_changed(&mut self) {
        let selection = self.host.selection();
        self.highlighted = self.compute_selection_overlap(&selection);
    }

    /// Groups that intersect the selection as of the last refresh
    pub fn highlighted(&self) -> &BTreeSet<GroupId> {
        &self.highlighted
    }

    pub fn is_highlighted(&self, id: GroupId) -> bool {
        self.highlighted.contains(&id)
    }

    /// Select the group's members on the next redraw
    pub fn request_select_group(&mut self, id: GroupId) -> Result<()> {
        self.require(id)?;
        self.pending_selection = Some(PendingSelection::Group(id));
        Ok(())
    }

    /// Select a single object on the next redraw
    pub fn request_select_member(&mut self, handle: ObjectHandle) {
        self.pending_selection = Some(PendingSelection::Objects(vec![handle]));
    }

    pub fn has_pending_selection(&self) -> bool {
        self.pending_selection.is_some()
    }

    /// Per-frame housekeeping.
    ///
    /// Drops dead members, applies any queued selection change, and
    /// refreshes the highlighted groups. Returns whether a selection was
    /// applied.
    pub fn on_redraw(&mut self) -> bool {
        self.store.clean_invalid_members(&self.host);

        let applied = match self.pending_selection.take() {
            Some(pending) => {
                let objects = match pending {
                    PendingSelection::Group(id) => self.store.get(id).map(|g| g.members().to_vec()),
                    PendingSelection::Objects(objects) => Some(objects),
                };
                match objects {
                    Some(objects) => {
                        let live = self.live_unique(&objects);
                        self.host.set_selection(&live);
                        true
                    }
                    None => false,
                }
            }
            None => false,
        };

        self.on_selection_changed();
        applied
    }

    // ---- Creation and membership ----

    /// Create a group from `objects` using the configured duplicate policy.
    ///
    /// A blank name falls back to the first object's name, then to the
    /// configured default name.
    pub fn new_group(&mut self, name: &str, objects: &[ObjectHandle]) -> GroupId {
        match self.config.duplicate_policy.decision() {
            Some(decision) => {
                let mut fixed = move |_: &MembershipConflict| decision;
                self.new_group_inner(name, objects, Some(&mut fixed))
            }
            None => self.new_group_inner(name, objects, None),
        }
    }

    /// Create a group, asking `resolver` about objects already grouped elsewhere
    pub fn new_group_with<R: ConflictResolver>(
        &mut self,
        name: &str,
        objects: &[ObjectHandle],
        resolver: &mut R,
    ) -> GroupId {
        self.new_group_inner(name, objects, Some(resolver))
    }

    /// Create a group from the current selection, named after the first
    /// selected object. Does nothing when the selection is empty.
    pub fn new_group_from_selection(&mut self) -> Option<GroupId> {
        let selection = self.host.selection();
        if selection.is_empty() {
            log::debug!("new group from selection: empty selection");
            return None;
        }
        Some(self.new_group("", &selection))
    }

    /// Add objects to a group using the configured duplicate policy.
    ///
    /// Dead handles are skipped. Every accepted object immediately takes
    /// on the group's frozen and hidden state. Returns the objects that
    /// were not already members.
    pub fn add_members(&mut self, id: GroupId, objects: &[ObjectHandle]) -> Result<Vec<ObjectHandle>> {
        match self.config.duplicate_policy.decision() {
            Some(decision) => {
                let mut fixed = move |_: &MembershipConflict| decision;
                self.add_members_inner(id, objects, Some(&mut fixed))
            }
            None => self.add_members_inner(id, objects, None),
        }
    }

    /// Add objects to a group, asking `resolver` about objects already
    /// grouped elsewhere
    pub fn add_members_with<R: ConflictResolver>(
        &mut self,
        id: GroupId,
        objects: &[ObjectHandle],
        resolver: &mut R,
    ) -> Result<Vec<ObjectHandle>> {
        self.add_members_inner(id, objects, Some(resolver))
    }

    /// Add the current selection to a group
    pub fn add_selection(&mut self, id: GroupId) -> Result<Vec<ObjectHandle>> {
        let selection = self.host.selection();
        self.add_members(id, &selection)
    }

    /// Remove objects from a group. Their visibility and lock state are
    /// left as they are.
    pub fn remove_members(&mut self, id: GroupId, objects: &[ObjectHandle]) -> Result<usize> {
        self.require(id)?;
        if objects.is_empty() {
            return Ok(0);
        }

        self.checkpoint("Remove from Group");
        let removed = self.store.group_mut(id)?.remove_members(objects);
        self.on_selection_changed();
        Ok(removed)
    }

    /// Replace a group's members, releasing the old ones and resetting
    /// its frozen and hidden state
    pub fn rebuild(&mut self, id: GroupId, objects: &[ObjectHandle]) -> Result<()> {
        self.require(id)?;
        self.checkpoint("Rebuild Group");
        self.store.rebuild(id, objects, &mut self.host)?;
        self.on_selection_changed();
        Ok(())
    }

    /// [`rebuild`](Self::rebuild) from the current selection. Returns
    /// `false` without touching the group when nothing is selected.
    pub fn rebuild_from_selection(&mut self, id: GroupId) -> Result<bool> {
        self.require(id)?;
        let selection = self.host.selection();
        if selection.is_empty() {
            return Ok(false);
        }
        self.rebuild(id, &selection)?;
        Ok(true)
    }

    // ---- Frozen / hidden ----

    /// Flip the frozen flag and lock or unlock every live member.
    /// Returns the new state.
    pub fn toggle_frozen(&mut self, id: GroupId) -> Result<bool> {
        self.require(id)?;
        self.checkpoint("Toggle Freeze");

        let group = self.store.group_mut(id)?;
        group.clean(&self.host);
        let frozen = !group.frozen();
        group.set_frozen(frozen);
        let members = group.members().to_vec();

        for member in members {
            self.host.set_locked(member, frozen);
        }
        log::debug!("group {} frozen = {}", id, frozen);
        Ok(frozen)
    }

    /// Show the group if hidden, hide it otherwise. Returns the new hidden state.
    pub fn toggle_hidden(&mut self, id: GroupId) -> Result<bool> {
        let hidden = self.store.get(id).ok_or(GroupError::NotFound(id))?.hidden();
        if hidden {
            self.show(id)?;
        } else {
            self.hide(id)?;
        }
        Ok(!hidden)
    }

    pub fn show(&mut self, id: GroupId) -> Result<()> {
        self.require(id)?;
        self.checkpoint("Show Group");
        self.apply_hidden(id, false)
    }

    /// Deactivate every live member. The frozen state is not involved.
    pub fn hide(&mut self, id: GroupId) -> Result<()> {
        self.require(id)?;
        self.checkpoint("Hide Group");
        self.apply_hidden(id, true)
    }

    /// Hide every other group and show this one. Frozen states and
    /// ungrouped objects are untouched.
    pub fn isolate(&mut self, id: GroupId) -> Result<()> {
        self.require(id)?;
        self.checkpoint("Isolate Group");

        for other in self.store.ids() {
            if other != id {
                self.apply_hidden(other, true)?;
            }
        }
        self.apply_hidden(id, false)
    }

    // ---- Group list ----

    pub fn rename(&mut self, id: GroupId, name: &str) -> Result<()> {
        self.require(id)?;
        self.checkpoint("Rename Group");
        self.store.rename(id, name)
    }

    /// Swap with the neighbouring group. Returns whether it moved.
    pub fn reorder(&mut self, id: GroupId, direction: Direction) -> Result<bool> {
        let index = self.store.index_of(id).ok_or(GroupError::NotFound(id))?;
        let movable = match direction {
            Direction::Up => index > 0,
            Direction::Down => index + 1 < self.store.len(),
        };
        if !movable {
            return Ok(false);
        }

        self.checkpoint("Move Group");
        self.store.reorder(id, direction)
    }

    pub fn move_up(&mut self, id: GroupId) -> Result<bool> {
        self.reorder(id, Direction::Up)
    }

    pub fn move_down(&mut self, id: GroupId) -> Result<bool> {
        self.reorder(id, Direction::Down)
    }

    /// Remove a group, making its members visible and editable again
    pub fn remove_group(&mut self, id: GroupId) -> Result<()> {
        self.require(id)?;
        self.checkpoint("Remove Group");
        self.store.remove(id, &mut self.host)?;
        self.on_selection_changed();
        Ok(())
    }

    /// Remove several groups. Fails without removing anything if any id
    /// is unknown.
    pub fn remove_groups(&mut self, ids: &[GroupId]) -> Result<usize> {
        for id in ids {
            self.require(*id)?;
        }
        if ids.is_empty() {
            return Ok(0);
        }

        self.checkpoint("Remove Groups");
        let removed = self.store.remove_many(ids, &mut self.host)?;
        self.on_selection_changed();
        Ok(removed.len())
    }

    /// Remove groups by display position
    pub fn remove_at_indices(&mut self, indices: &[usize]) -> usize {
        if indices.iter().all(|i| *i >= self.store.len()) {
            return 0;
        }

        self.checkpoint("Remove Groups");
        let removed = self.store.remove_at_indices(indices, &mut self.host);
        self.on_selection_changed();
        removed.len()
    }

    /// Remove every group in the document
    pub fn clear_all(&mut self) -> usize {
        if self.store.is_empty() {
            return 0;
        }

        self.checkpoint("Clear All Groups");
        let count = self.store.clear_all(&mut self.host);
        self.on_selection_changed();
        count
    }

    /// Merge groups into a new one holding all their members.
    ///
    /// Without a name (or with a blank one) the source names are joined
    /// with the configured separator, in display order, falling back to
    /// the default group name when that is blank too. Merging no groups
    /// does nothing and returns `None`.
    pub fn merge(&mut self, ids: &[GroupId], name: Option<&str>) -> Result<Option<GroupId>> {
        if ids.is_empty() {
            return Ok(None);
        }
        for id in ids {
            self.require(*id)?;
        }

        let name = match name.map(str::trim).filter(|n| !n.is_empty()) {
            Some(name) => name.to_string(),
            None => {
                let joined = self
                    .store
                    .iter()
                    .filter(|g| ids.contains(&g.id()))
                    .map(|g| g.name().trim())
                    .filter(|n| !n.is_empty())
                    .collect::<Vec<_>>()
                    .join(self.config.merge_separator.as_str());
                if joined.is_empty() {
                    self.config.default_group_name.clone()
                } else {
                    joined
                }
            }
        };

        self.checkpoint("Merge Groups");
        let merged = self.store.merge(ids, name, &mut self.host)?;
        self.on_selection_changed();
        Ok(Some(merged))
    }

    /// Merge every group that intersects the current selection. Returns
    /// `None` when no group does.
    pub fn merge_overlapping(&mut self) -> Result<Option<GroupId>> {
        let selection = self.host.selection();
        let overlap = self.compute_selection_overlap(&selection);
        if overlap.is_empty() {
            return Ok(None);
        }

        let ids: Vec<GroupId> = self
            .store
            .ids()
            .into_iter()
            .filter(|id| overlap.contains(id))
            .collect();
        self.merge(&ids, None)
    }

    /// Drop dead handles from every group
    pub fn clean_invalid_members(&mut self) -> usize {
        self.store.clean_invalid_members(&self.host)
    }

    /// Drop groups whose members are all gone
    pub fn remove_empty_groups(&mut self) -> usize {
        self.store.clean_invalid_members(&self.host);
        if !self.store.iter().any(|g| g.is_empty()) {
            return 0;
        }

        self.checkpoint("Remove Empty Groups");
        let removed = self.store.remove_empty(&self.host);
        self.on_selection_changed();
        removed
    }

    // ---- Display ----

    /// Names of the group's live members, in member order
    pub fn member_names(&self, id: GroupId) -> Result<Vec<String>> {
        let group = self.store.get(id).ok_or(GroupError::NotFound(id))?;
        Ok(group
            .members()
            .iter()
            .filter_map(|m| self.host.object_name(*m))
            .collect())
    }

    /// One member name per line
    pub fn tooltip(&self, id: GroupId) -> Result<String> {
        Ok(self.member_names(id)?.join("\n"))
    }

    // ---- Internals ----

    fn require(&self, id: GroupId) -> Result<()> {
        if self.store.contains(id) {
            Ok(())
        } else {
            Err(GroupError::NotFound(id))
        }
    }

    fn checkpoint(&mut self, label: &str) {
        if self.config.record_undo {
            self.host.record_checkpoint(label);
        }
    }

    /// Live handles from `objects`, first occurrence only
    fn live_unique(&self, objects: &[ObjectHandle]) -> Vec<ObjectHandle> {
        let mut seen = BTreeSet::new();
        objects
            .iter()
            .copied()
            .filter(|o| self.host.is_alive(*o) && seen.insert(*o))
            .collect()
    }

    fn apply_hidden(&mut self, id: GroupId, hidden: bool) -> Result<()> {
        let group = self.store.group_mut(id)?;
        group.clean(&self.host);
        group.set_hidden(hidden);
        let members = group.members().to_vec();

        for member in members {
            self.host.set_active(member, !hidden);
        }
        log::debug!("group {} hidden = {}", id, hidden);
        Ok(())
    }

    fn new_group_inner(
        &mut self,
        name: &str,
        objects: &[ObjectHandle],
        resolver: Option<&mut dyn ConflictResolver>,
    ) -> GroupId {
        self.checkpoint("New Group");

        let live = self.live_unique(objects);
        let name = if name.trim().is_empty() {
            live.first()
                .and_then(|o| self.host.object_name(*o))
                .unwrap_or_else(|| self.config.default_group_name.clone())
        } else {
            name.to_string()
        };

        let accepted = match resolver {
            Some(resolver) => resolve_conflicts(&mut self.store, &live, None, resolver),
            None => live,
        };

        let id = self.store.create(name, accepted);
        self.on_selection_changed();
        id
    }

    fn add_members_inner(
        &mut self,
        id: GroupId,
        objects: &[ObjectHandle],
        resolver: Option<&mut dyn ConflictResolver>,
    ) -> Result<Vec<ObjectHandle>> {
        self.require(id)?;

        let live = self.live_unique(objects);
        if live.is_empty() {
            log::debug!("nothing to add to group {}", id);
            return Ok(Vec::new());
        }

        self.checkpoint("Add objects to group");
        let accepted = match resolver {
            Some(resolver) => resolve_conflicts(&mut self.store, &live, Some(id), resolver),
            None => live,
        };

        let group = self.store.group_mut(id)?;
        let added = group.add_members(accepted.iter().copied());
        let (frozen, hidden) = (group.frozen(), group.hidden());

        for object in &accepted {
            self.host.set_locked(*object, frozen);
            self.host.set_active(*object, !hidden);
        }

        self.on_selection_changed();
        Ok(added)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::policy::{ConflictDecision, DuplicatePolicy};
    use groupkit_host::{ObjectHost, SceneHost, SelectionHost};
    use proptest::prelude::*;

    fn init_logging() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    fn setup(names: &[&str]) -> (GroupController<SceneHost>, Vec<ObjectHandle>) {
        init_logging();
        let mut host = SceneHost::new();
        let objs = host.spawn_all(names.iter().copied());
        (GroupController::new(host), objs)
    }

    fn flags(ctl: &GroupController<SceneHost>, obj: ObjectHandle) -> (bool, bool) {
        let host = ctl.host();
        (host.is_active(obj).unwrap(), host.is_locked(obj).unwrap())
    }

    #[test]
    fn test_remove_first_group_clears_flags() {
        let (mut ctl, objs) = setup(&["1", "2", "3"]);
        let a = ctl.new_group("A", &[objs[0], objs[1]]);
        let b = ctl.new_group("B", &[objs[2]]);
        ctl.toggle_frozen(a).unwrap();
        ctl.hide(a).unwrap();
        assert_eq!(flags(&ctl, objs[0]), (false, true));

        assert_eq!(ctl.remove_at_indices(&[0]), 1);

        assert_eq!(ctl.store().ids(), vec![b]);
        assert_eq!(ctl.store().get(b).unwrap().members(), &[objs[2]]);
        assert_eq!(flags(&ctl, objs[0]), (true, false));
        assert_eq!(flags(&ctl, objs[1]), (true, false));
    }

    #[test]
    fn test_add_shared_member_by_default() {
        let (mut ctl, objs) = setup(&["1", "2", "3"]);
        let a = ctl.new_group("A", &[objs[0], objs[1]]);
        let b = ctl.new_group("B", &[objs[2]]);

        let added = ctl.add_members(a, &[objs[2]]).unwrap();

        assert_eq!(added, vec![objs[2]]);
        assert_eq!(ctl.store().get(a).unwrap().members(), &[objs[0], objs[1], objs[2]]);
        assert_eq!(ctl.store().get(b).unwrap().members(), &[objs[2]]);
    }

    #[test]
    fn test_add_applies_group_state() {
        let (mut ctl, objs) = setup(&["1", "2"]);
        let a = ctl.new_group("A", &[objs[0]]);
        ctl.toggle_frozen(a).unwrap();
        ctl.hide(a).unwrap();

        ctl.add_members(a, &[objs[1]]).unwrap();

        assert_eq!(flags(&ctl, objs[1]), (false, true));
    }

    #[test]
    fn test_add_to_plain_group_shows_and_unlocks() {
        let (mut ctl, objs) = setup(&["1"]);
        let a = ctl.new_group("A", &[]);
        ctl.host_mut().set_active(objs[0], false);
        ctl.host_mut().set_locked(objs[0], true);

        ctl.add_members(a, &[objs[0]]).unwrap();

        assert_eq!(flags(&ctl, objs[0]), (true, false));
    }

    #[test]
    fn test_remove_members_keeps_object_state() {
        let (mut ctl, objs) = setup(&["1", "2"]);
        let a = ctl.new_group("A", &objs);
        ctl.toggle_frozen(a).unwrap();
        ctl.hide(a).unwrap();

        assert_eq!(ctl.remove_members(a, &[objs[0]]).unwrap(), 1);

        assert_eq!(ctl.store().get(a).unwrap().members(), &[objs[1]]);
        assert_eq!(flags(&ctl, objs[0]), (false, true));
    }

    #[test]
    fn test_add_skips_dead_handles() {
        let (mut ctl, objs) = setup(&["1", "2"]);
        let a = ctl.new_group("A", &[]);
        ctl.host_mut().world.despawn(objs[1]).unwrap();

        let added = ctl.add_members(a, &[objs[0], objs[1], objs[0]]).unwrap();

        assert_eq!(added, vec![objs[0]]);
    }

    #[test]
    fn test_add_empty_is_noop() {
        let (mut ctl, _) = setup(&[]);
        let a = ctl.new_group("A", &[]);
        let checkpoints = ctl.host().undo.len();

        assert!(ctl.add_members(a, &[]).unwrap().is_empty());
        assert_eq!(ctl.host().undo.len(), checkpoints);
    }

    #[test]
    fn test_unknown_group() {
        let (mut ctl, objs) = setup(&["1"]);
        let missing = GroupId::from_raw(u64::MAX);

        assert!(matches!(ctl.toggle_frozen(missing), Err(GroupError::NotFound(_))));
        assert!(matches!(ctl.add_members(missing, &objs), Err(GroupError::NotFound(_))));
        assert!(matches!(ctl.isolate(missing), Err(GroupError::NotFound(_))));
        assert!(matches!(ctl.remove_group(missing), Err(GroupError::NotFound(_))));
        assert!(ctl.host().undo.is_empty());
    }

    #[test]
    fn test_move_policy_from_config() {
        let (mut ctl, objs) = setup(&["1", "2"]);
        ctl.set_config(GroupsConfig {
            duplicate_policy: DuplicatePolicy::Move,
            ..GroupsConfig::default()
        });
        let a = ctl.new_group("A", &objs);
        let b = ctl.new_group("B", &[]);

        ctl.add_members(b, &[objs[1]]).unwrap();

        assert_eq!(ctl.store().get(a).unwrap().members(), &[objs[0]]);
        assert_eq!(ctl.store().get(b).unwrap().members(), &[objs[1]]);
    }

    #[test]
    fn test_keep_policy_on_new_group() {
        let (mut ctl, objs) = setup(&["1", "2"]);
        ctl.set_config(GroupsConfig {
            duplicate_policy: DuplicatePolicy::Keep,
            ..GroupsConfig::default()
        });
        ctl.new_group("A", &[objs[0]]);

        let b = ctl.new_group("B", &objs);

        assert_eq!(ctl.store().get(b).unwrap().members(), &[objs[1]]);
    }

    #[test]
    fn test_resolver_callback() {
        let (mut ctl, objs) = setup(&["1", "2", "3"]);
        let a = ctl.new_group("A", &objs);
        let b = ctl.new_group("B", &[]);

        let mut answers = vec![ConflictDecision::Skip, ConflictDecision::Move].into_iter();
        let mut resolver = |_: &MembershipConflict| answers.next().unwrap_or(ConflictDecision::Skip);
        let added = ctl.add_members_with(b, &[objs[0], objs[1]], &mut resolver).unwrap();

        assert_eq!(added, vec![objs[1]]);
        assert_eq!(ctl.store().get(a).unwrap().members(), &[objs[0], objs[2]]);
    }

    #[test]
    fn test_toggle_frozen_twice_restores() {
        let (mut ctl, objs) = setup(&["1", "2"]);
        ctl.host_mut().set_active(objs[1], false);
        let a = ctl.new_group("A", &objs);
        let before: Vec<_> = objs.iter().map(|o| flags(&ctl, *o)).collect();

        assert!(ctl.toggle_frozen(a).unwrap());
        assert_eq!(flags(&ctl, objs[0]), (true, true));
        assert!(!ctl.toggle_frozen(a).unwrap());

        let after: Vec<_> = objs.iter().map(|o| flags(&ctl, *o)).collect();
        assert_eq!(before, after);
        assert!(!ctl.store().get(a).unwrap().frozen());
    }

    #[test]
    fn test_hide_and_freeze_are_independent() {
        let (mut ctl, objs) = setup(&["1"]);
        let a = ctl.new_group("A", &objs);

        ctl.toggle_frozen(a).unwrap();
        assert!(ctl.toggle_hidden(a).unwrap());
        assert_eq!(flags(&ctl, objs[0]), (false, true));

        assert!(!ctl.toggle_hidden(a).unwrap());
        assert_eq!(flags(&ctl, objs[0]), (true, true));
        assert!(ctl.store().get(a).unwrap().frozen());
    }

    #[test]
    fn test_hide_is_idempotent() {
        let (mut ctl, objs) = setup(&["1"]);
        let a = ctl.new_group("A", &objs);

        ctl.hide(a).unwrap();
        ctl.hide(a).unwrap();

        assert!(ctl.store().get(a).unwrap().hidden());
        assert_eq!(flags(&ctl, objs[0]), (false, false));
    }

    #[test]
    fn test_isolate() {
        let (mut ctl, objs) = setup(&["1", "2", "3", "loose"]);
        let a = ctl.new_group("A", &[objs[0]]);
        let b = ctl.new_group("B", &[objs[1]]);
        let c = ctl.new_group("C", &[objs[2]]);
        ctl.hide(a).unwrap();
        ctl.toggle_frozen(c).unwrap();
        ctl.host_mut().set_active(objs[3], false);

        ctl.isolate(a).unwrap();

        assert!(!ctl.store().get(a).unwrap().hidden());
        assert!(ctl.store().get(b).unwrap().hidden());
        assert!(ctl.store().get(c).unwrap().hidden());
        assert!(ctl.store().get(c).unwrap().frozen());
        assert_eq!(flags(&ctl, objs[0]), (true, false));
        assert_eq!(flags(&ctl, objs[1]), (false, false));
        assert_eq!(flags(&ctl, objs[2]), (false, true));
        // ungrouped objects keep their state
        assert_eq!(flags(&ctl, objs[3]), (false, false));
    }

    #[test]
    fn test_isolate_keeps_shared_member_visible() {
        let (mut ctl, objs) = setup(&["shared", "other"]);
        let a = ctl.new_group("A", &[objs[0]]);
        let b = ctl.new_group("B", &[objs[0], objs[1]]);

        ctl.isolate(a).unwrap();

        assert!(!ctl.store().get(a).unwrap().hidden());
        assert!(ctl.store().get(b).unwrap().hidden());
        assert_eq!(flags(&ctl, objs[0]), (true, false));
        assert_eq!(flags(&ctl, objs[1]), (false, false));
    }

    #[test]
    fn test_selection_overlap() {
        let (mut ctl, objs) = setup(&["1", "2", "3"]);
        let a = ctl.new_group("A", &[objs[0], objs[1]]);
        let b = ctl.new_group("B", &[objs[2]]);
        let c = ctl.new_group("C", &[objs[1]]);

        let overlap = ctl.compute_selection_overlap(&[objs[1]]);
        assert_eq!(overlap, [a, c].into_iter().collect::<BTreeSet<_>>());
        assert!(ctl.compute_selection_overlap(&[]).is_empty());

        ctl.host_mut().select(&[objs[2]]);
        ctl.on_selection_changed();
        assert!(ctl.is_highlighted(b));
        assert!(!ctl.is_highlighted(a));
    }

    #[test]
    fn test_new_group_naming() {
        let (mut ctl, objs) = setup(&["Barrel", "Crate"]);

        let named = ctl.new_group("Props", &objs);
        let from_object = ctl.new_group("  ", &[objs[1], objs[0]]);
        let fallback = ctl.new_group("", &[]);

        assert_eq!(ctl.store().get(named).unwrap().name(), "Props");
        assert_eq!(ctl.store().get(from_object).unwrap().name(), "Crate");
        assert_eq!(ctl.store().get(fallback).unwrap().name(), "New Group");
    }

    #[test]
    fn test_new_group_from_selection() {
        let (mut ctl, objs) = setup(&["Lamp", "Desk"]);

        assert_eq!(ctl.new_group_from_selection(), None);
        assert!(ctl.store().is_empty());

        ctl.host_mut().select(&objs);
        let id = ctl.new_group_from_selection().unwrap();

        let group = ctl.store().get(id).unwrap();
        assert_eq!(group.name(), "Lamp");
        assert_eq!(group.members(), objs.as_slice());
        assert!(ctl.is_highlighted(id));
    }

    #[test]
    fn test_merge_overlapping() {
        let (mut ctl, objs) = setup(&["1", "2", "3", "4"]);
        let a = ctl.new_group("A", &[objs[0], objs[1]]);
        let keep = ctl.new_group("Keep", &[objs[3]]);
        let b = ctl.new_group("B", &[objs[1], objs[2]]);
        ctl.hide(b).unwrap();

        ctl.host_mut().select(&[objs[0], objs[2]]);
        let merged = ctl.merge_overlapping().unwrap().unwrap();

        assert_eq!(ctl.store().ids(), vec![keep, merged]);
        let group = ctl.store().get(merged).unwrap();
        assert_eq!(group.name(), "A+B");
        assert_eq!(group.members(), &[objs[0], objs[1], objs[2]]);
        assert!(!group.hidden());
        assert_eq!(flags(&ctl, objs[2]), (true, false));
        assert!(ctl.store().get(a).is_none());
    }

    #[test]
    fn test_merge_overlapping_without_selection() {
        let (mut ctl, objs) = setup(&["1"]);
        ctl.new_group("A", &objs);

        assert_eq!(ctl.merge_overlapping().unwrap(), None);
        assert_eq!(ctl.store().len(), 1);
    }

    #[test]
    fn test_merge_with_name() {
        let (mut ctl, objs) = setup(&["1", "2"]);
        let a = ctl.new_group("A", &[objs[0]]);
        let b = ctl.new_group("B", &[objs[1]]);

        let c = ctl.merge(&[a, b], Some("C")).unwrap().unwrap();

        assert_eq!(ctl.store().ids(), vec![c]);
        assert_eq!(ctl.store().get(c).unwrap().name(), "C");
        assert_eq!(ctl.store().get(c).unwrap().len(), 2);
    }

    #[test]
    fn test_merge_nothing_is_noop() {
        let (mut ctl, objs) = setup(&["1"]);
        let a = ctl.new_group("A", &objs);
        let checkpoints = ctl.host().undo.len();

        assert_eq!(ctl.merge(&[], None).unwrap(), None);
        assert_eq!(ctl.merge(&[], Some("Named")).unwrap(), None);

        assert_eq!(ctl.store().ids(), vec![a]);
        assert_eq!(ctl.host().undo.len(), checkpoints);
    }

    #[test]
    fn test_merge_blank_names_use_default() {
        let (mut ctl, objs) = setup(&["1", "2", "3"]);
        let a = ctl.new_group("A", &[objs[0]]);
        let b = ctl.new_group("B", &[objs[1]]);
        let c = ctl.new_group("C", &[objs[2]]);
        ctl.rename(a, "").unwrap();
        ctl.rename(b, "  ").unwrap();

        let merged = ctl.merge(&[a, b], None).unwrap().unwrap();
        assert_eq!(ctl.store().get(merged).unwrap().name(), "New Group");

        // blank names are skipped when others remain
        let both = ctl.merge(&[merged, c], Some(" ")).unwrap().unwrap();
        assert_eq!(ctl.store().get(both).unwrap().name(), "C+New Group");
    }

    #[test]
    fn test_deferred_group_selection() {
        let (mut ctl, objs) = setup(&["1", "2", "3"]);
        let a = ctl.new_group("A", &[objs[0], objs[1]]);

        ctl.request_select_group(a).unwrap();
        assert!(ctl.has_pending_selection());
        assert!(ctl.host().selection().is_empty());

        // membership changes before the redraw are picked up
        ctl.add_members(a, &[objs[2]]).unwrap();
        ctl.host_mut().world.despawn(objs[0]).unwrap();

        assert!(ctl.on_redraw());
        assert!(!ctl.has_pending_selection());
        assert_eq!(ctl.host().selection(), vec![objs[1], objs[2]]);
        assert_eq!(ctl.store().get(a).unwrap().members(), &[objs[1], objs[2]]);
        assert!(ctl.is_highlighted(a));

        assert!(!ctl.on_redraw());
    }

    #[test]
    fn test_deferred_member_selection_of_removed_group() {
        let (mut ctl, objs) = setup(&["1", "2"]);
        let a = ctl.new_group("A", &objs);

        ctl.request_select_group(a).unwrap();
        ctl.remove_group(a).unwrap();
        assert!(!ctl.on_redraw());

        ctl.request_select_member(objs[1]);
        assert!(ctl.on_redraw());
        assert_eq!(ctl.host().selection(), vec![objs[1]]);
    }

    #[test]
    fn test_reorder_records_only_real_moves() {
        let (mut ctl, _) = setup(&[]);
        let a = ctl.new_group("A", &[]);
        let b = ctl.new_group("B", &[]);
        let checkpoints = ctl.host().undo.len();

        assert!(!ctl.move_up(a).unwrap());
        assert!(!ctl.move_down(b).unwrap());
        assert_eq!(ctl.host().undo.len(), checkpoints);

        assert!(ctl.move_up(b).unwrap());
        assert_eq!(ctl.store().ids(), vec![b, a]);
        assert_eq!(ctl.host().undo.last_label(), Some("Move Group"));
    }

    #[test]
    fn test_undo_checkpoints() {
        let (mut ctl, objs) = setup(&["1"]);
        let a = ctl.new_group("A", &objs);
        ctl.rename(a, "Renamed").unwrap();
        ctl.toggle_frozen(a).unwrap();
        ctl.remove_group(a).unwrap();

        let labels: Vec<_> = ctl
            .host()
            .undo
            .checkpoints()
            .iter()
            .map(|c| c.label.clone())
            .collect();
        assert_eq!(labels, vec!["New Group", "Rename Group", "Toggle Freeze", "Remove Group"]);
    }

    #[test]
    fn test_undo_disabled() {
        let (mut ctl, objs) = setup(&["1"]);
        ctl.set_config(GroupsConfig {
            record_undo: false,
            ..GroupsConfig::default()
        });

        let a = ctl.new_group("A", &objs);
        ctl.hide(a).unwrap();

        assert!(ctl.host().undo.is_empty());
    }

    #[test]
    fn test_rebuild_from_selection() {
        let (mut ctl, objs) = setup(&["1", "2"]);
        let a = ctl.new_group("A", &[objs[0]]);
        ctl.hide(a).unwrap();

        assert!(!ctl.rebuild_from_selection(a).unwrap());
        assert_eq!(ctl.store().get(a).unwrap().members(), &[objs[0]]);

        ctl.host_mut().select(&[objs[1]]);
        assert!(ctl.rebuild_from_selection(a).unwrap());

        let group = ctl.store().get(a).unwrap();
        assert_eq!(group.members(), &[objs[1]]);
        assert!(!group.hidden());
        assert_eq!(flags(&ctl, objs[0]), (true, false));
    }

    #[test]
    fn test_remove_empty_and_clear_all() {
        let (mut ctl, objs) = setup(&["1", "2"]);
        ctl.new_group("A", &[objs[0]]);
        let b = ctl.new_group("B", &[objs[1]]);
        ctl.hide(b).unwrap();
        ctl.host_mut().world.despawn(objs[0]).unwrap();

        assert_eq!(ctl.remove_empty_groups(), 1);
        assert_eq!(ctl.store().ids(), vec![b]);
        assert_eq!(ctl.remove_empty_groups(), 0);

        assert_eq!(ctl.clear_all(), 1);
        assert!(ctl.store().is_empty());
        assert_eq!(flags(&ctl, objs[1]), (true, false));
        assert_eq!(ctl.clear_all(), 0);
    }

    #[test]
    fn test_remove_groups_atomic() {
        let (mut ctl, _) = setup(&[]);
        let a = ctl.new_group("A", &[]);
        let b = ctl.new_group("B", &[]);

        assert!(ctl.remove_groups(&[a, GroupId::from_raw(u64::MAX)]).is_err());
        assert_eq!(ctl.store().len(), 2);

        assert_eq!(ctl.remove_groups(&[b, a]).unwrap(), 2);
        assert!(ctl.store().is_empty());
    }

    #[test]
    fn test_tooltip_lists_live_members() {
        let (mut ctl, objs) = setup(&["Chair", "Table", "Rug"]);
        let a = ctl.new_group("Furniture", &objs);
        ctl.host_mut().world.despawn(objs[2]).unwrap();

        assert_eq!(ctl.tooltip(a).unwrap(), "Chair\nTable");
    }

    #[test]
    fn test_into_parts() {
        let (mut ctl, objs) = setup(&["1"]);
        let a = ctl.new_group("A", &objs);

        let (store, host) = ctl.into_parts();
        assert!(store.contains(a));
        assert!(host.is_alive(objs[0]));
    }

    proptest! {
        #[test]
        fn prop_add_then_remove_restores_members(
            initial in proptest::collection::vec(0usize..6, 0..6),
            extra in proptest::collection::vec(6usize..12, 0..6),
        ) {
            let mut host = SceneHost::new();
            let objs: Vec<_> = (0..12).map(|i| host.world.spawn(format!("o{}", i))).collect();
            let mut ctl = GroupController::new(host);

            let initial: Vec<_> = initial.iter().map(|i| objs[*i]).collect();
            let extra: Vec<_> = extra.iter().map(|i| objs[*i]).collect();
            let a = ctl.new_group("A", &initial);
            let before = ctl.store().get(a).unwrap().members().to_vec();

            ctl.add_members(a, &extra).unwrap();
            ctl.remove_members(a, &extra).unwrap();

            prop_assert_eq!(ctl.store().get(a).unwrap().members(), before.as_slice());
        }

        #[test]
        fn prop_toggle_frozen_twice_is_identity(active in proptest::collection::vec(any::<bool>(), 1..8)) {
            let mut host = SceneHost::new();
            let objs: Vec<_> = (0..active.len()).map(|i| host.world.spawn(format!("o{}", i))).collect();
            for (obj, on) in objs.iter().zip(&active) {
                host.set_active(*obj, *on);
            }
            let mut ctl = GroupController::new(host);
            let a = ctl.new_group("A", &objs);
            let before: Vec<_> = objs.iter().map(|o| flags(&ctl, *o)).collect();

            ctl.toggle_frozen(a).unwrap();
            ctl.toggle_frozen(a).unwrap();

            let after: Vec<_> = objs.iter().map(|o| flags(&ctl, *o)).collect();
            prop_assert!(!ctl.store().get(a).unwrap().frozen());
            prop_assert_eq!(before, after);
        }
    }
}
