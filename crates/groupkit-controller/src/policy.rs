//! Duplicate-membership handling
//!
//! An object being added to a group may already belong to another one.
//! By default that is allowed and the object ends up in both. Stricter
//! handling asks a [`ConflictResolver`] what to do with each conflict.

use groupkit_core::{GroupError, GroupId, ObjectHandle};
use groupkit_store::GroupStore;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Configured behaviour for objects that already belong to another group
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DuplicatePolicy {
    /// Objects may belong to any number of groups
    #[default]
    Shared,
    /// Objects leave their previous groups and join the new one
    Move,
    /// Objects already grouped elsewhere are not added
    Keep,
}

impl DuplicatePolicy {
    /// The fixed decision this policy stands for, `None` when conflicts
    /// are not checked at all
    pub fn decision(self) -> Option<ConflictDecision> {
        match self {
            DuplicatePolicy::Shared => None,
            DuplicatePolicy::Move => Some(ConflictDecision::MoveAll),
            DuplicatePolicy::Keep => Some(ConflictDecision::Skip),
        }
    }
}

impl FromStr for DuplicatePolicy {
    type Err = GroupError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "shared" => Ok(DuplicatePolicy::Shared),
            "move" => Ok(DuplicatePolicy::Move),
            "keep" => Ok(DuplicatePolicy::Keep),
            other => Err(GroupError::Config(format!(
                "unknown duplicate policy '{}', expected shared, move or keep",
                other
            ))),
        }
    }
}

impl fmt::Display for DuplicatePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DuplicatePolicy::Shared => "shared",
            DuplicatePolicy::Move => "move",
            DuplicatePolicy::Keep => "keep",
        };
        f.write_str(name)
    }
}

/// An object that is being added but already belongs to another group
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MembershipConflict {
    pub object: ObjectHandle,
    /// The group the object is already in
    pub existing: GroupId,
    pub existing_name: String,
    /// The group being added to, `None` while a new group is being created
    pub target: Option<GroupId>,
}

/// Answer to a [`MembershipConflict`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConflictDecision {
    /// Take the object out of the existing group, then add it
    Move,
    /// Leave the object where it is and do not add it
    Skip,
    /// `Move` this object and every remaining conflict in the same call
    /// without asking again
    MoveAll,
}

/// Decides each membership conflict. Closures work as resolvers.
pub trait ConflictResolver {
    fn resolve(&mut self, conflict: &MembershipConflict) -> ConflictDecision;
}

impl<F> ConflictResolver for F
where
    F: FnMut(&MembershipConflict) -> ConflictDecision,
{
    fn resolve(&mut self, conflict: &MembershipConflict) -> ConflictDecision {
        self(conflict)
    }
}

/// Check `objects` against every group except `target` and apply the
/// resolver's decisions to the store.
///
/// Returns the objects that should still be added. Groups are visited in
/// display order; an object found in several groups is asked about once
/// per group unless a `MoveAll` answer is already in effect.
pub(crate) fn resolve_conflicts<R: ConflictResolver + ?Sized>(
    store: &mut GroupStore,
    objects: &[ObjectHandle],
    target: Option<GroupId>,
    resolver: &mut R,
) -> Vec<ObjectHandle> {
    let mut accepted: Vec<ObjectHandle> = objects.to_vec();
    let mut move_all = false;

    for group in store.iter_mut() {
        if Some(group.id()) == target {
            continue;
        }

        let duplicates: Vec<ObjectHandle> = accepted
            .iter()
            .copied()
            .filter(|o| group.contains(*o))
            .collect();

        for object in duplicates {
            let decision = if move_all {
                ConflictDecision::MoveAll
            } else {
                resolver.resolve(&MembershipConflict {
                    object,
                    existing: group.id(),
                    existing_name: group.name().to_string(),
                    target,
                })
            };

            match decision {
                ConflictDecision::Move => {
                    group.remove_member(object);
                }
                ConflictDecision::MoveAll => {
                    move_all = true;
                    group.remove_member(object);
                }
                ConflictDecision::Skip => {
                    accepted.retain(|o| *o != object);
                }
            }
            log::debug!("object {} in group {}: {:?}", object, group.id(), decision);
        }
    }

    accepted
}
