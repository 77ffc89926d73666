//! Stable group identifiers and object handles

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

/// Global counter for generating group IDs
static NEXT_GROUP_ID: AtomicU64 = AtomicU64::new(1);

/// Identifies a group for the lifetime of the process.
///
/// Positions in a store shift as groups are removed or reordered; a
/// `GroupId` does not, so batch operations key on it instead of an index.
/// IDs are never reused, even after the group is removed.
#[derive(Clone, Copy, Hash, Eq, PartialEq, Ord, PartialOrd)]
pub struct GroupId(u64);

impl GroupId {
    /// Allocate a fresh GroupId
    pub fn new() -> Self {
        Self(NEXT_GROUP_ID.fetch_add(1, Ordering::Relaxed))
    }

    /// Create a GroupId from a raw value (for testing)
    pub fn from_raw(id: u64) -> Self {
        Self(id)
    }

    /// Get the raw u64 value
    pub fn raw(&self) -> u64 {
        self.0
    }
}

impl Default for GroupId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for GroupId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "GroupId({})", self.0)
    }
}

impl fmt::Display for GroupId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// An opaque, non-owning reference to an object owned by the host editor.
///
/// Holding a handle says nothing about whether the object still exists.
/// Resolve it through the host every time it is used and never cache the
/// result across frames.
#[derive(Clone, Copy, Hash, Eq, PartialEq, Ord, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ObjectHandle(pub u64);

impl ObjectHandle {
    pub fn from_raw(id: u64) -> Self {
        Self(id)
    }

    pub fn raw(&self) -> u64 {
        self.0
    }
}

impl fmt::Debug for ObjectHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ObjectHandle({})", self.0)
    }
}

impl fmt::Display for ObjectHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_group_ids_are_unique() {
        let a = GroupId::new();
        let b = GroupId::new();
        assert_ne!(a, b);
        assert!(b.raw() > a.raw());
    }

    #[test]
    fn test_handle_serializes_transparently() {
        #[derive(Serialize, Deserialize)]
        struct Wrapper {
            members: Vec<ObjectHandle>,
        }

        let w = Wrapper {
            members: vec![ObjectHandle(3), ObjectHandle(9)],
        };
        let text = toml::to_string(&w).unwrap();
        assert!(text.contains("members = [3, 9]"));

        let back: Wrapper = toml::from_str(&text).unwrap();
        assert_eq!(back.members, w.members);
    }

    #[test]
    fn test_handle_display() {
        assert_eq!(ObjectHandle::from_raw(12).to_string(), "#12");
        assert_eq!(format!("{:?}", ObjectHandle(12)), "ObjectHandle(12)");
    }
}
