//! Serialized form of a group store

use groupkit_core::ObjectHandle;
use serde::{Deserialize, Serialize};

pub(crate) const FORMAT_VERSION: &str = "1.0";

/// Root structure of a groups TOML file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GroupsFile {
    #[serde(default = "default_version")]
    pub version: String,
    #[serde(default)]
    pub groups: Vec<GroupDef>,
}

fn default_version() -> String {
    FORMAT_VERSION.to_string()
}

/// One group as stored on disk. List order is display order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupDef {
    pub name: String,
    #[serde(default)]
    pub members: Vec<ObjectHandle>,
    #[serde(default)]
    pub frozen: bool,
    #[serde(default)]
    pub hidden: bool,
}

impl GroupDef {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            members: Vec::new(),
            frozen: false,
            hidden: false,
        }
    }

    pub fn with_members(mut self, members: Vec<ObjectHandle>) -> Self {
        self.members = members;
        self
    }

    pub fn with_state(mut self, frozen: bool, hidden: bool) -> Self {
        self.frozen = frozen;
        self.hidden = hidden;
        self
    }
}

impl GroupsFile {
    pub fn new() -> Self {
        Self {
            version: default_version(),
            groups: Vec::new(),
        }
    }

    pub fn add_group(&mut self, group: GroupDef) {
        self.groups.push(group);
    }
}

impl Default for GroupsFile {
    fn default() -> Self {
        Self::new()
    }
}
