//! Loading groups from TOML

use crate::format::GroupsFile;
use crate::group::Group;
use crate::store::GroupStore;
use groupkit_core::Result;
use std::fs;
use std::path::Path;

/// Load a store from a groups file
pub fn load_groups<P: AsRef<Path>>(path: P) -> Result<GroupStore> {
    let content = fs::read_to_string(path)?;
    load_groups_string(&content)
}

/// Load a store from a TOML string
pub fn load_groups_string(content: &str) -> Result<GroupStore> {
    let file: GroupsFile = toml::from_str(content)?;
    Ok(store_from_file(&file))
}

/// Build a store from its serialized form.
///
/// Groups get fresh ids in file order. Handles are not checked here; the
/// host may not have loaded its objects yet, so dead handles are left for
/// the next cleanup pass.
pub fn store_from_file(file: &GroupsFile) -> GroupStore {
    let mut store = GroupStore::new();
    for def in &file.groups {
        let group = Group::new(def.name.clone(), def.members.iter().copied())
            .with_state(def.frozen, def.hidden);
        if group.len() != def.members.len() {
            log::warn!(
                "group '{}' listed {} duplicate members",
                def.name,
                def.members.len() - group.len()
            );
        }
        store.insert(group);
    }
    log::info!("loaded {} groups", store.len());
    store
}
