//! Saving groups to TOML

use crate::format::{GroupDef, GroupsFile};
use crate::store::GroupStore;
use groupkit_core::Result;
use std::fs;
use std::path::Path;

/// Save a store to a groups file
pub fn save_groups<P: AsRef<Path>>(path: P, store: &GroupStore) -> Result<()> {
    let content = save_groups_string(store)?;
    fs::write(path, content)?;
    Ok(())
}

/// Save a store to a TOML string
pub fn save_groups_string(store: &GroupStore) -> Result<String> {
    let file = store_to_file(store);
    let content = toml::to_string_pretty(&file)?;
    Ok(content)
}

/// Convert a GroupStore to its serializable form
pub fn store_to_file(store: &GroupStore) -> GroupsFile {
    let mut file = GroupsFile::new();
    for group in store.iter() {
        file.add_group(
            GroupDef::new(group.name())
                .with_members(group.members().to_vec())
                .with_state(group.frozen(), group.hidden()),
        );
    }
    file
}
