//! Groups embedded in a host scene document
//!
//! The host owns the scene file; groups live in its `[[groups]]` array.
//! Uses `toml_edit` so writing the groups back leaves every other table,
//! comment, and formatting choice in the document alone.

use crate::format::{GroupDef, GroupsFile};
use crate::loader::store_from_file;
use crate::saver::store_to_file;
use crate::store::GroupStore;
use groupkit_core::{GroupError, Result};
use serde::Deserialize;
use std::fs;
use std::path::Path;

const GROUPS_KEY: &str = "groups";

/// A parsed scene document whose groups can be replaced in place
pub struct GroupsDocument {
    doc: toml_edit::DocumentMut,
}

#[derive(Deserialize)]
struct EmbeddedGroups {
    #[serde(default)]
    groups: Vec<GroupDef>,
}

impl GroupsDocument {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())?;
        Self::from_str(&content)
    }

    pub fn from_str(content: &str) -> Result<Self> {
        let doc: toml_edit::DocumentMut = content
            .parse()
            .map_err(|e| GroupError::Document(format!("Failed to parse scene document: {}", e)))?;
        Ok(Self { doc })
    }

    /// Read the groups currently stored in the document
    pub fn groups(&self) -> Result<GroupStore> {
        let embedded: EmbeddedGroups = toml::from_str(&self.doc.to_string())?;
        let file = GroupsFile {
            groups: embedded.groups,
            ..GroupsFile::new()
        };
        Ok(store_from_file(&file))
    }

    /// Replace the document's groups with the contents of `store`.
    /// An empty store removes the `[[groups]]` array altogether.
    ///
    /// TOML integers are signed 64-bit, so a handle above `i64::MAX` is
    /// rejected and the document is left as it was.
    pub fn set_groups(&mut self, store: &GroupStore) -> Result<()> {
        let file = store_to_file(store);
        if file.groups.is_empty() {
            self.doc.remove(GROUPS_KEY);
            return Ok(());
        }

        let mut tables = toml_edit::ArrayOfTables::new();
        for def in &file.groups {
            tables.push(group_table(def)?);
        }
        self.doc
            .insert(GROUPS_KEY, toml_edit::Item::ArrayOfTables(tables));
        Ok(())
    }

    pub fn to_string(&self) -> String {
        self.doc.to_string()
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        fs::write(path, self.to_string())?;
        Ok(())
    }
}

fn group_table(def: &GroupDef) -> Result<toml_edit::Table> {
    let mut members = toml_edit::Array::new();
    for handle in &def.members {
        let raw = i64::try_from(handle.raw()).map_err(|_| {
            GroupError::Document(format!(
                "object handle {} in group '{}' does not fit a TOML integer",
                handle, def.name
            ))
        })?;
        members.push(raw);
    }

    let mut table = toml_edit::Table::new();
    table.insert("name", toml_edit::value(def.name.as_str()));
    table.insert("members", toml_edit::value(members));
    table.insert("frozen", toml_edit::value(def.frozen));
    table.insert("hidden", toml_edit::value(def.hidden));
    Ok(table)
}
