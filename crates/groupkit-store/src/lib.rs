//! groupkit Store - ordered, named groups of scene objects
//!
//! This crate owns the group data model and its mutations, plus the
//! TOML form the groups take inside a scene document.

mod document;
mod format;
mod group;
mod loader;
mod saver;
mod store;

pub use document::GroupsDocument;
pub use format::{GroupDef, GroupsFile};
pub use group::Group;
pub use loader::{load_groups, load_groups_string, store_from_file};
pub use saver::{save_groups, save_groups_string, store_to_file};
pub use store::{Direction, GroupStore};
