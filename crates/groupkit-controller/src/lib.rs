//! groupkit Controller - what the group panel actually does
//!
//! Ties a [`GroupStore`](groupkit_store::GroupStore) to the editor host:
//! selection highlighting, freezing and hiding member objects, isolating
//! a group, and resolving objects that already belong to another group.
//!
//! ```no_run
//! use groupkit_controller::GroupController;
//! use groupkit_host::SceneHost;
//!
//! let mut host = SceneHost::new();
//! let lamp = host.world.spawn("Lamp");
//! host.select(&[lamp]);
//!
//! let mut groups = GroupController::new(host);
//! if let Some(id) = groups.new_group_from_selection() {
//!     groups.toggle_frozen(id).unwrap();
//! }
//! ```

mod config;
mod controller;
mod policy;

pub use config::{GroupsConfig, GroupsConfigFile};
pub use controller::GroupController;
pub use policy::{ConflictDecision, ConflictResolver, DuplicatePolicy, MembershipConflict};
