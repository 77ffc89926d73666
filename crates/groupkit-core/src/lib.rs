//! groupkit Core - Foundational types shared by every groupkit crate
//!
//! - `GroupId` - Stable group identifiers
//! - `ObjectHandle` - Opaque weak references to host-managed objects
//! - Error types and Result alias

mod error;
mod id;

pub use error::{GroupError, Result};
pub use id::{GroupId, ObjectHandle};
