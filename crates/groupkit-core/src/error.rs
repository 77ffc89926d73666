//! Error types for groupkit

use crate::id::{GroupId, ObjectHandle};
use thiserror::Error;

/// The main error type for group operations
#[derive(Debug, Error)]
pub enum GroupError {
    #[error("Group not found: {0}")]
    NotFound(GroupId),

    #[error("Invalid member handle: {0}")]
    InvalidMember(ObjectHandle),

    #[error("Config error: {0}")]
    Config(String),

    #[error("Document error: {0}")]
    Document(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(String),

    #[error("TOML serialization error: {0}")]
    TomlSer(String),
}

/// Result type alias for group operations
pub type Result<T> = std::result::Result<T, GroupError>;

impl From<toml::de::Error> for GroupError {
    fn from(err: toml::de::Error) -> Self {
        GroupError::TomlParse(err.to_string())
    }
}

impl From<toml::ser::Error> for GroupError {
    fn from(err: toml::ser::Error) -> Self {
        GroupError::TomlSer(err.to_string())
    }
}
