//! Layered configuration
//!
//! Config is loaded with three layers of precedence (highest wins):
//! 1. Environment variables: `GROUPKIT_DUPLICATE_POLICY`, `GROUPKIT_RECORD_UNDO`
//! 2. Project-local: `.groupkit/config.toml`
//! 3. Global: `~/.groupkit/config.toml`

use crate::policy::DuplicatePolicy;
use groupkit_core::{GroupError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

const ENV_DUPLICATE_POLICY: &str = "GROUPKIT_DUPLICATE_POLICY";
const ENV_RECORD_UNDO: &str = "GROUPKIT_RECORD_UNDO";

/// On-disk config. Every field is optional so layers only override what
/// they set.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GroupsConfigFile {
    #[serde(default)]
    pub default_group_name: Option<String>,
    #[serde(default)]
    pub merge_separator: Option<String>,
    #[serde(default)]
    pub duplicate_policy: Option<DuplicatePolicy>,
    #[serde(default)]
    pub record_undo: Option<bool>,
}

/// Resolved configuration
#[derive(Debug, Clone, PartialEq)]
pub struct GroupsConfig {
    /// Name for new groups that have nothing better to be called
    pub default_group_name: String,
    /// Joins source group names when a merge is not given a name
    pub merge_separator: String,
    /// What to do when added objects already belong to another group
    pub duplicate_policy: DuplicatePolicy,
    /// Register host undo checkpoints before mutations
    pub record_undo: bool,
}

impl Default for GroupsConfig {
    fn default() -> Self {
        Self {
            default_group_name: "New Group".to_string(),
            merge_separator: "+".to_string(),
            duplicate_policy: DuplicatePolicy::default(),
            record_undo: true,
        }
    }
}

impl GroupsConfig {
    /// Load config with layered precedence: defaults < global < project < env vars
    pub fn load() -> Result<Self> {
        let mut config = Self::default();

        if let Some(global_path) = Self::global_config_path() {
            if global_path.exists() {
                config.merge(Self::load_file(&global_path)?);
            }
        }

        let local_path = PathBuf::from(".groupkit/config.toml");
        if local_path.exists() {
            config.merge(Self::load_file(&local_path)?);
        }

        config.apply_overrides(|key| std::env::var(key).ok());
        Ok(config)
    }

    /// Load config from a specific file path only (for testing)
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let mut config = Self::default();
        config.merge(Self::load_file(path)?);
        config.apply_overrides(|key| std::env::var(key).ok());
        Ok(config)
    }

    fn global_config_path() -> Option<PathBuf> {
        dirs::home_dir().map(|h| h.join(".groupkit").join("config.toml"))
    }

    fn load_file(path: &Path) -> Result<GroupsConfigFile> {
        let content = std::fs::read_to_string(path)?;
        let file: GroupsConfigFile = toml::from_str(&content).map_err(|e| {
            GroupError::Config(format!("Failed to parse config {}: {}", path.display(), e))
        })?;
        Ok(file)
    }

    fn merge(&mut self, overlay: GroupsConfigFile) {
        if let Some(name) = overlay.default_group_name {
            self.default_group_name = name;
        }
        if let Some(sep) = overlay.merge_separator {
            self.merge_separator = sep;
        }
        if let Some(policy) = overlay.duplicate_policy {
            self.duplicate_policy = policy;
        }
        if let Some(record) = overlay.record_undo {
            self.record_undo = record;
        }
    }

    fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(value) = lookup(ENV_DUPLICATE_POLICY) {
            match value.parse::<DuplicatePolicy>() {
                Ok(policy) => self.duplicate_policy = policy,
                Err(e) => log::warn!("ignoring {}: {}", ENV_DUPLICATE_POLICY, e),
            }
        }
        if let Some(value) = lookup(ENV_RECORD_UNDO) {
            match value.trim().to_ascii_lowercase().as_str() {
                "1" | "true" | "yes" => self.record_undo = true,
                "0" | "false" | "no" => self.record_undo = false,
                other => log::warn!("ignoring {}: unrecognized value '{}'", ENV_RECORD_UNDO, other),
            }
        }
    }
}
