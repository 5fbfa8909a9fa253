//! Import configuration loaded from a TOML file.
//!
//! ```toml
//! dependency_policy = "abort"
//! default_time_unit = "week"
//! backup = false
//! ```

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::fields::{DependencyPolicy, TimeUnit};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImportConfig {
    pub dependency_policy: DependencyPolicy,
    /// Overrides the native project's default time unit when set.
    pub default_time_unit: Option<TimeUnit>,
    /// Back up the native project file before importing into it.
    pub backup: bool,
}

impl Default for ImportConfig {
    fn default() -> Self {
        ImportConfig {
            dependency_policy: DependencyPolicy::Continue,
            default_time_unit: None,
            backup: true,
        }
    }
}

impl ImportConfig {
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let s = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&s).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }
}
