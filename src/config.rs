use crate::{
    error::{ErrorCode, WorkbenchError},
    persistence::DEFAULT_STORAGE_KEY,
    views::{DEFAULT_VIEW_ORDER, ViewGroup},
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const DEFAULT_CONFIG_PATH: &str = "workbench.json";
pub const DEFAULT_STORAGE_DIR: &str = ".workbench";
pub const DEFAULT_PAYLOAD_PATH: &str = "data/payload.json";

pub const STORAGE_DIR_ENV: &str = "WORKBENCH_STORAGE_DIR";
pub const STORAGE_KEY_ENV: &str = "WORKBENCH_STORAGE_KEY";
pub const PAYLOAD_ENV: &str = "WORKBENCH_PAYLOAD";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkbenchConfig {
    /// Directory holding one file per storage key.
    pub storage_dir: PathBuf,
    pub storage_key: String,
    /// Precomputed analysis payload consumed by the module mappers.
    pub payload_path: PathBuf,
    pub view_order: Vec<ViewGroup>,
}

impl Default for WorkbenchConfig {
    fn default() -> Self {
        Self {
            storage_dir: PathBuf::from(DEFAULT_STORAGE_DIR),
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
            payload_path: PathBuf::from(DEFAULT_PAYLOAD_PATH),
            view_order: DEFAULT_VIEW_ORDER.to_vec(),
        }
    }
}

fn normalized_non_empty(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

impl WorkbenchConfig {
    pub fn load_from_path(path: &Path) -> Result<Self, WorkbenchError> {
        let text = std::fs::read_to_string(path).map_err(|e| {
            WorkbenchError::new(
                ErrorCode::Io,
                format!("Could not read config file '{}': {e}", path.display()),
            )
        })?;
        serde_json::from_str(&text).map_err(|e| {
            WorkbenchError::new(
                ErrorCode::InvalidInput,
                format!("Could not parse config JSON '{}': {e}", path.display()),
            )
        })
    }

    /// An explicit path must exist. Without one, `workbench.json` in the
    /// working directory is used when present, defaults otherwise. Environment
    /// overrides are applied last.
    pub fn load(explicit: Option<&Path>) -> Result<Self, WorkbenchError> {
        let mut config = match explicit {
            Some(path) if !path.exists() => {
                return Err(WorkbenchError::new(
                    ErrorCode::NotFound,
                    format!("Config file '{}' does not exist", path.display()),
                ));
            }
            Some(path) => Self::load_from_path(path)?,
            None if Path::new(DEFAULT_CONFIG_PATH).exists() => {
                Self::load_from_path(Path::new(DEFAULT_CONFIG_PATH))?
            }
            None => Self::default(),
        };
        config.apply_overrides(|name| std::env::var(name).ok());
        Ok(config)
    }

    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let configured = |name: &str| lookup(name).and_then(|v| normalized_non_empty(&v));
        if let Some(dir) = configured(STORAGE_DIR_ENV) {
            self.storage_dir = PathBuf::from(dir);
        }
        if let Some(key) = configured(STORAGE_KEY_ENV) {
            self.storage_key = key;
        }
        if let Some(path) = configured(PAYLOAD_ENV) {
            self.payload_path = PathBuf::from(path);
        }
    }
}
