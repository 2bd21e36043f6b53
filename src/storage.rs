//! Key/value storage media underneath the scenario persistence adapter.

use crate::error::{ErrorCode, WorkbenchError};
use std::{
    collections::HashMap,
    fs,
    io::Write,
    path::PathBuf,
    sync::{Arc, RwLock},
};

pub trait KeyValueStorage {
    /// `Ok(None)` when nothing was ever stored under `key`.
    fn get_item(&self, key: &str) -> Result<Option<String>, WorkbenchError>;
    /// Replaces the value under `key` in one write.
    fn set_item(&self, key: &str, value: &str) -> Result<(), WorkbenchError>;
}

/// One file per key inside a directory.
#[derive(Debug, Clone)]
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn path_for_key(&self, key: &str) -> Result<PathBuf, WorkbenchError> {
        let key = key.trim();
        if key.is_empty() || key.contains(['/', '\\']) || key.starts_with('.') {
            return Err(WorkbenchError::new(
                ErrorCode::InvalidInput,
                format!("Invalid storage key '{key}'"),
            ));
        }
        Ok(self.dir.join(format!("{key}.json")))
    }
}

impl KeyValueStorage for FileStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, WorkbenchError> {
        let path = self.path_for_key(key)?;
        if !path.exists() {
            return Ok(None);
        }
        fs::read_to_string(&path).map(Some).map_err(|e| {
            WorkbenchError::new(
                ErrorCode::Io,
                format!("Could not read storage file '{}': {e}", path.display()),
            )
        })
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), WorkbenchError> {
        let path = self.path_for_key(key)?;
        fs::create_dir_all(&self.dir).map_err(|e| {
            WorkbenchError::new(
                ErrorCode::Io,
                format!(
                    "Could not create storage directory '{}': {e}",
                    self.dir.display()
                ),
            )
        })?;
        // Write next to the target and rename, so readers never see half a blob.
        let mut tmp = tempfile::NamedTempFile::new_in(&self.dir)?;
        tmp.write_all(value.as_bytes())?;
        tmp.flush()?;
        tmp.persist(&path).map_err(|e| {
            WorkbenchError::new(
                ErrorCode::Io,
                format!("Could not write storage file '{}': {e}", path.display()),
            )
        })?;
        Ok(())
    }
}

/// In-process storage. Clones share the same underlying map.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    items: Arc<RwLock<HashMap<String, String>>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_item(key: &str, value: &str) -> Self {
        let ret = Self::new();
        if let Ok(mut items) = ret.items.write() {
            items.insert(key.to_string(), value.to_string());
        }
        ret
    }
}

impl KeyValueStorage for MemoryStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, WorkbenchError> {
        let items = self.items.read().map_err(|_| {
            WorkbenchError::new(ErrorCode::Internal, "Memory storage lock poisoned")
        })?;
        Ok(items.get(key).cloned())
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), WorkbenchError> {
        let mut items = self.items.write().map_err(|_| {
            WorkbenchError::new(ErrorCode::Internal, "Memory storage lock poisoned")
        })?;
        items.insert(key.to_string(), value.to_string());
        Ok(())
    }
}
