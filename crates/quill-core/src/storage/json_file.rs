//! JSON-file storage backend.
//!
//! One file per key under a data directory. Writes go through a temp file
//! with fsync and an atomic rename, so a crash mid-write leaves the previous
//! value intact.

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use crate::error::{QuillError, Result};
use crate::storage::traits::KeyValueStore;

/// File-backed key-value store.
pub struct JsonFileStore {
    dir: PathBuf,
}

impl JsonFileStore {
    /// Open a store rooted at `dir`, creating the directory if needed.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir).map_err(|e| {
            QuillError::Storage(format!(
                "Failed to create data directory {}: {}",
                dir.display(),
                e
            ))
        })?;
        Ok(Self { dir })
    }

    /// The directory backing this store.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn key_path(&self, key: &str) -> Result<PathBuf> {
        if key.is_empty()
            || !key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
        {
            return Err(QuillError::InvalidInput(format!(
                "Invalid storage key: {:?}",
                key
            )));
        }
        Ok(self.dir.join(format!("{}.json", key)))
    }

    fn write_atomic(path: &Path, data: &[u8]) -> Result<()> {
        let parent = path
            .parent()
            .ok_or_else(|| QuillError::Storage("Invalid storage path".to_string()))?;

        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_err(|e| QuillError::Storage(format!("System time error: {}", e)))?
            .as_nanos();
        let filename = path
            .file_name()
            .and_then(|name| name.to_str())
            .ok_or_else(|| QuillError::Storage("Invalid storage filename".to_string()))?;
        let temp_path = parent.join(format!("{}.{}.tmp", filename, nanos));

        let mut file = OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&temp_path)
            .map_err(|e| QuillError::Storage(format!("Temp file create failed: {}", e)))?;
        file.write_all(data)
            .map_err(|e| QuillError::Storage(format!("Temp file write failed: {}", e)))?;
        file.sync_all()
            .map_err(|e| QuillError::Storage(format!("Temp file sync failed: {}", e)))?;

        rename_with_fallback(&temp_path, path)
    }
}

/// Atomically rename a file, tolerating platforms where rename fails when the
/// target exists (notably Windows). The temp file is cleaned up if the rename
/// ultimately fails.
fn rename_with_fallback(temp_path: &Path, destination: &Path) -> Result<()> {
    if let Err(initial_err) = fs::rename(temp_path, destination) {
        let _ = fs::remove_file(destination);
        fs::rename(temp_path, destination).map_err(|retry_err| {
            let _ = fs::remove_file(temp_path);
            QuillError::Storage(format!(
                "Atomic rename failed (initial: {}, retry: {})",
                initial_err, retry_err
            ))
        })?;
    }
    Ok(())
}

impl KeyValueStore for JsonFileStore {
    fn save(&mut self, key: &str, value: &serde_json::Value) -> Result<()> {
        let path = self.key_path(key)?;
        let data = serde_json::to_vec_pretty(value)?;
        Self::write_atomic(&path, &data)
    }

    fn load(&self, key: &str) -> Result<Option<serde_json::Value>> {
        let path = self.key_path(key)?;
        let data = match fs::read(&path) {
            Ok(data) => data,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(QuillError::Storage(format!(
                    "Failed to read {}: {}",
                    path.display(),
                    e
                )))
            }
        };
        let value = serde_json::from_slice(&data).map_err(|e| {
            QuillError::Storage(format!("Corrupt value for key {:?}: {}", key, e))
        })?;
        Ok(Some(value))
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        let path = self.key_path(key)?;
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(QuillError::Storage(format!(
                "Failed to remove {}: {}",
                path.display(),
                e
            ))),
        }
    }
}
