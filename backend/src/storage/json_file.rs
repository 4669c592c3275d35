//! File-based state storage

use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;

use super::{StateKey, Storage};
use crate::error::{AppError, AppResult};

/// Stores each state document as `<data_dir>/<key>.json`
///
/// Writes go to a temporary sibling file which is then renamed over the
/// target, so a crash mid-write leaves the previous document intact.
///
/// I/O is synchronous. Documents are small and every write happens under the
/// registry or session lock, which already serializes access to the files.
#[derive(Clone, Debug)]
pub struct JsonFileStorage {
    base_path: PathBuf,
}

impl JsonFileStorage {
    /// Create the storage, making sure the directory exists
    pub fn open(base_path: impl Into<PathBuf>) -> AppResult<Self> {
        let base_path = base_path.into();
        fs::create_dir_all(&base_path).map_err(|e| {
            AppError::Storage(format!(
                "Failed to create data directory {}: {}",
                base_path.display(),
                e
            ))
        })?;
        Ok(Self { base_path })
    }

    pub fn path_for(&self, key: StateKey) -> PathBuf {
        self.base_path.join(key.file_name())
    }

    fn corrupt_path_for(&self, key: StateKey) -> PathBuf {
        self.base_path.join(format!("{}.corrupt", key.file_name()))
    }
}

impl Storage for JsonFileStorage {
    fn read(&self, key: StateKey) -> AppResult<Option<String>> {
        match fs::read_to_string(self.path_for(key)) {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(AppError::Storage(format!(
                "Failed to read {}: {}",
                key.file_name(),
                e
            ))),
        }
    }

    fn write(&self, key: StateKey, contents: &str) -> AppResult<()> {
        let target = self.path_for(key);
        let tmp = target.with_extension("json.tmp");

        fs::write(&tmp, contents).map_err(|e| {
            AppError::Storage(format!("Failed to write {}: {}", key.file_name(), e))
        })?;
        fs::rename(&tmp, &target).map_err(|e| {
            AppError::Storage(format!("Failed to replace {}: {}", key.file_name(), e))
        })?;

        Ok(())
    }

    fn remove(&self, key: StateKey) -> AppResult<()> {
        match fs::remove_file(self.path_for(key)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(AppError::Storage(format!(
                "Failed to delete {}: {}",
                key.file_name(),
                e
            ))),
        }
    }

    fn quarantine(&self, key: StateKey) -> AppResult<()> {
        match fs::rename(self.path_for(key), self.corrupt_path_for(key)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(AppError::Storage(format!(
                "Failed to move aside {}: {}",
                key.file_name(),
                e
            ))),
        }
    }
}
