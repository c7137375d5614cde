//! File-based storage, a native stand-in for browser local storage.

use super::{StorageError, StorageResult, StorageSlot};
use std::fs;
use std::path::PathBuf;

/// Stores each slot as a JSON file in a base directory.
pub struct FileStorage {
    base_path: PathBuf,
}

impl FileStorage {
    /// Create a file storage rooted at `base_path`, creating the directory
    /// if it doesn't exist.
    pub fn new(base_path: PathBuf) -> StorageResult<Self> {
        if !base_path.exists() {
            fs::create_dir_all(&base_path).map_err(|e| {
                StorageError::Io(format!("Failed to create storage directory: {e}"))
            })?;
        }
        Ok(Self { base_path })
    }

    /// Get the file path for a slot key.
    fn slot_path(&self, key: &str) -> PathBuf {
        // Sanitize the key to be safe for filenames
        let safe_key: String = key
            .chars()
            .map(|c| if c.is_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
            .collect();
        self.base_path.join(format!("{safe_key}.json"))
    }

    pub fn base_path(&self) -> &PathBuf {
        &self.base_path
    }
}

impl StorageSlot for FileStorage {
    fn read(&self, key: &str) -> StorageResult<Option<String>> {
        let path = self.slot_path(key);
        if !path.exists() {
            return Ok(None);
        }
        fs::read_to_string(&path)
            .map(Some)
            .map_err(|e| StorageError::Io(format!("Failed to read {}: {e}", path.display())))
    }

    fn write(&self, key: &str, value: &str) -> StorageResult<()> {
        let path = self.slot_path(key);
        fs::write(&path, value)
            .map_err(|e| StorageError::Io(format!("Failed to write {}: {e}", path.display())))
    }

    fn erase(&self, key: &str) -> StorageResult<()> {
        let path = self.slot_path(key);
        if path.exists() {
            fs::remove_file(&path)
                .map_err(|e| StorageError::Io(format!("Failed to delete {}: {e}", path.display())))?;
        }
        Ok(())
    }
}
