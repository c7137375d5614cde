//! In-memory storage implementation.

use super::{StorageError, StorageResult, StorageSlot};
use std::collections::HashMap;
use std::sync::RwLock;

/// In-memory storage for testing and ephemeral use.
#[derive(Default)]
pub struct MemoryStorage {
    slots: RwLock<HashMap<String, String>>,
}

impl MemoryStorage {
    /// Create a new empty memory storage.
    pub fn new() -> Self {
        Self::default()
    }
}

impl StorageSlot for MemoryStorage {
    fn read(&self, key: &str) -> StorageResult<Option<String>> {
        let slots = self
            .slots
            .read()
            .map_err(|e| StorageError::Other(format!("Lock error: {e}")))?;
        Ok(slots.get(key).cloned())
    }

    fn write(&self, key: &str, value: &str) -> StorageResult<()> {
        let mut slots = self
            .slots
            .write()
            .map_err(|e| StorageError::Other(format!("Lock error: {e}")))?;
        slots.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn erase(&self, key: &str) -> StorageResult<()> {
        let mut slots = self
            .slots
            .write()
            .map_err(|e| StorageError::Other(format!("Lock error: {e}")))?;
        slots.remove(key);
        Ok(())
    }
}
