//! Storage slot abstraction for the persisted drawing record.

mod file;
mod memory;

pub use file::FileStorage;
pub use memory::MemoryStorage;

use thiserror::Error;

/// Slot key the drawing record lives under.
pub const STORAGE_KEY: &str = "mapAreaTracer_drawings";

/// Storage errors.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("IO error: {0}")]
    Io(String),
    #[error("Storage error: {0}")]
    Other(String),
}

/// Result type for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// One named slot of durable client-side storage, local-storage style.
///
/// Implementations hold opaque string blobs; the distinction between an
/// absent slot and an empty blob is meaningful (clear-all erases the slot
/// entirely).
pub trait StorageSlot {
    /// Read the blob stored under `key`, or `None` if the slot is absent.
    fn read(&self, key: &str) -> StorageResult<Option<String>>;

    /// Write the blob under `key`, replacing any previous value.
    fn write(&self, key: &str, value: &str) -> StorageResult<()>;

    /// Remove the slot entirely.
    fn erase(&self, key: &str) -> StorageResult<()>;
}

impl<S: StorageSlot + ?Sized> StorageSlot for &S {
    fn read(&self, key: &str) -> StorageResult<Option<String>> {
        (**self).read(key)
    }

    fn write(&self, key: &str, value: &str) -> StorageResult<()> {
        (**self).write(key, value)
    }

    fn erase(&self, key: &str) -> StorageResult<()> {
        (**self).erase(key)
    }
}
