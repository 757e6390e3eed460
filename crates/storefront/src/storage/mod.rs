//! Durable key-value slots for the persisted cart.
//!
//! Mirrors browser local storage: string keys, string values, synchronous
//! reads and whole-value overwrites.
//!
//! # Backends
//!
//! - [`FileStore`] - a single JSON file holding every key
//! - [`MemoryStore`] - process memory, for tests and ephemeral sessions

mod file;
mod memory;

pub use file::FileStore;
pub use memory::MemoryStore;

use thiserror::Error;

/// Key of the slot holding the serialized cart.
pub const CART_STORAGE_KEY: &str = "@RocketShoes:cart";

/// Errors that can occur when reading or writing a storage slot.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Filesystem operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Stored data could not be encoded or decoded.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// A string-keyed persistent store.
pub trait PersistentStore: Send + Sync {
    /// Read a slot. Returns `Ok(None)` if the key has never been written.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backend cannot be read.
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Overwrite a slot.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backend cannot be written.
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;
}
