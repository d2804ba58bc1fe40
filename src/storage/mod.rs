//! Storage Module
//!
//! The narrow capability the store is layered over, plus the providers that
//! implement it.

mod file;
mod memory;

use chrono::Utc;
use tracing::debug;

use crate::error::StorageError;

pub use file::FileStorage;
pub use memory::MemoryStorage;

/// Key written and removed again by [`probe`].
pub const PROBE_KEY: &str = "__recent_store_probe__";

// == Storage Trait ==
/// A string-only key/value provider that may refuse writes when full.
///
/// Every operation is fallible; callers treat the provider as shared and
/// re-read it on every call.
pub trait Storage: Send + Sync {
    /// Returns the stored string, `None` when absent.
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Stores a string, failing with `QuotaExceeded` when there is no room.
    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Removes a key. Removing a missing key is not an error.
    fn remove(&mut self, key: &str) -> Result<(), StorageError>;

    /// Removes every key.
    fn clear(&mut self) -> Result<(), StorageError>;

    /// Number of stored keys.
    fn len(&self) -> Result<usize, StorageError>;

    /// All stored keys, in no particular order.
    fn keys(&self) -> Result<Vec<String>, StorageError>;

    fn is_empty(&self) -> Result<bool, StorageError> {
        Ok(self.len()? == 0)
    }
}

// == Probe ==
/// Checks that a provider can store and return a value.
///
/// Writes a timestamp under [`PROBE_KEY`], reads it back, requires an exact
/// match, then removes it. Never fails; any fault reports `false`.
pub fn probe(storage: &mut dyn Storage) -> bool {
    let stamp = Utc::now().timestamp_millis().to_string();

    if let Err(e) = storage.set(PROBE_KEY, &stamp) {
        debug!(error = %e, "Storage probe failed");
        return false;
    }

    let read = storage.get(PROBE_KEY);
    // Remove even when the read failed, so the probe key never lingers
    let removed = storage.remove(PROBE_KEY);
    let result = read.and_then(|read| removed.map(|_| read));

    match result {
        Ok(Some(read)) if read == stamp => true,
        Ok(read) => {
            debug!(?read, "Storage probe read back a different value");
            false
        }
        Err(e) => {
            debug!(error = %e, "Storage probe failed");
            false
        }
    }
}
