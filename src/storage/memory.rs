//! Memory Storage Module
//!
//! Bounded in-memory provider, also used as the fallback when the configured
//! provider is unavailable.

use std::collections::HashMap;

use crate::error::StorageError;
use crate::storage::Storage;

// == Memory Storage ==
/// HashMap-backed provider holding at most `capacity` keys.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    entries: HashMap<String, String>,
    capacity: usize,
}

impl MemoryStorage {
    // == Constructor ==
    /// Creates an empty provider that refuses new keys beyond `capacity`.
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: HashMap::new(),
            capacity,
        }
    }

    /// Maximum number of keys.
    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

impl Storage for MemoryStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        // Overwrites never need room
        if !self.entries.contains_key(key) && self.entries.len() >= self.capacity {
            return Err(StorageError::QuotaExceeded(format!(
                "memory storage holds {} of {} entries",
                self.entries.len(),
                self.capacity
            )));
        }

        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), StorageError> {
        self.entries.remove(key);
        Ok(())
    }

    fn clear(&mut self) -> Result<(), StorageError> {
        self.entries.clear();
        Ok(())
    }

    fn len(&self) -> Result<usize, StorageError> {
        Ok(self.entries.len())
    }

    fn keys(&self) -> Result<Vec<String>, StorageError> {
        Ok(self.entries.keys().cloned().collect())
    }
}
