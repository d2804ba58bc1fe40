//! File Storage Module
//!
//! Persistent provider keeping its entries in a JSON file with a byte quota.

use std::collections::BTreeMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::error::StorageError;
use crate::storage::Storage;

// == File Storage ==
/// JSON-file-backed provider.
///
/// The quota counts key and value bytes together. Every mutation is written
/// through to disk before it returns.
#[derive(Debug)]
pub struct FileStorage {
    path: PathBuf,
    entries: BTreeMap<String, String>,
    quota_bytes: usize,
    used_bytes: usize,
}

fn entry_size(key: &str, value: &str) -> usize {
    key.len() + value.len()
}

impl FileStorage {
    // == Constructor ==
    /// Opens the file at `path`, starting empty if it does not exist.
    ///
    /// # Arguments
    /// * `path` - Location of the JSON file
    /// * `quota_bytes` - Maximum summed size of keys and values
    pub fn open(path: impl AsRef<Path>, quota_bytes: usize) -> Result<Self, StorageError> {
        let path = path.as_ref().to_path_buf();

        let entries: BTreeMap<String, String> = match fs::read(&path) {
            Ok(bytes) => serde_json::from_slice(&bytes)
                .map_err(|e| StorageError::Io(format!("{}: {}", path.display(), e)))?,
            Err(e) if e.kind() == ErrorKind::NotFound => BTreeMap::new(),
            Err(e) => return Err(e.into()),
        };

        let used_bytes = entries.iter().map(|(k, v)| entry_size(k, v)).sum();
        info!(
            "Opened file storage at {} with {} entries ({} of {} bytes)",
            path.display(),
            entries.len(),
            used_bytes,
            quota_bytes
        );

        Ok(Self {
            path,
            entries,
            quota_bytes,
            used_bytes,
        })
    }

    /// Bytes currently counted against the quota.
    pub fn used_bytes(&self) -> usize {
        self.used_bytes
    }

    /// Path of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    // == Persist ==
    /// Writes the map to a sibling temp file and renames it into place.
    fn persist(&self) -> Result<(), StorageError> {
        let bytes = serde_json::to_vec(&self.entries)
            .map_err(|e| StorageError::Serialization(e.to_string()))?;
        let tmp = self.path.with_extension("tmp");

        fs::write(&tmp, bytes)?;
        fs::rename(&tmp, &self.path)?;
        debug!("Persisted {} entries to {}", self.entries.len(), self.path.display());
        Ok(())
    }
}

impl Storage for FileStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        let freed = self
            .entries
            .get(key)
            .map(|old| entry_size(key, old))
            .unwrap_or(0);
        let needed = self.used_bytes - freed + entry_size(key, value);

        if needed > self.quota_bytes {
            return Err(StorageError::QuotaExceeded(format!(
                "{} bytes needed, quota is {}",
                needed, self.quota_bytes
            )));
        }

        let previous = self.entries.insert(key.to_string(), value.to_string());
        if let Err(e) = self.persist() {
            match previous {
                Some(old) => self.entries.insert(key.to_string(), old),
                None => self.entries.remove(key),
            };
            return Err(e);
        }

        self.used_bytes = needed;
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), StorageError> {
        let Some(old) = self.entries.remove(key) else {
            return Ok(());
        };

        if let Err(e) = self.persist() {
            self.entries.insert(key.to_string(), old);
            return Err(e);
        }

        self.used_bytes -= entry_size(key, &old);
        Ok(())
    }

    fn clear(&mut self) -> Result<(), StorageError> {
        let previous = std::mem::take(&mut self.entries);

        if let Err(e) = self.persist() {
            self.entries = previous;
            return Err(e);
        }

        self.used_bytes = 0;
        Ok(())
    }

    fn len(&self) -> Result<usize, StorageError> {
        Ok(self.entries.len())
    }

    fn keys(&self) -> Result<Vec<String>, StorageError> {
        Ok(self.entries.keys().cloned().collect())
    }
}
