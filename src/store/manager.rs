//! Recent Store Module
//!
//! Typed key/value access over a quota-limited provider, with a persisted
//! recency window and randomized eviction when the provider fills up.

use std::fmt;

use rand::rngs::StdRng;
use tracing::{debug, error, info, warn};

use crate::codec::{Codec, Value};
use crate::error::{Result, StorageError, StoreError};
use crate::storage::{probe, Storage};
use crate::store::evict::{Admission, Draw, EvictionPass, MAX_TRIM_ATTEMPTS};
use crate::store::{Lookup, Outcome, RecencyList, RecentStoreBuilder, StoreStats, Write};

// == Recent Store ==
/// Key/value accessor that never fails because its provider is full.
///
/// One provider key (`recent_key`) holds the most-recent-first list of
/// touched keys. When a write is refused for capacity, keys outside that list
/// are evicted at random and the write is retried.
pub struct RecentStore {
    pub(crate) storage: Box<dyn Storage>,
    pub(crate) codec: Codec,
    pub(crate) max_size: usize,
    pub(crate) recent_key: String,
    pub(crate) delimiter: String,
    pub(crate) is_candidate: Option<Box<Admission>>,
    pub(crate) rng: StdRng,
    pub(crate) stats: StoreStats,
}

impl fmt::Debug for RecentStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RecentStore")
            .field("codec", &self.codec)
            .field("max_size", &self.max_size)
            .field("recent_key", &self.recent_key)
            .field("delimiter", &self.delimiter)
            .field("has_admission", &self.is_candidate.is_some())
            .field("stats", &self.stats)
            .finish_non_exhaustive()
    }
}

impl RecentStore {
    // == Constructor ==
    /// Starts building a store over `storage`.
    pub fn builder(storage: impl Storage + 'static) -> RecentStoreBuilder {
        RecentStoreBuilder::new(Box::new(storage))
    }

    /// Starts building a store over an already boxed provider.
    pub fn builder_boxed(storage: Box<dyn Storage>) -> RecentStoreBuilder {
        RecentStoreBuilder::new(storage)
    }

    pub fn max_size(&self) -> usize {
        self.max_size
    }

    pub fn recent_key(&self) -> &str {
        &self.recent_key
    }

    /// Read access to the provider, for diagnostics.
    pub fn storage(&self) -> &dyn Storage {
        self.storage.as_ref()
    }

    fn check_writable(&self, key: &str) -> Result<()> {
        if key.is_empty() {
            return Err(StoreError::InvalidKey(
                "empty key cannot be tracked in the recency list".to_string(),
            ));
        }
        if key == self.recent_key {
            return Err(StoreError::ReservedKey(key.to_string()));
        }
        if key.contains(self.delimiter.as_str()) {
            return Err(StoreError::InvalidKey(format!(
                "{:?} contains the recency delimiter",
                key
            )));
        }
        Ok(())
    }

    /// Keys that can appear in the recency list.
    fn is_trackable(&self, key: &str) -> bool {
        !key.is_empty() && key != self.recent_key && !key.contains(self.delimiter.as_str())
    }

    // == Set ==
    /// Stores a value under `key`.
    ///
    /// Usage is recorded before the value is written, so an eviction set off
    /// by this write cannot pick `key` itself. Storage trouble never surfaces
    /// as an error; a write that cannot be made comes back as `Write::Dropped`.
    ///
    /// # Errors
    /// `ReservedKey` for the recency key, `InvalidKey` for the empty key and
    /// keys containing the delimiter. Neither touches the provider.
    pub fn set(&mut self, key: &str, value: impl Into<Value>) -> Result<Write> {
        self.check_writable(key)?;

        let encoded = match self.codec.serialize(&value.into()) {
            Ok(encoded) => encoded,
            Err(e) => {
                error!(key, error = %e, "Could not serialize value, dropping write");
                self.stats.record_dropped_write();
                return Ok(Write::Dropped(e));
            }
        };

        self.record_usage(key);

        match self.storage.set(key, &encoded) {
            Ok(()) => Ok(Write::Stored),
            Err(e) if e.is_quota() => {
                warn!(key, "Storage full, evicting entries");
                match self.trim(key, &encoded) {
                    Ok((attempts, evicted)) => Ok(Write::StoredAfterEviction { attempts, evicted }),
                    Err(e) => {
                        error!(key, error = %e, "Could not make room, dropping write");
                        self.stats.record_dropped_write();
                        Ok(Write::Dropped(e))
                    }
                }
            }
            Err(e) => {
                error!(key, error = %e, "Storage write failed, dropping write");
                self.stats.record_dropped_write();
                Ok(Write::Dropped(e))
            }
        }
    }

    // == Get ==
    /// Reads and decodes the value under `key`, recording usage hit or miss.
    pub fn get(&mut self, key: &str) -> Lookup {
        let read = self.storage.get(key);

        // Keys `set` rejects would corrupt the recency list
        if self.is_trackable(key) {
            self.record_usage(key);
        }

        match read {
            Ok(raw) => match self.codec.deserialize(raw.as_deref()) {
                Some(value) => {
                    self.stats.record_hit();
                    Lookup::Found(value)
                }
                None => {
                    self.stats.record_miss();
                    Lookup::NotFound
                }
            },
            Err(e) => {
                warn!(key, error = %e, "Storage read failed");
                self.stats.record_miss();
                Lookup::Degraded(e)
            }
        }
    }

    // == Has ==
    /// Checks whether `key` is stored, without recording usage.
    pub fn has(&self, key: &str) -> Outcome<bool> {
        self.storage.get(key).map(|raw| raw.is_some()).into()
    }

    // == Delete ==
    /// Removes `key` from the recency list and the provider.
    ///
    /// # Errors
    /// `ReservedKey` for the recency key.
    pub fn delete(&mut self, key: &str) -> Result<Outcome<()>> {
        if key == self.recent_key {
            return Err(StoreError::ReservedKey(key.to_string()));
        }

        match self.read_recent() {
            Ok(mut recent) => {
                if recent.remove(key) {
                    self.write_recent(&recent);
                }
            }
            Err(e) => warn!(key, error = %e, "Could not read recency list during delete"),
        }

        Ok(match self.storage.remove(key) {
            Ok(()) => Outcome::Done(()),
            Err(e) => {
                warn!(key, error = %e, "Storage delete failed");
                Outcome::degraded((), e)
            }
        })
    }

    // == Delete Prefix ==
    /// Deletes every key starting with `prefix`, returning how many went.
    pub fn delete_prefix(&mut self, prefix: &str) -> Outcome<usize> {
        let keys = match self.storage.keys() {
            Ok(keys) => keys,
            Err(e) => {
                warn!(prefix, error = %e, "Could not list keys for prefix delete");
                return Outcome::degraded(0, e);
            }
        };

        let doomed: Vec<String> = keys
            .into_iter()
            .filter(|k| *k != self.recent_key && k.starts_with(prefix))
            .collect();

        if let Ok(mut recent) = self.read_recent() {
            let mut changed = false;
            for key in &doomed {
                changed |= recent.remove(key);
            }
            if changed {
                self.write_recent(&recent);
            }
        }

        let mut removed = 0;
        let mut failure = None;
        for key in &doomed {
            match self.storage.remove(key) {
                Ok(()) => removed += 1,
                Err(e) => {
                    warn!(key = key.as_str(), error = %e, "Storage delete failed");
                    failure = Some(e);
                }
            }
        }

        debug!(prefix, removed, "Deleted keys by prefix");
        match failure {
            None => Outcome::Done(removed),
            Some(e) => Outcome::degraded(removed, e),
        }
    }

    // == Recent ==
    /// Most-recent-first keys; empty when the list is absent or unreadable.
    pub fn recent(&self) -> Outcome<Vec<String>> {
        self.read_recent().map(RecencyList::into_vec).into()
    }

    // == Keys ==
    /// All stored keys except the recency key, optionally sorted.
    pub fn keys(&self, sorted: bool) -> Outcome<Vec<String>> {
        self.storage
            .keys()
            .map(|keys| {
                let mut keys: Vec<String> =
                    keys.into_iter().filter(|k| *k != self.recent_key).collect();
                if sorted {
                    keys.sort();
                }
                keys
            })
            .into()
    }

    // == Size ==
    /// Number of stored entries, excluding the recency entry.
    pub fn size(&self) -> Outcome<usize> {
        let count = || -> std::result::Result<usize, StorageError> {
            let len = self.storage.len()?;
            let reserved = usize::from(self.storage.get(&self.recent_key)?.is_some());
            Ok(len.saturating_sub(reserved))
        };
        count().into()
    }

    // == Clear ==
    /// Clears the whole provider, recency entry included.
    pub fn clear(&mut self) -> Outcome<()> {
        match self.storage.clear() {
            Ok(()) => {
                info!("Store cleared");
                Outcome::Done(())
            }
            Err(e) => {
                warn!(error = %e, "Storage clear failed");
                Outcome::degraded((), e)
            }
        }
    }

    // == Availability ==
    /// Probes the provider with a write, read and delete.
    pub fn is_available(&mut self) -> bool {
        probe(self.storage.as_mut())
    }

    // == Stats ==
    /// Returns current counters.
    pub fn stats(&self) -> StoreStats {
        let mut stats = self.stats.clone();
        stats.set_total_entries(self.size().into_value());
        stats
    }

    // == Iteration ==
    /// Iterates over stored `(key, value)` pairs without recording usage.
    ///
    /// Keys are listed when the iterator is created; values are read as the
    /// iterator advances. Missing and `Null` values are skipped.
    pub fn iter(&self) -> Entries<'_> {
        let keys = match self.storage.keys() {
            Ok(keys) => keys,
            Err(e) => {
                warn!(error = %e, "Could not list keys for iteration");
                Vec::new()
            }
        };

        Entries {
            store: self,
            keys: keys.into_iter(),
        }
    }

    // == Recency Bookkeeping ==
    fn read_recent(&self) -> std::result::Result<RecencyList, StorageError> {
        let raw = self.storage.get(&self.recent_key)?;
        Ok(RecencyList::decode(raw.as_deref(), &self.delimiter))
    }

    /// Writes the recency list, evicting to make room if needed.
    fn write_recent(&mut self, recent: &RecencyList) {
        let encoded = recent.encode(&self.delimiter);

        match self.storage.set(&self.recent_key, &encoded) {
            Ok(()) => {}
            Err(e) if e.is_quota() => {
                let recent_key = self.recent_key.clone();
                if let Err(e) = self.trim(&recent_key, &encoded) {
                    warn!(error = %e, "Could not make room for the recency list");
                }
            }
            Err(e) => warn!(error = %e, "Could not write the recency list"),
        }
    }

    // == Record Usage ==
    /// Moves `key` to the front of the recency list.
    fn record_usage(&mut self, key: &str) {
        let mut recent = match self.read_recent() {
            Ok(recent) => recent,
            Err(e) => {
                warn!(key, error = %e, "Could not read recency list, starting fresh");
                RecencyList::default()
            }
        };

        recent.touch(key, self.max_size);
        self.write_recent(&recent);
    }

    // == Trim ==
    /// Alternates eviction passes with retries of one write.
    ///
    /// Returns the attempt that succeeded and the entries evicted on the way,
    /// or the last provider error after `MAX_TRIM_ATTEMPTS` attempts.
    fn trim(&mut self, key: &str, value: &str) -> std::result::Result<(usize, usize), StorageError> {
        let mut evicted = 0;
        let mut last_error = StorageError::QuotaExceeded(format!("no room for {:?}", key));

        for attempt in 1..=MAX_TRIM_ATTEMPTS {
            evicted += self.trim_old_entries();

            match self.storage.set(key, value) {
                Ok(()) => {
                    debug!(key, attempt, evicted, "Write succeeded after eviction");
                    return Ok((attempt, evicted));
                }
                Err(e) if e.is_quota() => {
                    debug!(key, attempt, "Still no room after eviction pass");
                    last_error = e;
                }
                Err(e) => return Err(e),
            }
        }

        Err(last_error)
    }

    // == Trim Old Entries ==
    /// Runs one eviction pass, deleting directly through the provider.
    ///
    /// Returns the number of entries deleted.
    fn trim_old_entries(&mut self) -> usize {
        let keys = match self.storage.keys() {
            Ok(keys) => keys,
            Err(e) => {
                warn!(error = %e, "Could not list keys for eviction");
                return 0;
            }
        };
        if keys.is_empty() {
            return 0;
        }

        let recent = self.read_recent().unwrap_or_default();
        let mut pass = EvictionPass::new(keys, recent.as_slice(), &self.recent_key);
        let admit = self.is_candidate.as_deref();

        while let Some(draw) = pass.draw(&mut self.rng, admit) {
            let Draw::Evict(key) = draw else {
                continue;
            };

            match self.storage.remove(&key) {
                Ok(()) => {
                    debug!(key = key.as_str(), "Evicted entry");
                    pass.record_deletion();
                }
                Err(e) => warn!(key = key.as_str(), error = %e, "Eviction delete failed"),
            }
        }

        let deleted = pass.deleted();
        debug!(deleted, draws = pass.draws(), "Eviction pass finished");
        self.stats.record_pass(deleted);
        deleted
    }
}

// == Entries Iterator ==
/// Iterator returned by [`RecentStore::iter`].
pub struct Entries<'a> {
    store: &'a RecentStore,
    keys: std::vec::IntoIter<String>,
}

impl Iterator for Entries<'_> {
    type Item = (String, Value);

    fn next(&mut self) -> Option<Self::Item> {
        for key in self.keys.by_ref() {
            if key == self.store.recent_key {
                continue;
            }

            let raw = match self.store.storage.get(&key) {
                Ok(raw) => raw,
                Err(e) => {
                    debug!(key = key.as_str(), error = %e, "Skipping unreadable entry");
                    continue;
                }
            };

            match self.store.codec.deserialize(raw.as_deref()) {
                Some(value) if !value.is_null() => return Some((key, value)),
                _ => continue,
            }
        }
        None
    }
}

impl<'a> IntoIterator for &'a RecentStore {
    type Item = (String, Value);
    type IntoIter = Entries<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
