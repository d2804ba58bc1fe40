//! Store Statistics Module
//!
//! Tracks reads, evictions and dropped writes.

use serde::Serialize;

// == Store Stats ==
/// Operational counters for one `RecentStore`.
#[derive(Debug, Clone, Default, Serialize)]
pub struct StoreStats {
    /// Reads that found a value
    pub hits: u64,
    /// Reads that found nothing or hit a provider fault
    pub misses: u64,
    /// Entries deleted by eviction passes
    pub evictions: u64,
    /// Eviction passes run
    pub eviction_passes: u64,
    /// Writes given up on after eviction could not make room
    pub dropped_writes: u64,
    /// Current number of entries, excluding the recency entry
    pub total_entries: usize,
}

impl StoreStats {
    // == Constructor ==
    /// Creates a new StoreStats with all counters at zero.
    pub fn new() -> Self {
        Self::default()
    }

    // == Hit Rate ==
    /// Returns hits / (hits + misses), or 0.0 if no reads have been made.
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }

    pub fn record_hit(&mut self) {
        self.hits += 1;
    }

    pub fn record_miss(&mut self) {
        self.misses += 1;
    }

    // == Record Pass ==
    /// Counts one eviction pass and the entries it removed.
    pub fn record_pass(&mut self, evicted: usize) {
        self.eviction_passes += 1;
        self.evictions += evicted as u64;
    }

    pub fn record_dropped_write(&mut self) {
        self.dropped_writes += 1;
    }

    pub fn set_total_entries(&mut self, count: usize) {
        self.total_entries = count;
    }
}
