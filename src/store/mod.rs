//! Store Module
//!
//! Recency tracking and eviction on top of a `Storage` provider.

mod builder;
mod evict;
mod manager;
mod outcome;
mod recent;
mod stats;

#[cfg(test)]
mod property_tests;

// Re-export public types
pub use builder::RecentStoreBuilder;
pub use evict::{
    Admission, Draw, EvictionPass, MAX_DRAWS_PER_PASS, MAX_EVICTIONS_PER_PASS, MAX_TRIM_ATTEMPTS,
};
pub use manager::{Entries, RecentStore};
pub use outcome::{Lookup, Outcome, Write};
pub use recent::RecencyList;
pub use stats::StoreStats;
