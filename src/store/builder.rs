//! Store Builder Module
//!
//! Validates configuration and assembles a `RecentStore`.

use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{info, warn};

use crate::codec::{Codec, JsonCodec, StructuredCodec, TypePrefixes};
use crate::config::StoreConfig;
use crate::error::{Result, StoreError};
use crate::storage::{probe, MemoryStorage, Storage};
use crate::store::evict::Admission;
use crate::store::RecentStore;

// == Builder ==
/// Builder for [`RecentStore`].
///
/// ```ignore
/// let store = RecentStore::builder(MemoryStorage::new(100))
///     .max_size(16)
///     .is_candidate(|key, _recent| !key.starts_with("pinned:"))
///     .build()?;
/// ```
pub struct RecentStoreBuilder {
    storage: Box<dyn Storage>,
    config: StoreConfig,
    is_candidate: Option<Box<Admission>>,
    structured: Box<dyn StructuredCodec>,
    seed: Option<u64>,
}

impl RecentStoreBuilder {
    pub(crate) fn new(storage: Box<dyn Storage>) -> Self {
        Self {
            storage,
            config: StoreConfig::default(),
            is_candidate: None,
            structured: Box::new(JsonCodec),
            seed: None,
        }
    }

    /// Replaces all plain-data options at once.
    pub fn config(mut self, config: StoreConfig) -> Self {
        self.config = config;
        self
    }

    pub fn max_size(mut self, max_size: usize) -> Self {
        self.config.max_size = max_size;
        self
    }

    pub fn recent_key(mut self, recent_key: impl Into<String>) -> Self {
        self.config.recent_key = recent_key.into();
        self
    }

    pub fn delimiter(mut self, delimiter: impl Into<String>) -> Self {
        self.config.delimiter = delimiter.into();
        self
    }

    /// Sets the admission predicate consulted before every eviction.
    pub fn is_candidate<F>(mut self, predicate: F) -> Self
    where
        F: Fn(&str, &[String]) -> bool + Send + Sync + 'static,
    {
        self.is_candidate = Some(Box::new(predicate));
        self
    }

    /// Replaces the JSON codec used for structured values.
    pub fn structured_codec(mut self, codec: impl StructuredCodec + 'static) -> Self {
        self.structured = Box::new(codec);
        self
    }

    pub fn parse_existing_json(mut self, enabled: bool) -> Self {
        self.config.parse_existing_json = enabled;
        self
    }

    pub fn type_prefixes(mut self, prefixes: TypePrefixes) -> Self {
        self.config.type_prefixes = prefixes;
        self
    }

    pub fn type_prefix_delimiter(mut self, delimiter: impl Into<String>) -> Self {
        self.config.type_prefix_delimiter = delimiter.into();
        self
    }

    pub fn use_fallback_if_unavailable(mut self, enabled: bool) -> Self {
        self.config.use_fallback_if_unavailable = enabled;
        self
    }

    pub fn fallback_capacity(mut self, capacity: usize) -> Self {
        self.config.fallback_capacity = capacity;
        self
    }

    /// Seeds the eviction RNG for reproducible victim selection.
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    fn validate(config: &StoreConfig) -> Result<()> {
        if config.max_size == 0 {
            return Err(StoreError::Config("max_size must be at least 1".to_string()));
        }
        if config.delimiter.is_empty() {
            return Err(StoreError::Config("delimiter must not be empty".to_string()));
        }
        if config.recent_key.is_empty() {
            return Err(StoreError::Config("recent_key must not be empty".to_string()));
        }
        if config.recent_key.contains(config.delimiter.as_str()) {
            return Err(StoreError::Config(format!(
                "recent_key {:?} contains the delimiter",
                config.recent_key
            )));
        }
        Ok(())
    }

    // == Build ==
    /// Validates the options and creates the store.
    ///
    /// With `use_fallback_if_unavailable`, a provider that fails the probe is
    /// replaced by a `MemoryStorage` of `fallback_capacity` entries.
    pub fn build(self) -> Result<RecentStore> {
        let RecentStoreBuilder {
            mut storage,
            config,
            is_candidate,
            structured,
            seed,
        } = self;

        Self::validate(&config)?;
        let codec = Codec::new(
            &config.type_prefixes,
            &config.type_prefix_delimiter,
            structured,
            config.parse_existing_json,
        )?;

        if config.use_fallback_if_unavailable && !probe(storage.as_mut()) {
            warn!(
                "Storage provider unavailable, falling back to memory storage with {} entries",
                config.fallback_capacity
            );
            storage = Box::new(MemoryStorage::new(config.fallback_capacity));
        }

        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        info!(
            "Recent store ready: max_size={}, recent_key={:?}",
            config.max_size, config.recent_key
        );

        Ok(RecentStore {
            storage,
            codec,
            max_size: config.max_size,
            recent_key: config.recent_key,
            delimiter: config.delimiter,
            is_candidate,
            rng,
            stats: Default::default(),
        })
    }
}
