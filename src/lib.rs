//! Recent Store - typed key/value access over quota-limited storage
//!
//! Keeps a bounded list of recently used keys in the store itself and evicts
//! other entries at random whenever the storage provider runs out of room.

pub mod api;
pub mod codec;
pub mod config;
pub mod error;
pub mod models;
pub mod storage;
pub mod store;

pub use api::AppState;
pub use codec::{Value, ValueKind};
pub use config::{Config, StoreConfig};
pub use error::{StorageError, StoreError};
pub use storage::{FileStorage, MemoryStorage, Storage};
pub use store::{Lookup, Outcome, RecentStore, Write};
