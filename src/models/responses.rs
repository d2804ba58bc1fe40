//! Response DTOs for the store server API
//!
//! Defines the structure of outgoing HTTP response bodies.

use serde::Serialize;

use crate::codec::{Value, ValueKind};
use crate::store::{StoreStats, Write};

/// Response body for the GET operation (GET /get/:key)
#[derive(Debug, Clone, Serialize)]
pub struct GetResponse {
    /// The requested key
    pub key: String,
    /// Kind of the stored value
    pub kind: ValueKind,
    /// The stored value rendered as JSON
    pub value: serde_json::Value,
}

impl GetResponse {
    /// Creates a new GetResponse
    pub fn new(key: impl Into<String>, value: &Value) -> Self {
        Self {
            key: key.into(),
            kind: value.kind(),
            value: value.to_json(),
        }
    }
}

/// Response body for the SET operation (PUT /set)
///
/// A write the store had to give up on is still a 200; `stored` is false and
/// `message` carries the cause.
#[derive(Debug, Clone, Serialize)]
pub struct SetResponse {
    /// Outcome message
    pub message: String,
    /// The key that was set
    pub key: String,
    /// Whether the value is now in the store
    pub stored: bool,
    /// Entries evicted to make room
    pub evicted: usize,
}

impl SetResponse {
    /// Creates a new SetResponse from a write outcome
    pub fn new(key: impl Into<String>, write: &Write) -> Self {
        let key = key.into();
        let (message, stored, evicted) = match write {
            Write::Stored => (format!("Key '{}' set successfully", key), true, 0),
            Write::StoredAfterEviction { attempts, evicted } => (
                format!(
                    "Key '{}' set after evicting {} entries in {} attempts",
                    key, evicted, attempts
                ),
                true,
                *evicted,
            ),
            Write::Dropped(cause) => (format!("Key '{}' dropped: {}", key, cause), false, 0),
        };
        Self {
            message,
            key,
            stored,
            evicted,
        }
    }
}

/// Response body for the DELETE operation (DELETE /del/:key)
#[derive(Debug, Clone, Serialize)]
pub struct DeleteResponse {
    /// Success message
    pub message: String,
    /// The key that was deleted
    pub key: String,
}

impl DeleteResponse {
    /// Creates a new DeleteResponse
    pub fn new(key: impl Into<String>) -> Self {
        let key = key.into();
        Self {
            message: format!("Key '{}' deleted successfully", key),
            key,
        }
    }
}

/// Response body for DELETE /prefix/:prefix
#[derive(Debug, Clone, Serialize)]
pub struct PrefixDeleteResponse {
    pub prefix: String,
    /// Number of keys removed
    pub deleted: usize,
}

/// Response body for key listings (GET /keys, GET /recent)
#[derive(Debug, Clone, Serialize)]
pub struct KeysResponse {
    pub keys: Vec<String>,
    pub count: usize,
}

impl KeysResponse {
    pub fn new(keys: Vec<String>) -> Self {
        Self {
            count: keys.len(),
            keys,
        }
    }
}

/// Response body for POST /clear
#[derive(Debug, Clone, Serialize)]
pub struct ClearResponse {
    pub message: String,
}

impl ClearResponse {
    pub fn cleared() -> Self {
        Self {
            message: "Store cleared".to_string(),
        }
    }
}

/// Response body for the stats endpoint (GET /stats)
#[derive(Debug, Clone, Serialize)]
pub struct StatsResponse {
    /// Reads that found a value
    pub hits: u64,
    /// Reads that found nothing
    pub misses: u64,
    /// Entries removed by eviction
    pub evictions: u64,
    /// Eviction passes run
    pub eviction_passes: u64,
    /// Writes given up on
    pub dropped_writes: u64,
    /// Current number of entries in the store
    pub total_entries: usize,
    /// Hit rate (hits / (hits + misses))
    pub hit_rate: f64,
}

impl From<StoreStats> for StatsResponse {
    fn from(stats: StoreStats) -> Self {
        Self {
            hit_rate: stats.hit_rate(),
            hits: stats.hits,
            misses: stats.misses,
            evictions: stats.evictions,
            eviction_passes: stats.eviction_passes,
            dropped_writes: stats.dropped_writes,
            total_entries: stats.total_entries,
        }
    }
}

/// Response body for the health endpoint (GET /health)
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// "healthy", or "degraded" when the storage probe fails
    pub status: String,
    /// Result of the storage write/read/delete probe
    pub storage_available: bool,
    /// Current timestamp in ISO 8601 format
    pub timestamp: String,
}

impl HealthResponse {
    /// Creates a new HealthResponse with current timestamp
    pub fn new(storage_available: bool) -> Self {
        let status = if storage_available { "healthy" } else { "degraded" };
        Self {
            status: status.to_string(),
            storage_available,
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}

/// Error response body for all error conditions
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    /// Error message describing what went wrong
    pub error: String,
}

impl ErrorResponse {
    /// Creates a new ErrorResponse
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}
