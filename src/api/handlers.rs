//! API Handlers
//!
//! HTTP request handlers for each store server endpoint.

use std::sync::Arc;
use tokio::sync::RwLock;

use anyhow::Context;
use axum::{
    extract::{Path, State},
    Json,
};
use tracing::warn;

use crate::config::Config;
use crate::error::{ApiError, ApiResult};
use crate::models::{
    ClearResponse, DeleteResponse, GetResponse, HealthResponse, KeysResponse,
    PrefixDeleteResponse, SetRequest, SetResponse, StatsResponse,
};
use crate::storage::{FileStorage, MemoryStorage, Storage};
use crate::store::{Lookup, Outcome, RecentStore};

/// Application state shared across all handlers.
///
/// Contains the store wrapped in Arc<RwLock<>> for thread-safe access.
#[derive(Clone)]
pub struct AppState {
    /// Thread-safe recent store
    pub store: Arc<RwLock<RecentStore>>,
}

impl AppState {
    /// Creates a new AppState with the given store.
    pub fn new(store: RecentStore) -> Self {
        Self {
            store: Arc::new(RwLock::new(store)),
        }
    }

    /// Creates a new AppState from configuration.
    ///
    /// Opens a `FileStorage` when `storage_path` is set and a `MemoryStorage`
    /// of `fallback_capacity` entries otherwise. A file that cannot be opened
    /// is fatal unless fallback is enabled.
    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        let storage: Box<dyn Storage> = match &config.storage_path {
            Some(path) => match FileStorage::open(path, config.storage_quota_bytes) {
                Ok(storage) => Box::new(storage),
                Err(e) if config.store.use_fallback_if_unavailable => {
                    warn!(path = %path.display(), error = %e, "Could not open file storage, using memory");
                    Box::new(MemoryStorage::new(config.store.fallback_capacity))
                }
                Err(e) => {
                    return Err(e)
                        .with_context(|| format!("Failed to open storage at {}", path.display()))
                }
            },
            None => Box::new(MemoryStorage::new(config.store.fallback_capacity)),
        };

        let store = RecentStore::builder_boxed(storage)
            .config(config.store.clone())
            .build()
            .context("Invalid store configuration")?;

        Ok(Self::new(store))
    }
}

/// Unwraps an outcome, turning a degraded one into a 503.
fn done<T>(outcome: Outcome<T>) -> ApiResult<T> {
    match outcome {
        Outcome::Done(value) => Ok(value),
        Outcome::Degraded { cause, .. } => Err(ApiError::Degraded(cause)),
    }
}

/// Handler for PUT /set
///
/// Stores a typed value under a key.
pub async fn set_handler(
    State(state): State<AppState>,
    Json(req): Json<SetRequest>,
) -> ApiResult<Json<SetResponse>> {
    // Validate request
    if let Some(error_msg) = req.validate() {
        return Err(ApiError::InvalidRequest(error_msg));
    }
    let value = req.to_value().map_err(ApiError::InvalidRequest)?;

    // Acquire write lock and set the value
    let mut store = state.store.write().await;
    let write = store.set(&req.key, value)?;

    Ok(Json(SetResponse::new(req.key, &write)))
}

/// Handler for GET /get/:key
///
/// Retrieves a value by key.
pub async fn get_handler(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> ApiResult<Json<GetResponse>> {
    // Acquire write lock (reads update the recency list)
    let mut store = state.store.write().await;

    match store.get(&key) {
        Lookup::Found(value) => Ok(Json(GetResponse::new(key, &value))),
        Lookup::NotFound => Err(ApiError::NotFound(key)),
        Lookup::Degraded(cause) => Err(ApiError::Degraded(cause)),
    }
}

/// Handler for DELETE /del/:key
pub async fn delete_handler(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> ApiResult<Json<DeleteResponse>> {
    let mut store = state.store.write().await;
    done(store.delete(&key)?)?;

    Ok(Json(DeleteResponse::new(key)))
}

/// Handler for DELETE /prefix/:prefix
pub async fn delete_prefix_handler(
    State(state): State<AppState>,
    Path(prefix): Path<String>,
) -> ApiResult<Json<PrefixDeleteResponse>> {
    let mut store = state.store.write().await;
    let deleted = done(store.delete_prefix(&prefix))?;

    Ok(Json(PrefixDeleteResponse { prefix, deleted }))
}

/// Handler for GET /keys
///
/// Lists stored keys in sorted order.
pub async fn keys_handler(State(state): State<AppState>) -> ApiResult<Json<KeysResponse>> {
    let store = state.store.read().await;
    let keys = done(store.keys(true))?;

    Ok(Json(KeysResponse::new(keys)))
}

/// Handler for GET /recent
///
/// Lists the recency window, most recent first.
pub async fn recent_handler(State(state): State<AppState>) -> ApiResult<Json<KeysResponse>> {
    let store = state.store.read().await;
    let keys = done(store.recent())?;

    Ok(Json(KeysResponse::new(keys)))
}

/// Handler for POST /clear
pub async fn clear_handler(State(state): State<AppState>) -> ApiResult<Json<ClearResponse>> {
    let mut store = state.store.write().await;
    done(store.clear())?;

    Ok(Json(ClearResponse::cleared()))
}

/// Handler for GET /stats
///
/// Returns current store statistics.
pub async fn stats_handler(State(state): State<AppState>) -> Json<StatsResponse> {
    // Acquire read lock for stats
    let store = state.store.read().await;

    Json(StatsResponse::from(store.stats()))
}

/// Handler for GET /health
///
/// Probes the storage provider and reports the result.
pub async fn health_handler(State(state): State<AppState>) -> Json<HealthResponse> {
    // The probe writes, so it needs the write lock
    let mut store = state.store.write().await;

    Json(HealthResponse::new(store.is_available()))
}
