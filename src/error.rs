//! Error types for the recent store
//!
//! Provides unified error handling using thiserror. Only `StoreError` is ever
//! returned as an `Err` from the store; `StorageError` travels inside degraded
//! outcomes; `ApiError` maps both onto HTTP responses.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::models::ErrorResponse;

// == Store Error Enum ==
/// Errors a caller must be prepared to handle.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// Attempt to write or delete the reserved recency key
    #[error("Reserved key: {0}")]
    ReservedKey(String),

    /// Key contains the recency list delimiter
    #[error("Invalid key: {0}")]
    InvalidKey(String),

    /// Rejected configuration, raised at construction
    #[error("Invalid configuration: {0}")]
    Config(String),
}

// == Storage Error Enum ==
/// Faults raised by a storage provider or the structural codec.
///
/// These never escape as errors from the store; they are absorbed, logged and
/// reported through `Lookup`, `Write` and `Outcome`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StorageError {
    /// Provider refused a write because it is full
    #[error("Quota exceeded: {0}")]
    QuotaExceeded(String),

    /// Provider cannot be reached or is disabled
    #[error("Storage unavailable: {0}")]
    Unavailable(String),

    /// Underlying I/O failed
    #[error("I/O error: {0}")]
    Io(String),

    /// Structural serializer rejected a value
    #[error("Serialization failed: {0}")]
    Serialization(String),
}

impl StorageError {
    /// True for the capacity fault that triggers eviction.
    pub fn is_quota(&self) -> bool {
        matches!(self, StorageError::QuotaExceeded(_))
    }
}

impl From<std::io::Error> for StorageError {
    fn from(err: std::io::Error) -> Self {
        StorageError::Io(err.to_string())
    }
}

// == API Error Enum ==
/// Errors surfaced by the HTTP handlers.
#[derive(Error, Debug)]
pub enum ApiError {
    /// Caller-contract or configuration error from the store
    #[error(transparent)]
    Store(#[from] StoreError),

    /// Malformed request body
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Key not present
    #[error("Key not found: {0}")]
    NotFound(String),

    /// Storage provider faulted while serving a read
    #[error("Storage degraded: {0}")]
    Degraded(#[from] StorageError),
}

// == IntoResponse Implementation ==
impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            ApiError::Store(StoreError::ReservedKey(_)) => StatusCode::CONFLICT,
            ApiError::Store(StoreError::InvalidKey(_)) => StatusCode::BAD_REQUEST,
            ApiError::Store(StoreError::Config(_)) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Degraded(_) => StatusCode::SERVICE_UNAVAILABLE,
        };

        let body = Json(ErrorResponse::new(self.to_string()));

        (status, body).into_response()
    }
}

// == Result Type Alias ==
/// Convenience Result type for store operations.
pub type Result<T> = std::result::Result<T, StoreError>;

/// Result type for HTTP handlers.
pub type ApiResult<T> = std::result::Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = StoreError::ReservedKey("__recent".to_string());
        assert_eq!(err.to_string(), "Reserved key: __recent");

        let err = StorageError::QuotaExceeded("10 entries".to_string());
        assert_eq!(err.to_string(), "Quota exceeded: 10 entries");
    }

    #[test]
    fn test_is_quota() {
        assert!(StorageError::QuotaExceeded("full".into()).is_quota());
        assert!(!StorageError::Unavailable("gone".into()).is_quota());
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err: StorageError = io_err.into();
        assert!(matches!(err, StorageError::Io(_)));
    }

    #[test]
    fn test_error_status_codes() {
        let cases = vec![
            (ApiError::from(StoreError::ReservedKey("k".into())), StatusCode::CONFLICT),
            (ApiError::from(StoreError::InvalidKey("k".into())), StatusCode::BAD_REQUEST),
            (
                ApiError::from(StoreError::Config("c".into())),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
            (ApiError::InvalidRequest("bad".into()), StatusCode::BAD_REQUEST),
            (ApiError::NotFound("k".into()), StatusCode::NOT_FOUND),
            (
                ApiError::from(StorageError::Unavailable("down".into())),
                StatusCode::SERVICE_UNAVAILABLE,
            ),
        ];

        for (error, expected) in cases {
            assert_eq!(error.into_response().status(), expected);
        }
    }
}
