//! API Module
//!
//! HTTP handlers and routing for the store server REST API.
//!
//! # Endpoints
//! - `PUT /set` - Store a typed value
//! - `GET /get/:key` - Retrieve a value by key
//! - `DELETE /del/:key` - Delete a key
//! - `DELETE /prefix/:prefix` - Delete every key with a prefix
//! - `GET /keys` - List stored keys
//! - `GET /recent` - List the recency window
//! - `POST /clear` - Remove everything
//! - `GET /stats` - Get store statistics
//! - `GET /health` - Health check with storage probe

pub mod handlers;
pub mod routes;

pub use handlers::*;
pub use routes::create_router;
