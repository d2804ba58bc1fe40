//! Structured Codec Module
//!
//! Pluggable serializer/deserializer pair for the `object` kind.

use crate::error::StorageError;

// == Structured Codec ==
/// Encodes structured data (objects, arrays, booleans) as text.
pub trait StructuredCodec: Send + Sync {
    /// Encodes a document. Failure drops the write that asked for it.
    fn serialize(&self, value: &serde_json::Value) -> Result<String, StorageError>;

    /// Decodes a document, `None` when the text is not valid for this codec.
    fn deserialize(&self, raw: &str) -> Option<serde_json::Value>;
}

// == JSON Codec ==
/// Default codec backed by serde_json.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonCodec;

impl StructuredCodec for JsonCodec {
    fn serialize(&self, value: &serde_json::Value) -> Result<String, StorageError> {
        serde_json::to_string(value).map_err(|e| StorageError::Serialization(e.to_string()))
    }

    fn deserialize(&self, raw: &str) -> Option<serde_json::Value> {
        serde_json::from_str(raw).ok()
    }
}
