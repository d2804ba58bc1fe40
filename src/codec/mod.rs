//! Codec Module
//!
//! Turns typed values into prefixed strings and back.
//!
//! Wire format: `<prefix><delimiter><payload>` for every non-string kind, the
//! bare text for plain strings. Decoding never fails: anything that does not
//! parse comes back as a string.

mod prefix;
mod structured;
mod value;

use std::fmt;
use std::str::FromStr;

use chrono::DateTime;
use num_bigint::BigInt;
use tracing::debug;

use crate::error::{StorageError, StoreError};

pub use prefix::TypePrefixes;
pub use structured::{JsonCodec, StructuredCodec};
pub use value::{Value, ValueKind};

use prefix::PrefixKind;
pub(crate) use value::integral_value;
use value::format_float;

// == Codec ==
/// Serializer for `Value`s with a validated prefix table.
pub struct Codec {
    /// Delimiter-suffixed prefixes in matching order
    prefixes: Vec<(PrefixKind, String)>,
    structured: Box<dyn StructuredCodec>,
    parse_existing_json: bool,
}

impl fmt::Debug for Codec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Codec")
            .field("prefixes", &self.prefixes)
            .field("parse_existing_json", &self.parse_existing_json)
            .finish_non_exhaustive()
    }
}

impl Codec {
    // == Constructor ==
    /// Builds a codec, failing if two prefixes collide after suffixing.
    ///
    /// # Arguments
    /// * `prefixes` - Tag per non-string kind
    /// * `delimiter` - Appended to every prefix before matching
    /// * `structured` - Codec used for the `object` kind
    /// * `parse_existing_json` - Probe unprefixed strings as JSON on read
    pub fn new(
        prefixes: &TypePrefixes,
        delimiter: &str,
        structured: Box<dyn StructuredCodec>,
        parse_existing_json: bool,
    ) -> Result<Self, StoreError> {
        Ok(Self {
            prefixes: prefixes.resolve(delimiter)?,
            structured,
            parse_existing_json,
        })
    }

    fn prefix(&self, kind: PrefixKind) -> &str {
        self.prefixes
            .iter()
            .find(|(k, _)| *k == kind)
            .map(|(_, p)| p.as_str())
            .unwrap_or_default()
    }

    fn tagged(&self, kind: PrefixKind, payload: &str) -> String {
        format!("{}{}", self.prefix(kind), payload)
    }

    // == Serialize ==
    /// Encodes a value for the store.
    ///
    /// Integral floats are classified by value and encoded as `int`.
    pub fn serialize(&self, value: &Value) -> Result<String, StorageError> {
        let encoded = match value {
            Value::String(s) => s.clone(),
            Value::Int(i) => self.tagged(PrefixKind::Int, &i.to_string()),
            Value::Float(f) => match integral_value(*f) {
                Some(i) => self.tagged(PrefixKind::Int, &i.to_string()),
                None => self.tagged(PrefixKind::Float, &format_float(*f)),
            },
            Value::Date(d) => self.tagged(PrefixKind::Date, &d.timestamp_millis().to_string()),
            Value::BigInt(b) => self.tagged(PrefixKind::BigInt, &b.to_string()),
            Value::Null => self.tagged(PrefixKind::Object, "null"),
            Value::Structured(json) => {
                let payload = self.structured.serialize(json)?;
                self.tagged(PrefixKind::Object, &payload)
            }
        };
        Ok(encoded)
    }

    // == Deserialize ==
    /// Decodes a stored string; `None` in gives `None` out.
    pub fn deserialize(&self, raw: Option<&str>) -> Option<Value> {
        let raw = raw?;

        for (kind, prefix) in &self.prefixes {
            if let Some(payload) = raw.strip_prefix(prefix.as_str()) {
                return Some(self.decode_payload(*kind, payload));
            }
        }

        if self.parse_existing_json {
            if let Some(json) = self.structured.deserialize(raw) {
                return Some(Value::from_json(json));
            }
        }

        Some(Value::String(raw.to_string()))
    }

    fn decode_payload(&self, kind: PrefixKind, payload: &str) -> Value {
        let decoded = match kind {
            PrefixKind::Object => self.structured.deserialize(payload).map(Value::from),
            PrefixKind::Int => payload.parse::<i64>().ok().map(Value::Int),
            PrefixKind::Float => payload.parse::<f64>().ok().map(Value::Float),
            PrefixKind::Date => payload
                .parse::<i64>()
                .ok()
                .and_then(DateTime::from_timestamp_millis)
                .map(Value::Date),
            PrefixKind::BigInt => BigInt::from_str(payload).ok().map(Value::BigInt),
        };

        decoded.unwrap_or_else(|| {
            debug!(?kind, "Payload did not parse, returning raw text");
            Value::String(payload.to_string())
        })
    }
}
