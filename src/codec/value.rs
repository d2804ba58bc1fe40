//! Value Module
//!
//! The closed set of value kinds the store accepts.

use chrono::{DateTime, SecondsFormat, Utc};
use num_bigint::BigInt;
use serde::{Deserialize, Serialize};

// == Value ==
/// A typed value that survives a round trip through a string-only store.
///
/// Booleans, arrays and objects are carried as `Structured` JSON.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    String(String),
    Int(i64),
    Float(f64),
    /// Millisecond precision is kept; anything finer is dropped on write.
    Date(DateTime<Utc>),
    BigInt(BigInt),
    Structured(serde_json::Value),
}

// == Value Kind ==
/// Tag naming a `Value` variant, used by the HTTP models.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueKind {
    Null,
    String,
    Int,
    Float,
    Date,
    BigInt,
    Json,
}

impl Value {
    /// Returns the kind tag of this value.
    pub fn kind(&self) -> ValueKind {
        match self {
            Value::Null => ValueKind::Null,
            Value::String(_) => ValueKind::String,
            Value::Int(_) => ValueKind::Int,
            Value::Float(_) => ValueKind::Float,
            Value::Date(_) => ValueKind::Date,
            Value::BigInt(_) => ValueKind::BigInt,
            Value::Structured(_) => ValueKind::Json,
        }
    }

    /// Returns the inner text of a `String` value.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// True for `Null`.
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    // == JSON Mapping ==
    /// Maps a parsed JSON document onto the closest value kind.
    ///
    /// Numbers become `Int` when they fit an `i64`, strings become `String`,
    /// `null` becomes `Null`; everything else stays `Structured`.
    pub fn from_json(json: serde_json::Value) -> Self {
        match json {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::String(s) => Value::String(s),
            serde_json::Value::Number(n) => match (n.as_i64(), n.as_f64()) {
                (Some(i), _) => Value::Int(i),
                (None, Some(f)) => Value::Float(f),
                (None, None) => Value::Structured(serde_json::Value::Number(n)),
            },
            other => Value::Structured(other),
        }
    }

    /// Renders the value as JSON for transport.
    ///
    /// Dates become RFC 3339 strings, big integers and non-finite floats
    /// become strings.
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Value::Null => serde_json::Value::Null,
            Value::String(s) => serde_json::Value::String(s.clone()),
            Value::Int(i) => serde_json::Value::from(*i),
            Value::Float(f) => serde_json::Number::from_f64(*f)
                .map(serde_json::Value::Number)
                .unwrap_or_else(|| serde_json::Value::String(format_float(*f))),
            Value::Date(d) => {
                serde_json::Value::String(d.to_rfc3339_opts(SecondsFormat::Millis, true))
            }
            Value::BigInt(b) => serde_json::Value::String(b.to_string()),
            Value::Structured(json) => json.clone(),
        }
    }
}

// == Numeric Helpers ==
/// Returns the integer a float holds exactly, if any.
///
/// Negative zero and values outside the `i64` range are not integral here,
/// so they keep their float encoding and round-trip bit for bit.
pub(crate) fn integral_value(f: f64) -> Option<i64> {
    if !f.is_finite() || f.fract() != 0.0 {
        return None;
    }
    if f == 0.0 && f.is_sign_negative() {
        return None;
    }
    // 2^63 is exactly representable; the i64 range is [-2^63, 2^63)
    const BOUND: f64 = 9_223_372_036_854_775_808.0;
    if (-BOUND..BOUND).contains(&f) {
        Some(f as i64)
    } else {
        None
    }
}

/// Formats a float the way the wire format expects.
pub(crate) fn format_float(f: f64) -> String {
    if f.is_nan() {
        "NaN".to_string()
    } else if f == f64::INFINITY {
        "Infinity".to_string()
    } else if f == f64::NEG_INFINITY {
        "-Infinity".to_string()
    } else {
        f.to_string()
    }
}

// == Conversions ==
impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Int(i)
    }
}

impl From<i32> for Value {
    fn from(i: i32) -> Self {
        Value::Int(i64::from(i))
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Float(f)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Structured(serde_json::Value::Bool(b))
    }
}

impl From<DateTime<Utc>> for Value {
    fn from(d: DateTime<Utc>) -> Self {
        Value::Date(d)
    }
}

impl From<BigInt> for Value {
    fn from(b: BigInt) -> Self {
        Value::BigInt(b)
    }
}

impl From<serde_json::Value> for Value {
    fn from(json: serde_json::Value) -> Self {
        match json {
            serde_json::Value::Null => Value::Null,
            other => Value::Structured(other),
        }
    }
}
