//! Request DTOs for the store server API
//!
//! Defines the structure of incoming HTTP request bodies.

use std::str::FromStr;

use chrono::{DateTime, Utc};
use num_bigint::BigInt;
use serde::Deserialize;

use crate::codec::{Value, ValueKind};

/// Request body for the SET operation (PUT /set)
///
/// # Fields
/// - `key`: The key to store the value under
/// - `value`: Any JSON value
/// - `kind`: Optional kind forcing how `value` is read; derived from the JSON
///   value when absent
#[derive(Debug, Clone, Deserialize)]
pub struct SetRequest {
    /// The store key
    pub key: String,
    /// The value to store
    pub value: serde_json::Value,
    /// Optional value kind
    #[serde(default)]
    pub kind: Option<ValueKind>,
}

impl SetRequest {
    /// Validates the request data
    ///
    /// Returns an error message if validation fails, None if valid.
    pub fn validate(&self) -> Option<String> {
        if self.key.is_empty() {
            return Some("Key cannot be empty".to_string());
        }
        None
    }

    /// Converts the JSON value into a store value of the requested kind.
    pub fn to_value(&self) -> Result<Value, String> {
        let kind = match self.kind {
            Some(kind) => kind,
            None => return Ok(Value::from_json(self.value.clone())),
        };

        let mismatch = || format!("value {} is not a valid {:?}", self.value, kind);
        let json = &self.value;

        match kind {
            ValueKind::Null => Ok(Value::Null),
            ValueKind::String => json.as_str().map(Value::from).ok_or_else(mismatch),
            ValueKind::Int => json
                .as_i64()
                .or_else(|| json.as_str().and_then(|s| s.parse().ok()))
                .map(Value::Int)
                .ok_or_else(mismatch),
            ValueKind::Float => json
                .as_f64()
                .or_else(|| json.as_str().and_then(|s| s.parse().ok()))
                .map(Value::Float)
                .ok_or_else(mismatch),
            ValueKind::Date => match json {
                serde_json::Value::String(s) => DateTime::parse_from_rfc3339(s)
                    .map(|d| Value::Date(d.with_timezone(&Utc)))
                    .map_err(|_| mismatch()),
                _ => json
                    .as_i64()
                    .and_then(DateTime::from_timestamp_millis)
                    .map(Value::Date)
                    .ok_or_else(mismatch),
            },
            ValueKind::BigInt => {
                let text = match json {
                    serde_json::Value::String(s) => s.clone(),
                    serde_json::Value::Number(n) => n.to_string(),
                    _ => return Err(mismatch()),
                };
                BigInt::from_str(&text).map(Value::BigInt).map_err(|_| mismatch())
            }
            ValueKind::Json => Ok(Value::from(json.clone())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn request(value: serde_json::Value, kind: Option<ValueKind>) -> SetRequest {
        SetRequest {
            key: "k".to_string(),
            value,
            kind,
        }
    }

    #[test]
    fn test_set_request_deserialize() {
        let json = r#"{"key": "test", "value": "hello"}"#;
        let req: SetRequest = serde_json::from_str(json).unwrap();
        assert_eq!(req.key, "test");
        assert_eq!(req.value, json!("hello"));
        assert!(req.kind.is_none());
    }

    #[test]
    fn test_set_request_with_kind() {
        let json = r#"{"key": "test", "value": "12345678901234567890", "kind": "bigint"}"#;
        let req: SetRequest = serde_json::from_str(json).unwrap();
        assert_eq!(req.kind, Some(ValueKind::BigInt));
        assert_eq!(
            req.to_value().unwrap(),
            Value::BigInt(BigInt::from_str("12345678901234567890").unwrap())
        );
    }

    #[test]
    fn test_validate_empty_key() {
        let mut req = request(json!("x"), None);
        req.key = String::new();
        assert!(req.validate().is_some());
    }

    #[test]
    fn test_validate_valid_request() {
        assert!(request(json!("x"), None).validate().is_none());
    }

    #[test]
    fn test_derived_kinds() {
        assert_eq!(request(json!("x"), None).to_value().unwrap(), Value::from("x"));
        assert_eq!(request(json!(7), None).to_value().unwrap(), Value::Int(7));
        assert_eq!(request(json!(1.5), None).to_value().unwrap(), Value::Float(1.5));
        assert_eq!(request(json!(null), None).to_value().unwrap(), Value::Null);
        assert_eq!(
            request(json!([1, 2]), None).to_value().unwrap(),
            Value::Structured(json!([1, 2]))
        );
    }

    #[test]
    fn test_explicit_kinds() {
        let date = request(json!("2009-02-13T23:31:30.123Z"), Some(ValueKind::Date));
        assert_eq!(
            date.to_value().unwrap(),
            Value::Date(DateTime::from_timestamp_millis(1_234_567_890_123).unwrap())
        );

        let millis = request(json!(1_234_567_890_123i64), Some(ValueKind::Date));
        assert_eq!(date.to_value().unwrap(), millis.to_value().unwrap());

        let nan = request(json!("NaN"), Some(ValueKind::Float)).to_value().unwrap();
        assert!(matches!(nan, Value::Float(f) if f.is_nan()));

        assert_eq!(
            request(json!("42"), Some(ValueKind::Int)).to_value().unwrap(),
            Value::Int(42)
        );
        assert_eq!(
            request(json!("7"), Some(ValueKind::Json)).to_value().unwrap(),
            Value::Structured(json!("7"))
        );
    }

    #[test]
    fn test_kind_mismatch() {
        assert!(request(json!(5), Some(ValueKind::String)).to_value().is_err());
        assert!(request(json!("abc"), Some(ValueKind::Int)).to_value().is_err());
        assert!(request(json!("yesterday"), Some(ValueKind::Date)).to_value().is_err());
        assert!(request(json!(true), Some(ValueKind::BigInt)).to_value().is_err());
    }
}
