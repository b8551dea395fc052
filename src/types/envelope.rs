//! The response envelope every Ragcy endpoint returns.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::errors::RagcyResult;

/// Parsed response body of the shape `{success, data?, error?}`.
///
/// The JSON is kept exactly as received; accessors read the well-known
/// fields without dropping anything else the service sent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResponseEnvelope(Value);

impl ResponseEnvelope {
    /// Wraps a parsed JSON body.
    pub fn new(value: Value) -> Self {
        Self(value)
    }

    /// Returns true if the `success` field is truthy.
    ///
    /// `true`, non-zero numbers, non-empty strings, arrays and objects count
    /// as success. A missing field, `null`, `false`, `0` and `""` do not.
    pub fn is_success(&self) -> bool {
        self.0.get("success").is_some_and(is_truthy)
    }

    /// Returns the `data` field, if present.
    pub fn data(&self) -> Option<&Value> {
        self.0.get("data")
    }

    /// Deserializes the `data` field into `T`.
    ///
    /// A missing `data` field is treated as `null`.
    pub fn data_as<T: DeserializeOwned>(&self) -> RagcyResult<T> {
        let data = self.data().cloned().unwrap_or(Value::Null);
        Ok(serde_json::from_value(data)?)
    }

    /// Returns the `error` field as a message.
    ///
    /// Strings are returned as-is; other non-null values are rendered as JSON.
    /// Empty strings and `null` yield `None`.
    pub fn error_message(&self) -> Option<String> {
        match self.0.get("error")? {
            Value::Null => None,
            Value::String(s) if s.is_empty() => None,
            Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }

    /// Returns the full JSON body.
    pub fn as_value(&self) -> &Value {
        &self.0
    }

    /// Consumes the envelope, returning the full JSON body.
    pub fn into_inner(self) -> Value {
        self.0
    }
}

impl From<Value> for ResponseEnvelope {
    fn from(value: Value) -> Self {
        Self(value)
    }
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}
