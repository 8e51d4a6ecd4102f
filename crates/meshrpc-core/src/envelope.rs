//! The shared response envelope and its tolerant field extraction.
//!
//! Peers answer every call with a JSON document carrying five semantically
//! fixed fields — code, message, data, system flag, error chain — under
//! names that are configurable per client. Extraction never fails: a missing
//! path is an absent value, and only an absent *code* makes a response
//! indistinguishable from a transport failure (that call is the executor's).

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Per-client names of the five envelope fields.
///
/// Names may be dot-separated paths into nested objects (array indices are
/// numeric path segments).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnvelopeFields {
    pub code: String,
    pub message: String,
    pub data: String,
    pub system: String,
    pub chain: String,
}

impl Default for EnvelopeFields {
    fn default() -> Self {
        Self {
            code: "code".to_owned(),
            message: "message".to_owned(),
            data: "data".to_owned(),
            system: "system".to_owned(),
            chain: "chain".to_owned(),
        }
    }
}

impl EnvelopeFields {
    /// Replace any empty name with its default. Field names are never empty
    /// on a constructed client.
    pub fn or_defaults(mut self) -> Self {
        let defaults = Self::default();
        if self.code.is_empty() {
            self.code = defaults.code;
        }
        if self.message.is_empty() {
            self.message = defaults.message;
        }
        if self.data.is_empty() {
            self.data = defaults.data;
        }
        if self.system.is_empty() {
            self.system = defaults.system;
        }
        if self.chain.is_empty() {
            self.chain = defaults.chain;
        }
        self
    }
}

/// The decoded envelope of one response body.
#[derive(Debug, Clone, PartialEq)]
pub struct Envelope {
    /// The raw code value. `None` when the field is absent or the body is
    /// not JSON at all. Its JSON type drives the success comparison.
    pub code: Option<Value>,
    pub message: String,
    pub data: Value,
    pub system: bool,
    /// Incoming hop chain in wire form (may be empty).
    pub chain: String,
}

/// Parse a raw body string against the given field names.
///
/// A body that is not valid JSON yields an envelope with no code, which the
/// executor treats exactly like a connectivity failure.
pub fn parse(body: &str, fields: &EnvelopeFields) -> Envelope {
    let root: Value = match serde_json::from_str(body) {
        Ok(v) => v,
        Err(_) => Value::Null,
    };
    Envelope {
        code: lookup(&root, &fields.code).cloned(),
        message: lookup(&root, &fields.message).map(scalar_to_string).unwrap_or_default(),
        data: lookup(&root, &fields.data).cloned().unwrap_or(Value::Null),
        system: lookup(&root, &fields.system)
            .and_then(Value::as_bool)
            .unwrap_or(false),
        chain: lookup(&root, &fields.chain).map(scalar_to_string).unwrap_or_default(),
    }
}

/// Dot-path accessor into a JSON value. Object keys and numeric array
/// indices are supported; any missing or mistyped segment is absence.
pub fn lookup<'a>(root: &'a Value, path: &str) -> Option<&'a Value> {
    let mut current = root;
    for segment in path.split('.') {
        current = match current {
            Value::Object(map) => map.get(segment)?,
            Value::Array(items) => items.get(segment.parse::<usize>().ok()?)?,
            _ => return None,
        };
    }
    Some(current)
}

/// Text rendering of a scalar field. Non-scalar and null values render empty.
fn scalar_to_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        _ => String::new(),
    }
}
