//! The persisted event record.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A single row from the `events` table.
///
/// Serialises as `{"id", "received_at", "source", "payload"}`; `source` is
/// emitted as `null` when absent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    /// Store-assigned id, strictly increasing in insertion order.
    pub id: i64,
    /// ISO 8601 UTC timestamp of when the store accepted the event.
    pub received_at: String,
    /// Optional caller-supplied label, at most 200 characters.
    pub source: Option<String>,
    /// The caller's JSON object, key order preserved.
    pub payload: Map<String, Value>,
}

impl Event {
    /// Returns `true` if the top-level payload field `key` is a JSON string
    /// exactly equal to `expected`.
    ///
    /// Missing fields and non-string values never match.
    pub fn payload_str_eq(&self, key: &str, expected: &str) -> bool {
        matches!(self.payload.get(key), Some(Value::String(s)) if s == expected)
    }
}
