//! Structural checks applied to requests before they reach the store.
//!
//! The store treats payloads as opaque documents; the required-key
//! convention lives here, on the gateway side.

use std::collections::HashMap;
use std::num::IntErrorKind;

use serde_json::Value;

use crate::api::ApiError;

/// Top-level payload keys every ingested event must carry, in check order.
pub const REQUIRED_PAYLOAD_KEYS: [&str; 3] = ["stid", "exnum", "table"];

/// Longest accepted `source` label, in characters.
pub const MAX_SOURCE_CHARS: usize = 200;

/// Returns the first key of `required` that is not a top-level key of
/// `document`.
///
/// A document that is not an object has no keys, so the first required key
/// is reported. Values are not inspected: `{"table": null}` satisfies
/// `table`.
pub fn first_missing_key<'k>(document: &Value, required: &[&'k str]) -> Option<&'k str> {
    let present = |key: &str| document.as_object().is_some_and(|map| map.contains_key(key));
    required.iter().copied().find(|key| !present(*key))
}

/// Rejects a `source` label longer than [`MAX_SOURCE_CHARS`].
pub fn check_source(source: Option<&str>) -> Result<(), ApiError> {
    match source {
        Some(s) if s.chars().count() > MAX_SOURCE_CHARS => Err(ApiError::UnprocessableInput(
            format!("source must be at most {MAX_SOURCE_CHARS} characters"),
        )),
        _ => Ok(()),
    }
}

/// Returns the value of a required query parameter, rejecting absent or
/// empty values.
pub fn require_param(name: &str, value: Option<String>) -> Result<String, ApiError> {
    match value {
        Some(v) if !v.is_empty() => Ok(v),
        _ => Err(ApiError::UnprocessableInput(format!(
            "query parameter '{name}' is required and must be non-empty"
        ))),
    }
}

/// Decoded query-string parameters. A name given more than once keeps its
/// last value.
#[derive(Debug, Default)]
pub struct QueryParams(HashMap<String, String>);

impl FromIterator<(String, String)> for QueryParams {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(pairs: I) -> Self {
        Self(pairs.into_iter().collect())
    }
}

impl QueryParams {
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0.get(name).map(String::as_str)
    }

    /// See [`require_param`].
    pub fn required(&self, name: &str) -> Result<String, ApiError> {
        require_param(name, self.get(name).map(str::to_owned))
    }

    /// Parses an optional integer parameter with [`parse_saturating_int`].
    pub fn integer(&self, name: &str) -> Result<Option<i64>, ApiError> {
        self.get(name)
            .map(|raw| parse_saturating_int(name, raw))
            .transpose()
    }
}

/// Parses a decimal integer with an optional sign. Values beyond the `i64`
/// range saturate to `i64::MIN`/`i64::MAX`; anything that is not an integer
/// at all is rejected.
pub fn parse_saturating_int(name: &str, raw: &str) -> Result<i64, ApiError> {
    match raw.trim().parse::<i64>() {
        Ok(value) => Ok(value),
        Err(e) => match e.kind() {
            IntErrorKind::PosOverflow => Ok(i64::MAX),
            IntErrorKind::NegOverflow => Ok(i64::MIN),
            _ => Err(ApiError::UnprocessableInput(format!(
                "query parameter '{name}' must be an integer"
            ))),
        },
    }
}
