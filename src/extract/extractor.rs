//! Record extractor implementation

use crate::error::{Error, Result};
use serde_json::Value;

/// Parse a response body into JSON
///
/// Invalid JSON is a malformed response, fatal for the current stream.
pub fn parse_body(body: &str) -> Result<Value> {
    serde_json::from_str(body).map_err(|e| Error::malformed(format!("body is not valid JSON: {e}")))
}

/// Look up a dot-notation path inside a JSON value
///
/// Returns `None` when any segment is missing or the value along the way is
/// not an object. A leading `$.` prefix is accepted and ignored.
pub fn lookup_path<'a>(value: &'a Value, path: &str) -> Option<&'a Value> {
    let path = path.strip_prefix("$.").unwrap_or(path);

    let mut current = value;
    for part in path.split('.') {
        match current {
            Value::Object(map) => {
                current = map.get(part)?;
            }
            _ => return None,
        }
    }

    Some(current)
}

/// Extracts the record sequence from a parsed response body
///
/// The result is materialized per page and consumed once; re-extraction
/// means calling `extract` again on the same parsed body.
#[derive(Debug, Clone)]
pub struct RecordExtractor {
    /// JSON path to the record array
    record_path: String,
}

impl RecordExtractor {
    /// Create an extractor with a record path (e.g. `$.results[*]`)
    pub fn new(record_path: impl Into<String>) -> Self {
        Self {
            record_path: record_path.into(),
        }
    }

    /// The configured record path
    pub fn record_path(&self) -> &str {
        &self.record_path
    }

    /// Extract records in source order from a parsed body
    pub fn extract(&self, body: &Value) -> Result<Vec<Value>> {
        // Wildcard patterns go through jsonpath-rust; plain dot paths use the
        // cheaper direct traversal.
        if self.record_path.contains('*') {
            self.extract_with_jsonpath(body)
        } else {
            match lookup_path(body, &self.record_path) {
                Some(Value::Array(arr)) => Ok(arr.clone()),
                Some(Value::Null) | None => Ok(vec![]),
                Some(v) => Ok(vec![v.clone()]),
            }
        }
    }

    fn extract_with_jsonpath(&self, body: &Value) -> Result<Vec<Value>> {
        use jsonpath_rust::JsonPath;

        let jp = JsonPath::try_from(self.record_path.as_str()).map_err(|e| Error::JsonPath {
            message: format!("Invalid JSONPath '{}': {e}", self.record_path),
        })?;

        match jp.find(body) {
            Value::Array(arr) => Ok(arr),
            Value::Null => Ok(vec![]),
            other => Ok(vec![other]),
        }
    }
}

impl Default for RecordExtractor {
    fn default() -> Self {
        Self::new("$.results[*]")
    }
}
