//! Pagination strategy implementations

use super::types::{PageToken, Paginator};
use crate::extract::lookup_path;
use serde_json::Value;

// ============================================================================
// Next URL Pagination
// ============================================================================

/// Next-page URL embedded in the response body
///
/// The Tempo shape: `{ "metadata": { "next": "https://..." } }`. A missing
/// metadata section, a null pointer, or an empty string all mean the stream
/// is exhausted; none of them is an error.
#[derive(Debug, Clone)]
pub struct NextUrlPaginator {
    /// Dot-notation path to the next URL in the body
    path: String,
}

impl NextUrlPaginator {
    /// Create a paginator reading the next URL from the given path
    pub fn new(path: impl Into<String>) -> Self {
        Self { path: path.into() }
    }
}

impl Default for NextUrlPaginator {
    fn default() -> Self {
        Self::new("metadata.next")
    }
}

impl Paginator for NextUrlPaginator {
    fn decide_next(&self, body: &Value) -> Option<PageToken> {
        match lookup_path(body, &self.path) {
            Some(Value::String(url)) if !url.is_empty() => Some(PageToken::new(url)),
            _ => None,
        }
    }
}

// ============================================================================
// No Pagination
// ============================================================================

/// No pagination - single request per stream
#[derive(Debug, Clone, Default)]
pub struct NoPaginator;

impl Paginator for NoPaginator {
    fn decide_next(&self, _body: &Value) -> Option<PageToken> {
        None
    }
}
