//! Pagination types and traits

use serde_json::Value;

/// Opaque continuation handle for the next page
///
/// Produced from one response, consumed to build the next request, then
/// discarded. The wrapped URL may be absolute or relative; only its query
/// portion feeds the next request's parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageToken {
    url: String,
}

impl PageToken {
    /// Wrap a next-page URL
    pub fn new(url: impl Into<String>) -> Self {
        Self { url: url.into() }
    }

    /// The raw next-page URL
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Parse the URL's query portion into continuation parameters
    ///
    /// These override the base request parameters on key collision.
    pub fn query_params(&self) -> Vec<(String, String)> {
        let query = match self.url.split_once('?') {
            Some((_, query)) => query,
            None => return Vec::new(),
        };

        url::form_urlencoded::parse(query.as_bytes())
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect()
    }
}

/// Core trait for pagination strategies
///
/// `decide_next` is a pure function of the response body: no side effects,
/// no internal state. `None` is the terminal sentinel.
pub trait Paginator: Send + Sync {
    /// Decide whether more pages exist, returning the continuation token
    fn decide_next(&self, body: &Value) -> Option<PageToken>;
}

/// Pagination strategy selected per stream definition at construction time
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PaginationMode {
    /// Next-page URL embedded in the response body at the given path
    NextUrl {
        /// Dot-notation path to the next URL
        path: String,
    },
    /// Single request, no pagination
    None,
}

impl Default for PaginationMode {
    fn default() -> Self {
        Self::NextUrl {
            path: "metadata.next".to_string(),
        }
    }
}

impl PaginationMode {
    /// Build the concrete paginator for this mode
    pub fn build(&self) -> Box<dyn Paginator> {
        match self {
            Self::NextUrl { path } => Box::new(super::NextUrlPaginator::new(path.clone())),
            Self::None => Box::new(super::NoPaginator),
        }
    }
}
