//! Credential provider implementations

use crate::error::{Error, Result};
use async_trait::async_trait;
use reqwest::RequestBuilder;
use std::collections::HashMap;

/// Decorates outgoing requests with authentication
///
/// Providers may need to refresh or fetch tokens, so application is async.
#[async_trait]
pub trait CredentialProvider: Send + Sync {
    /// Apply authentication to a request builder
    async fn apply(&self, req: RequestBuilder) -> Result<RequestBuilder>;
}

/// Bearer token authentication (`Authorization: Bearer <token>`)
#[derive(Debug, Clone)]
pub struct BearerToken {
    token: String,
}

impl BearerToken {
    /// Create a bearer token provider
    pub fn new(token: impl Into<String>) -> Result<Self> {
        let token = token.into();
        if token.is_empty() {
            return Err(Error::auth("bearer token is empty"));
        }
        Ok(Self { token })
    }
}

#[async_trait]
impl CredentialProvider for BearerToken {
    async fn apply(&self, req: RequestBuilder) -> Result<RequestBuilder> {
        Ok(req.bearer_auth(&self.token))
    }
}

/// Fixed custom headers, mainly useful in tests
#[derive(Debug, Clone, Default)]
pub struct StaticHeaders {
    headers: HashMap<String, String>,
}

impl StaticHeaders {
    /// Create an empty provider (no authentication)
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a header
    #[must_use]
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(key.into(), value.into());
        self
    }
}

#[async_trait]
impl CredentialProvider for StaticHeaders {
    async fn apply(&self, req: RequestBuilder) -> Result<RequestBuilder> {
        let mut req = req;
        for (key, value) in &self.headers {
            req = req.header(key.as_str(), value.as_str());
        }
        Ok(req)
    }
}
