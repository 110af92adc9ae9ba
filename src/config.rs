//! Connector configuration
//!
//! The configuration object is constructed once (from a JSON file or inline
//! JSON) and passed by reference into each component constructor. There is no
//! ambient global.

use crate::error::{Error, Result};
use crate::types::BackoffType;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::Path;

// ============================================================================
// Connector Config
// ============================================================================

/// Complete connector configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConnectorConfig {
    /// Token used to authenticate against the API service
    pub auth_token: String,

    /// The earliest record date to sync
    #[serde(default)]
    pub start_date: Option<DateTime<Utc>>,

    /// The url for the API service
    #[serde(default = "default_api_url")]
    pub api_url: String,

    /// A custom User-Agent header to send with each request
    #[serde(default)]
    pub user_agent: Option<String>,

    /// Organization id stamped into each emitted record
    #[serde(default)]
    pub org_id: Option<String>,

    /// HTTP client settings
    #[serde(default)]
    pub http: HttpConfig,

    /// How to treat per-record validation failures
    #[serde(default)]
    pub validation: ValidationPolicy,
}

fn default_api_url() -> String {
    "https://api.tempo.io/4".to_string()
}

impl ConnectorConfig {
    /// Create a config with just an auth token, everything else defaulted
    pub fn new(auth_token: impl Into<String>) -> Self {
        Self {
            auth_token: auth_token.into(),
            start_date: None,
            api_url: default_api_url(),
            user_agent: None,
            org_id: None,
            http: HttpConfig::default(),
            validation: ValidationPolicy::default(),
        }
    }

    /// Load configuration from a JSON file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let contents = std::fs::read_to_string(path.as_ref()).map_err(|e| Error::Config {
            message: format!("Failed to read config file: {e}"),
        })?;
        Self::from_json(&contents)
    }

    /// Parse configuration from an inline JSON string
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json).map_err(|e| Error::Config {
            message: format!("Failed to parse config: {e}"),
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Check required fields
    pub fn validate(&self) -> Result<()> {
        if self.auth_token.is_empty() {
            return Err(Error::missing_field("auth_token"));
        }
        if self.api_url.is_empty() {
            return Err(Error::missing_field("api_url"));
        }
        Ok(())
    }

    /// Set the start date
    #[must_use]
    pub fn with_start_date(mut self, start_date: DateTime<Utc>) -> Self {
        self.start_date = Some(start_date);
        self
    }

    /// Set the base API URL
    #[must_use]
    pub fn with_api_url(mut self, api_url: impl Into<String>) -> Self {
        self.api_url = api_url.into();
        self
    }

    /// Set the injected organization id
    #[must_use]
    pub fn with_org_id(mut self, org_id: impl Into<String>) -> Self {
        self.org_id = Some(org_id.into());
        self
    }
}

// ============================================================================
// Validation Policy
// ============================================================================

/// Strategy for per-record validation failures
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValidationPolicy {
    /// Report the failure, drop the record, keep the stream going
    #[default]
    SkipRecord,
    /// Abort the stream on the first validation failure
    FailStream,
}

// ============================================================================
// HTTP Config
// ============================================================================

/// HTTP client configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpConfig {
    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,

    /// Maximum number of retries
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    /// HTTP status codes to retry on
    #[serde(default = "default_retry_statuses")]
    pub retry_statuses: Vec<u16>,

    /// Retry backoff configuration
    #[serde(default)]
    pub retry_backoff: BackoffConfig,

    /// Rate limiting configuration
    #[serde(default)]
    pub rate_limit: RateLimitConfig,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_seconds: default_timeout(),
            max_retries: default_max_retries(),
            retry_statuses: default_retry_statuses(),
            retry_backoff: BackoffConfig::default(),
            rate_limit: RateLimitConfig::default(),
        }
    }
}

fn default_timeout() -> u64 {
    30
}

fn default_max_retries() -> u32 {
    5
}

fn default_retry_statuses() -> Vec<u16> {
    vec![429, 500, 502, 503, 504]
}

/// Backoff configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackoffConfig {
    /// Type of backoff
    #[serde(rename = "type", default)]
    pub backoff_type: BackoffType,

    /// Initial delay in milliseconds
    #[serde(default = "default_initial_ms")]
    pub initial_ms: u64,

    /// Maximum delay in milliseconds
    #[serde(default = "default_max_ms")]
    pub max_ms: u64,
}

impl Default for BackoffConfig {
    fn default() -> Self {
        Self {
            backoff_type: BackoffType::Exponential,
            initial_ms: default_initial_ms(),
            max_ms: default_max_ms(),
        }
    }
}

fn default_initial_ms() -> u64 {
    500
}

fn default_max_ms() -> u64 {
    60000
}

/// Rate limiting configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RateLimitConfig {
    /// Requests per second limit
    #[serde(default = "default_rps")]
    pub requests_per_second: u32,

    /// Burst size (max tokens in bucket)
    #[serde(default = "default_burst")]
    pub burst_size: u32,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            requests_per_second: default_rps(),
            burst_size: default_burst(),
        }
    }
}

fn default_rps() -> u32 {
    10
}

fn default_burst() -> u32 {
    10
}
