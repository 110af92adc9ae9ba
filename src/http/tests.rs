//! Tests for the HTTP client

use super::*;
use crate::types::BackoffType;
use std::time::Duration;

#[test]
fn test_default_config() {
    let config = HttpClientConfig::default();
    assert_eq!(config.timeout, Duration::from_secs(30));
    assert_eq!(config.max_retries, 5);
    assert_eq!(config.retry_statuses, vec![429, 500, 502, 503, 504]);
    assert!(config.rate_limit.is_some());
}

#[test]
fn test_config_builder() {
    let config = HttpClientConfig::builder()
        .base_url("https://api.tempo.io/4")
        .timeout(Duration::from_secs(10))
        .max_retries(2)
        .header("Content-Type", "application/json")
        .user_agent("test-agent/1.0")
        .no_rate_limit()
        .build();

    assert_eq!(config.base_url.as_deref(), Some("https://api.tempo.io/4"));
    assert_eq!(config.timeout, Duration::from_secs(10));
    assert_eq!(config.max_retries, 2);
    assert_eq!(
        config.default_headers.get("Content-Type").unwrap(),
        "application/json"
    );
    assert_eq!(config.user_agent, "test-agent/1.0");
    assert!(config.rate_limit.is_none());
}

#[test]
fn test_from_connector_config() {
    let http = crate::config::HttpConfig::default();
    let config = HttpClientConfig::from_connector("https://api.tempo.io/4", &http, None);

    assert_eq!(config.base_url.as_deref(), Some("https://api.tempo.io/4"));
    assert_eq!(config.max_retries, 5);
    assert_eq!(config.initial_backoff, Duration::from_millis(500));
    assert_eq!(
        config.default_headers.get("Content-Type").unwrap(),
        "application/json"
    );
}

#[test]
fn test_request_config() {
    let config = RequestConfig::new()
        .query("updatedFrom", "2024-01-01T00:00:00Z")
        .query("limit", "500")
        .header("X-Test", "1");

    assert_eq!(
        config.query.get("updatedFrom").unwrap(),
        "2024-01-01T00:00:00Z"
    );
    assert_eq!(config.query.get("limit").unwrap(), "500");
    assert_eq!(config.headers.get("X-Test").unwrap(), "1");
}

#[test]
fn test_calculate_backoff_exponential() {
    let config = HttpClientConfig::builder()
        .backoff(
            BackoffType::Exponential,
            Duration::from_millis(100),
            Duration::from_secs(1),
        )
        .build();
    let client = HttpClient::with_config(config);

    assert_eq!(client.calculate_backoff(0), Duration::from_millis(100));
    assert_eq!(client.calculate_backoff(1), Duration::from_millis(200));
    assert_eq!(client.calculate_backoff(2), Duration::from_millis(400));
    // Capped at max
    assert_eq!(client.calculate_backoff(10), Duration::from_secs(1));
}

#[test]
fn test_calculate_backoff_constant_and_linear() {
    let constant = HttpClient::with_config(
        HttpClientConfig::builder()
            .backoff(
                BackoffType::Constant,
                Duration::from_millis(100),
                Duration::from_secs(1),
            )
            .build(),
    );
    assert_eq!(constant.calculate_backoff(5), Duration::from_millis(100));

    let linear = HttpClient::with_config(
        HttpClientConfig::builder()
            .backoff(
                BackoffType::Linear,
                Duration::from_millis(100),
                Duration::from_secs(1),
            )
            .build(),
    );
    assert_eq!(linear.calculate_backoff(2), Duration::from_millis(300));
}
