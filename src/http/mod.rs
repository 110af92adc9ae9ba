//! HTTP client with retry and rate limiting
//!
//! One in-flight request at a time per stream; the client's job is to make
//! that request robust: bounded retries with backoff, rate limiting, and
//! error classification.

mod client;
mod rate_limit;

pub use client::{HttpClient, HttpClientConfig, HttpClientConfigBuilder, RequestConfig};
pub use rate_limit::{RateLimiter, RateLimiterConfig};

#[cfg(test)]
mod tests;
