// ABOUTME: Shared HTTP client utilities with connection pooling and timeout configuration
// ABOUTME: Builds the reqwest client used for token exchange and activity list requests

use crate::config::HttpClientConfig;
use reqwest::{Client, ClientBuilder};
use std::time::Duration;

/// User agent sent with every outbound request
const USER_AGENT: &str = concat!("weekly-training-report/", env!("CARGO_PKG_VERSION"));

/// Create an HTTP client from configured timeouts
///
/// Falls back to a default client if the configured builder fails.
#[must_use]
pub fn create_client(config: &HttpClientConfig) -> Client {
    create_client_with_timeout(config.timeout_secs, config.connect_timeout_secs)
}

/// Create a new HTTP client with custom timeout settings
///
/// # Arguments
/// * `timeout_secs` - Request timeout in seconds
/// * `connect_timeout_secs` - Connection timeout in seconds
#[must_use]
pub fn create_client_with_timeout(timeout_secs: u64, connect_timeout_secs: u64) -> Client {
    ClientBuilder::new()
        .timeout(Duration::from_secs(timeout_secs))
        .connect_timeout(Duration::from_secs(connect_timeout_secs))
        .user_agent(USER_AGENT)
        .build()
        .unwrap_or_else(|_| Client::new())
}
