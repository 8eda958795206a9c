// ABOUTME: Shared utilities for fitness provider implementations
// ABOUTME: Retry logic for rate-limited requests, token exchange, and status-to-error mapping
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use crate::constants::api_provider_limits;
use crate::errors::{AppError, AppResult};
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, error, warn};

/// Configuration for retry behavior
#[derive(Debug, Clone)]
pub struct RetryConfig {
    /// Maximum number of retry attempts
    pub max_retries: u32,
    /// Initial backoff delay in milliseconds
    pub initial_backoff_ms: u64,
    /// HTTP status codes that should trigger retries
    pub retryable_status_codes: Vec<StatusCode>,
    /// Estimated block duration for user-facing error messages (seconds)
    pub estimated_block_duration_secs: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: api_provider_limits::garmin::MAX_RETRIES,
            initial_backoff_ms: api_provider_limits::garmin::INITIAL_BACKOFF_MS,
            retryable_status_codes: vec![StatusCode::TOO_MANY_REQUESTS],
            estimated_block_duration_secs:
                api_provider_limits::garmin::ESTIMATED_RATE_LIMIT_BLOCK_DURATION_SECS,
        }
    }
}

impl RetryConfig {
    /// Backoff before retry number `attempt` (1-based)
    #[must_use]
    pub fn backoff_ms(&self, attempt: u32) -> u64 {
        self.initial_backoff_ms
            .saturating_mul(2_u64.saturating_pow(attempt.saturating_sub(1)))
    }
}

/// Map a non-success status to the matching application error
pub fn status_error(provider_name: &str, status: StatusCode, body: &str) -> AppError {
    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => AppError::external_auth_failed(
            format!("{provider_name} rejected the credentials ({status})"),
        ),
        StatusCode::TOO_MANY_REQUESTS => {
            AppError::external_rate_limited(format!("{provider_name} API rate limit exceeded"))
        }
        _ => AppError::external_service(
            provider_name,
            format!("request failed with status {status}: {body}"),
        ),
    }
}

/// Make an authenticated HTTP GET request with retry logic
///
/// # Errors
///
/// Returns an error if:
/// - All retry attempts are exhausted
/// - Network request fails
/// - The API answers with a non-success status
/// - Response parsing fails
pub async fn api_request_with_retry<T>(
    client: &Client,
    url: &str,
    access_token: &str,
    provider_name: &str,
    retry_config: &RetryConfig,
) -> AppResult<T>
where
    T: DeserializeOwned,
{
    debug!("Starting {provider_name} API request to: {url}");

    let mut attempt = 0;
    loop {
        let response = client
            .get(url)
            .bearer_auth(access_token)
            .send()
            .await
            .map_err(|e| {
                AppError::external_unavailable(
                    provider_name,
                    format!("failed to send request: {e}"),
                )
                .with_source(e)
            })?;

        let status = response.status();
        debug!("Received HTTP response with status: {status}");

        if retry_config.retryable_status_codes.contains(&status) {
            attempt += 1;
            if attempt >= retry_config.max_retries {
                let max_retries = retry_config.max_retries;
                warn!("{provider_name} API rate limit exceeded - max retries ({max_retries}) reached");
                let minutes = retry_config.estimated_block_duration_secs / 60;
                let status_code = status.as_u16();
                return Err(AppError::external_rate_limited(format!(
                    "{provider_name} API rate limit exceeded ({status_code}). Max retries reached. Please wait approximately {minutes} minutes before retrying."
                )));
            }

            let backoff_ms = retry_config.backoff_ms(attempt);
            let max_retries = retry_config.max_retries;
            warn!(
                "{provider_name} API rate limit hit ({}) - retry {attempt}/{max_retries} after {backoff_ms}ms backoff",
                status.as_u16()
            );

            tokio::time::sleep(Duration::from_millis(backoff_ms)).await;
            continue;
        }

        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            error!("{provider_name} API request failed - status: {status}, body: {text}");
            return Err(status_error(provider_name, status, &text));
        }

        return response.json::<T>().await.map_err(|e| {
            error!("Failed to parse {provider_name} API response: {e}");
            AppError::external_service(provider_name, format!("failed to parse response: {e}"))
                .with_source(e)
        });
    }
}

/// Token endpoint response
#[derive(Debug, Deserialize)]
pub struct TokenResponse {
    /// Issued bearer token
    pub access_token: String,
    /// Optional refresh token
    #[serde(default)]
    pub refresh_token: Option<String>,
    /// Lifetime in seconds
    #[serde(default)]
    pub expires_in: Option<i64>,
}

/// Exchange a username and password for an access token (password grant)
///
/// # Errors
///
/// Returns an error if:
/// - HTTP request fails
/// - Token endpoint rejects the credentials or returns another error
/// - Response parsing fails
pub async fn exchange_password(
    client: &Client,
    token_url: &str,
    username: &str,
    password: &str,
    provider_name: &str,
) -> AppResult<TokenResponse> {
    debug!("Exchanging {provider_name} credentials at {token_url}");

    let params = [
        ("grant_type", "password"),
        ("username", username),
        ("password", password),
    ];

    let response = client
        .post(token_url)
        .form(&params)
        .send()
        .await
        .map_err(|e| {
            AppError::external_unavailable(
                provider_name,
                format!("failed to send token request: {e}"),
            )
            .with_source(e)
        })?;

    let status = response.status();
    if !status.is_success() {
        let text = response.text().await.unwrap_or_default();
        return Err(status_error(provider_name, status, &text));
    }

    response.json::<TokenResponse>().await.map_err(|e| {
        AppError::external_service(provider_name, format!("failed to parse token response: {e}"))
            .with_source(e)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ErrorCode;

    #[test]
    fn test_backoff_doubles() {
        let config = RetryConfig {
            initial_backoff_ms: 100,
            ..RetryConfig::default()
        };
        assert_eq!(config.backoff_ms(1), 100);
        assert_eq!(config.backoff_ms(2), 200);
        assert_eq!(config.backoff_ms(3), 400);
    }

    #[test]
    fn test_status_error_mapping() {
        assert_eq!(
            status_error("Garmin", StatusCode::UNAUTHORIZED, "").code,
            ErrorCode::ExternalAuthFailed
        );
        assert_eq!(
            status_error("Garmin", StatusCode::FORBIDDEN, "").code,
            ErrorCode::ExternalAuthFailed
        );
        assert_eq!(
            status_error("Garmin", StatusCode::BAD_GATEWAY, "").code,
            ErrorCode::ExternalServiceError
        );
        let err = status_error("Garmin", StatusCode::INTERNAL_SERVER_ERROR, "down");
        assert_eq!(err.http_status(), 502);
        assert!(err.message.contains("down"));
        assert_eq!(
            status_error("Garmin", StatusCode::NOT_FOUND, "missing").code,
            ErrorCode::ExternalServiceError
        );
    }
}
