// ABOUTME: Environment configuration management for deployment-specific settings
// ABOUTME: Handles environment variables, credential discovery, and validation of report parameters
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Environment-based configuration management

use crate::constants::{api_provider_limits, defaults, env_vars};
use crate::errors::{AppError, AppResult};
use crate::providers::activity_iterator::{MAX_PAGE_SIZE, MIN_PAGE_SIZE};
use crate::providers::core::Credentials;
use std::env;
use std::fmt::Write as _;
use std::str::FromStr;
use tracing::{info, warn};

/// Outbound HTTP client timeouts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HttpClientConfig {
    /// Total request timeout
    pub timeout_secs: u64,
    /// Connection establishment timeout
    pub connect_timeout_secs: u64,
}

impl Default for HttpClientConfig {
    fn default() -> Self {
        Self {
            timeout_secs: defaults::HTTP_TIMEOUT_SECS,
            connect_timeout_secs: defaults::HTTP_CONNECT_TIMEOUT_SECS,
        }
    }
}

/// Report configuration
#[derive(Debug, Clone)]
pub struct ReportConfig {
    /// Garmin Connect API base URL
    pub api_base_url: String,
    /// Token endpoint for username/password exchange
    pub token_url: String,
    /// Default credentials used when a request carries none
    pub credentials: Option<Credentials>,
    /// Activities requested per page
    pub page_size: usize,
    /// Upper bound on pages fetched per report
    pub max_pages: usize,
    /// Offset used to decide which week is "last week"
    pub utc_offset_hours: i32,
    /// Port for the HTTP surface
    pub http_port: u16,
    /// Outbound HTTP client settings
    pub http_client: HttpClientConfig,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            api_base_url: defaults::GARMIN_API_BASE_URL.to_owned(),
            token_url: defaults::GARMIN_TOKEN_URL.to_owned(),
            credentials: None,
            page_size: api_provider_limits::garmin::DEFAULT_ACTIVITIES_PER_PAGE,
            max_pages: defaults::MAX_PAGES,
            utc_offset_hours: 0,
            http_port: defaults::HTTP_PORT,
            http_client: HttpClientConfig::default(),
        }
    }
}

impl ReportConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> AppResult<Self> {
        info!("Loading configuration from environment variables");
        let config = Self::from_lookup(|key| env::var(key).ok())?;
        info!("Configuration loaded successfully");
        Ok(config)
    }

    /// Build configuration from an arbitrary key lookup
    ///
    /// Empty values are treated as unset.
    pub fn from_lookup<F>(lookup: F) -> AppResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());
        let base = Self::default();

        let credentials = match (
            get(env_vars::GARMIN_ACCESS_TOKEN),
            get(env_vars::GARMIN_USERNAME),
            get(env_vars::GARMIN_PASSWORD),
        ) {
            (Some(token), _, _) => Some(Credentials::AccessToken { token }),
            (None, Some(username), Some(password)) => {
                Some(Credentials::Password { username, password })
            }
            (None, Some(_), None) => {
                warn!("GARMIN_USERNAME is set but GARMIN_PASSWORD is missing - ignoring");
                None
            }
            _ => None,
        };

        let config = Self {
            api_base_url: get(env_vars::GARMIN_API_BASE_URL)
                .map_or(base.api_base_url, |url| url.trim_end_matches('/').to_owned()),
            token_url: get(env_vars::GARMIN_TOKEN_URL).unwrap_or(base.token_url),
            credentials,
            page_size: parse_or(
                get(env_vars::REPORT_PAGE_SIZE),
                base.page_size,
                env_vars::REPORT_PAGE_SIZE,
            )?,
            max_pages: parse_or(
                get(env_vars::REPORT_MAX_PAGES),
                base.max_pages,
                env_vars::REPORT_MAX_PAGES,
            )?,
            utc_offset_hours: parse_or(
                get(env_vars::REPORT_UTC_OFFSET_HOURS),
                base.utc_offset_hours,
                env_vars::REPORT_UTC_OFFSET_HOURS,
            )?,
            http_port: parse_or(get(env_vars::HTTP_PORT), base.http_port, env_vars::HTTP_PORT)?,
            http_client: HttpClientConfig {
                timeout_secs: parse_or(
                    get(env_vars::HTTP_TIMEOUT_SECS),
                    base.http_client.timeout_secs,
                    env_vars::HTTP_TIMEOUT_SECS,
                )?,
                ..base.http_client
            },
        };

        config.validate()?;
        Ok(config)
    }

    /// Validate configuration values
    pub fn validate(&self) -> AppResult<()> {
        if !(-12..=14).contains(&self.utc_offset_hours) {
            return Err(AppError::config(format!(
                "{} must be between -12 and 14, got {}",
                env_vars::REPORT_UTC_OFFSET_HOURS,
                self.utc_offset_hours
            )));
        }

        if self.page_size == 0 {
            return Err(AppError::config(format!(
                "{} must be greater than zero",
                env_vars::REPORT_PAGE_SIZE
            )));
        }

        if !(MIN_PAGE_SIZE..=MAX_PAGE_SIZE).contains(&self.page_size) {
            warn!(
                page_size = self.page_size,
                "Page size outside [{}, {}] - it will be clamped",
                MIN_PAGE_SIZE,
                MAX_PAGE_SIZE
            );
        }

        if self.max_pages == 0 {
            return Err(AppError::config(format!(
                "{} must be greater than zero",
                env_vars::REPORT_MAX_PAGES
            )));
        }

        if self.http_client.timeout_secs == 0 {
            return Err(AppError::config(format!(
                "{} must be greater than zero",
                env_vars::HTTP_TIMEOUT_SECS
            )));
        }

        if !self.api_base_url.starts_with("http://") && !self.api_base_url.starts_with("https://")
        {
            return Err(AppError::config(format!(
                "{} must be an http(s) URL, got '{}'",
                env_vars::GARMIN_API_BASE_URL,
                self.api_base_url
            )));
        }

        Ok(())
    }

    /// Get a summary of the configuration for logging (without secrets)
    #[must_use]
    pub fn summary(&self) -> String {
        let credentials = match &self.credentials {
            Some(Credentials::AccessToken { .. }) => "access token".to_owned(),
            Some(Credentials::Password { username, .. }) => format!("password for {username}"),
            None => "none".to_owned(),
        };

        let mut summary = String::from("Weekly Report Configuration:\n");
        let _ = writeln!(summary, " - API Base URL: {}", self.api_base_url);
        let _ = writeln!(summary, " - Token URL: {}", self.token_url);
        let _ = writeln!(summary, " - Credentials: {credentials}");
        let _ = writeln!(summary, " - Page Size: {}", self.page_size);
        let _ = writeln!(summary, " - Max Pages: {}", self.max_pages);
        let _ = writeln!(summary, " - UTC Offset: {}h", self.utc_offset_hours);
        let _ = write!(summary, " - HTTP Port: {}", self.http_port);
        summary
    }
}

/// Parse an optional value, falling back to a default when unset
fn parse_or<T>(value: Option<String>, default: T, key: &str) -> AppResult<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    value.map_or(Ok(default), |raw| {
        raw.trim()
            .parse()
            .map_err(|e| AppError::config(format!("Invalid {key} value '{raw}': {e}")))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_when_unset() {
        let config = ReportConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config.api_base_url, defaults::GARMIN_API_BASE_URL);
        assert_eq!(config.page_size, 20);
        assert_eq!(config.max_pages, 50);
        assert_eq!(config.utc_offset_hours, 0);
        assert!(config.credentials.is_none());
    }

    #[test]
    fn test_access_token_wins_over_password() {
        let config = ReportConfig::from_lookup(lookup(&[
            ("GARMIN_ACCESS_TOKEN", "tok"),
            ("GARMIN_USERNAME", "runner@example.com"),
            ("GARMIN_PASSWORD", "hunter2"),
        ]))
        .unwrap();
        assert!(matches!(
            config.credentials,
            Some(Credentials::AccessToken { ref token }) if token == "tok"
        ));
    }

    #[test]
    fn test_username_without_password_is_ignored() {
        let config =
            ReportConfig::from_lookup(lookup(&[("GARMIN_USERNAME", "runner@example.com")]))
                .unwrap();
        assert!(config.credentials.is_none());
    }

    #[test]
    fn test_invalid_numbers_are_rejected() {
        let err = ReportConfig::from_lookup(lookup(&[("REPORT_PAGE_SIZE", "many")])).unwrap_err();
        assert!(err.message.contains("REPORT_PAGE_SIZE"));
    }

    #[test]
    fn test_offset_validation() {
        assert!(ReportConfig::from_lookup(lookup(&[("REPORT_UTC_OFFSET_HOURS", "15")])).is_err());
        let config =
            ReportConfig::from_lookup(lookup(&[("REPORT_UTC_OFFSET_HOURS", "-5")])).unwrap();
        assert_eq!(config.utc_offset_hours, -5);
    }

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        let config = ReportConfig::from_lookup(lookup(&[(
            "GARMIN_API_BASE_URL",
            "http://127.0.0.1:9000/",
        )]))
        .unwrap();
        assert_eq!(config.api_base_url, "http://127.0.0.1:9000");
    }

    #[test]
    fn test_summary_hides_secrets() {
        let config = ReportConfig::from_lookup(lookup(&[
            ("GARMIN_USERNAME", "runner@example.com"),
            ("GARMIN_PASSWORD", "hunter2"),
        ]))
        .unwrap();
        let summary = config.summary();
        assert!(summary.contains("runner@example.com"));
        assert!(!summary.contains("hunter2"));
    }
}
