// ABOUTME: Garmin Connect API provider implementation for activity list retrieval
// ABOUTME: Handles token-based authentication and paged activity fetching with rate limit retries
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use super::core::{ActivityPage, ActivityProvider, Credentials, ProviderFactory};
use super::utils::{self, RetryConfig};
use crate::config::{HttpClientConfig, ReportConfig};
use crate::constants::{api_provider_limits, defaults, oauth_providers};
use crate::errors::{AppError, AppResult};
use crate::models::{Activity, GarminActivityRecord};
use crate::utils::http_client::create_client;
use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use reqwest::Client;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};
use url::Url;

/// Endpoints used by the Garmin provider
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GarminEndpoints {
    /// Base URL for API calls
    pub api_base_url: String,
    /// Token endpoint for password exchange
    pub token_url: String,
}

impl GarminEndpoints {
    /// Endpoints named in the report configuration
    #[must_use]
    pub fn from_config(config: &ReportConfig) -> Self {
        Self {
            api_base_url: config.api_base_url.clone(),
            token_url: config.token_url.clone(),
        }
    }
}

impl Default for GarminEndpoints {
    fn default() -> Self {
        Self {
            api_base_url: defaults::GARMIN_API_BASE_URL.to_owned(),
            token_url: defaults::GARMIN_TOKEN_URL.to_owned(),
        }
    }
}

/// Access token held after authentication
#[derive(Debug, Clone)]
struct GarminSession {
    access_token: String,
    expires_at: Option<DateTime<Utc>>,
}

impl GarminSession {
    fn is_valid(&self) -> bool {
        self.expires_at.is_none_or(|expires_at| Utc::now() < expires_at)
    }
}

/// Absolute expiry for a token lifetime reported by the token endpoint
///
/// Lifetimes too large to represent are treated as non-expiring.
fn expiry_from_lifetime(expires_in: Option<i64>) -> Option<DateTime<Utc>> {
    let secs = expires_in?;
    let expires_at =
        Duration::try_seconds(secs).and_then(|lifetime| Utc::now().checked_add_signed(lifetime));
    if expires_at.is_none() {
        warn!(expires_in = secs, "Garmin token lifetime out of range, treating as non-expiring");
    }
    expires_at
}

/// Garmin Connect provider implementation
pub struct GarminProvider {
    endpoints: GarminEndpoints,
    session: RwLock<Option<GarminSession>>,
    client: Client,
    retry_config: RetryConfig,
}

impl GarminProvider {
    /// Create provider with explicit endpoints and client
    #[must_use]
    pub fn new(endpoints: GarminEndpoints, client: Client) -> Self {
        Self {
            endpoints,
            session: RwLock::new(None),
            client,
            retry_config: RetryConfig::default(),
        }
    }

    /// Replace the retry policy (tests use short backoffs)
    #[must_use]
    pub fn with_retry_config(mut self, retry_config: RetryConfig) -> Self {
        self.retry_config = retry_config;
        self
    }

    /// Configured endpoints
    #[must_use]
    pub const fn endpoints(&self) -> &GarminEndpoints {
        &self.endpoints
    }

    /// Build the activity list URL for one page
    pub fn activities_url(&self, start: usize, limit: usize) -> AppResult<Url> {
        let raw = format!(
            "{}/{}",
            self.endpoints.api_base_url.trim_end_matches('/'),
            defaults::ACTIVITY_LIST_PATH
        );
        let mut url = Url::parse(&raw)
            .map_err(|e| AppError::config(format!("Invalid Garmin API base URL '{raw}': {e}")))?;
        url.query_pairs_mut()
            .append_pair("start", &start.to_string())
            .append_pair("limit", &limit.to_string());
        Ok(url)
    }

    /// Current access token, if the session is still valid
    async fn access_token(&self) -> AppResult<String> {
        // Clone the token so the lock is not held across the request
        let guard = self.session.read().await;
        let session = guard
            .as_ref()
            .ok_or_else(|| AppError::external_auth_failed("Garmin provider is not authenticated"))?;
        if !session.is_valid() {
            return Err(AppError::external_auth_failed(
                "Garmin access token has expired",
            ));
        }
        Ok(session.access_token.clone())
    }

    /// Convert Garmin list records to a page, skipping malformed entries
    fn convert_records(records: Vec<GarminActivityRecord>) -> ActivityPage {
        let records_received = records.len();
        let activities: Vec<Activity> = records
            .into_iter()
            .filter_map(|record| {
                let id = record.activity_id;
                Activity::try_from(record)
                    .inspect_err(|e| warn!(activity_id = id, error = %e, "Skipping Garmin activity"))
                    .ok()
            })
            .collect();
        ActivityPage::with_records_received(activities, records_received)
    }
}

#[async_trait]
impl ActivityProvider for GarminProvider {
    fn name(&self) -> &'static str {
        oauth_providers::GARMIN
    }

    async fn authenticate(&self, credentials: &Credentials) -> AppResult<()> {
        let session = match credentials {
            Credentials::AccessToken { token } => {
                info!("Using pre-issued Garmin access token");
                GarminSession {
                    access_token: token.clone(),
                    expires_at: None,
                }
            }
            Credentials::Password { username, password } => {
                info!(user = %username, "Authenticating with Garmin Connect");
                let token = utils::exchange_password(
                    &self.client,
                    &self.endpoints.token_url,
                    username,
                    password,
                    "Garmin",
                )
                .await?;
                GarminSession {
                    access_token: token.access_token,
                    expires_at: expiry_from_lifetime(token.expires_in),
                }
            }
        };

        *self.session.write().await = Some(session);
        Ok(())
    }

    async fn is_authenticated(&self) -> bool {
        self.session
            .read()
            .await
            .as_ref()
            .is_some_and(GarminSession::is_valid)
    }

    async fn get_activities(&self, start: usize, limit: usize) -> AppResult<ActivityPage> {
        let limit = limit.clamp(1, api_provider_limits::garmin::MAX_ACTIVITIES_PER_REQUEST);
        let access_token = self.access_token().await?;
        let url = self.activities_url(start, limit)?;

        debug!(start, limit, "Fetching Garmin activity page");

        let records: Vec<GarminActivityRecord> = utils::api_request_with_retry(
            &self.client,
            url.as_str(),
            &access_token,
            "Garmin",
            &self.retry_config,
        )
        .await?;

        debug!(
            start,
            received = records.len(),
            "Received Garmin activity page"
        );

        Ok(Self::convert_records(records))
    }
}

/// Creates a fresh [`GarminProvider`] per report request
///
/// Providers share the factory's HTTP client (and its connection pool) but
/// each holds its own session.
#[derive(Debug, Clone)]
pub struct GarminProviderFactory {
    client: Client,
}

impl GarminProviderFactory {
    /// Factory handing `client` to every provider it creates
    #[must_use]
    pub const fn new(client: Client) -> Self {
        Self { client }
    }

    /// Factory with a client built from the configured timeouts
    #[must_use]
    pub fn from_config(config: &HttpClientConfig) -> Self {
        Self::new(create_client(config))
    }
}

impl Default for GarminProviderFactory {
    fn default() -> Self {
        Self::from_config(&HttpClientConfig::default())
    }
}

impl ProviderFactory for GarminProviderFactory {
    fn create(&self, config: &ReportConfig) -> Box<dyn ActivityProvider> {
        Box::new(GarminProvider::new(
            GarminEndpoints::from_config(config),
            self.client.clone(),
        ))
    }
}
