// ABOUTME: Offline activity provider backed by a JSON export of the Garmin activity list
// ABOUTME: Serves pages from memory for local report rendering and deterministic tests
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Fixture Provider
//!
//! Reads a JSON array in the same shape the Garmin activity list endpoint
//! returns and serves it page by page. Activities are kept newest first so
//! paging behaves like the live API.

use super::core::{ActivityPage, ActivityProvider, Credentials, ProviderFactory};
use crate::config::ReportConfig;
use crate::constants::oauth_providers;
use crate::errors::{AppError, AppResult};
use crate::models::{Activity, GarminActivityRecord};
use async_trait::async_trait;
use std::path::Path;
use tracing::info;

/// Provider serving activities from memory
#[derive(Debug, Clone, Default)]
pub struct FixtureProvider {
    activities: Vec<Activity>,
}

impl FixtureProvider {
    /// Create a provider from activities in any order
    #[must_use]
    pub fn new(mut activities: Vec<Activity>) -> Self {
        activities.sort_by(|a, b| b.start_time_local.cmp(&a.start_time_local));
        Self { activities }
    }

    /// Parse a JSON array of Garmin activity list records
    pub fn from_json(json: &str) -> AppResult<Self> {
        let records: Vec<GarminActivityRecord> = serde_json::from_str(json).map_err(|e| {
            AppError::invalid_format(format!("Activity export is not a valid list: {e}"))
        })?;
        let activities = records
            .into_iter()
            .map(Activity::try_from)
            .collect::<AppResult<Vec<_>>>()?;
        Ok(Self::new(activities))
    }

    /// Load a JSON export from disk
    pub async fn from_file(path: impl AsRef<Path>) -> AppResult<Self> {
        let path = path.as_ref();
        let json = tokio::fs::read_to_string(path).await.map_err(|e| {
            AppError::invalid_input(format!(
                "Failed to read activity export {}: {e}",
                path.display()
            ))
            .with_source(e)
        })?;
        let provider = Self::from_json(&json)?;
        info!(
            path = %path.display(),
            activities = provider.len(),
            "Loaded activity export"
        );
        Ok(provider)
    }

    /// Number of activities held
    #[must_use]
    pub fn len(&self) -> usize {
        self.activities.len()
    }

    /// Whether the provider holds no activities
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.activities.is_empty()
    }
}

#[async_trait]
impl ActivityProvider for FixtureProvider {
    fn name(&self) -> &'static str {
        oauth_providers::FIXTURE
    }

    async fn authenticate(&self, _credentials: &Credentials) -> AppResult<()> {
        Ok(())
    }

    async fn is_authenticated(&self) -> bool {
        true
    }

    async fn get_activities(&self, start: usize, limit: usize) -> AppResult<ActivityPage> {
        Ok(ActivityPage::new(
            self.activities
                .iter()
                .skip(start)
                .take(limit)
                .cloned()
                .collect(),
        ))
    }
}

impl ProviderFactory for FixtureProvider {
    fn create(&self, _config: &ReportConfig) -> Box<dyn ActivityProvider> {
        Box::new(self.clone())
    }
}
