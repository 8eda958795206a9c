// ABOUTME: Core provider traits and interfaces for activity data access
// ABOUTME: Defines the credential type and the paged activity source contract
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Provider Contract
//!
//! The report pipeline only needs two things from a fitness service: a way to
//! authenticate and a way to read one page of the activity list. Both are
//! captured by [`ActivityProvider`] so the Garmin client and the offline
//! fixture source are interchangeable.
//!
//! ## Example: Adding a New Provider
//!
//! ```rust,no_run
//! use async_trait::async_trait;
//! use weekly_training_report::errors::AppResult;
//! use weekly_training_report::providers::core::{ActivityPage, ActivityProvider, Credentials};
//!
//! pub struct CustomProvider;
//!
//! #[async_trait]
//! impl ActivityProvider for CustomProvider {
//!     fn name(&self) -> &'static str {
//!         "custom"
//!     }
//!
//!     async fn authenticate(&self, _credentials: &Credentials) -> AppResult<()> {
//!         Ok(())
//!     }
//!
//!     async fn is_authenticated(&self) -> bool {
//!         true
//!     }
//!
//!     async fn get_activities(&self, _start: usize, _limit: usize) -> AppResult<ActivityPage> {
//!         Ok(ActivityPage::default())
//!     }
//! }
//! ```

use crate::config::ReportConfig;
use crate::errors::AppResult;
use crate::models::Activity;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Credentials accepted by providers
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Credentials {
    /// Pre-issued bearer token
    AccessToken {
        /// Bearer token value
        #[serde(alias = "access_token")]
        token: String,
    },
    /// Account username (email) and password, exchanged for a token
    Password {
        /// Account username or email
        #[serde(alias = "email")]
        username: String,
        /// Account password
        password: String,
    },
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AccessToken { .. } => f
                .debug_struct("AccessToken")
                .field("token", &"[REDACTED]")
                .finish(),
            Self::Password { username, .. } => f
                .debug_struct("Password")
                .field("username", username)
                .field("password", &"[REDACTED]")
                .finish(),
        }
    }
}

/// One page of the activity list
///
/// `records_received` counts every record the source returned, including ones
/// that were skipped during conversion. Paging decisions use this count so a
/// malformed record never ends the list early.
#[derive(Debug, Clone, Default)]
pub struct ActivityPage {
    /// Converted activities, newest first
    pub activities: Vec<Activity>,
    /// Raw records returned by the source for this page
    pub records_received: usize,
}

impl ActivityPage {
    /// Page where every received record converted
    #[must_use]
    pub fn new(activities: Vec<Activity>) -> Self {
        let records_received = activities.len();
        Self {
            activities,
            records_received,
        }
    }

    /// Page where some of `records_received` records were dropped
    #[must_use]
    pub const fn with_records_received(activities: Vec<Activity>, records_received: usize) -> Self {
        Self {
            activities,
            records_received,
        }
    }

    /// Number of converted activities
    #[must_use]
    pub fn len(&self) -> usize {
        self.activities.len()
    }

    /// Whether the page carries no converted activities
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.activities.is_empty()
    }

    /// Records that failed conversion
    #[must_use]
    pub fn skipped(&self) -> usize {
        self.records_received.saturating_sub(self.activities.len())
    }
}

/// Paged source of activities
///
/// Pages are ordered newest first, like the Garmin activity list.
#[async_trait]
pub trait ActivityProvider: Send + Sync {
    /// Provider name (e.g., "garmin", "fixture")
    fn name(&self) -> &'static str;

    /// Authenticate with the given credentials
    async fn authenticate(&self, credentials: &Credentials) -> AppResult<()>;

    /// Check if provider has valid authentication
    async fn is_authenticated(&self) -> bool;

    /// Fetch one page of activities starting at offset `start`
    async fn get_activities(&self, start: usize, limit: usize) -> AppResult<ActivityPage>;
}

/// Provider factory for creating instances
///
/// Each report request gets its own provider so that sessions authenticated
/// with different credentials never share state.
pub trait ProviderFactory: Send + Sync {
    /// Create a new, unauthenticated provider for the given configuration
    fn create(&self, config: &ReportConfig) -> Box<dyn ActivityProvider>;
}
