// ABOUTME: Streaming activity iterator for memory-efficient paginated fetching
// ABOUTME: Implements futures::Stream over provider pages and collects one week's activities
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Streaming Activity Iterator
//!
//! Activities are fetched lazily page by page and yielded one at a time.
//! Because the activity list is ordered newest first, [`collect_window`] can
//! stop paging as soon as it sees an activity older than the week it needs.
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use futures_util::StreamExt;
//! use weekly_training_report::providers::activity_iterator::{create_activity_stream, StreamConfig};
//! use weekly_training_report::providers::core::ActivityProvider;
//!
//! async fn example(provider: &dyn ActivityProvider) {
//!     let mut stream = create_activity_stream(provider, StreamConfig::with_page_size(25));
//!
//!     while let Some(result) = stream.next().await {
//!         match result {
//!             Ok(activity) => println!("Activity: {}", activity.activity_name),
//!             Err(e) => eprintln!("Error: {e}"),
//!         }
//!     }
//! }
//! ```

use std::collections::VecDeque;
use std::pin::Pin;

use async_stream::try_stream;
use futures_util::{Stream, StreamExt};
use tracing::{debug, info};

use super::core::ActivityProvider;
use crate::constants::{api_provider_limits, defaults};
use crate::errors::{AppError, AppResult};
use crate::models::Activity;
use crate::week::WeekWindow;

/// Default page size for activity streaming
pub const DEFAULT_PAGE_SIZE: usize = api_provider_limits::garmin::DEFAULT_ACTIVITIES_PER_PAGE;

/// Minimum page size to prevent excessive API calls
pub const MIN_PAGE_SIZE: usize = 10;

/// Maximum page size accepted by the activity list endpoint
pub const MAX_PAGE_SIZE: usize = api_provider_limits::garmin::MAX_ACTIVITIES_PER_REQUEST;

/// Configuration for activity streaming behavior
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StreamConfig {
    /// Number of activities to fetch per page
    pub page_size: usize,
    /// Maximum number of pages to request
    pub max_pages: usize,
}

impl Default for StreamConfig {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            max_pages: defaults::MAX_PAGES,
        }
    }
}

impl StreamConfig {
    /// Create configuration with specified page size
    #[must_use]
    pub fn with_page_size(page_size: usize) -> Self {
        Self {
            page_size: page_size.clamp(MIN_PAGE_SIZE, MAX_PAGE_SIZE),
            ..Self::default()
        }
    }

    /// Set maximum number of pages to request
    #[must_use]
    pub fn with_max_pages(mut self, max_pages: usize) -> Self {
        self.max_pages = max_pages.max(1);
        self
    }
}

/// Type alias for the activity stream returned by `create_activity_stream`
pub type ActivityStream<'a> = Pin<Box<dyn Stream<Item = AppResult<Activity>> + Send + 'a>>;

/// Create a streaming iterator over activities from a provider
///
/// The stream stops after an empty page, a page with fewer raw records than
/// requested, or `max_pages` pages.
pub fn create_activity_stream(
    provider: &dyn ActivityProvider,
    config: StreamConfig,
) -> ActivityStream<'_> {
    let page_size = config.page_size.clamp(MIN_PAGE_SIZE, MAX_PAGE_SIZE);
    let max_pages = config.max_pages.max(1);

    Box::pin(try_stream! {
        let mut buffer: VecDeque<Activity> = VecDeque::new();
        let mut pages_fetched: usize = 0;
        let mut exhausted = false;

        loop {
            if let Some(activity) = buffer.pop_front() {
                yield activity;
                continue;
            }

            if exhausted {
                break;
            }

            let start = pages_fetched * page_size;
            let page = provider.get_activities(start, page_size).await?;
            pages_fetched += 1;

            debug!(
                provider = provider.name(),
                page = pages_fetched,
                received = page.records_received,
                skipped = page.skipped(),
                "Fetched activity page"
            );

            // Records dropped during conversion still count toward a full page
            if page.records_received < page_size || pages_fetched >= max_pages {
                exhausted = true;
            }
            buffer.extend(page.activities);
        }
    })
}

/// Collect the activities that started within `window`
///
/// Relies on newest-first ordering: paging stops once an activity older than
/// the window start has been seen. Returns activities in ascending start order.
pub async fn collect_window(
    provider: &dyn ActivityProvider,
    window: &WeekWindow,
    config: StreamConfig,
) -> AppResult<Vec<Activity>> {
    if !provider.is_authenticated().await {
        return Err(AppError::external_auth_failed(format!(
            "{} provider is not authenticated",
            provider.name()
        )));
    }

    let mut stream = create_activity_stream(provider, config);
    let mut in_window = Vec::new();
    let mut scanned: usize = 0;

    while let Some(activity) = stream.next().await {
        let activity = activity?;
        scanned += 1;
        let date = activity.start_date();

        if date < window.start {
            break;
        }
        if window.contains(date) {
            in_window.push(activity);
        }
    }

    in_window.sort_by(|a, b| a.start_time_local.cmp(&b.start_time_local));

    info!(
        provider = provider.name(),
        scanned,
        in_window = in_window.len(),
        week_start = %window.start,
        week_end = %window.end,
        "Collected activities for week"
    );

    Ok(in_window)
}
