// ABOUTME: Tests for activity streaming iterator for memory-efficient paginated fetching
// ABOUTME: Validates StreamConfig clamping, page stop conditions, and week collection
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

mod common;

use async_trait::async_trait;
use common::{activity, date, init_test_logging, sample_week};
use futures_util::StreamExt;
use std::sync::Mutex;
use weekly_training_report::errors::{AppResult, ErrorCode};
use weekly_training_report::models::Activity;
use weekly_training_report::providers::activity_iterator::{
    collect_window, create_activity_stream, StreamConfig, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE,
    MIN_PAGE_SIZE,
};
use weekly_training_report::providers::{
    ActivityPage, ActivityProvider, Credentials, FixtureProvider,
};
use weekly_training_report::week::WeekWindow;

/// Wraps a fixture and records every page request
struct RecordingProvider {
    inner: FixtureProvider,
    authenticated: bool,
    /// Drop the first activity of every page as if it failed to convert
    drop_first_of_page: bool,
    requests: Mutex<Vec<(usize, usize)>>,
}

impl RecordingProvider {
    fn new(activities: Vec<Activity>) -> Self {
        Self {
            inner: FixtureProvider::new(activities),
            authenticated: true,
            drop_first_of_page: false,
            requests: Mutex::new(Vec::new()),
        }
    }

    fn requests(&self) -> Vec<(usize, usize)> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl ActivityProvider for RecordingProvider {
    fn name(&self) -> &'static str {
        "recording"
    }

    async fn authenticate(&self, _credentials: &Credentials) -> AppResult<()> {
        Ok(())
    }

    async fn is_authenticated(&self) -> bool {
        self.authenticated
    }

    async fn get_activities(&self, start: usize, limit: usize) -> AppResult<ActivityPage> {
        self.requests.lock().unwrap().push((start, limit));
        let page = self.inner.get_activities(start, limit).await?;
        if self.drop_first_of_page && !page.is_empty() {
            let received = page.records_received;
            let kept = page.activities.into_iter().skip(1).collect();
            return Ok(ActivityPage::with_records_received(kept, received));
        }
        Ok(page)
    }
}

/// One activity per day, newest on `2026-10-11`, going back `days` days
fn daily_activities(days: u32) -> Vec<Activity> {
    (0..days)
        .map(|offset| {
            let day = date(2026, 10, 11) - chrono::Duration::days(i64::from(offset));
            activity(
                u64::from(offset),
                "running",
                &format!("{day} 07:00:00"),
                1800.0,
                5000.0,
            )
        })
        .collect()
}

#[test]
fn test_stream_config_default() {
    let config = StreamConfig::default();
    assert_eq!(config.page_size, DEFAULT_PAGE_SIZE);
    assert_eq!(config.max_pages, 50);
}

#[test]
fn test_stream_config_page_size_clamping() {
    assert_eq!(StreamConfig::with_page_size(5).page_size, MIN_PAGE_SIZE);
    assert_eq!(StreamConfig::with_page_size(500).page_size, MAX_PAGE_SIZE);
    assert_eq!(StreamConfig::with_page_size(30).page_size, 30);
}

#[test]
fn test_stream_config_builder_chain() {
    let config = StreamConfig::with_page_size(30).with_max_pages(4);
    assert_eq!(config.page_size, 30);
    assert_eq!(config.max_pages, 4);
}

#[tokio::test]
async fn test_stream_yields_every_activity_across_pages() {
    init_test_logging();
    let provider = RecordingProvider::new(daily_activities(25));

    let ids: Vec<u64> = create_activity_stream(&provider, StreamConfig::with_page_size(10))
        .map(|result| result.unwrap().activity_id)
        .collect()
        .await;

    assert_eq!(ids, (0..25).collect::<Vec<_>>());
    // The third page is short, so paging stops there
    assert_eq!(provider.requests(), vec![(0, 10), (10, 10), (20, 10)]);
}

#[tokio::test]
async fn test_stream_respects_max_pages() {
    let provider = RecordingProvider::new(daily_activities(40));

    let count = create_activity_stream(
        &provider,
        StreamConfig::with_page_size(10).with_max_pages(2),
    )
    .count()
    .await;

    assert_eq!(count, 20);
    assert_eq!(provider.requests().len(), 2);
}

#[tokio::test]
async fn test_exact_multiple_requests_one_empty_page() {
    let provider = RecordingProvider::new(daily_activities(20));

    let count = create_activity_stream(&provider, StreamConfig::with_page_size(10))
        .count()
        .await;

    assert_eq!(count, 20);
    assert_eq!(provider.requests(), vec![(0, 10), (10, 10), (20, 10)]);
}

#[tokio::test]
async fn test_collect_window_stops_at_older_activity() {
    init_test_logging();
    let provider = RecordingProvider::new(daily_activities(60));
    let window = WeekWindow::previous_week(date(2026, 10, 12)).unwrap();

    let activities = collect_window(&provider, &window, StreamConfig::with_page_size(10))
        .await
        .unwrap();

    assert_eq!(activities.len(), 7);
    assert_eq!(activities[0].start_date(), date(2026, 10, 5));
    assert_eq!(activities[6].start_date(), date(2026, 10, 11));
    // The first page already reaches past Monday, so no second page is needed
    assert_eq!(provider.requests(), vec![(0, 10)]);
}

#[tokio::test]
async fn test_collect_window_skips_newer_activities() {
    let provider = RecordingProvider::new(sample_week());
    let window = WeekWindow::previous_week(date(2026, 10, 12)).unwrap();

    let activities = collect_window(&provider, &window, StreamConfig::default())
        .await
        .unwrap();

    let ids: Vec<u64> = activities.iter().map(|a| a.activity_id).collect();
    assert_eq!(ids, vec![1, 2, 3, 4, 5, 6]);
}

#[tokio::test]
async fn test_collect_window_requires_authentication() {
    let mut provider = RecordingProvider::new(sample_week());
    provider.authenticated = false;
    let window = WeekWindow::previous_week(date(2026, 10, 12)).unwrap();

    let err = collect_window(&provider, &window, StreamConfig::default())
        .await
        .unwrap_err();

    assert_eq!(err.code, ErrorCode::ExternalAuthFailed);
    assert!(provider.requests().is_empty());
}

#[tokio::test]
async fn test_dropped_records_keep_pages_full() {
    let mut provider = RecordingProvider::new(daily_activities(25));
    provider.drop_first_of_page = true;

    let ids: Vec<u64> = create_activity_stream(&provider, StreamConfig::with_page_size(10))
        .map(|result| result.unwrap().activity_id)
        .collect()
        .await;

    assert_eq!(ids.len(), 22);
    assert!(!ids.contains(&0) && !ids.contains(&10) && !ids.contains(&20));
    assert_eq!(provider.requests(), vec![(0, 10), (10, 10), (20, 10)]);
}
