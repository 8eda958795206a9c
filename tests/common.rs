// ABOUTME: Shared test utilities and setup functions for integration tests
// ABOUTME: Provides activity builders, a sample week, and an in-process mock Garmin API
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence
#![allow(
    dead_code,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::must_use_candidate,
    clippy::unwrap_used,
    clippy::expect_used
)]
//! Shared test utilities for `weekly_training_report`

use axum::body::Bytes;
use axum::extract::{Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use chrono::{NaiveDate, NaiveDateTime};
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, Once};
use tokio::net::TcpListener;
use weekly_training_report::models::Activity;
use weekly_training_report::providers::utils::RetryConfig;

static INIT_LOGGER: Once = Once::new();

/// Initialize quiet logging for tests (call once per test process)
pub fn init_test_logging() {
    INIT_LOGGER.call_once(|| {
        let log_level = match std::env::var("TEST_LOG").as_deref() {
            Ok("TRACE") => tracing::Level::TRACE,
            Ok("DEBUG") => tracing::Level::DEBUG,
            Ok("INFO") => tracing::Level::INFO,
            _ => tracing::Level::WARN,
        };

        tracing_subscriber::fmt()
            .with_max_level(log_level)
            .with_test_writer()
            .init();
    });
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// Build an activity starting at `start` (`YYYY-MM-DD HH:MM:SS`)
pub fn activity(
    id: u64,
    type_key: &str,
    start: &str,
    duration_seconds: f64,
    distance_meters: f64,
) -> Activity {
    Activity {
        activity_id: id,
        activity_name: format!("Activity {id}"),
        start_time_local: NaiveDateTime::parse_from_str(start, "%Y-%m-%d %H:%M:%S").unwrap(),
        type_key: type_key.to_owned(),
        duration_seconds,
        distance_meters,
        average_hr: None,
        average_power: None,
        normalized_power: None,
        calories: None,
    }
}

pub fn with_hr(mut activity: Activity, hr: f64) -> Activity {
    activity.average_hr = Some(hr);
    activity
}

pub fn with_power(mut activity: Activity, average: f64, normalized: Option<f64>) -> Activity {
    activity.average_power = Some(average);
    activity.normalized_power = normalized;
    activity
}

/// Activities for the week of 2026-10-05..=2026-10-11 plus neighbours
pub fn sample_week() -> Vec<Activity> {
    vec![
        with_hr(activity(1, "running", "2026-10-05 07:00:00", 3133.0, 10_020.0), 148.0),
        with_power(
            with_hr(activity(2, "road_biking", "2026-10-06 17:30:00", 5100.0, 40_500.0), 140.0),
            185.0,
            Some(196.0),
        ),
        activity(3, "lap_swimming", "2026-10-07 06:30:00", 1920.0, 1500.0),
        with_hr(activity(4, "trail_running", "2026-10-09 18:00:00", 2400.0, 7000.0), 152.0),
        activity(5, "strength_training", "2026-10-10 09:00:00", 1800.0, 0.0),
        with_hr(activity(6, "running", "2026-10-11 08:00:00", 5400.0, 16_000.0), 145.0),
        // Outside the week on both sides
        activity(7, "running", "2026-10-04 20:00:00", 1800.0, 5000.0),
        activity(8, "cycling", "2026-10-12 06:00:00", 3600.0, 30_000.0),
    ]
}

/// Garmin activity list JSON for an activity
pub fn garmin_record(activity: &Activity) -> Value {
    json!({
        "activityId": activity.activity_id,
        "activityName": activity.activity_name,
        "startTimeLocal": activity.start_time_local.format("%Y-%m-%d %H:%M:%S").to_string(),
        "activityType": {"typeId": 1, "typeKey": activity.type_key},
        "duration": activity.duration_seconds,
        "distance": activity.distance_meters,
        "averageHR": activity.average_hr,
        "avgPower": activity.average_power,
        "normPower": activity.normalized_power,
        "calories": activity.calories,
    })
}

/// Garmin activity list JSON, newest first
pub fn garmin_records(activities: &[Activity]) -> Vec<Value> {
    let mut sorted: Vec<&Activity> = activities.iter().collect();
    sorted.sort_by(|a, b| b.start_time_local.cmp(&a.start_time_local));
    sorted.into_iter().map(garmin_record).collect()
}

/// Retry policy with millisecond backoffs
pub fn fast_retry() -> RetryConfig {
    RetryConfig {
        initial_backoff_ms: 1,
        ..RetryConfig::default()
    }
}

pub const MOCK_USERNAME: &str = "runner@example.com";
pub const MOCK_PASSWORD: &str = "correct-horse";
pub const MOCK_TOKEN: &str = "mock-access-token";

/// In-process stand-in for the Garmin token and activity list endpoints
pub struct MockGarmin {
    pub base_url: String,
    pub state: Arc<MockState>,
}

#[derive(Default)]
pub struct MockState {
    records: Vec<Value>,
    /// Number of 429 responses to send before serving pages
    rate_limited_remaining: AtomicUsize,
    /// `expires_in` returned by the token endpoint
    token_expires_in: i64,
    /// `(start, limit)` of every served page request
    pub page_requests: Mutex<Vec<(usize, usize)>>,
    pub token_requests: AtomicUsize,
    pub rate_limited_responses: AtomicUsize,
}

impl MockState {
    pub fn page_requests(&self) -> Vec<(usize, usize)> {
        self.page_requests.lock().unwrap().clone()
    }
}

#[derive(Deserialize)]
struct PageQuery {
    start: usize,
    limit: usize,
}

async fn token_handler(State(state): State<Arc<MockState>>, body: Bytes) -> Response {
    state.token_requests.fetch_add(1, Ordering::SeqCst);
    let form: Vec<(String, String)> = url::form_urlencoded::parse(&body)
        .into_owned()
        .collect();
    let field = |name: &str| {
        form.iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    };

    if field("grant_type") == Some("password")
        && field("username") == Some(MOCK_USERNAME)
        && field("password") == Some(MOCK_PASSWORD)
    {
        Json(json!({
            "access_token": MOCK_TOKEN,
            "refresh_token": "mock-refresh",
            "expires_in": state.token_expires_in
        }))
        .into_response()
    } else {
        (
            StatusCode::UNAUTHORIZED,
            Json(json!({"error": "invalid_grant"})),
        )
            .into_response()
    }
}

async fn activities_handler(
    State(state): State<Arc<MockState>>,
    headers: HeaderMap,
    Query(query): Query<PageQuery>,
) -> Response {
    let authorized = headers
        .get(axum::http::header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        == Some(format!("Bearer {MOCK_TOKEN}").as_str());
    if !authorized {
        return StatusCode::UNAUTHORIZED.into_response();
    }

    let limited = state
        .rate_limited_remaining
        .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
        .is_ok();
    if limited {
        state.rate_limited_responses.fetch_add(1, Ordering::SeqCst);
        return StatusCode::TOO_MANY_REQUESTS.into_response();
    }

    state
        .page_requests
        .lock()
        .unwrap()
        .push((query.start, query.limit));

    let page: Vec<Value> = state
        .records
        .iter()
        .skip(query.start)
        .take(query.limit)
        .cloned()
        .collect();
    Json(page).into_response()
}

impl MockGarmin {
    /// Serve `records` (newest first), answering the first `rate_limited` page
    /// requests with 429
    pub async fn start(records: Vec<Value>, rate_limited: usize) -> Self {
        Self::start_with_token_lifetime(records, rate_limited, 3600).await
    }

    /// Like [`MockGarmin::start`], issuing tokens that live `expires_in` seconds
    pub async fn start_with_token_lifetime(
        records: Vec<Value>,
        rate_limited: usize,
        expires_in: i64,
    ) -> Self {
        let state = Arc::new(MockState {
            records,
            rate_limited_remaining: AtomicUsize::new(rate_limited),
            token_expires_in: expires_in,
            ..MockState::default()
        });

        let app = Router::new()
            .route("/token", post(token_handler))
            .route(
                "/activitylist-service/activities/search/activities",
                get(activities_handler),
            )
            .route(
                "/broken/activitylist-service/activities/search/activities",
                get(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "upstream down") }),
            )
            .with_state(state.clone());

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            base_url: format!("http://{addr}"),
            state,
        }
    }

    pub fn token_url(&self) -> String {
        format!("{}/token", self.base_url)
    }
}
