// ABOUTME: HTTP route tests for the report and health endpoints
// ABOUTME: Drives the axum router in-process with tower oneshot requests
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

mod common;

use axum::body::{to_bytes, Body};
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use common::sample_week;
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;
use weekly_training_report::config::ReportConfig;
use weekly_training_report::handler::ReportService;
use weekly_training_report::providers::FixtureProvider;
use weekly_training_report::routes::build_router;

fn router() -> Router {
    let service = ReportService::new(
        ReportConfig::default(),
        Arc::new(FixtureProvider::new(sample_week())),
    );
    build_router(service)
}

async fn json_body(response: axum::response::Response) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

fn post_report(body: &Value) -> Request<Body> {
    Request::builder()
        .method(Method::POST)
        .uri("/report")
        .header(header::CONTENT_TYPE, "application/json")
        .header(header::ORIGIN, "https://dashboard.example.com")
        .body(Body::from(body.to_string()))
        .unwrap()
}

#[tokio::test]
async fn test_health() {
    let response = router()
        .oneshot(
            Request::builder()
                .uri("/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["status"], "healthy");
    assert!(body["timestamp"].is_string());
}

#[tokio::test]
async fn test_report_success() {
    let response = router()
        .oneshot(post_report(&json!({
            "access_token": "t",
            "reference_date": "2026-10-12"
        })))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN],
        "*"
    );
    assert_eq!(response.headers()[header::CONTENT_TYPE], "application/json");
    let body = json_body(response).await;
    assert_eq!(body["activity_count"], 5);
    assert_eq!(body["week_start"], "2026-10-05");
}

#[tokio::test]
async fn test_report_error_uses_code_status() {
    let response = router().oneshot(post_report(&json!({}))).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN],
        "*"
    );
    let body = json_body(response).await;
    assert_eq!(body["code"], "MISSING_REQUIRED_FIELD");
}

#[tokio::test]
async fn test_report_extreme_reference_date_is_client_error() {
    let response = router()
        .oneshot(post_report(&json!({
            "access_token": "x",
            "reference_date": "-262143-01-03"
        })))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(json_body(response).await["code"], "INVALID_INPUT");
}

#[tokio::test]
async fn test_report_malformed_body() {
    let request = Request::builder()
        .method(Method::POST)
        .uri("/report")
        .body(Body::from("{oops"))
        .unwrap();

    let response = router().oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(json_body(response).await["code"], "INVALID_FORMAT");
}

#[tokio::test]
async fn test_cors_preflight() {
    let request = Request::builder()
        .method(Method::OPTIONS)
        .uri("/report")
        .header(header::ORIGIN, "https://dashboard.example.com")
        .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
        .body(Body::empty())
        .unwrap();

    let response = router().oneshot(request).await.unwrap();

    assert!(response.status().is_success());
    assert_eq!(
        response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN],
        "*"
    );
}

#[tokio::test]
async fn test_unknown_route() {
    let response = router()
        .oneshot(
            Request::builder()
                .uri("/nope")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
