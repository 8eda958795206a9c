// ABOUTME: HTTP routes exposing the weekly report and a health check
// ABOUTME: Wraps the report service in an axum router with CORS and request tracing layers
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! HTTP surface
//!
//! `POST /report` takes the same payload as the function endpoint and answers
//! with the envelope's status and body. `GET /health` is for load balancers.

use crate::errors::{AppError, AppResult};
use crate::handler::{ReportResponse, ReportService};
use axum::body::Bytes;
use axum::extract::State;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use http::{header, HeaderValue, Method, StatusCode};
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

/// Health routes implementation
pub struct HealthRoutes;

impl HealthRoutes {
    /// Create health check routes
    pub fn routes() -> Router {
        async fn health_handler() -> Json<serde_json::Value> {
            Json(serde_json::json!({
                "status": "healthy",
                "timestamp": chrono::Utc::now().to_rfc3339()
            }))
        }

        Router::new().route("/health", get(health_handler))
    }
}

/// Report routes implementation
pub struct ReportRoutes;

impl ReportRoutes {
    /// Create report routes bound to `service`
    pub fn routes(service: ReportService) -> Router {
        async fn report_handler(State(service): State<ReportService>, body: Bytes) -> Response {
            let raw = String::from_utf8_lossy(&body);
            service.handle_json(&raw).await.into_response()
        }

        Router::new()
            .route("/report", post(report_handler))
            .with_state(service)
    }
}

impl IntoResponse for ReportResponse {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.status_code)
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        let mut response = (status, self.body).into_response();
        let headers = response.headers_mut();
        for (name, value) in &self.headers {
            if let (Ok(name), Ok(value)) = (
                header::HeaderName::from_bytes(name.as_bytes()),
                HeaderValue::from_str(value),
            ) {
                headers.insert(name, value);
            }
        }
        response
    }
}

/// CORS layer allowing any origin
pub fn setup_cors() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(AllowOrigin::any())
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION, header::ACCEPT])
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
}

/// Full router with CORS and tracing layers
pub fn build_router(service: ReportService) -> Router {
    Router::new()
        .merge(HealthRoutes::routes())
        .merge(ReportRoutes::routes(service))
        .layer(setup_cors())
        .layer(TraceLayer::new_for_http())
}

/// Bind `port` on all interfaces and serve until Ctrl-C
pub async fn serve(service: ReportService, port: u16) -> AppResult<()> {
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = TcpListener::bind(addr).await.map_err(|e| {
        AppError::config(format!("Failed to bind HTTP port {port}: {e}")).with_source(e)
    })?;
    info!(%addr, "Weekly report HTTP server listening");

    axum::serve(listener, build_router(service))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| AppError::internal(format!("HTTP server error: {e}")).with_source(e))?;

    info!("HTTP server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
