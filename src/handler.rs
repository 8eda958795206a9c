// ABOUTME: Request/response envelope for running the weekly report as a function endpoint
// ABOUTME: Parses invocation events, runs the report pipeline, and maps errors to HTTP responses
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Report Handler
//!
//! Accepts either a function-as-a-service event, where the payload sits in
//! `body` as a JSON string (optionally base64 encoded) or object, or a bare
//! payload object:
//!
//! ```json
//! {"username": "runner@example.com", "password": "...", "reference_date": "2026-10-12"}
//! ```
//!
//! [`ReportService::handle`] is the single top-level catch: every failure is
//! turned into an error envelope with the status of its [`ErrorCode`].
//!
//! [`ErrorCode`]: crate::errors::ErrorCode

use crate::config::ReportConfig;
use crate::constants::headers;
use crate::errors::{AppError, AppResult, ErrorResponse};
use crate::providers::{collect_window, Credentials, ProviderFactory, StreamConfig};
use crate::report::{generate_markdown, process_activities, WeeklySummary};
use crate::week::{parse_reference_date, WeekWindow};
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{error, info, info_span, warn, Instrument};
use uuid::Uuid;

/// Raw payload fields as sent by callers
#[derive(Debug, Default, Deserialize)]
struct RequestPayload {
    #[serde(default, alias = "email")]
    username: Option<String>,
    #[serde(default)]
    password: Option<String>,
    #[serde(default)]
    access_token: Option<String>,
    #[serde(default)]
    reference_date: Option<String>,
}

/// Function invocation event wrapping the payload
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct FunctionEvent {
    #[serde(default)]
    body: Value,
    #[serde(default)]
    is_base64_encoded: bool,
}

/// Parsed report request
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReportRequest {
    /// Credentials carried by the request, if any
    pub credentials: Option<Credentials>,
    /// Date the "previous week" is computed from (defaults to today)
    pub reference_date: Option<NaiveDate>,
}

impl ReportRequest {
    /// Parse an invocation event or a bare payload object
    pub fn from_event(event: &Value) -> AppResult<Self> {
        let Value::Object(fields) = event else {
            return Err(AppError::invalid_input(
                "Request must be a JSON object",
            ));
        };

        if fields.contains_key("body") {
            let event: FunctionEvent = serde_json::from_value(event.clone())
                .map_err(|e| AppError::invalid_format(format!("Invalid event: {e}")))?;
            Self::from_payload(Self::decode_body(event)?)
        } else {
            Self::from_payload(Self::payload_from_value(event.clone())?)
        }
    }

    /// Parse a raw JSON document (event or bare payload)
    pub fn from_json(raw: &str) -> AppResult<Self> {
        if raw.trim().is_empty() {
            return Ok(Self::default());
        }
        let value: Value = serde_json::from_str(raw)
            .map_err(|e| AppError::invalid_format(format!("Request is not valid JSON: {e}")))?;
        Self::from_event(&value)
    }

    fn decode_body(event: FunctionEvent) -> AppResult<RequestPayload> {
        match event.body {
            Value::Null => Ok(RequestPayload::default()),
            Value::String(body) => {
                let body = if event.is_base64_encoded {
                    let bytes = BASE64.decode(body.trim()).map_err(|e| {
                        AppError::invalid_format(format!("Body is not valid base64: {e}"))
                    })?;
                    String::from_utf8(bytes).map_err(|e| {
                        AppError::invalid_format(format!("Body is not valid UTF-8: {e}"))
                    })?
                } else {
                    body
                };
                if body.trim().is_empty() {
                    return Ok(RequestPayload::default());
                }
                serde_json::from_str(&body).map_err(|e| {
                    AppError::invalid_format(format!("Request body is not a valid payload: {e}"))
                })
            }
            other @ Value::Object(_) => Self::payload_from_value(other),
            _ => Err(AppError::invalid_input(
                "Request body must be a JSON object or string",
            )),
        }
    }

    fn payload_from_value(value: Value) -> AppResult<RequestPayload> {
        serde_json::from_value(value)
            .map_err(|e| AppError::invalid_format(format!("Invalid request payload: {e}")))
    }

    fn from_payload(payload: RequestPayload) -> AppResult<Self> {
        let non_empty = |value: Option<String>| value.filter(|v| !v.trim().is_empty());
        let username = non_empty(payload.username);
        let password = non_empty(payload.password);

        let credentials = match (non_empty(payload.access_token), username, password) {
            (Some(token), _, _) => Some(Credentials::AccessToken { token }),
            (None, Some(username), Some(password)) => {
                Some(Credentials::Password { username, password })
            }
            (None, Some(_), None) => return Err(AppError::missing_field("password")),
            (None, None, Some(_)) => return Err(AppError::missing_field("username")),
            (None, None, None) => None,
        };

        let reference_date = payload
            .reference_date
            .as_deref()
            .map(parse_reference_date)
            .transpose()?;

        Ok(Self {
            credentials,
            reference_date,
        })
    }
}

/// Successful report result
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeeklyReport {
    /// Rendered markdown
    pub markdown: String,
    /// Monday of the reported week
    pub week_start: NaiveDate,
    /// Sunday of the reported week
    pub week_end: NaiveDate,
    /// Sessions included in the report
    pub activity_count: u32,
}

impl WeeklyReport {
    /// Render a summary
    #[must_use]
    pub fn from_summary(summary: &WeeklySummary) -> Self {
        Self {
            markdown: generate_markdown(summary),
            week_start: summary.window.start,
            week_end: summary.window.end,
            activity_count: summary.activity_count(),
        }
    }
}

/// Function response envelope
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportResponse {
    /// HTTP status code
    pub status_code: u16,
    /// Response headers
    pub headers: BTreeMap<String, String>,
    /// JSON-encoded body
    pub body: String,
}

impl ReportResponse {
    fn with_body(status_code: u16, body: String) -> Self {
        let header_map = BTreeMap::from([
            (
                headers::ACCESS_CONTROL_ALLOW_ORIGIN.to_owned(),
                "*".to_owned(),
            ),
            (
                headers::CONTENT_TYPE.to_owned(),
                headers::APPLICATION_JSON.to_owned(),
            ),
        ]);
        Self {
            status_code,
            headers: header_map,
            body,
        }
    }

    /// 200 response carrying the report
    #[must_use]
    pub fn success(report: &WeeklyReport) -> Self {
        match serde_json::to_string(report) {
            Ok(body) => Self::with_body(200, body),
            Err(e) => Self::error(&AppError::from(e)),
        }
    }

    /// Error response using the status of the error code
    #[must_use]
    pub fn error(err: &AppError) -> Self {
        let body = serde_json::to_string(&ErrorResponse::from(err)).unwrap_or_else(|_| {
            r#"{"error":"Internal server error","code":"INTERNAL_ERROR"}"#.to_owned()
        });
        Self::with_body(err.http_status(), body)
    }

    /// Whether the status is 2xx
    #[must_use]
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status_code)
    }
}

/// Runs the report pipeline for incoming requests
#[derive(Clone)]
pub struct ReportService {
    config: Arc<ReportConfig>,
    factory: Arc<dyn ProviderFactory>,
}

impl ReportService {
    /// Create a service using `factory` for per-request providers
    #[must_use]
    pub fn new(config: ReportConfig, factory: Arc<dyn ProviderFactory>) -> Self {
        Self {
            config: Arc::new(config),
            factory,
        }
    }

    /// Service configuration
    #[must_use]
    pub fn config(&self) -> &ReportConfig {
        &self.config
    }

    /// Authenticate, collect last week's activities, and render the report
    pub async fn generate(&self, request: &ReportRequest) -> AppResult<WeeklyReport> {
        let credentials = request
            .credentials
            .as_ref()
            .or(self.config.credentials.as_ref())
            .ok_or_else(|| AppError::missing_field("username"))?;

        let window = match request.reference_date {
            Some(date) => WeekWindow::previous_week(date)?,
            None => WeekWindow::previous_week_at_offset(self.config.utc_offset_hours)?,
        };
        info!(week = %window.describe(), "Generating weekly report");

        let provider = self.factory.create(&self.config);
        provider.authenticate(credentials).await?;

        let stream_config = StreamConfig::with_page_size(self.config.page_size)
            .with_max_pages(self.config.max_pages);
        let activities = collect_window(provider.as_ref(), &window, stream_config).await?;

        let summary = process_activities(&activities, &window);
        info!(
            activities = summary.activity_count(),
            skipped = summary.skipped,
            "Weekly summary computed"
        );

        Ok(WeeklyReport::from_summary(&summary))
    }

    /// Handle an invocation event; never fails
    pub async fn handle(&self, event: &Value) -> ReportResponse {
        let span = info_span!("report_request", request_id = %Uuid::new_v4());
        async {
            let result = match ReportRequest::from_event(event) {
                Ok(request) => self.generate(&request).await,
                Err(e) => Err(e),
            };
            Self::respond(result)
        }
        .instrument(span)
        .await
    }

    /// Handle a raw JSON document; never fails
    pub async fn handle_json(&self, raw: &str) -> ReportResponse {
        if raw.trim().is_empty() {
            return self.handle(&Value::Object(serde_json::Map::new())).await;
        }
        match serde_json::from_str::<Value>(raw) {
            Ok(event) => self.handle(&event).await,
            Err(e) => Self::respond(Err(AppError::invalid_format(format!(
                "Request is not valid JSON: {e}"
            )))),
        }
    }

    fn respond(result: AppResult<WeeklyReport>) -> ReportResponse {
        match result {
            Ok(report) => {
                info!(
                    week_start = %report.week_start,
                    activities = report.activity_count,
                    "Report generated"
                );
                ReportResponse::success(&report)
            }
            Err(e) if e.http_status() >= 500 => {
                error!(code = ?e.code, error = %e, "Report generation failed");
                ReportResponse::error(&e)
            }
            Err(e) => {
                warn!(code = ?e.code, error = %e, "Report request rejected");
                ReportResponse::error(&e)
            }
        }
    }
}
