// ABOUTME: Unified error handling with error codes, HTTP status mapping, and response bodies
// ABOUTME: Every pipeline stage returns AppResult so the envelope layer can render one error shape
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Unified Error Handling
//!
//! Standard error type for the report pipeline. Each error carries an
//! [`ErrorCode`] that decides the HTTP status of the response envelope and a
//! human-readable message that becomes the `error` field of the body.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Standard error codes used throughout the application
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ErrorCode {
    // Validation (3000-3999)
    /// Request payload could not be understood
    #[serde(rename = "INVALID_INPUT")]
    InvalidInput = 3000,
    /// Required value (usually credentials) is absent
    #[serde(rename = "MISSING_REQUIRED_FIELD")]
    MissingRequiredField = 3001,
    /// Value present but malformed (dates, base64, JSON)
    #[serde(rename = "INVALID_FORMAT")]
    InvalidFormat = 3002,

    // External Services (5000-5999)
    /// Third-party API returned an error
    #[serde(rename = "EXTERNAL_SERVICE_ERROR")]
    ExternalServiceError = 5000,
    /// Third-party API could not be reached
    #[serde(rename = "EXTERNAL_SERVICE_UNAVAILABLE")]
    ExternalServiceUnavailable = 5001,
    /// Third-party API rejected the credentials
    #[serde(rename = "EXTERNAL_AUTH_FAILED")]
    ExternalAuthFailed = 5002,
    /// Third-party API kept answering 429
    #[serde(rename = "EXTERNAL_RATE_LIMITED")]
    ExternalRateLimited = 5003,

    // Configuration (6000-6999)
    /// Configuration is present but invalid
    #[serde(rename = "CONFIG_INVALID")]
    ConfigInvalid = 6002,

    // Internal Errors (9000-9999)
    /// Unexpected failure
    #[serde(rename = "INTERNAL_ERROR")]
    InternalError = 9000,
    /// Data serialization/deserialization failed
    #[serde(rename = "SERIALIZATION_ERROR")]
    SerializationError = 9003,
}

impl ErrorCode {
    /// Get the HTTP status code for this error
    #[must_use]
    pub const fn http_status(self) -> u16 {
        match self {
            Self::InvalidInput | Self::MissingRequiredField | Self::InvalidFormat => 400,
            Self::ExternalServiceError | Self::ExternalAuthFailed => 502,
            Self::ExternalServiceUnavailable | Self::ExternalRateLimited => 503,
            Self::ConfigInvalid | Self::InternalError | Self::SerializationError => 500,
        }
    }

    /// Get a user-friendly description of this error
    #[must_use]
    pub const fn description(self) -> &'static str {
        match self {
            Self::InvalidInput => "The provided input is invalid",
            Self::MissingRequiredField => "A required field is missing from the request",
            Self::InvalidFormat => "The data format is invalid",
            Self::ExternalServiceError => "An external service encountered an error",
            Self::ExternalServiceUnavailable => "An external service is currently unavailable",
            Self::ExternalAuthFailed => "Authentication with external service failed",
            Self::ExternalRateLimited => "External service rate limit exceeded",
            Self::ConfigInvalid => "Configuration is invalid",
            Self::InternalError => "An internal error occurred",
            Self::SerializationError => "Data serialization/deserialization failed",
        }
    }
}

/// Unified error type for the application
#[derive(Debug, Error)]
pub struct AppError {
    /// Error code
    pub code: ErrorCode,
    /// Human-readable error message
    pub message: String,
    /// Source error for error chaining
    #[source]
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl AppError {
    /// Create a new `AppError` with the given code and message
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            source: None,
        }
    }

    /// Add a source error for error chaining
    #[must_use]
    pub fn with_source(mut self, source: impl std::error::Error + Send + Sync + 'static) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    /// Get the HTTP status code for this error
    #[must_use]
    pub const fn http_status(&self) -> u16 {
        self.code.http_status()
    }

    /// Invalid input
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidInput, message)
    }

    /// Missing required field
    pub fn missing_field(field: &str) -> Self {
        Self::new(
            ErrorCode::MissingRequiredField,
            format!("Missing required field: {field}"),
        )
    }

    /// Malformed value
    pub fn invalid_format(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidFormat, message)
    }

    /// External service error
    pub fn external_service(service: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(
            ErrorCode::ExternalServiceError,
            format!("{}: {}", service.into(), message.into()),
        )
    }

    /// External service unreachable
    pub fn external_unavailable(service: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(
            ErrorCode::ExternalServiceUnavailable,
            format!("{}: {}", service.into(), message.into()),
        )
    }

    /// Credentials rejected by the external service
    pub fn external_auth_failed(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ExternalAuthFailed, message)
    }

    /// External rate limit exhausted retries
    pub fn external_rate_limited(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ExternalRateLimited, message)
    }

    /// Configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ConfigInvalid, message)
    }

    /// Internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InternalError, message)
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code.description(), self.message)
    }
}

/// Result type alias for convenience
pub type AppResult<T> = Result<T, AppError>;

/// Error body returned inside the response envelope
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Human-readable message
    pub error: String,
    /// Machine-readable code
    pub code: ErrorCode,
}

impl From<&AppError> for ErrorResponse {
    fn from(error: &AppError) -> Self {
        Self {
            error: error.message.clone(),
            code: error.code,
        }
    }
}

impl From<anyhow::Error> for AppError {
    fn from(error: anyhow::Error) -> Self {
        Self::internal(format!("{error:#}"))
    }
}

impl From<serde_json::Error> for AppError {
    fn from(error: serde_json::Error) -> Self {
        Self::new(ErrorCode::SerializationError, error.to_string()).with_source(error)
    }
}

impl From<reqwest::Error> for AppError {
    fn from(error: reqwest::Error) -> Self {
        let message = error.to_string();
        if error.is_timeout() || error.is_connect() {
            Self::external_unavailable("HTTP", message).with_source(error)
        } else if error.is_decode() {
            Self::new(ErrorCode::SerializationError, message).with_source(error)
        } else {
            Self::external_service("HTTP", message).with_source(error)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code_http_status() {
        assert_eq!(ErrorCode::MissingRequiredField.http_status(), 400);
        assert_eq!(ErrorCode::ExternalAuthFailed.http_status(), 502);
        assert_eq!(ErrorCode::ExternalRateLimited.http_status(), 503);
        assert_eq!(ErrorCode::InternalError.http_status(), 500);
    }

    #[test]
    fn test_display_includes_description() {
        let error = AppError::missing_field("password");
        assert_eq!(
            error.to_string(),
            "A required field is missing from the request: Missing required field: password"
        );
    }

    #[test]
    fn test_error_response_serialization() {
        let error = AppError::external_auth_failed("bad credentials");
        let json = serde_json::to_string(&ErrorResponse::from(&error)).unwrap();
        assert!(json.contains("EXTERNAL_AUTH_FAILED"));
        assert!(json.contains("bad credentials"));
    }

    #[test]
    fn test_serde_error_conversion() {
        let err = serde_json::from_str::<serde_json::Value>("{not json").unwrap_err();
        let app: AppError = err.into();
        assert_eq!(app.code, ErrorCode::SerializationError);
    }
}
