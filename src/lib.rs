// ABOUTME: Main library entry point for the weekly training report
// ABOUTME: Fetches last week's Garmin activities and renders a markdown summary
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![deny(unsafe_code)]

//! # Weekly Training Report
//!
//! Builds a markdown summary of the most recently completed Monday to Sunday
//! week of running, cycling, and lap swimming sessions.
//!
//! ## Pipeline
//!
//! 1. Parse the request ([`handler::ReportRequest`])
//! 2. Resolve the week ([`week::WeekWindow`])
//! 3. Authenticate and page through the activity list
//!    ([`providers::collect_window`])
//! 4. Aggregate ([`report::process_activities`])
//! 5. Render ([`report::generate_markdown`])
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use weekly_training_report::config::ReportConfig;
//! use weekly_training_report::errors::AppResult;
//! use weekly_training_report::handler::{ReportRequest, ReportService};
//! use weekly_training_report::providers::GarminProviderFactory;
//!
//! #[tokio::main]
//! async fn main() -> AppResult<()> {
//!     let config = ReportConfig::from_env()?;
//!     let factory = GarminProviderFactory::from_config(&config.http_client);
//!     let service = ReportService::new(config, Arc::new(factory));
//!
//!     let report = service.generate(&ReportRequest::default()).await?;
//!     println!("{}", report.markdown);
//!
//!     Ok(())
//! }
//! ```

// ── Public API ──────────────────────────────────────────────────────────
// These modules are used by the binary (src/bin/) and integration tests (tests/).

/// Configuration management
pub mod config;

/// Application constants and limits
pub mod constants;

/// Unified error handling
pub mod errors;

/// Function endpoint request/response envelope
pub mod handler;

/// Structured logging setup
pub mod logging;

/// Activity data models
pub mod models;

/// Activity providers (Garmin Connect, JSON fixtures)
pub mod providers;

/// Weekly aggregation and markdown rendering
pub mod report;

/// `HTTP` routes
pub mod routes;

/// Utility functions and helpers
pub mod utils;

/// Week window computation
pub mod week;
