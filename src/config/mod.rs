// ABOUTME: Configuration management module for report settings and parameters
// ABOUTME: Environment-only configuration for endpoints, credentials, paging, and the HTTP surface
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Configuration module
//!
//! - **Environment**: report configuration loaded from environment variables

/// Environment-based report configuration
pub mod environment;

pub use environment::{HttpClientConfig, ReportConfig};
