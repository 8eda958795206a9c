// ABOUTME: Logging configuration and structured logging setup for observability and debugging
// ABOUTME: Configures log levels, formatters, and output destinations for the report pipeline
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Structured logging configuration
//!
//! Logs go to stderr so that `weekly-report generate` can print the markdown
//! report on stdout and be piped into other tools.

use crate::constants::service_names;
use anyhow::Result;
use std::env;
use std::io;
use tracing::info;
use tracing_subscriber::{
    filter::Directive,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter,
};

/// Logging configuration
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,
    /// Output format (json, pretty, compact)
    pub format: LogFormat,
    /// Include source file and line numbers
    pub include_location: bool,
    /// Include span open/close events
    pub include_spans: bool,
    /// Service name for structured logging
    pub service_name: String,
    /// Service version
    pub service_version: String,
}

/// Log output format options
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// `JSON` format for function runtimes and log collectors
    Json,
    /// Pretty format for development
    Pretty,
    /// Compact format for terminals
    Compact,
}

impl LogFormat {
    /// Parse from string with fallback to `Compact`
    #[must_use]
    pub fn from_str_or_default(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "json" => Self::Json,
            "pretty" => Self::Pretty,
            _ => Self::Compact,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".into(),
            format: LogFormat::Compact,
            include_location: false,
            include_spans: false,
            service_name: service_names::WEEKLY_REPORT.into(),
            service_version: env!("CARGO_PKG_VERSION").to_owned(),
        }
    }
}

impl LoggingConfig {
    /// Create logging configuration from environment variables
    #[must_use]
    pub fn from_env() -> Self {
        let level = env::var("RUST_LOG").unwrap_or_else(|_| "info".into());
        let format = env::var("LOG_FORMAT")
            .map_or(LogFormat::Compact, |f| LogFormat::from_str_or_default(&f));

        Self {
            level,
            format,
            include_location: env::var("LOG_INCLUDE_LOCATION").is_ok(),
            include_spans: env::var("LOG_INCLUDE_SPANS").is_ok(),
            ..Self::default()
        }
    }

    /// Override the level, keeping everything else
    #[must_use]
    pub fn with_level(mut self, level: impl Into<String>) -> Self {
        self.level = level.into();
        self
    }

    /// Build the filter with noise reduction for HTTP internals
    fn env_filter(&self) -> EnvFilter {
        let directive = |d: &str, fallback: tracing::Level| -> Directive {
            d.parse().unwrap_or_else(|_| fallback.into())
        };

        EnvFilter::new(&self.level)
            .add_directive(directive("hyper=warn", tracing::Level::WARN))
            .add_directive(directive("hyper_util=warn", tracing::Level::WARN))
            .add_directive(directive("reqwest=warn", tracing::Level::WARN))
            .add_directive(directive("rustls=warn", tracing::Level::WARN))
            .add_directive(directive("tower_http=info", tracing::Level::INFO))
    }

    /// Initialize the global tracing subscriber
    ///
    /// # Errors
    ///
    /// Returns an error if a global subscriber is already installed
    pub fn init(&self) -> Result<()> {
        let registry = tracing_subscriber::registry().with(self.env_filter());
        let span_events = if self.include_spans {
            FmtSpan::NEW | FmtSpan::CLOSE
        } else {
            FmtSpan::NONE
        };

        match self.format {
            LogFormat::Json => {
                let json_layer = fmt::layer()
                    .with_file(self.include_location)
                    .with_line_number(self.include_location)
                    .with_target(true)
                    .with_writer(io::stderr)
                    .with_span_events(span_events)
                    .json();
                registry.with(json_layer).try_init()?;
            }
            LogFormat::Pretty => {
                let pretty_layer = fmt::layer()
                    .pretty()
                    .with_file(self.include_location)
                    .with_line_number(self.include_location)
                    .with_target(true)
                    .with_writer(io::stderr)
                    .with_span_events(span_events);
                registry.with(pretty_layer).try_init()?;
            }
            LogFormat::Compact => {
                let compact_layer = fmt::layer()
                    .compact()
                    .with_file(false)
                    .with_line_number(false)
                    .with_target(false)
                    .with_writer(io::stderr)
                    .with_span_events(FmtSpan::NONE);
                registry.with(compact_layer).try_init()?;
            }
        }

        info!(
            service.name = %self.service_name,
            service.version = %self.service_version,
            log.level = %self.level,
            log.format = ?self.format,
            "Weekly report starting up"
        );

        Ok(())
    }
}

/// Initialize logging from environment
///
/// # Errors
///
/// Returns an error if logging initialization fails
pub fn init_from_env() -> Result<()> {
    LoggingConfig::from_env().init()
}
