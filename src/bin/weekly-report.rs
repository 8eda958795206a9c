// ABOUTME: Weekly report CLI - renders last week's training as markdown
// ABOUTME: Generates reports, replays function events, and serves the HTTP endpoint
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence
//!
//! Usage:
//! ```bash
//! # Report for the previous week using GARMIN_* credentials
//! weekly-report generate
//!
//! # Report from an exported activity list, written to a file
//! weekly-report generate --input activities.json --reference-date 2026-10-12 --output week.md
//!
//! # Replay a function event
//! weekly-report invoke --event event.json
//!
//! # Serve POST /report and GET /health
//! weekly-report serve --port 8080
//! ```

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use tokio::io::AsyncReadExt;
use tracing::info;
use weekly_training_report::{
    config::ReportConfig,
    handler::{ReportRequest, ReportService, WeeklyReport},
    logging::LoggingConfig,
    providers::{collect_window, FixtureProvider, GarminProviderFactory, StreamConfig},
    report::process_activities,
    routes,
    week::{parse_reference_date, WeekWindow},
};

#[derive(Parser)]
#[command(
    name = "weekly-report",
    about = "Weekly training report",
    long_about = "Summarizes the previous Monday-to-Sunday week of running, cycling, and lap swimming as markdown."
)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Enable debug logging
    #[arg(long, short = 'v', global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Command {
    /// Render the report for the previous week
    Generate {
        /// Date the previous week is computed from (YYYY-MM-DD, defaults to today)
        #[arg(long)]
        reference_date: Option<String>,

        /// Read activities from a JSON export instead of Garmin Connect
        #[arg(long)]
        input: Option<PathBuf>,

        /// Write markdown to this file instead of stdout
        #[arg(long, short)]
        output: Option<PathBuf>,
    },

    /// Run one function event and print the response envelope
    Invoke {
        /// Event file (reads stdin when omitted)
        #[arg(long)]
        event: Option<PathBuf>,
    },

    /// Serve the report over HTTP
    Serve {
        /// Override HTTP port
        #[arg(long)]
        port: Option<u16>,
    },
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    let mut logging = LoggingConfig::from_env();
    if cli.verbose {
        logging = logging.with_level("debug");
    }
    logging.init()?;

    let config = ReportConfig::from_env()?;
    config.validate()?;
    info!("{}", config.summary());

    match cli.command {
        Command::Generate {
            reference_date,
            input,
            output,
        } => {
            generate(config, reference_date.as_deref(), input, output).await?;
            Ok(ExitCode::SUCCESS)
        }
        Command::Invoke { event } => invoke(config, event).await,
        Command::Serve { port } => {
            let port = port.unwrap_or(config.http_port);
            let service = garmin_service(config);
            routes::serve(service, port).await?;
            Ok(ExitCode::SUCCESS)
        }
    }
}

/// Report service backed by one shared Garmin HTTP client
fn garmin_service(config: ReportConfig) -> ReportService {
    let factory = GarminProviderFactory::from_config(&config.http_client);
    ReportService::new(config, Arc::new(factory))
}

async fn generate(
    config: ReportConfig,
    reference_date: Option<&str>,
    input: Option<PathBuf>,
    output: Option<PathBuf>,
) -> Result<()> {
    let reference_date = reference_date.map(parse_reference_date).transpose()?;

    let report = if let Some(path) = input {
        let provider = FixtureProvider::from_file(&path).await?;
        let window = match reference_date {
            Some(date) => WeekWindow::previous_week(date)?,
            None => WeekWindow::previous_week_at_offset(config.utc_offset_hours)?,
        };
        let stream_config =
            StreamConfig::with_page_size(config.page_size).with_max_pages(config.max_pages);
        let activities = collect_window(&provider, &window, stream_config).await?;
        WeeklyReport::from_summary(&process_activities(&activities, &window))
    } else {
        let service = garmin_service(config);
        let request = ReportRequest {
            credentials: None,
            reference_date,
        };
        service.generate(&request).await?
    };

    match output {
        Some(path) => {
            tokio::fs::write(&path, &report.markdown)
                .await
                .with_context(|| format!("Failed to write report to {}", path.display()))?;
            info!(path = %path.display(), "Report written");
        }
        None => println!("{}", report.markdown),
    }
    Ok(())
}

async fn invoke(config: ReportConfig, event: Option<PathBuf>) -> Result<ExitCode> {
    let raw = match event {
        Some(path) => tokio::fs::read_to_string(&path)
            .await
            .with_context(|| format!("Failed to read event {}", path.display()))?,
        None => {
            let mut buffer = String::new();
            tokio::io::stdin()
                .read_to_string(&mut buffer)
                .await
                .context("Failed to read event from stdin")?;
            buffer
        }
    };

    let service = garmin_service(config);
    let response = service.handle_json(&raw).await;
    println!("{}", serde_json::to_string_pretty(&response)?);

    Ok(if response.is_success() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}
