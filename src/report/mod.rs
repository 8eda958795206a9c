// ABOUTME: Weekly report pipeline from activities to markdown
// ABOUTME: Re-exports aggregation, formatting, and markdown rendering
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

/// Per-kind totals and daily descriptions
pub mod aggregation;
/// Duration, pace, and distance formatting
pub mod formatting;
/// Markdown rendering
pub mod markdown;

pub use aggregation::{describe_activity, process_activities, KindTotals, WeeklySummary};
pub use markdown::generate_markdown;
