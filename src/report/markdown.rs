// ABOUTME: Markdown rendering of a weekly summary
// ABOUTME: Produces the overview table, per-kind sections, and the daily breakdown
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use super::aggregation::{KindTotals, WeeklySummary};
use super::formatting::{
    format_distance_km, format_distance_m, format_duration, format_pace, format_speed_kmh,
};
use crate::models::ActivityKind;
use crate::week::WeekWindow;
use std::fmt::Write;

/// Render the weekly summary as markdown
#[must_use]
pub fn generate_markdown(summary: &WeeklySummary) -> String {
    let mut out = String::new();

    out.push_str("# Weekly Training Report\n\n");
    let _ = writeln!(out, "**Week:** {}\n", summary.window.describe());

    render_overview(&mut out, summary);

    for kind in ActivityKind::ALL {
        render_kind_section(&mut out, summary.totals(kind));
    }

    render_daily_breakdown(&mut out, summary);

    if summary.skipped > 0 {
        let _ = writeln!(
            out,
            "\n_{} other activit{} not included._",
            summary.skipped,
            if summary.skipped == 1 { "y was" } else { "ies were" }
        );
    }

    out
}

fn kind_distance(kind: ActivityKind, meters: f64) -> String {
    match kind {
        ActivityKind::LapSwimming => format_distance_m(meters),
        ActivityKind::Running | ActivityKind::Cycling => format_distance_km(meters),
    }
}

fn render_overview(out: &mut String, summary: &WeeklySummary) {
    out.push_str("## Overview\n\n");
    out.push_str("| Activity | Sessions | Time | Distance |\n");
    out.push_str("|---|---:|---:|---:|\n");
    for kind in ActivityKind::ALL {
        let totals = summary.totals(kind);
        let _ = writeln!(
            out,
            "| {} | {} | {} | {} |",
            kind.label(),
            totals.count,
            format_duration(totals.total_duration_seconds),
            kind_distance(kind, totals.total_distance_meters)
        );
    }
    let _ = writeln!(
        out,
        "| **Total** | **{}** | **{}** | **{}** |\n",
        summary.activity_count(),
        format_duration(summary.total_duration_seconds()),
        format_distance_km(summary.total_distance_meters())
    );
}

fn render_kind_section(out: &mut String, totals: &KindTotals) {
    let kind = totals.kind;
    let _ = writeln!(out, "## {}\n", kind.label());

    if totals.count == 0 {
        out.push_str("_No sessions recorded._\n\n");
        return;
    }

    let _ = writeln!(out, "- Sessions: {}", totals.count);
    let _ = writeln!(
        out,
        "- Total time: {}",
        format_duration(totals.total_duration_seconds)
    );
    let _ = writeln!(
        out,
        "- Total distance: {}",
        kind_distance(kind, totals.total_distance_meters)
    );

    match kind {
        ActivityKind::Running => {
            if let Some(pace) = totals.average_pace_seconds() {
                let _ = writeln!(out, "- Average pace: {} /km", format_pace(pace));
            }
        }
        ActivityKind::Cycling => {
            if let Some(speed) = totals.average_speed_kmh() {
                let _ = writeln!(out, "- Average speed: {}", format_speed_kmh(speed));
            }
            if let Some(power) = totals.average_power() {
                let _ = writeln!(out, "- Average power: {power:.0} W");
            }
        }
        ActivityKind::LapSwimming => {
            if let Some(pace) = totals.average_pace_seconds() {
                let _ = writeln!(out, "- Average pace: {} /100m", format_pace(pace));
            }
        }
    }

    if let Some(hr) = totals.average_heart_rate() {
        let _ = writeln!(out, "- Average heart rate: {hr:.0} bpm");
    }
    if let Some(ef) = totals.average_efficiency_factor() {
        let _ = writeln!(out, "- Average efficiency factor: {ef:.2}");
    }
    out.push('\n');
}

fn render_daily_breakdown(out: &mut String, summary: &WeeklySummary) {
    out.push_str("## Daily Breakdown\n");
    for day in summary.window.days() {
        let _ = writeln!(out, "\n### {}\n", WeekWindow::day_label(day));
        let lines = summary.lines_for(day);
        if lines.is_empty() {
            out.push_str("- Rest day\n");
        } else {
            for line in lines {
                let _ = writeln!(out, "- {line}");
            }
        }
    }
}
