// ABOUTME: Single-pass aggregation of a week's activities into per-kind totals and daily lines
// ABOUTME: Computes heart rate, power, pace, and efficiency factor averages from running sums
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Weekly Aggregation
//!
//! [`process_activities`] walks the activity list once. Every recognised
//! activity inside the window contributes to its kind's [`KindTotals`] and
//! gets one description line under its start date.
//!
//! Averages are derived from sums and counts so that a metric missing on one
//! activity does not drag the average towards zero.

use super::formatting::{
    format_distance_km, format_distance_m, format_duration, format_pace, format_speed_kmh,
};
use crate::constants::units::{
    METERS_PER_KM, SECONDS_PER_HOUR, SECONDS_PER_MINUTE, SWIM_PACE_METERS,
};
use crate::models::{Activity, ActivityKind};
use crate::week::WeekWindow;
use chrono::NaiveDate;
use serde::Serialize;
use std::collections::BTreeMap;
use tracing::debug;

/// Running sums for one activity kind
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KindTotals {
    /// Kind these totals belong to
    pub kind: ActivityKind,
    /// Number of sessions
    pub count: u32,
    /// Sum of durations in seconds
    pub total_duration_seconds: f64,
    /// Sum of distances in meters
    pub total_distance_meters: f64,
    /// Sum of average heart rates
    pub heart_rate_sum: f64,
    /// Sessions that reported a heart rate
    pub heart_rate_count: u32,
    /// Sum of average power (cycling only)
    pub power_sum: f64,
    /// Sessions that reported power (cycling only)
    pub power_count: u32,
    /// Sum of per-session efficiency factors
    pub efficiency_factor_sum: f64,
    /// Sessions with a computable efficiency factor
    pub efficiency_factor_count: u32,
}

impl KindTotals {
    /// Empty totals for `kind`
    #[must_use]
    pub const fn new(kind: ActivityKind) -> Self {
        Self {
            kind,
            count: 0,
            total_duration_seconds: 0.0,
            total_distance_meters: 0.0,
            heart_rate_sum: 0.0,
            heart_rate_count: 0,
            power_sum: 0.0,
            power_count: 0,
            efficiency_factor_sum: 0.0,
            efficiency_factor_count: 0,
        }
    }

    /// Add one activity of this kind
    pub fn record(&mut self, activity: &Activity) {
        self.count += 1;
        self.total_duration_seconds += activity.duration_seconds;
        self.total_distance_meters += activity.distance_meters;

        if let Some(hr) = activity.average_hr {
            self.heart_rate_sum += hr;
            self.heart_rate_count += 1;
        }

        if self.kind == ActivityKind::Cycling {
            if let Some(power) = activity.average_power {
                self.power_sum += power;
                self.power_count += 1;
            }
        }

        if let Some(ef) = efficiency_factor(self.kind, activity) {
            self.efficiency_factor_sum += ef;
            self.efficiency_factor_count += 1;
        }
    }

    /// Mean heart rate over sessions that reported one
    #[must_use]
    pub fn average_heart_rate(&self) -> Option<f64> {
        mean(self.heart_rate_sum, self.heart_rate_count)
    }

    /// Mean average power over sessions that reported one
    #[must_use]
    pub fn average_power(&self) -> Option<f64> {
        mean(self.power_sum, self.power_count)
    }

    /// Mean efficiency factor
    #[must_use]
    pub fn average_efficiency_factor(&self) -> Option<f64> {
        mean(self.efficiency_factor_sum, self.efficiency_factor_count)
    }

    /// Seconds per km (running) or per 100 m (swimming), from totals
    #[must_use]
    pub fn average_pace_seconds(&self) -> Option<f64> {
        let unit = pace_unit_meters(self.kind)?;
        pace_seconds(self.total_duration_seconds, self.total_distance_meters, unit)
    }

    /// Average speed in km/h (cycling only), from totals
    #[must_use]
    pub fn average_speed_kmh(&self) -> Option<f64> {
        if self.kind != ActivityKind::Cycling {
            return None;
        }
        speed_kmh(self.total_duration_seconds, self.total_distance_meters)
    }
}

/// Aggregated view of one week
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeeklySummary {
    /// Week the summary covers
    pub window: WeekWindow,
    /// Running totals
    pub running: KindTotals,
    /// Cycling totals
    pub cycling: KindTotals,
    /// Lap swimming totals
    pub lap_swimming: KindTotals,
    /// Description lines per day, in start order
    pub daily: BTreeMap<NaiveDate, Vec<String>>,
    /// Activities in the window with an unsupported type
    pub skipped: u32,
}

impl WeeklySummary {
    /// Empty summary for `window`
    #[must_use]
    pub fn empty(window: WeekWindow) -> Self {
        Self {
            window,
            running: KindTotals::new(ActivityKind::Running),
            cycling: KindTotals::new(ActivityKind::Cycling),
            lap_swimming: KindTotals::new(ActivityKind::LapSwimming),
            daily: BTreeMap::new(),
            skipped: 0,
        }
    }

    /// Totals for one kind
    #[must_use]
    pub const fn totals(&self, kind: ActivityKind) -> &KindTotals {
        match kind {
            ActivityKind::Running => &self.running,
            ActivityKind::Cycling => &self.cycling,
            ActivityKind::LapSwimming => &self.lap_swimming,
        }
    }

    fn totals_mut(&mut self, kind: ActivityKind) -> &mut KindTotals {
        match kind {
            ActivityKind::Running => &mut self.running,
            ActivityKind::Cycling => &mut self.cycling,
            ActivityKind::LapSwimming => &mut self.lap_swimming,
        }
    }

    /// Sessions counted across all kinds
    #[must_use]
    pub fn activity_count(&self) -> u32 {
        ActivityKind::ALL
            .iter()
            .map(|kind| self.totals(*kind).count)
            .sum()
    }

    /// Total duration across all kinds
    #[must_use]
    pub fn total_duration_seconds(&self) -> f64 {
        ActivityKind::ALL
            .iter()
            .map(|kind| self.totals(*kind).total_duration_seconds)
            .sum()
    }

    /// Total distance across all kinds
    #[must_use]
    pub fn total_distance_meters(&self) -> f64 {
        ActivityKind::ALL
            .iter()
            .map(|kind| self.totals(*kind).total_distance_meters)
            .sum()
    }

    /// Description lines for `date` (empty on rest days)
    #[must_use]
    pub fn lines_for(&self, date: NaiveDate) -> &[String] {
        self.daily.get(&date).map(Vec::as_slice).unwrap_or_default()
    }
}

/// Aggregate the activities of `window`
///
/// Activities outside the window are ignored. Activities inside it with an
/// unsupported type are counted in [`WeeklySummary::skipped`].
#[must_use]
pub fn process_activities(activities: &[Activity], window: &WeekWindow) -> WeeklySummary {
    let mut summary = WeeklySummary::empty(*window);

    let mut ordered: Vec<&Activity> = activities
        .iter()
        .filter(|activity| window.contains(activity.start_date()))
        .collect();
    ordered.sort_by_key(|activity| activity.start_time_local);

    for activity in ordered {
        let Some(kind) = activity.kind() else {
            debug!(
                activity_id = activity.activity_id,
                type_key = %activity.type_key,
                "Skipping unsupported activity type"
            );
            summary.skipped += 1;
            continue;
        };

        summary.totals_mut(kind).record(activity);
        summary
            .daily
            .entry(activity.start_date())
            .or_default()
            .push(describe_activity(kind, activity));
    }

    summary
}

/// One-line description of a single activity
#[must_use]
pub fn describe_activity(kind: ActivityKind, activity: &Activity) -> String {
    let distance = activity.distance_meters;
    let duration = activity.duration_seconds;
    let mut details: Vec<String> = Vec::new();

    let distance_text = match kind {
        ActivityKind::Running => {
            if let Some(pace) = pace_seconds(duration, distance, METERS_PER_KM) {
                details.push(format!("{} /km", format_pace(pace)));
            }
            format_distance_km(distance)
        }
        ActivityKind::Cycling => {
            if let Some(speed) = speed_kmh(duration, distance) {
                details.push(format_speed_kmh(speed));
            }
            if let Some(power) = activity.average_power.or(activity.normalized_power) {
                details.push(format!("{power:.0} W"));
            }
            format_distance_km(distance)
        }
        ActivityKind::LapSwimming => {
            if let Some(pace) = pace_seconds(duration, distance, SWIM_PACE_METERS) {
                details.push(format!("{} /100m", format_pace(pace)));
            }
            format_distance_m(distance)
        }
    };

    if let Some(hr) = activity.average_hr {
        details.push(format!("avg HR {hr:.0}"));
    }
    if kind == ActivityKind::Running {
        if let Some(ef) = efficiency_factor(kind, activity) {
            details.push(format!("EF {ef:.2}"));
        }
    }

    let mut line = format!(
        "{}: {distance_text} in {}",
        kind.label(),
        format_duration(duration)
    );
    if !details.is_empty() {
        line.push_str(" (");
        line.push_str(&details.join(", "));
        line.push(')');
    }
    line
}

/// Per-session efficiency factor
///
/// Running: speed in meters per minute over heart rate.
/// Cycling: normalized power (or average power) over heart rate.
fn efficiency_factor(kind: ActivityKind, activity: &Activity) -> Option<f64> {
    let hr = activity.average_hr.filter(|hr| *hr > 0.0)?;
    match kind {
        ActivityKind::Running => {
            if activity.duration_seconds <= 0.0 || activity.distance_meters <= 0.0 {
                return None;
            }
            let meters_per_minute =
                activity.distance_meters / (activity.duration_seconds / SECONDS_PER_MINUTE);
            Some(meters_per_minute / hr)
        }
        ActivityKind::Cycling => activity
            .normalized_power
            .or(activity.average_power)
            .map(|power| power / hr),
        ActivityKind::LapSwimming => None,
    }
}

const fn pace_unit_meters(kind: ActivityKind) -> Option<f64> {
    match kind {
        ActivityKind::Running => Some(METERS_PER_KM),
        ActivityKind::LapSwimming => Some(SWIM_PACE_METERS),
        ActivityKind::Cycling => None,
    }
}

fn pace_seconds(duration_seconds: f64, distance_meters: f64, unit_meters: f64) -> Option<f64> {
    (duration_seconds > 0.0 && distance_meters > 0.0)
        .then(|| duration_seconds / (distance_meters / unit_meters))
}

fn speed_kmh(duration_seconds: f64, distance_meters: f64) -> Option<f64> {
    (duration_seconds > 0.0 && distance_meters > 0.0)
        .then(|| (distance_meters / METERS_PER_KM) / (duration_seconds / SECONDS_PER_HOUR))
}

fn mean(sum: f64, count: u32) -> Option<f64> {
    (count > 0).then(|| sum / f64::from(count))
}
