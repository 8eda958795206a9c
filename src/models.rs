// ABOUTME: Activity data models shared by providers, aggregation, and rendering
// ABOUTME: Converts raw Garmin activity list records into typed activities
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Data Models
//!
//! Providers use a provider-specific DTO ([`GarminActivityRecord`]) internally
//! and expose the shared [`Activity`] model to the rest of the pipeline.

use crate::constants::activity_types;
use crate::errors::{AppError, AppResult};
use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Format of `startTimeLocal` in Garmin activity list responses
const GARMIN_LOCAL_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Activity kinds the weekly report aggregates
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityKind {
    /// Any running variant
    Running,
    /// Any cycling variant
    Cycling,
    /// Pool swimming
    LapSwimming,
}

impl ActivityKind {
    /// All kinds in report order
    pub const ALL: [Self; 3] = [Self::Running, Self::Cycling, Self::LapSwimming];

    /// Map a Garmin `typeKey` to a report kind
    ///
    /// Returns `None` for activity types the report does not cover.
    #[must_use]
    pub fn from_type_key(type_key: &str) -> Option<Self> {
        let key = type_key.trim().to_lowercase();
        if activity_types::RUNNING.contains(&key.as_str()) {
            Some(Self::Running)
        } else if activity_types::CYCLING.contains(&key.as_str()) {
            Some(Self::Cycling)
        } else if activity_types::LAP_SWIMMING.contains(&key.as_str()) {
            Some(Self::LapSwimming)
        } else {
            None
        }
    }

    /// Heading used in the rendered report
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Running => "Running",
            Self::Cycling => "Cycling",
            Self::LapSwimming => "Lap Swimming",
        }
    }
}

impl fmt::Display for ActivityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Nested `activityType` object in Garmin responses
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GarminActivityType {
    /// Machine key such as `running` or `lap_swimming`
    #[serde(default)]
    pub type_key: String,
}

/// Garmin API response for one entry of the activity list
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GarminActivityRecord {
    /// Garmin activity id
    pub activity_id: u64,
    /// User-visible activity name
    #[serde(default)]
    pub activity_name: Option<String>,
    /// Local start time, `YYYY-MM-DD HH:MM:SS`
    pub start_time_local: String,
    /// Activity type wrapper
    #[serde(default)]
    pub activity_type: GarminActivityType,
    /// Elapsed duration in seconds
    #[serde(default)]
    pub duration: Option<f64>,
    /// Distance in meters
    #[serde(default)]
    pub distance: Option<f64>,
    /// Average heart rate in bpm
    #[serde(default, rename = "averageHR")]
    pub average_hr: Option<f64>,
    /// Average power in watts
    #[serde(default)]
    pub avg_power: Option<f64>,
    /// Normalized power in watts
    #[serde(default)]
    pub norm_power: Option<f64>,
    /// Calories burned
    #[serde(default)]
    pub calories: Option<f64>,
}

/// Activity model consumed by aggregation and rendering
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Activity {
    /// Provider activity id
    pub activity_id: u64,
    /// User-visible name
    pub activity_name: String,
    /// Start time in the athlete's local time
    pub start_time_local: NaiveDateTime,
    /// Raw provider type key
    pub type_key: String,
    /// Duration in seconds (0 when the provider omitted it)
    pub duration_seconds: f64,
    /// Distance in meters (0 when the provider omitted it)
    pub distance_meters: f64,
    /// Average heart rate in bpm
    pub average_hr: Option<f64>,
    /// Average power in watts
    pub average_power: Option<f64>,
    /// Normalized power in watts
    pub normalized_power: Option<f64>,
    /// Calories burned
    pub calories: Option<f64>,
}

impl Activity {
    /// Report kind for this activity, if it is one the report covers
    #[must_use]
    pub fn kind(&self) -> Option<ActivityKind> {
        ActivityKind::from_type_key(&self.type_key)
    }

    /// Local calendar date the activity started on
    #[must_use]
    pub fn start_date(&self) -> NaiveDate {
        self.start_time_local.date()
    }
}

impl TryFrom<GarminActivityRecord> for Activity {
    type Error = AppError;

    fn try_from(record: GarminActivityRecord) -> AppResult<Self> {
        let start_time_local =
            NaiveDateTime::parse_from_str(&record.start_time_local, GARMIN_LOCAL_TIME_FORMAT)
                .map_err(|e| {
                    AppError::invalid_format(format!(
                        "Failed to parse start time '{}' of activity {}: {e}",
                        record.start_time_local, record.activity_id
                    ))
                })?;

        Ok(Self {
            activity_id: record.activity_id,
            activity_name: record.activity_name.unwrap_or_default(),
            start_time_local,
            type_key: record.activity_type.type_key,
            duration_seconds: record.duration.unwrap_or(0.0).max(0.0),
            distance_meters: record.distance.unwrap_or(0.0).max(0.0),
            average_hr: record.average_hr.filter(|hr| *hr > 0.0),
            average_power: record.avg_power.filter(|p| *p > 0.0),
            normalized_power: record.norm_power.filter(|p| *p > 0.0),
            calories: record.calories,
        })
    }
}
