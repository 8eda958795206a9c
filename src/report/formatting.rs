// ABOUTME: Number formatting helpers for durations, paces, distances, and speeds
// ABOUTME: Shared by per-activity descriptions and the markdown renderer
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use crate::constants::units::{METERS_PER_KM, SECONDS_PER_HOUR, SECONDS_PER_MINUTE};

/// Round to whole seconds, treating negative and non-finite values as zero
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn whole_seconds(seconds: f64) -> u64 {
    if seconds.is_finite() && seconds > 0.0 {
        seconds.round() as u64
    } else {
        0
    }
}

/// `M:SS` below one hour, `H:MM:SS` otherwise
#[must_use]
pub fn format_duration(seconds: f64) -> String {
    let total = whole_seconds(seconds);
    let hours = total / SECONDS_PER_HOUR as u64;
    let minutes = (total % SECONDS_PER_HOUR as u64) / SECONDS_PER_MINUTE as u64;
    let secs = total % SECONDS_PER_MINUTE as u64;
    if hours > 0 {
        format!("{hours}:{minutes:02}:{secs:02}")
    } else {
        format!("{minutes}:{secs:02}")
    }
}

/// Pace as `M:SS` (minutes may exceed 59 for very slow paces)
#[must_use]
pub fn format_pace(seconds_per_unit: f64) -> String {
    let total = whole_seconds(seconds_per_unit);
    let minutes = total / SECONDS_PER_MINUTE as u64;
    let secs = total % SECONDS_PER_MINUTE as u64;
    format!("{minutes}:{secs:02}")
}

/// Kilometers with two decimals, e.g. `10.02 km`
#[must_use]
pub fn format_distance_km(meters: f64) -> String {
    format!("{:.2} km", meters / METERS_PER_KM)
}

/// Whole meters, e.g. `1500 m`
#[must_use]
pub fn format_distance_m(meters: f64) -> String {
    format!("{meters:.0} m")
}

/// Speed with one decimal, e.g. `28.6 km/h`
#[must_use]
pub fn format_speed_kmh(kmh: f64) -> String {
    format!("{kmh:.1} km/h")
}
