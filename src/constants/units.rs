// ABOUTME: Unit conversion constants for distance, time, and pace calculations
// ABOUTME: Provides named constants to eliminate magic numbers in report arithmetic
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

/// Meters per kilometer conversion factor
pub const METERS_PER_KM: f64 = 1000.0;

/// Swim pace is expressed per this many meters
pub const SWIM_PACE_METERS: f64 = 100.0;

/// Seconds per minute
pub const SECONDS_PER_MINUTE: f64 = 60.0;

/// Seconds per hour
pub const SECONDS_PER_HOUR: f64 = 3600.0;

/// Days per week
pub const DAYS_PER_WEEK: u64 = 7;
