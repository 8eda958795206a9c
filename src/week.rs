// ABOUTME: Monday-to-Sunday week window computation for the weekly report
// ABOUTME: Resolves "last completed week" relative to a reference date or a configured UTC offset
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use crate::constants::units::DAYS_PER_WEEK;
use crate::errors::{AppError, AppResult};
use chrono::{Datelike, Days, FixedOffset, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Inclusive Monday..=Sunday date range
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeekWindow {
    /// Monday
    pub start: NaiveDate,
    /// Sunday
    pub end: NaiveDate,
}

impl WeekWindow {
    /// The Monday..=Sunday week containing `date`
    ///
    /// # Errors
    ///
    /// Returns an invalid-input error when the week extends past the
    /// representable calendar range.
    pub fn containing(date: NaiveDate) -> AppResult<Self> {
        let start = date
            .checked_sub_days(Days::new(u64::from(date.weekday().num_days_from_monday())))
            .ok_or_else(|| out_of_range(date))?;
        let end = start
            .checked_add_days(Days::new(DAYS_PER_WEEK - 1))
            .ok_or_else(|| out_of_range(date))?;
        Ok(Self { start, end })
    }

    /// Most recently completed week relative to `today`
    ///
    /// The week containing `today` is never complete (even on Sunday), so the
    /// result is always the week before it.
    ///
    /// # Errors
    ///
    /// Returns an invalid-input error when that week is not representable.
    pub fn previous_week(today: NaiveDate) -> AppResult<Self> {
        let week_ago = today
            .checked_sub_days(Days::new(DAYS_PER_WEEK))
            .ok_or_else(|| out_of_range(today))?;
        Self::containing(week_ago)
    }

    /// Previous week as seen from "now" at the given UTC offset
    pub fn previous_week_at_offset(offset_hours: i32) -> AppResult<Self> {
        let offset = FixedOffset::east_opt(offset_hours * 3600).ok_or_else(|| {
            AppError::config(format!("UTC offset out of range: {offset_hours} hours"))
        })?;
        let today = Utc::now().with_timezone(&offset).date_naive();
        Self::previous_week(today)
    }

    /// Whether `date` lies within the window (both ends inclusive)
    #[must_use]
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }

    /// The seven dates of the week, Monday first
    pub fn days(&self) -> impl Iterator<Item = NaiveDate> {
        let end = self.end;
        self.start.iter_days().take_while(move |date| *date <= end)
    }

    /// Heading for a single day, e.g. `Monday, Oct 05`
    #[must_use]
    pub fn day_label(date: NaiveDate) -> String {
        date.format("%A, %b %d").to_string()
    }

    /// Human-readable range, e.g. `Monday, Oct 05 2026 to Sunday, Oct 11 2026`
    #[must_use]
    pub fn describe(&self) -> String {
        format!(
            "{} to {}",
            self.start.format("%A, %b %d %Y"),
            self.end.format("%A, %b %d %Y")
        )
    }
}

fn out_of_range(date: NaiveDate) -> AppError {
    AppError::invalid_input(format!("Date {date} is outside the supported calendar range"))
}

/// Parse a `YYYY-MM-DD` reference date
pub fn parse_reference_date(value: &str) -> AppResult<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").map_err(|e| {
        AppError::invalid_format(format!(
            "Invalid reference date '{value}' (expected YYYY-MM-DD): {e}"
        ))
    })
}
