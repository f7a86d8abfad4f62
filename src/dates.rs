//! Date helpers for academic session validation.
//!
//! All comparisons work on whole days (`NaiveDate`); callers truncate any
//! time-of-day component before reaching this module.

use chrono::NaiveDate;
use thiserror::Error;

/// Minimum allowed session length in days (a 30-day session is accepted).
pub const MIN_SESSION_DAYS: i64 = 30;
/// Maximum allowed session length in days (a 730-day session is accepted).
pub const MAX_SESSION_DAYS: i64 = 730;

/// Date-range validation failures, each carrying a specific reason
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DateRangeError {
    #[error("Both start date and end date are required")]
    MissingDate,
    #[error("Invalid start date format")]
    InvalidStartDate,
    #[error("Invalid end date format")]
    InvalidEndDate,
    #[error("Start date must be before end date")]
    StartNotBeforeEnd,
    #[error("Session duration must be at least {MIN_SESSION_DAYS} days")]
    TooShort,
    #[error("Session duration cannot exceed {MAX_SESSION_DAYS} days (2 years)")]
    TooLong,
}

/// Parse a `YYYY-MM-DD` date string, mapping failures to the given error.
pub fn parse_date(raw: &str, on_invalid: DateRangeError) -> Result<NaiveDate, DateRangeError> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d").map_err(|_| on_invalid)
}

/// Validate a session date range: strict ordering plus min/max duration.
pub fn validate_date_range(start: NaiveDate, end: NaiveDate) -> Result<(), DateRangeError> {
    if start >= end {
        return Err(DateRangeError::StartNotBeforeEnd);
    }

    let days = days_between(start, end);
    if days < MIN_SESSION_DAYS {
        return Err(DateRangeError::TooShort);
    }
    if days > MAX_SESSION_DAYS {
        return Err(DateRangeError::TooLong);
    }

    Ok(())
}

/// Number of days from `start` to `end`.
pub fn days_between(start: NaiveDate, end: NaiveDate) -> i64 {
    (end - start).num_days()
}

/// Whether two inclusive date ranges share at least one day.
pub fn ranges_overlap(
    start1: NaiveDate,
    end1: NaiveDate,
    start2: NaiveDate,
    end2: NaiveDate,
) -> bool {
    start1 <= end2 && start2 <= end1
}

/// Whether `date` falls within `[start, end]` inclusive.
pub fn date_in_range(date: NaiveDate, start: NaiveDate, end: NaiveDate) -> bool {
    start <= date && date <= end
}
