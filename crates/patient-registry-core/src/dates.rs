//! Date-of-birth normalization.
//!
//! Dates are stored as the calendar date of the instant shifted to a fixed
//! UTC+05:30 offset. A bare `YYYY-MM-DD` input is read as UTC midnight, so it
//! always stores as the same calendar date regardless of where the caller is.

use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime, TimeZone, Utc};

/// Offset applied before taking the calendar date.
pub const STORAGE_OFFSET_MINUTES: i64 = 330;

const DATE_FORMAT: &str = "%Y-%m-%d";

const NAIVE_DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S",
];

/// Calendar date (`YYYY-MM-DD`) of `instant` at UTC+05:30.
pub fn to_storage_date<Tz: TimeZone>(instant: &DateTime<Tz>) -> String {
    let shifted = instant.with_timezone(&Utc) + Duration::minutes(STORAGE_OFFSET_MINUTES);
    shifted.format(DATE_FORMAT).to_string()
}

/// Parse caller input into an instant.
///
/// Accepts `YYYY-MM-DD` (UTC midnight), RFC 3339 timestamps, and offset-less
/// date-times (read as UTC). Returns `None` for anything else.
pub fn parse_instant(input: &str) -> Option<DateTime<Utc>> {
    let input = input.trim();

    if let Ok(date) = NaiveDate::parse_from_str(input, DATE_FORMAT) {
        return date.and_hms_opt(0, 0, 0).map(|dt| dt.and_utc());
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(input) {
        return Some(dt.with_timezone(&Utc));
    }

    NAIVE_DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(input, fmt).ok())
        .map(|dt| dt.and_utc())
}

/// Normalize a date-of-birth string for storage.
pub fn normalize_date_of_birth(input: &str) -> Option<String> {
    parse_instant(input).map(|instant| to_storage_date(&instant))
}
