//! Time helpers — business timezone conversion
//!
//! All date→timestamp conversion happens at the API handler layer;
//! repositories only ever see `i64` Unix millis.

use chrono::{NaiveDate, Utc};
use chrono_tz::Tz;

/// Current time as Unix millis
pub fn now_millis() -> i64 {
    Utc::now().timestamp_millis()
}

/// Parse a date string (YYYY-MM-DD)
pub fn parse_date(date: &str) -> Result<NaiveDate, chrono::ParseError> {
    NaiveDate::parse_from_str(date, "%Y-%m-%d")
}

/// Day start (00:00:00 UTC) → Unix millis
pub fn day_start_millis(date: NaiveDate) -> i64 {
    date.and_hms_opt(0, 0, 0).unwrap().and_utc().timestamp_millis()
}

/// Day end (23:59:59.999 UTC) → Unix millis, inclusive `<= end` semantics
pub fn day_end_millis(date: NaiveDate) -> i64 {
    let next_day = date.succ_opt().unwrap_or(date);
    day_start_millis(next_day) - 1
}

/// Parse an IANA timezone name, falling back to UTC
pub fn parse_timezone(name: &str) -> Tz {
    name.parse().unwrap_or_else(|_| {
        tracing::warn!("Unknown timezone '{}', falling back to UTC", name);
        Tz::UTC
    })
}

/// Current date in the given business timezone, formatted YYYYMMDD
pub fn local_date_key(tz: Tz) -> String {
    Utc::now().with_timezone(&tz).format("%Y%m%d").to_string()
}
