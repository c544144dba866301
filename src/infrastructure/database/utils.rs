//! Database utility functions.

use chrono::{DateTime, NaiveDateTime, Utc};

/// Parse a stored datetime from RFC3339 or SQLite's default format.
///
/// Rows are written with `to_rfc3339()`, but tolerate "YYYY-MM-DD HH:MM:SS"
/// for rows produced by raw SQL.
pub fn parse_datetime(s: &str) -> Result<DateTime<Utc>, chrono::ParseError> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.with_timezone(&Utc));
    }

    if let Ok(naive) = NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S") {
        return Ok(DateTime::<Utc>::from_naive_utc_and_offset(naive, Utc));
    }

    DateTime::parse_from_rfc3339(s).map(|dt| dt.with_timezone(&Utc))
}
