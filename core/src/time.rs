//! Time related utils.

use crate::{Error, Result};

/// A point in time, always in UTC.
pub type DateTime = chrono::DateTime<chrono::Utc>;

/// Create a new DateTime with the current time.
pub fn now() -> DateTime {
    chrono::Utc::now()
}

/// Format a datetime into the date stamp used in credential scopes: `20150830`.
pub fn format_date(t: DateTime) -> String {
    t.format("%Y%m%d").to_string()
}

/// Format a datetime into ISO 8601 basic format: `20150830T123600Z`.
///
/// This is the `x-amz-date` representation: full ISO 8601 with the `-`,
/// `:` and fractional-second groups removed.
pub fn format_iso8601(t: DateTime) -> String {
    t.format("%Y%m%dT%H%M%SZ").to_string()
}

/// Parse an RFC 3339 datetime like `2015-08-30T12:36:00Z`.
pub fn parse_rfc3339(s: &str) -> Result<DateTime> {
    chrono::DateTime::parse_from_rfc3339(s)
        .map(|t| t.with_timezone(&chrono::Utc))
        .map_err(|e| Error::BadBody(e.to_string()))
}
