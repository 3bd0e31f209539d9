//! Date parsing shared by query parameters and stored records

use chrono::{DateTime, NaiveDate, TimeZone, Utc};

/// Accepted calendar-date layout
pub const DATE_FORMAT: &str = "%Y-%m-%d";

const DATE_LEN: usize = "YYYY-MM-DD".len();

/// Parse an RFC 3339 timestamp or a plain `YYYY-MM-DD` date.
///
/// Plain dates resolve to midnight UTC. Offsets are normalized to UTC.
/// Date and time must be joined by `T`.
pub fn parse_timestamp(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();

    if value.len() > DATE_LEN && value.as_bytes()[DATE_LEN] != b'T' {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.with_timezone(&Utc));
    }

    NaiveDate::parse_from_str(value, DATE_FORMAT)
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| Utc.from_utc_datetime(&naive))
}
