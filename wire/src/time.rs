//! Timestamp ordering shared by the client view and the dev data service.
//!
//! Timestamps travel as RFC 3339 strings. Missing or malformed values order
//! as the Unix epoch so one bad record never breaks a sort.

#[cfg(test)]
#[path = "time_test.rs"]
mod time_test;

use chrono::{DateTime, Utc};

/// Parse an RFC 3339 timestamp.
#[must_use]
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw.trim())
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

/// Ordering key in epoch milliseconds; missing or malformed values map to 0.
#[must_use]
pub fn sort_key(raw: Option<&str>) -> i64 {
    raw.and_then(parse_timestamp)
        .map_or(0, |dt| dt.timestamp_millis())
}
