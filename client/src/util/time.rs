//! Timestamp parsing and display labels.
//!
//! Backend timestamps are RFC 3339 strings. Anything that fails to parse is
//! treated as the Unix epoch for ordering and renders as an empty label, so a
//! single bad record never breaks a list.

#[cfg(test)]
#[path = "time_test.rs"]
mod time_test;

use chrono::{DateTime, Datelike, Duration, FixedOffset, NaiveDate, Offset, Utc};

pub use wire::time::{parse_timestamp, sort_key};

/// Calendar day of a timestamp in the viewer's offset (epoch day when unparseable).
pub fn local_day(raw: Option<&str>, offset: FixedOffset) -> NaiveDate {
    let dt = raw.and_then(parse_timestamp).unwrap_or_default();
    dt.with_timezone(&offset).date_naive()
}

/// `HH:MM` in the viewer's offset, empty when unparseable.
pub fn message_time_label(raw: Option<&str>, offset: FixedOffset) -> String {
    raw.and_then(parse_timestamp)
        .map(|dt| dt.with_timezone(&offset).format("%H:%M").to_string())
        .unwrap_or_default()
}

/// Chat-list label relative to `now`: `HH:MM` today, "Yesterday", a weekday
/// abbreviation within the last week, `D/M` otherwise.
pub fn relative_time_label(raw: Option<&str>, now: DateTime<FixedOffset>) -> String {
    let Some(dt) = raw.and_then(parse_timestamp) else {
        return String::new();
    };
    let local = dt.with_timezone(&now.timezone());
    let today = now.date_naive();
    let day = local.date_naive();

    if day == today {
        local.format("%H:%M").to_string()
    } else if Some(day) == today.pred_opt() {
        "Yesterday".to_owned()
    } else if day < today && today - day < Duration::days(7) {
        local.format("%a").to_string()
    } else {
        format!("{}/{}", day.day(), day.month())
    }
}

/// Date separator label for a message group.
pub fn day_label(day: NaiveDate, today: NaiveDate) -> String {
    if day == today {
        "Today".to_owned()
    } else if Some(day) == today.pred_opt() {
        "Yesterday".to_owned()
    } else {
        day.format("%d/%m/%Y").to_string()
    }
}

/// Current UTC offset of the browser (UTC on the server).
pub fn local_offset() -> FixedOffset {
    #[cfg(feature = "hydrate")]
    {
        chrono::Local::now().offset().fix()
    }
    #[cfg(not(feature = "hydrate"))]
    {
        Utc.fix()
    }
}

/// Wall-clock now in the viewer's offset.
pub fn now_local() -> DateTime<FixedOffset> {
    Utc::now().with_timezone(&local_offset())
}
