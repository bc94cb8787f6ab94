// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Shared helpers for date/time formatting.

use chrono::{DateTime, SecondsFormat, Utc};

/// Format a UTC timestamp as RFC3339 using a `Z` suffix.
pub fn format_utc_rfc3339(date: DateTime<Utc>) -> String {
    date.to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// Format a duration in seconds as `HH:MM:SS`. Hours are not wrapped.
pub fn format_hms(secs: u64) -> String {
    format!("{:02}:{:02}:{:02}", secs / 3600, (secs / 60) % 60, secs % 60)
}

/// Calendar date part (`YYYY-MM-DD`) of a timestamp string as returned by
/// the API.
pub fn date_part(timestamp: &str) -> &str {
    timestamp.get(..10).unwrap_or(timestamp)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_utc_rfc3339() {
        let date = DateTime::from_timestamp(0, 0).unwrap();
        assert_eq!(format_utc_rfc3339(date), "1970-01-01T00:00:00Z");
    }

    #[test]
    fn test_format_hms() {
        assert_eq!(format_hms(0), "00:00:00");
        assert_eq!(format_hms(3725), "01:02:05");
        assert_eq!(format_hms(100 * 3600), "100:00:00");
    }

    #[test]
    fn test_date_part() {
        assert_eq!(date_part("2024-03-09T07:15:00Z"), "2024-03-09");
        assert_eq!(date_part("2024"), "2024");
        assert_eq!(date_part(""), "");
    }
}
