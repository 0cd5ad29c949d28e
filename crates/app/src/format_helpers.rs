//! Display formatting shared by the pages.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use dioxus::prelude::ServerFnError;
use shared_types::AppError;
use std::collections::HashMap;

/// "Mar 3, 2031".
pub fn format_date(date: NaiveDate) -> String {
    date.format("%b %-d, %Y").to_string()
}

pub fn format_opt_date(date: Option<NaiveDate>) -> String {
    date.map(format_date).unwrap_or_else(|| "\u{2014}".to_string())
}

/// "Mar 3, 2031 9:05 PM" in UTC.
pub fn format_datetime(at: DateTime<Utc>) -> String {
    at.format("%b %-d, %Y %-I:%M %p").to_string()
}

/// "09:05", or a dash when the time was not recorded.
pub fn format_time(time: Option<NaiveTime>) -> String {
    time.map(|t| t.format("%H:%M").to_string())
        .unwrap_or_else(|| "\u{2014}".to_string())
}

/// "Mar 3 – Mar 7, 2031" when both ends share a year, else both in full.
pub fn format_range(start: NaiveDate, end: NaiveDate) -> String {
    if start == end {
        format_date(start)
    } else if start.format("%Y").to_string() == end.format("%Y").to_string() {
        format!(
            "{} \u{2013} {}",
            start.format("%b %-d"),
            format_date(end)
        )
    } else {
        format!("{} \u{2013} {}", format_date(start), format_date(end))
    }
}

/// "1 day", "3 days".
pub fn plural(count: i64, noun: &str) -> String {
    if count == 1 {
        format!("{count} {noun}")
    } else {
        format!("{count} {noun}s")
    }
}

/// 0.8125 -> "81%".
pub fn format_percent(ratio: f64) -> String {
    format!("{:.0}%", ratio * 100.0)
}

/// Parse a `YYYY-MM-DD` date input. Empty or malformed input yields `None`.
pub fn parse_date_input(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").ok()
}

/// Parse an `HH:MM` time input.
pub fn parse_time_input(value: &str) -> Option<NaiveTime> {
    NaiveTime::parse_from_str(value.trim(), "%H:%M").ok()
}

/// Trimmed text, or `None` when blank.
pub fn opt_text(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Message for a toast from a failed server call.
pub fn error_message(err: &ServerFnError) -> String {
    AppError::friendly_message(&err.to_string())
}

/// Field-level validation errors carried by a failed server call.
pub fn field_errors(err: &ServerFnError) -> HashMap<String, String> {
    AppError::parse_field_errors(&err.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn date_is_short_month_day_year() {
        assert_eq!(format_date(d(2031, 3, 3)), "Mar 3, 2031");
        assert_eq!(format_opt_date(None), "\u{2014}");
    }

    #[test]
    fn datetime_uses_twelve_hour_clock() {
        let at = DateTime::parse_from_rfc3339("2031-03-03T21:05:00Z")
            .unwrap()
            .with_timezone(&Utc);
        assert_eq!(format_datetime(at), "Mar 3, 2031 9:05 PM");
    }

    #[test]
    fn time_or_dash() {
        assert_eq!(format_time(NaiveTime::from_hms_opt(9, 5, 0)), "09:05");
        assert_eq!(format_time(None), "\u{2014}");
    }

    #[test]
    fn range_collapses_shared_year() {
        assert_eq!(format_range(d(2031, 3, 3), d(2031, 3, 3)), "Mar 3, 2031");
        assert_eq!(
            format_range(d(2031, 3, 3), d(2031, 3, 7)),
            "Mar 3 \u{2013} Mar 7, 2031"
        );
        assert_eq!(
            format_range(d(2030, 12, 29), d(2031, 1, 2)),
            "Dec 29, 2030 \u{2013} Jan 2, 2031"
        );
    }

    #[test]
    fn plural_counts() {
        assert_eq!(plural(1, "day"), "1 day");
        assert_eq!(plural(0, "day"), "0 days");
        assert_eq!(plural(6, "day"), "6 days");
    }

    #[test]
    fn percent_rounds() {
        assert_eq!(format_percent(0.8125), "81%");
        assert_eq!(format_percent(1.0), "100%");
    }

    #[test]
    fn inputs_parse_or_none() {
        assert_eq!(parse_date_input("2031-03-03"), Some(d(2031, 3, 3)));
        assert_eq!(parse_date_input(""), None);
        assert_eq!(parse_date_input("03/03/2031"), None);
        assert_eq!(parse_time_input("09:30"), NaiveTime::from_hms_opt(9, 30, 0));
        assert_eq!(parse_time_input("9.30"), None);
    }

    #[test]
    fn opt_text_trims_blank_to_none() {
        assert_eq!(opt_text("  "), None);
        assert_eq!(opt_text(" hi "), Some("hi".to_string()));
    }
}
