use chrono::{DateTime, Datelike, Duration, NaiveDate, Utc, Weekday};
use serde::{Deserialize, Serialize};

#[cfg(feature = "validation")]
use validator::Validate;

use crate::Searchable;

pub const LEAVE_TYPES: &[&str] = &["annual", "sick", "personal", "unpaid"];
pub const LEAVE_STATUSES: &[&str] = &["pending", "approved", "rejected", "cancelled"];

pub fn is_valid_leave_type(s: &str) -> bool {
    LEAVE_TYPES.contains(&s)
}

pub fn is_valid_leave_status(s: &str) -> bool {
    LEAVE_STATUSES.contains(&s)
}

/// A request for time off.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[cfg_attr(feature = "server", derive(sqlx::FromRow))]
pub struct LeaveRequest {
    pub id: i64,
    pub employee_id: i64,
    pub employee_name: String,
    pub leave_type: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    /// Weekdays covered by the range, inclusive.
    pub days: i64,
    pub reason: Option<String>,
    pub status: String,
    pub reviewed_by: Option<i64>,
    pub reviewer_name: Option<String>,
    pub reviewed_at: Option<DateTime<Utc>>,
    pub review_note: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl LeaveRequest {
    pub fn is_pending(&self) -> bool {
        self.status == "pending"
    }
}

impl Searchable for LeaveRequest {
    fn search_fields(&self) -> Vec<&str> {
        let mut fields = vec![
            self.employee_name.as_str(),
            self.leave_type.as_str(),
            self.status.as_str(),
        ];
        if let Some(r) = &self.reason {
            fields.push(r);
        }
        fields
    }
}

fn is_weekday(date: NaiveDate) -> bool {
    !matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
}

/// Monday-to-Friday dates in `start..=end`. Empty when `end < start`.
pub fn weekdays_between(start: NaiveDate, end: NaiveDate) -> Vec<NaiveDate> {
    start
        .iter_days()
        .take_while(|d| *d <= end)
        .filter(|d| is_weekday(*d))
        .collect()
}

/// Number of weekdays in `start..=end`, without walking whole weeks.
pub fn count_weekdays(start: NaiveDate, end: NaiveDate) -> i64 {
    let span = calendar_days(start, end);
    if span == 0 {
        return 0;
    }
    let full_weeks = span / 7;
    let tail_start = start + Duration::days(full_weeks * 7);
    let tail = tail_start
        .iter_days()
        .take_while(|d| *d <= end)
        .filter(|d| is_weekday(*d))
        .count() as i64;
    full_weeks * 5 + tail
}

/// Calendar days in `start..=end`. Zero when `end < start`.
pub fn calendar_days(start: NaiveDate, end: NaiveDate) -> i64 {
    ((end - start).num_days() + 1).max(0)
}

/// Inclusive date ranges intersect.
pub fn ranges_overlap(a: (NaiveDate, NaiveDate), b: (NaiveDate, NaiveDate)) -> bool {
    a.0 <= b.1 && b.0 <= a.1
}

/// Request to take leave. Always filed for the caller.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[cfg_attr(feature = "validation", derive(Validate))]
pub struct CreateLeaveRequest {
    pub leave_type: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    #[serde(default)]
    #[cfg_attr(
        feature = "validation",
        validate(length(max = 500, message = "Reason must be at most 500 characters"))
    )]
    pub reason: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[cfg_attr(feature = "validation", derive(Validate))]
pub struct ReviewLeaveRequest {
    pub approve: bool,
    #[serde(default)]
    #[cfg_attr(
        feature = "validation",
        validate(length(max = 500, message = "Note must be at most 500 characters"))
    )]
    pub note: Option<String>,
}

/// Annual leave allowance for the current year.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct LeaveBalance {
    pub year: i32,
    pub allowance: i64,
    pub used: i64,
    pub remaining: i64,
}

impl LeaveBalance {
    pub fn new(year: i32, allowance: i64, used: i64) -> Self {
        Self {
            year,
            allowance,
            used,
            remaining: (allowance - used).max(0),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::IntoParams))]
pub struct LeaveListParams {
    pub q: Option<String>,
    pub status: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn full_week_counts_five() {
        // 2025-03-10 is a Monday.
        assert_eq!(count_weekdays(d(2025, 3, 10), d(2025, 3, 16)), 5);
    }

    #[test]
    fn weekend_only_counts_zero() {
        assert_eq!(count_weekdays(d(2025, 3, 15), d(2025, 3, 16)), 0);
    }

    #[test]
    fn single_day_is_inclusive() {
        assert_eq!(count_weekdays(d(2025, 3, 12), d(2025, 3, 12)), 1);
    }

    #[test]
    fn spans_weekend() {
        // Friday to next Tuesday.
        let days = weekdays_between(d(2025, 3, 14), d(2025, 3, 18));
        assert_eq!(days, vec![d(2025, 3, 14), d(2025, 3, 17), d(2025, 3, 18)]);
    }

    #[test]
    fn reversed_range_is_empty() {
        assert_eq!(count_weekdays(d(2025, 3, 18), d(2025, 3, 14)), 0);
    }

    #[test]
    fn long_span_counts_without_walking() {
        // 2025-01-01 is a Wednesday; 2025 has 261 weekdays.
        assert_eq!(count_weekdays(d(2025, 1, 1), d(2025, 12, 31)), 261);
        assert_eq!(calendar_days(d(2025, 1, 1), d(2025, 12, 31)), 365);
        assert!(count_weekdays(d(1, 1, 1), d(9999, 12, 31)) > 2_000_000);
    }

    #[test]
    fn overlap_detection() {
        let a = (d(2025, 3, 10), d(2025, 3, 14));
        assert!(ranges_overlap(a, (d(2025, 3, 14), d(2025, 3, 20))));
        assert!(ranges_overlap(a, (d(2025, 3, 11), d(2025, 3, 12))));
        assert!(!ranges_overlap(a, (d(2025, 3, 15), d(2025, 3, 20))));
    }

    #[test]
    fn balance_never_negative() {
        let b = LeaveBalance::new(2025, 20, 23);
        assert_eq!(b.remaining, 0);
        assert_eq!(LeaveBalance::new(2025, 20, 5).remaining, 15);
    }
}
