use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

#[cfg(feature = "validation")]
use validator::Validate;

use crate::Searchable;

pub const ATTENDANCE_STATUSES: &[&str] = &["present", "absent", "late", "half_day", "on_leave"];

pub fn is_valid_attendance_status(s: &str) -> bool {
    ATTENDANCE_STATUSES.contains(&s)
}

/// One person's attendance for one day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[cfg_attr(feature = "server", derive(sqlx::FromRow))]
pub struct AttendanceRecord {
    pub id: i64,
    pub user_id: i64,
    pub user_name: String,
    pub date: NaiveDate,
    pub status: String,
    pub check_in: Option<NaiveTime>,
    pub check_out: Option<NaiveTime>,
    pub note: Option<String>,
    pub marked_by: Option<i64>,
    pub updated_at: DateTime<Utc>,
}

impl AttendanceRecord {
    /// Hours between check-in and check-out, when both are set.
    pub fn hours_worked(&self) -> Option<f64> {
        let (i, o) = (self.check_in?, self.check_out?);
        Some((o - i).num_minutes() as f64 / 60.0)
    }
}

impl Searchable for AttendanceRecord {
    fn search_fields(&self) -> Vec<&str> {
        let mut fields = vec![self.user_name.as_str(), self.status.as_str()];
        if let Some(n) = &self.note {
            fields.push(n);
        }
        fields
    }
}

/// Upsert a record for someone the caller outranks.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[cfg_attr(feature = "validation", derive(Validate))]
pub struct MarkAttendanceRequest {
    pub user_id: i64,
    pub date: NaiveDate,
    pub status: String,
    #[serde(default)]
    pub check_in: Option<NaiveTime>,
    #[serde(default)]
    pub check_out: Option<NaiveTime>,
    #[serde(default)]
    #[cfg_attr(
        feature = "validation",
        validate(length(max = 300, message = "Note must be at most 300 characters"))
    )]
    pub note: Option<String>,
}

/// Counts for one day across the people visible to the caller.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct AttendanceSummary {
    pub date: Option<NaiveDate>,
    pub present: i64,
    pub absent: i64,
    pub late: i64,
    pub half_day: i64,
    pub on_leave: i64,
    /// Active people with no record for the day.
    pub unmarked: i64,
}

impl AttendanceSummary {
    pub fn record(&mut self, status: &str) {
        match status {
            "present" => self.present += 1,
            "absent" => self.absent += 1,
            "late" => self.late += 1,
            "half_day" => self.half_day += 1,
            "on_leave" => self.on_leave += 1,
            _ => {}
        }
    }

    pub fn marked(&self) -> i64 {
        self.present + self.absent + self.late + self.half_day + self.on_leave
    }

    /// Share of marked records where the person showed up at all.
    pub fn attendance_rate(&self) -> f64 {
        let marked = self.marked();
        if marked == 0 {
            return 0.0;
        }
        (self.present + self.late + self.half_day) as f64 / marked as f64
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::IntoParams))]
pub struct AttendanceListParams {
    pub date: Option<NaiveDate>,
    pub user_id: Option<i64>,
    pub q: Option<String>,
    pub status: Option<String>,
}
