use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

#[cfg(feature = "validation")]
use validator::Validate;

use crate::{AttendanceRecord, AttendanceSummary, LeaveRequest, Searchable, StaffMember, Task};

pub const REPORT_KINDS: &[&str] = &["headcount", "attendance", "leave", "tasks"];
pub const REPORT_STATUSES: &[&str] = &["queued", "generating", "ready", "failed"];

pub fn is_valid_report_kind(s: &str) -> bool {
    REPORT_KINDS.contains(&s)
}

pub fn is_valid_report_status(s: &str) -> bool {
    REPORT_STATUSES.contains(&s)
}

/// A report generated in the background from live data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[cfg_attr(feature = "server", derive(sqlx::FromRow))]
pub struct Report {
    pub id: i64,
    pub title: String,
    pub kind: String,
    pub period_start: NaiveDate,
    pub period_end: NaiveDate,
    pub status: String,
    pub requested_by: i64,
    pub requester_name: String,
    /// Kind-specific summary, present once `ready`.
    pub summary: Option<serde_json::Value>,
    pub error: Option<String>,
    pub created_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
}

impl Report {
    pub fn is_finished(&self) -> bool {
        matches!(self.status.as_str(), "ready" | "failed")
    }
}

impl Searchable for Report {
    fn search_fields(&self) -> Vec<&str> {
        vec![
            self.title.as_str(),
            self.kind.as_str(),
            self.status.as_str(),
            self.requester_name.as_str(),
        ]
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[cfg_attr(feature = "validation", derive(Validate))]
pub struct CreateReportRequest {
    #[cfg_attr(
        feature = "validation",
        validate(length(min = 1, max = 120, message = "Title must be 1-120 characters"))
    )]
    pub title: String,
    pub kind: String,
    pub period_start: NaiveDate,
    pub period_end: NaiveDate,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::IntoParams))]
pub struct ReportListParams {
    pub q: Option<String>,
    pub status: Option<String>,
}

fn bump(map: &mut BTreeMap<String, i64>, key: &str) {
    *map.entry(key.to_string()).or_insert(0) += 1;
}

fn ratio(part: i64, whole: i64) -> f64 {
    if whole == 0 {
        0.0
    } else {
        part as f64 / whole as f64
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HeadcountSummary {
    pub total: i64,
    pub by_role: BTreeMap<String, i64>,
    pub by_status: BTreeMap<String, i64>,
    /// People whose `joined_on` falls inside the period.
    pub new_joiners: i64,
}

impl HeadcountSummary {
    pub fn build(staff: &[StaffMember], start: NaiveDate, end: NaiveDate) -> Self {
        let mut s = Self::default();
        for m in staff {
            s.total += 1;
            bump(&mut s.by_role, m.role.as_str());
            bump(&mut s.by_status, &m.status);
            if m.joined_on >= start && m.joined_on <= end {
                s.new_joiners += 1;
            }
        }
        s
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AttendanceReportSummary {
    pub records: i64,
    pub by_status: BTreeMap<String, i64>,
    pub attendance_rate: f64,
}

impl AttendanceReportSummary {
    /// `records` must already be restricted to the period.
    pub fn build(records: &[AttendanceRecord]) -> Self {
        let mut counts = AttendanceSummary::default();
        let mut by_status = BTreeMap::new();
        for r in records {
            counts.record(&r.status);
            bump(&mut by_status, &r.status);
        }
        Self {
            records: records.len() as i64,
            by_status,
            attendance_rate: counts.attendance_rate(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LeaveReportSummary {
    pub requests: i64,
    pub by_status: BTreeMap<String, i64>,
    pub by_type: BTreeMap<String, i64>,
    pub approved_days: i64,
}

impl LeaveReportSummary {
    pub fn build(requests: &[LeaveRequest]) -> Self {
        let mut s = Self::default();
        for r in requests {
            s.requests += 1;
            bump(&mut s.by_status, &r.status);
            bump(&mut s.by_type, &r.leave_type);
            if r.status == "approved" {
                s.approved_days += r.days;
            }
        }
        s
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TaskReportSummary {
    pub tasks: i64,
    pub by_status: BTreeMap<String, i64>,
    pub by_priority: BTreeMap<String, i64>,
    /// Due inside the period, already past `today`, and not completed.
    pub overdue: i64,
    pub completion_rate: f64,
}

impl TaskReportSummary {
    pub fn build(tasks: &[Task], today: NaiveDate) -> Self {
        let mut s = Self::default();
        let mut completed = 0;
        for t in tasks {
            s.tasks += 1;
            bump(&mut s.by_status, &t.status);
            bump(&mut s.by_priority, &t.priority);
            if t.is_completed() {
                completed += 1;
            }
            if t.is_overdue(today) {
                s.overdue += 1;
            }
        }
        s.completion_rate = ratio(completed, s.tasks);
        s
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Role;

    fn d(m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, m, day).unwrap()
    }

    fn member(role: Role, status: &str, joined: NaiveDate) -> StaffMember {
        let now = Utc::now();
        StaffMember {
            id: 1,
            name: "X".into(),
            email: "x@example.com".into(),
            phone: None,
            role,
            department: "Ops".into(),
            position: "Clerk".into(),
            status: status.into(),
            manager_id: None,
            manager_name: None,
            joined_on: joined,
            created_at: now,
            updated_at: now,
        }
    }

    fn task(status: &str, priority: &str, due: Option<NaiveDate>) -> Task {
        let now = Utc::now();
        Task {
            id: 1,
            title: "t".into(),
            description: None,
            assignee_id: 1,
            assignee_name: "A".into(),
            assigned_by: None,
            assigned_by_name: None,
            priority: priority.into(),
            status: status.into(),
            due_date: due,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn headcount_counts_new_joiners_in_period() {
        let staff = vec![
            member(Role::Employee, "active", d(1, 5)),
            member(Role::Employee, "inactive", d(3, 2)),
            member(Role::Manager, "active", d(3, 20)),
        ];
        let s = HeadcountSummary::build(&staff, d(3, 1), d(3, 31));
        assert_eq!(s.total, 3);
        assert_eq!(s.by_role.get("employee"), Some(&2));
        assert_eq!(s.by_status.get("inactive"), Some(&1));
        assert_eq!(s.new_joiners, 2);
    }

    #[test]
    fn task_summary_rates() {
        let tasks = vec![
            task("completed", "high", Some(d(3, 1))),
            task("pending", "low", Some(d(3, 2))),
            task("in_progress", "high", None),
            task("completed", "medium", None),
        ];
        let s = TaskReportSummary::build(&tasks, d(3, 10));
        assert_eq!(s.tasks, 4);
        assert_eq!(s.overdue, 1);
        assert_eq!(s.by_priority.get("high"), Some(&2));
        assert!((s.completion_rate - 0.5).abs() < f64::EPSILON);
    }

    #[test]
    fn task_due_on_generation_day_is_not_overdue() {
        let tasks = vec![
            task("pending", "low", Some(d(3, 10))),
            task("in_progress", "low", Some(d(3, 9))),
        ];
        let s = TaskReportSummary::build(&tasks, d(3, 10));
        assert_eq!(s.overdue, 1);
    }

    #[test]
    fn empty_task_summary_has_zero_rate() {
        let s = TaskReportSummary::build(&[], d(3, 10));
        assert_eq!(s.completion_rate, 0.0);
    }
}
