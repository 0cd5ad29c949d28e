use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::{AttendanceSummary, LeaveBalance, Role};

/// Figures for the landing page, scoped to what the caller can see.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct DashboardStats {
    pub role: Role,
    /// Visible people per role (`snake_case` role key).
    pub headcount: BTreeMap<String, i64>,
    pub active_staff: i64,
    pub inactive_staff: i64,
    pub tasks_by_status: BTreeMap<String, i64>,
    pub overdue_tasks: i64,
    /// Pending leave requests the caller may review.
    pub pending_approvals: i64,
    pub attendance_today: AttendanceSummary,
    pub unread_notifications: i64,
    pub leave_balance: LeaveBalance,
}

impl DashboardStats {
    pub fn total_staff(&self) -> i64 {
        self.active_staff + self.inactive_staff
    }

    pub fn open_tasks(&self) -> i64 {
        self.tasks_by_status
            .iter()
            .filter(|(status, _)| status.as_str() != "completed")
            .map(|(_, n)| n)
            .sum()
    }
}
