use std::collections::BTreeMap;

use shared_types::{can_access, AppError, DashboardStats, Section, StaffMember};

use super::{attendance, leave, today, Visibility};
use crate::db::AppState;
use crate::repo;

/// Landing-page figures scoped to what the actor can see.
pub async fn stats(state: &AppState, actor: &StaffMember) -> Result<DashboardStats, AppError> {
    let pool = &state.pool;
    let vis = Visibility::load(pool, actor).await?;

    let mut headcount = BTreeMap::new();
    let (mut active_staff, mut inactive_staff) = (0, 0);
    for member in repo::staff::list_all(pool).await? {
        if !vis.sees(member.id) {
            continue;
        }
        *headcount.entry(member.role.as_str().to_string()).or_insert(0) += 1;
        if member.is_active() {
            active_staff += 1;
        } else {
            inactive_staff += 1;
        }
    }

    let today = today();
    let mut tasks_by_status = BTreeMap::new();
    let mut overdue_tasks = 0;
    for task in repo::task::list(pool, None, None).await? {
        let related = task.assignee_id == actor.id
            || task.assigned_by == Some(actor.id)
            || vis.manages(task.assignee_id);
        if !related {
            continue;
        }
        *tasks_by_status.entry(task.status.clone()).or_insert(0) += 1;
        if task.is_overdue(today) {
            overdue_tasks += 1;
        }
    }

    let pending_approvals = if can_access(actor.role, Section::Leave) {
        repo::leave::list(pool, Some("pending"))
            .await?
            .iter()
            .filter(|r| vis.manages(r.employee_id))
            .count() as i64
    } else {
        0
    };

    Ok(DashboardStats {
        role: actor.role,
        headcount,
        active_staff,
        inactive_staff,
        tasks_by_status,
        overdue_tasks,
        pending_approvals,
        attendance_today: attendance::summary_for(pool, actor, today).await?,
        unread_notifications: repo::notification::unread_count(pool, actor.id).await?,
        leave_balance: leave::balance(state, actor).await?,
    })
}
