use chrono::{Datelike, NaiveDate};
use shared_types::{
    calendar_days, can_access, count_weekdays, filter_by_query, is_valid_leave_type,
    weekdays_between, AppError, CreateLeaveRequest, LeaveBalance, LeaveListParams, LeaveRequest,
    ReviewLeaveRequest, Section, StaffMember, LEAVE_STATUSES,
};
use sqlx::SqlitePool;

use super::notification::{notify, notify_many};
use super::{check_filter, require_outranks, require_section, today, Visibility};
use crate::db::AppState;
use crate::error_convert::ValidateRequest;
use crate::repo;

fn year_bounds(year: i32) -> Result<(NaiveDate, NaiveDate), AppError> {
    let start = NaiveDate::from_ymd_opt(year, 1, 1);
    let end = NaiveDate::from_ymd_opt(year, 12, 31);
    start
        .zip(end)
        .ok_or_else(|| AppError::bad_request(format!("Year {year} is out of range")))
}

/// Annual allowance minus approved annual days starting in `year`.
pub async fn balance_for(
    pool: &SqlitePool,
    allowance: i64,
    employee_id: i64,
    year: i32,
) -> Result<LeaveBalance, AppError> {
    let (start, end) = year_bounds(year)?;
    let used = repo::leave::annual_days_used(pool, employee_id, start, end).await?;
    Ok(LeaveBalance::new(year, allowance, used))
}

/// The actor's balance for the current year.
pub async fn balance(state: &AppState, actor: &StaffMember) -> Result<LeaveBalance, AppError> {
    balance_for(
        &state.pool,
        state.config.leave.annual_allowance_days,
        actor.id,
        today().year(),
    )
    .await
}

pub async fn list(
    state: &AppState,
    actor: &StaffMember,
    params: &LeaveListParams,
) -> Result<Vec<LeaveRequest>, AppError> {
    require_section(actor, Section::Leave)?;
    check_filter("status", params.status.as_deref(), LEAVE_STATUSES)?;

    let vis = Visibility::load(&state.pool, actor).await?;
    let requests: Vec<LeaveRequest> = repo::leave::list(&state.pool, params.status.as_deref())
        .await?
        .into_iter()
        .filter(|r| vis.sees(r.employee_id))
        .collect();
    Ok(filter_by_query(requests, params.q.as_deref().unwrap_or("")))
}

async fn load(
    state: &AppState,
    actor: &StaffMember,
    id: i64,
) -> Result<(LeaveRequest, Visibility), AppError> {
    require_section(actor, Section::Leave)?;
    let vis = Visibility::load(&state.pool, actor).await?;
    let not_found = || AppError::not_found(format!("Leave request {id} not found"));
    let request = repo::leave::find_by_id(&state.pool, id)
        .await?
        .filter(|r| vis.sees(r.employee_id))
        .ok_or_else(not_found)?;
    Ok((request, vis))
}

pub async fn get(state: &AppState, actor: &StaffMember, id: i64) -> Result<LeaveRequest, AppError> {
    load(state, actor, id).await.map(|(r, _)| r)
}

/// File a leave request for the actor.
pub async fn request(
    state: &AppState,
    actor: &StaffMember,
    req: CreateLeaveRequest,
) -> Result<LeaveRequest, AppError> {
    require_section(actor, Section::Leave)?;
    req.validate_request()?;

    if !is_valid_leave_type(&req.leave_type) {
        return Err(AppError::field(
            "leave_type",
            "Leave type must be annual, sick, personal or unpaid",
        ));
    }
    if req.end_date < req.start_date {
        return Err(AppError::field("end_date", "End date must not be before the start date"));
    }
    let max_days = state.config.leave.max_request_days;
    if calendar_days(req.start_date, req.end_date) > max_days {
        return Err(AppError::field(
            "end_date",
            format!("A single request can cover at most {max_days} days"),
        ));
    }
    let days = count_weekdays(req.start_date, req.end_date);
    if days == 0 {
        return Err(AppError::field("start_date", "The selected range has no working days"));
    }

    let overlapping =
        repo::leave::find_overlapping(&state.pool, actor.id, req.start_date, req.end_date).await?;
    if !overlapping.is_empty() {
        return Err(AppError::conflict(
            "You already have leave booked or pending for some of these days",
        ));
    }

    if req.leave_type == "annual" {
        let balance = balance_for(
            &state.pool,
            state.config.leave.annual_allowance_days,
            actor.id,
            req.start_date.year(),
        )
        .await?;
        if days > balance.remaining {
            return Err(AppError::conflict(format!(
                "Not enough annual leave: {days} days requested, {} remaining",
                balance.remaining
            )));
        }
    }

    let created = repo::leave::create(
        &state.pool,
        actor.id,
        &req.leave_type,
        req.start_date,
        req.end_date,
        days,
        req.reason.as_deref(),
    )
    .await?;

    let reviewers: Vec<i64> = repo::staff::list_all(&state.pool)
        .await?
        .into_iter()
        .filter(|m| {
            m.is_active() && m.role.outranks(&actor.role) && can_access(m.role, Section::Leave)
        })
        .map(|m| m.id)
        .collect();
    notify_many(
        &state.pool,
        &reviewers,
        "Leave request awaiting review",
        &format!(
            "{} requested {} day(s) of {} leave from {} to {}",
            actor.name, days, created.leave_type, created.start_date, created.end_date
        ),
        "info",
    )
    .await;

    tracing::info!(user_id = actor.id, leave_id = created.id, days, "Leave requested");
    Ok(created)
}

/// Approve or reject a pending request.
pub async fn review(
    state: &AppState,
    actor: &StaffMember,
    id: i64,
    req: ReviewLeaveRequest,
) -> Result<LeaveRequest, AppError> {
    req.validate_request()?;
    let (request, vis) = load(state, actor, id).await?;

    let employee_role = vis
        .role_of(request.employee_id)
        .ok_or_else(|| AppError::not_found(format!("Leave request {id} not found")))?;
    require_outranks(actor, employee_role, "review leave of")?;

    if !request.is_pending() {
        return Err(AppError::conflict(format!(
            "This request is already {}",
            request.status
        )));
    }

    if req.approve && request.leave_type == "annual" {
        let balance = balance_for(
            &state.pool,
            state.config.leave.annual_allowance_days,
            request.employee_id,
            request.start_date.year(),
        )
        .await?;
        if request.days > balance.remaining {
            return Err(AppError::conflict(format!(
                "Approving would exceed the annual allowance ({} remaining)",
                balance.remaining
            )));
        }
    }

    let status = if req.approve { "approved" } else { "rejected" };
    let leave_days = if req.approve {
        weekdays_between(request.start_date, request.end_date)
    } else {
        Vec::new()
    };
    let reviewed = repo::leave::review(
        &state.pool,
        id,
        status,
        actor.id,
        req.note.as_deref(),
        &leave_days,
    )
    .await?
    .ok_or_else(|| AppError::conflict("This request was reviewed by someone else"))?;

    let (title, kind) = if req.approve {
        ("Leave approved", "success")
    } else {
        ("Leave rejected", "warning")
    };
    let mut message = format!(
        "{} {} your {} leave from {} to {}",
        actor.name, status, reviewed.leave_type, reviewed.start_date, reviewed.end_date
    );
    if let Some(note) = &reviewed.review_note {
        message.push_str(&format!(": {note}"));
    }
    notify(&state.pool, reviewed.employee_id, title, &message, kind).await;

    tracing::info!(reviewer_id = actor.id, leave_id = id, status, "Leave reviewed");
    Ok(reviewed)
}

/// Withdraw one of the actor's own pending requests.
pub async fn cancel(state: &AppState, actor: &StaffMember, id: i64) -> Result<LeaveRequest, AppError> {
    let (request, _) = load(state, actor, id).await?;
    if request.employee_id != actor.id {
        return Err(AppError::forbidden("You can only cancel your own requests"));
    }
    if !request.is_pending() {
        return Err(AppError::conflict(format!(
            "Only pending requests can be cancelled; this one is {}",
            request.status
        )));
    }
    let cancelled = repo::leave::cancel(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::conflict("This request was reviewed in the meantime"))?;

    tracing::info!(user_id = actor.id, leave_id = id, "Leave cancelled");
    Ok(cancelled)
}
