use chrono::{NaiveDate, NaiveTime, Timelike, Utc};
use shared_types::{
    filter_by_query, is_valid_attendance_status, AppError, AttendanceConfig, AttendanceListParams,
    AttendanceRecord, AttendanceSummary, MarkAttendanceRequest, Section, StaffMember,
    ATTENDANCE_STATUSES,
};
use sqlx::SqlitePool;

use super::{check_filter, require_outranks, require_section, today, Visibility};
use crate::db::AppState;
use crate::error_convert::ValidateRequest;
use crate::repo;

/// `late` once the grace period after the start of the workday has passed.
pub fn check_in_status(at: NaiveTime, config: &AttendanceConfig) -> &'static str {
    if at > config.late_after() {
        "late"
    } else {
        "present"
    }
}

fn now_time() -> NaiveTime {
    let now = Utc::now().time();
    // Whole seconds keep stored times readable.
    NaiveTime::from_num_seconds_from_midnight_opt(now.num_seconds_from_midnight(), 0).unwrap_or(now)
}

pub async fn list(
    state: &AppState,
    actor: &StaffMember,
    params: &AttendanceListParams,
) -> Result<Vec<AttendanceRecord>, AppError> {
    require_section(actor, Section::Attendance)?;
    check_filter("status", params.status.as_deref(), ATTENDANCE_STATUSES)?;

    let date = match (params.date, params.user_id) {
        (None, None) => Some(today()),
        (date, _) => date,
    };

    let vis = Visibility::load(&state.pool, actor).await?;
    let records: Vec<AttendanceRecord> =
        repo::attendance::list(&state.pool, date, params.user_id, params.status.as_deref())
            .await?
            .into_iter()
            .filter(|r| vis.sees(r.user_id))
            .collect();
    Ok(filter_by_query(records, params.q.as_deref().unwrap_or("")))
}

/// Record attendance for someone the actor outranks.
pub async fn mark(
    state: &AppState,
    actor: &StaffMember,
    req: MarkAttendanceRequest,
) -> Result<AttendanceRecord, AppError> {
    require_section(actor, Section::Attendance)?;
    req.validate_request()?;

    if !is_valid_attendance_status(&req.status) {
        return Err(AppError::field(
            "status",
            "Status must be present, absent, late, half_day or on_leave",
        ));
    }
    if let (Some(check_in), Some(check_out)) = (req.check_in, req.check_out) {
        if check_out < check_in {
            return Err(AppError::field("check_out", "Check-out must not be before check-in"));
        }
    }

    let subject = repo::staff::find_by_id(&state.pool, req.user_id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Staff member {} not found", req.user_id)))?;
    require_outranks(actor, subject.role, "mark attendance for")?;

    let record = repo::attendance::upsert(
        &state.pool,
        subject.id,
        req.date,
        &req.status,
        req.check_in,
        req.check_out,
        req.note.as_deref(),
        actor.id,
    )
    .await?;

    tracing::info!(
        actor_id = actor.id,
        user_id = subject.id,
        date = %req.date,
        status = %req.status,
        "Attendance marked"
    );
    Ok(record)
}

/// Self check-in for today.
pub async fn check_in(state: &AppState, actor: &StaffMember) -> Result<AttendanceRecord, AppError> {
    check_in_at(state, actor, today(), now_time()).await
}

pub async fn check_in_at(
    state: &AppState,
    actor: &StaffMember,
    date: NaiveDate,
    at: NaiveTime,
) -> Result<AttendanceRecord, AppError> {
    require_section(actor, Section::Attendance)?;

    if let Some(existing) = repo::attendance::find(&state.pool, actor.id, date).await? {
        return Err(AppError::conflict(format!(
            "Attendance for {date} is already recorded as {}",
            existing.status
        )));
    }

    let status = check_in_status(at, &state.config.attendance);
    let record = repo::attendance::insert_check_in(&state.pool, actor.id, date, status, at).await?;

    tracing::info!(user_id = actor.id, %date, status, "Checked in");
    Ok(record)
}

/// Self check-out for today.
pub async fn check_out(state: &AppState, actor: &StaffMember) -> Result<AttendanceRecord, AppError> {
    require_section(actor, Section::Attendance)?;
    let date = today();

    let existing = repo::attendance::find(&state.pool, actor.id, date).await?;
    match existing {
        None => return Err(AppError::bad_request("You have not checked in today")),
        Some(r) if r.check_in.is_none() => {
            return Err(AppError::bad_request("You have not checked in today"))
        }
        Some(r) if r.check_out.is_some() => {
            return Err(AppError::conflict("You have already checked out today"))
        }
        Some(_) => {}
    }

    let record = repo::attendance::set_check_out(&state.pool, actor.id, date, now_time())
        .await?
        .ok_or_else(|| AppError::conflict("You have already checked out today"))?;

    tracing::info!(user_id = actor.id, %date, "Checked out");
    Ok(record)
}

/// Counts for `date` over the active people the actor can see.
pub async fn summary_for(
    pool: &SqlitePool,
    actor: &StaffMember,
    date: NaiveDate,
) -> Result<AttendanceSummary, AppError> {
    let vis = Visibility::load(pool, actor).await?;
    let active: Vec<i64> = repo::staff::list_all(pool)
        .await?
        .into_iter()
        .filter(|m| m.is_active() && vis.sees(m.id))
        .map(|m| m.id)
        .collect();

    let records = repo::attendance::list(pool, Some(date), None, None).await?;
    let mut summary = AttendanceSummary {
        date: Some(date),
        ..Default::default()
    };
    for record in records.iter().filter(|r| vis.sees(r.user_id)) {
        summary.record(&record.status);
    }
    summary.unmarked = active
        .iter()
        .filter(|id| !records.iter().any(|r| r.user_id == **id))
        .count() as i64;
    Ok(summary)
}

pub async fn summary(
    state: &AppState,
    actor: &StaffMember,
    date: Option<NaiveDate>,
) -> Result<AttendanceSummary, AppError> {
    require_section(actor, Section::Attendance)?;
    summary_for(&state.pool, actor, date.unwrap_or_else(today)).await
}
