//! Report requests and their background generation.
//!
//! A request is stored as `queued` and handed to a spawned task, which waits
//! the configured delay, moves it to `generating`, builds the summary from
//! live data and finishes as `ready` or `failed`.

use chrono::NaiveDate;
use shared_types::{
    filter_by_query, is_valid_report_kind, AppError, AttendanceReportSummary, CreateReportRequest,
    HeadcountSummary, LeaveReportSummary, Report, ReportListParams, Role, Section, StaffMember,
    TaskReportSummary, REPORT_STATUSES,
};
use sqlx::SqlitePool;
use std::time::Duration;

use super::notification::notify;
use super::{check_filter, require_section, today};
use crate::db::AppState;
use crate::error_convert::ValidateRequest;
use crate::repo;

/// Super admins and admins see and manage every report.
fn sees_all(actor: &StaffMember) -> bool {
    matches!(actor.role, Role::SuperAdmin | Role::Admin)
}

pub async fn list(
    state: &AppState,
    actor: &StaffMember,
    params: &ReportListParams,
) -> Result<Vec<Report>, AppError> {
    require_section(actor, Section::Reports)?;
    check_filter("status", params.status.as_deref(), REPORT_STATUSES)?;

    let owner = (!sees_all(actor)).then_some(actor.id);
    let reports = repo::report::list(&state.pool, owner, params.status.as_deref()).await?;
    Ok(filter_by_query(reports, params.q.as_deref().unwrap_or("")))
}

pub async fn get(state: &AppState, actor: &StaffMember, id: i64) -> Result<Report, AppError> {
    require_section(actor, Section::Reports)?;
    repo::report::find_by_id(&state.pool, id)
        .await?
        .filter(|r| sees_all(actor) || r.requested_by == actor.id)
        .ok_or_else(|| AppError::not_found(format!("Report {id} not found")))
}

pub async fn request(
    state: &AppState,
    actor: &StaffMember,
    req: CreateReportRequest,
) -> Result<Report, AppError> {
    require_section(actor, Section::Reports)?;
    req.validate_request()?;

    if !is_valid_report_kind(&req.kind) {
        return Err(AppError::field(
            "kind",
            "Kind must be headcount, attendance, leave or tasks",
        ));
    }
    if req.period_end < req.period_start {
        return Err(AppError::field("period_end", "Period end must not be before its start"));
    }
    let span = (req.period_end - req.period_start).num_days() + 1;
    let max = state.config.reports.max_period_days;
    if span > max {
        return Err(AppError::field(
            "period_end",
            format!("A report can cover at most {max} days"),
        ));
    }

    let report = repo::report::create(
        &state.pool,
        &req.title,
        &req.kind,
        req.period_start,
        req.period_end,
        actor.id,
    )
    .await?;

    tracing::info!(actor_id = actor.id, report_id = report.id, kind = %report.kind, "Report queued");
    spawn_generation(state, report.id);
    Ok(report)
}

/// Re-queue a failed report.
pub async fn retry(state: &AppState, actor: &StaffMember, id: i64) -> Result<Report, AppError> {
    let report = get(state, actor, id).await?;
    if report.status != "failed" {
        return Err(AppError::conflict(format!(
            "Only failed reports can be retried; this one is {}",
            report.status
        )));
    }
    if !repo::report::transition(&state.pool, id, "failed", "queued").await? {
        return Err(AppError::conflict("This report is already being retried"));
    }

    tracing::info!(actor_id = actor.id, report_id = id, "Report retry queued");
    spawn_generation(state, id);
    get(state, actor, id).await
}

pub async fn delete(state: &AppState, actor: &StaffMember, id: i64) -> Result<(), AppError> {
    get(state, actor, id).await?;
    if !repo::report::delete(&state.pool, id).await? {
        return Err(AppError::not_found(format!("Report {id} not found")));
    }
    tracing::info!(actor_id = actor.id, report_id = id, "Report deleted");
    Ok(())
}

fn spawn_generation(state: &AppState, id: i64) {
    let pool = state.pool.clone();
    let delay = Duration::from_millis(state.config.reports.generation_delay_ms);
    tokio::spawn(async move {
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
        run_generation(&pool, id).await;
    });
}

const INTERRUPTED: &str = "Generation was interrupted by a server restart";

/// Drive one report from `queued` to `ready` or `failed`.
pub async fn run_generation(pool: &SqlitePool, id: i64) {
    match repo::report::transition(pool, id, "queued", "generating").await {
        Ok(true) => {}
        Ok(false) => {
            tracing::debug!(report_id = id, "Report no longer queued, skipping");
            return;
        }
        Err(e) => {
            tracing::error!(report_id = id, error = %e.message, "Could not start report");
            record_failure(pool, id, &e.message).await;
            return;
        }
    }

    let report = match repo::report::find_by_id(pool, id).await {
        Ok(Some(report)) => report,
        Ok(None) => {
            tracing::debug!(report_id = id, "Report deleted before generation");
            return;
        }
        Err(e) => {
            tracing::error!(report_id = id, error = %e.message, "Could not load report");
            record_failure(pool, id, &e.message).await;
            return;
        }
    };

    let summary = build_summary(pool, &report.kind, report.period_start, report.period_end).await;
    let outcome = match summary {
        Ok(summary) => repo::report::mark_ready(pool, id, &summary).await,
        Err(e) => Err(e),
    };

    match outcome {
        Ok(()) => {
            tracing::info!(report_id = id, kind = %report.kind, "Report ready");
            notify(
                pool,
                report.requested_by,
                "Report ready",
                &format!("\"{}\" is ready to view", report.title),
                "success",
            )
            .await;
        }
        Err(e) => {
            tracing::error!(report_id = id, error = %e.message, "Report generation failed");
            record_failure(pool, id, &e.message).await;
            notify_failed(pool, &report).await;
        }
    }
}

async fn record_failure(pool: &SqlitePool, id: i64, message: &str) {
    if let Err(store) = repo::report::mark_failed(pool, id, message).await {
        tracing::error!(report_id = id, error = %store.message, "Could not record report failure");
    }
}

async fn notify_failed(pool: &SqlitePool, report: &Report) {
    notify(
        pool,
        report.requested_by,
        "Report failed",
        &format!("\"{}\" could not be generated. You can retry it.", report.title),
        "alert",
    )
    .await;
}

/// Fail reports left `queued` or `generating` by a previous process so they
/// can be retried. Run once at startup, before any generation is spawned.
pub async fn recover_interrupted(pool: &SqlitePool) -> Result<usize, AppError> {
    let stuck = repo::report::list_unfinished(pool).await?;
    for report in &stuck {
        repo::report::mark_failed(pool, report.id, INTERRUPTED).await?;
        notify_failed(pool, report).await;
    }
    if !stuck.is_empty() {
        tracing::warn!(count = stuck.len(), "Marked interrupted reports as failed");
    }
    Ok(stuck.len())
}

fn to_json<T: serde::Serialize>(summary: &T) -> Result<serde_json::Value, AppError> {
    serde_json::to_value(summary).map_err(|e| AppError::internal(format!("Summary encoding failed: {e}")))
}

/// Compute the summary for one kind over `start..=end`.
pub async fn build_summary(
    pool: &SqlitePool,
    kind: &str,
    start: NaiveDate,
    end: NaiveDate,
) -> Result<serde_json::Value, AppError> {
    match kind {
        "headcount" => {
            let staff = repo::staff::list_all(pool).await?;
            to_json(&HeadcountSummary::build(&staff, start, end))
        }
        "attendance" => {
            let records = repo::attendance::list_between(pool, start, end).await?;
            to_json(&AttendanceReportSummary::build(&records))
        }
        "leave" => {
            let requests = repo::leave::list_in_period(pool, start, end).await?;
            to_json(&LeaveReportSummary::build(&requests))
        }
        "tasks" => {
            let tasks = repo::task::list_due_between(pool, start, end).await?;
            to_json(&TaskReportSummary::build(&tasks, today()))
        }
        other => Err(AppError::bad_request(format!("Unknown report kind '{other}'"))),
    }
}
