use axum::{
    extract::{Query, State},
    Json,
};
use chrono::NaiveDate;
use serde::Deserialize;
use shared_types::{
    AppError, AttendanceListParams, AttendanceRecord, AttendanceSummary, MarkAttendanceRequest,
};
use utoipa::IntoParams;

use crate::auth::extractors::CurrentUser;
use crate::db::AppState;
use crate::service;

#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct SummaryParams {
    /// Day to summarise. Defaults to today.
    pub date: Option<NaiveDate>,
}

// ---------------------------------------------------------------------------
// GET /api/v1/attendance
// ---------------------------------------------------------------------------

/// Records visible to the caller. Without a date or user filter, today's.
#[utoipa::path(
    get,
    path = "/api/v1/attendance",
    params(AttendanceListParams),
    responses(
        (status = 200, description = "Attendance records", body = Vec<AttendanceRecord>),
        (status = 403, description = "Attendance not available to caller", body = AppError)
    ),
    tag = "attendance",
    security(("bearer_auth" = []))
)]
pub async fn list_attendance(
    State(state): State<AppState>,
    CurrentUser(actor): CurrentUser,
    Query(params): Query<AttendanceListParams>,
) -> Result<Json<Vec<AttendanceRecord>>, AppError> {
    service::attendance::list(&state, &actor, &params).await.map(Json)
}

// ---------------------------------------------------------------------------
// PUT /api/v1/attendance
// ---------------------------------------------------------------------------

/// Create or replace the record of one person for one day.
#[utoipa::path(
    put,
    path = "/api/v1/attendance",
    request_body = MarkAttendanceRequest,
    responses(
        (status = 200, description = "Attendance recorded", body = AttendanceRecord),
        (status = 403, description = "Person not below caller", body = AppError),
        (status = 422, description = "Validation failed", body = AppError)
    ),
    tag = "attendance",
    security(("bearer_auth" = []))
)]
#[tracing::instrument(skip_all, fields(actor_id = actor.id, user_id = body.user_id, date = %body.date))]
pub async fn mark_attendance(
    State(state): State<AppState>,
    CurrentUser(actor): CurrentUser,
    Json(body): Json<MarkAttendanceRequest>,
) -> Result<Json<AttendanceRecord>, AppError> {
    service::attendance::mark(&state, &actor, body).await.map(Json)
}

// ---------------------------------------------------------------------------
// POST /api/v1/attendance/check-in
// ---------------------------------------------------------------------------

#[utoipa::path(
    post,
    path = "/api/v1/attendance/check-in",
    responses(
        (status = 200, description = "Checked in", body = AttendanceRecord),
        (status = 409, description = "Already recorded today", body = AppError)
    ),
    tag = "attendance",
    security(("bearer_auth" = []))
)]
#[tracing::instrument(skip_all, fields(actor_id = actor.id))]
pub async fn check_in(
    State(state): State<AppState>,
    CurrentUser(actor): CurrentUser,
) -> Result<Json<AttendanceRecord>, AppError> {
    service::attendance::check_in(&state, &actor).await.map(Json)
}

// ---------------------------------------------------------------------------
// POST /api/v1/attendance/check-out
// ---------------------------------------------------------------------------

#[utoipa::path(
    post,
    path = "/api/v1/attendance/check-out",
    responses(
        (status = 200, description = "Checked out", body = AttendanceRecord),
        (status = 400, description = "Not checked in today", body = AppError),
        (status = 409, description = "Already checked out", body = AppError)
    ),
    tag = "attendance",
    security(("bearer_auth" = []))
)]
#[tracing::instrument(skip_all, fields(actor_id = actor.id))]
pub async fn check_out(
    State(state): State<AppState>,
    CurrentUser(actor): CurrentUser,
) -> Result<Json<AttendanceRecord>, AppError> {
    service::attendance::check_out(&state, &actor).await.map(Json)
}

// ---------------------------------------------------------------------------
// GET /api/v1/attendance/summary
// ---------------------------------------------------------------------------

#[utoipa::path(
    get,
    path = "/api/v1/attendance/summary",
    params(SummaryParams),
    responses(
        (status = 200, description = "Daily counts", body = AttendanceSummary),
        (status = 403, description = "Attendance not available to caller", body = AppError)
    ),
    tag = "attendance",
    security(("bearer_auth" = []))
)]
pub async fn attendance_summary(
    State(state): State<AppState>,
    CurrentUser(actor): CurrentUser,
    Query(params): Query<SummaryParams>,
) -> Result<Json<AttendanceSummary>, AppError> {
    service::attendance::summary(&state, &actor, params.date).await.map(Json)
}
