use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use shared_types::{AppError, CreateReportRequest, Report, ReportListParams};

use crate::auth::extractors::CurrentUser;
use crate::db::AppState;
use crate::service;

// ---------------------------------------------------------------------------
// GET /api/v1/reports
// ---------------------------------------------------------------------------

#[utoipa::path(
    get,
    path = "/api/v1/reports",
    params(ReportListParams),
    responses(
        (status = 200, description = "Visible reports", body = Vec<Report>),
        (status = 403, description = "Reports not available to caller", body = AppError)
    ),
    tag = "reports",
    security(("bearer_auth" = []))
)]
pub async fn list_reports(
    State(state): State<AppState>,
    CurrentUser(actor): CurrentUser,
    Query(params): Query<ReportListParams>,
) -> Result<Json<Vec<Report>>, AppError> {
    service::report::list(&state, &actor, &params).await.map(Json)
}

// ---------------------------------------------------------------------------
// POST /api/v1/reports
// ---------------------------------------------------------------------------

/// Queue a report. Generation runs in the background.
#[utoipa::path(
    post,
    path = "/api/v1/reports",
    request_body = CreateReportRequest,
    responses(
        (status = 202, description = "Report queued", body = Report),
        (status = 403, description = "Reports not available to caller", body = AppError),
        (status = 422, description = "Validation failed", body = AppError)
    ),
    tag = "reports",
    security(("bearer_auth" = []))
)]
#[tracing::instrument(skip_all, fields(actor_id = actor.id, kind = %body.kind))]
pub async fn create_report(
    State(state): State<AppState>,
    CurrentUser(actor): CurrentUser,
    Json(body): Json<CreateReportRequest>,
) -> Result<(StatusCode, Json<Report>), AppError> {
    let report = service::report::request(&state, &actor, body).await?;
    Ok((StatusCode::ACCEPTED, Json(report)))
}

// ---------------------------------------------------------------------------
// GET /api/v1/reports/{id}
// ---------------------------------------------------------------------------

#[utoipa::path(
    get,
    path = "/api/v1/reports/{id}",
    params(("id" = i64, Path, description = "Report ID")),
    responses(
        (status = 200, description = "Report with its summary once ready", body = Report),
        (status = 404, description = "Not found", body = AppError)
    ),
    tag = "reports",
    security(("bearer_auth" = []))
)]
pub async fn get_report(
    State(state): State<AppState>,
    CurrentUser(actor): CurrentUser,
    Path(id): Path<i64>,
) -> Result<Json<Report>, AppError> {
    service::report::get(&state, &actor, id).await.map(Json)
}

// ---------------------------------------------------------------------------
// POST /api/v1/reports/{id}/retry
// ---------------------------------------------------------------------------

#[utoipa::path(
    post,
    path = "/api/v1/reports/{id}/retry",
    params(("id" = i64, Path, description = "Report ID")),
    responses(
        (status = 202, description = "Report re-queued", body = Report),
        (status = 404, description = "Not found", body = AppError),
        (status = 409, description = "Report has not failed", body = AppError)
    ),
    tag = "reports",
    security(("bearer_auth" = []))
)]
#[tracing::instrument(skip_all, fields(actor_id = actor.id, id))]
pub async fn retry_report(
    State(state): State<AppState>,
    CurrentUser(actor): CurrentUser,
    Path(id): Path<i64>,
) -> Result<(StatusCode, Json<Report>), AppError> {
    let report = service::report::retry(&state, &actor, id).await?;
    Ok((StatusCode::ACCEPTED, Json(report)))
}

// ---------------------------------------------------------------------------
// DELETE /api/v1/reports/{id}
// ---------------------------------------------------------------------------

#[utoipa::path(
    delete,
    path = "/api/v1/reports/{id}",
    params(("id" = i64, Path, description = "Report ID")),
    responses(
        (status = 204, description = "Report deleted"),
        (status = 404, description = "Not found", body = AppError)
    ),
    tag = "reports",
    security(("bearer_auth" = []))
)]
#[tracing::instrument(skip_all, fields(actor_id = actor.id, id))]
pub async fn delete_report(
    State(state): State<AppState>,
    CurrentUser(actor): CurrentUser,
    Path(id): Path<i64>,
) -> Result<StatusCode, AppError> {
    service::report::delete(&state, &actor, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
