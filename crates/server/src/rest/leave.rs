use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use shared_types::{
    AppError, CreateLeaveRequest, LeaveBalance, LeaveListParams, LeaveRequest, ReviewLeaveRequest,
};

use crate::auth::extractors::CurrentUser;
use crate::db::AppState;
use crate::service;

// ---------------------------------------------------------------------------
// GET /api/v1/leave
// ---------------------------------------------------------------------------

/// The caller's own requests plus those of everyone below them.
#[utoipa::path(
    get,
    path = "/api/v1/leave",
    params(LeaveListParams),
    responses(
        (status = 200, description = "Visible leave requests", body = Vec<LeaveRequest>),
        (status = 403, description = "Leave not available to caller", body = AppError)
    ),
    tag = "leave",
    security(("bearer_auth" = []))
)]
pub async fn list_leave(
    State(state): State<AppState>,
    CurrentUser(actor): CurrentUser,
    Query(params): Query<LeaveListParams>,
) -> Result<Json<Vec<LeaveRequest>>, AppError> {
    service::leave::list(&state, &actor, &params).await.map(Json)
}

// ---------------------------------------------------------------------------
// POST /api/v1/leave
// ---------------------------------------------------------------------------

#[utoipa::path(
    post,
    path = "/api/v1/leave",
    request_body = CreateLeaveRequest,
    responses(
        (status = 201, description = "Leave requested", body = LeaveRequest),
        (status = 409, description = "Overlaps another request or exceeds balance", body = AppError),
        (status = 422, description = "Validation failed", body = AppError)
    ),
    tag = "leave",
    security(("bearer_auth" = []))
)]
#[tracing::instrument(skip_all, fields(actor_id = actor.id, leave_type = %body.leave_type))]
pub async fn create_leave(
    State(state): State<AppState>,
    CurrentUser(actor): CurrentUser,
    Json(body): Json<CreateLeaveRequest>,
) -> Result<(StatusCode, Json<LeaveRequest>), AppError> {
    let request = service::leave::request(&state, &actor, body).await?;
    Ok((StatusCode::CREATED, Json(request)))
}

// ---------------------------------------------------------------------------
// GET /api/v1/leave/balance
// ---------------------------------------------------------------------------

#[utoipa::path(
    get,
    path = "/api/v1/leave/balance",
    responses(
        (status = 200, description = "Annual balance for the current year", body = LeaveBalance)
    ),
    tag = "leave",
    security(("bearer_auth" = []))
)]
pub async fn leave_balance(
    State(state): State<AppState>,
    CurrentUser(actor): CurrentUser,
) -> Result<Json<LeaveBalance>, AppError> {
    service::leave::balance(&state, &actor).await.map(Json)
}

// ---------------------------------------------------------------------------
// GET /api/v1/leave/{id}
// ---------------------------------------------------------------------------

#[utoipa::path(
    get,
    path = "/api/v1/leave/{id}",
    params(("id" = i64, Path, description = "Leave request ID")),
    responses(
        (status = 200, description = "Leave request", body = LeaveRequest),
        (status = 404, description = "Not found", body = AppError)
    ),
    tag = "leave",
    security(("bearer_auth" = []))
)]
pub async fn get_leave(
    State(state): State<AppState>,
    CurrentUser(actor): CurrentUser,
    Path(id): Path<i64>,
) -> Result<Json<LeaveRequest>, AppError> {
    service::leave::get(&state, &actor, id).await.map(Json)
}

// ---------------------------------------------------------------------------
// POST /api/v1/leave/{id}/review
// ---------------------------------------------------------------------------

/// Approve or reject a pending request of someone below the caller.
#[utoipa::path(
    post,
    path = "/api/v1/leave/{id}/review",
    params(("id" = i64, Path, description = "Leave request ID")),
    request_body = ReviewLeaveRequest,
    responses(
        (status = 200, description = "Request reviewed", body = LeaveRequest),
        (status = 403, description = "Employee not below caller", body = AppError),
        (status = 404, description = "Not found", body = AppError),
        (status = 409, description = "Already reviewed or balance exceeded", body = AppError)
    ),
    tag = "leave",
    security(("bearer_auth" = []))
)]
#[tracing::instrument(skip_all, fields(actor_id = actor.id, id, approve = body.approve))]
pub async fn review_leave(
    State(state): State<AppState>,
    CurrentUser(actor): CurrentUser,
    Path(id): Path<i64>,
    Json(body): Json<ReviewLeaveRequest>,
) -> Result<Json<LeaveRequest>, AppError> {
    service::leave::review(&state, &actor, id, body).await.map(Json)
}

// ---------------------------------------------------------------------------
// POST /api/v1/leave/{id}/cancel
// ---------------------------------------------------------------------------

#[utoipa::path(
    post,
    path = "/api/v1/leave/{id}/cancel",
    params(("id" = i64, Path, description = "Leave request ID")),
    responses(
        (status = 200, description = "Request cancelled", body = LeaveRequest),
        (status = 404, description = "Not found", body = AppError),
        (status = 409, description = "No longer pending", body = AppError)
    ),
    tag = "leave",
    security(("bearer_auth" = []))
)]
#[tracing::instrument(skip_all, fields(actor_id = actor.id, id))]
pub async fn cancel_leave(
    State(state): State<AppState>,
    CurrentUser(actor): CurrentUser,
    Path(id): Path<i64>,
) -> Result<Json<LeaveRequest>, AppError> {
    service::leave::cancel(&state, &actor, id).await.map(Json)
}
