use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use shared_types::{
    AppError, CreateStaffRequest, Role, StaffListParams, StaffMember, UpdateStaffRequest,
};

use crate::auth::extractors::CurrentUser;
use crate::db::AppState;
use crate::service;

/// Accept both the page slug (`managers`) and the role name (`manager`).
fn directory_role(segment: &str) -> Result<Role, AppError> {
    Role::from_slug(segment).map_or_else(|| Role::parse(segment), Ok)
}

// ---------------------------------------------------------------------------
// GET /api/v1/directory/{role}
// ---------------------------------------------------------------------------

/// List the people of one role tier.
#[utoipa::path(
    get,
    path = "/api/v1/directory/{role}",
    params(
        ("role" = String, Path, description = "Role slug, e.g. `managers` or `manager`"),
        StaffListParams
    ),
    responses(
        (status = 200, description = "Directory page", body = Vec<StaffMember>),
        (status = 400, description = "Unknown role or status", body = AppError),
        (status = 403, description = "Directory not available to caller", body = AppError)
    ),
    tag = "directory",
    security(("bearer_auth" = []))
)]
#[tracing::instrument(skip_all, fields(actor_id = actor.id, role = %role))]
pub async fn list_directory(
    State(state): State<AppState>,
    CurrentUser(actor): CurrentUser,
    Path(role): Path<String>,
    Query(params): Query<StaffListParams>,
) -> Result<Json<Vec<StaffMember>>, AppError> {
    let role = directory_role(&role)?;
    service::staff::list(&state, &actor, role, &params).await.map(Json)
}

// ---------------------------------------------------------------------------
// POST /api/v1/staff
// ---------------------------------------------------------------------------

/// Add a person to a lower tier.
#[utoipa::path(
    post,
    path = "/api/v1/staff",
    request_body = CreateStaffRequest,
    responses(
        (status = 201, description = "Staff member created", body = StaffMember),
        (status = 403, description = "Role not below caller", body = AppError),
        (status = 409, description = "Email already in use", body = AppError),
        (status = 422, description = "Validation failed", body = AppError)
    ),
    tag = "directory",
    security(("bearer_auth" = []))
)]
#[tracing::instrument(skip_all, fields(actor_id = actor.id))]
pub async fn create_staff(
    State(state): State<AppState>,
    CurrentUser(actor): CurrentUser,
    Json(body): Json<CreateStaffRequest>,
) -> Result<(StatusCode, Json<StaffMember>), AppError> {
    let member = service::staff::create(&state, &actor, body).await?;
    Ok((StatusCode::CREATED, Json(member)))
}

// ---------------------------------------------------------------------------
// GET /api/v1/staff/{id}
// ---------------------------------------------------------------------------

#[utoipa::path(
    get,
    path = "/api/v1/staff/{id}",
    params(("id" = i64, Path, description = "Staff member ID")),
    responses(
        (status = 200, description = "Staff member", body = StaffMember),
        (status = 404, description = "Not found or not visible to caller", body = AppError)
    ),
    tag = "directory",
    security(("bearer_auth" = []))
)]
pub async fn get_staff(
    State(state): State<AppState>,
    CurrentUser(actor): CurrentUser,
    Path(id): Path<i64>,
) -> Result<Json<StaffMember>, AppError> {
    service::staff::get(&state, &actor, id).await.map(Json)
}

// ---------------------------------------------------------------------------
// PUT /api/v1/staff/{id}
// ---------------------------------------------------------------------------

#[utoipa::path(
    put,
    path = "/api/v1/staff/{id}",
    params(("id" = i64, Path, description = "Staff member ID")),
    request_body = UpdateStaffRequest,
    responses(
        (status = 200, description = "Staff member updated", body = StaffMember),
        (status = 403, description = "Role not below caller", body = AppError),
        (status = 404, description = "Not found", body = AppError),
        (status = 409, description = "Email already in use", body = AppError)
    ),
    tag = "directory",
    security(("bearer_auth" = []))
)]
#[tracing::instrument(skip_all, fields(actor_id = actor.id, id))]
pub async fn update_staff(
    State(state): State<AppState>,
    CurrentUser(actor): CurrentUser,
    Path(id): Path<i64>,
    Json(body): Json<UpdateStaffRequest>,
) -> Result<Json<StaffMember>, AppError> {
    service::staff::update(&state, &actor, id, body).await.map(Json)
}

// ---------------------------------------------------------------------------
// POST /api/v1/staff/{id}/toggle-status
// ---------------------------------------------------------------------------

/// Flip a person between active and inactive.
#[utoipa::path(
    post,
    path = "/api/v1/staff/{id}/toggle-status",
    params(("id" = i64, Path, description = "Staff member ID")),
    responses(
        (status = 200, description = "Status toggled", body = StaffMember),
        (status = 400, description = "Cannot toggle yourself", body = AppError),
        (status = 404, description = "Not found or not visible to caller", body = AppError)
    ),
    tag = "directory",
    security(("bearer_auth" = []))
)]
#[tracing::instrument(skip_all, fields(actor_id = actor.id, id))]
pub async fn toggle_staff_status(
    State(state): State<AppState>,
    CurrentUser(actor): CurrentUser,
    Path(id): Path<i64>,
) -> Result<Json<StaffMember>, AppError> {
    service::staff::toggle_status(&state, &actor, id).await.map(Json)
}

// ---------------------------------------------------------------------------
// DELETE /api/v1/staff/{id}
// ---------------------------------------------------------------------------

#[utoipa::path(
    delete,
    path = "/api/v1/staff/{id}",
    params(("id" = i64, Path, description = "Staff member ID")),
    responses(
        (status = 204, description = "Staff member deleted"),
        (status = 400, description = "Cannot delete yourself", body = AppError),
        (status = 404, description = "Not found or not visible to caller", body = AppError)
    ),
    tag = "directory",
    security(("bearer_auth" = []))
)]
#[tracing::instrument(skip_all, fields(actor_id = actor.id, id))]
pub async fn delete_staff(
    State(state): State<AppState>,
    CurrentUser(actor): CurrentUser,
    Path(id): Path<i64>,
) -> Result<StatusCode, AppError> {
    service::staff::delete(&state, &actor, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
