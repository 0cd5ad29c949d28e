use axum::{extract::State, http::HeaderMap, Json};
use shared_types::{
    AppError, AuthResponse, ChangePasswordRequest, DashboardStats, StaffMember,
    UpdateProfileRequest, UpdateSettingsRequest, UserSettings,
};

use crate::auth::cookies;
use crate::auth::extractors::CurrentUser;
use crate::db::AppState;
use crate::service;

// ---------------------------------------------------------------------------
// GET /api/v1/dashboard
// ---------------------------------------------------------------------------

/// Landing-page figures scoped to the caller.
#[utoipa::path(
    get,
    path = "/api/v1/dashboard",
    responses(
        (status = 200, description = "Dashboard figures", body = DashboardStats),
        (status = 401, description = "Not authenticated", body = AppError)
    ),
    tag = "account",
    security(("bearer_auth" = []))
)]
pub async fn dashboard(
    State(state): State<AppState>,
    CurrentUser(actor): CurrentUser,
) -> Result<Json<DashboardStats>, AppError> {
    service::dashboard::stats(&state, &actor).await.map(Json)
}

// ---------------------------------------------------------------------------
// GET /api/v1/profile
// ---------------------------------------------------------------------------

#[utoipa::path(
    get,
    path = "/api/v1/profile",
    responses((status = 200, description = "Own profile", body = StaffMember)),
    tag = "account",
    security(("bearer_auth" = []))
)]
pub async fn get_profile(
    State(state): State<AppState>,
    CurrentUser(actor): CurrentUser,
) -> Result<Json<StaffMember>, AppError> {
    service::account::get_profile(&state, &actor).await.map(Json)
}

// ---------------------------------------------------------------------------
// PUT /api/v1/profile
// ---------------------------------------------------------------------------

#[utoipa::path(
    put,
    path = "/api/v1/profile",
    request_body = UpdateProfileRequest,
    responses(
        (status = 200, description = "Profile updated", body = StaffMember),
        (status = 403, description = "Department and position need an administrator", body = AppError),
        (status = 422, description = "Validation failed", body = AppError)
    ),
    tag = "account",
    security(("bearer_auth" = []))
)]
#[tracing::instrument(skip_all, fields(actor_id = actor.id))]
pub async fn update_profile(
    State(state): State<AppState>,
    CurrentUser(actor): CurrentUser,
    Json(body): Json<UpdateProfileRequest>,
) -> Result<Json<StaffMember>, AppError> {
    service::account::update_profile(&state, &actor, body).await.map(Json)
}

// ---------------------------------------------------------------------------
// POST /api/v1/profile/password
// ---------------------------------------------------------------------------

/// Change password. Other sessions end; this one gets a fresh token pair.
#[utoipa::path(
    post,
    path = "/api/v1/profile/password",
    request_body = ChangePasswordRequest,
    responses(
        (status = 200, description = "Password changed", body = AuthResponse),
        (status = 401, description = "Current password incorrect", body = AppError),
        (status = 422, description = "Validation failed", body = AppError)
    ),
    tag = "account",
    security(("bearer_auth" = []))
)]
#[tracing::instrument(skip_all, fields(actor_id = actor.id))]
pub async fn change_password(
    State(state): State<AppState>,
    CurrentUser(actor): CurrentUser,
    Json(body): Json<ChangePasswordRequest>,
) -> Result<(HeaderMap, Json<AuthResponse>), AppError> {
    let tokens = service::account::change_password(&state, &actor, body).await?;
    let response = tokens.into_response(actor);

    let mut headers = HeaderMap::new();
    cookies::set_auth_cookies(&mut headers, &response.access_token, &response.refresh_token);
    Ok((headers, Json(response)))
}

// ---------------------------------------------------------------------------
// GET /api/v1/settings
// ---------------------------------------------------------------------------

#[utoipa::path(
    get,
    path = "/api/v1/settings",
    responses((status = 200, description = "Preferences", body = UserSettings)),
    tag = "account",
    security(("bearer_auth" = []))
)]
pub async fn get_settings(
    State(state): State<AppState>,
    CurrentUser(actor): CurrentUser,
) -> Result<Json<UserSettings>, AppError> {
    service::account::get_settings(&state, &actor).await.map(Json)
}

// ---------------------------------------------------------------------------
// PUT /api/v1/settings
// ---------------------------------------------------------------------------

#[utoipa::path(
    put,
    path = "/api/v1/settings",
    request_body = UpdateSettingsRequest,
    responses(
        (status = 200, description = "Preferences saved", body = UserSettings),
        (status = 422, description = "Unknown theme or language", body = AppError)
    ),
    tag = "account",
    security(("bearer_auth" = []))
)]
#[tracing::instrument(skip_all, fields(actor_id = actor.id))]
pub async fn update_settings(
    State(state): State<AppState>,
    CurrentUser(actor): CurrentUser,
    Json(body): Json<UpdateSettingsRequest>,
) -> Result<Json<UserSettings>, AppError> {
    service::account::update_settings(&state, &actor, body).await.map(Json)
}
