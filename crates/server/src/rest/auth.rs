use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    Json,
};
use shared_types::{
    AppError, AuthResponse, AuthUser, DemoAccount, LoginRequest, RefreshRequest,
};

use crate::auth::cookies;
use crate::auth::extractors::{AuthRequired, CurrentUser};
use crate::auth::session;
use crate::db::AppState;
use crate::error_convert::ValidateRequest;

fn with_cookies(response: &AuthResponse) -> HeaderMap {
    let mut headers = HeaderMap::new();
    cookies::set_auth_cookies(&mut headers, &response.access_token, &response.refresh_token);
    headers
}

// ---------------------------------------------------------------------------
// POST /api/v1/auth/login
// ---------------------------------------------------------------------------

/// Sign in with email and password.
///
/// Tokens are returned in the body and as HTTP-only cookies.
#[utoipa::path(
    post,
    path = "/api/v1/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = AuthResponse),
        (status = 401, description = "Invalid credentials", body = AppError),
        (status = 403, description = "Account inactive", body = AppError),
        (status = 429, description = "Too many attempts", body = AppError)
    ),
    tag = "auth"
)]
#[tracing::instrument(skip_all, fields(email = %payload.email))]
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<(HeaderMap, Json<AuthResponse>), AppError> {
    payload.validate_request()?;
    let (user, tokens) = session::login(&state.pool, &payload.email, &payload.password).await?;

    let response = tokens.into_response(user);
    Ok((with_cookies(&response), Json(response)))
}

// ---------------------------------------------------------------------------
// POST /api/v1/auth/refresh
// ---------------------------------------------------------------------------

/// Exchange a refresh token (body or cookie) for a new token pair.
#[utoipa::path(
    post,
    path = "/api/v1/auth/refresh",
    request_body(content = Option<RefreshRequest>, description = "Omit to use the refresh cookie"),
    responses(
        (status = 200, description = "Session renewed", body = AuthResponse),
        (status = 401, description = "Refresh token invalid, expired or reused", body = AppError)
    ),
    tag = "auth"
)]
#[tracing::instrument(skip_all)]
pub async fn refresh(
    State(state): State<AppState>,
    headers: HeaderMap,
    payload: Option<Json<RefreshRequest>>,
) -> Result<(HeaderMap, Json<AuthResponse>), AppError> {
    let token = payload
        .map(|Json(body)| body.refresh_token)
        .or_else(|| cookies::extract_refresh_token(&headers))
        .ok_or_else(|| AppError::unauthorized("Refresh token required"))?;

    let (user, tokens) = session::rotate(&state.pool, &token).await?;
    let response = tokens.into_response(user);
    Ok((with_cookies(&response), Json(response)))
}

// ---------------------------------------------------------------------------
// POST /api/v1/auth/logout
// ---------------------------------------------------------------------------

/// Revoke every session of the caller and clear the cookies.
#[utoipa::path(
    post,
    path = "/api/v1/auth/logout",
    responses(
        (status = 204, description = "Logged out"),
        (status = 401, description = "Not authenticated", body = AppError)
    ),
    tag = "auth",
    security(("bearer_auth" = []))
)]
#[tracing::instrument(skip_all, fields(user_id = auth.0.sub))]
pub async fn logout(
    State(state): State<AppState>,
    auth: AuthRequired,
) -> Result<(StatusCode, HeaderMap), AppError> {
    session::revoke_all(&state.pool, auth.0.sub).await?;
    let mut headers = HeaderMap::new();
    cookies::clear_auth_cookies(&mut headers);
    Ok((StatusCode::NO_CONTENT, headers))
}

// ---------------------------------------------------------------------------
// GET /api/v1/auth/me
// ---------------------------------------------------------------------------

/// The signed-in user with their sidebar entries.
#[utoipa::path(
    get,
    path = "/api/v1/auth/me",
    responses(
        (status = 200, description = "Current user", body = AuthUser),
        (status = 401, description = "Not authenticated", body = AppError)
    ),
    tag = "auth",
    security(("bearer_auth" = []))
)]
pub async fn me(CurrentUser(user): CurrentUser) -> Json<AuthUser> {
    Json(AuthUser::from(user))
}

// ---------------------------------------------------------------------------
// GET /api/v1/auth/demo-accounts
// ---------------------------------------------------------------------------

/// One sample sign-in per role, when the demo feature is on.
#[utoipa::path(
    get,
    path = "/api/v1/auth/demo-accounts",
    responses(
        (status = 200, description = "Demo accounts", body = Vec<DemoAccount>),
        (status = 404, description = "Demo accounts disabled", body = AppError)
    ),
    tag = "auth"
)]
pub async fn demo_accounts(
    State(state): State<AppState>,
) -> Result<Json<Vec<DemoAccount>>, AppError> {
    if !state.config.features.demo_accounts {
        return Err(AppError::not_found("Demo accounts are disabled"));
    }
    Ok(Json(crate::seed::demo_accounts()))
}

