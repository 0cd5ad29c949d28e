use axum::{
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
};
use shared_types::{AppError, StaffMember};

use super::jwt::Claims;
use crate::db::AppState;

/// Claims of the caller. Returns 401 if no valid token was presented.
pub struct AuthRequired(pub Claims);

impl<S: Send + Sync> FromRequestParts<S> for AuthRequired {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Claims>()
            .cloned()
            .map(AuthRequired)
            .ok_or_else(|| AppError::unauthorized("Authentication required"))
    }
}

/// The caller's current account, loaded from the database.
///
/// Claims only prove who signed in; role and status are read fresh so a
/// demotion or deactivation takes effect on the next request. Inactive or
/// deleted accounts, and tokens older than a password change, are rejected
/// with 401.
pub struct CurrentUser(pub StaffMember);

impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
    AppState: FromRef<S>,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let AuthRequired(claims) = AuthRequired::from_request_parts(parts, state).await?;
        let app = AppState::from_ref(state);
        load_active_user(&app, &claims).await.map(CurrentUser)
    }
}

/// Load the token's account and require it to be active, with the token
/// issued no earlier than the last password change.
pub async fn load_active_user(state: &AppState, claims: &Claims) -> Result<StaffMember, AppError> {
    let invalid = || AppError::unauthorized("Your session is no longer valid");
    let member = crate::repo::staff::find_by_id(&state.pool, claims.sub)
        .await?
        .filter(StaffMember::is_active)
        .ok_or_else(invalid)?;

    let changed = crate::repo::staff::password_changed_at(&state.pool, member.id).await?;
    if changed.is_some_and(|at| claims.iat < at.timestamp()) {
        tracing::debug!(user_id = member.id, "Access token predates password change");
        return Err(invalid());
    }
    Ok(member)
}
