use shared_types::{
    is_valid_language, is_valid_theme, AppError, ChangePasswordRequest, Role, StaffMember,
    UpdateProfileRequest, UpdateSettingsRequest, UserSettings,
};

use crate::auth::password;
use crate::auth::session::{self, TokenPair};
use crate::db::AppState;
use crate::error_convert::ValidateRequest;
use crate::repo;

pub async fn get_profile(state: &AppState, actor: &StaffMember) -> Result<StaffMember, AppError> {
    repo::staff::find_by_id(&state.pool, actor.id)
        .await?
        .ok_or_else(|| AppError::not_found("Your account no longer exists"))
}

/// Edit one's own profile. Department and position need admin rank.
pub async fn update_profile(
    state: &AppState,
    actor: &StaffMember,
    req: UpdateProfileRequest,
) -> Result<StaffMember, AppError> {
    req.validate_request()?;

    let may_edit_placement = actor.role.rank() >= Role::Admin.rank();
    let changes_department = req
        .department
        .as_deref()
        .is_some_and(|d| d.trim() != actor.department);
    let changes_position = req
        .position
        .as_deref()
        .is_some_and(|p| p.trim() != actor.position);
    if (changes_department || changes_position) && !may_edit_placement {
        return Err(AppError::forbidden(
            "Ask an administrator to change your department or position",
        ));
    }

    let updated = repo::staff::update_profile(
        &state.pool,
        actor.id,
        &req.name,
        req.phone.as_deref(),
        req.department.as_deref(),
        req.position.as_deref(),
    )
    .await?
    .ok_or_else(|| AppError::not_found("Your account no longer exists"))?;

    tracing::info!(user_id = actor.id, "Profile updated");
    Ok(updated)
}

/// Change the actor's password and end every other session.
///
/// Returns a fresh token pair for the current session.
pub async fn change_password(
    state: &AppState,
    actor: &StaffMember,
    req: ChangePasswordRequest,
) -> Result<TokenPair, AppError> {
    req.validate_request()?;

    let stored = repo::staff::password_hash(&state.pool, actor.id)
        .await?
        .ok_or_else(|| AppError::not_found("Your account no longer exists"))?;
    if !password::verify_password(&req.current_password, &stored) {
        tracing::warn!(user_id = actor.id, "Password change with wrong current password");
        return Err(AppError::unauthorized("Current password is incorrect"));
    }
    if req.new_password == req.current_password {
        return Err(AppError::field(
            "new_password",
            "New password must differ from the current one",
        ));
    }

    let hash = password::hash_password(&req.new_password)?;
    repo::staff::set_password(&state.pool, actor.id, &hash).await?;
    session::revoke_all(&state.pool, actor.id).await?;
    let tokens = session::issue(&state.pool, actor).await?;

    tracing::info!(user_id = actor.id, "Password changed");
    Ok(tokens)
}

/// Stored settings, or the defaults when none were saved yet.
pub async fn get_settings(state: &AppState, actor: &StaffMember) -> Result<UserSettings, AppError> {
    Ok(repo::settings::find(&state.pool, actor.id)
        .await?
        .unwrap_or_default())
}

pub async fn update_settings(
    state: &AppState,
    actor: &StaffMember,
    req: UpdateSettingsRequest,
) -> Result<UserSettings, AppError> {
    req.validate_request()?;
    if !is_valid_theme(&req.theme) {
        return Err(AppError::field("theme", "Theme must be light or dark"));
    }
    if !is_valid_language(&req.language) {
        return Err(AppError::field("language", "Language must be en, es, fr or de"));
    }

    let settings = repo::settings::upsert(&state.pool, actor.id, &req).await?;
    tracing::info!(user_id = actor.id, theme = %settings.theme, "Settings updated");
    Ok(settings)
}
