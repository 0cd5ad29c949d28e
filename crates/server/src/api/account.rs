use dioxus::prelude::*;
use shared_types::{
    AuthUser, ChangePasswordRequest, DashboardStats, StaffMember, UpdateProfileRequest,
    UpdateSettingsRequest, UserSettings,
};

#[cfg(feature = "server")]
use super::auth::*;

#[cfg(feature = "server")]
use crate::service;

#[server]
pub async fn get_dashboard_stats() -> Result<DashboardStats, ServerFnError> {
    let (state, actor) = require_user().await?;
    sfn(service::dashboard::stats(state, &actor).await)
}

#[server]
pub async fn get_profile() -> Result<StaffMember, ServerFnError> {
    let (state, actor) = require_user().await?;
    sfn(service::account::get_profile(state, &actor).await)
}

#[cfg_attr(feature = "server", tracing::instrument(skip(req)))]
#[server]
pub async fn update_profile(req: UpdateProfileRequest) -> Result<AuthUser, ServerFnError> {
    let (state, actor) = require_user().await?;
    sfn(service::account::update_profile(state, &actor, req).await).map(AuthUser::from)
}

/// Change password. Other sessions end and this one receives new cookies.
#[cfg_attr(feature = "server", tracing::instrument(skip(req)))]
#[server]
pub async fn change_password(req: ChangePasswordRequest) -> Result<(), ServerFnError> {
    let (state, actor) = require_user().await?;
    let tokens = sfn(service::account::change_password(state, &actor, req).await)?;
    crate::auth::cookies::schedule_auth_cookies(&tokens.access_token, &tokens.refresh_token);
    Ok(())
}

#[server]
pub async fn get_settings() -> Result<UserSettings, ServerFnError> {
    let (state, actor) = require_user().await?;
    sfn(service::account::get_settings(state, &actor).await)
}

#[cfg_attr(feature = "server", tracing::instrument(skip(req)))]
#[server]
pub async fn update_settings(req: UpdateSettingsRequest) -> Result<UserSettings, ServerFnError> {
    let (state, actor) = require_user().await?;
    sfn(service::account::update_settings(state, &actor, req).await)
}
