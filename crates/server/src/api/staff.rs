use dioxus::prelude::*;
use shared_types::{CreateStaffRequest, Role, StaffListParams, StaffMember, UpdateStaffRequest};

#[cfg(feature = "server")]
use super::auth::*;

#[cfg(feature = "server")]
use crate::service;

/// One directory page: the people of `role` visible to the caller.
#[server]
pub async fn list_staff(
    role: Role,
    params: StaffListParams,
) -> Result<Vec<StaffMember>, ServerFnError> {
    let (state, actor) = require_user().await?;
    sfn(service::staff::list(state, &actor, role, &params).await)
}

#[server]
pub async fn get_staff(id: i64) -> Result<StaffMember, ServerFnError> {
    let (state, actor) = require_user().await?;
    sfn(service::staff::get(state, &actor, id).await)
}

#[cfg_attr(feature = "server", tracing::instrument(skip(req)))]
#[server]
pub async fn create_staff(req: CreateStaffRequest) -> Result<StaffMember, ServerFnError> {
    let (state, actor) = require_user().await?;
    sfn(service::staff::create(state, &actor, req).await)
}

#[cfg_attr(feature = "server", tracing::instrument(skip(req)))]
#[server]
pub async fn update_staff(id: i64, req: UpdateStaffRequest) -> Result<StaffMember, ServerFnError> {
    let (state, actor) = require_user().await?;
    sfn(service::staff::update(state, &actor, id, req).await)
}

#[server]
pub async fn toggle_staff_status(id: i64) -> Result<StaffMember, ServerFnError> {
    let (state, actor) = require_user().await?;
    sfn(service::staff::toggle_status(state, &actor, id).await)
}

#[server]
pub async fn delete_staff(id: i64) -> Result<(), ServerFnError> {
    let (state, actor) = require_user().await?;
    sfn(service::staff::delete(state, &actor, id).await)
}
