use dioxus::prelude::*;
use shared_types::{
    CreateLeaveRequest, LeaveBalance, LeaveListParams, LeaveRequest, ReviewLeaveRequest,
};

#[cfg(feature = "server")]
use super::auth::*;

#[cfg(feature = "server")]
use crate::service;

#[server]
pub async fn list_leave(params: LeaveListParams) -> Result<Vec<LeaveRequest>, ServerFnError> {
    let (state, actor) = require_user().await?;
    sfn(service::leave::list(state, &actor, &params).await)
}

#[cfg_attr(feature = "server", tracing::instrument(skip(req)))]
#[server]
pub async fn request_leave(req: CreateLeaveRequest) -> Result<LeaveRequest, ServerFnError> {
    let (state, actor) = require_user().await?;
    sfn(service::leave::request(state, &actor, req).await)
}

#[cfg_attr(feature = "server", tracing::instrument(skip(req)))]
#[server]
pub async fn review_leave(id: i64, req: ReviewLeaveRequest) -> Result<LeaveRequest, ServerFnError> {
    let (state, actor) = require_user().await?;
    sfn(service::leave::review(state, &actor, id, req).await)
}

#[server]
pub async fn cancel_leave(id: i64) -> Result<LeaveRequest, ServerFnError> {
    let (state, actor) = require_user().await?;
    sfn(service::leave::cancel(state, &actor, id).await)
}

#[server]
pub async fn get_leave_balance() -> Result<LeaveBalance, ServerFnError> {
    let (state, actor) = require_user().await?;
    sfn(service::leave::balance(state, &actor).await)
}
