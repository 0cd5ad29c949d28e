use dioxus::prelude::*;
use shared_types::{
    BroadcastRequest, BroadcastResponse, Notification, NotificationListParams, UnreadCount,
};

#[cfg(feature = "server")]
use super::auth::*;

#[cfg(feature = "server")]
use crate::service;

#[server]
pub async fn list_notifications(
    params: NotificationListParams,
) -> Result<Vec<Notification>, ServerFnError> {
    let (state, actor) = require_user().await?;
    sfn(service::notification::list(state, &actor, &params).await)
}

#[server]
pub async fn get_unread_count() -> Result<UnreadCount, ServerFnError> {
    let (state, actor) = require_user().await?;
    sfn(service::notification::unread_count(state, &actor).await)
}

#[server]
pub async fn mark_notification_read(id: i64) -> Result<Notification, ServerFnError> {
    let (state, actor) = require_user().await?;
    sfn(service::notification::mark_read(state, &actor, id).await)
}

/// Returns how many notifications changed.
#[server]
pub async fn mark_all_notifications_read() -> Result<u64, ServerFnError> {
    let (state, actor) = require_user().await?;
    sfn(service::notification::mark_all_read(state, &actor).await)
}

#[server]
pub async fn delete_notification(id: i64) -> Result<(), ServerFnError> {
    let (state, actor) = require_user().await?;
    sfn(service::notification::delete(state, &actor, id).await)
}

#[cfg_attr(feature = "server", tracing::instrument(skip(req)))]
#[server]
pub async fn broadcast(req: BroadcastRequest) -> Result<BroadcastResponse, ServerFnError> {
    let (state, actor) = require_user().await?;
    sfn(service::notification::broadcast(state, &actor, req).await)
}
