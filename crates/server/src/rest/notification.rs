use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use shared_types::{
    AppError, BroadcastRequest, BroadcastResponse, MessageResponse, Notification,
    NotificationListParams, UnreadCount,
};

use crate::auth::extractors::CurrentUser;
use crate::db::AppState;
use crate::service;

// ---------------------------------------------------------------------------
// GET /api/v1/notifications
// ---------------------------------------------------------------------------

/// The caller's inbox, newest first.
#[utoipa::path(
    get,
    path = "/api/v1/notifications",
    params(NotificationListParams),
    responses((status = 200, description = "Notifications", body = Vec<Notification>)),
    tag = "notifications",
    security(("bearer_auth" = []))
)]
pub async fn list_notifications(
    State(state): State<AppState>,
    CurrentUser(actor): CurrentUser,
    Query(params): Query<NotificationListParams>,
) -> Result<Json<Vec<Notification>>, AppError> {
    service::notification::list(&state, &actor, &params).await.map(Json)
}

// ---------------------------------------------------------------------------
// GET /api/v1/notifications/unread-count
// ---------------------------------------------------------------------------

#[utoipa::path(
    get,
    path = "/api/v1/notifications/unread-count",
    responses((status = 200, description = "Unread count", body = UnreadCount)),
    tag = "notifications",
    security(("bearer_auth" = []))
)]
pub async fn unread_count(
    State(state): State<AppState>,
    CurrentUser(actor): CurrentUser,
) -> Result<Json<UnreadCount>, AppError> {
    service::notification::unread_count(&state, &actor).await.map(Json)
}

// ---------------------------------------------------------------------------
// POST /api/v1/notifications/{id}/read
// ---------------------------------------------------------------------------

#[utoipa::path(
    post,
    path = "/api/v1/notifications/{id}/read",
    params(("id" = i64, Path, description = "Notification ID")),
    responses(
        (status = 200, description = "Marked read", body = Notification),
        (status = 404, description = "Not found", body = AppError)
    ),
    tag = "notifications",
    security(("bearer_auth" = []))
)]
pub async fn mark_read(
    State(state): State<AppState>,
    CurrentUser(actor): CurrentUser,
    Path(id): Path<i64>,
) -> Result<Json<Notification>, AppError> {
    service::notification::mark_read(&state, &actor, id).await.map(Json)
}

// ---------------------------------------------------------------------------
// POST /api/v1/notifications/read-all
// ---------------------------------------------------------------------------

#[utoipa::path(
    post,
    path = "/api/v1/notifications/read-all",
    responses((status = 200, description = "All marked read", body = MessageResponse)),
    tag = "notifications",
    security(("bearer_auth" = []))
)]
#[tracing::instrument(skip_all, fields(actor_id = actor.id))]
pub async fn mark_all_read(
    State(state): State<AppState>,
    CurrentUser(actor): CurrentUser,
) -> Result<Json<MessageResponse>, AppError> {
    let updated = service::notification::mark_all_read(&state, &actor).await?;
    Ok(Json(MessageResponse::new(format!(
        "Marked {updated} notification(s) as read"
    ))))
}

// ---------------------------------------------------------------------------
// DELETE /api/v1/notifications/{id}
// ---------------------------------------------------------------------------

#[utoipa::path(
    delete,
    path = "/api/v1/notifications/{id}",
    params(("id" = i64, Path, description = "Notification ID")),
    responses(
        (status = 204, description = "Notification deleted"),
        (status = 404, description = "Not found", body = AppError)
    ),
    tag = "notifications",
    security(("bearer_auth" = []))
)]
pub async fn delete_notification(
    State(state): State<AppState>,
    CurrentUser(actor): CurrentUser,
    Path(id): Path<i64>,
) -> Result<StatusCode, AppError> {
    service::notification::delete(&state, &actor, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// POST /api/v1/notifications/broadcast
// ---------------------------------------------------------------------------

/// Send a message to every active person in the chosen tiers.
#[utoipa::path(
    post,
    path = "/api/v1/notifications/broadcast",
    request_body = BroadcastRequest,
    responses(
        (status = 200, description = "Broadcast delivered", body = BroadcastResponse),
        (status = 403, description = "Only administrators may broadcast", body = AppError),
        (status = 422, description = "Validation failed", body = AppError)
    ),
    tag = "notifications",
    security(("bearer_auth" = []))
)]
#[tracing::instrument(skip_all, fields(actor_id = actor.id))]
pub async fn broadcast(
    State(state): State<AppState>,
    CurrentUser(actor): CurrentUser,
    Json(body): Json<BroadcastRequest>,
) -> Result<Json<BroadcastResponse>, AppError> {
    service::notification::broadcast(&state, &actor, body).await.map(Json)
}
