use shared_types::{
    filter_by_query, AppError, BroadcastRequest, BroadcastResponse, Notification,
    NotificationListParams, Role, StaffMember, UnreadCount, NOTIFICATION_KINDS,
};
use sqlx::SqlitePool;

use super::{check_filter, require_outranks};
use crate::db::AppState;
use crate::error_convert::ValidateRequest;
use crate::repo;

/// Deliver a system notification. Failures are logged, never returned:
/// the action that triggered it has already happened.
pub async fn notify(pool: &SqlitePool, recipient_id: i64, title: &str, message: &str, kind: &str) {
    if let Err(e) = repo::notification::create(pool, recipient_id, title, message, kind).await {
        tracing::error!(recipient_id, title, error = %e.message, "Failed to deliver notification");
    }
}

pub async fn notify_many(pool: &SqlitePool, recipients: &[i64], title: &str, message: &str, kind: &str) {
    if recipients.is_empty() {
        return;
    }
    if let Err(e) = repo::notification::create_many(pool, recipients, title, message, kind).await {
        tracing::error!(count = recipients.len(), title, error = %e.message, "Failed to deliver notifications");
    }
}

pub async fn list(
    state: &AppState,
    actor: &StaffMember,
    params: &NotificationListParams,
) -> Result<Vec<Notification>, AppError> {
    let items = repo::notification::list_for(&state.pool, actor.id, params.unread_only).await?;
    Ok(filter_by_query(items, params.q.as_deref().unwrap_or("")))
}

pub async fn unread_count(state: &AppState, actor: &StaffMember) -> Result<UnreadCount, AppError> {
    let count = repo::notification::unread_count(&state.pool, actor.id).await?;
    Ok(UnreadCount { count })
}

pub async fn mark_read(
    state: &AppState,
    actor: &StaffMember,
    id: i64,
) -> Result<Notification, AppError> {
    repo::notification::mark_read(&state.pool, actor.id, id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Notification {id} not found")))
}

pub async fn mark_all_read(state: &AppState, actor: &StaffMember) -> Result<u64, AppError> {
    repo::notification::mark_all_read(&state.pool, actor.id).await
}

pub async fn delete(state: &AppState, actor: &StaffMember, id: i64) -> Result<(), AppError> {
    if repo::notification::delete(&state.pool, actor.id, id).await? {
        Ok(())
    } else {
        Err(AppError::not_found(format!("Notification {id} not found")))
    }
}

/// Send one message to every active person in the target tiers.
pub async fn broadcast(
    state: &AppState,
    actor: &StaffMember,
    req: BroadcastRequest,
) -> Result<BroadcastResponse, AppError> {
    if !matches!(actor.role, Role::SuperAdmin | Role::Admin) {
        return Err(AppError::forbidden("Only administrators can send broadcasts"));
    }
    req.validate_request()?;
    check_filter("kind", Some(&req.kind), NOTIFICATION_KINDS)?;

    let roles = if req.roles.is_empty() {
        actor.role.managed_roles()
    } else {
        for role in &req.roles {
            require_outranks(actor, *role, "message")?;
        }
        req.roles.clone()
    };

    let recipients: Vec<i64> = repo::staff::list_all(&state.pool)
        .await?
        .into_iter()
        .filter(|m| m.is_active() && roles.contains(&m.role))
        .map(|m| m.id)
        .collect();

    let sent = repo::notification::create_many(
        &state.pool,
        &recipients,
        req.title.trim(),
        req.message.trim(),
        &req.kind,
    )
    .await?;

    tracing::info!(actor_id = actor.id, recipients = sent, "Broadcast sent");
    Ok(BroadcastResponse {
        recipients: sent as i64,
    })
}
