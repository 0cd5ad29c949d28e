use chrono::Utc;
use shared_types::{AppError, Notification};
use sqlx::SqlitePool;

use crate::error_convert::SqlxErrorExt;

const SELECT_NOTIFICATION: &str =
    "SELECT id, recipient_id, title, message, kind, read, created_at FROM notifications";

pub async fn create(
    pool: &SqlitePool,
    recipient_id: i64,
    title: &str,
    message: &str,
    kind: &str,
) -> Result<i64, AppError> {
    sqlx::query_scalar::<_, i64>(
        r#"
        INSERT INTO notifications (recipient_id, title, message, kind, read, created_at)
        VALUES (?, ?, ?, ?, 0, ?)
        RETURNING id
        "#,
    )
    .bind(recipient_id)
    .bind(title)
    .bind(message)
    .bind(kind)
    .bind(Utc::now())
    .fetch_one(pool)
    .await
    .map_err(SqlxErrorExt::into_app_error)
}

/// Same message to many recipients in one transaction.
pub async fn create_many(
    pool: &SqlitePool,
    recipients: &[i64],
    title: &str,
    message: &str,
    kind: &str,
) -> Result<u64, AppError> {
    let mut tx = pool.begin().await.map_err(SqlxErrorExt::into_app_error)?;
    let now = Utc::now();
    for recipient in recipients {
        sqlx::query(
            r#"
            INSERT INTO notifications (recipient_id, title, message, kind, read, created_at)
            VALUES (?, ?, ?, ?, 0, ?)
            "#,
        )
        .bind(recipient)
        .bind(title)
        .bind(message)
        .bind(kind)
        .bind(now)
        .execute(&mut *tx)
        .await
        .map_err(SqlxErrorExt::into_app_error)?;
    }
    tx.commit().await.map_err(SqlxErrorExt::into_app_error)?;
    Ok(recipients.len() as u64)
}

/// A recipient's notifications, newest first.
pub async fn list_for(
    pool: &SqlitePool,
    recipient_id: i64,
    unread_only: bool,
) -> Result<Vec<Notification>, AppError> {
    sqlx::query_as::<_, Notification>(&format!(
        "{SELECT_NOTIFICATION} WHERE recipient_id = ? AND (? = 0 OR read = 0) ORDER BY created_at DESC, id DESC"
    ))
    .bind(recipient_id)
    .bind(unread_only)
    .fetch_all(pool)
    .await
    .map_err(SqlxErrorExt::into_app_error)
}

pub async fn unread_count(pool: &SqlitePool, recipient_id: i64) -> Result<i64, AppError> {
    sqlx::query_scalar::<_, i64>(
        "SELECT COUNT(*) FROM notifications WHERE recipient_id = ? AND read = 0",
    )
    .bind(recipient_id)
    .fetch_one(pool)
    .await
    .map_err(SqlxErrorExt::into_app_error)
}

/// Scoped to the recipient, so another user's id reads as not found.
pub async fn mark_read(
    pool: &SqlitePool,
    recipient_id: i64,
    id: i64,
) -> Result<Option<Notification>, AppError> {
    let result = sqlx::query("UPDATE notifications SET read = 1 WHERE id = ? AND recipient_id = ?")
        .bind(id)
        .bind(recipient_id)
        .execute(pool)
        .await
        .map_err(SqlxErrorExt::into_app_error)?;

    if result.rows_affected() == 0 {
        return Ok(None);
    }
    sqlx::query_as::<_, Notification>(&format!("{SELECT_NOTIFICATION} WHERE id = ?"))
        .bind(id)
        .fetch_optional(pool)
        .await
        .map_err(SqlxErrorExt::into_app_error)
}

pub async fn mark_all_read(pool: &SqlitePool, recipient_id: i64) -> Result<u64, AppError> {
    let result =
        sqlx::query("UPDATE notifications SET read = 1 WHERE recipient_id = ? AND read = 0")
            .bind(recipient_id)
            .execute(pool)
            .await
            .map_err(SqlxErrorExt::into_app_error)?;
    Ok(result.rows_affected())
}

pub async fn delete(pool: &SqlitePool, recipient_id: i64, id: i64) -> Result<bool, AppError> {
    let result = sqlx::query("DELETE FROM notifications WHERE id = ? AND recipient_id = ?")
        .bind(id)
        .bind(recipient_id)
        .execute(pool)
        .await
        .map_err(SqlxErrorExt::into_app_error)?;
    Ok(result.rows_affected() > 0)
}
