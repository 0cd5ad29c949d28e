use chrono::{DateTime, Utc};
use shared_types::AppError;
use sqlx::SqlitePool;

use crate::error_convert::SqlxErrorExt;

/// Store the hash of a freshly issued refresh token.
pub async fn insert(
    pool: &SqlitePool,
    user_id: i64,
    token_hash: &str,
    expires_at: DateTime<Utc>,
) -> Result<(), AppError> {
    sqlx::query(
        "INSERT INTO refresh_tokens (user_id, token_hash, expires_at, created_at) VALUES (?, ?, ?, ?)",
    )
    .bind(user_id)
    .bind(token_hash)
    .bind(expires_at)
    .bind(Utc::now())
    .execute(pool)
    .await
    .map_err(SqlxErrorExt::into_app_error)?;
    Ok(())
}

/// Revoke an unrevoked, unexpired token. Returns false if it was already
/// used, revoked, expired or unknown, so a token can only be rotated once.
pub async fn consume(pool: &SqlitePool, user_id: i64, token_hash: &str) -> Result<bool, AppError> {
    let result = sqlx::query(
        r#"
        UPDATE refresh_tokens SET revoked = 1
        WHERE token_hash = ? AND user_id = ? AND revoked = 0 AND expires_at > ?
        "#,
    )
    .bind(token_hash)
    .bind(user_id)
    .bind(Utc::now())
    .execute(pool)
    .await
    .map_err(SqlxErrorExt::into_app_error)?;
    Ok(result.rows_affected() > 0)
}

/// Revoke every session of a user. Returns the number revoked.
pub async fn revoke_all_for_user(pool: &SqlitePool, user_id: i64) -> Result<u64, AppError> {
    let result = sqlx::query("UPDATE refresh_tokens SET revoked = 1 WHERE user_id = ? AND revoked = 0")
        .bind(user_id)
        .execute(pool)
        .await
        .map_err(SqlxErrorExt::into_app_error)?;
    Ok(result.rows_affected())
}

/// Drop rows that can no longer be used.
pub async fn purge_expired(pool: &SqlitePool) -> Result<u64, AppError> {
    let result = sqlx::query("DELETE FROM refresh_tokens WHERE revoked = 1 OR expires_at <= ?")
        .bind(Utc::now())
        .execute(pool)
        .await
        .map_err(SqlxErrorExt::into_app_error)?;
    Ok(result.rows_affected())
}
