use chrono::Utc;
use shared_types::{AppError, UpdateSettingsRequest, UserSettings};
use sqlx::SqlitePool;

use crate::error_convert::SqlxErrorExt;

pub async fn find(pool: &SqlitePool, user_id: i64) -> Result<Option<UserSettings>, AppError> {
    sqlx::query_as::<_, UserSettings>(
        r#"
        SELECT theme, language, timezone, email_notifications, push_notifications,
               weekly_digest, updated_at
        FROM user_settings WHERE user_id = ?
        "#,
    )
    .bind(user_id)
    .fetch_optional(pool)
    .await
    .map_err(SqlxErrorExt::into_app_error)
}

pub async fn upsert(
    pool: &SqlitePool,
    user_id: i64,
    req: &UpdateSettingsRequest,
) -> Result<UserSettings, AppError> {
    sqlx::query(
        r#"
        INSERT INTO user_settings (user_id, theme, language, timezone, email_notifications,
                                   push_notifications, weekly_digest, updated_at)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?)
        ON CONFLICT (user_id) DO UPDATE SET
            theme               = excluded.theme,
            language            = excluded.language,
            timezone            = excluded.timezone,
            email_notifications = excluded.email_notifications,
            push_notifications  = excluded.push_notifications,
            weekly_digest       = excluded.weekly_digest,
            updated_at          = excluded.updated_at
        "#,
    )
    .bind(user_id)
    .bind(&req.theme)
    .bind(&req.language)
    .bind(req.timezone.trim())
    .bind(req.email_notifications)
    .bind(req.push_notifications)
    .bind(req.weekly_digest)
    .bind(Utc::now())
    .execute(pool)
    .await
    .map_err(SqlxErrorExt::into_app_error)?;

    find(pool, user_id)
        .await?
        .ok_or_else(|| AppError::internal("Settings could not be read back"))
}
