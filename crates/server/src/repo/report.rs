use chrono::{NaiveDate, Utc};
use shared_types::{AppError, Report};
use sqlx::SqlitePool;

use crate::error_convert::SqlxErrorExt;

const SELECT_REPORT: &str = r#"
    SELECT r.id, r.title, r.kind, r.period_start, r.period_end, r.status, r.requested_by,
           u.name AS requester_name, r.summary, r.error, r.created_at, r.completed_at
    FROM reports r
    JOIN users u ON u.id = r.requested_by
"#;

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> Result<Option<Report>, AppError> {
    sqlx::query_as::<_, Report>(&format!("{SELECT_REPORT} WHERE r.id = ?"))
        .bind(id)
        .fetch_optional(pool)
        .await
        .map_err(SqlxErrorExt::into_app_error)
}

/// Newest first. `requested_by = None` lists everyone's reports.
pub async fn list(
    pool: &SqlitePool,
    requested_by: Option<i64>,
    status: Option<&str>,
) -> Result<Vec<Report>, AppError> {
    sqlx::query_as::<_, Report>(&format!(
        r#"{SELECT_REPORT}
        WHERE (? IS NULL OR r.requested_by = ?) AND (? IS NULL OR r.status = ?)
        ORDER BY r.created_at DESC, r.id DESC"#
    ))
    .bind(requested_by)
    .bind(requested_by)
    .bind(status)
    .bind(status)
    .fetch_all(pool)
    .await
    .map_err(SqlxErrorExt::into_app_error)
}

/// Reports still `queued` or `generating`.
pub async fn list_unfinished(pool: &SqlitePool) -> Result<Vec<Report>, AppError> {
    sqlx::query_as::<_, Report>(&format!(
        "{SELECT_REPORT} WHERE r.status IN ('queued', 'generating') ORDER BY r.id"
    ))
    .fetch_all(pool)
    .await
    .map_err(SqlxErrorExt::into_app_error)
}

pub async fn create(
    pool: &SqlitePool,
    title: &str,
    kind: &str,
    period_start: NaiveDate,
    period_end: NaiveDate,
    requested_by: i64,
) -> Result<Report, AppError> {
    let id = sqlx::query_scalar::<_, i64>(
        r#"
        INSERT INTO reports (title, kind, period_start, period_end, status, requested_by, created_at)
        VALUES (?, ?, ?, ?, 'queued', ?, ?)
        RETURNING id
        "#,
    )
    .bind(title.trim())
    .bind(kind)
    .bind(period_start)
    .bind(period_end)
    .bind(requested_by)
    .bind(Utc::now())
    .fetch_one(pool)
    .await
    .map_err(SqlxErrorExt::into_app_error)?;

    find_by_id(pool, id)
        .await?
        .ok_or_else(|| AppError::internal("Created report could not be read back"))
}

/// Move from `from` to `to` only if the report is still in `from`.
pub async fn transition(pool: &SqlitePool, id: i64, from: &str, to: &str) -> Result<bool, AppError> {
    let result = sqlx::query(
        r#"
        UPDATE reports SET status = ?, error = NULL, summary = NULL, completed_at = NULL
        WHERE id = ? AND status = ?
        "#,
    )
    .bind(to)
    .bind(id)
    .bind(from)
    .execute(pool)
    .await
    .map_err(SqlxErrorExt::into_app_error)?;
    Ok(result.rows_affected() > 0)
}

pub async fn mark_ready(
    pool: &SqlitePool,
    id: i64,
    summary: &serde_json::Value,
) -> Result<(), AppError> {
    sqlx::query(
        "UPDATE reports SET status = 'ready', summary = ?, error = NULL, completed_at = ? WHERE id = ?",
    )
    .bind(summary)
    .bind(Utc::now())
    .bind(id)
    .execute(pool)
    .await
    .map_err(SqlxErrorExt::into_app_error)?;
    Ok(())
}

pub async fn mark_failed(pool: &SqlitePool, id: i64, error: &str) -> Result<(), AppError> {
    sqlx::query(
        "UPDATE reports SET status = 'failed', error = ?, completed_at = ? WHERE id = ?",
    )
    .bind(error)
    .bind(Utc::now())
    .bind(id)
    .execute(pool)
    .await
    .map_err(SqlxErrorExt::into_app_error)?;
    Ok(())
}

pub async fn delete(pool: &SqlitePool, id: i64) -> Result<bool, AppError> {
    let result = sqlx::query("DELETE FROM reports WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await
        .map_err(SqlxErrorExt::into_app_error)?;
    Ok(result.rows_affected() > 0)
}
