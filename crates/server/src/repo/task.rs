use chrono::{NaiveDate, Utc};
use shared_types::{AppError, Task, UpdateTaskRequest};
use sqlx::SqlitePool;

use crate::error_convert::SqlxErrorExt;

const SELECT_TASK: &str = r#"
    SELECT t.id, t.title, t.description, t.assignee_id, a.name AS assignee_name,
           t.assigned_by, b.name AS assigned_by_name, t.priority, t.status,
           t.due_date, t.created_at, t.updated_at
    FROM tasks t
    JOIN users a ON a.id = t.assignee_id
    LEFT JOIN users b ON b.id = t.assigned_by
"#;

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> Result<Option<Task>, AppError> {
    sqlx::query_as::<_, Task>(&format!("{SELECT_TASK} WHERE t.id = ?"))
        .bind(id)
        .fetch_optional(pool)
        .await
        .map_err(SqlxErrorExt::into_app_error)
}

/// Every task, optionally narrowed by status and assignee. Newest first.
pub async fn list(
    pool: &SqlitePool,
    status: Option<&str>,
    assignee_id: Option<i64>,
) -> Result<Vec<Task>, AppError> {
    sqlx::query_as::<_, Task>(&format!(
        r#"{SELECT_TASK}
        WHERE (? IS NULL OR t.status = ?) AND (? IS NULL OR t.assignee_id = ?)
        ORDER BY t.created_at DESC, t.id DESC"#
    ))
    .bind(status)
    .bind(status)
    .bind(assignee_id)
    .bind(assignee_id)
    .fetch_all(pool)
    .await
    .map_err(SqlxErrorExt::into_app_error)
}

/// Tasks due inside `start..=end`.
pub async fn list_due_between(
    pool: &SqlitePool,
    start: NaiveDate,
    end: NaiveDate,
) -> Result<Vec<Task>, AppError> {
    sqlx::query_as::<_, Task>(&format!(
        "{SELECT_TASK} WHERE t.due_date >= ? AND t.due_date <= ? ORDER BY t.due_date"
    ))
    .bind(start)
    .bind(end)
    .fetch_all(pool)
    .await
    .map_err(SqlxErrorExt::into_app_error)
}

#[allow(clippy::too_many_arguments)]
pub async fn create(
    pool: &SqlitePool,
    title: &str,
    description: Option<&str>,
    assignee_id: i64,
    assigned_by: i64,
    priority: &str,
    due_date: Option<NaiveDate>,
) -> Result<Task, AppError> {
    let now = Utc::now();
    let id = sqlx::query_scalar::<_, i64>(
        r#"
        INSERT INTO tasks (title, description, assignee_id, assigned_by, priority, status,
                           due_date, created_at, updated_at)
        VALUES (?, ?, ?, ?, ?, 'pending', ?, ?, ?)
        RETURNING id
        "#,
    )
    .bind(title.trim())
    .bind(description.map(str::trim).filter(|d| !d.is_empty()))
    .bind(assignee_id)
    .bind(assigned_by)
    .bind(priority)
    .bind(due_date)
    .bind(now)
    .bind(now)
    .fetch_one(pool)
    .await
    .map_err(SqlxErrorExt::into_app_error)?;

    find_by_id(pool, id)
        .await?
        .ok_or_else(|| AppError::internal("Created task could not be read back"))
}

pub async fn update(
    pool: &SqlitePool,
    id: i64,
    req: &UpdateTaskRequest,
) -> Result<Option<Task>, AppError> {
    let result = sqlx::query(
        r#"
        UPDATE tasks SET
            title       = COALESCE(?, title),
            description = COALESCE(?, description),
            assignee_id = COALESCE(?, assignee_id),
            priority    = COALESCE(?, priority),
            status      = COALESCE(?, status),
            due_date    = COALESCE(?, due_date),
            updated_at  = ?
        WHERE id = ?
        "#,
    )
    .bind(req.title.as_deref().map(str::trim))
    .bind(req.description.as_deref().map(str::trim))
    .bind(req.assignee_id)
    .bind(req.priority.as_deref())
    .bind(req.status.as_deref())
    .bind(req.due_date)
    .bind(Utc::now())
    .bind(id)
    .execute(pool)
    .await
    .map_err(SqlxErrorExt::into_app_error)?;

    if result.rows_affected() == 0 {
        return Ok(None);
    }
    find_by_id(pool, id).await
}

pub async fn set_status(pool: &SqlitePool, id: i64, status: &str) -> Result<Option<Task>, AppError> {
    let result = sqlx::query("UPDATE tasks SET status = ?, updated_at = ? WHERE id = ?")
        .bind(status)
        .bind(Utc::now())
        .bind(id)
        .execute(pool)
        .await
        .map_err(SqlxErrorExt::into_app_error)?;

    if result.rows_affected() == 0 {
        return Ok(None);
    }
    find_by_id(pool, id).await
}

/// Returns true if a row was actually deleted.
pub async fn delete(pool: &SqlitePool, id: i64) -> Result<bool, AppError> {
    let result = sqlx::query("DELETE FROM tasks WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await
        .map_err(SqlxErrorExt::into_app_error)?;
    Ok(result.rows_affected() > 0)
}
