use chrono::{NaiveDate, Utc};
use shared_types::{AppError, LeaveRequest};
use sqlx::{Row, SqlitePool};

use super::attendance;
use crate::error_convert::SqlxErrorExt;

const SELECT_LEAVE: &str = r#"
    SELECT l.id, l.employee_id, e.name AS employee_name, l.leave_type, l.start_date,
           l.end_date, l.days, l.reason, l.status, l.reviewed_by, r.name AS reviewer_name,
           l.reviewed_at, l.review_note, l.created_at
    FROM leave_requests l
    JOIN users e ON e.id = l.employee_id
    LEFT JOIN users r ON r.id = l.reviewed_by
"#;

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> Result<Option<LeaveRequest>, AppError> {
    sqlx::query_as::<_, LeaveRequest>(&format!("{SELECT_LEAVE} WHERE l.id = ?"))
        .bind(id)
        .fetch_optional(pool)
        .await
        .map_err(SqlxErrorExt::into_app_error)
}

/// All requests, newest first.
pub async fn list(pool: &SqlitePool, status: Option<&str>) -> Result<Vec<LeaveRequest>, AppError> {
    sqlx::query_as::<_, LeaveRequest>(&format!(
        "{SELECT_LEAVE} WHERE (? IS NULL OR l.status = ?) ORDER BY l.start_date DESC, l.id DESC"
    ))
    .bind(status)
    .bind(status)
    .fetch_all(pool)
    .await
    .map_err(SqlxErrorExt::into_app_error)
}

/// Pending or approved requests of one employee that intersect `start..=end`.
pub async fn find_overlapping(
    pool: &SqlitePool,
    employee_id: i64,
    start: NaiveDate,
    end: NaiveDate,
) -> Result<Vec<LeaveRequest>, AppError> {
    sqlx::query_as::<_, LeaveRequest>(&format!(
        r#"{SELECT_LEAVE}
        WHERE l.employee_id = ? AND l.status IN ('pending', 'approved')
          AND l.start_date <= ? AND l.end_date >= ?"#
    ))
    .bind(employee_id)
    .bind(end)
    .bind(start)
    .fetch_all(pool)
    .await
    .map_err(SqlxErrorExt::into_app_error)
}

/// Requests whose range intersects `start..=end`.
pub async fn list_in_period(
    pool: &SqlitePool,
    start: NaiveDate,
    end: NaiveDate,
) -> Result<Vec<LeaveRequest>, AppError> {
    sqlx::query_as::<_, LeaveRequest>(&format!(
        "{SELECT_LEAVE} WHERE l.start_date <= ? AND l.end_date >= ? ORDER BY l.start_date"
    ))
    .bind(end)
    .bind(start)
    .fetch_all(pool)
    .await
    .map_err(SqlxErrorExt::into_app_error)
}

/// Approved annual days whose start falls inside `year_start..=year_end`.
pub async fn annual_days_used(
    pool: &SqlitePool,
    employee_id: i64,
    year_start: NaiveDate,
    year_end: NaiveDate,
) -> Result<i64, AppError> {
    sqlx::query_scalar::<_, i64>(
        r#"
        SELECT COALESCE(SUM(days), 0) FROM leave_requests
        WHERE employee_id = ? AND leave_type = 'annual' AND status = 'approved'
          AND start_date >= ? AND start_date <= ?
        "#,
    )
    .bind(employee_id)
    .bind(year_start)
    .bind(year_end)
    .fetch_one(pool)
    .await
    .map_err(SqlxErrorExt::into_app_error)
}

/// Annual days still awaiting review in the same window.
pub async fn annual_days_pending(
    pool: &SqlitePool,
    employee_id: i64,
    year_start: NaiveDate,
    year_end: NaiveDate,
) -> Result<i64, AppError> {
    sqlx::query_scalar::<_, i64>(
        r#"
        SELECT COALESCE(SUM(days), 0) FROM leave_requests
        WHERE employee_id = ? AND leave_type = 'annual' AND status = 'pending'
          AND start_date >= ? AND start_date <= ?
        "#,
    )
    .bind(employee_id)
    .bind(year_start)
    .bind(year_end)
    .fetch_one(pool)
    .await
    .map_err(SqlxErrorExt::into_app_error)
}

pub async fn create(
    pool: &SqlitePool,
    employee_id: i64,
    leave_type: &str,
    start: NaiveDate,
    end: NaiveDate,
    days: i64,
    reason: Option<&str>,
) -> Result<LeaveRequest, AppError> {
    let id = sqlx::query_scalar::<_, i64>(
        r#"
        INSERT INTO leave_requests (employee_id, leave_type, start_date, end_date, days,
                                    reason, status, created_at)
        VALUES (?, ?, ?, ?, ?, ?, 'pending', ?)
        RETURNING id
        "#,
    )
    .bind(employee_id)
    .bind(leave_type)
    .bind(start)
    .bind(end)
    .bind(days)
    .bind(reason.map(str::trim).filter(|r| !r.is_empty()))
    .bind(Utc::now())
    .fetch_one(pool)
    .await
    .map_err(SqlxErrorExt::into_app_error)?;

    find_by_id(pool, id)
        .await?
        .ok_or_else(|| AppError::internal("Created leave request could not be read back"))
}

/// Move a pending request to `status` and mark `leave_days` as on leave, in
/// one transaction. Returns None if it was no longer pending.
pub async fn review(
    pool: &SqlitePool,
    id: i64,
    status: &str,
    reviewer_id: i64,
    note: Option<&str>,
    leave_days: &[NaiveDate],
) -> Result<Option<LeaveRequest>, AppError> {
    let mut tx = pool.begin().await.map_err(SqlxErrorExt::into_app_error)?;
    let result = sqlx::query(
        r#"
        UPDATE leave_requests
        SET status = ?, reviewed_by = ?, reviewed_at = ?, review_note = ?
        WHERE id = ? AND status = 'pending'
        RETURNING employee_id
        "#,
    )
    .bind(status)
    .bind(reviewer_id)
    .bind(Utc::now())
    .bind(note.map(str::trim).filter(|n| !n.is_empty()))
    .bind(id)
    .fetch_optional(&mut *tx)
    .await
    .map_err(SqlxErrorExt::into_app_error)?;

    let Some(row) = result else {
        return Ok(None);
    };
    let employee_id: i64 = row.get("employee_id");
    attendance::mark_on_leave(&mut tx, employee_id, leave_days, reviewer_id).await?;
    tx.commit().await.map_err(SqlxErrorExt::into_app_error)?;

    find_by_id(pool, id).await
}

/// Cancel a pending request. Returns None if it was no longer pending.
pub async fn cancel(pool: &SqlitePool, id: i64) -> Result<Option<LeaveRequest>, AppError> {
    let result = sqlx::query(
        "UPDATE leave_requests SET status = 'cancelled' WHERE id = ? AND status = 'pending'",
    )
    .bind(id)
    .execute(pool)
    .await
    .map_err(SqlxErrorExt::into_app_error)?;

    if result.rows_affected() == 0 {
        return Ok(None);
    }
    find_by_id(pool, id).await
}
