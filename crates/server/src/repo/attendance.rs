use chrono::{NaiveDate, NaiveTime, Utc};
use shared_types::{AppError, AttendanceRecord};
use sqlx::{SqliteConnection, SqlitePool};

use crate::error_convert::SqlxErrorExt;

const SELECT_ATTENDANCE: &str = r#"
    SELECT a.id, a.user_id, u.name AS user_name, a.date, a.status, a.check_in,
           a.check_out, a.note, a.marked_by, a.updated_at
    FROM attendance a
    JOIN users u ON u.id = a.user_id
"#;

pub async fn find(
    pool: &SqlitePool,
    user_id: i64,
    date: NaiveDate,
) -> Result<Option<AttendanceRecord>, AppError> {
    sqlx::query_as::<_, AttendanceRecord>(&format!(
        "{SELECT_ATTENDANCE} WHERE a.user_id = ? AND a.date = ?"
    ))
    .bind(user_id)
    .bind(date)
    .fetch_optional(pool)
    .await
    .map_err(SqlxErrorExt::into_app_error)
}

/// Records filtered by date, person and status. Latest day first, then by name.
pub async fn list(
    pool: &SqlitePool,
    date: Option<NaiveDate>,
    user_id: Option<i64>,
    status: Option<&str>,
) -> Result<Vec<AttendanceRecord>, AppError> {
    sqlx::query_as::<_, AttendanceRecord>(&format!(
        r#"{SELECT_ATTENDANCE}
        WHERE (? IS NULL OR a.date = ?) AND (? IS NULL OR a.user_id = ?) AND (? IS NULL OR a.status = ?)
        ORDER BY a.date DESC, u.name COLLATE NOCASE"#
    ))
    .bind(date)
    .bind(date)
    .bind(user_id)
    .bind(user_id)
    .bind(status)
    .bind(status)
    .fetch_all(pool)
    .await
    .map_err(SqlxErrorExt::into_app_error)
}

pub async fn list_between(
    pool: &SqlitePool,
    start: NaiveDate,
    end: NaiveDate,
) -> Result<Vec<AttendanceRecord>, AppError> {
    sqlx::query_as::<_, AttendanceRecord>(&format!(
        "{SELECT_ATTENDANCE} WHERE a.date >= ? AND a.date <= ? ORDER BY a.date"
    ))
    .bind(start)
    .bind(end)
    .fetch_all(pool)
    .await
    .map_err(SqlxErrorExt::into_app_error)
}

/// Insert or replace the record for `(user_id, date)`.
#[allow(clippy::too_many_arguments)]
pub async fn upsert(
    pool: &SqlitePool,
    user_id: i64,
    date: NaiveDate,
    status: &str,
    check_in: Option<NaiveTime>,
    check_out: Option<NaiveTime>,
    note: Option<&str>,
    marked_by: i64,
) -> Result<AttendanceRecord, AppError> {
    sqlx::query(
        r#"
        INSERT INTO attendance (user_id, date, status, check_in, check_out, note, marked_by, updated_at)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?)
        ON CONFLICT (user_id, date) DO UPDATE SET
            status     = excluded.status,
            check_in   = excluded.check_in,
            check_out  = excluded.check_out,
            note       = excluded.note,
            marked_by  = excluded.marked_by,
            updated_at = excluded.updated_at
        "#,
    )
    .bind(user_id)
    .bind(date)
    .bind(status)
    .bind(check_in)
    .bind(check_out)
    .bind(note.map(str::trim).filter(|n| !n.is_empty()))
    .bind(marked_by)
    .bind(Utc::now())
    .execute(pool)
    .await
    .map_err(SqlxErrorExt::into_app_error)?;

    find(pool, user_id, date)
        .await?
        .ok_or_else(|| AppError::internal("Attendance record could not be read back"))
}

/// Insert a check-in. Fails with a conflict when the day already has a record.
pub async fn insert_check_in(
    pool: &SqlitePool,
    user_id: i64,
    date: NaiveDate,
    status: &str,
    at: NaiveTime,
) -> Result<AttendanceRecord, AppError> {
    sqlx::query(
        r#"
        INSERT INTO attendance (user_id, date, status, check_in, marked_by, updated_at)
        VALUES (?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(user_id)
    .bind(date)
    .bind(status)
    .bind(at)
    .bind(user_id)
    .bind(Utc::now())
    .execute(pool)
    .await
    .map_err(SqlxErrorExt::into_app_error)?;

    find(pool, user_id, date)
        .await?
        .ok_or_else(|| AppError::internal("Attendance record could not be read back"))
}

/// Set check-out once. Returns None when there is no open check-in.
pub async fn set_check_out(
    pool: &SqlitePool,
    user_id: i64,
    date: NaiveDate,
    at: NaiveTime,
) -> Result<Option<AttendanceRecord>, AppError> {
    let result = sqlx::query(
        r#"
        UPDATE attendance SET check_out = ?, updated_at = ?
        WHERE user_id = ? AND date = ? AND check_in IS NOT NULL AND check_out IS NULL
        "#,
    )
    .bind(at)
    .bind(Utc::now())
    .bind(user_id)
    .bind(date)
    .execute(pool)
    .await
    .map_err(SqlxErrorExt::into_app_error)?;

    if result.rows_affected() == 0 {
        return Ok(None);
    }
    find(pool, user_id, date).await
}

/// Mark every date in `dates` as `on_leave` for `user_id`, on the caller's
/// connection or transaction.
pub async fn mark_on_leave(
    conn: &mut SqliteConnection,
    user_id: i64,
    dates: &[NaiveDate],
    marked_by: i64,
) -> Result<(), AppError> {
    let now = Utc::now();
    for date in dates {
        sqlx::query(
            r#"
            INSERT INTO attendance (user_id, date, status, note, marked_by, updated_at)
            VALUES (?, ?, 'on_leave', 'Approved leave', ?, ?)
            ON CONFLICT (user_id, date) DO UPDATE SET
                status = 'on_leave', check_in = NULL, check_out = NULL,
                note = excluded.note, marked_by = excluded.marked_by,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(user_id)
        .bind(date)
        .bind(marked_by)
        .bind(now)
        .execute(&mut *conn)
        .await
        .map_err(SqlxErrorExt::into_app_error)?;
    }
    Ok(())
}
