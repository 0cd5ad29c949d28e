use chrono::{DateTime, NaiveDate, Utc};
use shared_types::{AppError, CreateStaffRequest, Role, StaffMember, UpdateStaffRequest};
use sqlx::SqlitePool;

use crate::error_convert::SqlxErrorExt;

const SELECT_STAFF: &str = r#"
    SELECT u.id, u.name, u.email, u.phone, u.role, u.department, u.position,
           u.status, u.manager_id, m.name AS manager_name, u.joined_on,
           u.created_at, u.updated_at
    FROM users u
    LEFT JOIN users m ON m.id = u.manager_id
"#;

/// What login needs to know about an account.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Credentials {
    pub id: i64,
    pub password_hash: String,
    pub status: String,
}

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> Result<Option<StaffMember>, AppError> {
    sqlx::query_as::<_, StaffMember>(&format!("{SELECT_STAFF} WHERE u.id = ?"))
        .bind(id)
        .fetch_optional(pool)
        .await
        .map_err(SqlxErrorExt::into_app_error)
}

pub async fn find_credentials(
    pool: &SqlitePool,
    email: &str,
) -> Result<Option<Credentials>, AppError> {
    sqlx::query_as::<_, Credentials>(
        "SELECT id, password_hash, status FROM users WHERE email = ?",
    )
    .bind(email.trim())
    .fetch_optional(pool)
    .await
    .map_err(SqlxErrorExt::into_app_error)
}

pub async fn password_hash(pool: &SqlitePool, id: i64) -> Result<Option<String>, AppError> {
    sqlx::query_scalar::<_, String>("SELECT password_hash FROM users WHERE id = ?")
        .bind(id)
        .fetch_optional(pool)
        .await
        .map_err(SqlxErrorExt::into_app_error)
}

/// Everyone with `role`, ordered by name.
pub async fn list_by_role(
    pool: &SqlitePool,
    role: Role,
    status: Option<&str>,
) -> Result<Vec<StaffMember>, AppError> {
    sqlx::query_as::<_, StaffMember>(&format!(
        "{SELECT_STAFF} WHERE u.role = ? AND (? IS NULL OR u.status = ?) ORDER BY u.name COLLATE NOCASE"
    ))
    .bind(role.as_str())
    .bind(status)
    .bind(status)
    .fetch_all(pool)
    .await
    .map_err(SqlxErrorExt::into_app_error)
}

pub async fn list_all(pool: &SqlitePool) -> Result<Vec<StaffMember>, AppError> {
    sqlx::query_as::<_, StaffMember>(&format!("{SELECT_STAFF} ORDER BY u.name COLLATE NOCASE"))
        .fetch_all(pool)
        .await
        .map_err(SqlxErrorExt::into_app_error)
}

pub async fn count(pool: &SqlitePool) -> Result<i64, AppError> {
    sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM users")
        .fetch_one(pool)
        .await
        .map_err(SqlxErrorExt::into_app_error)
}

pub async fn create(
    pool: &SqlitePool,
    req: &CreateStaffRequest,
    password_hash: &str,
    joined_on: NaiveDate,
) -> Result<StaffMember, AppError> {
    let now = Utc::now();
    let id = sqlx::query_scalar::<_, i64>(
        r#"
        INSERT INTO users (name, email, phone, password_hash, role, department, position,
                           status, manager_id, joined_on, created_at, updated_at)
        VALUES (?, ?, ?, ?, ?, ?, ?, 'active', ?, ?, ?, ?)
        RETURNING id
        "#,
    )
    .bind(req.name.trim())
    .bind(req.email.trim().to_lowercase())
    .bind(req.phone.as_deref().map(str::trim).filter(|p| !p.is_empty()))
    .bind(password_hash)
    .bind(req.role.as_str())
    .bind(req.department.trim())
    .bind(req.position.trim())
    .bind(req.manager_id)
    .bind(joined_on)
    .bind(now)
    .bind(now)
    .fetch_one(pool)
    .await
    .map_err(SqlxErrorExt::into_app_error)?;

    find_by_id(pool, id)
        .await?
        .ok_or_else(|| AppError::internal("Created account could not be read back"))
}

/// Apply a partial update. Absent fields keep their value.
pub async fn update(
    pool: &SqlitePool,
    id: i64,
    req: &UpdateStaffRequest,
) -> Result<Option<StaffMember>, AppError> {
    let result = sqlx::query(
        r#"
        UPDATE users SET
            name       = COALESCE(?, name),
            email      = COALESCE(?, email),
            phone      = COALESCE(?, phone),
            role       = COALESCE(?, role),
            department = COALESCE(?, department),
            position   = COALESCE(?, position),
            manager_id = COALESCE(?, manager_id),
            updated_at = ?
        WHERE id = ?
        "#,
    )
    .bind(req.name.as_deref().map(str::trim))
    .bind(req.email.as_deref().map(|e| e.trim().to_lowercase()))
    .bind(req.phone.as_deref().map(str::trim))
    .bind(req.role.map(|r| r.as_str()))
    .bind(req.department.as_deref().map(str::trim))
    .bind(req.position.as_deref().map(str::trim))
    .bind(req.manager_id)
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

pub async fn set_status(
    pool: &SqlitePool,
    id: i64,
    status: &str,
) -> Result<Option<StaffMember>, AppError> {
    let result = sqlx::query("UPDATE users SET status = ?, updated_at = ? WHERE id = ?")
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

/// Self-service profile edit.
pub async fn update_profile(
    pool: &SqlitePool,
    id: i64,
    name: &str,
    phone: Option<&str>,
    department: Option<&str>,
    position: Option<&str>,
) -> Result<Option<StaffMember>, AppError> {
    let result = sqlx::query(
        r#"
        UPDATE users SET
            name       = ?,
            phone      = ?,
            department = COALESCE(?, department),
            position   = COALESCE(?, position),
            updated_at = ?
        WHERE id = ?
        "#,
    )
    .bind(name.trim())
    .bind(phone.map(str::trim).filter(|p| !p.is_empty()))
    .bind(department.map(str::trim))
    .bind(position.map(str::trim))
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

/// Store a new hash and stamp `password_changed_at`.
pub async fn set_password(pool: &SqlitePool, id: i64, password_hash: &str) -> Result<(), AppError> {
    let now = Utc::now();
    sqlx::query(
        "UPDATE users SET password_hash = ?, password_changed_at = ?, updated_at = ? WHERE id = ?",
    )
    .bind(password_hash)
    .bind(now)
    .bind(now)
    .bind(id)
    .execute(pool)
    .await
    .map_err(SqlxErrorExt::into_app_error)?;
    Ok(())
}

/// When the password was last changed, if ever.
pub async fn password_changed_at(
    pool: &SqlitePool,
    id: i64,
) -> Result<Option<DateTime<Utc>>, AppError> {
    sqlx::query_scalar::<_, Option<DateTime<Utc>>>(
        "SELECT password_changed_at FROM users WHERE id = ?",
    )
    .bind(id)
    .fetch_optional(pool)
    .await
    .map(Option::flatten)
    .map_err(SqlxErrorExt::into_app_error)
}

/// Returns true if a row was deleted. Owned records go with it (ON DELETE CASCADE).
pub async fn delete(pool: &SqlitePool, id: i64) -> Result<bool, AppError> {
    let result = sqlx::query("DELETE FROM users WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await
        .map_err(SqlxErrorExt::into_app_error)?;
    Ok(result.rows_affected() > 0)
}
