use dioxus::prelude::ServerFnError;
use shared_types::AppError;

/// Convert a sqlx::Error into an AppError.
pub fn sqlx_to_app_error(err: sqlx::Error) -> AppError {
    match &err {
        sqlx::Error::RowNotFound => AppError::not_found("Record not found"),
        sqlx::Error::Database(db_err) => {
            if db_err.is_unique_violation() {
                let detail = db_err.message();
                if detail.contains("users.email") {
                    let msg = "An account with this email already exists";
                    let mut conflict = AppError::conflict(msg);
                    conflict.field_errors.insert("email".into(), msg.into());
                    return conflict;
                }
                if detail.contains("attendance.user_id") {
                    return AppError::conflict("Attendance is already recorded for that day");
                }
                return AppError::conflict("A record with this value already exists");
            }
            if db_err.is_foreign_key_violation() {
                return AppError::bad_request("Referenced record does not exist");
            }
            if db_err.is_check_violation() {
                return AppError::bad_request("Value is not allowed");
            }
            tracing::error!(error = %err, "Database error");
            AppError::database("Database error")
        }
        _ => {
            tracing::error!(error = %err, "Database error");
            AppError::database("Database error")
        }
    }
}

/// Convert an AppError into a ServerFnError by serializing as JSON.
pub fn app_error_to_server_fn_error(err: AppError) -> ServerFnError {
    let json = serde_json::to_string(&err).unwrap_or_else(|_| err.message.clone());
    ServerFnError::new(json)
}

/// Extension trait providing `.into_app_error()` on sqlx::Error.
pub trait SqlxErrorExt {
    fn into_app_error(self) -> AppError;
}

impl SqlxErrorExt for sqlx::Error {
    fn into_app_error(self) -> AppError {
        sqlx_to_app_error(self)
    }
}

/// Extension trait providing `.into_server_fn_error()` on AppError.
pub trait AppErrorExt {
    fn into_server_fn_error(self) -> ServerFnError;
}

impl AppErrorExt for AppError {
    fn into_server_fn_error(self) -> ServerFnError {
        app_error_to_server_fn_error(self)
    }
}

/// Validate request DTOs before processing.
pub trait ValidateRequest {
    fn validate_request(&self) -> Result<(), AppError>;
}

impl<T: validator::Validate> ValidateRequest for T {
    fn validate_request(&self) -> Result<(), AppError> {
        self.validate().map_err(AppError::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared_types::AppErrorKind;

    #[test]
    fn row_not_found_maps_to_404() {
        let err = sqlx_to_app_error(sqlx::Error::RowNotFound);
        assert_eq!(err.kind, AppErrorKind::NotFound);
    }

    #[test]
    fn server_fn_error_round_trips_app_error() {
        let err = AppError::forbidden("Only managers can do that");
        let sfe = err.clone().into_server_fn_error();
        let parsed = AppError::from_server_error(&sfe.to_string()).unwrap();
        assert_eq!(parsed, err);
    }

    #[tokio::test]
    async fn unique_email_maps_to_conflict_with_field() {
        let pool = crate::db::connect_in_memory().await.unwrap();
        let insert = "INSERT INTO users (name, email, password_hash, role, department, position, joined_on, created_at, updated_at)
                      VALUES ('A', 'a@x.io', 'h', 'employee', 'Ops', 'Clerk', '2025-01-01', '2025-01-01T00:00:00Z', '2025-01-01T00:00:00Z')";
        sqlx::query(insert).execute(&pool).await.unwrap();
        let err = sqlx::query(insert).execute(&pool).await.unwrap_err().into_app_error();
        assert_eq!(err.kind, AppErrorKind::Conflict);
        assert!(err.field_errors.contains_key("email"));
    }
}
