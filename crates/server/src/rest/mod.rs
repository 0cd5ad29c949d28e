pub mod account;
pub mod attendance;
pub mod auth;
pub mod leave;
pub mod notification;
pub mod report;
pub mod staff;
pub mod task;

use axum::{
    middleware::from_fn_with_state,
    routing::{delete, get, patch, post},
    Router,
};

use crate::db::AppState;
use crate::rate_limit::login_rate_limit;

/// Build the REST API router under `/api/v1`.
///
/// `state` is needed up front for the login rate limiter.
pub fn api_router(state: AppState) -> Router<AppState> {
    let login = Router::new().route(
        "/api/v1/auth/login",
        post(auth::login).route_layer(from_fn_with_state(state, login_rate_limit)),
    );

    Router::new()
        .merge(login)
        // Auth
        .route("/api/v1/auth/refresh", post(auth::refresh))
        .route("/api/v1/auth/logout", post(auth::logout))
        .route("/api/v1/auth/me", get(auth::me))
        .route("/api/v1/auth/demo-accounts", get(auth::demo_accounts))
        // Directory
        .route("/api/v1/directory/{role}", get(staff::list_directory))
        .route("/api/v1/staff", post(staff::create_staff))
        .route(
            "/api/v1/staff/{id}",
            get(staff::get_staff)
                .put(staff::update_staff)
                .delete(staff::delete_staff),
        )
        .route("/api/v1/staff/{id}/toggle-status", post(staff::toggle_staff_status))
        // Tasks
        .route("/api/v1/tasks", get(task::list_tasks).post(task::create_task))
        .route(
            "/api/v1/tasks/{id}",
            get(task::get_task)
                .put(task::update_task)
                .delete(task::delete_task),
        )
        .route("/api/v1/tasks/{id}/status", patch(task::set_task_status))
        // Leave
        .route("/api/v1/leave", get(leave::list_leave).post(leave::create_leave))
        .route("/api/v1/leave/balance", get(leave::leave_balance))
        .route("/api/v1/leave/{id}", get(leave::get_leave))
        .route("/api/v1/leave/{id}/review", post(leave::review_leave))
        .route("/api/v1/leave/{id}/cancel", post(leave::cancel_leave))
        // Attendance
        .route(
            "/api/v1/attendance",
            get(attendance::list_attendance).put(attendance::mark_attendance),
        )
        .route("/api/v1/attendance/check-in", post(attendance::check_in))
        .route("/api/v1/attendance/check-out", post(attendance::check_out))
        .route("/api/v1/attendance/summary", get(attendance::attendance_summary))
        // Reports
        .route("/api/v1/reports", get(report::list_reports).post(report::create_report))
        .route(
            "/api/v1/reports/{id}",
            get(report::get_report).delete(report::delete_report),
        )
        .route("/api/v1/reports/{id}/retry", post(report::retry_report))
        // Notifications
        .route("/api/v1/notifications", get(notification::list_notifications))
        .route("/api/v1/notifications/unread-count", get(notification::unread_count))
        .route("/api/v1/notifications/read-all", post(notification::mark_all_read))
        .route("/api/v1/notifications/broadcast", post(notification::broadcast))
        .route("/api/v1/notifications/{id}", delete(notification::delete_notification))
        .route("/api/v1/notifications/{id}/read", post(notification::mark_read))
        // Account
        .route("/api/v1/dashboard", get(account::dashboard))
        .route("/api/v1/profile", get(account::get_profile).put(account::update_profile))
        .route("/api/v1/profile/password", post(account::change_password))
        .route("/api/v1/settings", get(account::get_settings).put(account::update_settings))
}
