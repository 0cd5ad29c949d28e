use axum::Router;
use shared_types::{
    AppError, AppErrorKind, AttendanceRecord, AttendanceSummary, AuthResponse, AuthUser,
    BroadcastRequest, BroadcastResponse, ChangePasswordRequest, CreateLeaveRequest,
    CreateReportRequest, CreateStaffRequest, CreateTaskRequest, DashboardStats, DemoAccount,
    LeaveBalance, LeaveRequest, LoginRequest, MarkAttendanceRequest, MessageResponse,
    Notification, RefreshRequest, Report, ReviewLeaveRequest, Role, SetTaskStatusRequest,
    StaffMember, Task, UnreadCount, UpdateProfileRequest, UpdateSettingsRequest,
    UpdateStaffRequest, UpdateTaskRequest, UserSettings,
};
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};
use utoipa_scalar::{Scalar, Servable};

use crate::db::AppState;
use crate::health;
use crate::rest;

/// Registers the `bearer_auth` scheme referenced by protected paths.
struct BearerAuth;

impl Modify for BearerAuth {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

/// OpenAPI documentation for the API.
#[derive(OpenApi)]
#[openapi(
    paths(
        // Auth
        rest::auth::login,
        rest::auth::refresh,
        rest::auth::logout,
        rest::auth::me,
        rest::auth::demo_accounts,
        // Directory
        rest::staff::list_directory,
        rest::staff::create_staff,
        rest::staff::get_staff,
        rest::staff::update_staff,
        rest::staff::toggle_staff_status,
        rest::staff::delete_staff,
        // Tasks
        rest::task::list_tasks,
        rest::task::create_task,
        rest::task::get_task,
        rest::task::update_task,
        rest::task::set_task_status,
        rest::task::delete_task,
        // Leave
        rest::leave::list_leave,
        rest::leave::create_leave,
        rest::leave::leave_balance,
        rest::leave::get_leave,
        rest::leave::review_leave,
        rest::leave::cancel_leave,
        // Attendance
        rest::attendance::list_attendance,
        rest::attendance::mark_attendance,
        rest::attendance::check_in,
        rest::attendance::check_out,
        rest::attendance::attendance_summary,
        // Reports
        rest::report::list_reports,
        rest::report::create_report,
        rest::report::get_report,
        rest::report::retry_report,
        rest::report::delete_report,
        // Notifications
        rest::notification::list_notifications,
        rest::notification::unread_count,
        rest::notification::mark_read,
        rest::notification::mark_all_read,
        rest::notification::delete_notification,
        rest::notification::broadcast,
        // Account
        rest::account::dashboard,
        rest::account::get_profile,
        rest::account::update_profile,
        rest::account::change_password,
        rest::account::get_settings,
        rest::account::update_settings,
        // Health
        health::health_check,
    ),
    components(schemas(
        AppError, AppErrorKind, MessageResponse, Role,
        // Auth schemas
        LoginRequest, RefreshRequest, AuthResponse, AuthUser, DemoAccount,
        // Directory schemas
        StaffMember, CreateStaffRequest, UpdateStaffRequest,
        // Task schemas
        Task, CreateTaskRequest, UpdateTaskRequest, SetTaskStatusRequest,
        // Leave schemas
        LeaveRequest, CreateLeaveRequest, ReviewLeaveRequest, LeaveBalance,
        // Attendance schemas
        AttendanceRecord, MarkAttendanceRequest, AttendanceSummary,
        // Report schemas
        Report, CreateReportRequest,
        // Notification schemas
        Notification, BroadcastRequest, BroadcastResponse, UnreadCount,
        // Account schemas
        DashboardStats, UpdateProfileRequest, ChangePasswordRequest,
        UserSettings, UpdateSettingsRequest,
        health::HealthResponse,
    )),
    modifiers(&BearerAuth),
    tags(
        (name = "auth", description = "Sign-in, token refresh and sign-out"),
        (name = "directory", description = "People in each role tier"),
        (name = "tasks", description = "Personal and assigned tasks"),
        (name = "leave", description = "Leave requests and approvals"),
        (name = "attendance", description = "Daily attendance records"),
        (name = "reports", description = "Background report generation"),
        (name = "notifications", description = "In-app notifications and broadcasts"),
        (name = "account", description = "Dashboard, profile and preferences"),
        (name = "health", description = "Health check endpoint")
    ),
    info(
        title = "StaffDesk API",
        description = "HR and operations administration for a five-tier organisation",
        version = "1.0.0"
    )
)]
pub struct ApiDoc;

/// Serve the REST API under `/api/v1`, the health probe, and the API docs
/// at `/docs`.
pub fn api_router(state: AppState) -> Router {
    Router::new()
        .merge(rest::api_router(state.clone()))
        .route("/health", axum::routing::get(health::health_check))
        .with_state(state)
        .merge(Scalar::with_url("/docs", ApiDoc::openapi()))
}
