use axum::http::StatusCode;

use crate::common::{self, *};

#[tokio::test]
async fn test_unauthenticated_requests_rejected() {
    let (app, _state) = common::test_app().await;

    for uri in [
        "/api/v1/dashboard",
        "/api/v1/tasks",
        "/api/v1/leave",
        "/api/v1/attendance",
        "/api/v1/reports",
        "/api/v1/notifications",
        "/api/v1/profile",
        "/api/v1/directory/employees",
    ] {
        let (status, _) = get_authed(&app, uri, "not-a-token").await;
        assert_eq!(status, StatusCode::UNAUTHORIZED, "{uri} should need auth");
    }
}

#[tokio::test]
async fn test_me_lists_sidebar_for_role() {
    let (app, state) = common::test_app().await;

    let token = token_for(&state, EMPLOYEE).await;
    let (status, body) = get_authed(&app, "/api/v1/auth/me", &token).await;
    assert_eq!(status, StatusCode::OK);
    let labels: Vec<&str> = body["nav"]
        .as_array()
        .unwrap()
        .iter()
        .filter_map(|n| n["label"].as_str())
        .collect();
    assert!(labels.contains(&"My Tasks"));
    assert!(!labels.contains(&"Reports"));
    assert!(!labels.contains(&"Employees"));
}

#[tokio::test]
async fn test_super_admin_has_no_operational_sections() {
    let (app, state) = common::test_app().await;
    let token = token_for(&state, SUPER_ADMIN).await;

    for uri in ["/api/v1/tasks", "/api/v1/leave", "/api/v1/attendance"] {
        let (status, _) = get_authed(&app, uri, &token).await;
        assert_eq!(status, StatusCode::FORBIDDEN, "{uri}");
    }
    let (status, _) = get_authed(&app, "/api/v1/directory/admins", &token).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_reports_limited_to_manager_and_above() {
    let (app, state) = common::test_app().await;

    for (email, expected) in [
        (SUPER_ADMIN, StatusCode::OK),
        (ADMIN, StatusCode::OK),
        (MANAGER, StatusCode::OK),
        (SUPERVISOR, StatusCode::FORBIDDEN),
        (EMPLOYEE, StatusCode::FORBIDDEN),
    ] {
        let token = token_for(&state, email).await;
        let (status, _) = get_authed(&app, "/api/v1/reports", &token).await;
        assert_eq!(status, expected, "{email}");
    }
}

#[tokio::test]
async fn test_dashboard_scoped_to_role() {
    let (app, state) = common::test_app().await;

    let token = token_for(&state, SUPERVISOR).await;
    let (status, body) = get_authed(&app, "/api/v1/dashboard", &token).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["role"], "supervisor");
    assert!(body["headcount"].get("manager").is_none());
    assert!(body["headcount"]["employee"].as_i64().unwrap() >= 1);

    let token = token_for(&state, SUPER_ADMIN).await;
    let (status, body) = get_authed(&app, "/api/v1/dashboard", &token).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["active_staff"], 11);
    assert_eq!(body["pending_approvals"], 0);
}
