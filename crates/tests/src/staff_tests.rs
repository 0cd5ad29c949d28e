use axum::http::StatusCode;
use pretty_assertions::assert_eq;

use crate::common::{self, *};

fn new_staff(email: &str, role: &str) -> String {
    serde_json::json!({
        "name": "Robin Hale",
        "email": email,
        "role": role,
        "department": "Logistics",
        "position": "Coordinator",
        "password": "Welcome-2025"
    })
    .to_string()
}

#[tokio::test]
async fn test_directory_lists_one_tier() {
    let (app, state) = common::test_app().await;
    let token = token_for(&state, MANAGER).await;

    let (status, body) = get_authed(&app, "/api/v1/directory/employees", &token).await;
    assert_eq!(status, StatusCode::OK);
    let people = body.as_array().unwrap();
    assert_eq!(people.len(), 4);
    assert!(people.iter().all(|p| p["role"] == "employee"));
}

#[tokio::test]
async fn test_directory_accepts_role_name() {
    let (app, state) = common::test_app().await;
    let token = token_for(&state, ADMIN).await;

    let (status, body) = get_authed(&app, "/api/v1/directory/supervisor", &token).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_directory_search_filters_by_text() {
    let (app, state) = common::test_app().await;
    let token = token_for(&state, ADMIN).await;

    let (status, body) = get_authed(&app, "/api/v1/directory/employees?q=sales", &token).await;
    assert_eq!(status, StatusCode::OK);
    let names: Vec<&str> = body
        .as_array()
        .unwrap()
        .iter()
        .filter_map(|p| p["name"].as_str())
        .collect();
    assert_eq!(names.len(), 2, "Sales employees only, got {names:?}");
    assert!(names.contains(&"Avery Johnson"));
}

#[tokio::test]
async fn test_directory_rejects_unknown_status_filter() {
    let (app, state) = common::test_app().await;
    let token = token_for(&state, ADMIN).await;

    let (status, _) = get_authed(&app, "/api/v1/directory/employees?status=retired", &token).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_directory_hidden_from_peers_and_below() {
    let (app, state) = common::test_app().await;
    let token = token_for(&state, SUPERVISOR).await;

    let (status, _) = get_authed(&app, "/api/v1/directory/managers", &token).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    let (status, _) = get_authed(&app, "/api/v1/directory/supervisors", &token).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_create_staff_below_own_tier() {
    let (app, state) = common::test_app().await;
    let token = token_for(&state, ADMIN).await;

    let (status, body) = post_json_authed(
        &app,
        "/api/v1/staff",
        &new_staff("robin.hale@staffdesk.test", "manager"),
        &token,
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    assert_eq!(body["role"], "manager");
    assert_eq!(body["status"], "active");
    assert!(body.get("password").is_none());
    assert!(body.get("password_hash").is_none());
}

#[tokio::test]
async fn test_create_staff_at_own_tier_forbidden() {
    let (app, state) = common::test_app().await;
    let token = token_for(&state, MANAGER).await;

    let (status, _) = post_json_authed(
        &app,
        "/api/v1/staff",
        &new_staff("peer@staffdesk.test", "manager"),
        &token,
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_create_staff_duplicate_email_conflicts() {
    let (app, state) = common::test_app().await;
    let token = token_for(&state, ADMIN).await;

    let (status, body) =
        post_json_authed(&app, "/api/v1/staff", &new_staff(EMPLOYEE, "employee"), &token).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert!(body["field_errors"]["email"].is_string());
}

#[tokio::test]
async fn test_create_staff_short_password_rejected() {
    let (app, state) = common::test_app().await;
    let token = token_for(&state, ADMIN).await;

    let body = serde_json::json!({
        "name": "Short Pass",
        "email": "short@staffdesk.test",
        "role": "employee",
        "department": "Ops",
        "position": "Picker",
        "password": "abc"
    });
    let (status, body) = post_json_authed(&app, "/api/v1/staff", &body.to_string(), &token).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body["field_errors"]["password"].is_string());
}

#[tokio::test]
async fn test_manager_must_outrank_report() {
    let (app, state) = common::test_app().await;
    let token = token_for(&state, ADMIN).await;
    let supervisor = user_id(&state, SUPERVISOR).await;

    let mut body: serde_json::Value =
        serde_json::from_str(&new_staff("new.manager@staffdesk.test", "manager")).unwrap();
    body["manager_id"] = supervisor.into();
    let (status, body) = post_json_authed(&app, "/api/v1/staff", &body.to_string(), &token).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body["field_errors"]["manager_id"].is_string());
}

#[tokio::test]
async fn test_get_staff_self_and_subordinates_only() {
    let (app, state) = common::test_app().await;
    let token = token_for(&state, SUPERVISOR).await;

    let me = user_id(&state, SUPERVISOR).await;
    let (status, _) = get_authed(&app, &format!("/api/v1/staff/{me}"), &token).await;
    assert_eq!(status, StatusCode::OK);

    let employee = user_id(&state, EMPLOYEE).await;
    let (status, body) = get_authed(&app, &format!("/api/v1/staff/{employee}"), &token).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["email"], EMPLOYEE);

    // Superiors look the same as ids that do not exist.
    let boss = user_id(&state, MANAGER).await;
    let (status, _) = get_authed(&app, &format!("/api/v1/staff/{boss}"), &token).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = get_authed(&app, "/api/v1/staff/9999", &token).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_update_staff_promotion_capped_below_actor() {
    let (app, state) = common::test_app().await;
    let token = token_for(&state, MANAGER).await;
    let employee = user_id(&state, EMPLOYEE).await;

    let (status, body) = put_json_authed(
        &app,
        &format!("/api/v1/staff/{employee}"),
        r#"{"position": "Senior Associate"}"#,
        &token,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["position"], "Senior Associate");

    let (status, _) = put_json_authed(
        &app,
        &format!("/api/v1/staff/{employee}"),
        r#"{"role": "manager"}"#,
        &token,
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_toggle_status_blocks_login_and_flips_back() {
    let (app, state) = common::test_app().await;
    let token = token_for(&state, SUPERVISOR).await;
    let employee = user_id(&state, EMPLOYEE).await;
    let uri = format!("/api/v1/staff/{employee}/toggle-status");

    let (status, body) = post_authed(&app, &uri, &token).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "inactive");

    let login = serde_json::json!({ "email": EMPLOYEE, "password": "password123" });
    let (status, _) = post_json(&app, "/api/v1/auth/login", &login.to_string()).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = post_authed(&app, &uri, &token).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "active");
}

#[tokio::test]
async fn test_deactivated_user_token_stops_working() {
    let (app, state) = common::test_app().await;
    let employee_token = token_for(&state, EMPLOYEE).await;
    let employee = user_id(&state, EMPLOYEE).await;

    let (status, _) = get_authed(&app, "/api/v1/auth/me", &employee_token).await;
    assert_eq!(status, StatusCode::OK);

    let token = token_for(&state, MANAGER).await;
    post_authed(&app, &format!("/api/v1/staff/{employee}/toggle-status"), &token).await;

    let (status, _) = get_authed(&app, "/api/v1/auth/me", &employee_token).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_cannot_toggle_or_delete_self() {
    let (app, state) = common::test_app().await;
    let token = token_for(&state, ADMIN).await;
    let me = user_id(&state, ADMIN).await;

    let (status, _) = post_authed(&app, &format!("/api/v1/staff/{me}/toggle-status"), &token).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let (status, _) = delete_authed(&app, &format!("/api/v1/staff/{me}"), &token).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_delete_staff() {
    let (app, state) = common::test_app().await;
    let token = token_for(&state, MANAGER).await;
    let employee = user_id(&state, OTHER_EMPLOYEE).await;

    let (status, _) = delete_authed(&app, &format!("/api/v1/staff/{employee}"), &token).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = get_authed(&app, &format!("/api/v1/staff/{employee}"), &token).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

async fn count_for(state: &server::db::AppState, sql: &str, id: i64) -> i64 {
    sqlx::query_scalar(sql)
        .bind(id)
        .fetch_one(&state.pool)
        .await
        .unwrap()
}

#[tokio::test]
async fn test_delete_staff_removes_owned_records() {
    let (app, state) = common::test_app().await;
    let token = token_for(&state, MANAGER).await;
    let leaver = user_id(&state, OTHER_EMPLOYEE).await;
    let colleague = user_id(&state, EMPLOYEE).await;
    let now = chrono::Utc::now();

    sqlx::query(
        "INSERT INTO tasks (title, assignee_id, assigned_by, created_at, updated_at) \
         VALUES ('Owned', ?1, ?2, ?3, ?3), ('Handed over', ?2, ?1, ?3, ?3)",
    )
    .bind(leaver)
    .bind(colleague)
    .bind(now)
    .execute(&state.pool)
    .await
    .unwrap();
    sqlx::query(
        "INSERT INTO leave_requests \
         (employee_id, leave_type, start_date, end_date, days, created_at) \
         VALUES (?, 'sick', '2031-03-03', '2031-03-03', 1, ?)",
    )
    .bind(leaver)
    .bind(now)
    .execute(&state.pool)
    .await
    .unwrap();
    sqlx::query(
        "INSERT INTO attendance (user_id, date, status, updated_at) \
         VALUES (?, '2031-03-03', 'present', ?)",
    )
    .bind(leaver)
    .bind(now)
    .execute(&state.pool)
    .await
    .unwrap();
    server::repo::notification::create(&state.pool, leaver, "Hello", "Welcome aboard", "info")
        .await
        .unwrap();

    let owned = [
        "SELECT COUNT(*) FROM tasks WHERE assignee_id = ?",
        "SELECT COUNT(*) FROM leave_requests WHERE employee_id = ?",
        "SELECT COUNT(*) FROM attendance WHERE user_id = ?",
        "SELECT COUNT(*) FROM notifications WHERE recipient_id = ?",
    ];
    for sql in owned {
        assert!(count_for(&state, sql, leaver).await > 0, "{sql}");
    }

    let (status, _) = delete_authed(&app, &format!("/api/v1/staff/{leaver}"), &token).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    for sql in owned {
        assert_eq!(count_for(&state, sql, leaver).await, 0, "{sql}");
    }
    let handed_over: Option<i64> =
        sqlx::query_scalar("SELECT assigned_by FROM tasks WHERE title = 'Handed over'")
            .fetch_one(&state.pool)
            .await
            .unwrap();
    assert_eq!(handed_over, None);
    let (status, tasks) =
        get_authed(&app, &format!("/api/v1/tasks?assignee_id={colleague}"), &token).await;
    assert_eq!(status, StatusCode::OK);
    assert!(tasks.as_array().unwrap().iter().any(|t| t["title"] == "Handed over"));
}

#[tokio::test]
async fn test_superior_hidden_from_edit_and_delete() {
    let (app, state) = common::test_app().await;
    let token = token_for(&state, SUPERVISOR).await;
    let boss = user_id(&state, MANAGER).await;

    let (status, _) = delete_authed(&app, &format!("/api/v1/staff/{boss}"), &token).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, _) = put_json_authed(
        &app,
        &format!("/api/v1/staff/{boss}"),
        r#"{"position": "Intern"}"#,
        &token,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, _) =
        post_authed(&app, &format!("/api/v1/staff/{boss}/toggle-status"), &token).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
