use axum::http::StatusCode;
use pretty_assertions::assert_eq;

use crate::common::{self, *};

async fn assign(app: &axum::Router, token: &str, assignee: i64, title: &str) -> i64 {
    let body = serde_json::json!({
        "title": title,
        "assignee_id": assignee,
        "priority": "high",
        "due_date": "2031-06-30"
    });
    let (status, task) = post_json_authed(app, "/api/v1/tasks", &body.to_string(), token).await;
    assert_eq!(status, StatusCode::CREATED, "{task}");
    task["id"].as_i64().unwrap()
}

#[tokio::test]
async fn test_personal_task_defaults() {
    let (app, state) = common::test_app().await;
    let token = token_for(&state, EMPLOYEE).await;

    let (status, task) =
        post_json_authed(&app, "/api/v1/tasks", r#"{"title": "Renew badge"}"#, &token).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(task["assignee_id"], user_id(&state, EMPLOYEE).await);
    assert_eq!(task["priority"], "medium");
    assert_eq!(task["status"], "pending");
}

#[tokio::test]
async fn test_assign_down_notifies_assignee() {
    let (app, state) = common::test_app().await;
    let supervisor = token_for(&state, SUPERVISOR).await;
    let employee = token_for(&state, EMPLOYEE).await;
    let before = unread(&app, &employee).await;

    assign(&app, &supervisor, user_id(&state, EMPLOYEE).await, "Restock bay 2").await;

    assert_eq!(unread(&app, &employee).await, before + 1);
}

#[tokio::test]
async fn test_cannot_assign_upwards_or_sideways() {
    let (app, state) = common::test_app().await;
    let token = token_for(&state, EMPLOYEE).await;

    for target in [SUPERVISOR, OTHER_EMPLOYEE] {
        let body = serde_json::json!({
            "title": "Cover my shift",
            "assignee_id": user_id(&state, target).await
        });
        let (status, _) = post_json_authed(&app, "/api/v1/tasks", &body.to_string(), &token).await;
        assert_eq!(status, StatusCode::FORBIDDEN, "{target}");
    }
}

#[tokio::test]
async fn test_invalid_priority_rejected() {
    let (app, state) = common::test_app().await;
    let token = token_for(&state, EMPLOYEE).await;

    let (status, body) = post_json_authed(
        &app,
        "/api/v1/tasks",
        r#"{"title": "Urgent", "priority": "critical"}"#,
        &token,
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body["field_errors"]["priority"].is_string());
}

#[tokio::test]
async fn test_task_visibility_follows_rank() {
    let (app, state) = common::test_app().await;
    let supervisor = token_for(&state, SUPERVISOR).await;
    let id = assign(&app, &supervisor, user_id(&state, EMPLOYEE).await, "Label pallets").await;
    let uri = format!("/api/v1/tasks/{id}");

    for email in [SUPERVISOR, EMPLOYEE, MANAGER, ADMIN] {
        let token = token_for(&state, email).await;
        let (status, _) = get_authed(&app, &uri, &token).await;
        assert_eq!(status, StatusCode::OK, "{email} should see the task");
    }

    let peer = token_for(&state, OTHER_EMPLOYEE).await;
    let (status, _) = get_authed(&app, &uri, &peer).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, list) = get_authed(&app, "/api/v1/tasks", &peer).await;
    assert_eq!(status, StatusCode::OK);
    assert!(!ids(&list).contains(&id));
}

#[tokio::test]
async fn test_list_filters_by_status() {
    let (app, state) = common::test_app().await;
    let token = token_for(&state, MANAGER).await;

    let (status, list) = get_authed(&app, "/api/v1/tasks?status=completed", &token).await;
    assert_eq!(status, StatusCode::OK);
    let tasks = list.as_array().unwrap();
    assert!(!tasks.is_empty());
    assert!(tasks.iter().all(|t| t["status"] == "completed"));

    let (status, _) = get_authed(&app, "/api/v1/tasks?status=blocked", &token).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_assignee_changes_status_only() {
    let (app, state) = common::test_app().await;
    let supervisor = token_for(&state, SUPERVISOR).await;
    let employee = token_for(&state, EMPLOYEE).await;
    let id = assign(&app, &supervisor, user_id(&state, EMPLOYEE).await, "Sweep dock").await;

    let (status, _) = put_json_authed(
        &app,
        &format!("/api/v1/tasks/{id}"),
        r#"{"title": "Skip sweeping"}"#,
        &employee,
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, task) = patch_json_authed(
        &app,
        &format!("/api/v1/tasks/{id}/status"),
        r#"{"status": "in_progress"}"#,
        &employee,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(task["status"], "in_progress");

    let (status, _) = delete_authed(&app, &format!("/api/v1/tasks/{id}"), &employee).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_completion_notifies_assigner() {
    let (app, state) = common::test_app().await;
    let supervisor = token_for(&state, SUPERVISOR).await;
    let employee = token_for(&state, EMPLOYEE).await;
    let id = assign(&app, &supervisor, user_id(&state, EMPLOYEE).await, "Inventory check").await;
    let before = unread(&app, &supervisor).await;

    let (status, _) = patch_json_authed(
        &app,
        &format!("/api/v1/tasks/{id}/status"),
        r#"{"status": "completed"}"#,
        &employee,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(unread(&app, &supervisor).await, before + 1);

    // Completing again does not notify twice.
    patch_json_authed(
        &app,
        &format!("/api/v1/tasks/{id}/status"),
        r#"{"status": "completed"}"#,
        &employee,
    )
    .await;
    assert_eq!(unread(&app, &supervisor).await, before + 1);
}

#[tokio::test]
async fn test_invalid_status_value_rejected() {
    let (app, state) = common::test_app().await;
    let token = token_for(&state, EMPLOYEE).await;
    let (_, task) =
        post_json_authed(&app, "/api/v1/tasks", r#"{"title": "Mine"}"#, &token).await;
    let id = task["id"].as_i64().unwrap();

    let (status, _) = patch_json_authed(
        &app,
        &format!("/api/v1/tasks/{id}/status"),
        r#"{"status": "done"}"#,
        &token,
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_superior_edits_and_deletes() {
    let (app, state) = common::test_app().await;
    let supervisor = token_for(&state, SUPERVISOR).await;
    let manager = token_for(&state, MANAGER).await;
    let id = assign(&app, &supervisor, user_id(&state, EMPLOYEE).await, "Wrap pallets").await;

    let (status, task) = put_json_authed(
        &app,
        &format!("/api/v1/tasks/{id}"),
        r#"{"priority": "low", "description": "When the truck has left"}"#,
        &manager,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(task["priority"], "low");
    assert_eq!(task["description"], "When the truck has left");

    let (status, _) = delete_authed(&app, &format!("/api/v1/tasks/{id}"), &manager).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (status, _) = get_authed(&app, &format!("/api/v1/tasks/{id}"), &manager).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
