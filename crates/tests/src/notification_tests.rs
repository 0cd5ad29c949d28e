use axum::http::StatusCode;
use pretty_assertions::assert_eq;

use crate::common::{self, *};

#[tokio::test]
async fn test_list_newest_first_and_unread_filter() {
    let (app, state) = common::test_app().await;
    let token = token_for(&state, EMPLOYEE).await;

    let (status, list) = get_authed(&app, "/api/v1/notifications", &token).await;
    assert_eq!(status, StatusCode::OK);
    let items = list.as_array().unwrap();
    assert_eq!(items.len(), 2);
    assert_eq!(items[0]["title"], "Task overdue");

    let first = items[0]["id"].as_i64().unwrap();
    let (status, body) =
        post_authed(&app, &format!("/api/v1/notifications/{first}/read"), &token).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["read"], true);

    let (_, unread_list) = get_authed(&app, "/api/v1/notifications?unread_only=true", &token).await;
    assert_eq!(ids(&unread_list).len(), 1);
    assert!(!ids(&unread_list).contains(&first));
}

#[tokio::test]
async fn test_mark_all_read() {
    let (app, state) = common::test_app().await;
    let token = token_for(&state, EMPLOYEE).await;
    assert_eq!(unread(&app, &token).await, 2);

    let (status, body) = post_authed(&app, "/api/v1/notifications/read-all", &token).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["message"].as_str().unwrap().contains('2'));
    assert_eq!(unread(&app, &token).await, 0);
}

#[tokio::test]
async fn test_other_users_notifications_are_invisible() {
    let (app, state) = common::test_app().await;
    let owner = token_for(&state, EMPLOYEE).await;
    let (_, list) = get_authed(&app, "/api/v1/notifications", &owner).await;
    let id = ids(&list)[0];

    let admin = token_for(&state, ADMIN).await;
    let (status, _) = post_authed(&app, &format!("/api/v1/notifications/{id}/read"), &admin).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, _) = delete_authed(&app, &format!("/api/v1/notifications/{id}"), &admin).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = delete_authed(&app, &format!("/api/v1/notifications/{id}"), &owner).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert_eq!(unread(&app, &owner).await, 1);
}

#[tokio::test]
async fn test_broadcast_to_lower_tiers() {
    let (app, state) = common::test_app().await;
    let admin = token_for(&state, ADMIN).await;
    let employee = token_for(&state, EMPLOYEE).await;
    let before = unread(&app, &employee).await;

    let body = serde_json::json!({
        "title": "Fire drill",
        "message": "Friday at 10:00",
        "kind": "warning",
        "roles": ["employee"]
    });
    let (status, sent) =
        post_json_authed(&app, "/api/v1/notifications/broadcast", &body.to_string(), &admin).await;
    assert_eq!(status, StatusCode::OK, "{sent}");
    assert_eq!(sent["recipients"], 4);
    assert_eq!(unread(&app, &employee).await, before + 1);
}

#[tokio::test]
async fn test_broadcast_default_reaches_every_lower_tier() {
    let (app, state) = common::test_app().await;
    let super_admin = token_for(&state, SUPER_ADMIN).await;

    let body = serde_json::json!({ "title": "Welcome", "message": "New quarter" });
    let (status, sent) =
        post_json_authed(&app, "/api/v1/notifications/broadcast", &body.to_string(), &super_admin).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(sent["recipients"], 10);
}

#[tokio::test]
async fn test_broadcast_limits() {
    let (app, state) = common::test_app().await;

    let manager = token_for(&state, MANAGER).await;
    let body = serde_json::json!({ "title": "Hi", "message": "All hands" });
    let (status, _) =
        post_json_authed(&app, "/api/v1/notifications/broadcast", &body.to_string(), &manager).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let admin = token_for(&state, ADMIN).await;
    let body = serde_json::json!({ "title": "Hi", "message": "Peers", "roles": ["admin"] });
    let (status, _) =
        post_json_authed(&app, "/api/v1/notifications/broadcast", &body.to_string(), &admin).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}
