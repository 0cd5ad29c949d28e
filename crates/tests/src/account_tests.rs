use axum::http::StatusCode;
use pretty_assertions::assert_eq;

use crate::common::{self, *};

#[tokio::test]
async fn test_profile_round_trip() {
    let (app, state) = common::test_app().await;
    let token = token_for(&state, EMPLOYEE).await;

    let (status, profile) = get_authed(&app, "/api/v1/profile", &token).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(profile["email"], EMPLOYEE);

    let body = serde_json::json!({ "name": "Sam J. Carter", "phone": "555-0199" });
    let (status, user) = put_json_authed(&app, "/api/v1/profile", &body.to_string(), &token).await;
    assert_eq!(status, StatusCode::OK, "{user}");
    assert_eq!(user["name"], "Sam J. Carter");
    assert_eq!(user["phone"], "555-0199");
}

#[tokio::test]
async fn test_placement_change_needs_admin() {
    let (app, state) = common::test_app().await;

    let token = token_for(&state, MANAGER).await;
    let body = serde_json::json!({ "name": "Jordan Patel", "department": "Finance" });
    let (status, _) = put_json_authed(&app, "/api/v1/profile", &body.to_string(), &token).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let token = token_for(&state, ADMIN).await;
    let body = serde_json::json!({ "name": "Alex Chen", "position": "Chief People Officer" });
    let (status, user) = put_json_authed(&app, "/api/v1/profile", &body.to_string(), &token).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(user["position"], "Chief People Officer");
}

#[tokio::test]
async fn test_change_password_rotates_sessions() {
    let (app, state) = common::test_app().await;
    let login = serde_json::json!({ "email": EMPLOYEE, "password": "password123" });
    let (status, session) = post_json(&app, "/api/v1/auth/login", &login.to_string()).await;
    assert_eq!(status, StatusCode::OK);
    let token = session["access_token"].as_str().unwrap();
    let old_refresh = session["refresh_token"].as_str().unwrap();

    let wrong = serde_json::json!({ "current_password": "nope", "new_password": "Brand-New-42" });
    let (status, _) =
        post_json_authed(&app, "/api/v1/profile/password", &wrong.to_string(), token).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let body =
        serde_json::json!({ "current_password": "password123", "new_password": "Brand-New-42" });
    let (status, renewed) =
        post_json_authed(&app, "/api/v1/profile/password", &body.to_string(), token).await;
    assert_eq!(status, StatusCode::OK, "{renewed}");
    assert!(renewed["refresh_token"].is_string());

    let refresh = serde_json::json!({ "refresh_token": old_refresh });
    let (status, _) = post_json(&app, "/api/v1/auth/refresh", &refresh.to_string()).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = post_json(&app, "/api/v1/auth/login", &login.to_string()).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    let login = serde_json::json!({ "email": EMPLOYEE, "password": "Brand-New-42" });
    let (status, _) = post_json(&app, "/api/v1/auth/login", &login.to_string()).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_change_password_ends_other_access_tokens() {
    let (app, state) = common::test_app().await;
    let other_device = token_for(&state, EMPLOYEE).await;
    let this_device = token_for(&state, EMPLOYEE).await;

    // Token issue times have one-second resolution.
    tokio::time::sleep(std::time::Duration::from_millis(1100)).await;

    let body =
        serde_json::json!({ "current_password": "password123", "new_password": "Brand-New-42" });
    let (status, renewed) =
        post_json_authed(&app, "/api/v1/profile/password", &body.to_string(), &this_device).await;
    assert_eq!(status, StatusCode::OK, "{renewed}");

    for stale in [&other_device, &this_device] {
        let (status, _) = get_authed(&app, "/api/v1/auth/me", stale).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }
    let fresh = renewed["access_token"].as_str().unwrap();
    let (status, me) = get_authed(&app, "/api/v1/auth/me", fresh).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(me["email"], EMPLOYEE);
}

#[tokio::test]
async fn test_settings_defaults_then_update() {
    let (app, state) = common::test_app().await;
    let token = token_for(&state, SUPERVISOR).await;

    let (status, settings) = get_authed(&app, "/api/v1/settings", &token).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(settings["theme"], "light");
    assert_eq!(settings["language"], "en");

    let body = serde_json::json!({
        "theme": "dark",
        "language": "fr",
        "timezone": "Europe/Paris",
        "email_notifications": false,
        "push_notifications": true,
        "weekly_digest": false
    });
    let (status, saved) = put_json_authed(&app, "/api/v1/settings", &body.to_string(), &token).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(saved["theme"], "dark");

    let (_, settings) = get_authed(&app, "/api/v1/settings", &token).await;
    assert_eq!(settings["language"], "fr");
    assert_eq!(settings["push_notifications"], true);
}

#[tokio::test]
async fn test_settings_reject_unknown_theme() {
    let (app, state) = common::test_app().await;
    let token = token_for(&state, EMPLOYEE).await;

    let body = serde_json::json!({
        "theme": "neon",
        "language": "en",
        "timezone": "UTC",
        "email_notifications": true,
        "push_notifications": false,
        "weekly_digest": true
    });
    let (status, err) = put_json_authed(&app, "/api/v1/settings", &body.to_string(), &token).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(err["field_errors"]["theme"].is_string());
}
