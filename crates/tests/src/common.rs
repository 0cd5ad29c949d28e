use axum::{
    body::Body,
    http::{Request, StatusCode},
    middleware, Router,
};
use serde_json::Value;
use server::db::AppState;
use shared_types::AppConfig;
use tower::ServiceExt;

pub const SUPER_ADMIN: &str = "superadmin@staffdesk.test";
pub const ADMIN: &str = "admin@staffdesk.test";
pub const MANAGER: &str = "manager@staffdesk.test";
pub const SUPERVISOR: &str = "supervisor@staffdesk.test";
pub const EMPLOYEE: &str = "employee@staffdesk.test";
/// Employee in the same tier as `EMPLOYEE`.
pub const OTHER_EMPLOYEE: &str = "drew.kim@staffdesk.test";

/// Build a test router over a fresh in-memory database holding the demo
/// organisation. Each call gets its own database, so tests run in parallel.
pub async fn test_app() -> (Router, AppState) {
    let mut config = AppConfig::default();
    config.reports.generation_delay_ms = 0;
    test_app_with_config(config).await
}

pub async fn test_app_with_config(config: AppConfig) -> (Router, AppState) {
    let pool = server::db::connect_in_memory()
        .await
        .expect("Failed to open in-memory database");
    server::seed::seed_if_empty(&pool, &config)
        .await
        .expect("Failed to seed demo organisation");

    let state = AppState::new(pool, config);
    let router = server::openapi::api_router(state.clone()).layer(middleware::from_fn_with_state(
        state.clone(),
        server::auth::middleware::auth_middleware,
    ));

    (router, state)
}

/// Id of the seeded account with `email`.
pub async fn user_id(state: &AppState, email: &str) -> i64 {
    sqlx::query_scalar::<_, i64>("SELECT id FROM users WHERE email = ?")
        .bind(email)
        .fetch_one(&state.pool)
        .await
        .expect("Seeded user not found")
}

/// Access token for a seeded account, minted directly so tests skip the
/// password hash.
pub async fn token_for(state: &AppState, email: &str) -> String {
    let id = user_id(state, email).await;
    let member = server::repo::staff::find_by_id(&state.pool, id)
        .await
        .expect("Failed to load user")
        .expect("Seeded user missing");
    server::auth::jwt::create_access_token(member.id, &member.email, member.role)
        .expect("Failed to create test JWT")
}

fn authed(method: &str, uri: &str, token: &str) -> axum::http::request::Builder {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("authorization", format!("Bearer {token}"))
}

/// GET with a JWT Bearer token.
pub async fn get_authed(app: &Router, uri: &str, token: &str) -> (StatusCode, Value) {
    let req = authed("GET", uri, token).body(Body::empty()).unwrap();
    send(app, req).await
}

/// POST JSON with a JWT Bearer token.
pub async fn post_json_authed(
    app: &Router,
    uri: &str,
    body: &str,
    token: &str,
) -> (StatusCode, Value) {
    let req = authed("POST", uri, token)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    send(app, req).await
}

/// POST without a body.
pub async fn post_authed(app: &Router, uri: &str, token: &str) -> (StatusCode, Value) {
    let req = authed("POST", uri, token).body(Body::empty()).unwrap();
    send(app, req).await
}

/// PUT JSON with a JWT Bearer token.
pub async fn put_json_authed(
    app: &Router,
    uri: &str,
    body: &str,
    token: &str,
) -> (StatusCode, Value) {
    let req = authed("PUT", uri, token)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    send(app, req).await
}

/// PATCH JSON with a JWT Bearer token.
pub async fn patch_json_authed(
    app: &Router,
    uri: &str,
    body: &str,
    token: &str,
) -> (StatusCode, Value) {
    let req = authed("PATCH", uri, token)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    send(app, req).await
}

/// DELETE with a JWT Bearer token.
pub async fn delete_authed(app: &Router, uri: &str, token: &str) -> (StatusCode, Value) {
    let req = authed("DELETE", uri, token).body(Body::empty()).unwrap();
    send(app, req).await
}

/// POST JSON without credentials.
pub async fn post_json(app: &Router, uri: &str, body: &str) -> (StatusCode, Value) {
    let req = Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    send(app, req).await
}

/// Send a request through the router and parse the response.
async fn send(app: &Router, req: Request<Body>) -> (StatusCode, Value) {
    let response = app
        .clone()
        .oneshot(req)
        .await
        .expect("Failed to send request");

    let status = response.status();
    let body_bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("Failed to read body");

    let body: Value = if body_bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&body_bytes).unwrap_or(Value::String(
            String::from_utf8_lossy(&body_bytes).to_string(),
        ))
    };

    (status, body)
}

/// Ids of the objects in a JSON array response.
pub fn ids(list: &Value) -> Vec<i64> {
    list.as_array()
        .map(|items| items.iter().filter_map(|i| i["id"].as_i64()).collect())
        .unwrap_or_default()
}

/// Unread notifications for a user.
pub async fn unread(app: &Router, token: &str) -> i64 {
    let (status, body) = get_authed(app, "/api/v1/notifications/unread-count", token).await;
    assert_eq!(status, StatusCode::OK);
    body["count"].as_i64().unwrap()
}
