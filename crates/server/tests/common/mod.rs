use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    middleware, Router,
};
use chrono::NaiveDate;
use server::db::AppState;
use shared_types::{AppConfig, CreateStaffRequest, Role, StaffMember};
use tower::ServiceExt;

pub const PASSWORD: &str = "Correct-Horse-9";

/// Build the full API router over a private in-memory database, with the
/// auth middleware in front as in production.
#[allow(dead_code)]
pub async fn test_app() -> (Router, AppState) {
    let mut config = AppConfig::default();
    config.reports.generation_delay_ms = 0;
    test_app_with_config(config).await
}

#[allow(dead_code)]
pub async fn test_app_with_config(config: AppConfig) -> (Router, AppState) {
    let pool = server::db::connect_in_memory()
        .await
        .expect("in-memory database");
    let state = AppState::new(pool, config);

    let router = server::openapi::api_router(state.clone()).layer(middleware::from_fn_with_state(
        state.clone(),
        server::auth::middleware::auth_middleware,
    ));
    (router, state)
}

/// Insert an active account with the shared test password.
#[allow(dead_code)]
pub async fn create_user(state: &AppState, email: &str, role: Role) -> StaffMember {
    let hash = server::auth::password::hash_password(PASSWORD).expect("hash");
    let req = CreateStaffRequest {
        name: format!("Test {email}"),
        email: email.to_string(),
        phone: None,
        role,
        department: "Operations".into(),
        position: "Tester".into(),
        password: PASSWORD.into(),
        manager_id: None,
        joined_on: None,
    };
    server::repo::staff::create(
        &state.pool,
        &req,
        &hash,
        NaiveDate::from_ymd_opt(2024, 1, 15).unwrap(),
    )
    .await
    .expect("create user")
}

/// Send a request and return (status, headers, body).
pub async fn send(
    app: &Router,
    req: Request<Body>,
) -> (StatusCode, axum::http::HeaderMap, String) {
    let response = app.clone().oneshot(req).await.unwrap();
    let status = response.status();
    let headers = response.headers().clone();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, headers, String::from_utf8(body.to_vec()).unwrap())
}

#[allow(dead_code)]
pub async fn get(app: &Router, uri: &str) -> (StatusCode, String) {
    let req = Request::builder().uri(uri).body(Body::empty()).unwrap();
    let (status, _, body) = send(app, req).await;
    (status, body)
}

#[allow(dead_code)]
pub async fn get_with_auth(app: &Router, uri: &str, token: &str) -> (StatusCode, String) {
    let req = Request::builder()
        .uri(uri)
        .header(header::AUTHORIZATION, format!("Bearer {token}"))
        .body(Body::empty())
        .unwrap();
    let (status, _, body) = send(app, req).await;
    (status, body)
}

#[allow(dead_code)]
pub async fn get_with_cookie(
    app: &Router,
    uri: &str,
    cookie: &str,
) -> (StatusCode, axum::http::HeaderMap, String) {
    let req = Request::builder()
        .uri(uri)
        .header(header::COOKIE, cookie)
        .body(Body::empty())
        .unwrap();
    send(app, req).await
}

#[allow(dead_code)]
pub async fn post_json(
    app: &Router,
    uri: &str,
    json: &str,
) -> (StatusCode, axum::http::HeaderMap, String) {
    let req = Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(json.to_string()))
        .unwrap();
    send(app, req).await
}

/// POST JSON claiming to come from `forwarded_for`.
#[allow(dead_code)]
pub async fn post_json_from(
    app: &Router,
    uri: &str,
    json: &str,
    forwarded_for: &str,
) -> (StatusCode, axum::http::HeaderMap, String) {
    let req = Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .header("x-forwarded-for", forwarded_for)
        .body(Body::from(json.to_string()))
        .unwrap();
    send(app, req).await
}

#[allow(dead_code)]
pub async fn post_with_auth(app: &Router, uri: &str, token: &str) -> (StatusCode, String) {
    let req = Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::AUTHORIZATION, format!("Bearer {token}"))
        .body(Body::empty())
        .unwrap();
    let (status, _, body) = send(app, req).await;
    (status, body)
}

#[allow(dead_code)]
pub async fn put_json_with_auth(
    app: &Router,
    uri: &str,
    json: &str,
    token: &str,
) -> (StatusCode, String) {
    let req = Request::builder()
        .method("PUT")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .header(header::AUTHORIZATION, format!("Bearer {token}"))
        .body(Body::from(json.to_string()))
        .unwrap();
    let (status, _, body) = send(app, req).await;
    (status, body)
}

/// Every `Set-Cookie` header value of a response.
#[allow(dead_code)]
pub fn set_cookies(headers: &axum::http::HeaderMap) -> Vec<String> {
    headers
        .get_all(header::SET_COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok().map(str::to_string))
        .collect()
}
