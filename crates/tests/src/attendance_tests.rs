use axum::http::StatusCode;
use pretty_assertions::assert_eq;

use crate::common::{self, *};

fn mark(user_id: i64, date: &str, status: &str) -> String {
    serde_json::json!({
        "user_id": user_id,
        "date": date,
        "status": status,
        "check_in": "09:05:00",
        "check_out": "17:00:00"
    })
    .to_string()
}

#[tokio::test]
async fn test_mark_and_overwrite() {
    let (app, state) = common::test_app().await;
    let token = token_for(&state, SUPERVISOR).await;
    let employee = user_id(&state, EMPLOYEE).await;

    let (status, body) =
        put_json_authed(&app, "/api/v1/attendance", &mark(employee, "2031-03-03", "present"), &token).await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["status"], "present");
    assert_eq!(body["marked_by"], user_id(&state, SUPERVISOR).await);

    let (status, body) =
        put_json_authed(&app, "/api/v1/attendance", &mark(employee, "2031-03-03", "half_day"), &token).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "half_day");

    let (_, records) = get_authed(
        &app,
        &format!("/api/v1/attendance?user_id={employee}&date=2031-03-03"),
        &token,
    )
    .await;
    assert_eq!(records.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_mark_requires_outranking() {
    let (app, state) = common::test_app().await;
    let token = token_for(&state, SUPERVISOR).await;

    for target in [SUPERVISOR, MANAGER] {
        let id = user_id(&state, target).await;
        let (status, _) =
            put_json_authed(&app, "/api/v1/attendance", &mark(id, "2031-03-03", "present"), &token).await;
        assert_eq!(status, StatusCode::FORBIDDEN, "{target}");
    }

    let employee = token_for(&state, EMPLOYEE).await;
    let peer = user_id(&state, OTHER_EMPLOYEE).await;
    let (status, _) =
        put_json_authed(&app, "/api/v1/attendance", &mark(peer, "2031-03-03", "absent"), &employee).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_mark_validates_status_and_times() {
    let (app, state) = common::test_app().await;
    let token = token_for(&state, MANAGER).await;
    let employee = user_id(&state, EMPLOYEE).await;

    let (status, body) =
        put_json_authed(&app, "/api/v1/attendance", &mark(employee, "2031-03-03", "sleeping"), &token).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body["field_errors"]["status"].is_string());

    let backwards = serde_json::json!({
        "user_id": employee,
        "date": "2031-03-03",
        "status": "present",
        "check_in": "17:00:00",
        "check_out": "09:00:00"
    });
    let (status, body) =
        put_json_authed(&app, "/api/v1/attendance", &backwards.to_string(), &token).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body["field_errors"]["check_out"].is_string());
}

#[tokio::test]
async fn test_check_in_then_out() {
    let (app, state) = common::test_app().await;
    let token = token_for(&state, EMPLOYEE).await;

    let (status, _) = post_authed(&app, "/api/v1/attendance/check-out", &token).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = post_authed(&app, "/api/v1/attendance/check-in", &token).await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert!(body["status"] == "present" || body["status"] == "late");
    assert!(body["check_in"].is_string());

    let (status, _) = post_authed(&app, "/api/v1/attendance/check-in", &token).await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, body) = post_authed(&app, "/api/v1/attendance/check-out", &token).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["check_out"].is_string());

    let (status, _) = post_authed(&app, "/api/v1/attendance/check-out", &token).await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_summary_counts_visible_people() {
    let (app, state) = common::test_app().await;
    let token = token_for(&state, SUPERVISOR).await;
    let employee = user_id(&state, EMPLOYEE).await;
    let peer = user_id(&state, OTHER_EMPLOYEE).await;

    put_json_authed(&app, "/api/v1/attendance", &mark(employee, "2031-03-03", "present"), &token).await;
    put_json_authed(&app, "/api/v1/attendance", &mark(peer, "2031-03-03", "late"), &token).await;

    let (status, summary) =
        get_authed(&app, "/api/v1/attendance/summary?date=2031-03-03", &token).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(summary["present"], 1);
    assert_eq!(summary["late"], 1);
    assert_eq!(summary["absent"], 0);
    // The supervisor plus the two employees nobody marked.
    assert_eq!(summary["unmarked"], 3);
}

#[tokio::test]
async fn test_employee_only_sees_own_records() {
    let (app, state) = common::test_app().await;
    let supervisor = token_for(&state, SUPERVISOR).await;
    let employee = user_id(&state, EMPLOYEE).await;
    let peer = user_id(&state, OTHER_EMPLOYEE).await;
    put_json_authed(&app, "/api/v1/attendance", &mark(employee, "2031-03-03", "present"), &supervisor).await;
    put_json_authed(&app, "/api/v1/attendance", &mark(peer, "2031-03-03", "absent"), &supervisor).await;

    let token = token_for(&state, EMPLOYEE).await;
    let (status, records) = get_authed(&app, "/api/v1/attendance?date=2031-03-03", &token).await;
    assert_eq!(status, StatusCode::OK);
    let records = records.as_array().unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0]["user_id"], employee);
}
