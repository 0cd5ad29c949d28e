use axum::http::StatusCode;
use pretty_assertions::assert_eq;

use crate::common::{self, *};

fn leave(kind: &str, start: &str, end: &str) -> String {
    serde_json::json!({
        "leave_type": kind,
        "start_date": start,
        "end_date": end,
        "reason": "Trip"
    })
    .to_string()
}

async fn request(app: &axum::Router, token: &str, start: &str, end: &str) -> i64 {
    let (status, body) =
        post_json_authed(app, "/api/v1/leave", &leave("annual", start, end), token).await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    body["id"].as_i64().unwrap()
}

#[tokio::test]
async fn test_request_counts_weekdays_only() {
    let (app, state) = common::test_app().await;
    let token = token_for(&state, EMPLOYEE).await;

    // Monday to the following Monday: six working days.
    let (status, body) = post_json_authed(
        &app,
        "/api/v1/leave",
        &leave("personal", "2031-03-03", "2031-03-10"),
        &token,
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["days"], 6);
    assert_eq!(body["status"], "pending");
    assert_eq!(body["employee_id"], user_id(&state, EMPLOYEE).await);
}

#[tokio::test]
async fn test_request_validation() {
    let (app, state) = common::test_app().await;
    let token = token_for(&state, EMPLOYEE).await;

    let cases = [
        (leave("annual", "2031-03-05", "2031-03-03"), "end_date"),
        (leave("annual", "2031-03-08", "2031-03-09"), "start_date"),
        (leave("sabbatical", "2031-03-03", "2031-03-03"), "leave_type"),
    ];
    for (body, field) in cases {
        let (status, err) = post_json_authed(&app, "/api/v1/leave", &body, &token).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY, "{body}");
        assert!(err["field_errors"][field].is_string(), "{err}");
    }
}

#[tokio::test]
async fn test_request_span_is_capped() {
    let (app, state) = common::test_app().await;
    let token = token_for(&state, EMPLOYEE).await;

    for end in ["2031-06-01", "9999-12-31"] {
        let body = leave("sick", "2031-03-03", end);
        let (status, err) = post_json_authed(&app, "/api/v1/leave", &body, &token).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY, "{end}");
        assert!(err["field_errors"]["end_date"].is_string(), "{err}");
    }

    // 2031-03-03..=2031-05-31 is exactly ninety calendar days.
    let (status, body) = post_json_authed(
        &app,
        "/api/v1/leave",
        &leave("sick", "2031-03-03", "2031-05-31"),
        &token,
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
}

#[tokio::test]
async fn test_overlapping_request_conflicts() {
    let (app, state) = common::test_app().await;
    let token = token_for(&state, EMPLOYEE).await;
    request(&app, &token, "2031-03-03", "2031-03-05").await;

    let (status, _) = post_json_authed(
        &app,
        "/api/v1/leave",
        &leave("sick", "2031-03-05", "2031-03-06"),
        &token,
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_annual_request_beyond_allowance_conflicts() {
    let (app, state) = common::test_app().await;
    let token = token_for(&state, EMPLOYEE).await;

    // Five full weeks is 25 working days against a 20 day allowance.
    let (status, body) = post_json_authed(
        &app,
        "/api/v1/leave",
        &leave("annual", "2031-01-06", "2031-02-07"),
        &token,
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert!(body["message"].as_str().unwrap().contains("annual leave"));
}

#[tokio::test]
async fn test_request_notifies_superiors() {
    let (app, state) = common::test_app().await;
    let employee = token_for(&state, EMPLOYEE).await;
    let supervisor = token_for(&state, SUPERVISOR).await;
    let super_admin = token_for(&state, SUPER_ADMIN).await;
    let supervisor_before = unread(&app, &supervisor).await;
    let super_admin_before = unread(&app, &super_admin).await;

    request(&app, &employee, "2031-03-03", "2031-03-04").await;

    assert_eq!(unread(&app, &supervisor).await, supervisor_before + 1);
    // Super admins have no leave section and are not asked to review.
    assert_eq!(unread(&app, &super_admin).await, super_admin_before);
}

#[tokio::test]
async fn test_approval_marks_attendance_and_notifies() {
    let (app, state) = common::test_app().await;
    let employee = token_for(&state, EMPLOYEE).await;
    let supervisor = token_for(&state, SUPERVISOR).await;
    let id = request(&app, &employee, "2031-03-03", "2031-03-05").await;
    let before = unread(&app, &employee).await;

    let (status, body) = post_json_authed(
        &app,
        &format!("/api/v1/leave/{id}/review"),
        r#"{"approve": true, "note": "Enjoy"}"#,
        &supervisor,
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["status"], "approved");
    assert_eq!(body["review_note"], "Enjoy");
    assert_eq!(unread(&app, &employee).await, before + 1);

    let employee_id = user_id(&state, EMPLOYEE).await;
    let (status, records) = get_authed(
        &app,
        &format!("/api/v1/attendance?user_id={employee_id}&date=2031-03-04"),
        &supervisor,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(records[0]["status"], "on_leave");

    // A second decision is refused.
    let (status, _) = post_json_authed(
        &app,
        &format!("/api/v1/leave/{id}/review"),
        r#"{"approve": false}"#,
        &supervisor,
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_failed_attendance_write_leaves_request_pending() {
    let (app, state) = common::test_app().await;
    let employee = token_for(&state, EMPLOYEE).await;
    let supervisor = token_for(&state, SUPERVISOR).await;
    let id = request(&app, &employee, "2031-03-03", "2031-03-05").await;

    sqlx::query(
        "CREATE TRIGGER block_attendance BEFORE INSERT ON attendance \
         BEGIN SELECT RAISE(ABORT, 'attendance locked'); END",
    )
    .execute(&state.pool)
    .await
    .unwrap();

    let approve = r#"{"approve": true}"#;
    let (status, _) =
        post_json_authed(&app, &format!("/api/v1/leave/{id}/review"), approve, &supervisor).await;
    assert!(status.is_server_error(), "{status}");

    let (_, body) = get_authed(&app, &format!("/api/v1/leave/{id}"), &supervisor).await;
    assert_eq!(body["status"], "pending");
    let marked: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM attendance WHERE date >= '2031-03-03'")
            .fetch_one(&state.pool)
            .await
            .unwrap();
    assert_eq!(marked, 0);

    // Once the store accepts writes the same request can still be approved.
    sqlx::query("DROP TRIGGER block_attendance")
        .execute(&state.pool)
        .await
        .unwrap();
    let (status, body) =
        post_json_authed(&app, &format!("/api/v1/leave/{id}/review"), approve, &supervisor).await;
    assert_eq!(status, StatusCode::OK, "{body}");
    let marked: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM attendance WHERE status = 'on_leave' AND date >= '2031-03-03'",
    )
    .fetch_one(&state.pool)
    .await
    .unwrap();
    assert_eq!(marked, 3);
}

#[tokio::test]
async fn test_cannot_review_own_or_peer_leave() {
    let (app, state) = common::test_app().await;
    let employee = token_for(&state, EMPLOYEE).await;
    let id = request(&app, &employee, "2031-03-03", "2031-03-03").await;
    let uri = format!("/api/v1/leave/{id}/review");

    let (status, _) = post_json_authed(&app, &uri, r#"{"approve": true}"#, &employee).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let peer = token_for(&state, OTHER_EMPLOYEE).await;
    let (status, _) = post_json_authed(&app, &uri, r#"{"approve": true}"#, &peer).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_rejection_keeps_balance() {
    let (app, state) = common::test_app().await;
    let employee = token_for(&state, EMPLOYEE).await;
    let manager = token_for(&state, MANAGER).await;
    let id = request(&app, &employee, "2031-03-03", "2031-03-05").await;

    let (status, body) = post_json_authed(
        &app,
        &format!("/api/v1/leave/{id}/review"),
        r#"{"approve": false, "note": "Stocktake week"}"#,
        &manager,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "rejected");

    let (status, balance) = get_authed(&app, "/api/v1/leave/balance", &employee).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(balance["allowance"], 20);
    assert_eq!(balance["used"], 0);
    assert_eq!(balance["remaining"], 20);
}

#[tokio::test]
async fn test_cancel_own_pending_only() {
    let (app, state) = common::test_app().await;
    let employee = token_for(&state, EMPLOYEE).await;
    let supervisor = token_for(&state, SUPERVISOR).await;
    let id = request(&app, &employee, "2031-03-03", "2031-03-03").await;

    let (status, _) = post_authed(&app, &format!("/api/v1/leave/{id}/cancel"), &supervisor).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = post_authed(&app, &format!("/api/v1/leave/{id}/cancel"), &employee).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "cancelled");

    let (status, _) = post_authed(&app, &format!("/api/v1/leave/{id}/cancel"), &employee).await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_list_scoped_to_visible_people() {
    let (app, state) = common::test_app().await;
    let employee = token_for(&state, EMPLOYEE).await;
    let id = request(&app, &employee, "2031-03-03", "2031-03-03").await;

    let peer = token_for(&state, OTHER_EMPLOYEE).await;
    let (status, list) = get_authed(&app, "/api/v1/leave", &peer).await;
    assert_eq!(status, StatusCode::OK);
    assert!(!ids(&list).contains(&id));

    let manager = token_for(&state, MANAGER).await;
    let (status, list) = get_authed(&app, "/api/v1/leave?status=pending", &manager).await;
    assert_eq!(status, StatusCode::OK);
    assert!(ids(&list).contains(&id));
}
