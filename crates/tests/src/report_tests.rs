use axum::http::StatusCode;
use pretty_assertions::assert_eq;
use serde_json::Value;

use crate::common::{self, *};

fn report(kind: &str, start: &str, end: &str) -> String {
    serde_json::json!({
        "title": format!("{kind} report"),
        "kind": kind,
        "period_start": start,
        "period_end": end
    })
    .to_string()
}

/// Poll until the background job leaves `queued`/`generating`.
async fn wait_until_done(app: &axum::Router, token: &str, id: i64) -> Value {
    for _ in 0..200 {
        let (status, body) = get_authed(app, &format!("/api/v1/reports/{id}"), token).await;
        assert_eq!(status, StatusCode::OK);
        if body["status"] == "ready" || body["status"] == "failed" {
            return body;
        }
        tokio::time::sleep(std::time::Duration::from_millis(10)).await;
    }
    panic!("Report {id} never finished");
}

#[tokio::test]
async fn test_report_queues_then_becomes_ready() {
    let (app, state) = common::test_app().await;
    let token = token_for(&state, MANAGER).await;

    let (status, body) =
        post_json_authed(&app, "/api/v1/reports", &report("headcount", "2031-01-01", "2031-12-31"), &token)
            .await;
    assert_eq!(status, StatusCode::ACCEPTED, "{body}");
    assert!(body["status"] == "queued" || body["status"] == "generating");
    let id = body["id"].as_i64().unwrap();

    let done = wait_until_done(&app, &token, id).await;
    assert_eq!(done["status"], "ready");
    assert_eq!(done["summary"]["total"], 11);
    assert!(done["completed_at"].is_string());
}

#[tokio::test]
async fn test_each_kind_produces_summary() {
    let (app, state) = common::test_app().await;
    let token = token_for(&state, ADMIN).await;

    for (kind, key) in [
        ("attendance", "attendance_rate"),
        ("leave", "approved_days"),
        ("tasks", "completion_rate"),
    ] {
        let (status, body) =
            post_json_authed(&app, "/api/v1/reports", &report(kind, "2031-01-01", "2031-12-31"), &token)
                .await;
        assert_eq!(status, StatusCode::ACCEPTED);
        let done = wait_until_done(&app, &token, body["id"].as_i64().unwrap()).await;
        assert_eq!(done["status"], "ready", "{kind}");
        assert!(done["summary"].get(key).is_some(), "{kind} summary missing {key}");
    }
}

#[tokio::test]
async fn test_ready_report_notifies_requester() {
    let (app, state) = common::test_app().await;
    let token = token_for(&state, MANAGER).await;
    let before = unread(&app, &token).await;

    let (_, body) =
        post_json_authed(&app, "/api/v1/reports", &report("tasks", "2031-01-01", "2031-12-31"), &token).await;
    wait_until_done(&app, &token, body["id"].as_i64().unwrap()).await;

    assert_eq!(unread(&app, &token).await, before + 1);
}

#[tokio::test]
async fn test_report_validation() {
    let (app, state) = common::test_app().await;
    let token = token_for(&state, MANAGER).await;

    let cases = [
        (report("payroll", "2031-01-01", "2031-01-31"), "kind"),
        (report("leave", "2031-02-01", "2031-01-01"), "period_end"),
        (report("leave", "2020-01-01", "2031-01-01"), "period_end"),
    ];
    for (body, field) in cases {
        let (status, err) = post_json_authed(&app, "/api/v1/reports", &body, &token).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY, "{body}");
        assert!(err["field_errors"][field].is_string(), "{err}");
    }
}

#[tokio::test]
async fn test_reports_private_below_admin() {
    let (app, state) = common::test_app().await;
    let manager = token_for(&state, MANAGER).await;
    let (_, body) =
        post_json_authed(&app, "/api/v1/reports", &report("leave", "2031-01-01", "2031-01-31"), &manager).await;
    let id = body["id"].as_i64().unwrap();

    let other_manager = token_for(&state, "casey.morgan@staffdesk.test").await;
    let (status, _) = get_authed(&app, &format!("/api/v1/reports/{id}"), &other_manager).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let admin = token_for(&state, ADMIN).await;
    let (status, list) = get_authed(&app, "/api/v1/reports", &admin).await;
    assert_eq!(status, StatusCode::OK);
    assert!(ids(&list).contains(&id));
}

#[tokio::test]
async fn test_retry_only_failed_reports() {
    let (app, state) = common::test_app().await;
    let token = token_for(&state, ADMIN).await;
    let (_, body) =
        post_json_authed(&app, "/api/v1/reports", &report("tasks", "2031-01-01", "2031-01-31"), &token).await;
    let id = body["id"].as_i64().unwrap();
    wait_until_done(&app, &token, id).await;

    let (status, _) = post_authed(&app, &format!("/api/v1/reports/{id}/retry"), &token).await;
    assert_eq!(status, StatusCode::CONFLICT);

    // Force a failure, then retry it back to ready.
    server::repo::report::mark_failed(&state.pool, id, "disk full")
        .await
        .unwrap();
    let (status, body) = post_authed(&app, &format!("/api/v1/reports/{id}/retry"), &token).await;
    assert_eq!(status, StatusCode::ACCEPTED, "{body}");
    let done = wait_until_done(&app, &token, id).await;
    assert_eq!(done["status"], "ready");
}

#[tokio::test]
async fn test_delete_report() {
    let (app, state) = common::test_app().await;
    let token = token_for(&state, MANAGER).await;
    let (_, body) =
        post_json_authed(&app, "/api/v1/reports", &report("leave", "2031-01-01", "2031-01-31"), &token).await;
    let id = body["id"].as_i64().unwrap();
    wait_until_done(&app, &token, id).await;

    let (status, _) = delete_authed(&app, &format!("/api/v1/reports/{id}"), &token).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (status, _) = get_authed(&app, &format!("/api/v1/reports/{id}"), &token).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_interrupted_report_becomes_retryable() {
    let (app, state) = common::test_app().await;
    let token = token_for(&state, MANAGER).await;
    let manager_id = user_id(&state, MANAGER).await;

    // A row left behind by a process that exited before generating it.
    let start = chrono::NaiveDate::from_ymd_opt(2031, 1, 1).unwrap();
    let end = chrono::NaiveDate::from_ymd_opt(2031, 1, 31).unwrap();
    let stuck =
        server::repo::report::create(&state.pool, "Stuck", "tasks", start, end, manager_id)
            .await
            .unwrap();
    let retry = format!("/api/v1/reports/{}/retry", stuck.id);
    let (status, _) = post_authed(&app, &retry, &token).await;
    assert_eq!(status, StatusCode::CONFLICT);

    let before = unread(&app, &token).await;
    let recovered = server::service::report::recover_interrupted(&state.pool)
        .await
        .unwrap();
    assert_eq!(recovered, 1);
    assert_eq!(unread(&app, &token).await, before + 1);

    let (_, body) = get_authed(&app, &format!("/api/v1/reports/{}", stuck.id), &token).await;
    assert_eq!(body["status"], "failed");
    assert!(body["error"].as_str().is_some_and(|e| e.contains("interrupted")));

    let (status, body) = post_authed(&app, &retry, &token).await;
    assert_eq!(status, StatusCode::ACCEPTED, "{body}");
    let done = wait_until_done(&app, &token, stuck.id).await;
    assert_eq!(done["status"], "ready");
}

#[tokio::test]
async fn test_failed_store_write_marks_report_failed() {
    let (app, state) = common::test_app().await;
    let token = token_for(&state, MANAGER).await;
    sqlx::query(
        "CREATE TRIGGER block_ready BEFORE UPDATE OF status ON reports \
         WHEN NEW.status = 'ready' BEGIN SELECT RAISE(ABORT, 'disk full'); END",
    )
    .execute(&state.pool)
    .await
    .unwrap();
    let before = unread(&app, &token).await;

    let (status, body) =
        post_json_authed(&app, "/api/v1/reports", &report("tasks", "2031-01-01", "2031-12-31"), &token)
            .await;
    assert_eq!(status, StatusCode::ACCEPTED, "{body}");

    let done = wait_until_done(&app, &token, body["id"].as_i64().unwrap()).await;
    assert_eq!(done["status"], "failed");
    assert!(done["error"].is_string());
    assert!(done["completed_at"].is_string());

    // The notice is written just after the status flips.
    let mut notified = false;
    for _ in 0..200 {
        if unread(&app, &token).await == before + 1 {
            notified = true;
            break;
        }
        tokio::time::sleep(std::time::Duration::from_millis(10)).await;
    }
    assert!(notified);
}
