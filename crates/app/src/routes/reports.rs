use crate::format_helpers::{
    error_message, field_errors, format_datetime, format_percent, format_range, parse_date_input,
};
use chrono::{Datelike, Utc};
use dioxus::prelude::*;
use serde_json::Value;
use shared_types::{
    filter_by_query, AttendanceReportSummary, CreateReportRequest, HeadcountSummary,
    LeaveReportSummary, Report, ReportListParams, TaskReportSummary, REPORT_KINDS,
    REPORT_STATUSES,
};
use shared_ui::{
    humanize, options_from, toast_result, use_toast, Button, ButtonSize, ButtonVariant, Card,
    CardContent, DataTable, DataTableBody, DataTableCell, DataTableColumn, DataTableEmpty,
    DataTableHeader, DataTableRow, DetailItem, DetailList, Form, FormActions, FormError, FormRow,
    FormSelect, Input, PageActions, PageHeader, PageTitle, SearchBar, Sheet, SkeletonRows,
    StatusBadge, ToastOptions,
};
use std::collections::{BTreeMap, HashMap};

/// Milliseconds between status checks on a report that is still running.
const POLL_INTERVAL_MS: u32 = 1500;

/// Reports are generated in the background. Rows that are still queued or
/// generating poll until they finish.
#[component]
pub fn Reports() -> Element {
    let mut query = use_signal(String::new);
    let mut status = use_signal(String::new);
    let mut show_request = use_signal(|| false);
    let mut viewing = use_signal(|| Option::<Report>::None);

    let mut data = use_resource(move || {
        let status = status.read().clone();
        async move {
            let params = ReportListParams {
                q: None,
                status: (!status.is_empty()).then_some(status),
            };
            server::api::list_reports(params).await
        }
    });

    let mut status_options = vec![(String::new(), "All statuses".to_string())];
    status_options.extend(options_from(REPORT_STATUSES));

    rsx! {
        PageHeader {
            PageTitle { subtitle: Some("Summaries built from live data".to_string()), "Reports" }
            PageActions {
                Button {
                    variant: ButtonVariant::Primary,
                    onclick: move |_| show_request.set(true),
                    "New report"
                }
            }
        }

        SearchBar {
            value: query(),
            placeholder: "Search title, kind, requester...",
            on_search: move |q: String| query.set(q),
            FormSelect {
                value: status(),
                options: status_options,
                onchange: move |e: Event<FormData>| status.set(e.value()),
            }
        }

        match &*data.read() {
            Some(Ok(reports)) => {
                let reports = filter_by_query(reports.clone(), &query.read());
                rsx! {
                    ReportTable {
                        reports,
                        on_view: move |r: Report| viewing.set(Some(r)),
                        on_changed: move |_| data.restart(),
                    }
                }
            }
            Some(Err(e)) => rsx! {
                Card {
                    CardContent {
                        p { class: "page-error", "{error_message(e)}" }
                    }
                }
            },
            None => rsx! {
                SkeletonRows { count: 5 }
            },
        }

        if show_request() {
            RequestReportSheet {
                on_close: move |_| show_request.set(false),
                on_saved: move |_| data.restart(),
            }
        }

        if let Some(report) = viewing() {
            ReportSheet { report, on_close: move |_| viewing.set(None) }
        }
    }
}

#[component]
fn ReportTable(
    reports: Vec<Report>,
    on_view: EventHandler<Report>,
    on_changed: EventHandler<()>,
) -> Element {
    rsx! {
        DataTable {
            DataTableHeader {
                DataTableColumn { "Title" }
                DataTableColumn { "Kind" }
                DataTableColumn { "Period" }
                DataTableColumn { "Requested by" }
                DataTableColumn { "Status" }
                DataTableColumn { "" }
            }
            DataTableBody {
                if reports.is_empty() {
                    DataTableEmpty { colspan: 6, message: "No reports yet." }
                }
                for report in reports {
                    ReportRow { key: "{report.id}", report, on_view, on_changed }
                }
            }
        }
    }
}

#[component]
fn ReportRow(report: Report, on_view: EventHandler<Report>, on_changed: EventHandler<()>) -> Element {
    let toast = use_toast();
    let mut busy = use_signal(|| false);
    let mut confirm_delete = use_signal(|| false);
    let id = report.id;
    let ready = report.status == "ready";
    let failed = report.status == "failed";
    let view_target = report.clone();

    let retry = move |_: MouseEvent| {
        spawn(async move {
            busy.set(true);
            let result = server::api::retry_report(id).await;
            busy.set(false);
            if toast_result(toast, &result.map_err(|e| error_message(&e)), "Report queued again") {
                on_changed.call(());
            }
        });
    };

    let delete = move |_: MouseEvent| {
        if !confirm_delete() {
            confirm_delete.set(true);
            return;
        }
        spawn(async move {
            busy.set(true);
            let result = server::api::delete_report(id).await;
            busy.set(false);
            confirm_delete.set(false);
            if toast_result(toast, &result.map_err(|e| error_message(&e)), "Report deleted") {
                on_changed.call(());
            }
        });
    };

    rsx! {
        DataTableRow {
            onclick: move |_| {
                if ready {
                    on_view.call(view_target.clone());
                }
            },
            DataTableCell {
                div { class: "task-cell",
                    span { class: "task-cell-title", "{report.title}" }
                    if let Some(error) = &report.error {
                        span { class: "task-cell-sub page-error", "{error}" }
                    }
                }
            }
            DataTableCell { "{humanize(&report.kind)}" }
            DataTableCell { "{format_range(report.period_start, report.period_end)}" }
            DataTableCell { "{report.requester_name}" }
            DataTableCell {
                StatusBadge { status: report.status.clone() }
                if !report.is_finished() {
                    ReportPoller { id, on_finished: move |_| on_changed.call(()) }
                }
            }
            DataTableCell {
                div {
                    class: "row-actions",
                    onclick: move |e: MouseEvent| e.stop_propagation(),
                    if failed {
                        Button {
                            variant: ButtonVariant::Outline,
                            size: ButtonSize::Small,
                            disabled: busy(),
                            onclick: retry,
                            "Retry"
                        }
                    }
                    Button {
                        variant: ButtonVariant::Destructive,
                        size: ButtonSize::Small,
                        disabled: busy() || !report.is_finished(),
                        onclick: delete,
                        if confirm_delete() { "Confirm delete" } else { "Delete" }
                    }
                }
            }
        }
    }
}

/// Checks one running report until it is ready or failed. Renders nothing.
#[component]
fn ReportPoller(id: i64, on_finished: EventHandler<()>) -> Element {
    use_future(move || async move {
        loop {
            let wait = format!(
                "await new Promise(r => setTimeout(r, {POLL_INTERVAL_MS})); return true;"
            );
            if document::eval(&wait).await.is_err() {
                break;
            }
            match server::api::get_report(id).await {
                Ok(report) if report.is_finished() => {
                    on_finished.call(());
                    break;
                }
                Ok(_) => {}
                Err(e) => {
                    tracing::warn!(report_id = id, error = %e, "Report status check failed");
                    break;
                }
            }
        }
    });

    rsx! {}
}

#[component]
fn RequestReportSheet(on_close: EventHandler<()>, on_saved: EventHandler<()>) -> Element {
    let toast = use_toast();
    let today = Utc::now().date_naive();
    let month_start = today.with_day(1).unwrap_or(today);

    let mut title = use_signal(String::new);
    let mut kind = use_signal(|| "headcount".to_string());
    let mut start = use_signal(|| month_start.to_string());
    let mut end = use_signal(|| today.to_string());
    let mut errors = use_signal(HashMap::<String, String>::new);
    let mut form_error = use_signal(|| Option::<String>::None);
    let mut in_flight = use_signal(|| false);

    let handle_save = move |_: FormEvent| {
        if in_flight() {
            return;
        }
        errors.set(HashMap::new());
        form_error.set(None);

        let (Some(period_start), Some(period_end)) =
            (parse_date_input(&start()), parse_date_input(&end()))
        else {
            form_error.set(Some("Pick both ends of the period".to_string()));
            return;
        };
        let req = CreateReportRequest {
            title: title().trim().to_string(),
            kind: kind(),
            period_start,
            period_end,
        };
        spawn(async move {
            in_flight.set(true);
            let result = server::api::request_report(req).await;
            in_flight.set(false);
            match result {
                Ok(report) => {
                    toast.success(format!("\"{}\" queued", report.title), ToastOptions::new());
                    on_saved.call(());
                    on_close.call(());
                }
                Err(e) => {
                    let fe = field_errors(&e);
                    if fe.is_empty() {
                        form_error.set(Some(error_message(&e)));
                    } else {
                        errors.set(fe);
                    }
                }
            }
        });
    };

    let err = move |field: &str| errors.read().get(field).cloned();

    rsx! {
        Sheet {
            open: true,
            on_close: move |_| on_close.call(()),
            title: "New report",
            description: Some("Generation runs in the background.".to_string()),

            Form { onsubmit: handle_save,
                FormError { message: form_error() }

                Input {
                    label: "Title *",
                    value: title(),
                    placeholder: "e.g. March headcount",
                    error: err("title"),
                    on_input: move |e: FormEvent| title.set(e.value()),
                }
                FormSelect {
                    label: "Kind",
                    value: kind(),
                    options: options_from(REPORT_KINDS),
                    error: err("kind"),
                    onchange: move |e: Event<FormData>| kind.set(e.value()),
                }
                FormRow {
                    Input {
                        label: "From",
                        input_type: "date",
                        value: start(),
                        error: err("period_start"),
                        on_input: move |e: FormEvent| start.set(e.value()),
                    }
                    Input {
                        label: "To",
                        input_type: "date",
                        value: end(),
                        error: err("period_end"),
                        on_input: move |e: FormEvent| end.set(e.value()),
                    }
                }

                FormActions {
                    Button {
                        variant: ButtonVariant::Ghost,
                        onclick: move |_| on_close.call(()),
                        "Cancel"
                    }
                    Button {
                        variant: ButtonVariant::Primary,
                        button_type: "submit",
                        busy: in_flight(),
                        busy_label: "Queueing...",
                        "Generate"
                    }
                }
            }
        }
    }
}

#[component]
fn ReportSheet(report: Report, on_close: EventHandler<()>) -> Element {
    let rows = report
        .summary
        .as_ref()
        .map(|summary| summary_rows(&report.kind, summary))
        .unwrap_or_default();
    let completed = report.completed_at.map(format_datetime).unwrap_or_default();

    rsx! {
        Sheet {
            open: true,
            on_close: move |_| on_close.call(()),
            title: report.title.clone(),
            description: Some(format!(
                "{} report \u{b7} {}",
                humanize(&report.kind),
                format_range(report.period_start, report.period_end)
            )),

            DetailList {
                for (label, value) in rows {
                    DetailItem { key: "{label}", label: label.clone(), value }
                }
                DetailItem { label: "Requested by", value: report.requester_name.clone() }
                DetailItem { label: "Completed", value: completed }
            }
        }
    }
}

fn breakdown(map: &BTreeMap<String, i64>) -> String {
    if map.is_empty() {
        return String::new();
    }
    map.iter()
        .map(|(k, v)| format!("{} {v}", humanize(k)))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Label/value pairs for a finished report's summary.
fn summary_rows(kind: &str, summary: &Value) -> Vec<(String, String)> {
    let value = summary.clone();
    let rows = match kind {
        "headcount" => serde_json::from_value::<HeadcountSummary>(value).map(|s| {
            vec![
                ("Total people", s.total.to_string()),
                ("By role", breakdown(&s.by_role)),
                ("By status", breakdown(&s.by_status)),
                ("New joiners", s.new_joiners.to_string()),
            ]
        }),
        "attendance" => serde_json::from_value::<AttendanceReportSummary>(value).map(|s| {
            vec![
                ("Records", s.records.to_string()),
                ("By status", breakdown(&s.by_status)),
                ("Attendance rate", format_percent(s.attendance_rate)),
            ]
        }),
        "leave" => serde_json::from_value::<LeaveReportSummary>(value).map(|s| {
            vec![
                ("Requests", s.requests.to_string()),
                ("By status", breakdown(&s.by_status)),
                ("By type", breakdown(&s.by_type)),
                ("Approved days", s.approved_days.to_string()),
            ]
        }),
        "tasks" => serde_json::from_value::<TaskReportSummary>(value).map(|s| {
            vec![
                ("Tasks", s.tasks.to_string()),
                ("By status", breakdown(&s.by_status)),
                ("By priority", breakdown(&s.by_priority)),
                ("Overdue", s.overdue.to_string()),
                ("Completion rate", format_percent(s.completion_rate)),
            ]
        }),
        _ => return Vec::new(),
    };

    match rows {
        Ok(rows) => rows
            .into_iter()
            .map(|(label, value)| (label.to_string(), value))
            .collect(),
        Err(e) => {
            tracing::warn!(kind, error = %e, "Unreadable report summary");
            Vec::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn headcount_summary_lists_roles() {
        let summary = json!({
            "total": 3,
            "by_role": { "employee": 2, "manager": 1 },
            "by_status": { "active": 3 },
            "new_joiners": 1
        });
        let rows = summary_rows("headcount", &summary);
        assert_eq!(rows[0], ("Total people".to_string(), "3".to_string()));
        assert_eq!(rows[1].1, "Employee 2, Manager 1");
    }

    #[test]
    fn task_summary_shows_completion_rate() {
        let summary = json!({
            "tasks": 4,
            "by_status": { "completed": 3, "pending": 1 },
            "by_priority": { "high": 4 },
            "overdue": 0,
            "completion_rate": 0.75
        });
        let rows = summary_rows("tasks", &summary);
        assert_eq!(rows.last().map(|r| r.1.as_str()), Some("75%"));
    }

    #[test]
    fn unknown_kind_or_shape_yields_nothing() {
        assert!(summary_rows("payroll", &json!({})).is_empty());
        assert!(summary_rows("leave", &json!("oops")).is_empty());
    }
}
