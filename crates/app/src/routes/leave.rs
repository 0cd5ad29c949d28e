use crate::auth::use_auth;
use crate::format_helpers::{
    error_message, field_errors, format_range, opt_text, parse_date_input, plural,
};
use dioxus::prelude::*;
use shared_types::{
    count_weekdays, filter_by_query, CreateLeaveRequest, LeaveBalance, LeaveListParams,
    LeaveRequest, ReviewLeaveRequest, LEAVE_STATUSES, LEAVE_TYPES,
};
use shared_ui::{
    humanize, options_from, toast_result, use_toast, Button, ButtonSize, ButtonVariant, Card,
    CardContent, CardDescription, CardHeader, CardTitle, DataTable, DataTableBody, DataTableCell,
    DataTableColumn, DataTableEmpty, DataTableHeader, DataTableRow, Form, FormActions, FormError,
    FormRow, FormSelect, Input, PageActions, PageHeader, PageTitle, SearchBar, Sheet, SkeletonRows,
    StatusBadge, Textarea, ToastOptions,
};
use std::collections::HashMap;

/// Leave requests: the caller's own plus those of the people they manage,
/// with approve/reject for the latter.
#[component]
pub fn Leave() -> Element {
    let mut query = use_signal(String::new);
    let mut status = use_signal(String::new);
    let mut show_request = use_signal(|| false);
    let mut reviewing = use_signal(|| Option::<(LeaveRequest, bool)>::None);

    let mut balance = use_resource(move || async move { server::api::get_leave_balance().await });
    let mut data = use_resource(move || {
        let status = status.read().clone();
        async move {
            let params = LeaveListParams {
                q: None,
                status: (!status.is_empty()).then_some(status),
            };
            server::api::list_leave(params).await
        }
    });

    let mut refresh = move || {
        data.restart();
        balance.restart();
    };

    let mut status_options = vec![(String::new(), "All statuses".to_string())];
    status_options.extend(options_from(LEAVE_STATUSES));

    rsx! {
        PageHeader {
            PageTitle { subtitle: Some("Weekdays only; weekends are never counted".to_string()), "Leave" }
            PageActions {
                Button {
                    variant: ButtonVariant::Primary,
                    onclick: move |_| show_request.set(true),
                    "Request leave"
                }
            }
        }

        match &*balance.read() {
            Some(Ok(b)) => rsx! { BalanceCard { balance: b.clone() } },
            _ => rsx! {},
        }

        SearchBar {
            value: query(),
            placeholder: "Search name, type, reason...",
            on_search: move |q: String| query.set(q),
            FormSelect {
                value: status(),
                options: status_options,
                onchange: move |e: Event<FormData>| status.set(e.value()),
            }
        }

        match &*data.read() {
            Some(Ok(requests)) => {
                let requests = filter_by_query(requests.clone(), &query.read());
                rsx! {
                    LeaveTable {
                        requests,
                        on_review: move |(req, approve): (LeaveRequest, bool)| reviewing.set(Some((req, approve))),
                        on_changed: move |_| refresh(),
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
            RequestLeaveSheet {
                on_close: move |_| show_request.set(false),
                on_saved: move |_| refresh(),
            }
        }

        if let Some((request, approve)) = reviewing() {
            ReviewSheet {
                request,
                approve,
                on_close: move |_| reviewing.set(None),
                on_saved: move |_| refresh(),
            }
        }
    }
}

#[component]
fn BalanceCard(balance: LeaveBalance) -> Element {
    let remaining = plural(balance.remaining, "day");
    rsx! {
        Card { class: "leave-balance",
            CardHeader {
                CardTitle { "Annual leave {balance.year}" }
                CardDescription {
                    "{remaining} remaining of {balance.allowance}"
                }
            }
            CardContent {
                div {
                    class: "leave-balance-bar",
                    role: "progressbar",
                    "aria-valuemin": "0",
                    "aria-valuemax": "{balance.allowance}",
                    "aria-valuenow": "{balance.used}",
                    div {
                        class: "leave-balance-fill",
                        style: "width: {used_percent(&balance)}%",
                    }
                }
            }
        }
    }
}

fn used_percent(balance: &LeaveBalance) -> i64 {
    if balance.allowance <= 0 {
        return 100;
    }
    (balance.used * 100 / balance.allowance).clamp(0, 100)
}

#[component]
fn LeaveTable(
    requests: Vec<LeaveRequest>,
    on_review: EventHandler<(LeaveRequest, bool)>,
    on_changed: EventHandler<()>,
) -> Element {
    rsx! {
        DataTable {
            DataTableHeader {
                DataTableColumn { "Employee" }
                DataTableColumn { "Type" }
                DataTableColumn { "Dates" }
                DataTableColumn { numeric: true, "Days" }
                DataTableColumn { "Status" }
                DataTableColumn { "" }
            }
            DataTableBody {
                if requests.is_empty() {
                    DataTableEmpty { colspan: 6, message: "No leave requests." }
                }
                for request in requests {
                    LeaveRow { key: "{request.id}", request, on_review, on_changed }
                }
            }
        }
    }
}

#[component]
fn LeaveRow(
    request: LeaveRequest,
    on_review: EventHandler<(LeaveRequest, bool)>,
    on_changed: EventHandler<()>,
) -> Element {
    let auth = use_auth();
    let toast = use_toast();
    let mut busy = use_signal(|| false);

    let id = request.id;
    let own = auth.user_id() == Some(request.employee_id);
    let pending = request.is_pending();
    let approve_target = request.clone();
    let reject_target = request.clone();

    let cancel = move |_: MouseEvent| {
        spawn(async move {
            busy.set(true);
            let result = server::api::cancel_leave(id).await;
            busy.set(false);
            if toast_result(toast, &result.map_err(|e| error_message(&e)), "Request cancelled") {
                on_changed.call(());
            }
        });
    };

    rsx! {
        DataTableRow { muted: !pending && request.status != "approved",
            DataTableCell {
                div { class: "task-cell",
                    span { class: "task-cell-title", "{request.employee_name}" }
                    if let Some(reason) = &request.reason {
                        span { class: "task-cell-sub", "{reason}" }
                    }
                }
            }
            DataTableCell { "{humanize(&request.leave_type)}" }
            DataTableCell { "{format_range(request.start_date, request.end_date)}" }
            DataTableCell { numeric: true, "{request.days}" }
            DataTableCell {
                div { class: "task-cell",
                    StatusBadge { status: request.status.clone() }
                    if let Some(reviewer) = &request.reviewer_name {
                        span { class: "task-cell-sub", "by {reviewer}" }
                    }
                    if let Some(note) = &request.review_note {
                        span { class: "task-cell-sub", "\u{201c}{note}\u{201d}" }
                    }
                }
            }
            DataTableCell {
                div { class: "row-actions",
                    if pending && own {
                        Button {
                            variant: ButtonVariant::Outline,
                            size: ButtonSize::Small,
                            disabled: busy(),
                            onclick: cancel,
                            "Cancel"
                        }
                    }
                    if pending && !own {
                        Button {
                            variant: ButtonVariant::Primary,
                            size: ButtonSize::Small,
                            onclick: move |_| on_review.call((approve_target.clone(), true)),
                            "Approve"
                        }
                        Button {
                            variant: ButtonVariant::Destructive,
                            size: ButtonSize::Small,
                            onclick: move |_| on_review.call((reject_target.clone(), false)),
                            "Reject"
                        }
                    }
                }
            }
        }
    }
}

#[component]
fn RequestLeaveSheet(on_close: EventHandler<()>, on_saved: EventHandler<()>) -> Element {
    let toast = use_toast();
    let mut leave_type = use_signal(|| "annual".to_string());
    let mut start = use_signal(String::new);
    let mut end = use_signal(String::new);
    let mut reason = use_signal(String::new);
    let mut errors = use_signal(HashMap::<String, String>::new);
    let mut form_error = use_signal(|| Option::<String>::None);
    let mut in_flight = use_signal(|| false);

    let start_date = parse_date_input(&start());
    let end_date = parse_date_input(&end());
    let preview = match (start_date, end_date) {
        (Some(s), Some(e)) if e >= s => Some(count_weekdays(s, e)),
        _ => None,
    };

    let handle_save = move |_: FormEvent| {
        if in_flight() {
            return;
        }
        errors.set(HashMap::new());
        form_error.set(None);

        let (Some(start_date), Some(end_date)) = (start_date, end_date) else {
            let mut fe = HashMap::new();
            if start_date.is_none() {
                fe.insert("start_date".to_string(), "Pick a start date".to_string());
            }
            if end_date.is_none() {
                fe.insert("end_date".to_string(), "Pick an end date".to_string());
            }
            errors.set(fe);
            return;
        };

        let req = CreateLeaveRequest {
            leave_type: leave_type(),
            start_date,
            end_date,
            reason: opt_text(&reason()),
        };
        spawn(async move {
            in_flight.set(true);
            let result = server::api::request_leave(req).await;
            in_flight.set(false);
            match result {
                Ok(r) => {
                    toast.success(
                        format!("Requested {}", plural(r.days, "day")),
                        ToastOptions::new(),
                    );
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
            title: "Request leave",
            description: Some("Your manager will be notified.".to_string()),

            Form { onsubmit: handle_save,
                FormError { message: form_error() }

                FormSelect {
                    label: "Type",
                    value: leave_type(),
                    options: options_from(LEAVE_TYPES),
                    error: err("leave_type"),
                    onchange: move |e: Event<FormData>| leave_type.set(e.value()),
                }
                FormRow {
                    Input {
                        label: "From *",
                        input_type: "date",
                        value: start(),
                        error: err("start_date"),
                        on_input: move |e: FormEvent| start.set(e.value()),
                    }
                    Input {
                        label: "To *",
                        input_type: "date",
                        value: end(),
                        error: err("end_date"),
                        on_input: move |e: FormEvent| end.set(e.value()),
                    }
                }
                if let Some(days) = preview {
                    p { class: "form-hint", {format!("{} requested", plural(days, "weekday"))} }
                }
                Textarea {
                    label: "Reason",
                    value: reason(),
                    error: err("reason"),
                    on_input: move |e: FormEvent| reason.set(e.value()),
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
                        busy_label: "Submitting...",
                        "Submit request"
                    }
                }
            }
        }
    }
}

#[component]
fn ReviewSheet(
    request: LeaveRequest,
    approve: bool,
    on_close: EventHandler<()>,
    on_saved: EventHandler<()>,
) -> Element {
    let toast = use_toast();
    let mut note = use_signal(String::new);
    let mut form_error = use_signal(|| Option::<String>::None);
    let mut in_flight = use_signal(|| false);
    let id = request.id;

    let handle_save = move |_: FormEvent| {
        if in_flight() {
            return;
        }
        let req = ReviewLeaveRequest {
            approve,
            note: opt_text(&note()),
        };
        spawn(async move {
            in_flight.set(true);
            let result = server::api::review_leave(id, req).await;
            in_flight.set(false);
            match result {
                Ok(r) => {
                    toast.success(
                        format!("Leave for {} {}", r.employee_name, r.status),
                        ToastOptions::new(),
                    );
                    on_saved.call(());
                    on_close.call(());
                }
                Err(e) => form_error.set(Some(error_message(&e))),
            }
        });
    };

    let (title, action, variant) = if approve {
        ("Approve leave", "Approve", ButtonVariant::Primary)
    } else {
        ("Reject leave", "Reject", ButtonVariant::Destructive)
    };

    rsx! {
        Sheet {
            open: true,
            on_close: move |_| on_close.call(()),
            title,
            description: Some(format!(
                "{} \u{b7} {} \u{b7} {}",
                request.employee_name,
                humanize(&request.leave_type),
                format_range(request.start_date, request.end_date),
            )),

            Form { onsubmit: handle_save,
                FormError { message: form_error() }
                Textarea {
                    label: "Note",
                    placeholder: "Optional message for the employee",
                    value: note(),
                    on_input: move |e: FormEvent| note.set(e.value()),
                }
                FormActions {
                    Button {
                        variant: ButtonVariant::Ghost,
                        onclick: move |_| on_close.call(()),
                        "Cancel"
                    }
                    Button {
                        variant,
                        button_type: "submit",
                        busy: in_flight(),
                        "{action}"
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn used_share_is_capped() {
        assert_eq!(used_percent(&LeaveBalance::new(2031, 20, 5)), 25);
        assert_eq!(used_percent(&LeaveBalance::new(2031, 20, 30)), 100);
        assert_eq!(used_percent(&LeaveBalance::new(2031, 0, 0)), 100);
    }
}
