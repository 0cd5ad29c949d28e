use crate::auth::use_auth;
use crate::format_helpers::{
    error_message, field_errors, format_date, format_percent, format_time, opt_text,
    parse_date_input, parse_time_input,
};
use chrono::{NaiveDate, Utc};
use dioxus::prelude::*;
use shared_types::{
    filter_by_query, AttendanceListParams, AttendanceRecord, AttendanceSummary,
    MarkAttendanceRequest, StaffListParams, StaffMember, ATTENDANCE_STATUSES,
};
use shared_ui::{
    humanize, options_from, use_toast, Button, ButtonSize, ButtonVariant, Card, CardContent,
    DataTable, DataTableBody, DataTableCell, DataTableColumn, DataTableEmpty, DataTableHeader,
    DataTableRow, Form, FormActions, FormError, FormRow, FormSelect, Input, PageActions,
    PageHeader, PageTitle, SearchBar, Sheet, SkeletonRows, StatCard, StatGrid, StatusBadge,
    Textarea, ToastOptions,
};
use std::collections::HashMap;

/// Daily attendance. Everyone checks themselves in and out; people who
/// manage others can also mark attendance for them.
#[component]
pub fn Attendance() -> Element {
    let auth = use_auth();
    let toast = use_toast();
    let mut date = use_signal(|| Utc::now().date_naive());
    let mut query = use_signal(String::new);
    let mut marking = use_signal(|| Option::<Option<AttendanceRecord>>::None);
    let mut clocking = use_signal(|| false);

    let mut records = use_resource(move || {
        let day = date();
        async move {
            let params = AttendanceListParams {
                date: Some(day),
                ..Default::default()
            };
            server::api::list_attendance(params).await
        }
    });
    let mut summary = use_resource(move || {
        let day = date();
        async move { server::api::get_attendance_summary(Some(day)).await }
    });

    let mut refresh = move || {
        records.restart();
        summary.restart();
    };

    let can_mark = auth
        .role()
        .is_some_and(|r| !r.managed_roles().is_empty());
    let is_today = date() == Utc::now().date_naive();

    let clock = move |check_in: bool| {
        spawn(async move {
            clocking.set(true);
            let result = if check_in {
                server::api::check_in().await
            } else {
                server::api::check_out().await
            };
            clocking.set(false);
            match result {
                Ok(record) => {
                    let msg = if check_in {
                        format!(
                            "Checked in at {} ({})",
                            format_time(record.check_in),
                            humanize(&record.status)
                        )
                    } else {
                        format!("Checked out at {}", format_time(record.check_out))
                    };
                    toast.success(msg, ToastOptions::new());
                    refresh();
                }
                Err(e) => toast.error(error_message(&e), ToastOptions::new()),
            }
        });
    };

    rsx! {
        PageHeader {
            PageTitle { subtitle: Some(format_date(date())), "Attendance" }
            PageActions {
                if is_today {
                    Button {
                        variant: ButtonVariant::Primary,
                        busy: clocking(),
                        onclick: move |_| clock(true),
                        "Check in"
                    }
                    Button {
                        variant: ButtonVariant::Outline,
                        busy: clocking(),
                        onclick: move |_| clock(false),
                        "Check out"
                    }
                }
                if can_mark {
                    Button {
                        variant: ButtonVariant::Secondary,
                        onclick: move |_| marking.set(Some(None)),
                        "Mark attendance"
                    }
                }
            }
        }

        match &*summary.read() {
            Some(Ok(s)) => rsx! { SummaryCards { summary: s.clone() } },
            _ => rsx! {},
        }

        SearchBar {
            value: query(),
            placeholder: "Search name, status, note...",
            on_search: move |q: String| query.set(q),
            input {
                class: "search-bar-input search-bar-date",
                r#type: "date",
                value: "{date}",
                oninput: move |e| {
                    if let Some(day) = parse_date_input(&e.value()) {
                        date.set(day);
                    }
                },
            }
        }

        match &*records.read() {
            Some(Ok(rows)) => {
                let rows = filter_by_query(rows.clone(), &query.read());
                rsx! {
                    AttendanceTable {
                        rows,
                        can_mark,
                        on_edit: move |r: AttendanceRecord| marking.set(Some(Some(r))),
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

        if let Some(initial) = marking() {
            MarkAttendanceSheet {
                initial,
                date: date(),
                on_close: move |_| marking.set(None),
                on_saved: move |_| refresh(),
            }
        }
    }
}

#[component]
fn SummaryCards(summary: AttendanceSummary) -> Element {
    rsx! {
        StatGrid {
            StatCard {
                label: "Attendance rate",
                value: format_percent(summary.attendance_rate()),
                hint: Some(format!("{} marked", summary.marked())),
            }
            StatCard { label: "Present", value: summary.present.to_string() }
            StatCard { label: "Late", value: summary.late.to_string() }
            StatCard {
                label: "Absent",
                value: summary.absent.to_string(),
                hint: Some(format!("{} on leave, {} half day", summary.on_leave, summary.half_day)),
            }
            StatCard { label: "Not marked", value: summary.unmarked.to_string() }
        }
    }
}

#[component]
fn AttendanceTable(
    rows: Vec<AttendanceRecord>,
    can_mark: bool,
    on_edit: EventHandler<AttendanceRecord>,
) -> Element {
    let auth = use_auth();
    let me = auth.user_id();

    rsx! {
        DataTable {
            DataTableHeader {
                DataTableColumn { "Person" }
                DataTableColumn { "Status" }
                DataTableColumn { "In" }
                DataTableColumn { "Out" }
                DataTableColumn { numeric: true, "Hours" }
                DataTableColumn { "Note" }
                DataTableColumn { "" }
            }
            DataTableBody {
                if rows.is_empty() {
                    DataTableEmpty { colspan: 7, message: "Nothing recorded for this day." }
                }
                for record in rows {
                    DataTableRow { key: "{record.id}",
                        DataTableCell { "{record.user_name}" }
                        DataTableCell {
                            StatusBadge { status: record.status.clone() }
                        }
                        DataTableCell { "{format_time(record.check_in)}" }
                        DataTableCell { "{format_time(record.check_out)}" }
                        DataTableCell { numeric: true,
                            {record.hours_worked().map(|h| format!("{h:.1}")).unwrap_or_default()}
                        }
                        DataTableCell { {record.note.clone().unwrap_or_default()} }
                        DataTableCell {
                            if can_mark && Some(record.user_id) != me {
                                Button {
                                    variant: ButtonVariant::Ghost,
                                    size: ButtonSize::Small,
                                    onclick: {
                                        let record = record.clone();
                                        move |_| on_edit.call(record.clone())
                                    },
                                    "Edit"
                                }
                            }
                        }
                    }
                }
            }
        }
    }
}

#[component]
fn MarkAttendanceSheet(
    initial: Option<AttendanceRecord>,
    date: NaiveDate,
    on_close: EventHandler<()>,
    on_saved: EventHandler<()>,
) -> Element {
    let auth = use_auth();
    let toast = use_toast();
    let seed = initial.clone();

    let mut user = use_signal(|| {
        seed.as_ref()
            .map(|r| r.user_id.to_string())
            .unwrap_or_default()
    });
    let mut day = use_signal(|| seed.as_ref().map_or(date, |r| r.date).to_string());
    let mut status = use_signal(|| {
        seed.as_ref()
            .map_or_else(|| "present".to_string(), |r| r.status.clone())
    });
    let mut check_in = use_signal(|| {
        seed.as_ref()
            .and_then(|r| r.check_in)
            .map(|t| t.format("%H:%M").to_string())
            .unwrap_or_default()
    });
    let mut check_out = use_signal(|| {
        seed.as_ref()
            .and_then(|r| r.check_out)
            .map(|t| t.format("%H:%M").to_string())
            .unwrap_or_default()
    });
    let mut note = use_signal(|| seed.as_ref().and_then(|r| r.note.clone()).unwrap_or_default());
    let mut errors = use_signal(HashMap::<String, String>::new);
    let mut form_error = use_signal(|| Option::<String>::None);
    let mut in_flight = use_signal(|| false);

    let caller_role = auth.role().unwrap_or_default();
    let people = use_resource(move || async move {
        let mut found: Vec<StaffMember> = Vec::new();
        for role in caller_role.managed_roles() {
            if let Ok(list) = server::api::list_staff(role, StaffListParams::default()).await {
                found.extend(list.into_iter().filter(StaffMember::is_active));
            }
        }
        found
    });
    let people_options: Vec<(String, String)> = people
        .read()
        .as_ref()
        .map(|list| {
            list.iter()
                .map(|m| (m.id.to_string(), format!("{} ({})", m.name, m.role.label())))
                .collect()
        })
        .unwrap_or_default();

    let handle_save = move |_: FormEvent| {
        if in_flight() {
            return;
        }
        errors.set(HashMap::new());
        form_error.set(None);

        let mut fe = HashMap::new();
        let user_id = user.read().parse::<i64>().ok();
        if user_id.is_none() {
            fe.insert("user_id".to_string(), "Choose a person".to_string());
        }
        let date = parse_date_input(&day.read());
        if date.is_none() {
            fe.insert("date".to_string(), "Pick a date".to_string());
        }
        let (in_text, out_text) = (check_in(), check_out());
        let in_time = parse_time_input(&in_text);
        let out_time = parse_time_input(&out_text);
        if !in_text.trim().is_empty() && in_time.is_none() {
            fe.insert("check_in".to_string(), "Use HH:MM".to_string());
        }
        if !out_text.trim().is_empty() && out_time.is_none() {
            fe.insert("check_out".to_string(), "Use HH:MM".to_string());
        }
        let (Some(user_id), Some(date)) = (user_id, date) else {
            errors.set(fe);
            return;
        };
        if !fe.is_empty() {
            errors.set(fe);
            return;
        }

        let req = MarkAttendanceRequest {
            user_id,
            date,
            status: status(),
            check_in: in_time,
            check_out: out_time,
            note: opt_text(&note()),
        };
        spawn(async move {
            in_flight.set(true);
            let result = server::api::mark_attendance(req).await;
            in_flight.set(false);
            match result {
                Ok(record) => {
                    toast.success(
                        format!("{} marked {}", record.user_name, humanize(&record.status)),
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
    let editing = initial.is_some();

    rsx! {
        Sheet {
            open: true,
            on_close: move |_| on_close.call(()),
            title: "Mark attendance",
            description: Some("Saving replaces any record for the same person and day.".to_string()),

            Form { onsubmit: handle_save,
                FormError { message: form_error() }

                FormSelect {
                    label: "Person *",
                    value: user(),
                    options: people_options,
                    placeholder: Some("Choose a person".to_string()),
                    disabled: editing,
                    error: err("user_id"),
                    onchange: move |e: Event<FormData>| user.set(e.value()),
                }
                FormRow {
                    Input {
                        label: "Date *",
                        input_type: "date",
                        value: day(),
                        disabled: editing,
                        error: err("date"),
                        on_input: move |e: FormEvent| day.set(e.value()),
                    }
                    FormSelect {
                        label: "Status *",
                        value: status(),
                        options: options_from(ATTENDANCE_STATUSES),
                        error: err("status"),
                        onchange: move |e: Event<FormData>| status.set(e.value()),
                    }
                }
                FormRow {
                    Input {
                        label: "Check in",
                        input_type: "time",
                        value: check_in(),
                        error: err("check_in"),
                        on_input: move |e: FormEvent| check_in.set(e.value()),
                    }
                    Input {
                        label: "Check out",
                        input_type: "time",
                        value: check_out(),
                        error: err("check_out"),
                        on_input: move |e: FormEvent| check_out.set(e.value()),
                    }
                }
                Textarea {
                    label: "Note",
                    value: note(),
                    error: err("note"),
                    on_input: move |e: FormEvent| note.set(e.value()),
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
                        busy_label: "Saving...",
                        "Save"
                    }
                }
            }
        }
    }
}
