use crate::auth::use_auth;
use crate::format_helpers::{error_message, format_opt_date};
use chrono::Utc;
use dioxus::prelude::*;
use shared_types::{filter_by_query, Task, TaskListParams, TASK_STATUSES};
use shared_ui::{
    options_from, toast_result, use_toast, Badge, BadgeVariant, Button, ButtonSize, ButtonVariant,
    Card, CardContent, DataTable, DataTableBody, DataTableCell, DataTableColumn, DataTableEmpty,
    DataTableHeader, DataTableRow, FormSelect, PageActions, PageHeader, PageTitle, SearchBar,
    SkeletonRows, StatusBadge,
};

use super::form_sheet::TaskFormSheet;

/// Tasks visible to the caller: their own, ones they assigned, and those of
/// the people below them.
#[component]
pub fn Tasks() -> Element {
    let auth = use_auth();
    let mut query = use_signal(String::new);
    let mut status = use_signal(String::new);
    let mut mine_only = use_signal(|| false);
    // `Some(None)` opens the sheet for a new task.
    let mut sheet = use_signal(|| Option::<Option<Task>>::None);

    let mut data = use_resource(move || {
        let status = status.read().clone();
        let assignee_id = if mine_only() { auth.user_id() } else { None };
        async move {
            let params = TaskListParams {
                q: None,
                status: (!status.is_empty()).then_some(status),
                assignee_id,
            };
            server::api::list_tasks(params).await
        }
    });

    let mut status_options = vec![(String::new(), "All statuses".to_string())];
    status_options.extend(options_from(TASK_STATUSES));
    let manages_people = auth
        .role()
        .is_some_and(|r| !r.managed_roles().is_empty());
    let mine_variant = if mine_only() {
        ButtonVariant::Secondary
    } else {
        ButtonVariant::Outline
    };

    rsx! {
        PageHeader {
            PageTitle { subtitle: Some("Assign work and track progress".to_string()), "Tasks" }
            PageActions {
                Button {
                    variant: ButtonVariant::Primary,
                    onclick: move |_| sheet.set(Some(None)),
                    "New task"
                }
            }
        }

        SearchBar {
            value: query(),
            placeholder: "Search title, assignee, priority...",
            on_search: move |q: String| query.set(q),
            FormSelect {
                value: status(),
                options: status_options,
                onchange: move |e: Event<FormData>| status.set(e.value()),
            }
            if manages_people {
                Button {
                    variant: mine_variant,
                    onclick: move |_| mine_only.set(!mine_only()),
                    "Assigned to me"
                }
            }
        }

        match &*data.read() {
            Some(Ok(tasks)) => {
                let tasks = filter_by_query(tasks.clone(), &query.read());
                rsx! {
                    TaskTable {
                        tasks,
                        on_edit: move |t: Task| sheet.set(Some(Some(t))),
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

        if let Some(initial) = sheet() {
            TaskFormSheet {
                initial,
                on_close: move |_| sheet.set(None),
                on_saved: move |_| data.restart(),
            }
        }
    }
}

#[component]
fn TaskTable(tasks: Vec<Task>, on_edit: EventHandler<Task>, on_changed: EventHandler<()>) -> Element {
    rsx! {
        DataTable {
            DataTableHeader {
                DataTableColumn { "Task" }
                DataTableColumn { "Assignee" }
                DataTableColumn { "Priority" }
                DataTableColumn { "Due" }
                DataTableColumn { "Status" }
                DataTableColumn { "" }
            }
            DataTableBody {
                if tasks.is_empty() {
                    DataTableEmpty { colspan: 6, message: "No tasks here yet." }
                }
                for task in tasks {
                    TaskRow { key: "{task.id}", task, on_edit, on_changed }
                }
            }
        }
    }
}

#[component]
fn TaskRow(task: Task, on_edit: EventHandler<Task>, on_changed: EventHandler<()>) -> Element {
    let auth = use_auth();
    let toast = use_toast();
    let mut busy = use_signal(|| false);
    let mut confirm_delete = use_signal(|| false);

    let id = task.id;
    let me = auth.user_id();
    // Someone else's task assigned to the caller allows status changes only.
    let can_edit = task.assigned_by == me || Some(task.assignee_id) != me;
    let overdue = task.is_overdue(Utc::now().date_naive());
    let edit_target = task.clone();

    let change_status = move |e: Event<FormData>| {
        let next = e.value();
        spawn(async move {
            busy.set(true);
            let result = server::api::set_task_status(id, next).await;
            busy.set(false);
            if toast_result(toast, &result.map_err(|e| error_message(&e)), "Status updated") {
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
            let result = server::api::delete_task(id).await;
            busy.set(false);
            confirm_delete.set(false);
            if toast_result(toast, &result.map_err(|e| error_message(&e)), "Task deleted") {
                on_changed.call(());
            }
        });
    };

    rsx! {
        DataTableRow { muted: task.is_completed(),
            DataTableCell {
                div { class: "task-cell",
                    span { class: "task-cell-title", "{task.title}" }
                    if let Some(desc) = &task.description {
                        span { class: "task-cell-sub", "{desc}" }
                    }
                }
            }
            DataTableCell {
                div { class: "task-cell",
                    span { "{task.assignee_name}" }
                    if let Some(by) = task.assigned_by_name.as_ref().filter(|_| !task.is_personal()) {
                        span { class: "task-cell-sub", "from {by}" }
                    }
                }
            }
            DataTableCell {
                StatusBadge { status: task.priority.clone() }
            }
            DataTableCell {
                span { "{format_opt_date(task.due_date)}" }
                if overdue {
                    Badge { variant: BadgeVariant::Destructive, "Overdue" }
                }
            }
            DataTableCell {
                FormSelect {
                    value: task.status.clone(),
                    options: options_from(TASK_STATUSES),
                    disabled: busy(),
                    onchange: change_status,
                }
            }
            DataTableCell {
                if can_edit {
                    div { class: "row-actions",
                        Button {
                            variant: ButtonVariant::Ghost,
                            size: ButtonSize::Small,
                            onclick: move |_| on_edit.call(edit_target.clone()),
                            "Edit"
                        }
                        Button {
                            variant: ButtonVariant::Destructive,
                            size: ButtonSize::Small,
                            disabled: busy(),
                            onclick: delete,
                            if confirm_delete() { "Confirm delete" } else { "Delete" }
                        }
                    }
                }
            }
        }
    }
}
