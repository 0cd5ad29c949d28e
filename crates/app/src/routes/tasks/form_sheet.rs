use crate::auth::use_auth;
use crate::format_helpers::{error_message, field_errors, opt_text, parse_date_input};
use dioxus::prelude::*;
use shared_types::{
    CreateTaskRequest, StaffListParams, StaffMember, Task, UpdateTaskRequest, TASK_PRIORITIES,
    TASK_STATUSES,
};
use shared_ui::{
    options_from, use_toast, Button, ButtonVariant, Form, FormActions, FormError, FormRow,
    FormSelect, Input, Sheet, Textarea, ToastOptions,
};
use std::collections::HashMap;

/// Create or edit a task. `initial` is `None` for a new task.
///
/// The assignee picker lists the caller and every active person in the
/// tiers below them; the server repeats the check.
#[component]
pub fn TaskFormSheet(
    initial: Option<Task>,
    on_close: EventHandler<()>,
    on_saved: EventHandler<()>,
) -> Element {
    let auth = use_auth();
    let toast = use_toast();
    let editing = initial.clone();

    let mut title = use_signal(|| editing.as_ref().map(|t| t.title.clone()).unwrap_or_default());
    let mut description = use_signal(|| {
        editing
            .as_ref()
            .and_then(|t| t.description.clone())
            .unwrap_or_default()
    });
    let mut assignee = use_signal(|| {
        editing
            .as_ref()
            .map(|t| t.assignee_id.to_string())
            .unwrap_or_default()
    });
    let mut priority = use_signal(|| {
        editing
            .as_ref()
            .map_or_else(|| "medium".to_string(), |t| t.priority.clone())
    });
    let mut status = use_signal(|| {
        editing
            .as_ref()
            .map_or_else(|| "pending".to_string(), |t| t.status.clone())
    });
    let mut due_date = use_signal(|| {
        editing
            .as_ref()
            .and_then(|t| t.due_date)
            .map(|d| d.to_string())
            .unwrap_or_default()
    });
    let mut errors = use_signal(HashMap::<String, String>::new);
    let mut form_error = use_signal(|| Option::<String>::None);
    let mut in_flight = use_signal(|| false);

    let caller_role = auth.role().unwrap_or_default();
    let caller_id = auth.user_id();

    let reports = use_resource(move || async move {
        let mut people: Vec<StaffMember> = Vec::new();
        for role in caller_role.managed_roles() {
            if let Ok(found) = server::api::list_staff(role, StaffListParams::default()).await {
                people.extend(found.into_iter().filter(StaffMember::is_active));
            }
        }
        people
    });

    let mut assignee_options = vec![(
        caller_id.map(|id| id.to_string()).unwrap_or_default(),
        "Myself".to_string(),
    )];
    if let Some(people) = reports.read().as_ref() {
        assignee_options.extend(
            people
                .iter()
                .map(|m| (m.id.to_string(), format!("{} ({})", m.name, m.role.label()))),
        );
    }
    let can_assign = !caller_role.managed_roles().is_empty();
    let task_id = initial.as_ref().map(|t| t.id);

    let handle_save = move |_: FormEvent| {
        if in_flight() {
            return;
        }
        errors.set(HashMap::new());
        form_error.set(None);

        let assignee_id = assignee.read().parse::<i64>().ok();
        let due = parse_date_input(&due_date.read());
        if !due_date.read().trim().is_empty() && due.is_none() {
            errors.set(HashMap::from([(
                "due_date".to_string(),
                "Use the YYYY-MM-DD format".to_string(),
            )]));
            return;
        }

        spawn(async move {
            in_flight.set(true);
            let result = match task_id {
                Some(id) => {
                    let req = UpdateTaskRequest {
                        title: Some(title().trim().to_string()),
                        description: Some(description().trim().to_string()),
                        assignee_id,
                        priority: Some(priority()),
                        status: Some(status()),
                        due_date: due,
                    };
                    server::api::update_task(id, req).await
                }
                None => {
                    let req = CreateTaskRequest {
                        title: title().trim().to_string(),
                        description: opt_text(&description()),
                        assignee_id: assignee_id.filter(|id| Some(*id) != caller_id),
                        priority: priority(),
                        due_date: due,
                    };
                    server::api::create_task(req).await
                }
            };
            in_flight.set(false);
            match result {
                Ok(task) => {
                    let msg = if task_id.is_some() {
                        "Task updated".to_string()
                    } else if Some(task.assignee_id) == caller_id {
                        "Task added".to_string()
                    } else {
                        format!("Task assigned to {}", task.assignee_name)
                    };
                    toast.success(msg, ToastOptions::new());
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
    let title_text = if task_id.is_some() { "Edit task" } else { "New task" };

    rsx! {
        Sheet {
            open: true,
            on_close: move |_| on_close.call(()),
            title: title_text,

            Form { onsubmit: handle_save,
                FormError { message: form_error() }

                Input {
                    label: "Title *",
                    value: title(),
                    placeholder: "e.g. Prepare onboarding checklist",
                    error: err("title"),
                    on_input: move |e: FormEvent| title.set(e.value()),
                }
                Textarea {
                    label: "Description",
                    value: description(),
                    rows: 4,
                    error: err("description"),
                    on_input: move |e: FormEvent| description.set(e.value()),
                }
                if can_assign {
                    FormSelect {
                        label: "Assignee",
                        value: assignee(),
                        options: assignee_options,
                        error: err("assignee_id"),
                        onchange: move |e: Event<FormData>| assignee.set(e.value()),
                    }
                }
                FormRow {
                    FormSelect {
                        label: "Priority",
                        value: priority(),
                        options: options_from(TASK_PRIORITIES),
                        error: err("priority"),
                        onchange: move |e: Event<FormData>| priority.set(e.value()),
                    }
                    Input {
                        label: "Due date",
                        input_type: "date",
                        value: due_date(),
                        error: err("due_date"),
                        on_input: move |e: FormEvent| due_date.set(e.value()),
                    }
                }
                if task_id.is_some() {
                    FormSelect {
                        label: "Status",
                        value: status(),
                        options: options_from(TASK_STATUSES),
                        error: err("status"),
                        onchange: move |e: Event<FormData>| status.set(e.value()),
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
                        busy_label: "Saving...",
                        if task_id.is_some() { "Save changes" } else { "Create task" }
                    }
                }
            }
        }
    }
}
