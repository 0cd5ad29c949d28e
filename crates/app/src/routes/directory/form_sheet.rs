use crate::auth::use_auth;
use crate::format_helpers::{error_message, field_errors, opt_text, parse_date_input};
use dioxus::prelude::*;
use shared_types::{CreateStaffRequest, Role, StaffListParams, StaffMember, UpdateStaffRequest};
use shared_ui::{
    use_toast, Button, ButtonVariant, Form, FormActions, FormError, FormRow, FormSelect, Input,
    Sheet, ToastOptions,
};
use std::collections::HashMap;

#[derive(Clone, Copy, PartialEq)]
pub enum FormMode {
    Create,
    Edit,
}

/// Create/edit form for one person, rendered inside a Sheet.
///
/// `role` is the directory the sheet was opened from and the default role
/// for new people. The role picker offers only tiers the caller outranks.
/// The parent mounts the sheet only while it is open, so the fields start
/// from `initial` every time.
#[component]
pub fn StaffFormSheet(
    mode: FormMode,
    role: Role,
    initial: Option<StaffMember>,
    on_close: EventHandler<()>,
    on_saved: EventHandler<()>,
) -> Element {
    let auth = use_auth();
    let toast = use_toast();

    let seed = initial.clone();
    let mut name = use_signal(|| seed.as_ref().map(|m| m.name.clone()).unwrap_or_default());
    let mut email = use_signal(|| seed.as_ref().map(|m| m.email.clone()).unwrap_or_default());
    let mut phone = use_signal(|| {
        seed.as_ref()
            .and_then(|m| m.phone.clone())
            .unwrap_or_default()
    });
    let mut role_key =
        use_signal(|| seed.as_ref().map_or(role, |m| m.role).as_str().to_string());
    let mut department =
        use_signal(|| seed.as_ref().map(|m| m.department.clone()).unwrap_or_default());
    let mut position = use_signal(|| seed.as_ref().map(|m| m.position.clone()).unwrap_or_default());
    let mut manager = use_signal(|| {
        seed.as_ref()
            .and_then(|m| m.manager_id)
            .map(|id| id.to_string())
            .unwrap_or_default()
    });
    let mut joined_on = use_signal(String::new);
    let mut password = use_signal(String::new);
    let mut errors = use_signal(HashMap::<String, String>::new);
    let mut form_error = use_signal(|| Option::<String>::None);
    let mut in_flight = use_signal(|| false);

    let caller_role = auth.role().unwrap_or_default();
    let caller_id = auth.user_id();
    let caller_name = auth
        .current_user
        .read()
        .as_ref()
        .map(|u| u.name.clone())
        .unwrap_or_default();

    // Anyone above the selected role who is visible to the caller, plus the
    // caller themselves.
    let managers = use_resource(move || {
        let selected = Role::parse(&role_key.read()).unwrap_or(role);
        async move {
            let mut found = Vec::new();
            for r in caller_role.managed_roles() {
                if !r.outranks(&selected) {
                    continue;
                }
                if let Ok(people) = server::api::list_staff(r, StaffListParams::default()).await {
                    found.extend(people.into_iter().filter(StaffMember::is_active));
                }
            }
            found
        }
    });

    let editing_id = initial.as_ref().map(|m| m.id);
    let mut manager_options: Vec<(String, String)> = Vec::new();
    if let Some(id) = caller_id {
        manager_options.push((id.to_string(), format!("{caller_name} (you)")));
    }
    if let Some(people) = managers.read().as_ref() {
        for m in people.iter().filter(|m| Some(m.id) != editing_id) {
            manager_options.push((m.id.to_string(), format!("{} ({})", m.name, m.role.label())));
        }
    }

    let role_options: Vec<(String, String)> = caller_role
        .managed_roles()
        .into_iter()
        .map(|r| (r.as_str().to_string(), r.label().to_string()))
        .collect();

    let handle_save = move |_: FormEvent| {
        if in_flight() {
            return;
        }
        errors.set(HashMap::new());
        form_error.set(None);

        let Ok(selected_role) = Role::parse(&role_key.read()) else {
            errors.set(HashMap::from([("role".to_string(), "Choose a role".to_string())]));
            return;
        };
        let manager_id = manager.read().parse::<i64>().ok();
        let id = editing_id;

        spawn(async move {
            in_flight.set(true);
            let result = match (mode, id) {
                (FormMode::Edit, Some(id)) => {
                    let req = UpdateStaffRequest {
                        name: Some(name().trim().to_string()),
                        email: Some(email().trim().to_string()),
                        phone: opt_text(&phone()),
                        role: Some(selected_role),
                        department: Some(department().trim().to_string()),
                        position: Some(position().trim().to_string()),
                        manager_id,
                    };
                    server::api::update_staff(id, req).await
                }
                _ => {
                    let req = CreateStaffRequest {
                        name: name().trim().to_string(),
                        email: email().trim().to_string(),
                        phone: opt_text(&phone()),
                        role: selected_role,
                        department: department().trim().to_string(),
                        position: position().trim().to_string(),
                        password: password(),
                        manager_id,
                        joined_on: parse_date_input(&joined_on()),
                    };
                    server::api::create_staff(req).await
                }
            };
            in_flight.set(false);
            match result {
                Ok(member) => {
                    let msg = match mode {
                        FormMode::Create => format!("{} added", member.name),
                        FormMode::Edit => format!("{} updated", member.name),
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

    let (title, submit_label) = match mode {
        FormMode::Create => (format!("New {}", role.label()), "Create"),
        FormMode::Edit => ("Edit person".to_string(), "Save changes"),
    };
    let err = move |field: &str| errors.read().get(field).cloned();

    rsx! {
        Sheet {
            open: true,
            on_close: move |_| on_close.call(()),
            title,
            description: Some("Fields marked * are required.".to_string()),

            Form { onsubmit: handle_save,
                FormError { message: form_error() }

                Input {
                    label: "Name *",
                    value: name(),
                    error: err("name"),
                    on_input: move |e: FormEvent| name.set(e.value()),
                }
                FormRow {
                    Input {
                        label: "Email *",
                        input_type: "email",
                        value: email(),
                        error: err("email"),
                        on_input: move |e: FormEvent| email.set(e.value()),
                    }
                    Input {
                        label: "Phone",
                        input_type: "tel",
                        value: phone(),
                        error: err("phone"),
                        on_input: move |e: FormEvent| phone.set(e.value()),
                    }
                }
                FormRow {
                    FormSelect {
                        label: "Role *",
                        value: role_key(),
                        options: role_options,
                        error: err("role"),
                        onchange: move |e: Event<FormData>| {
                            role_key.set(e.value());
                            manager.set(String::new());
                        },
                    }
                    FormSelect {
                        label: "Manager",
                        value: manager(),
                        options: manager_options,
                        placeholder: Some("No manager".to_string()),
                        error: err("manager_id"),
                        onchange: move |e: Event<FormData>| manager.set(e.value()),
                    }
                }
                FormRow {
                    Input {
                        label: "Department *",
                        value: department(),
                        error: err("department"),
                        on_input: move |e: FormEvent| department.set(e.value()),
                    }
                    Input {
                        label: "Position *",
                        value: position(),
                        error: err("position"),
                        on_input: move |e: FormEvent| position.set(e.value()),
                    }
                }
                if mode == FormMode::Create {
                    FormRow {
                        Input {
                            label: "Joined on",
                            input_type: "date",
                            value: joined_on(),
                            error: err("joined_on"),
                            on_input: move |e: FormEvent| joined_on.set(e.value()),
                        }
                        Input {
                            label: "Initial password *",
                            input_type: "password",
                            placeholder: "At least 8 characters",
                            value: password(),
                            error: err("password"),
                            on_input: move |e: FormEvent| password.set(e.value()),
                        }
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
                        "{submit_label}"
                    }
                }
            }
        }
    }
}
