use crate::auth::use_auth;
use crate::format_helpers::{error_message, field_errors, format_date, opt_text};
use dioxus::prelude::*;
use shared_types::{ChangePasswordRequest, Role, StaffMember, UpdateProfileRequest};
use shared_ui::{
    use_toast, Button, ButtonVariant, Card, CardContent, CardDescription, CardHeader, CardTitle,
    DetailItem, DetailList, Form, FormActions, FormError, Input, PageActions, PageHeader,
    PageTitle, Sheet, SkeletonRows, StatusBadge, ToastOptions, UserAvatar,
};
use std::collections::HashMap;

#[component]
pub fn Profile() -> Element {
    let mut editing = use_signal(|| false);
    let mut data = use_resource(move || async move { server::api::get_profile().await });

    let loaded = data.read().clone();

    rsx! {
        PageHeader {
            PageTitle { subtitle: Some("Your details as your team sees them".to_string()), "Profile" }
            PageActions {
                Button {
                    variant: ButtonVariant::Outline,
                    disabled: !matches!(loaded, Some(Ok(_))),
                    onclick: move |_| editing.set(true),
                    "Edit profile"
                }
            }
        }

        match loaded {
            Some(Ok(me)) => rsx! {
                ProfileCard { me: me.clone() }
                ChangePasswordCard {}
                if editing() {
                    EditProfileSheet {
                        initial: me,
                        on_close: move |_| editing.set(false),
                        on_saved: move |_| data.restart(),
                    }
                }
            },
            Some(Err(e)) => rsx! {
                Card {
                    CardContent {
                        p { class: "page-error", "{error_message(&e)}" }
                    }
                }
            },
            None => rsx! {
                SkeletonRows { count: 6 }
            },
        }
    }
}

#[component]
fn ProfileCard(me: StaffMember) -> Element {
    let manager = me.manager_name.clone().unwrap_or_default();
    let phone = me.phone.clone().unwrap_or_default();

    rsx! {
        Card {
            CardHeader {
                div { class: "person-cell",
                    UserAvatar { name: me.name.clone() }
                    div { class: "person-cell-text",
                        CardTitle { "{me.name}" }
                        CardDescription { "{me.position} \u{00b7} {me.department}" }
                    }
                }
            }
            CardContent {
                DetailList {
                    DetailItem { label: "Email", value: me.email.clone() }
                    DetailItem { label: "Phone", value: phone }
                    DetailItem { label: "Role", value: me.role.label().to_string() }
                    DetailItem { label: "Department", value: me.department.clone() }
                    DetailItem { label: "Position", value: me.position.clone() }
                    DetailItem { label: "Reports to", value: manager }
                    DetailItem { label: "Joined", value: format_date(me.joined_on) }
                    DetailItem { label: "Status",
                        StatusBadge { status: me.status.clone() }
                    }
                }
            }
        }
    }
}

/// Name and phone are self-service; department and position are only
/// editable from admin upward.
#[component]
fn EditProfileSheet(
    initial: StaffMember,
    on_close: EventHandler<()>,
    on_saved: EventHandler<()>,
) -> Element {
    let mut auth = use_auth();
    let toast = use_toast();
    let mut name = use_signal(|| initial.name.clone());
    let mut phone = use_signal(|| initial.phone.clone().unwrap_or_default());
    let mut department = use_signal(|| initial.department.clone());
    let mut position = use_signal(|| initial.position.clone());
    let mut errors = use_signal(HashMap::<String, String>::new);
    let mut form_error = use_signal(|| Option::<String>::None);
    let mut in_flight = use_signal(|| false);

    let org_fields = auth.role().is_some_and(|r| r.rank() >= Role::Admin.rank());

    let handle_save = move |_: FormEvent| {
        if in_flight() {
            return;
        }
        errors.set(HashMap::new());
        form_error.set(None);
        let req = UpdateProfileRequest {
            name: name().trim().to_string(),
            phone: opt_text(&phone()),
            department: org_fields.then(|| department().trim().to_string()),
            position: org_fields.then(|| position().trim().to_string()),
        };
        spawn(async move {
            in_flight.set(true);
            let result = server::api::update_profile(req).await;
            in_flight.set(false);
            match result {
                Ok(user) => {
                    auth.set_user(user);
                    toast.success("Profile updated".to_string(), ToastOptions::new());
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
            title: "Edit profile",

            Form { onsubmit: handle_save,
                FormError { message: form_error() }

                Input {
                    label: "Name *",
                    value: name(),
                    error: err("name"),
                    on_input: move |e: FormEvent| name.set(e.value()),
                }
                Input {
                    label: "Phone",
                    input_type: "tel",
                    value: phone(),
                    error: err("phone"),
                    on_input: move |e: FormEvent| phone.set(e.value()),
                }
                Input {
                    label: "Department",
                    value: department(),
                    disabled: !org_fields,
                    error: err("department"),
                    on_input: move |e: FormEvent| department.set(e.value()),
                }
                Input {
                    label: "Position",
                    value: position(),
                    disabled: !org_fields,
                    error: err("position"),
                    on_input: move |e: FormEvent| position.set(e.value()),
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

#[component]
fn ChangePasswordCard() -> Element {
    let toast = use_toast();
    let mut current = use_signal(String::new);
    let mut next = use_signal(String::new);
    let mut confirm = use_signal(String::new);
    let mut errors = use_signal(HashMap::<String, String>::new);
    let mut form_error = use_signal(|| Option::<String>::None);
    let mut in_flight = use_signal(|| false);

    let handle_change = move |_: FormEvent| {
        if in_flight() {
            return;
        }
        errors.set(HashMap::new());
        form_error.set(None);
        if let Some(msg) = confirm_mismatch(&next(), &confirm()) {
            errors.write().insert("confirm".to_string(), msg.to_string());
            return;
        }
        let req = ChangePasswordRequest {
            current_password: current(),
            new_password: next(),
        };
        spawn(async move {
            in_flight.set(true);
            let result = server::api::change_password(req).await;
            in_flight.set(false);
            match result {
                Ok(()) => {
                    current.set(String::new());
                    next.set(String::new());
                    confirm.set(String::new());
                    toast.success("Password changed".to_string(), ToastOptions::new());
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
        Card {
            CardHeader {
                CardTitle { "Password" }
                CardDescription { "At least 8 characters." }
            }
            CardContent {
                Form { onsubmit: handle_change,
                    FormError { message: form_error() }
                    Input {
                        label: "Current password",
                        input_type: "password",
                        value: current(),
                        error: err("current_password"),
                        on_input: move |e: FormEvent| current.set(e.value()),
                    }
                    Input {
                        label: "New password",
                        input_type: "password",
                        value: next(),
                        error: err("new_password"),
                        on_input: move |e: FormEvent| next.set(e.value()),
                    }
                    Input {
                        label: "Confirm new password",
                        input_type: "password",
                        value: confirm(),
                        error: err("confirm"),
                        on_input: move |e: FormEvent| confirm.set(e.value()),
                    }
                    FormActions {
                        Button {
                            variant: ButtonVariant::Primary,
                            button_type: "submit",
                            busy: in_flight(),
                            busy_label: "Updating...",
                            "Change password"
                        }
                    }
                }
            }
        }
    }
}

fn confirm_mismatch(next: &str, confirm: &str) -> Option<&'static str> {
    (next != confirm).then_some("Passwords don't match")
}
