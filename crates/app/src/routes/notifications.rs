use crate::auth::use_auth;
use crate::format_helpers::{error_message, field_errors, format_datetime, plural};
use crate::routes::UnreadBadge;
use dioxus::prelude::*;
use shared_types::{
    BroadcastRequest, Notification, NotificationListParams, Role, NOTIFICATION_KINDS,
};
use shared_ui::{
    options_from, toast_result, use_toast, Button, ButtonSize, ButtonVariant, Card, CardContent,
    Form, FormActions, FormError, FormSelect, Input, PageActions, PageHeader, PageTitle,
    SearchBar, Sheet, SkeletonRows, StatusBadge, SwitchField, Textarea, ToastOptions,
};
use std::collections::HashMap;

/// The caller's inbox, newest first. Admins and above can also broadcast
/// to whole role tiers.
#[component]
pub fn Notifications() -> Element {
    let auth = use_auth();
    let toast = use_toast();
    let badge: UnreadBadge = use_context();
    let mut query = use_signal(String::new);
    let mut unread_only = use_signal(|| false);
    let mut show_broadcast = use_signal(|| false);

    let mut data = use_resource(move || {
        let params = NotificationListParams {
            unread_only: unread_only(),
            q: None,
        };
        async move { server::api::list_notifications(params).await }
    });

    let mut refresh = move || {
        data.restart();
        badge.refresh();
    };

    let can_broadcast = auth
        .role()
        .is_some_and(|r| matches!(r, Role::SuperAdmin | Role::Admin));

    let mark_all = move |_: MouseEvent| {
        spawn(async move {
            let result = server::api::mark_all_notifications_read().await;
            match result {
                Ok(n) => {
                    toast.success(
                        format!("{} marked as read", plural(n as i64, "notification")),
                        ToastOptions::new(),
                    );
                    refresh();
                }
                Err(e) => toast.error(error_message(&e), ToastOptions::new()),
            }
        });
    };

    let filter_variant = if unread_only() {
        ButtonVariant::Secondary
    } else {
        ButtonVariant::Outline
    };

    rsx! {
        PageHeader {
            PageTitle { "Notifications" }
            PageActions {
                Button { variant: ButtonVariant::Outline, onclick: mark_all, "Mark all read" }
                if can_broadcast {
                    Button {
                        variant: ButtonVariant::Primary,
                        onclick: move |_| show_broadcast.set(true),
                        "Broadcast"
                    }
                }
            }
        }

        SearchBar {
            value: query(),
            placeholder: "Search notifications...",
            on_search: move |q: String| query.set(q),
            Button {
                variant: filter_variant,
                onclick: move |_| unread_only.set(!unread_only()),
                "Unread only"
            }
        }

        match &*data.read() {
            Some(Ok(items)) => {
                let items = shared_types::filter_by_query(items.clone(), &query.read());
                if items.is_empty() {
                    rsx! {
                        Card {
                            CardContent {
                                p { class: "empty-state", "You're all caught up." }
                            }
                        }
                    }
                } else {
                    rsx! {
                        ul { class: "notification-list",
                            for item in items {
                                NotificationItem {
                                    key: "{item.id}",
                                    item,
                                    on_changed: move |_| refresh(),
                                }
                            }
                        }
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
                SkeletonRows { count: 4 }
            },
        }

        if show_broadcast() {
            BroadcastSheet { on_close: move |_| show_broadcast.set(false) }
        }
    }
}

#[component]
fn NotificationItem(item: Notification, on_changed: EventHandler<()>) -> Element {
    let toast = use_toast();
    let id = item.id;
    let unread = !item.read;

    let mark_read = move |_: MouseEvent| {
        spawn(async move {
            let result = server::api::mark_notification_read(id).await;
            if let Err(e) = &result {
                toast.error(error_message(e), ToastOptions::new());
            } else {
                on_changed.call(());
            }
        });
    };

    let delete = move |_: MouseEvent| {
        spawn(async move {
            let result = server::api::delete_notification(id).await;
            if toast_result(toast, &result.map_err(|e| error_message(&e)), "Notification deleted") {
                on_changed.call(());
            }
        });
    };

    rsx! {
        li {
            class: "notification-item",
            "data-unread": if unread { "true" } else { "false" },
            div { class: "notification-body",
                div { class: "notification-heading",
                    StatusBadge { status: item.kind.clone() }
                    span { class: "notification-title", "{item.title}" }
                }
                p { class: "notification-message", "{item.message}" }
                span { class: "notification-time", "{format_datetime(item.created_at)}" }
            }
            div { class: "row-actions",
                if unread {
                    Button {
                        variant: ButtonVariant::Ghost,
                        size: ButtonSize::Small,
                        onclick: mark_read,
                        "Mark read"
                    }
                }
                Button {
                    variant: ButtonVariant::Ghost,
                    size: ButtonSize::Small,
                    onclick: delete,
                    "Delete"
                }
            }
        }
    }
}

#[component]
fn BroadcastSheet(on_close: EventHandler<()>) -> Element {
    let auth = use_auth();
    let toast = use_toast();
    let mut title = use_signal(String::new);
    let mut message = use_signal(String::new);
    let mut kind = use_signal(|| "info".to_string());
    let mut roles = use_signal(Vec::<Role>::new);
    let mut errors = use_signal(HashMap::<String, String>::new);
    let mut form_error = use_signal(|| Option::<String>::None);
    let mut in_flight = use_signal(|| false);

    let targets = auth.role().map(|r| r.managed_roles()).unwrap_or_default();

    let handle_send = move |_: FormEvent| {
        if in_flight() {
            return;
        }
        errors.set(HashMap::new());
        form_error.set(None);
        let req = BroadcastRequest {
            title: title().trim().to_string(),
            message: message().trim().to_string(),
            kind: kind(),
            roles: roles(),
        };
        spawn(async move {
            in_flight.set(true);
            let result = server::api::broadcast(req).await;
            in_flight.set(false);
            match result {
                Ok(resp) => {
                    let who = if resp.recipients == 1 { "person" } else { "people" };
                    toast.success(
                        format!("Sent to {} {who}", resp.recipients),
                        ToastOptions::new(),
                    );
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
            title: "Broadcast",
            description: Some("Leave every tier unticked to reach everyone below you.".to_string()),

            Form { onsubmit: handle_send,
                FormError { message: form_error() }

                Input {
                    label: "Title *",
                    value: title(),
                    error: err("title"),
                    on_input: move |e: FormEvent| title.set(e.value()),
                }
                Textarea {
                    label: "Message *",
                    value: message(),
                    rows: 4,
                    error: err("message"),
                    on_input: move |e: FormEvent| message.set(e.value()),
                }
                FormSelect {
                    label: "Kind",
                    value: kind(),
                    options: options_from(NOTIFICATION_KINDS),
                    error: err("kind"),
                    onchange: move |e: Event<FormData>| kind.set(e.value()),
                }
                div { class: "form-group",
                    span { class: "form-group-label", "Recipients" }
                    for role in targets {
                        SwitchField {
                            key: "{role.as_str()}",
                            label: role.plural_label().to_string(),
                            checked: roles.read().contains(&role),
                            on_change: move |on: bool| {
                                let mut selected = roles.write();
                                selected.retain(|r| *r != role);
                                if on {
                                    selected.push(role);
                                }
                            },
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
                        busy_label: "Sending...",
                        "Send"
                    }
                }
            }
        }
    }
}
