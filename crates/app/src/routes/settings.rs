use crate::format_helpers::{error_message, field_errors};
use dioxus::prelude::*;
use shared_types::{language_label, UpdateSettingsRequest, UserSettings, LANGUAGES};
use shared_ui::theme::{Theme, ThemeState, ALL_THEMES};
use shared_ui::{
    use_toast, Button, ButtonVariant, Card, CardContent, CardDescription, CardFooter, CardHeader,
    CardTitle, Form, FormError, FormRow, FormSelect, PageHeader, PageTitle, SkeletonRows,
    SwitchField, ToastOptions,
};
use std::collections::HashMap;

const COMMON_TIMEZONES: &[&str] = &[
    "UTC",
    "Europe/London",
    "Europe/Berlin",
    "America/New_York",
    "America/Chicago",
    "America/Los_Angeles",
    "Asia/Kolkata",
    "Asia/Singapore",
    "Australia/Sydney",
];

#[component]
pub fn Settings() -> Element {
    let data = use_resource(move || async move { server::api::get_settings().await });

    rsx! {
        PageHeader {
            PageTitle { subtitle: Some("Appearance and notification preferences".to_string()), "Settings" }
        }

        match &*data.read() {
            Some(Ok(settings)) => rsx! {
                SettingsForm { initial: settings.clone() }
            },
            Some(Err(e)) => rsx! {
                Card {
                    CardContent {
                        p { class: "page-error", "{error_message(e)}" }
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
fn SettingsForm(initial: UserSettings) -> Element {
    let toast = use_toast();
    let mut theme_state: ThemeState = use_context();
    let saved_theme = Theme::from_key(&initial.theme);

    let mut theme = use_signal(|| saved_theme.as_str().to_string());
    let mut language = use_signal(|| initial.language.clone());
    let mut timezone = use_signal(|| initial.timezone.clone());
    let mut email_notifications = use_signal(|| initial.email_notifications);
    let mut push_notifications = use_signal(|| initial.push_notifications);
    let mut weekly_digest = use_signal(|| initial.weekly_digest);
    let mut errors = use_signal(HashMap::<String, String>::new);
    let mut form_error = use_signal(|| Option::<String>::None);
    let mut in_flight = use_signal(|| false);

    let handle_save = move |_: FormEvent| {
        if in_flight() {
            return;
        }
        errors.set(HashMap::new());
        form_error.set(None);
        let req = UpdateSettingsRequest {
            theme: theme(),
            language: language(),
            timezone: timezone().trim().to_string(),
            email_notifications: email_notifications(),
            push_notifications: push_notifications(),
            weekly_digest: weekly_digest(),
        };
        spawn(async move {
            in_flight.set(true);
            let result = server::api::update_settings(req).await;
            in_flight.set(false);
            match result {
                Ok(saved) => {
                    theme_state.set(Theme::from_key(&saved.theme));
                    toast.success("Settings saved".to_string(), ToastOptions::new());
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
    let theme_options: Vec<(String, String)> = ALL_THEMES
        .iter()
        .map(|t| (t.as_str().to_string(), t.display_name().to_string()))
        .collect();
    let language_options: Vec<(String, String)> = LANGUAGES
        .iter()
        .map(|code| (code.to_string(), language_label(code).to_string()))
        .collect();
    let timezone_options = timezone_options(&timezone.read());

    rsx! {
        Form { onsubmit: handle_save,
            FormError { message: form_error() }

            Card {
                CardHeader {
                    CardTitle { "Appearance" }
                    CardDescription { "Theme changes apply as soon as you pick one." }
                }
                CardContent {
                    FormRow {
                        FormSelect {
                            label: "Theme",
                            value: theme(),
                            options: theme_options,
                            error: err("theme"),
                            onchange: move |e: Event<FormData>| {
                                let picked = e.value();
                                theme_state.set(Theme::from_key(&picked));
                                theme.set(picked);
                            },
                        }
                        FormSelect {
                            label: "Language",
                            value: language(),
                            options: language_options,
                            error: err("language"),
                            onchange: move |e: Event<FormData>| language.set(e.value()),
                        }
                    }
                    FormSelect {
                        label: "Timezone",
                        value: timezone(),
                        options: timezone_options,
                        error: err("timezone"),
                        onchange: move |e: Event<FormData>| timezone.set(e.value()),
                    }
                }
            }

            Card {
                CardHeader {
                    CardTitle { "Notifications" }
                }
                CardContent {
                    SwitchField {
                        label: "Email notifications",
                        description: Some("Approvals, assignments and broadcasts by email.".to_string()),
                        checked: email_notifications(),
                        on_change: move |on: bool| email_notifications.set(on),
                    }
                    SwitchField {
                        label: "Push notifications",
                        description: Some("Browser alerts while StaffDesk is open.".to_string()),
                        checked: push_notifications(),
                        on_change: move |on: bool| push_notifications.set(on),
                    }
                    SwitchField {
                        label: "Weekly digest",
                        description: Some("A Monday summary of your team's week.".to_string()),
                        checked: weekly_digest(),
                        on_change: move |on: bool| weekly_digest.set(on),
                    }
                }
                CardFooter {
                    Button {
                        variant: ButtonVariant::Primary,
                        button_type: "submit",
                        busy: in_flight(),
                        busy_label: "Saving...",
                        "Save settings"
                    }
                }
            }
        }
    }
}

/// Common zones plus the current value when it is not one of them.
fn timezone_options(current: &str) -> Vec<(String, String)> {
    let mut options: Vec<(String, String)> = COMMON_TIMEZONES
        .iter()
        .map(|tz| (tz.to_string(), tz.replace('_', " ")))
        .collect();
    let current = current.trim();
    if !current.is_empty() && !COMMON_TIMEZONES.contains(&current) {
        options.push((current.to_string(), current.replace('_', " ")));
    }
    options
}
