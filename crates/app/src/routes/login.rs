use crate::auth::use_auth;
use crate::format_helpers::{error_message, field_errors};
use crate::routes::Route;
use dioxus::prelude::*;
use shared_types::{DemoAccount, FeatureFlags};
use shared_ui::{
    Badge, BadgeVariant, Button, ButtonVariant, Card, CardContent, CardDescription, CardFooter,
    CardHeader, CardTitle, Form, FormError, Input,
};
use std::collections::HashMap;

/// Email/password sign-in. With demo accounts enabled, a panel lists one
/// account per role; picking one fills in the email.
#[component]
pub fn Login() -> Element {
    let mut auth = use_auth();
    let flags: FeatureFlags = use_context();
    let mut email = use_signal(String::new);
    let mut password = use_signal(String::new);
    let mut error_msg = use_signal(|| Option::<String>::None);
    let mut errors = use_signal(HashMap::<String, String>::new);
    let mut loading = use_signal(|| false);

    let demo_enabled = flags.demo_accounts;
    let demo = use_server_future(move || async move {
        if demo_enabled {
            server::api::get_demo_accounts().await.unwrap_or_default()
        } else {
            Vec::new()
        }
    })?;
    let demo_accounts = demo.read().as_ref().cloned().unwrap_or_default();

    if auth.is_authenticated() {
        navigator().push(Route::Dashboard {});
    }

    let handle_login = move |_: FormEvent| async move {
        if loading() {
            return;
        }
        loading.set(true);
        error_msg.set(None);
        errors.set(HashMap::new());

        match server::api::login(email().trim().to_string(), password()).await {
            Ok(user) => {
                auth.set_user(user);
                navigator().push(Route::Dashboard {});
            }
            Err(e) => {
                let fe = field_errors(&e);
                if fe.is_empty() {
                    error_msg.set(Some(error_message(&e)));
                } else {
                    errors.set(fe);
                }
            }
        }
        loading.set(false);
    };

    rsx! {
        document::Link { rel: "stylesheet", href: asset!("./login.css") }

        div { class: "auth-page",
            div { class: "auth-brand",
                span { class: "auth-brand-mark", "SD" }
                span { class: "auth-brand-name", "StaffDesk" }
            }

            Card { class: "auth-card",
                CardHeader {
                    CardTitle { "Sign in" }
                    CardDescription { "Use your work email and password." }
                }

                CardContent {
                    FormError { message: error_msg() }

                    Form { onsubmit: handle_login,
                        Input {
                            label: "Email",
                            input_type: "email",
                            placeholder: "you@company.com",
                            required: true,
                            value: email(),
                            error: errors.read().get("email").cloned(),
                            on_input: move |e: FormEvent| email.set(e.value()),
                        }
                        Input {
                            label: "Password",
                            input_type: "password",
                            required: true,
                            value: password(),
                            error: errors.read().get("password").cloned(),
                            on_input: move |e: FormEvent| password.set(e.value()),
                        }
                        Button {
                            variant: ButtonVariant::Primary,
                            button_type: "submit",
                            busy: loading(),
                            busy_label: "Signing in...",
                            class: "auth-submit",
                            "Sign in"
                        }
                    }
                }

                if !demo_accounts.is_empty() {
                    CardFooter {
                        DemoAccounts {
                            accounts: demo_accounts,
                            on_pick: move |addr: String| {
                                email.set(addr);
                                errors.set(HashMap::new());
                                error_msg.set(None);
                            },
                        }
                    }
                }
            }
        }
    }
}

#[component]
fn DemoAccounts(accounts: Vec<DemoAccount>, on_pick: EventHandler<String>) -> Element {
    rsx! {
        div { class: "auth-demo",
            p { class: "auth-demo-title", "Demo accounts" }
            p { class: "auth-demo-hint", "All demo accounts share the configured demo password." }
            ul { class: "auth-demo-list",
                for account in accounts {
                    li { key: "{account.email}",
                        button {
                            class: "auth-demo-item",
                            r#type: "button",
                            onclick: {
                                let addr = account.email.clone();
                                move |_| on_pick.call(addr.clone())
                            },
                            Badge { variant: BadgeVariant::Outline, "{account.role.label()}" }
                            span { class: "auth-demo-name", "{account.name}" }
                            span { class: "auth-demo-email", "{account.email}" }
                        }
                    }
                }
            }
        }
    }
}
