use dioxus::prelude::*;

/// Form wrapper that prevents the browser's default submission.
#[component]
pub fn Form(
    #[props(default)] onsubmit: EventHandler<FormEvent>,
    #[props(extends = GlobalAttributes)] attributes: Vec<Attribute>,
    children: Element,
) -> Element {
    let base = vec![Attribute::new("class", "form", None, false)];
    let merged = dioxus_primitives::merge_attributes(vec![base, attributes]);

    rsx! {
        document::Link { rel: "stylesheet", href: asset!("./style.css") }
        form {
            onsubmit: move |evt| {
                evt.prevent_default();
                onsubmit.call(evt);
            },
            ..merged,
            {children}
        }
    }
}

/// Two-column row of fields that collapses to one column on narrow screens.
#[component]
pub fn FormRow(children: Element) -> Element {
    rsx! {
        div { class: "form-row", {children} }
    }
}

/// Right-aligned row of form buttons.
#[component]
pub fn FormActions(children: Element) -> Element {
    rsx! {
        div { class: "form-actions", {children} }
    }
}

/// Error banner for messages that don't belong to a single field.
#[component]
pub fn FormError(message: Option<String>) -> Element {
    match message {
        Some(message) if !message.is_empty() => rsx! {
            div { class: "form-error", role: "alert", "{message}" }
        },
        _ => rsx! {},
    }
}

/// Inline message under a field. Renders nothing without a message.
#[component]
pub fn FieldError(message: Option<String>) -> Element {
    match message {
        Some(message) if !message.is_empty() => rsx! {
            span { class: "field-error", "{message}" }
        },
        _ => rsx! {},
    }
}
