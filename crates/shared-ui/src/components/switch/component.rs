use dioxus::prelude::*;
use dioxus_primitives::switch as prim;

#[component]
pub fn Switch(mut props: prim::SwitchProps) -> Element {
    props
        .attributes
        .push(Attribute::new("class", "switch", None, false));

    rsx! {
        document::Link { rel: "stylesheet", href: asset!("./style.css") }
        prim::Switch { ..props }
    }
}

#[component]
pub fn SwitchThumb(mut props: prim::SwitchThumbProps) -> Element {
    props
        .attributes
        .push(Attribute::new("class", "switch-thumb", None, false));

    rsx! {
        prim::SwitchThumb { ..props }
    }
}

/// A switch with a label and optional help text, laid out as a settings row.
#[component]
pub fn SwitchField(
    label: String,
    #[props(default)] description: Option<String>,
    checked: bool,
    on_change: EventHandler<bool>,
) -> Element {
    rsx! {
        div { class: "switch-field",
            div { class: "switch-field-text",
                span { class: "switch-field-label", "{label}" }
                if let Some(description) = description {
                    span { class: "switch-field-description", "{description}" }
                }
            }
            Switch {
                checked: checked,
                on_checked_change: move |value: bool| on_change.call(value),
                SwitchThumb {}
            }
        }
    }
}
