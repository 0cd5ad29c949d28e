use dioxus::prelude::*;

use crate::components::FieldError;

/// Native `<select>` for forms and list filters.
///
/// Options come from `options` as `(value, label)` pairs. When `placeholder`
/// is set an extra empty option is rendered first, which filters use for
/// "all".
#[component]
pub fn FormSelect(
    #[props(default)] value: String,
    #[props(default)] onchange: Option<EventHandler<Event<FormData>>>,
    #[props(default)] label: String,
    options: Vec<(String, String)>,
    #[props(default)] placeholder: Option<String>,
    #[props(default = false)] disabled: bool,
    #[props(default)] error: Option<String>,
) -> Element {
    rsx! {
        document::Link { rel: "stylesheet", href: asset!("./style.css") }
        div { class: "form-select-wrapper",
            if !label.is_empty() {
                label { class: "form-select-label", "{label}" }
            }
            select {
                class: "form-select",
                value: value.clone(),
                disabled: disabled,
                onchange: move |evt| {
                    if let Some(handler) = &onchange {
                        handler.call(evt);
                    }
                },
                if let Some(placeholder) = placeholder {
                    option { value: "", selected: value.is_empty(), "{placeholder}" }
                }
                for (opt_value, opt_label) in options {
                    option {
                        selected: opt_value == value,
                        value: "{opt_value}",
                        "{opt_label}"
                    }
                }
            }
            FieldError { message: error }
        }
    }
}

/// Turn a slice of snake_case values into select options with readable labels.
pub fn options_from(values: &[&str]) -> Vec<(String, String)> {
    values
        .iter()
        .map(|v| (v.to_string(), crate::components::humanize(v)))
        .collect()
}
