use dioxus::prelude::*;

/// Vertical list of label/value rows for read-only records.
#[component]
pub fn DetailList(children: Element) -> Element {
    rsx! {
        document::Link { rel: "stylesheet", href: asset!("./style.css") }
        dl { class: "detail-list", {children} }
    }
}

/// One label/value row inside a `DetailList`.
///
/// Plain text goes in `value`; badges and links go in children. An empty
/// value with no children renders a dash.
#[component]
pub fn DetailItem(
    label: String,
    #[props(default)] value: String,
    children: Element,
) -> Element {
    let has_children = children != Ok(VNode::placeholder());
    let shown = if value.trim().is_empty() {
        "\u{2014}".to_string()
    } else {
        value
    };

    rsx! {
        div { class: "detail-item",
            dt { class: "detail-item-label", "{label}" }
            dd { class: "detail-item-value",
                if has_children {
                    {children}
                } else {
                    "{shown}"
                }
            }
        }
    }
}
