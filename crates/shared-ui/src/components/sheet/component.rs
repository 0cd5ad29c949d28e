use dioxus::prelude::*;

/// Which edge of the screen the sheet slides in from.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum SheetSide {
    #[default]
    Right,
    Left,
}

impl SheetSide {
    fn class(&self) -> &'static str {
        match self {
            SheetSide::Right => "right",
            SheetSide::Left => "left",
        }
    }
}

/// Sliding side panel used for create and edit forms.
///
/// Clicking the overlay or the close button calls `on_close`. The sheet
/// renders nothing while `open` is false, so form state held by the caller
/// survives a close and reopen.
#[component]
pub fn Sheet(
    open: bool,
    on_close: EventHandler<()>,
    title: String,
    #[props(default)] description: Option<String>,
    #[props(default)] side: SheetSide,
    children: Element,
) -> Element {
    if !open {
        return rsx! {};
    }

    rsx! {
        document::Link { rel: "stylesheet", href: asset!("./style.css") }
        div {
            class: "sheet-overlay",
            onclick: move |_| on_close.call(()),
            div {
                class: "sheet-panel",
                role: "dialog",
                "aria-modal": "true",
                "data-side": side.class(),
                onclick: move |evt| evt.stop_propagation(),
                div { class: "sheet-header",
                    div {
                        h2 { class: "sheet-title", "{title}" }
                        if let Some(description) = description {
                            p { class: "sheet-description", "{description}" }
                        }
                    }
                    button {
                        class: "sheet-close",
                        r#type: "button",
                        "aria-label": "Close",
                        onclick: move |_| on_close.call(()),
                        "\u{2715}"
                    }
                }
                div { class: "sheet-content", {children} }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn closed_sheet_renders_nothing() {
        fn app() -> Element {
            rsx! {
                Sheet { open: false, on_close: |_| {}, title: "New task", "body" }
            }
        }
        let mut dom = VirtualDom::new(app);
        dom.rebuild_in_place();
        let html = dioxus_ssr::render(&dom);
        assert!(!html.contains("New task"));
    }

    #[test]
    fn open_sheet_renders_title_and_body() {
        fn app() -> Element {
            rsx! {
                Sheet {
                    open: true,
                    on_close: |_| {},
                    title: "New task",
                    description: Some("Assign work to your team.".to_string()),
                    p { "body" }
                }
            }
        }
        let mut dom = VirtualDom::new(app);
        dom.rebuild_in_place();
        let html = dioxus_ssr::render(&dom);
        assert!(html.contains("New task"));
        assert!(html.contains("Assign work to your team."));
        assert!(html.contains("<p>body</p>"));
    }
}
