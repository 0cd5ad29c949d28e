use dioxus::prelude::*;

use crate::routes::Route;

/// Catch-all for paths outside the route table.
#[component]
pub fn NotFound(route: Vec<String>) -> Element {
    let path = requested_path(&route);

    rsx! {
        document::Link { rel: "stylesheet", href: asset!("./not_found.css") }

        div { class: "not-found-page",
            div { class: "not-found-card",
                div { class: "not-found-code", "404" }
                h1 { class: "not-found-title", "Nothing here" }
                p { class: "not-found-message",
                    "There is no page at "
                    code { "{path}" }
                    "."
                }
                Link { to: Route::Dashboard {}, class: "not-found-link", "Go to dashboard" }
            }
        }
    }
}

fn requested_path(segments: &[String]) -> String {
    format!("/{}", segments.join("/"))
}
