use dioxus::prelude::*;

use crate::components::BadgeVariant;

/// Bordered surface for grouping related content.
#[component]
pub fn Card(
    #[props(extends = GlobalAttributes)] attributes: Vec<Attribute>,
    children: Element,
) -> Element {
    let base = vec![Attribute::new("class", "card", None, false)];
    let merged = dioxus_primitives::merge_attributes(vec![base, attributes]);

    rsx! {
        document::Link { rel: "stylesheet", href: asset!("./style.css") }
        div {
            ..merged,
            {children}
        }
    }
}

#[component]
pub fn CardHeader(
    #[props(extends = GlobalAttributes)] attributes: Vec<Attribute>,
    children: Element,
) -> Element {
    let base = vec![Attribute::new("class", "card-header", None, false)];
    let merged = dioxus_primitives::merge_attributes(vec![base, attributes]);

    rsx! {
        div {
            ..merged,
            {children}
        }
    }
}

#[component]
pub fn CardTitle(children: Element) -> Element {
    rsx! {
        h3 { class: "card-title", {children} }
    }
}

#[component]
pub fn CardDescription(children: Element) -> Element {
    rsx! {
        p { class: "card-description", {children} }
    }
}

#[component]
pub fn CardContent(
    #[props(extends = GlobalAttributes)] attributes: Vec<Attribute>,
    children: Element,
) -> Element {
    let base = vec![Attribute::new("class", "card-content", None, false)];
    let merged = dioxus_primitives::merge_attributes(vec![base, attributes]);

    rsx! {
        div {
            ..merged,
            {children}
        }
    }
}

#[component]
pub fn CardFooter(children: Element) -> Element {
    rsx! {
        div { class: "card-footer", {children} }
    }
}

/// Dashboard tile: a label, a large figure and an optional hint line.
///
/// `tone` tints the figure using the badge palette so a count of overdue
/// tasks can read as a warning next to neutral totals.
#[component]
pub fn StatCard(
    label: String,
    value: String,
    #[props(default)] hint: Option<String>,
    #[props(default = BadgeVariant::Secondary)] tone: BadgeVariant,
    #[props(default)] onclick: Option<EventHandler<MouseEvent>>,
) -> Element {
    let clickable = onclick.is_some();

    rsx! {
        document::Link { rel: "stylesheet", href: asset!("./style.css") }
        div {
            class: if clickable { "card stat-card clickable" } else { "card stat-card" },
            onclick: move |evt| {
                if let Some(handler) = &onclick {
                    handler.call(evt);
                }
            },
            span { class: "stat-card-label", "{label}" }
            span { class: "stat-card-value", "data-tone": tone.class(), "{value}" }
            if let Some(hint) = hint {
                span { class: "stat-card-hint", "{hint}" }
            }
        }
    }
}

/// Responsive grid of stat tiles.
#[component]
pub fn StatGrid(children: Element) -> Element {
    rsx! {
        div { class: "stat-grid", {children} }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stat_card_renders_value_and_hint() {
        fn app() -> Element {
            rsx! {
                StatCard {
                    label: "Overdue tasks",
                    value: "3",
                    hint: Some("across 2 people".to_string()),
                    tone: BadgeVariant::Warning,
                }
            }
        }
        let mut dom = VirtualDom::new(app);
        dom.rebuild_in_place();
        let html = dioxus_ssr::render(&dom);
        assert!(html.contains("Overdue tasks"));
        assert!(html.contains(">3<"));
        assert!(html.contains("across 2 people"));
        assert!(html.contains(r#"data-tone="warning""#));
        assert!(!html.contains("clickable"));
    }
}
