use dioxus::prelude::*;

/// Visual variant for badges.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum BadgeVariant {
    #[default]
    Primary,
    Secondary,
    Success,
    Warning,
    Destructive,
    Outline,
}

impl BadgeVariant {
    pub fn class(&self) -> &'static str {
        match self {
            BadgeVariant::Primary => "primary",
            BadgeVariant::Secondary => "secondary",
            BadgeVariant::Success => "success",
            BadgeVariant::Warning => "warning",
            BadgeVariant::Destructive => "destructive",
            BadgeVariant::Outline => "outline",
        }
    }
}

/// Colour for a status value stored as snake_case text.
///
/// Covers staff, task, leave, attendance and report statuses as well as task
/// priorities and notification kinds. Unknown values render as secondary.
pub fn status_variant(status: &str) -> BadgeVariant {
    match status {
        "active" | "completed" | "approved" | "present" | "ready" | "success" => {
            BadgeVariant::Success
        }
        "pending" | "queued" | "late" | "half_day" | "medium" | "warning" => BadgeVariant::Warning,
        "inactive" | "rejected" | "absent" | "failed" | "high" | "alert" => {
            BadgeVariant::Destructive
        }
        "in_progress" | "generating" | "info" => BadgeVariant::Primary,
        "cancelled" | "on_leave" | "low" => BadgeVariant::Outline,
        _ => BadgeVariant::Secondary,
    }
}

/// `in_progress` -> `In progress`.
pub fn humanize(value: &str) -> String {
    let spaced = value.replace('_', " ");
    let mut chars = spaced.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Inline label for counts, roles and other short text.
#[component]
pub fn Badge(
    #[props(default)] variant: BadgeVariant,
    #[props(extends = GlobalAttributes)] attributes: Vec<Attribute>,
    children: Element,
) -> Element {
    let base = vec![
        Attribute::new("class", "badge", None, false),
        Attribute::new("data-style", variant.class(), None, false),
    ];
    let merged = dioxus_primitives::merge_attributes(vec![base, attributes]);

    rsx! {
        document::Link { rel: "stylesheet", href: asset!("./style.css") }
        span {
            ..merged,
            {children}
        }
    }
}

/// Badge whose colour and text both come from a status value.
#[component]
pub fn StatusBadge(status: String) -> Element {
    let variant = status_variant(&status);
    let text = humanize(&status);

    rsx! {
        Badge { variant, title: "{status}", "{text}" }
    }
}
