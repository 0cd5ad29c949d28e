use crate::auth::use_auth;
use crate::format_helpers::{error_message, format_percent, plural};
use crate::routes::Route;
use dioxus::prelude::*;
use shared_types::{DashboardStats, Role, Section, TASK_STATUSES};
use shared_ui::{
    humanize, BadgeVariant, Card, CardContent, CardDescription, CardHeader, CardTitle, PageHeader,
    PageTitle, SkeletonRows, StatCard, StatGrid,
};

/// Landing page. Every figure is scoped to what the signed-in role can see,
/// and cards for sections outside the role's sidebar are left out.
#[component]
pub fn Dashboard() -> Element {
    let auth = use_auth();
    let stats = use_resource(move || async move { server::api::get_dashboard_stats().await });

    let greeting = auth
        .current_user
        .read()
        .as_ref()
        .map(|u| format!("Welcome back, {}", u.name))
        .unwrap_or_default();

    rsx! {
        PageHeader {
            PageTitle { subtitle: Some(greeting), "Dashboard" }
        }

        match &*stats.read() {
            Some(Ok(stats)) => rsx! {
                DashboardBody { stats: stats.clone() }
            },
            Some(Err(e)) => rsx! {
                Card {
                    CardContent {
                        p { class: "page-error", "{error_message(e)}" }
                    }
                }
            },
            None => rsx! {
                SkeletonRows { count: 4 }
            },
        }
    }
}

#[component]
fn DashboardBody(stats: DashboardStats) -> Element {
    let auth = use_auth();
    let role = stats.role;
    let managed = role.managed_roles();
    let today = &stats.attendance_today;
    let tasks_label = if role == Role::Employee { "My open tasks" } else { "Open tasks" };
    let tasks_tone = attention(stats.overdue_tasks, BadgeVariant::Warning);
    let approvals_tone = attention(stats.pending_approvals, BadgeVariant::Primary);
    let unread_tone = attention(stats.unread_notifications, BadgeVariant::Primary);

    rsx! {
        StatGrid {
            if !managed.is_empty() {
                StatCard {
                    label: "People",
                    value: stats.total_staff().to_string(),
                    hint: Some(format!("{} active, {} inactive", stats.active_staff, stats.inactive_staff)),
                }
            }
            if auth.can_see(Section::Tasks) {
                StatCard {
                    label: tasks_label,
                    value: stats.open_tasks().to_string(),
                    hint: Some(format!("{} overdue", stats.overdue_tasks)),
                    tone: tasks_tone,
                    onclick: move |_| { navigator().push(Route::Tasks {}); },
                }
            }
            if auth.can_see(Section::Leave) && !managed.is_empty() {
                StatCard {
                    label: "Pending approvals",
                    value: stats.pending_approvals.to_string(),
                    hint: Some("Leave requests awaiting review".to_string()),
                    tone: approvals_tone,
                    onclick: move |_| { navigator().push(Route::Leave {}); },
                }
            }
            if auth.can_see(Section::Leave) {
                StatCard {
                    label: "Leave balance",
                    value: plural(stats.leave_balance.remaining, "day"),
                    hint: Some(format!(
                        "{} of {} used in {}",
                        stats.leave_balance.used, stats.leave_balance.allowance, stats.leave_balance.year
                    )),
                }
            }
            StatCard {
                label: "Unread notifications",
                value: stats.unread_notifications.to_string(),
                tone: unread_tone,
                onclick: move |_| { navigator().push(Route::Notifications {}); },
            }
        }

        div { class: "dashboard-panels",
            if !managed.is_empty() {
                Card {
                    CardHeader {
                        CardTitle { "Headcount" }
                        CardDescription { "People you manage, by role" }
                    }
                    CardContent {
                        ul { class: "dashboard-breakdown",
                            for r in managed.iter().copied() {
                                li { key: "{r.as_str()}",
                                    span { "{r.plural_label()}" }
                                    strong { "{stats.headcount.get(r.as_str()).copied().unwrap_or(0)}" }
                                }
                            }
                        }
                    }
                }
            }

            if auth.can_see(Section::Tasks) {
                Card {
                    CardHeader {
                        CardTitle { "Tasks by status" }
                    }
                    CardContent {
                        ul { class: "dashboard-breakdown",
                            for status in TASK_STATUSES.iter() {
                                li { key: "{status}",
                                    span { "{humanize(status)}" }
                                    strong { "{stats.tasks_by_status.get(*status).copied().unwrap_or(0)}" }
                                }
                            }
                        }
                    }
                }
            }

            if auth.can_see(Section::Attendance) {
                Card {
                    CardHeader {
                        CardTitle { "Attendance today" }
                        CardDescription {
                            "{format_percent(today.attendance_rate())} attendance, {today.unmarked} not yet marked"
                        }
                    }
                    CardContent {
                        ul { class: "dashboard-breakdown",
                            li { span { "Present" } strong { "{today.present}" } }
                            li { span { "Late" } strong { "{today.late}" } }
                            li { span { "Half day" } strong { "{today.half_day}" } }
                            li { span { "On leave" } strong { "{today.on_leave}" } }
                            li { span { "Absent" } strong { "{today.absent}" } }
                        }
                    }
                }
            }
        }
    }
}

/// Highlight a card only when its count needs attention.
fn attention(count: i64, tone: BadgeVariant) -> BadgeVariant {
    if count > 0 {
        tone
    } else {
        BadgeVariant::Secondary
    }
}
