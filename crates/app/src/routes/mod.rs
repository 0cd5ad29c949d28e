pub mod attendance;
pub mod dashboard;
pub mod directory;
pub mod leave;
pub mod login;
pub mod not_found;
pub mod notifications;
pub mod profile;
pub mod reports;
pub mod settings;
pub mod tasks;

use crate::auth::use_auth;
use dioxus::prelude::*;
use dioxus_free_icons::icons::ld_icons::{
    LdBell, LdBriefcase, LdCalendar, LdClock, LdFileText, LdLayoutDashboard, LdLogOut, LdMoon,
    LdSettings, LdSun, LdUserCheck, LdUsers,
};
use dioxus_free_icons::Icon;
use shared_types::{NavItem, Role, Section};
use shared_ui::theme::{Theme, ThemeState};
use shared_ui::{
    Badge, BadgeVariant, Sidebar, SidebarContent, SidebarFooter, SidebarHeader, SidebarInset,
    SidebarMenu, SidebarMenuButton, SidebarMenuItem, SidebarProvider, SidebarSeparator,
    SidebarTrigger, UserAvatar,
};

use attendance::Attendance;
use dashboard::Dashboard;
use directory::Directory;
use leave::Leave;
use login::Login;
use not_found::NotFound;
use notifications::Notifications;
use profile::Profile;
use reports::Reports;
use settings::Settings;
use tasks::Tasks;

/// Application routes.
#[derive(Clone, Routable, Debug, PartialEq)]
pub enum Route {
    #[route("/login")]
    Login {},
    #[layout(AuthGuard)]
    #[layout(AppLayout)]
    #[route("/")]
    Dashboard {},
    #[route("/directory/:role")]
    Directory { role: String },
    #[route("/tasks")]
    Tasks {},
    #[route("/leave")]
    Leave {},
    #[route("/attendance")]
    Attendance {},
    #[route("/reports")]
    Reports {},
    #[route("/notifications")]
    Notifications {},
    #[route("/profile")]
    Profile {},
    #[route("/settings")]
    Settings {},
    #[end_layout]
    #[end_layout]
    #[route("/:..route")]
    NotFound { route: Vec<String> },
}

impl Route {
    /// The sidebar section this route belongs to, if any.
    pub fn section(&self) -> Option<Section> {
        match self {
            Route::Dashboard {} => Some(Section::Dashboard),
            Route::Directory { role } => Role::from_slug(role).map(Section::Directory),
            Route::Tasks {} => Some(Section::Tasks),
            Route::Leave {} => Some(Section::Leave),
            Route::Attendance {} => Some(Section::Attendance),
            Route::Reports {} => Some(Section::Reports),
            Route::Notifications {} => Some(Section::Notifications),
            Route::Profile {} => Some(Section::Profile),
            Route::Settings {} => Some(Section::Settings),
            Route::Login {} | Route::NotFound { .. } => None,
        }
    }

    /// Route for a sidebar section.
    pub fn for_section(section: Section) -> Route {
        match section {
            Section::Dashboard => Route::Dashboard {},
            Section::Directory(role) => Route::Directory {
                role: role.slug().to_string(),
            },
            Section::Tasks => Route::Tasks {},
            Section::Leave => Route::Leave {},
            Section::Attendance => Route::Attendance {},
            Section::Reports => Route::Reports {},
            Section::Notifications => Route::Notifications {},
            Section::Profile => Route::Profile {},
            Section::Settings => Route::Settings {},
        }
    }
}

/// Unread notification count shown in the sidebar and header. Pages that
/// change read state restart it.
#[derive(Clone, Copy)]
pub struct UnreadBadge(pub Resource<i64>);

impl UnreadBadge {
    pub fn refresh(mut self) {
        self.0.restart();
    }
}

/// Redirects to /login when there is no session.
///
/// `use_server_future` with `?` suspends during SSR until the session check
/// resolves; the `SuspenseBoundary` in `App` shows the loading state.
#[component]
fn AuthGuard() -> Element {
    let mut auth = use_auth();

    let resource = use_server_future(move || async move { server::api::get_current_user().await })?;
    let result = resource.read().as_ref().cloned();

    match result {
        Some(Ok(Some(user))) => {
            if !auth.is_authenticated() {
                auth.set_user(user);
            }
            rsx! { Outlet::<Route> {} }
        }
        Some(Ok(None)) | Some(Err(_)) => {
            auth.clear_auth();
            navigator().push(Route::Login {});
            rsx! {
                div { class: "auth-guard-loading",
                    p { "Redirecting to login..." }
                }
            }
        }
        None => rsx! {
            div { class: "auth-guard-loading",
                p { "Loading..." }
            }
        },
    }
}

/// Shell with the role's sidebar and a header bar.
///
/// Routes outside the user's navigation table render an access notice
/// instead of the page, matching the 403 the API would return.
#[component]
fn AppLayout() -> Element {
    let route: Route = use_route();
    let mut auth = use_auth();
    let mut theme: ThemeState = use_context();

    let unread = use_resource(move || async move {
        server::api::get_unread_count()
            .await
            .map(|c| c.count)
            .unwrap_or(0)
    });
    use_context_provider(|| UnreadBadge(unread));

    // Apply the stored theme once per sign-in.
    use_effect(move || {
        spawn(async move {
            if let Ok(settings) = server::api::get_settings().await {
                theme.set(Theme::from_key(&settings.theme));
            }
        });
    });

    let Some(user) = auth.current_user.read().clone() else {
        return rsx! {};
    };
    let unread_count = unread.read().as_ref().copied().unwrap_or(0);

    let allowed = route
        .section()
        .map(|section| user.nav.iter().any(|item| item.section == section))
        .unwrap_or(false);
    let page_title = route
        .section()
        .and_then(|section| user.nav.iter().find(|item| item.section == section))
        .map(|item| item.label.clone())
        .unwrap_or_else(|| "StaffDesk".to_string());
    let is_dark = theme.current().is_dark();

    rsx! {
        document::Link { rel: "stylesheet", href: asset!("./layout.css") }

        SidebarProvider { default_open: false,
            Sidebar {
                SidebarHeader {
                    div { class: "sidebar-brand",
                        span { class: "sidebar-brand-mark", "SD" }
                        span { class: "sidebar-brand-name", "StaffDesk" }
                    }
                }

                SidebarSeparator {}

                SidebarContent {
                    SidebarMenu {
                        for item in user.nav.iter() {
                            NavEntry {
                                key: "{item.path}",
                                active: route.section() == Some(item.section),
                                count: (item.section == Section::Notifications).then_some(unread_count),
                                item: item.clone(),
                            }
                        }
                    }
                }

                SidebarFooter {
                    div { class: "sidebar-user",
                        UserAvatar { name: user.name.clone() }
                        div { class: "sidebar-user-text",
                            span { class: "sidebar-user-name", "{user.name}" }
                            span { class: "sidebar-user-role", "{user.role.label()}" }
                        }
                    }
                }
            }

            SidebarInset {
                header { class: "app-header",
                    SidebarTrigger {
                        span { class: "app-header-trigger", "\u{2630}" }
                    }
                    h2 { class: "app-header-title", "{page_title}" }
                    div { class: "app-header-spacer" }
                    Badge { variant: BadgeVariant::Outline, "{user.role.label()}" }
                    button {
                        class: "app-header-icon",
                        r#type: "button",
                        "aria-label": "Toggle theme",
                        onclick: move |_| theme.toggle(),
                        if is_dark {
                            Icon::<LdSun> { icon: LdSun, width: 18, height: 18 }
                        } else {
                            Icon::<LdMoon> { icon: LdMoon, width: 18, height: 18 }
                        }
                    }
                    Link { to: Route::Notifications {}, class: "app-header-icon",
                        Icon::<LdBell> { icon: LdBell, width: 18, height: 18 }
                        if unread_count > 0 {
                            span { class: "app-header-dot", "{unread_count}" }
                        }
                    }
                    button {
                        class: "app-header-icon",
                        r#type: "button",
                        "aria-label": "Sign out",
                        onclick: move |_| {
                            spawn(async move {
                                if let Err(e) = server::api::logout().await {
                                    tracing::warn!(error = %e, "Logout request failed");
                                }
                            });
                            auth.clear_auth();
                            theme.set(Theme::default());
                            navigator().push(Route::Login {});
                        },
                        Icon::<LdLogOut> { icon: LdLogOut, width: 18, height: 18 }
                    }
                }

                div { class: "page-content",
                    if allowed {
                        Outlet::<Route> {}
                    } else {
                        AccessDenied {}
                    }
                }
            }
        }
    }
}

#[component]
fn NavEntry(item: NavItem, active: bool, count: Option<i64>) -> Element {
    let target = Route::for_section(item.section);
    rsx! {
        SidebarMenuItem {
            Link { to: target,
                SidebarMenuButton { active, count,
                    NavIcon { section: item.section }
                    span { "{item.label}" }
                }
            }
        }
    }
}

#[component]
fn NavIcon(section: Section) -> Element {
    match section {
        Section::Dashboard => rsx! {
            Icon::<LdLayoutDashboard> { icon: LdLayoutDashboard, width: 18, height: 18 }
        },
        Section::Directory(_) => rsx! {
            Icon::<LdUsers> { icon: LdUsers, width: 18, height: 18 }
        },
        Section::Tasks => rsx! {
            Icon::<LdBriefcase> { icon: LdBriefcase, width: 18, height: 18 }
        },
        Section::Leave => rsx! {
            Icon::<LdCalendar> { icon: LdCalendar, width: 18, height: 18 }
        },
        Section::Attendance => rsx! {
            Icon::<LdClock> { icon: LdClock, width: 18, height: 18 }
        },
        Section::Reports => rsx! {
            Icon::<LdFileText> { icon: LdFileText, width: 18, height: 18 }
        },
        Section::Notifications => rsx! {
            Icon::<LdBell> { icon: LdBell, width: 18, height: 18 }
        },
        Section::Profile => rsx! {
            Icon::<LdUserCheck> { icon: LdUserCheck, width: 18, height: 18 }
        },
        Section::Settings => rsx! {
            Icon::<LdSettings> { icon: LdSettings, width: 18, height: 18 }
        },
    }
}

#[component]
fn AccessDenied() -> Element {
    rsx! {
        div { class: "access-denied",
            h1 { "Not available" }
            p { "This area isn't part of your role's workspace." }
            Link { to: Route::Dashboard {}, "Back to dashboard" }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared_types::{nav_for, ALL_ROLES};

    #[test]
    fn every_nav_entry_has_a_route() {
        for role in ALL_ROLES {
            for item in nav_for(role) {
                let route = Route::for_section(item.section);
                assert_eq!(route.section(), Some(item.section));
                assert_eq!(route.to_string(), item.path, "{role} {}", item.label);
            }
        }
    }

    #[test]
    fn unknown_directory_slug_has_no_section() {
        let route = Route::Directory {
            role: "interns".to_string(),
        };
        assert_eq!(route.section(), None);
    }
}
