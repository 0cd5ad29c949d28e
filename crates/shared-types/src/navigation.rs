//! Static sidebar table keyed by role.
//!
//! The same table gates the API: a request touching a section that is not
//! in the caller's table is rejected with 403.

use serde::{Deserialize, Serialize};

use crate::Role;

/// A top-level area of the dashboard.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "snake_case")]
pub enum Section {
    Dashboard,
    /// Personnel directory for one role tier.
    Directory(Role),
    Tasks,
    Leave,
    Attendance,
    Reports,
    Notifications,
    Profile,
    Settings,
}

impl Section {
    pub fn path(&self) -> String {
        match self {
            Section::Dashboard => "/".to_string(),
            Section::Directory(role) => format!("/directory/{}", role.slug()),
            Section::Tasks => "/tasks".to_string(),
            Section::Leave => "/leave".to_string(),
            Section::Attendance => "/attendance".to_string(),
            Section::Reports => "/reports".to_string(),
            Section::Notifications => "/notifications".to_string(),
            Section::Profile => "/profile".to_string(),
            Section::Settings => "/settings".to_string(),
        }
    }

    fn label_for(&self, role: Role) -> String {
        let own = role == Role::Employee;
        match self {
            Section::Dashboard => "Dashboard".into(),
            Section::Directory(r) => r.plural_label().into(),
            Section::Tasks if own => "My Tasks".into(),
            Section::Tasks => "Tasks".into(),
            Section::Leave if own => "My Leave".into(),
            Section::Leave => "Leave".into(),
            Section::Attendance if own => "My Attendance".into(),
            Section::Attendance => "Attendance".into(),
            Section::Reports => "Reports".into(),
            Section::Notifications => "Notifications".into(),
            Section::Profile => "Profile".into(),
            Section::Settings => "Settings".into(),
        }
    }
}

/// One sidebar entry.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct NavItem {
    pub section: Section,
    pub label: String,
    pub path: String,
}

fn sections_for(role: Role) -> Vec<Section> {
    use Section::*;
    match role {
        Role::SuperAdmin => vec![
            Dashboard,
            Directory(Role::Admin),
            Directory(Role::Manager),
            Directory(Role::Supervisor),
            Directory(Role::Employee),
            Reports,
            Notifications,
            Profile,
            Settings,
        ],
        Role::Admin => vec![
            Dashboard,
            Directory(Role::Manager),
            Directory(Role::Supervisor),
            Directory(Role::Employee),
            Tasks,
            Leave,
            Attendance,
            Reports,
            Notifications,
            Profile,
            Settings,
        ],
        Role::Manager => vec![
            Dashboard,
            Directory(Role::Supervisor),
            Directory(Role::Employee),
            Tasks,
            Leave,
            Attendance,
            Reports,
            Notifications,
            Profile,
            Settings,
        ],
        Role::Supervisor => vec![
            Dashboard,
            Directory(Role::Employee),
            Tasks,
            Leave,
            Attendance,
            Notifications,
            Profile,
            Settings,
        ],
        Role::Employee => vec![
            Dashboard,
            Tasks,
            Leave,
            Attendance,
            Notifications,
            Profile,
            Settings,
        ],
    }
}

/// Ordered sidebar entries for a role.
pub fn nav_for(role: Role) -> Vec<NavItem> {
    sections_for(role)
        .into_iter()
        .map(|section| NavItem {
            label: section.label_for(role),
            path: section.path(),
            section,
        })
        .collect()
}

/// Whether `section` appears in the role's table.
pub fn can_access(role: Role, section: Section) -> bool {
    sections_for(role).contains(&section)
}
