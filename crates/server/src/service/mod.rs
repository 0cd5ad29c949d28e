//! Business rules shared by the REST handlers and the server functions.
//!
//! Every operation takes the application state and the acting user, checks
//! the caller against the role table and the rank ordering, then calls into
//! `repo`.

pub mod account;
pub mod attendance;
pub mod dashboard;
pub mod leave;
pub mod notification;
pub mod report;
pub mod staff;
pub mod task;

use chrono::{NaiveDate, Utc};
use shared_types::{can_access, AppError, Role, Section, StaffMember};
use sqlx::SqlitePool;
use std::collections::HashMap;

/// Reject callers whose sidebar does not include `section`.
pub fn require_section(actor: &StaffMember, section: Section) -> Result<(), AppError> {
    if can_access(actor.role, section) {
        Ok(())
    } else {
        Err(AppError::forbidden(format!(
            "{} accounts cannot use this section",
            actor.role.label()
        )))
    }
}

/// Reject callers who do not strictly outrank `target`.
pub fn require_outranks(actor: &StaffMember, target: Role, action: &str) -> Result<(), AppError> {
    if actor.role.can_manage(&target) {
        Ok(())
    } else {
        Err(AppError::forbidden(format!(
            "{} accounts cannot {action} {} accounts",
            actor.role.label(),
            target.label()
        )))
    }
}

/// Reject a filter value that is not in `allowed`.
pub fn check_filter(field: &str, value: Option<&str>, allowed: &[&str]) -> Result<(), AppError> {
    match value {
        Some(v) if !allowed.contains(&v) => Err(AppError::bad_request(format!(
            "Invalid {field} '{v}'. Expected one of: {}",
            allowed.join(", ")
        ))),
        _ => Ok(()),
    }
}

/// Current calendar day.
pub fn today() -> NaiveDate {
    Utc::now().date_naive()
}

/// Who the actor may see and act on: themselves plus everyone of lower rank.
#[derive(Debug, Clone)]
pub struct Visibility {
    actor_id: i64,
    actor_role: Role,
    roles: HashMap<i64, Role>,
}

impl Visibility {
    pub async fn load(pool: &SqlitePool, actor: &StaffMember) -> Result<Self, AppError> {
        let roles = sqlx::query_as::<_, (i64, String)>("SELECT id, role FROM users")
            .fetch_all(pool)
            .await
            .map_err(crate::error_convert::SqlxErrorExt::into_app_error)?
            .into_iter()
            .filter_map(|(id, role)| Role::parse(&role).ok().map(|r| (id, r)))
            .collect();
        Ok(Self::new(actor, roles))
    }

    pub fn new(actor: &StaffMember, roles: HashMap<i64, Role>) -> Self {
        Self {
            actor_id: actor.id,
            actor_role: actor.role,
            roles,
        }
    }

    pub fn role_of(&self, user_id: i64) -> Option<Role> {
        self.roles.get(&user_id).copied()
    }

    /// Strictly lower rank than the actor.
    pub fn manages(&self, user_id: i64) -> bool {
        self.role_of(user_id)
            .is_some_and(|role| self.actor_role.can_manage(&role))
    }

    pub fn sees(&self, user_id: i64) -> bool {
        user_id == self.actor_id || self.manages(user_id)
    }

    pub fn is_self(&self, user_id: i64) -> bool {
        user_id == self.actor_id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn member(id: i64, role: Role) -> StaffMember {
        let now = Utc::now();
        StaffMember {
            id,
            name: format!("User {id}"),
            email: format!("u{id}@staffdesk.test"),
            phone: None,
            role,
            department: "Ops".into(),
            position: "Staff".into(),
            status: "active".into(),
            manager_id: None,
            manager_name: None,
            joined_on: now.date_naive(),
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn manager_sees_self_and_lower_ranks_only() {
        let roles = HashMap::from([
            (1, Role::Admin),
            (2, Role::Manager),
            (3, Role::Manager),
            (4, Role::Supervisor),
            (5, Role::Employee),
        ]);
        let vis = Visibility::new(&member(2, Role::Manager), roles);
        assert!(vis.sees(2));
        assert!(!vis.manages(2));
        assert!(!vis.sees(1));
        assert!(!vis.sees(3));
        assert!(vis.manages(4));
        assert!(vis.manages(5));
        assert!(!vis.sees(99));
    }

    #[test]
    fn section_gate_follows_nav_table() {
        assert!(require_section(&member(1, Role::Employee), Section::Tasks).is_ok());
        assert!(require_section(&member(1, Role::Employee), Section::Reports).is_err());
        assert!(require_section(&member(1, Role::SuperAdmin), Section::Tasks).is_err());
    }

    #[test]
    fn outrank_gate_rejects_peers() {
        let sup = member(1, Role::Supervisor);
        assert!(require_outranks(&sup, Role::Employee, "edit").is_ok());
        let err = require_outranks(&sup, Role::Supervisor, "edit").unwrap_err();
        assert_eq!(err.status_code(), 403);
    }

    #[test]
    fn filter_values_checked() {
        assert!(check_filter("status", None, &["a"]).is_ok());
        assert!(check_filter("status", Some("a"), &["a"]).is_ok());
        assert_eq!(
            check_filter("status", Some("b"), &["a"]).unwrap_err().status_code(),
            400
        );
    }
}
