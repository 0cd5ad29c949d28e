use serde::{Deserialize, Serialize};
use std::fmt;

use crate::AppError;

/// Organisational tier of a user account.
///
/// Tiers form a strict total order. A user may only act on people whose
/// tier is strictly below their own: create, edit, deactivate or delete
/// them, assign them tasks, review their leave and mark their attendance.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "snake_case")]
pub enum Role {
    SuperAdmin,
    Admin,
    Manager,
    Supervisor,
    #[default]
    Employee,
}

/// All roles, highest tier first.
pub const ALL_ROLES: [Role; 5] = [
    Role::SuperAdmin,
    Role::Admin,
    Role::Manager,
    Role::Supervisor,
    Role::Employee,
];

impl Role {
    /// Numeric tier used for comparisons. Higher outranks lower.
    pub fn rank(&self) -> u8 {
        match self {
            Role::SuperAdmin => 4,
            Role::Admin => 3,
            Role::Manager => 2,
            Role::Supervisor => 1,
            Role::Employee => 0,
        }
    }

    /// True when `self` sits strictly above `other`.
    pub fn outranks(&self, other: &Role) -> bool {
        self.rank() > other.rank()
    }

    /// Whether a user with this role may manage users holding `target`.
    pub fn can_manage(&self, target: &Role) -> bool {
        self.outranks(target)
    }

    /// Roles this role manages, highest first.
    pub fn managed_roles(&self) -> Vec<Role> {
        ALL_ROLES
            .iter()
            .copied()
            .filter(|r| self.outranks(r))
            .collect()
    }

    /// Roles strictly above this one, lowest first (nearest superiors first).
    pub fn superior_roles(&self) -> Vec<Role> {
        ALL_ROLES
            .iter()
            .rev()
            .copied()
            .filter(|r| r.outranks(self))
            .collect()
    }

    /// Lowercase snake-case form used in storage, JWT claims and URLs.
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::SuperAdmin => "super_admin",
            Role::Admin => "admin",
            Role::Manager => "manager",
            Role::Supervisor => "supervisor",
            Role::Employee => "employee",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Role::SuperAdmin => "Super Admin",
            Role::Admin => "Admin",
            Role::Manager => "Manager",
            Role::Supervisor => "Supervisor",
            Role::Employee => "Employee",
        }
    }

    /// Plural label used for directory headings.
    pub fn plural_label(&self) -> &'static str {
        match self {
            Role::SuperAdmin => "Super Admins",
            Role::Admin => "Admins",
            Role::Manager => "Managers",
            Role::Supervisor => "Supervisors",
            Role::Employee => "Employees",
        }
    }

    /// URL slug for the directory page of this role (`/directory/{slug}`).
    pub fn slug(&self) -> &'static str {
        match self {
            Role::SuperAdmin => "super-admins",
            Role::Admin => "admins",
            Role::Manager => "managers",
            Role::Supervisor => "supervisors",
            Role::Employee => "employees",
        }
    }

    pub fn from_slug(slug: &str) -> Option<Role> {
        ALL_ROLES.iter().copied().find(|r| r.slug() == slug)
    }

    /// Parse the storage form. Accepts a few spellings users type by hand.
    pub fn parse(s: &str) -> Result<Role, AppError> {
        match s.trim().to_lowercase().replace(['-', ' '], "_").as_str() {
            "super_admin" | "superadmin" => Ok(Role::SuperAdmin),
            "admin" => Ok(Role::Admin),
            "manager" => Ok(Role::Manager),
            "supervisor" => Ok(Role::Supervisor),
            "employee" => Ok(Role::Employee),
            other => Err(AppError::bad_request(format!("Unknown role: {other}"))),
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<String> for Role {
    type Error = AppError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Role::parse(&value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ranks_are_strictly_ordered() {
        for pair in ALL_ROLES.windows(2) {
            assert!(pair[0].outranks(&pair[1]), "{} should outrank {}", pair[0], pair[1]);
            assert!(!pair[1].outranks(&pair[0]));
        }
    }

    #[test]
    fn nobody_manages_their_own_tier() {
        for role in ALL_ROLES {
            assert!(!role.can_manage(&role));
        }
    }

    #[test]
    fn employee_manages_nobody() {
        assert!(Role::Employee.managed_roles().is_empty());
    }

    #[test]
    fn managed_roles_highest_first() {
        assert_eq!(
            Role::Admin.managed_roles(),
            vec![Role::Manager, Role::Supervisor, Role::Employee]
        );
        assert_eq!(Role::Supervisor.managed_roles(), vec![Role::Employee]);
    }

    #[test]
    fn superior_roles_nearest_first() {
        assert_eq!(
            Role::Supervisor.superior_roles(),
            vec![Role::Manager, Role::Admin, Role::SuperAdmin]
        );
        assert!(Role::SuperAdmin.superior_roles().is_empty());
    }

    #[test]
    fn parse_accepts_common_spellings() {
        assert_eq!(Role::parse("super_admin").unwrap(), Role::SuperAdmin);
        assert_eq!(Role::parse("Super Admin").unwrap(), Role::SuperAdmin);
        assert_eq!(Role::parse("super-admin").unwrap(), Role::SuperAdmin);
        assert_eq!(Role::parse(" MANAGER ").unwrap(), Role::Manager);
    }

    #[test]
    fn parse_rejects_unknown() {
        let err = Role::parse("intern").unwrap_err();
        assert_eq!(err.kind, crate::AppErrorKind::BadRequest);
    }

    #[test]
    fn storage_form_round_trips() {
        for role in ALL_ROLES {
            assert_eq!(Role::parse(role.as_str()).unwrap(), role);
            assert_eq!(Role::from_slug(role.slug()), Some(role));
        }
    }

    #[test]
    fn serde_uses_snake_case() {
        let json = serde_json::to_string(&Role::SuperAdmin).unwrap();
        assert_eq!(json, "\"super_admin\"");
    }
}
