use serde::{Deserialize, Serialize};

#[cfg(feature = "validation")]
use validator::Validate;

use crate::{nav_for, NavItem, Role, StaffMember};

/// Authenticated user info (safe to send to the client).
///
/// This is the role context the UI shares through the component tree.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct AuthUser {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub role: Role,
    pub department: String,
    pub position: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    /// Sidebar entries for `role`.
    #[serde(default)]
    pub nav: Vec<NavItem>,
}

impl From<StaffMember> for AuthUser {
    fn from(m: StaffMember) -> Self {
        Self {
            nav: nav_for(m.role),
            id: m.id,
            name: m.name,
            email: m.email,
            role: m.role,
            department: m.department,
            position: m.position,
            phone: m.phone,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[cfg_attr(feature = "validation", derive(Validate))]
pub struct LoginRequest {
    #[cfg_attr(
        feature = "validation",
        validate(email(message = "Valid email is required"))
    )]
    pub email: String,
    #[cfg_attr(
        feature = "validation",
        validate(length(min = 1, message = "Password is required"))
    )]
    pub password: String,
}

/// Response returned after a successful login or refresh.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct AuthResponse {
    pub user: AuthUser,
    pub access_token: String,
    pub refresh_token: String,
}

/// Refresh token request (used by REST clients without cookies).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct RefreshRequest {
    pub refresh_token: String,
}

/// Generic message response.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// One row on the login page's demo panel.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct DemoAccount {
    pub role: Role,
    pub name: String,
    pub email: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn auth_user_carries_role_navigation() {
        let now = Utc::now();
        let member = StaffMember {
            id: 3,
            name: "Priya Shah".into(),
            email: "priya@staffdesk.test".into(),
            phone: None,
            role: Role::Supervisor,
            department: "Support".into(),
            position: "Shift Supervisor".into(),
            status: "active".into(),
            manager_id: Some(2),
            manager_name: Some("Maria Lopez".into()),
            joined_on: now.date_naive(),
            created_at: now,
            updated_at: now,
        };
        let user = AuthUser::from(member);
        assert_eq!(user.role, Role::Supervisor);
        assert_eq!(user.nav, nav_for(Role::Supervisor));
    }

    #[test]
    fn auth_user_deserializes_without_nav() {
        let json = r#"{"id":1,"name":"A","email":"a@b.c","role":"admin","department":"HR","position":"Head"}"#;
        let user: AuthUser = serde_json::from_str(json).unwrap();
        assert_eq!(user.role, Role::Admin);
        assert!(user.nav.is_empty());
    }
}
