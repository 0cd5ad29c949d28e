use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

#[cfg(feature = "validation")]
use validator::Validate;

use crate::{Role, Searchable};

/// Valid account status values matching the DB CHECK constraint.
pub const STAFF_STATUSES: &[&str] = &["active", "inactive"];

pub fn is_valid_staff_status(s: &str) -> bool {
    STAFF_STATUSES.contains(&s)
}

/// A person in the organisation. Every account is a staff member.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[cfg_attr(feature = "server", derive(sqlx::FromRow))]
pub struct StaffMember {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    #[cfg_attr(feature = "server", sqlx(try_from = "String"))]
    pub role: Role,
    pub department: String,
    pub position: String,
    pub status: String,
    pub manager_id: Option<i64>,
    /// Joined from the manager's row.
    #[serde(default)]
    pub manager_name: Option<String>,
    pub joined_on: NaiveDate,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl StaffMember {
    pub fn is_active(&self) -> bool {
        self.status == "active"
    }

    /// Up to two uppercase initials for avatars.
    pub fn initials(&self) -> String {
        self.name
            .split_whitespace()
            .filter_map(|w| w.chars().next())
            .take(2)
            .flat_map(char::to_uppercase)
            .collect()
    }
}

impl Searchable for StaffMember {
    fn search_fields(&self) -> Vec<&str> {
        let mut fields = vec![
            self.name.as_str(),
            self.email.as_str(),
            self.department.as_str(),
            self.position.as_str(),
            self.status.as_str(),
        ];
        if let Some(phone) = &self.phone {
            fields.push(phone);
        }
        fields
    }
}

/// Request to add a person to a directory.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[cfg_attr(feature = "validation", derive(Validate))]
pub struct CreateStaffRequest {
    #[cfg_attr(
        feature = "validation",
        validate(length(min = 1, max = 100, message = "Name must be 1-100 characters"))
    )]
    pub name: String,
    #[cfg_attr(
        feature = "validation",
        validate(email(message = "Valid email is required"))
    )]
    pub email: String,
    #[serde(default)]
    #[cfg_attr(
        feature = "validation",
        validate(length(min = 7, max = 20, message = "Phone must be 7-20 characters"))
    )]
    pub phone: Option<String>,
    pub role: Role,
    #[cfg_attr(
        feature = "validation",
        validate(length(min = 1, max = 80, message = "Department is required"))
    )]
    pub department: String,
    #[cfg_attr(
        feature = "validation",
        validate(length(min = 1, max = 80, message = "Position is required"))
    )]
    pub position: String,
    #[cfg_attr(
        feature = "validation",
        validate(length(min = 8, message = "Password must be at least 8 characters"))
    )]
    pub password: String,
    #[serde(default)]
    pub manager_id: Option<i64>,
    #[serde(default)]
    pub joined_on: Option<NaiveDate>,
}

/// Partial update of a staff member. Absent fields are left unchanged.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[cfg_attr(feature = "validation", derive(Validate))]
#[serde(default)]
pub struct UpdateStaffRequest {
    #[cfg_attr(
        feature = "validation",
        validate(length(min = 1, max = 100, message = "Name must be 1-100 characters"))
    )]
    pub name: Option<String>,
    #[cfg_attr(
        feature = "validation",
        validate(email(message = "Valid email is required"))
    )]
    pub email: Option<String>,
    #[cfg_attr(
        feature = "validation",
        validate(length(min = 7, max = 20, message = "Phone must be 7-20 characters"))
    )]
    pub phone: Option<String>,
    pub role: Option<Role>,
    #[cfg_attr(
        feature = "validation",
        validate(length(min = 1, max = 80, message = "Department is required"))
    )]
    pub department: Option<String>,
    #[cfg_attr(
        feature = "validation",
        validate(length(min = 1, max = 80, message = "Position is required"))
    )]
    pub position: Option<String>,
    pub manager_id: Option<i64>,
}

/// Query parameters for directory listings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::IntoParams))]
pub struct StaffListParams {
    /// Free-text filter over name, email, department, position and phone.
    pub q: Option<String>,
    /// `active` or `inactive`.
    pub status: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matches_query;

    fn sample() -> StaffMember {
        let now = Utc::now();
        StaffMember {
            id: 7,
            name: "Grace Hopper".into(),
            email: "grace@staffdesk.test".into(),
            phone: Some("555-0107".into()),
            role: Role::Manager,
            department: "Engineering".into(),
            position: "Team Lead".into(),
            status: "active".into(),
            manager_id: None,
            manager_name: None,
            joined_on: now.date_naive(),
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn initials_from_first_two_words() {
        assert_eq!(sample().initials(), "GH");
    }

    #[test]
    fn search_covers_phone_and_department() {
        let s = sample();
        assert!(matches_query(&s, "0107"));
        assert!(matches_query(&s, "engineering grace"));
        assert!(!matches_query(&s, "finance"));
    }

    #[test]
    fn status_values() {
        assert!(is_valid_staff_status("active"));
        assert!(!is_valid_staff_status("suspended"));
    }

    #[test]
    fn role_serializes_in_snake_case() {
        let json = serde_json::to_value(sample()).unwrap();
        assert_eq!(json["role"], "manager");
    }
}
