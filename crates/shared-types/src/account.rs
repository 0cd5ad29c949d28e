use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[cfg(feature = "validation")]
use validator::Validate;

pub const THEMES: &[&str] = &["light", "dark"];
pub const LANGUAGES: &[&str] = &["en", "es", "fr", "de"];

pub fn is_valid_theme(s: &str) -> bool {
    THEMES.contains(&s)
}

pub fn is_valid_language(s: &str) -> bool {
    LANGUAGES.contains(&s)
}

/// Display name for a language code.
pub fn language_label(code: &str) -> &'static str {
    match code {
        "es" => "Español",
        "fr" => "Français",
        "de" => "Deutsch",
        _ => "English",
    }
}

/// Self-service profile edit. Department and position are honoured only
/// for admins and above.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[cfg_attr(feature = "validation", derive(Validate))]
pub struct UpdateProfileRequest {
    #[cfg_attr(
        feature = "validation",
        validate(length(min = 1, max = 100, message = "Name must be 1-100 characters"))
    )]
    pub name: String,
    #[serde(default)]
    #[cfg_attr(
        feature = "validation",
        validate(length(min = 7, max = 20, message = "Phone must be 7-20 characters"))
    )]
    pub phone: Option<String>,
    #[serde(default)]
    #[cfg_attr(
        feature = "validation",
        validate(length(min = 1, max = 80, message = "Department is required"))
    )]
    pub department: Option<String>,
    #[serde(default)]
    #[cfg_attr(
        feature = "validation",
        validate(length(min = 1, max = 80, message = "Position is required"))
    )]
    pub position: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[cfg_attr(feature = "validation", derive(Validate))]
pub struct ChangePasswordRequest {
    pub current_password: String,
    #[cfg_attr(
        feature = "validation",
        validate(length(min = 8, message = "Password must be at least 8 characters"))
    )]
    pub new_password: String,
}

/// Per-user preferences.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[cfg_attr(feature = "server", derive(sqlx::FromRow))]
pub struct UserSettings {
    pub theme: String,
    pub language: String,
    pub timezone: String,
    pub email_notifications: bool,
    pub push_notifications: bool,
    pub weekly_digest: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Default for UserSettings {
    fn default() -> Self {
        Self {
            theme: "light".into(),
            language: "en".into(),
            timezone: "UTC".into(),
            email_notifications: true,
            push_notifications: false,
            weekly_digest: true,
            updated_at: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[cfg_attr(feature = "validation", derive(Validate))]
pub struct UpdateSettingsRequest {
    pub theme: String,
    pub language: String,
    #[cfg_attr(
        feature = "validation",
        validate(length(min = 1, max = 64, message = "Timezone must be 1-64 characters"))
    )]
    pub timezone: String,
    pub email_notifications: bool,
    pub push_notifications: bool,
    pub weekly_digest: bool,
}

impl From<UserSettings> for UpdateSettingsRequest {
    fn from(s: UserSettings) -> Self {
        Self {
            theme: s.theme,
            language: s.language,
            timezone: s.timezone,
            email_notifications: s.email_notifications,
            push_notifications: s.push_notifications,
            weekly_digest: s.weekly_digest,
        }
    }
}
