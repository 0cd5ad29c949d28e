use serde::{Deserialize, Serialize};

/// Feature flags controlling which optional behaviour is active.
///
/// Loaded from `config.toml` at server startup and exposed to clients
/// via a server function. Every field defaults to `false` so that a
/// missing or incomplete config file disables all optional features.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct FeatureFlags {
    /// Export request spans over OTLP.
    #[serde(default)]
    pub telemetry: bool,
    /// Show the one-click demo accounts on the login page.
    #[serde(default)]
    pub demo_accounts: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: "sqlite://staffdesk.db?mode=rwc".to_string(),
            max_connections: 5,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AuthConfig {
    /// Signing secret. `JWT_SECRET` takes precedence when set.
    pub jwt_secret: Option<String>,
    pub access_token_minutes: i64,
    pub refresh_token_days: i64,
    pub login_attempts_per_minute: u32,
    pub cookie_secure: bool,
    /// Key login rate limits on `X-Forwarded-For` / `X-Real-IP`. Only
    /// enable behind a proxy that overwrites those headers.
    pub trust_proxy_headers: bool,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret: None,
            access_token_minutes: 15,
            refresh_token_days: 7,
            login_attempts_per_minute: 10,
            cookie_secure: false,
            trust_proxy_headers: false,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ReportsConfig {
    pub generation_delay_ms: u64,
    pub max_period_days: i64,
}

impl Default for ReportsConfig {
    fn default() -> Self {
        Self {
            generation_delay_ms: 1500,
            max_period_days: 366,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct LeaveConfig {
    pub annual_allowance_days: i64,
    /// Longest single request, in calendar days.
    pub max_request_days: i64,
}

impl Default for LeaveConfig {
    fn default() -> Self {
        Self {
            annual_allowance_days: 20,
            max_request_days: 90,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AttendanceConfig {
    /// Start of the working day, `HH:MM`.
    pub workday_start: String,
    pub grace_minutes: i64,
}

impl Default for AttendanceConfig {
    fn default() -> Self {
        Self {
            workday_start: "09:00".to_string(),
            grace_minutes: 15,
        }
    }
}

impl AttendanceConfig {
    /// Latest check-in time still counted as on time.
    pub fn late_after(&self) -> chrono::NaiveTime {
        let start = chrono::NaiveTime::parse_from_str(&self.workday_start, "%H:%M")
            .unwrap_or_else(|_| chrono::NaiveTime::from_hms_opt(9, 0, 0).unwrap_or_default());
        let grace = chrono::Duration::minutes(self.grace_minutes.clamp(0, 24 * 60));
        let (cutoff, wrapped_secs) = start.overflowing_add_signed(grace);
        if wrapped_secs != 0 {
            // Grace never carries into the next day.
            return chrono::NaiveTime::from_hms_opt(23, 59, 59).unwrap_or(cutoff);
        }
        cutoff
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SeedConfig {
    /// Fill an empty database with the demo organisation on startup.
    pub sample_data: bool,
    pub demo_password: String,
}

impl Default for SeedConfig {
    fn default() -> Self {
        Self {
            sample_data: true,
            demo_password: "password123".to_string(),
        }
    }
}

/// Top-level config file structure matching `config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct AppConfig {
    #[serde(default)]
    pub features: FeatureFlags,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub auth: AuthConfig,
    #[serde(default)]
    pub reports: ReportsConfig,
    #[serde(default)]
    pub leave: LeaveConfig,
    #[serde(default)]
    pub attendance: AttendanceConfig,
    #[serde(default)]
    pub seed: SeedConfig,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_flags_all_false() {
        let flags = FeatureFlags::default();
        assert!(!flags.telemetry);
        assert!(!flags.demo_accounts);
    }

    #[test]
    fn deserialize_empty_toml_uses_defaults() {
        let config: AppConfig = toml::from_str("").unwrap();
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.auth.access_token_minutes, 15);
        assert_eq!(config.leave.annual_allowance_days, 20);
        assert_eq!(config.leave.max_request_days, 90);
    }

    #[test]
    fn deserialize_partial_sections() {
        let config: AppConfig = toml::from_str(
            r#"
            [features]
            demo_accounts = true

            [reports]
            max_period_days = 31

            [attendance]
            grace_minutes = 5
            "#,
        )
        .unwrap();
        assert!(config.features.demo_accounts);
        assert!(!config.features.telemetry);
        assert_eq!(config.reports.max_period_days, 31);
        assert_eq!(config.reports.generation_delay_ms, 1500);
        assert_eq!(config.attendance.grace_minutes, 5);
        assert_eq!(config.attendance.workday_start, "09:00");
    }

    #[test]
    fn late_after_adds_grace() {
        let cfg = AttendanceConfig {
            workday_start: "08:30".into(),
            grace_minutes: 10,
        };
        assert_eq!(cfg.late_after(), chrono::NaiveTime::from_hms_opt(8, 40, 0).unwrap());
    }

    #[test]
    fn late_after_saturates_before_midnight() {
        let cfg = AttendanceConfig {
            workday_start: "23:50".into(),
            grace_minutes: 15,
        };
        assert_eq!(cfg.late_after(), chrono::NaiveTime::from_hms_opt(23, 59, 59).unwrap());

        let huge = AttendanceConfig {
            workday_start: "09:00".into(),
            grace_minutes: i64::MAX,
        };
        assert_eq!(huge.late_after(), chrono::NaiveTime::from_hms_opt(23, 59, 59).unwrap());

        let negative = AttendanceConfig {
            workday_start: "09:00".into(),
            grace_minutes: -30,
        };
        assert_eq!(negative.late_after(), chrono::NaiveTime::from_hms_opt(9, 0, 0).unwrap());
    }

    #[test]
    fn late_after_falls_back_on_bad_time() {
        let cfg = AttendanceConfig {
            workday_start: "nine".into(),
            grace_minutes: 0,
        };
        assert_eq!(cfg.late_after(), chrono::NaiveTime::from_hms_opt(9, 0, 0).unwrap());
    }

    #[test]
    fn deserialize_json_with_missing_fields_defaults() {
        let flags: FeatureFlags = serde_json::from_str("{}").unwrap();
        assert_eq!(flags, FeatureFlags::default());
    }
}
