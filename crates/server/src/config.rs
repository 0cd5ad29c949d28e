use shared_types::{AppConfig, FeatureFlags};
use std::sync::OnceLock;

static CONFIG: OnceLock<AppConfig> = OnceLock::new();
static DEFAULT: OnceLock<AppConfig> = OnceLock::new();

/// Path to the config file, relative to the project root.
const CONFIG_PATH: &str = "config.toml";

/// Parse config file contents. Unparseable input falls back to defaults.
pub fn parse_config(contents: &str) -> AppConfig {
    toml::from_str(contents).unwrap_or_else(|e| {
        tracing::warn!(path = CONFIG_PATH, error = %e, "Failed to parse config, using defaults");
        AppConfig::default()
    })
}

/// Apply environment overrides on top of the file values.
pub fn apply_env_overrides(config: &mut AppConfig) {
    if let Ok(url) = std::env::var("DATABASE_URL") {
        if !url.is_empty() {
            config.database.url = url;
        }
    }
    if let Ok(secret) = std::env::var("JWT_SECRET") {
        if !secret.is_empty() {
            config.auth.jwt_secret = Some(secret);
        }
    }
    if let Some(secure) = std::env::var("COOKIE_SECURE")
        .ok()
        .and_then(|v| v.parse().ok())
    {
        config.auth.cookie_secure = secure;
    }
    if std::env::var("OTEL_EXPORTER_OTLP_ENDPOINT").is_ok_and(|v| !v.is_empty()) {
        config.features.telemetry = true;
    }
}

/// Read `config.toml` and the environment, then store the result in the
/// global `OnceLock`. Safe to call multiple times; only the first call has
/// effect.
pub fn load_config() -> &'static AppConfig {
    CONFIG.get_or_init(|| {
        let _ = dotenvy::dotenv();
        let mut config = match std::fs::read_to_string(CONFIG_PATH) {
            Ok(contents) => parse_config(&contents),
            Err(e) => {
                tracing::warn!(path = CONFIG_PATH, error = %e, "Config file not found, using defaults");
                AppConfig::default()
            }
        };
        apply_env_overrides(&mut config);
        tracing::info!(features = ?config.features, database = %config.database.url, "Configuration loaded");
        config
    })
}

/// The loaded configuration, or defaults when `load_config()` has not run.
pub fn app_config() -> &'static AppConfig {
    CONFIG
        .get()
        .unwrap_or_else(|| DEFAULT.get_or_init(AppConfig::default))
}

pub fn feature_flags() -> &'static FeatureFlags {
    &app_config().features
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn garbage_config_falls_back_to_defaults() {
        let config = parse_config("this is = = not toml");
        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn parses_sections() {
        let config = parse_config(
            r#"
            [leave]
            annual_allowance_days = 25

            [seed]
            sample_data = false
            "#,
        );
        assert_eq!(config.leave.annual_allowance_days, 25);
        assert!(!config.seed.sample_data);
    }

    #[test]
    fn app_config_has_defaults_before_load() {
        assert!(app_config().auth.access_token_minutes > 0);
    }
}
