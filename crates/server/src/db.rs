use axum::extract::FromRef;
use shared_types::{AppConfig, AppError};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::str::FromStr;
use std::sync::{Arc, OnceLock};
use std::time::Duration;

use crate::error_convert::SqlxErrorExt;
use crate::rate_limit::RateLimitState;

/// Shared application state passed to Axum handlers via `State`.
/// Derives `FromRef` so handlers can extract `State<SqlitePool>` directly.
#[derive(Clone, FromRef)]
pub struct AppState {
    pub pool: SqlitePool,
    pub config: Arc<AppConfig>,
    /// Sliding-window limiter for login attempts.
    pub login_limiter: RateLimitState,
}

impl AppState {
    pub fn new(pool: SqlitePool, config: AppConfig) -> Self {
        let login_limiter = RateLimitState::new(
            config.auth.login_attempts_per_minute,
            Duration::from_secs(60),
        );
        Self {
            pool,
            config: Arc::new(config),
            login_limiter,
        }
    }
}

/// State used by server functions, installed once at startup.
static STATE: OnceLock<AppState> = OnceLock::new();

/// Create the connection pool. Uses `connect_lazy_with` so no connection
/// opens until the first query.
pub fn create_pool(config: &AppConfig) -> Result<SqlitePool, AppError> {
    let options = SqliteConnectOptions::from_str(&config.database.url)
        .map_err(|e| AppError::internal(format!("Invalid DATABASE_URL: {e}")))?
        .create_if_missing(true)
        .foreign_keys(true);

    Ok(SqlitePoolOptions::new()
        .max_connections(config.database.max_connections.max(1))
        .acquire_timeout(Duration::from_secs(5))
        .connect_lazy_with(options))
}

/// Private in-memory database with migrations applied.
///
/// A single connection that never expires keeps the database alive for the
/// lifetime of the pool.
pub async fn connect_in_memory() -> Result<SqlitePool, AppError> {
    let options = SqliteConnectOptions::from_str("sqlite::memory:")
        .map_err(SqlxErrorExt::into_app_error)?
        .foreign_keys(true);
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect_with(options)
        .await
        .map_err(SqlxErrorExt::into_app_error)?;
    run_migrations(&pool).await?;
    Ok(pool)
}

/// Run the embedded migrations against the given pool.
pub async fn run_migrations(pool: &SqlitePool) -> Result<(), AppError> {
    sqlx::migrate!("../../migrations")
        .run(pool)
        .await
        .map_err(|e| AppError::database(format!("Migration failed: {e}")))
}

/// Make `state` the one server functions use.
pub fn install_state(state: AppState) {
    if STATE.set(state).is_err() {
        tracing::debug!("Application state already installed");
    }
}

/// Get the state for server functions, building it from the loaded config
/// on first use when startup did not install one.
pub async fn get_state() -> Result<&'static AppState, AppError> {
    if let Some(state) = STATE.get() {
        return Ok(state);
    }
    let config = crate::config::load_config();
    let pool = create_pool(config)?;
    run_migrations(&pool).await?;
    Ok(STATE.get_or_init(|| AppState::new(pool, config.clone())))
}
