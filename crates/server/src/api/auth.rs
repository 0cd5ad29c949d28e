// Server-only helpers shared by the api/* server functions.

use dioxus::prelude::*;
use shared_types::{AppError, StaffMember};

use crate::auth::jwt::Claims;
use crate::db::{get_state, AppState};
use crate::error_convert::AppErrorExt;

/// Map a service result into what a server function returns.
pub(crate) fn sfn<T>(result: Result<T, AppError>) -> Result<T, ServerFnError> {
    result.map_err(AppErrorExt::into_server_fn_error)
}

/// Extract and validate the caller's identity from the current request.
/// Checks middleware-injected Claims first, falls back to cookie parsing.
pub(crate) fn require_auth() -> Result<Claims, ServerFnError> {
    use crate::auth::{cookies, jwt};

    let ctx = dioxus::fullstack::FullstackContext::current()
        .ok_or_else(|| AppError::unauthorized("Authentication required").into_server_fn_error())?;

    let parts = ctx.parts_mut();
    if let Some(claims) = parts.extensions.get::<Claims>() {
        return Ok(claims.clone());
    }

    let headers = parts.headers.clone();
    let token = cookies::extract_access_token(&headers)
        .ok_or_else(|| AppError::unauthorized("Authentication required").into_server_fn_error())?;

    jwt::validate_access_token(&token)
        .map_err(|_| AppError::unauthorized("Invalid or expired token").into_server_fn_error())
}

/// The application state and the caller's current account.
///
/// Inactive or deleted accounts are rejected and their cookies cleared.
pub(crate) async fn require_user() -> Result<(&'static AppState, StaffMember), ServerFnError> {
    let claims = require_auth()?;
    let state = sfn(get_state().await)?;
    match crate::auth::extractors::load_active_user(state, &claims).await {
        Ok(user) => Ok((state, user)),
        Err(e) => {
            crate::auth::cookies::schedule_clear_cookies();
            tracing::warn!(user_id = claims.sub, "Session for missing or inactive account, clearing cookies");
            Err(e.into_server_fn_error())
        }
    }
}

/// Rate-limit key for the current request.
pub(crate) fn request_client_key(trust_proxy: bool) -> String {
    dioxus::fullstack::FullstackContext::current()
        .map(|ctx| {
            let parts = ctx.parts_mut();
            let peer = crate::rate_limit::peer_addr(&parts.extensions);
            crate::rate_limit::client_key(&parts.headers, peer, trust_proxy)
        })
        .unwrap_or_else(|| "local".to_string())
}
