use dioxus::prelude::*;
use shared_types::{AuthUser, DemoAccount, FeatureFlags};

#[cfg(feature = "server")]
use super::auth::*;

#[cfg(feature = "server")]
use crate::error_convert::{AppErrorExt, ValidateRequest};

/// Sign in. Sets HTTP-only auth cookies on success.
#[cfg_attr(feature = "server", tracing::instrument(skip(password)))]
#[server]
pub async fn login(email: String, password: String) -> Result<AuthUser, ServerFnError> {
    use crate::auth::{cookies, session};
    use shared_types::{AppError, LoginRequest};

    let req = LoginRequest {
        email: email.clone(),
        password: password.clone(),
    };
    req.validate_request().map_err(|e| e.into_server_fn_error())?;

    let state = sfn(crate::db::get_state().await)?;
    let key = request_client_key(state.config.auth.trust_proxy_headers);
    if !state.login_limiter.check(&key) {
        tracing::warn!(client = %key, "Login rate limit exceeded");
        return Err(AppError::rate_limited(
            "Too many login attempts. Please wait a minute and try again.",
        )
        .into_server_fn_error());
    }

    let (user, tokens) = sfn(session::login(&state.pool, &email, &password).await)?;
    cookies::schedule_auth_cookies(&tokens.access_token, &tokens.refresh_token);

    tracing::info!(user_id = user.id, role = %user.role, "Signed in");
    Ok(AuthUser::from(user))
}

/// End every session of the caller and clear the cookies.
#[server]
pub async fn logout() -> Result<(), ServerFnError> {
    use crate::auth::{cookies, session};

    if let Ok(claims) = require_auth() {
        let state = sfn(crate::db::get_state().await)?;
        sfn(session::revoke_all(&state.pool, claims.sub).await)?;
        tracing::info!(user_id = claims.sub, "Signed out");
    }
    cookies::schedule_clear_cookies();
    Ok(())
}

/// The signed-in user, or `None` when there is no valid session.
#[server]
pub async fn get_current_user() -> Result<Option<AuthUser>, ServerFnError> {
    if require_auth().is_err() {
        return Ok(None);
    }
    match require_user().await {
        Ok((_, user)) => Ok(Some(AuthUser::from(user))),
        Err(_) => Ok(None),
    }
}

/// Sample sign-ins for the login page. Empty when the feature is off.
#[server]
pub async fn get_demo_accounts() -> Result<Vec<DemoAccount>, ServerFnError> {
    if crate::config::feature_flags().demo_accounts {
        Ok(crate::seed::demo_accounts())
    } else {
        Ok(Vec::new())
    }
}

#[server]
pub async fn get_feature_flags() -> Result<FeatureFlags, ServerFnError> {
    Ok(crate::config::feature_flags().clone())
}
