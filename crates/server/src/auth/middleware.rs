use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::Response;

use super::cookies::{self, CookieSlot, PendingCookieAction};
use super::jwt::validate_access_token;
use super::session;
use crate::db::AppState;

/// Permissive auth middleware.
///
/// On each request:
/// 1. Validates the access token from the cookie (or Bearer header)
/// 2. If missing or invalid, redeems the refresh cookie for a new pair
/// 3. Inserts a `CookieSlot` so server functions can schedule cookie changes
/// 4. After the handler runs, writes any pending cookie changes
///
/// Never rejects. Extractors and server functions decide authorization.
/// The login and refresh endpoints manage tokens themselves and are never
/// refreshed here, or the refresh cookie would be spent before they see it.
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Response {
    let headers = req.headers().clone();
    let mut refreshed: Option<(String, String)> = None;

    let claims = cookies::extract_access_token(&headers)
        .and_then(|token| validate_access_token(&token).ok());

    match claims {
        Some(claims) => {
            req.extensions_mut().insert(claims);
        }
        None if manages_own_tokens(req.uri().path()) => {}
        None => {
            if let Some(refresh_token) = cookies::extract_refresh_token(&headers) {
                match session::rotate(&state.pool, &refresh_token).await {
                    Ok((user, pair)) => {
                        if let Ok(claims) = validate_access_token(&pair.access_token) {
                            req.extensions_mut().insert(claims);
                        }
                        tracing::debug!(user_id = user.id, "Session refreshed transparently");
                        refreshed = Some((pair.access_token, pair.refresh_token));
                    }
                    Err(e) => {
                        tracing::debug!(error = %e.message, "Transparent refresh failed");
                    }
                }
            }
        }
    }

    let cookie_slot = CookieSlot::default();
    req.extensions_mut().insert(cookie_slot.clone());

    let mut response = next.run(req).await;

    if let Some((access, refresh)) = refreshed {
        cookies::set_auth_cookies(response.headers_mut(), &access, &refresh);
    }

    match cookie_slot.take() {
        Some(PendingCookieAction::Set {
            access_token,
            refresh_token,
        }) => cookies::set_auth_cookies(response.headers_mut(), &access_token, &refresh_token),
        Some(PendingCookieAction::Clear) => cookies::clear_auth_cookies(response.headers_mut()),
        None => {}
    }

    response
}

fn manages_own_tokens(path: &str) -> bool {
    matches!(path, "/api/v1/auth/login" | "/api/v1/auth/refresh")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_endpoints_skip_transparent_refresh() {
        assert!(manages_own_tokens("/api/v1/auth/login"));
        assert!(manages_own_tokens("/api/v1/auth/refresh"));
        assert!(!manages_own_tokens("/api/v1/auth/me"));
        assert!(!manages_own_tokens("/api/v1/tasks"));
    }
}
