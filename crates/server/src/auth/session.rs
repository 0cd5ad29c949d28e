//! Issuing, rotating and revoking login sessions.
//!
//! A session is an access/refresh token pair. Only the SHA-256 hash of the
//! refresh token is stored; rotating a refresh token revokes it, so each one
//! can be redeemed exactly once.

use shared_types::{AppError, AuthResponse, AuthUser, StaffMember};
use sqlx::SqlitePool;

use super::jwt::{self, hash_token};
use super::password;
use crate::repo;

/// A freshly minted token pair.
#[derive(Debug, Clone)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
}

impl TokenPair {
    pub fn into_response(self, user: StaffMember) -> AuthResponse {
        AuthResponse {
            user: AuthUser::from(user),
            access_token: self.access_token,
            refresh_token: self.refresh_token,
        }
    }
}

fn token_error(e: jsonwebtoken::errors::Error) -> AppError {
    tracing::error!(error = %e, "Token signing failed");
    AppError::internal("Could not create a session")
}

/// Mint a token pair for `user` and persist the refresh hash.
pub async fn issue(pool: &SqlitePool, user: &StaffMember) -> Result<TokenPair, AppError> {
    let access_token = jwt::create_access_token(user.id, &user.email, user.role).map_err(token_error)?;
    let (refresh_token, expires_at) =
        jwt::create_refresh_token(user.id, &user.email, user.role).map_err(token_error)?;

    repo::token::insert(pool, user.id, &hash_token(&refresh_token), expires_at).await?;

    Ok(TokenPair {
        access_token,
        refresh_token,
    })
}

/// Verify credentials and open a session.
///
/// Unknown email and wrong password produce the same 401 so the response
/// does not reveal which accounts exist.
pub async fn login(
    pool: &SqlitePool,
    email: &str,
    password_attempt: &str,
) -> Result<(StaffMember, TokenPair), AppError> {
    let invalid = || AppError::unauthorized("Invalid email or password");

    let Some(creds) = repo::staff::find_credentials(pool, email).await? else {
        tracing::warn!(email, "Login for unknown email");
        return Err(invalid());
    };

    if !password::verify_password(password_attempt, &creds.password_hash) {
        tracing::warn!(user_id = creds.id, "Login with wrong password");
        return Err(invalid());
    }

    if creds.status != "active" {
        tracing::warn!(user_id = creds.id, "Login to inactive account");
        return Err(AppError::forbidden(
            "This account is inactive. Contact an administrator.",
        ));
    }

    let user = repo::staff::find_by_id(pool, creds.id)
        .await?
        .ok_or_else(invalid)?;
    let tokens = issue(pool, &user).await?;

    tracing::info!(user_id = user.id, role = %user.role, "User logged in");
    Ok((user, tokens))
}

/// Redeem a refresh token for a new pair.
///
/// The user is reloaded so role and status changes apply immediately.
pub async fn rotate(
    pool: &SqlitePool,
    refresh_token: &str,
) -> Result<(StaffMember, TokenPair), AppError> {
    let expired = || AppError::unauthorized("Session expired. Please sign in again.");

    let claims = jwt::validate_refresh_token(refresh_token).map_err(|_| expired())?;

    if !repo::token::consume(pool, claims.sub, &hash_token(refresh_token)).await? {
        tracing::warn!(user_id = claims.sub, "Refresh token reused or revoked");
        return Err(expired());
    }

    let user = repo::staff::find_by_id(pool, claims.sub)
        .await?
        .filter(StaffMember::is_active)
        .ok_or_else(expired)?;

    let tokens = issue(pool, &user).await?;
    Ok((user, tokens))
}

/// End every session of `user_id`.
pub async fn revoke_all(pool: &SqlitePool, user_id: i64) -> Result<(), AppError> {
    let revoked = repo::token::revoke_all_for_user(pool, user_id).await?;
    tracing::info!(user_id, revoked, "Sessions revoked");
    Ok(())
}
