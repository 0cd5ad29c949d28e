use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use shared_types::Role;
use std::sync::Once;

/// Token type discriminator. A refresh token is never accepted as an access token.
const TOKEN_TYPE_ACCESS: &str = "access";
const TOKEN_TYPE_REFRESH: &str = "refresh";

/// Used only when neither `JWT_SECRET` nor `auth.jwt_secret` is configured.
const DEV_SECRET: &str = "staffdesk-development-secret-change-me";

/// JWT claims stored in access and refresh tokens.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: i64,
    pub email: String,
    pub role: Role,
    pub exp: i64,
    pub iat: i64,
    /// Unique per token so two tokens minted in the same second hash differently.
    pub jti: String,
    /// "access" or "refresh".
    pub typ: String,
}

/// SHA-256 of a raw token, hex-encoded. Only this hash is persisted.
pub fn hash_token(raw_token: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(raw_token.as_bytes());
    format!("{:x}", hasher.finalize())
}

fn jwt_secret() -> String {
    if let Ok(secret) = std::env::var("JWT_SECRET") {
        if !secret.is_empty() {
            return secret;
        }
    }
    if let Some(secret) = crate::config::app_config().auth.jwt_secret.clone() {
        return secret;
    }
    static WARN: Once = Once::new();
    WARN.call_once(|| tracing::warn!("JWT_SECRET not set, using the development secret"));
    DEV_SECRET.to_string()
}

pub fn access_token_expiry_minutes() -> i64 {
    crate::config::app_config().auth.access_token_minutes
}

pub fn refresh_token_expiry_days() -> i64 {
    crate::config::app_config().auth.refresh_token_days
}

fn sign(claims: &Claims) -> Result<String, jsonwebtoken::errors::Error> {
    encode(
        &Header::default(),
        claims,
        &EncodingKey::from_secret(jwt_secret().as_bytes()),
    )
}

fn claims_for(user_id: i64, email: &str, role: Role, typ: &str, expires_at: DateTime<Utc>) -> Claims {
    Claims {
        sub: user_id,
        email: email.to_string(),
        role,
        iat: Utc::now().timestamp(),
        exp: expires_at.timestamp(),
        jti: uuid::Uuid::new_v4().to_string(),
        typ: typ.to_string(),
    }
}

pub fn create_access_token(
    user_id: i64,
    email: &str,
    role: Role,
) -> Result<String, jsonwebtoken::errors::Error> {
    let expires_at = Utc::now() + Duration::minutes(access_token_expiry_minutes());
    sign(&claims_for(user_id, email, role, TOKEN_TYPE_ACCESS, expires_at))
}

pub fn create_refresh_token(
    user_id: i64,
    email: &str,
    role: Role,
) -> Result<(String, DateTime<Utc>), jsonwebtoken::errors::Error> {
    let expires_at = Utc::now() + Duration::days(refresh_token_expiry_days());
    let token = sign(&claims_for(user_id, email, role, TOKEN_TYPE_REFRESH, expires_at))?;
    Ok((token, expires_at))
}

fn decode_claims(token: &str) -> Result<Claims, jsonwebtoken::errors::Error> {
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(jwt_secret().as_bytes()),
        &Validation::default(),
    )
    .map(|data| data.claims)
}

/// Validate an access token. Refresh tokens are rejected.
pub fn validate_access_token(token: &str) -> Result<Claims, jsonwebtoken::errors::Error> {
    let claims = decode_claims(token)?;
    if claims.typ != TOKEN_TYPE_ACCESS {
        return Err(jsonwebtoken::errors::ErrorKind::InvalidToken.into());
    }
    Ok(claims)
}

/// Validate a refresh token. Access tokens are rejected.
pub fn validate_refresh_token(token: &str) -> Result<Claims, jsonwebtoken::errors::Error> {
    let claims = decode_claims(token)?;
    if claims.typ != TOKEN_TYPE_REFRESH {
        return Err(jsonwebtoken::errors::ErrorKind::InvalidToken.into());
    }
    Ok(claims)
}
