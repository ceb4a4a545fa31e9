//! Token issuance: assembles claims for an account and signs them.
//!
//! `issue_token_at` is the deterministic core (explicit clock and token id);
//! the production entry points wrap it with the system clock and a fresh
//! random id.

use crate::config::JwtConfig;
use crate::crypto::{self, UserClaims};
use crate::errors::AuthError;
use crate::models::{AuthResponse, User};
use chrono::{DateTime, Duration, Utc};
use uuid::Uuid;

/// Issue a bearer token for the account with its current roles.
///
/// Expiry is now + the configured lifetime. Returns the signed token and
/// its expiry instant.
pub fn issue_token(
    user: &User,
    roles: &[String],
    config: &JwtConfig,
) -> Result<(String, DateTime<Utc>), AuthError> {
    issue_token_at(user, roles, config, Utc::now(), &Uuid::new_v4().to_string())
}

/// Deterministic issuance: fixed `now`, `jti`, and secret reproduce the
/// exact same token string.
pub fn issue_token_at(
    user: &User,
    roles: &[String],
    config: &JwtConfig,
    now: DateTime<Utc>,
    jti: &str,
) -> Result<(String, DateTime<Utc>), AuthError> {
    let expires_at = now + Duration::minutes(config.expiration_minutes);

    let claims = UserClaims {
        sub: user.user_id.to_string(),
        email: user.email.clone(),
        name: user.full_name.clone(),
        roles: roles.to_vec(),
        jti: jti.to_string(),
        iss: config.issuer.clone(),
        aud: config.audience.clone(),
        iat: now.timestamp(),
        exp: expires_at.timestamp(),
    };

    let token = crypto::sign_token(&claims, config.secret_bytes())?;

    Ok((token, expires_at))
}

/// Issue a token and bundle it with the account details callers expect
/// after register/login.
pub fn auth_response(
    user: &User,
    roles: Vec<String>,
    config: &JwtConfig,
) -> Result<AuthResponse, AuthError> {
    let (token, expires_at) = issue_token(user, &roles, config)?;

    Ok(AuthResponse {
        token,
        token_type: "Bearer".to_string(),
        expires_at,
        email: user.email.clone(),
        full_name: user.full_name.clone(),
        roles,
    })
}
