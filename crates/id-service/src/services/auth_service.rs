//! Authentication service: registration, login, and account lookup.
//!
//! Registration validates before it touches the store (mismatch, policy),
//! then defers the authoritative uniqueness decision to the database. Login
//! reports one generic failure for both unknown email and bad password, and
//! burns a bcrypt verification either way so timing does not separate the
//! two cases.

use crate::config::{JwtConfig, DEFAULT_BCRYPT_COST};
use crate::crypto;
use crate::errors::AuthError;
use crate::models::{AuthResponse, User};
use crate::policy::ROLE_USER;
use crate::repositories::users;
use crate::services::token_service;
use chrono::NaiveDate;
use secrecy::{ExposeSecret, SecretString};
use sqlx::PgPool;

/// Minimum password length. The remaining policy: at least one digit, one
/// lowercase, one uppercase, one non-alphanumeric character.
pub const MIN_PASSWORD_LENGTH: usize = 6;

/// Bcrypt digest of an unused password, verified when login hits an unknown
/// email so both failure paths cost one hash check.
const DUMMY_PASSWORD_HASH: &str = "$2b$12$LQv3c1yqBWVHxkd0LHAkCOYz6TtxMQJqhN8/LewY5GyYqExt7YD3a";

/// Registration request data.
#[derive(Debug, Clone)]
pub struct RegistrationRequest {
    pub email: String,
    pub password: SecretString,
    pub confirm_password: SecretString,
    pub full_name: String,
    pub date_of_birth: Option<NaiveDate>,
}

/// Register a new account.
///
/// # Steps
///
/// 1. Reject mismatched password confirmation (no store interaction yet)
/// 2. Enforce the password policy
/// 3. Normalize the email and reject taken addresses
/// 4. Hash the password (bcrypt cost 12)
/// 5. Insert the account; the unique constraint backstops step 3
/// 6. Assign the default `user` role
/// 7. Issue a token (auto-login)
pub async fn register(
    pool: &PgPool,
    jwt: &JwtConfig,
    request: RegistrationRequest,
) -> Result<AuthResponse, AuthError> {
    if request.password.expose_secret() != request.confirm_password.expose_secret() {
        return Err(AuthError::PasswordMismatch);
    }

    validate_password_strength(request.password.expose_secret())?;

    let email = normalize_email(&request.email);

    if users::email_exists(pool, &email).await? {
        return Err(AuthError::EmailTaken);
    }

    let password_hash = crypto::hash_password(request.password.expose_secret(), DEFAULT_BCRYPT_COST)?;

    let user = users::create_user(
        pool,
        &email,
        &password_hash,
        request.full_name.trim(),
        request.date_of_birth,
    )
    .await?;

    users::add_user_role(pool, user.user_id, ROLE_USER).await?;

    tracing::info!(user_id = %user.user_id, "Registered new account");

    token_service::auth_response(&user, vec![ROLE_USER.to_string()], jwt)
}

/// Authenticate an account and issue a fresh token.
///
/// Unknown email and wrong password return the identical error; no state is
/// mutated on success.
pub async fn login(
    pool: &PgPool,
    jwt: &JwtConfig,
    email: &str,
    password: &SecretString,
) -> Result<AuthResponse, AuthError> {
    let email = normalize_email(email);
    let user = users::get_by_email(pool, &email).await?;

    let digest = match &user {
        Some(u) => u.password_hash.as_str(),
        None => DUMMY_PASSWORD_HASH,
    };

    let is_valid = crypto::verify_password(password.expose_secret(), digest);

    let user = match user {
        Some(u) if is_valid => u,
        _ => {
            tracing::debug!("Login failed");
            return Err(AuthError::InvalidCredentials);
        }
    };

    let roles = users::get_user_roles(pool, user.user_id).await?;

    tracing::info!(user_id = %user.user_id, "Login successful");

    token_service::auth_response(&user, roles, jwt)
}

/// Look up an account by id. No authorization decision is made here; the
/// caller applies policy.
pub async fn get_account(pool: &PgPool, user_id: uuid::Uuid) -> Result<User, AuthError> {
    users::get_by_id(pool, user_id)
        .await?
        .ok_or(AuthError::UserNotFound)
}

/// Normalize an email for storage and lookup: the store holds lowercase
/// addresses only, which makes uniqueness case-insensitive.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Enforce the password policy: length >= 6, at least one digit, one
/// lowercase, one uppercase, and one non-alphanumeric character.
pub fn validate_password_strength(password: &str) -> Result<(), AuthError> {
    let mut missing = Vec::new();

    if password.chars().count() < MIN_PASSWORD_LENGTH {
        missing.push(format!("at least {} characters", MIN_PASSWORD_LENGTH));
    }
    if !password.chars().any(|c| c.is_ascii_digit()) {
        missing.push("a digit".to_string());
    }
    if !password.chars().any(|c| c.is_lowercase()) {
        missing.push("a lowercase letter".to_string());
    }
    if !password.chars().any(|c| c.is_uppercase()) {
        missing.push("an uppercase letter".to_string());
    }
    if !password.chars().any(|c| !c.is_alphanumeric()) {
        missing.push("a non-alphanumeric character".to_string());
    }

    if missing.is_empty() {
        Ok(())
    } else {
        Err(AuthError::WeakPassword(format!(
            "requires {}",
            missing.join(", ")
        )))
    }
}
