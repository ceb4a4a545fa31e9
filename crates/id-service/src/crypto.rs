//! Cryptographic operations: password hashing and bearer token signing.
//!
//! Passwords are hashed with bcrypt (salted, one-way). Tokens are HS256
//! JWTs signed with the configured symmetric secret; validation checks the
//! signature, exact issuer/audience, and expiry with zero clock-skew
//! tolerance against a caller-supplied clock.

use crate::config::JwtConfig;
use crate::errors::AuthError;
use chrono::{DateTime, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::instrument;

/// Maximum allowed token size in bytes (8KB).
///
/// Tokens larger than this are rejected before any parsing or cryptographic
/// work. Typical tokens here are 400-700 bytes; the cap only exists to bound
/// the cost of handling hostile input.
pub const MAX_TOKEN_SIZE_BYTES: usize = 8192;

/// Valid bcrypt cost range. Below 10 is insecure, above 14 the hash time
/// exceeds what an interactive login can tolerate.
pub const MIN_BCRYPT_COST: u32 = 10;
pub const MAX_BCRYPT_COST: u32 = 14;

/// Bearer token claims.
///
/// One `roles` entry per assigned role; `jti` is a fresh random UUID per
/// issued token. The `sub`, `email`, and `jti` fields are redacted in Debug
/// output.
#[derive(Clone, Serialize, Deserialize)]
pub struct UserClaims {
    /// Subject (account UUID)
    pub sub: String,
    /// Account email (the login handle)
    pub email: String,
    /// Display name
    pub name: String,
    /// Assigned roles at issuance time
    pub roles: Vec<String>,
    /// Unique token identifier
    pub jti: String,
    /// Issuer
    pub iss: String,
    /// Audience
    pub aud: String,
    /// Issued-at timestamp (Unix epoch seconds)
    pub iat: i64,
    /// Expiration timestamp (Unix epoch seconds)
    pub exp: i64,
}

impl fmt::Debug for UserClaims {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UserClaims")
            .field("sub", &"[REDACTED]")
            .field("email", &"[REDACTED]")
            .field("name", &self.name)
            .field("roles", &self.roles)
            .field("jti", &"[REDACTED]")
            .field("iss", &self.iss)
            .field("aud", &self.aud)
            .field("iat", &self.iat)
            .field("exp", &self.exp)
            .finish()
    }
}

impl UserClaims {
    /// Check whether a specific role was assigned when the token was issued.
    #[must_use]
    pub fn has_role(&self, role: &str) -> bool {
        self.roles.iter().any(|r| r == role)
    }
}

/// Hash a password with bcrypt using the given cost factor.
///
/// The salt is generated per call, so hashing the same password twice
/// yields different digests.
#[instrument(skip_all)]
pub fn hash_password(password: &str, cost: u32) -> Result<String, AuthError> {
    // Validate cost even though config should have already done so; this
    // function must never hash below the floor.
    if !(MIN_BCRYPT_COST..=MAX_BCRYPT_COST).contains(&cost) {
        return Err(AuthError::Crypto(format!(
            "Invalid bcrypt cost: {} (must be {}-{})",
            cost, MIN_BCRYPT_COST, MAX_BCRYPT_COST
        )));
    }

    bcrypt::hash(password, cost)
        .map_err(|e| AuthError::Crypto(format!("Password hashing failed: {}", e)))
}

/// Verify a password against a bcrypt digest.
///
/// Never errors: a malformed digest verifies as `false` rather than
/// surfacing a parse failure to the caller.
#[instrument(skip_all)]
pub fn verify_password(password: &str, digest: &str) -> bool {
    bcrypt::verify(password, digest).unwrap_or(false)
}

/// Sign a token over the full claim set with the HS256 symmetric key.
///
/// Deterministic: fixed claims and a fixed secret always produce the same
/// token string.
#[instrument(skip_all)]
pub fn sign_token(claims: &UserClaims, secret: &[u8]) -> Result<String, AuthError> {
    let header = Header::new(Algorithm::HS256);
    let encoding_key = EncodingKey::from_secret(secret);

    encode(&header, claims, &encoding_key)
        .map_err(|e| AuthError::Crypto(format!("Token signing failed: {}", e)))
}

/// Validate a bearer token and extract its claims.
///
/// Checks, in order: size cap, HS256 signature, exact issuer and audience
/// match, then expiry against the supplied `now` with zero leeway. Any
/// mismatch yields the same generic error so callers learn nothing about
/// which check failed.
#[instrument(skip_all)]
pub fn validate_token(
    token: &str,
    config: &JwtConfig,
    now: DateTime<Utc>,
) -> Result<UserClaims, AuthError> {
    if token.len() > MAX_TOKEN_SIZE_BYTES {
        tracing::debug!(
            target: "crypto",
            token_size = token.len(),
            max_size = MAX_TOKEN_SIZE_BYTES,
            "Token rejected: size exceeds maximum allowed"
        );
        return Err(invalid_token());
    }

    let decoding_key = DecodingKey::from_secret(config.secret_bytes());

    let mut validation = Validation::new(Algorithm::HS256);
    validation.set_issuer(&[&config.issuer]);
    validation.set_audience(&[&config.audience]);
    // Expiry is checked below against the caller's clock, exactly and with
    // zero leeway; jsonwebtoken's own check (60s default leeway, system
    // clock) is disabled.
    validation.validate_exp = false;
    validation.leeway = 0;

    let token_data = decode::<UserClaims>(token, &decoding_key, &validation).map_err(|e| {
        tracing::debug!(target: "crypto", error = %e, "Token verification failed");
        invalid_token()
    })?;

    if now.timestamp() >= token_data.claims.exp {
        tracing::debug!(
            target: "crypto",
            exp = token_data.claims.exp,
            now = now.timestamp(),
            "Token rejected: expired"
        );
        return Err(invalid_token());
    }

    Ok(token_data.claims)
}

fn invalid_token() -> AuthError {
    AuthError::InvalidToken("The access token is invalid or expired".to_string())
}
