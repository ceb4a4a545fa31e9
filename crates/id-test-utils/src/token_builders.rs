//! Builder patterns for test data construction
//!
//! Provides fluent APIs for creating signed test tokens, including
//! deliberately broken ones (expired, foreign issuer, tampered signature).

use crate::crypto_fixtures::{TEST_AUDIENCE, TEST_ISSUER, TEST_JWT_SECRET};
use crate::test_ids::TEST_USER_ALICE;
use chrono::{Duration, Utc};
use id_service::crypto::UserClaims;
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use uuid::Uuid;

/// Builder for creating signed test tokens
///
/// # Example
/// ```rust,ignore
/// let token = TestTokenBuilder::new()
///     .for_user(user_id)
///     .with_roles(&["user", "admin"])
///     .expires_in(3600)
///     .build();
/// ```
pub struct TestTokenBuilder {
    sub: String,
    email: String,
    name: String,
    roles: Vec<String>,
    jti: String,
    iss: String,
    aud: String,
    iat: i64,
    exp: i64,
    secret: String,
}

impl TestTokenBuilder {
    /// Create a new token builder with defaults matching `test_jwt_config`
    pub fn new() -> Self {
        let now = Utc::now();
        Self {
            sub: TEST_USER_ALICE.to_string(),
            email: "alice@example.com".to_string(),
            name: "Alice".to_string(),
            roles: vec!["user".to_string()],
            jti: Uuid::new_v4().to_string(),
            iss: TEST_ISSUER.to_string(),
            aud: TEST_AUDIENCE.to_string(),
            iat: now.timestamp(),
            exp: (now + Duration::seconds(3600)).timestamp(),
            secret: TEST_JWT_SECRET.to_string(),
        }
    }

    /// Set the subject account id
    pub fn for_user(mut self, user_id: Uuid) -> Self {
        self.sub = user_id.to_string();
        self
    }

    /// Set the email claim
    pub fn with_email(mut self, email: &str) -> Self {
        self.email = email.to_string();
        self
    }

    /// Set the role claims
    pub fn with_roles(mut self, roles: &[&str]) -> Self {
        self.roles = roles.iter().map(|r| r.to_string()).collect();
        self
    }

    /// Set expiration in seconds from now (negative for an expired token)
    pub fn expires_in(mut self, seconds: i64) -> Self {
        self.exp = (Utc::now() + Duration::seconds(seconds)).timestamp();
        self
    }

    /// Set the issuer claim
    pub fn with_issuer(mut self, issuer: &str) -> Self {
        self.iss = issuer.to_string();
        self
    }

    /// Set the audience claim
    pub fn with_audience(mut self, audience: &str) -> Self {
        self.aud = audience.to_string();
        self
    }

    /// Sign with a different secret (produces a bad signature for the
    /// default validation config)
    pub fn with_secret(mut self, secret: &str) -> Self {
        self.secret = secret.to_string();
        self
    }

    /// Build and sign the token
    pub fn build(self) -> String {
        let claims = UserClaims {
            sub: self.sub,
            email: self.email,
            name: self.name,
            roles: self.roles,
            jti: self.jti,
            iss: self.iss,
            aud: self.aud,
            iat: self.iat,
            exp: self.exp,
        };

        encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(self.secret.as_bytes()),
        )
        .expect("test token signing should not fail")
    }
}

impl Default for TestTokenBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Flip one byte inside a token's signature segment.
pub fn tamper_signature(token: &str) -> String {
    let sig_start = token.rfind('.').expect("token has a signature segment") + 1;
    let mut bytes = token.to_string().into_bytes();
    bytes[sig_start] = if bytes[sig_start] == b'A' { b'B' } else { b'A' };
    String::from_utf8(bytes).expect("tampered token is still utf-8")
}
