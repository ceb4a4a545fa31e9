//! Custom test assertions for expressive tests
//!
//! Provides trait-based assertions over raw token strings. These decode the
//! token segments without verifying the signature; use the service's
//! validator when the signature itself is under test.

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use serde::Deserialize;

/// JWT header structure
#[derive(Debug, Deserialize)]
struct JwtHeader {
    pub alg: String,
    pub typ: Option<String>,
}

/// JWT claims structure
#[derive(Debug, Deserialize)]
struct JwtClaims {
    pub sub: String,
    pub email: String,
    pub roles: Vec<String>,
    pub exp: i64,
    pub iat: i64,
}

/// Custom assertions for bearer tokens
///
/// # Example
/// ```rust,ignore
/// token
///     .assert_valid_jwt()
///     .assert_has_role("admin")
///     .assert_for_subject(&user_id.to_string());
/// ```
pub trait TokenAssertions {
    /// Assert the token is a structurally valid HS256 JWT
    fn assert_valid_jwt(&self) -> &Self;

    /// Assert the token carries the specified role claim
    fn assert_has_role(&self, role: &str) -> &Self;

    /// Assert the token is for the specified subject
    fn assert_for_subject(&self, subject: &str) -> &Self;

    /// Assert the token carries the specified email claim
    fn assert_for_email(&self, email: &str) -> &Self;
}

fn decode_claims(token: &str) -> JwtClaims {
    let parts: Vec<_> = token.split('.').collect();
    assert_eq!(
        parts.len(),
        3,
        "JWT must have 3 parts (header.payload.signature), got {}",
        parts.len()
    );

    let payload = URL_SAFE_NO_PAD
        .decode(parts[1])
        .expect("JWT payload should base64 decode");

    serde_json::from_slice(&payload).expect("JWT payload should parse as claims")
}

impl TokenAssertions for String {
    fn assert_valid_jwt(&self) -> &Self {
        let parts: Vec<_> = self.split('.').collect();
        assert_eq!(
            parts.len(),
            3,
            "JWT must have 3 parts (header.payload.signature), got {}",
            parts.len()
        );

        let header_bytes = URL_SAFE_NO_PAD
            .decode(parts[0])
            .expect("JWT header should base64 decode");
        let header: JwtHeader =
            serde_json::from_slice(&header_bytes).expect("JWT header should parse");

        assert_eq!(header.alg, "HS256", "Expected HS256 algorithm");
        if let Some(typ) = header.typ {
            assert_eq!(typ, "JWT", "Expected JWT type");
        }

        let claims = decode_claims(self);
        assert!(claims.exp > claims.iat, "exp should be after iat");

        self
    }

    fn assert_has_role(&self, role: &str) -> &Self {
        let claims = decode_claims(self);
        assert!(
            claims.roles.iter().any(|r| r == role),
            "Token roles {:?} should contain '{}'",
            claims.roles,
            role
        );
        self
    }

    fn assert_for_subject(&self, subject: &str) -> &Self {
        let claims = decode_claims(self);
        assert_eq!(claims.sub, subject, "Token subject mismatch");
        self
    }

    fn assert_for_email(&self, email: &str) -> &Self {
        let claims = decode_claims(self);
        assert_eq!(claims.email, email, "Token email mismatch");
        self
    }
}
