//! Deterministic crypto fixtures for reproducible tests.

use chrono::{DateTime, TimeZone, Utc};
use id_service::config::JwtConfig;
use secrecy::SecretString;

/// The symmetric signing secret used across all tests.
pub const TEST_JWT_SECRET: &str = "test-signing-secret-do-not-use-in-production";

/// Issuer/audience matching `test_jwt_config`.
pub const TEST_ISSUER: &str = "identity-controller";
pub const TEST_AUDIENCE: &str = "identity-clients";

/// Token configuration every test server and builder agrees on.
pub fn test_jwt_config() -> JwtConfig {
    JwtConfig {
        secret: SecretString::from(TEST_JWT_SECRET),
        issuer: TEST_ISSUER.to_string(),
        audience: TEST_AUDIENCE.to_string(),
        expiration_minutes: 60,
    }
}

/// A fixed instant for tests that pin the clock.
pub fn fixed_now() -> DateTime<Utc> {
    // Safe: the literal is a valid calendar date.
    match Utc.with_ymd_and_hms(2025, 1, 15, 12, 0, 0) {
        chrono::LocalResult::Single(t) => t,
        _ => unreachable!("fixed timestamp is valid"),
    }
}
