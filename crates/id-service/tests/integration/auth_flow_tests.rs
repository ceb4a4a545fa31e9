//! E2E tests for registration and login flows.
//!
//! ## Test Categories
//!
//! - **Registration**: validation order, uniqueness, response bundle
//! - **Login**: credential verification, generic failures
//! - **Token handling**: bearer extraction, tampering, expiry
//!
//! ## Test Naming
//!
//! Tests follow the convention: `test_<feature>_<scenario>_<expected_result>`

use id_test_utils::server_harness::TestIdentityServer;
use id_test_utils::token_builders::{tamper_signature, TestTokenBuilder};
use id_test_utils::TokenAssertions;
use reqwest::StatusCode;
use serde_json::json;
use sqlx::PgPool;

// ============================================================================
// Registration
// ============================================================================

/// Happy path: a new account registers and gets back a usable token bundle.
#[sqlx::test(migrations = "../../migrations")]
async fn test_register_happy_path(pool: PgPool) -> Result<(), anyhow::Error> {
    let server = TestIdentityServer::spawn(pool).await?;

    let response = server
        .client()
        .post(format!("{}/api/v1/auth/register", server.url()))
        .json(&json!({
            "email": "alice@example.com",
            "password": "Passw0rd!",
            "confirm_password": "Passw0rd!",
            "full_name": "Alice",
            "date_of_birth": "1990-04-01",
        }))
        .send()
        .await?;

    assert_eq!(
        response.status(),
        StatusCode::OK,
        "Registration should succeed"
    );

    let body: serde_json::Value = response.json().await?;
    assert_eq!(body["token_type"].as_str(), Some("Bearer"));
    assert_eq!(body["email"].as_str(), Some("alice@example.com"));
    assert_eq!(body["full_name"].as_str(), Some("Alice"));
    assert_eq!(body["roles"], json!(["user"]));
    assert!(body.get("expires_at").is_some());

    let token = body["token"].as_str().unwrap_or_default().to_string();
    let user_id = server.user_id_by_email("alice@example.com").await?;

    token
        .assert_valid_jwt()
        .assert_has_role("user")
        .assert_for_subject(&user_id.to_string())
        .assert_for_email("alice@example.com");

    Ok(())
}

/// Mismatched confirmation fails with the dedicated error code and persists
/// nothing.
#[sqlx::test(migrations = "../../migrations")]
async fn test_register_password_mismatch_rejected(pool: PgPool) -> Result<(), anyhow::Error> {
    let server = TestIdentityServer::spawn(pool).await?;

    let response = server
        .client()
        .post(format!("{}/api/v1/auth/register", server.url()))
        .json(&json!({
            "email": "bob@example.com",
            "password": "Passw0rd!",
            "confirm_password": "Different1!",
            "full_name": "Bob",
        }))
        .send()
        .await?;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body: serde_json::Value = response.json().await?;
    assert_eq!(body["error"]["code"].as_str(), Some("PASSWORD_MISMATCH"));

    assert!(server.user_id_by_email("bob@example.com").await.is_err());

    Ok(())
}

/// Policy-violating passwords are rejected with WEAK_PASSWORD.
#[sqlx::test(migrations = "../../migrations")]
async fn test_register_weak_password_rejected(pool: PgPool) -> Result<(), anyhow::Error> {
    let server = TestIdentityServer::spawn(pool).await?;

    for weak in ["short", "alllowercase1!", "ALLUPPERCASE1!", "NoDigits!!", "NoSpecial1"] {
        let response = server
            .client()
            .post(format!("{}/api/v1/auth/register", server.url()))
            .json(&json!({
                "email": "carol@example.com",
                "password": weak,
                "confirm_password": weak,
                "full_name": "Carol",
            }))
            .send()
            .await?;

        assert_eq!(
            response.status(),
            StatusCode::BAD_REQUEST,
            "password '{}' should be rejected",
            weak
        );

        let body: serde_json::Value = response.json().await?;
        assert_eq!(body["error"]["code"].as_str(), Some("WEAK_PASSWORD"));
    }

    Ok(())
}

/// Reusing an email fails with 409, even when the case differs.
#[sqlx::test(migrations = "../../migrations")]
async fn test_register_duplicate_email_conflict(pool: PgPool) -> Result<(), anyhow::Error> {
    let server = TestIdentityServer::spawn(pool).await?;

    server
        .register_user("dave@example.com", "Passw0rd!", "Dave")
        .await?;

    let response = server
        .client()
        .post(format!("{}/api/v1/auth/register", server.url()))
        .json(&json!({
            "email": "DAVE@Example.com",
            "password": "Passw0rd!",
            "confirm_password": "Passw0rd!",
            "full_name": "Dave Again",
        }))
        .send()
        .await?;

    assert_eq!(response.status(), StatusCode::CONFLICT);

    let body: serde_json::Value = response.json().await?;
    assert_eq!(body["error"]["code"].as_str(), Some("EMAIL_TAKEN"));

    Ok(())
}

// ============================================================================
// Login
// ============================================================================

/// A registered account can log in and use the fresh token.
#[sqlx::test(migrations = "../../migrations")]
async fn test_login_happy_path(pool: PgPool) -> Result<(), anyhow::Error> {
    let server = TestIdentityServer::spawn(pool).await?;

    server
        .register_user("erin@example.com", "Passw0rd!", "Erin")
        .await?;

    let token = server.login("erin@example.com", "Passw0rd!").await?;
    token.assert_valid_jwt().assert_for_email("erin@example.com");

    // The token authenticates a profile read.
    let response = server
        .client()
        .get(format!("{}/api/v1/auth/profile", server.url()))
        .bearer_auth(&token)
        .send()
        .await?;

    assert_eq!(response.status(), StatusCode::OK);
    let body: serde_json::Value = response.json().await?;
    assert_eq!(body["email"].as_str(), Some("erin@example.com"));
    assert_eq!(body["roles"], json!(["user"]));
    assert!(body.get("password_hash").is_none());

    Ok(())
}

/// Wrong password and unknown email produce byte-identical error bodies.
#[sqlx::test(migrations = "../../migrations")]
async fn test_login_failures_are_generic(pool: PgPool) -> Result<(), anyhow::Error> {
    let server = TestIdentityServer::spawn(pool).await?;

    server
        .register_user("frank@example.com", "Passw0rd!", "Frank")
        .await?;

    let wrong_password = server
        .client()
        .post(format!("{}/api/v1/auth/login", server.url()))
        .json(&json!({ "email": "frank@example.com", "password": "Wrong0ne!" }))
        .send()
        .await?;
    assert_eq!(wrong_password.status(), StatusCode::UNAUTHORIZED);

    let unknown_email = server
        .client()
        .post(format!("{}/api/v1/auth/login", server.url()))
        .json(&json!({ "email": "stranger@example.com", "password": "Passw0rd!" }))
        .send()
        .await?;
    assert_eq!(unknown_email.status(), StatusCode::UNAUTHORIZED);

    assert_eq!(
        wrong_password.text().await?,
        unknown_email.text().await?,
        "failure responses must not disclose which check failed"
    );

    Ok(())
}

// ============================================================================
// Token handling
// ============================================================================

/// Requests without a bearer token are unauthenticated.
#[sqlx::test(migrations = "../../migrations")]
async fn test_protected_route_requires_token(pool: PgPool) -> Result<(), anyhow::Error> {
    let server = TestIdentityServer::spawn(pool).await?;

    let response = server
        .client()
        .get(format!("{}/api/v1/auth/profile", server.url()))
        .send()
        .await?;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    // A non-Bearer scheme is also rejected.
    let response = server
        .client()
        .get(format!("{}/api/v1/auth/profile", server.url()))
        .header("authorization", "Basic abcdef")
        .send()
        .await?;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    Ok(())
}

/// One flipped signature byte invalidates an otherwise good token.
#[sqlx::test(migrations = "../../migrations")]
async fn test_tampered_token_rejected(pool: PgPool) -> Result<(), anyhow::Error> {
    let server = TestIdentityServer::spawn(pool).await?;

    let token = server
        .register_user("grace@example.com", "Passw0rd!", "Grace")
        .await?;
    let tampered = tamper_signature(&token);

    let response = server
        .client()
        .get(format!("{}/api/v1/auth/profile", server.url()))
        .bearer_auth(&tampered)
        .send()
        .await?;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    Ok(())
}

/// An expired token is rejected at the middleware.
#[sqlx::test(migrations = "../../migrations")]
async fn test_expired_token_rejected(pool: PgPool) -> Result<(), anyhow::Error> {
    let server = TestIdentityServer::spawn(pool).await?;

    let expired = TestTokenBuilder::new().expires_in(-60).build();

    let response = server
        .client()
        .get(format!("{}/api/v1/auth/profile", server.url()))
        .bearer_auth(&expired)
        .send()
        .await?;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    Ok(())
}

/// Tokens minted for another issuer or audience do not authenticate here.
#[sqlx::test(migrations = "../../migrations")]
async fn test_foreign_issuer_or_audience_rejected(pool: PgPool) -> Result<(), anyhow::Error> {
    let server = TestIdentityServer::spawn(pool).await?;

    let foreign_issuer = TestTokenBuilder::new().with_issuer("someone-else").build();
    let foreign_audience = TestTokenBuilder::new().with_audience("other-api").build();
    let foreign_key = TestTokenBuilder::new().with_secret("other-secret").build();

    for token in [foreign_issuer, foreign_audience, foreign_key] {
        let response = server
            .client()
            .get(format!("{}/api/v1/auth/profile", server.url()))
            .bearer_auth(&token)
            .send()
            .await?;

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    Ok(())
}
