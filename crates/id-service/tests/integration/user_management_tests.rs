//! E2E tests for role-gated account management.
//!
//! Covers the list/read/update-roles/delete surface, including the
//! super_admin self-protection rules.

use id_test_utils::server_harness::TestIdentityServer;
use id_test_utils::test_ids::TEST_ADMIN_EMAIL;
use reqwest::StatusCode;
use serde_json::json;
use sqlx::PgPool;

/// Full lifecycle scenario: seeded super_admin A, registered user B.
/// B cannot list accounts; A promotes B to admin; B can list; A cannot
/// delete itself.
#[sqlx::test(migrations = "../../migrations")]
async fn test_promotion_scenario(pool: PgPool) -> Result<(), anyhow::Error> {
    let server = TestIdentityServer::spawn(pool).await?;
    let admin_token = server.admin_token().await?;
    let admin_id = server.user_id_by_email(TEST_ADMIN_EMAIL).await?;

    let b_token = server
        .register_user("b@example.com", "Passw0rd!", "Bee")
        .await?;
    let b_id = server.user_id_by_email("b@example.com").await?;

    // B holds only `user` and cannot list accounts.
    let denied = server
        .client()
        .get(format!("{}/api/v1/users", server.url()))
        .bearer_auth(&b_token)
        .send()
        .await?;
    assert_eq!(denied.status(), StatusCode::FORBIDDEN);
    let body: serde_json::Value = denied.json().await?;
    assert_eq!(body["error"]["code"].as_str(), Some("ROLE_REQUIRED"));

    // A promotes B to admin (replaces the whole role set).
    let promoted = server
        .client()
        .put(format!("{}/api/v1/users/{}/roles", server.url(), b_id))
        .bearer_auth(&admin_token)
        .json(&json!({ "role": "admin" }))
        .send()
        .await?;
    assert_eq!(promoted.status(), StatusCode::OK);

    // B's old token still claims `user`; a fresh login carries the new role.
    let b_token = server.login("b@example.com", "Passw0rd!").await?;

    let listed = server
        .client()
        .get(format!("{}/api/v1/users", server.url()))
        .bearer_auth(&b_token)
        .send()
        .await?;
    assert_eq!(listed.status(), StatusCode::OK);

    let accounts: serde_json::Value = listed.json().await?;
    let emails: Vec<&str> = accounts
        .as_array()
        .map(|a| {
            a.iter()
                .filter_map(|u| u["email"].as_str())
                .collect::<Vec<_>>()
        })
        .unwrap_or_default();
    assert!(emails.contains(&TEST_ADMIN_EMAIL));
    assert!(emails.contains(&"b@example.com"));

    // A may not delete its own super_admin account.
    let self_delete = server
        .client()
        .delete(format!("{}/api/v1/users/{}", server.url(), admin_id))
        .bearer_auth(&admin_token)
        .send()
        .await?;
    assert_eq!(self_delete.status(), StatusCode::FORBIDDEN);
    let body: serde_json::Value = self_delete.json().await?;
    assert_eq!(
        body["error"]["code"].as_str(),
        Some("SELF_DELETION_BLOCKED")
    );

    Ok(())
}

/// A plain user reads their own account but not someone else's.
#[sqlx::test(migrations = "../../migrations")]
async fn test_read_account_self_or_admin(pool: PgPool) -> Result<(), anyhow::Error> {
    let server = TestIdentityServer::spawn(pool).await?;
    let admin_token = server.admin_token().await?;

    let alice_token = server
        .register_user("alice@example.com", "Passw0rd!", "Alice")
        .await?;
    let alice_id = server.user_id_by_email("alice@example.com").await?;

    server
        .register_user("bob@example.com", "Passw0rd!", "Bob")
        .await?;
    let bob_id = server.user_id_by_email("bob@example.com").await?;

    // Own account: OK.
    let own = server
        .client()
        .get(format!("{}/api/v1/users/{}", server.url(), alice_id))
        .bearer_auth(&alice_token)
        .send()
        .await?;
    assert_eq!(own.status(), StatusCode::OK);
    let body: serde_json::Value = own.json().await?;
    assert_eq!(body["email"].as_str(), Some("alice@example.com"));

    // Someone else's account: forbidden.
    let other = server
        .client()
        .get(format!("{}/api/v1/users/{}", server.url(), bob_id))
        .bearer_auth(&alice_token)
        .send()
        .await?;
    assert_eq!(other.status(), StatusCode::FORBIDDEN);

    // Admin-level caller reads anyone.
    let as_admin = server
        .client()
        .get(format!("{}/api/v1/users/{}", server.url(), bob_id))
        .bearer_auth(&admin_token)
        .send()
        .await?;
    assert_eq!(as_admin.status(), StatusCode::OK);

    Ok(())
}

/// Role updates demand an existing role and super_admin privileges.
#[sqlx::test(migrations = "../../migrations")]
async fn test_update_roles_validation(pool: PgPool) -> Result<(), anyhow::Error> {
    let server = TestIdentityServer::spawn(pool).await?;
    let admin_token = server.admin_token().await?;

    let carol_token = server
        .register_user("carol@example.com", "Passw0rd!", "Carol")
        .await?;
    let carol_id = server.user_id_by_email("carol@example.com").await?;

    // Unknown role name.
    let unknown = server
        .client()
        .put(format!("{}/api/v1/users/{}/roles", server.url(), carol_id))
        .bearer_auth(&admin_token)
        .json(&json!({ "role": "wizard" }))
        .send()
        .await?;
    assert_eq!(unknown.status(), StatusCode::BAD_REQUEST);
    let body: serde_json::Value = unknown.json().await?;
    assert_eq!(body["error"]["code"].as_str(), Some("UNKNOWN_ROLE"));

    // A non-super_admin caller cannot touch roles, not even their own.
    let forbidden = server
        .client()
        .put(format!("{}/api/v1/users/{}/roles", server.url(), carol_id))
        .bearer_auth(&carol_token)
        .json(&json!({ "role": "admin" }))
        .send()
        .await?;
    assert_eq!(forbidden.status(), StatusCode::FORBIDDEN);

    // Unknown target account.
    let missing = server
        .client()
        .put(format!(
            "{}/api/v1/users/00000000-0000-0000-0000-00000000dead/roles",
            server.url()
        ))
        .bearer_auth(&admin_token)
        .json(&json!({ "role": "admin" }))
        .send()
        .await?;
    assert_eq!(missing.status(), StatusCode::NOT_FOUND);

    Ok(())
}

/// Deleting a plain account works and the record is gone afterwards.
#[sqlx::test(migrations = "../../migrations")]
async fn test_delete_account(pool: PgPool) -> Result<(), anyhow::Error> {
    let server = TestIdentityServer::spawn(pool).await?;
    let admin_token = server.admin_token().await?;

    server
        .register_user("victim@example.com", "Passw0rd!", "Victim")
        .await?;
    let victim_id = server.user_id_by_email("victim@example.com").await?;

    let deleted = server
        .client()
        .delete(format!("{}/api/v1/users/{}", server.url(), victim_id))
        .bearer_auth(&admin_token)
        .send()
        .await?;
    assert_eq!(deleted.status(), StatusCode::OK);

    let gone = server
        .client()
        .get(format!("{}/api/v1/users/{}", server.url(), victim_id))
        .bearer_auth(&admin_token)
        .send()
        .await?;
    assert_eq!(gone.status(), StatusCode::NOT_FOUND);

    Ok(())
}

/// The holder count is evaluated at call time: a stale super_admin token
/// cannot remove the only remaining super_admin.
#[sqlx::test(migrations = "../../migrations")]
async fn test_last_super_admin_guard_uses_current_state(
    pool: PgPool,
) -> Result<(), anyhow::Error> {
    let server = TestIdentityServer::spawn(pool).await?;
    let admin_token = server.admin_token().await?;
    let admin_id = server.user_id_by_email(TEST_ADMIN_EMAIL).await?;

    server
        .register_user("deputy@example.com", "Passw0rd!", "Deputy")
        .await?;
    let deputy_id = server.user_id_by_email("deputy@example.com").await?;

    // Promote the deputy to super_admin and capture a token carrying it.
    let promoted = server
        .client()
        .put(format!("{}/api/v1/users/{}/roles", server.url(), deputy_id))
        .bearer_auth(&admin_token)
        .json(&json!({ "role": "super_admin" }))
        .send()
        .await?;
    assert_eq!(promoted.status(), StatusCode::OK);
    let deputy_token = server.login("deputy@example.com", "Passw0rd!").await?;

    // Demote the deputy again; their token still claims super_admin.
    let demoted = server
        .client()
        .put(format!("{}/api/v1/users/{}/roles", server.url(), deputy_id))
        .bearer_auth(&admin_token)
        .json(&json!({ "role": "user" }))
        .send()
        .await?;
    assert_eq!(demoted.status(), StatusCode::OK);

    // The stale token passes the role gate, but the store sees a single
    // remaining super_admin and refuses.
    let blocked = server
        .client()
        .delete(format!("{}/api/v1/users/{}", server.url(), admin_id))
        .bearer_auth(&deputy_token)
        .send()
        .await?;
    assert_eq!(blocked.status(), StatusCode::FORBIDDEN);
    let body: serde_json::Value = blocked.json().await?;
    assert_eq!(
        body["error"]["code"].as_str(),
        Some("LAST_SUPER_ADMIN_BLOCKED")
    );

    // With a genuine second super_admin the same delete goes through.
    let repromoted = server
        .client()
        .put(format!("{}/api/v1/users/{}/roles", server.url(), deputy_id))
        .bearer_auth(&admin_token)
        .json(&json!({ "role": "super_admin" }))
        .send()
        .await?;
    assert_eq!(repromoted.status(), StatusCode::OK);

    let allowed = server
        .client()
        .delete(format!("{}/api/v1/users/{}", server.url(), admin_id))
        .bearer_auth(&deputy_token)
        .send()
        .await?;
    assert_eq!(allowed.status(), StatusCode::OK);

    Ok(())
}
