//! Test server harness for E2E testing
//!
//! Provides TestIdentityServer for spawning real service instances in tests.

use crate::crypto_fixtures::test_jwt_config;
use crate::test_ids::{TEST_ADMIN_EMAIL, TEST_ADMIN_PASSWORD};
use anyhow::anyhow;
use id_service::config::Config;
use id_service::handlers::auth_handler::AppState;
use id_service::repositories::users;
use id_service::routes;
use id_service::services::seed_service;
use serde_json::json;
use sqlx::PgPool;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::task::JoinHandle;
use uuid::Uuid;

/// Test harness for spawning the identity controller in E2E tests
///
/// # Example
/// ```rust,ignore
/// #[sqlx::test(migrations = "../../migrations")]
/// async fn test_auth_flow_e2e(pool: PgPool) -> Result<(), anyhow::Error> {
///     let server = TestIdentityServer::spawn(pool).await?;
///
///     let response = server
///         .client()
///         .post(format!("{}/api/v1/auth/login", server.url()))
///         .json(&login_request)
///         .send()
///         .await?;
///
///     assert_eq!(response.status(), 200);
///     Ok(())
/// }
/// ```
pub struct TestIdentityServer {
    addr: SocketAddr,
    pool: PgPool,
    config: Config,
    client: reqwest::Client,
    _handle: JoinHandle<()>,
}

impl TestIdentityServer {
    /// Spawn a new test server instance with an isolated database
    ///
    /// The server will:
    /// - Seed the bootstrap roles and the default super_admin account
    /// - Bind to a random available port (127.0.0.1:0)
    /// - Start the HTTP server in the background
    pub async fn spawn(pool: PgPool) -> Result<Self, anyhow::Error> {
        seed_service::seed_default_data(&pool, TEST_ADMIN_EMAIL, TEST_ADMIN_PASSWORD)
            .await
            .map_err(|e| anyhow!("Failed to seed default data: {}", e))?;

        let config = Config {
            database_url: String::new(), // Not used after connection established
            bind_address: "127.0.0.1:0".to_string(),
            jwt: test_jwt_config(),
        };

        let state = Arc::new(AppState {
            pool: pool.clone(),
            config: config.clone(),
        });

        let app = routes::build_routes(state);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .map_err(|e| anyhow!("Failed to bind test server: {}", e))?;

        let addr = listener
            .local_addr()
            .map_err(|e| anyhow!("Failed to get local address: {}", e))?;

        let handle = tokio::spawn(async move {
            if let Err(e) = axum::serve(listener, app).await {
                eprintln!("Test server error: {}", e);
            }
        });

        Ok(Self {
            addr,
            pool,
            config,
            client: reqwest::Client::new(),
            _handle: handle,
        })
    }

    /// Get reference to the database pool
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Get the base URL of the test server
    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Get the socket address
    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    /// Get reference to the server configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Get the shared HTTP client
    pub fn client(&self) -> &reqwest::Client {
        &self.client
    }

    /// Register an account through the HTTP API and return its bearer token
    pub async fn register_user(
        &self,
        email: &str,
        password: &str,
        full_name: &str,
    ) -> Result<String, anyhow::Error> {
        let response = self
            .client
            .post(format!("{}/api/v1/auth/register", self.url()))
            .json(&json!({
                "email": email,
                "password": password,
                "confirm_password": password,
                "full_name": full_name,
            }))
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(anyhow!("Registration failed: {}", response.status()));
        }

        let body: serde_json::Value = response.json().await?;
        body["token"]
            .as_str()
            .map(|t| t.to_string())
            .ok_or_else(|| anyhow!("Registration response missing token"))
    }

    /// Log in through the HTTP API and return the bearer token
    pub async fn login(&self, email: &str, password: &str) -> Result<String, anyhow::Error> {
        let response = self
            .client
            .post(format!("{}/api/v1/auth/login", self.url()))
            .json(&json!({
                "email": email,
                "password": password,
            }))
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(anyhow!("Login failed: {}", response.status()));
        }

        let body: serde_json::Value = response.json().await?;
        body["token"]
            .as_str()
            .map(|t| t.to_string())
            .ok_or_else(|| anyhow!("Login response missing token"))
    }

    /// Log in as the seeded super_admin
    pub async fn admin_token(&self) -> Result<String, anyhow::Error> {
        self.login(TEST_ADMIN_EMAIL, TEST_ADMIN_PASSWORD).await
    }

    /// Look up an account id by email, straight from the store
    pub async fn user_id_by_email(&self, email: &str) -> Result<Uuid, anyhow::Error> {
        let user = users::get_by_email(&self.pool, email)
            .await
            .map_err(|e| anyhow!("Lookup failed: {}", e))?
            .ok_or_else(|| anyhow!("No user with email {}", email))?;

        Ok(user.user_id)
    }
}

impl Drop for TestIdentityServer {
    fn drop(&mut self) {
        // Explicitly abort the HTTP server task to ensure immediate cleanup
        // when the test completes.
        self._handle.abort();
    }
}
