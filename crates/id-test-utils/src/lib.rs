//! # Identity Test Utilities
//!
//! Shared test utilities for the identity controller service.
//!
//! This crate provides:
//! - Deterministic crypto fixtures (fixed secret/clock for reproducible tests)
//! - Test data builders (TestTokenBuilder)
//! - Server test harness (TestIdentityServer for E2E tests)
//! - Fixed test IDs and credentials
//! - Custom assertions (TokenAssertions trait)
//!
//! ## Usage
//!
//! ```rust,ignore
//! use id_test_utils::*;
//!
//! #[sqlx::test(migrations = "../../migrations")]
//! async fn test_example(pool: PgPool) -> Result<(), anyhow::Error> {
//!     let server = TestIdentityServer::spawn(pool).await?;
//!
//!     let token = server
//!         .register_user("alice@example.com", "Passw0rd!", "Alice")
//!         .await?;
//!
//!     token.assert_valid_jwt().assert_has_role("user");
//!     Ok(())
//! }
//! ```

pub mod assertions;
pub mod crypto_fixtures;
pub mod server_harness;
pub mod test_ids;
pub mod token_builders;

// Re-export commonly used items
pub use assertions::*;
pub use crypto_fixtures::*;
pub use server_harness::*;
pub use test_ids::*;
pub use token_builders::*;
