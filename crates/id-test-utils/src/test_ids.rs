//! Fixed test IDs for deterministic tests
//!
//! All test IDs are deterministic to ensure reproducible test results.
//! Using fixed UUIDs prevents flaky tests caused by random data.

use uuid::Uuid;

// User IDs (100-199)
pub const TEST_USER_ALICE: Uuid = Uuid::from_u128(100);
pub const TEST_USER_BOB: Uuid = Uuid::from_u128(101);
pub const TEST_USER_CHARLIE: Uuid = Uuid::from_u128(102);

// Token IDs
pub const TEST_JTI_1: &str = "00000000-0000-0000-0000-000000000001";
pub const TEST_JTI_2: &str = "00000000-0000-0000-0000-000000000002";

// Seeded admin credentials (match the service seed defaults)
pub const TEST_ADMIN_EMAIL: &str = "admin@example.com";
pub const TEST_ADMIN_PASSWORD: &str = "Admin@123456";

// A policy-compliant password for registrations
pub const TEST_USER_PASSWORD: &str = "Passw0rd!";
