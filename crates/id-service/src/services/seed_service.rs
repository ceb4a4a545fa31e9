//! Bootstrap seeding: default roles and the initial super_admin account.
//!
//! Idempotent; runs at every startup. The rest of the system assumes the
//! three bootstrap roles exist (registration assigns `user`, the policy
//! checks name `admin` and `super_admin`).

use crate::config::DEFAULT_BCRYPT_COST;
use crate::crypto;
use crate::errors::AuthError;
use crate::policy::{ROLE_ADMIN, ROLE_SUPER_ADMIN, ROLE_USER};
use crate::repositories::{roles, users};
use crate::services::auth_service::normalize_email;
use sqlx::PgPool;

pub const DEFAULT_ROLES: [&str; 3] = [ROLE_USER, ROLE_ADMIN, ROLE_SUPER_ADMIN];

/// Ensure the bootstrap roles and one super_admin account exist.
pub async fn seed_default_data(
    pool: &PgPool,
    admin_email: &str,
    admin_password: &str,
) -> Result<(), AuthError> {
    for role_name in DEFAULT_ROLES {
        roles::create_role(pool, role_name, &format!("Default {} role", role_name)).await?;
    }

    let email = normalize_email(admin_email);
    if users::get_by_email(pool, &email).await?.is_none() {
        let password_hash = crypto::hash_password(admin_password, DEFAULT_BCRYPT_COST)?;

        match users::create_user(pool, &email, &password_hash, "System Administrator", None).await
        {
            Ok(admin) => {
                users::add_user_role(pool, admin.user_id, ROLE_SUPER_ADMIN).await?;
                tracing::info!(user_id = %admin.user_id, "Seeded default super_admin account");
            }
            // Another instance seeded the account between our check and the
            // insert; the outcome is the same.
            Err(AuthError::EmailTaken) => {}
            Err(e) => return Err(e),
        }
    }

    Ok(())
}
