//! Role repository.

use crate::errors::AuthError;
use crate::models::Role;
use sqlx::PgPool;

/// Check whether a role exists.
pub async fn role_exists(pool: &PgPool, role_name: &str) -> Result<bool, AuthError> {
    let exists: (bool,) =
        sqlx::query_as("SELECT EXISTS(SELECT 1 FROM roles WHERE role_name = $1)")
            .bind(role_name)
            .fetch_one(pool)
            .await
            .map_err(|e| AuthError::Database(format!("Failed to check role existence: {}", e)))?;

    Ok(exists.0)
}

/// Create a role if it does not already exist. Idempotent for seeding.
pub async fn create_role(
    pool: &PgPool,
    role_name: &str,
    description: &str,
) -> Result<(), AuthError> {
    sqlx::query(
        r#"
        INSERT INTO roles (role_name, description)
        VALUES ($1, $2)
        ON CONFLICT (role_name) DO NOTHING
        "#,
    )
    .bind(role_name)
    .bind(description)
    .execute(pool)
    .await
    .map_err(|e| AuthError::Database(format!("Failed to create role: {}", e)))?;

    Ok(())
}

/// Fetch a role by name.
pub async fn get_role(pool: &PgPool, role_name: &str) -> Result<Option<Role>, AuthError> {
    let role = sqlx::query_as::<_, Role>(
        r#"
        SELECT role_name, description, created_at, updated_at
        FROM roles
        WHERE role_name = $1
        "#,
    )
    .bind(role_name)
    .fetch_optional(pool)
    .await
    .map_err(|e| AuthError::Database(format!("Failed to fetch role: {}", e)))?;

    Ok(role)
}
