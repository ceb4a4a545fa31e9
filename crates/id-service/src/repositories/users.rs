//! User repository: account lookup, creation, role assignment, and the
//! guarded delete that protects the last super_admin.

use crate::errors::AuthError;
use crate::models::User;
use crate::policy::ROLE_SUPER_ADMIN;
use chrono::NaiveDate;
use sqlx::PgPool;
use uuid::Uuid;

/// Get a user by normalized email.
pub async fn get_by_email(pool: &PgPool, email: &str) -> Result<Option<User>, AuthError> {
    let user = sqlx::query_as::<_, User>(
        r#"
        SELECT
            user_id, email, password_hash, full_name, date_of_birth,
            created_at, updated_at
        FROM users
        WHERE email = $1
        "#,
    )
    .bind(email)
    .fetch_optional(pool)
    .await
    .map_err(|e| AuthError::Database(format!("Failed to fetch user by email: {}", e)))?;

    Ok(user)
}

/// Get a user by id.
pub async fn get_by_id(pool: &PgPool, user_id: Uuid) -> Result<Option<User>, AuthError> {
    let user = sqlx::query_as::<_, User>(
        r#"
        SELECT
            user_id, email, password_hash, full_name, date_of_birth,
            created_at, updated_at
        FROM users
        WHERE user_id = $1
        "#,
    )
    .bind(user_id)
    .fetch_optional(pool)
    .await
    .map_err(|e| AuthError::Database(format!("Failed to fetch user by id: {}", e)))?;

    Ok(user)
}

/// List all users, oldest first.
pub async fn list_users(pool: &PgPool) -> Result<Vec<User>, AuthError> {
    let users = sqlx::query_as::<_, User>(
        r#"
        SELECT
            user_id, email, password_hash, full_name, date_of_birth,
            created_at, updated_at
        FROM users
        ORDER BY created_at
        "#,
    )
    .fetch_all(pool)
    .await
    .map_err(|e| AuthError::Database(format!("Failed to list users: {}", e)))?;

    Ok(users)
}

/// Check whether an account with this normalized email exists.
pub async fn email_exists(pool: &PgPool, email: &str) -> Result<bool, AuthError> {
    let exists: (bool,) =
        sqlx::query_as("SELECT EXISTS(SELECT 1 FROM users WHERE email = $1)")
            .bind(email)
            .fetch_one(pool)
            .await
            .map_err(|e| AuthError::Database(format!("Failed to check email existence: {}", e)))?;

    Ok(exists.0)
}

/// Create a new user.
///
/// The unique constraint on email is the authoritative uniqueness check; a
/// violation maps to `EmailTaken` so concurrent registrations race safely.
pub async fn create_user(
    pool: &PgPool,
    email: &str,
    password_hash: &str,
    full_name: &str,
    date_of_birth: Option<NaiveDate>,
) -> Result<User, AuthError> {
    let user = sqlx::query_as::<_, User>(
        r#"
        INSERT INTO users (email, password_hash, full_name, date_of_birth)
        VALUES ($1, $2, $3, $4)
        RETURNING
            user_id, email, password_hash, full_name, date_of_birth,
            created_at, updated_at
        "#,
    )
    .bind(email)
    .bind(password_hash)
    .bind(full_name)
    .bind(date_of_birth)
    .fetch_one(pool)
    .await
    .map_err(|e| {
        if e.to_string().contains("users_email_unique") {
            AuthError::EmailTaken
        } else {
            AuthError::Database(format!("Failed to create user: {}", e))
        }
    })?;

    Ok(user)
}

/// Get all role names assigned to a user, alphabetically.
pub async fn get_user_roles(pool: &PgPool, user_id: Uuid) -> Result<Vec<String>, AuthError> {
    let roles: Vec<(String,)> = sqlx::query_as(
        r#"
        SELECT role_name
        FROM user_roles
        WHERE user_id = $1
        ORDER BY role_name
        "#,
    )
    .bind(user_id)
    .fetch_all(pool)
    .await
    .map_err(|e| AuthError::Database(format!("Failed to fetch user roles: {}", e)))?;

    Ok(roles.into_iter().map(|(r,)| r).collect())
}

/// Add a role to a user. Idempotent; the FK to roles rejects unknown names.
pub async fn add_user_role(pool: &PgPool, user_id: Uuid, role: &str) -> Result<(), AuthError> {
    sqlx::query(
        r#"
        INSERT INTO user_roles (user_id, role_name)
        VALUES ($1, $2)
        ON CONFLICT (user_id, role_name) DO NOTHING
        "#,
    )
    .bind(user_id)
    .bind(role)
    .execute(pool)
    .await
    .map_err(|e| AuthError::Database(format!("Failed to add user role: {}", e)))?;

    Ok(())
}

/// Replace the user's entire role set with a single role.
///
/// Remove-all-then-add runs in one transaction, so readers never observe a
/// user with no roles.
pub async fn replace_user_roles(
    pool: &PgPool,
    user_id: Uuid,
    role: &str,
) -> Result<(), AuthError> {
    let mut tx = pool
        .begin()
        .await
        .map_err(|e| AuthError::Database(format!("Failed to begin transaction: {}", e)))?;

    sqlx::query("DELETE FROM user_roles WHERE user_id = $1")
        .bind(user_id)
        .execute(&mut *tx)
        .await
        .map_err(|e| AuthError::Database(format!("Failed to clear user roles: {}", e)))?;

    sqlx::query("INSERT INTO user_roles (user_id, role_name) VALUES ($1, $2)")
        .bind(user_id)
        .bind(role)
        .execute(&mut *tx)
        .await
        .map_err(|e| AuthError::Database(format!("Failed to assign user role: {}", e)))?;

    tx.commit()
        .await
        .map_err(|e| AuthError::Database(format!("Failed to commit role update: {}", e)))?;

    Ok(())
}

/// Count accounts holding a role.
pub async fn count_users_with_role(pool: &PgPool, role: &str) -> Result<i64, AuthError> {
    let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM user_roles WHERE role_name = $1")
        .bind(role)
        .fetch_one(pool)
        .await
        .map_err(|e| AuthError::Database(format!("Failed to count role holders: {}", e)))?;

    Ok(count.0)
}

/// Delete a user, refusing to remove the last super_admin.
///
/// The holder check and the delete run in one transaction. `FOR UPDATE`
/// locks every super_admin assignment row, so two concurrent deletes
/// serialize here instead of both observing "count > 1".
pub async fn delete_user_guarded(pool: &PgPool, user_id: Uuid) -> Result<(), AuthError> {
    let mut tx = pool
        .begin()
        .await
        .map_err(|e| AuthError::Database(format!("Failed to begin transaction: {}", e)))?;

    let holders: Vec<(Uuid,)> = sqlx::query_as(
        r#"
        SELECT user_id
        FROM user_roles
        WHERE role_name = $1
        FOR UPDATE
        "#,
    )
    .bind(ROLE_SUPER_ADMIN)
    .fetch_all(&mut *tx)
    .await
    .map_err(|e| AuthError::Database(format!("Failed to lock super_admin holders: {}", e)))?;

    let target_is_super_admin = holders.iter().any(|(id,)| *id == user_id);
    if target_is_super_admin && holders.len() <= 1 {
        // Dropping the transaction rolls back and releases the locks.
        return Err(AuthError::LastSuperAdminBlocked);
    }

    let result = sqlx::query("DELETE FROM users WHERE user_id = $1")
        .bind(user_id)
        .execute(&mut *tx)
        .await
        .map_err(|e| AuthError::Database(format!("Failed to delete user: {}", e)))?;

    if result.rows_affected() == 0 {
        return Err(AuthError::UserNotFound);
    }

    tx.commit()
        .await
        .map_err(|e| AuthError::Database(format!("Failed to commit delete: {}", e)))?;

    Ok(())
}
