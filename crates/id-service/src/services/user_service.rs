//! Account management: policy-gated list, read, role update, and delete.
//!
//! Every operation authorizes the caller through `policy::authorize` before
//! touching the store. The last-super-admin guard lives in the repository's
//! delete transaction, where the holder count is consistent with the delete.

use crate::errors::AuthError;
use crate::models::UserView;
use crate::policy::{self, CallerIdentity, UserOperation};
use crate::repositories::{roles, users};
use sqlx::PgPool;
use uuid::Uuid;

/// List all accounts with their roles. Requires admin-level access.
pub async fn list_users(
    pool: &PgPool,
    caller: &CallerIdentity,
) -> Result<Vec<UserView>, AuthError> {
    policy::authorize(caller, &UserOperation::List)?;

    let all = users::list_users(pool).await?;

    let mut views = Vec::with_capacity(all.len());
    for user in all {
        let assigned = users::get_user_roles(pool, user.user_id).await?;
        views.push(UserView::from_user(user, assigned));
    }

    Ok(views)
}

/// Read one account. Allowed for the account itself or admin-level callers.
pub async fn get_user(
    pool: &PgPool,
    caller: &CallerIdentity,
    target: Uuid,
) -> Result<UserView, AuthError> {
    policy::authorize(caller, &UserOperation::Read { target })?;

    let user = users::get_by_id(pool, target)
        .await?
        .ok_or(AuthError::UserNotFound)?;
    let assigned = users::get_user_roles(pool, target).await?;

    Ok(UserView::from_user(user, assigned))
}

/// Replace the target account's role set with a single role.
///
/// Requires super_admin; the target role must exist. Not additive: every
/// current role is removed first.
pub async fn update_user_roles(
    pool: &PgPool,
    caller: &CallerIdentity,
    target: Uuid,
    role: &str,
) -> Result<(), AuthError> {
    policy::authorize(caller, &UserOperation::UpdateRoles { target })?;

    if users::get_by_id(pool, target).await?.is_none() {
        return Err(AuthError::UserNotFound);
    }

    if !roles::role_exists(pool, role).await? {
        return Err(AuthError::UnknownRole(role.to_string()));
    }

    users::replace_user_roles(pool, target, role).await?;

    tracing::info!(target = %target, role = %role, "Replaced user roles");

    Ok(())
}

/// Delete an account.
///
/// Requires super_admin. Self-deletion is refused by policy (a super_admin
/// locking themselves out); deleting the last super_admin is refused inside
/// the store transaction.
pub async fn delete_user(
    pool: &PgPool,
    caller: &CallerIdentity,
    target: Uuid,
) -> Result<(), AuthError> {
    policy::authorize(caller, &UserOperation::Delete { target })?;

    if users::get_by_id(pool, target).await?.is_none() {
        return Err(AuthError::UserNotFound);
    }

    users::delete_user_guarded(pool, target).await?;

    tracing::info!(target = %target, "Deleted user account");

    Ok(())
}
