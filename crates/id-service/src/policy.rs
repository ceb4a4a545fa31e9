//! Role-based access control for account-management operations.
//!
//! `authorize` is a pure function over (caller identity, operation): it
//! consults no storage and performs no I/O, so every rule is unit-testable
//! in isolation. Guards that need store state (the last-super-admin count)
//! live in the user service, inside the delete transaction.

use crate::crypto::UserClaims;
use crate::errors::AuthError;
use uuid::Uuid;

pub const ROLE_USER: &str = "user";
pub const ROLE_ADMIN: &str = "admin";
pub const ROLE_SUPER_ADMIN: &str = "super_admin";

/// The authenticated caller, as established by token validation.
#[derive(Debug, Clone)]
pub struct CallerIdentity {
    pub user_id: Uuid,
    pub roles: Vec<String>,
}

impl CallerIdentity {
    /// Build the caller identity from validated token claims.
    pub fn from_claims(claims: &UserClaims) -> Result<Self, AuthError> {
        let user_id = Uuid::parse_str(&claims.sub).map_err(|_| {
            AuthError::InvalidToken("The access token is invalid or expired".to_string())
        })?;

        Ok(Self {
            user_id,
            roles: claims.roles.clone(),
        })
    }

    #[must_use]
    pub fn has_role(&self, role: &str) -> bool {
        self.roles.iter().any(|r| r == role)
    }

    /// Admin-level access: `super_admin` implies everything `admin` can do.
    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.has_role(ROLE_ADMIN) || self.has_role(ROLE_SUPER_ADMIN)
    }

    #[must_use]
    pub fn is_super_admin(&self) -> bool {
        self.has_role(ROLE_SUPER_ADMIN)
    }
}

/// Account-management operations subject to role policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserOperation {
    /// List all accounts
    List,
    /// Read a single account
    Read { target: Uuid },
    /// Replace the target account's role set
    UpdateRoles { target: Uuid },
    /// Delete the target account
    Delete { target: Uuid },
}

/// Decide whether the caller may perform the operation.
///
/// Rules:
/// - List: requires `admin` or `super_admin`.
/// - Read: the subject account itself, or `admin`/`super_admin`.
/// - UpdateRoles: requires `super_admin`.
/// - Delete: requires `super_admin`; a super_admin may never delete their
///   own account (self-lockout protection). The last-super-admin guard is
///   enforced at the store, where the holder count is visible.
pub fn authorize(caller: &CallerIdentity, op: &UserOperation) -> Result<(), AuthError> {
    match op {
        UserOperation::List => {
            if caller.is_admin() {
                Ok(())
            } else {
                Err(AuthError::RoleRequired {
                    required: ROLE_ADMIN,
                })
            }
        }
        UserOperation::Read { target } => {
            if *target == caller.user_id || caller.is_admin() {
                Ok(())
            } else {
                Err(AuthError::RoleRequired {
                    required: ROLE_ADMIN,
                })
            }
        }
        UserOperation::UpdateRoles { .. } => {
            if caller.is_super_admin() {
                Ok(())
            } else {
                Err(AuthError::RoleRequired {
                    required: ROLE_SUPER_ADMIN,
                })
            }
        }
        UserOperation::Delete { target } => {
            if !caller.is_super_admin() {
                return Err(AuthError::RoleRequired {
                    required: ROLE_SUPER_ADMIN,
                });
            }
            // Delete already requires super_admin, so a self-delete is by
            // definition a super_admin deleting their own account.
            if *target == caller.user_id {
                return Err(AuthError::SelfDeletionBlocked);
            }
            Ok(())
        }
    }
}
