use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use sqlx::FromRow;
use uuid::Uuid;

/// Account record (maps to the users table).
///
/// `user_id` is opaque and immutable; `email` is stored normalized
/// (lowercase) and doubles as the login handle.
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub user_id: Uuid,
    pub email: String,
    pub password_hash: String,
    pub full_name: String,
    pub date_of_birth: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Role record (maps to the roles table).
#[derive(Debug, Clone, FromRow)]
pub struct Role {
    pub role_name: String,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Response bundle returned by register and login.
#[derive(Debug, Clone, Serialize)]
pub struct AuthResponse {
    pub token: String,
    pub token_type: String,
    pub expires_at: DateTime<Utc>,
    pub email: String,
    pub full_name: String,
    pub roles: Vec<String>,
}

/// Account view returned by the user-management endpoints.
///
/// Never carries the password hash.
#[derive(Debug, Clone, Serialize)]
pub struct UserView {
    pub user_id: Uuid,
    pub email: String,
    pub full_name: String,
    pub date_of_birth: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub roles: Vec<String>,
}

impl UserView {
    pub fn from_user(user: User, roles: Vec<String>) -> Self {
        Self {
            user_id: user.user_id,
            email: user.email,
            full_name: user.full_name,
            date_of_birth: user.date_of_birth,
            created_at: user.created_at,
            updated_at: user.updated_at,
            roles,
        }
    }
}
