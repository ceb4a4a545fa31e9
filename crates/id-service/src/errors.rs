use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// Service error type.
///
/// Authentication failures are deliberately generic (no hint whether the
/// email or the password was wrong); authorization failures name the exact
/// policy reason, since those are policy facts rather than secrets.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Database error: {0}")]
    Database(String),

    #[error("Cryptographic error: {0}")]
    Crypto(String),

    #[error("Passwords do not match")]
    PasswordMismatch,

    #[error("Password does not meet policy: {0}")]
    WeakPassword(String),

    #[error("An account with this email already exists")]
    EmailTaken,

    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error("Invalid token: {0}")]
    InvalidToken(String),

    #[error("Requires role: {required}")]
    RoleRequired { required: &'static str },

    #[error("Cannot delete your own super_admin account")]
    SelfDeletionBlocked,

    #[error("Cannot delete the only super_admin account")]
    LastSuperAdminBlocked,

    #[error("User not found")]
    UserNotFound,

    #[error("Role does not exist: {0}")]
    UnknownRole(String),

    #[error("Internal server error")]
    Internal,
}

#[derive(Serialize)]
struct ErrorResponse {
    error: ErrorDetail,
}

#[derive(Serialize)]
struct ErrorDetail {
    code: String,
    message: String,
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AuthError::Database(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "DATABASE_ERROR",
                "An internal database error occurred".to_string(),
            ),
            AuthError::Crypto(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "CRYPTO_ERROR",
                "An internal cryptographic error occurred".to_string(),
            ),
            AuthError::PasswordMismatch => (
                StatusCode::BAD_REQUEST,
                "PASSWORD_MISMATCH",
                self.to_string(),
            ),
            AuthError::WeakPassword(_) => {
                (StatusCode::BAD_REQUEST, "WEAK_PASSWORD", self.to_string())
            }
            AuthError::EmailTaken => (StatusCode::CONFLICT, "EMAIL_TAKEN", self.to_string()),
            AuthError::InvalidCredentials => (
                StatusCode::UNAUTHORIZED,
                "INVALID_CREDENTIALS",
                self.to_string(),
            ),
            AuthError::InvalidToken(reason) => {
                (StatusCode::UNAUTHORIZED, "INVALID_TOKEN", reason.clone())
            }
            AuthError::RoleRequired { .. } => {
                (StatusCode::FORBIDDEN, "ROLE_REQUIRED", self.to_string())
            }
            AuthError::SelfDeletionBlocked => (
                StatusCode::FORBIDDEN,
                "SELF_DELETION_BLOCKED",
                self.to_string(),
            ),
            AuthError::LastSuperAdminBlocked => (
                StatusCode::FORBIDDEN,
                "LAST_SUPER_ADMIN_BLOCKED",
                self.to_string(),
            ),
            AuthError::UserNotFound => (StatusCode::NOT_FOUND, "USER_NOT_FOUND", self.to_string()),
            AuthError::UnknownRole(_) => {
                (StatusCode::BAD_REQUEST, "UNKNOWN_ROLE", self.to_string())
            }
            AuthError::Internal => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_ERROR",
                "An internal error occurred".to_string(),
            ),
        };

        let error_response = ErrorResponse {
            error: ErrorDetail {
                code: code.to_string(),
                message,
            },
        };

        (status, Json(error_response)).into_response()
    }
}
