use crate::config::Config;
use crate::errors::AuthError;
use crate::models::{AuthResponse, UserView};
use crate::policy::CallerIdentity;
use crate::repositories::users;
use crate::services::auth_service::{self, RegistrationRequest};
use axum::{extract::State, Extension, Json};
use chrono::NaiveDate;
use secrecy::SecretString;
use serde::Deserialize;
use sqlx::PgPool;
use std::sync::Arc;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub config: Config,
}

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub password: SecretString,
    pub confirm_password: SecretString,
    pub full_name: String,
    pub date_of_birth: Option<NaiveDate>,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: SecretString,
}

/// Handle account registration
///
/// POST /api/v1/auth/register
pub async fn register(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<RegisterRequest>,
) -> Result<Json<AuthResponse>, AuthError> {
    let request = RegistrationRequest {
        email: payload.email,
        password: payload.password,
        confirm_password: payload.confirm_password,
        full_name: payload.full_name,
        date_of_birth: payload.date_of_birth,
    };

    let response = auth_service::register(&state.pool, &state.config.jwt, request).await?;

    Ok(Json(response))
}

/// Handle login
///
/// POST /api/v1/auth/login
pub async fn login(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<AuthResponse>, AuthError> {
    let response = auth_service::login(
        &state.pool,
        &state.config.jwt,
        &payload.email,
        &payload.password,
    )
    .await?;

    Ok(Json(response))
}

/// Return the calling account's own profile
///
/// GET /api/v1/auth/profile
pub async fn profile(
    State(state): State<Arc<AppState>>,
    Extension(caller): Extension<CallerIdentity>,
) -> Result<Json<UserView>, AuthError> {
    let user = auth_service::get_account(&state.pool, caller.user_id).await?;
    let roles = users::get_user_roles(&state.pool, caller.user_id).await?;

    Ok(Json(UserView::from_user(user, roles)))
}
