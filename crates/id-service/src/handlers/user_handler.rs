use crate::errors::AuthError;
use crate::handlers::auth_handler::AppState;
use crate::models::UserView;
use crate::policy::CallerIdentity;
use crate::services::user_service;
use axum::{
    extract::{Path, State},
    Extension, Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

#[derive(Debug, Deserialize)]
pub struct UpdateRolesRequest {
    pub role: String,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

/// List all accounts (admin or super_admin)
///
/// GET /api/v1/users
pub async fn list_users(
    State(state): State<Arc<AppState>>,
    Extension(caller): Extension<CallerIdentity>,
) -> Result<Json<Vec<UserView>>, AuthError> {
    let views = user_service::list_users(&state.pool, &caller).await?;

    Ok(Json(views))
}

/// Read one account (self or admin-level)
///
/// GET /api/v1/users/{id}
pub async fn get_user(
    State(state): State<Arc<AppState>>,
    Extension(caller): Extension<CallerIdentity>,
    Path(id): Path<Uuid>,
) -> Result<Json<UserView>, AuthError> {
    let view = user_service::get_user(&state.pool, &caller, id).await?;

    Ok(Json(view))
}

/// Replace an account's role set with a single role (super_admin)
///
/// PUT /api/v1/users/{id}/roles
pub async fn update_user_roles(
    State(state): State<Arc<AppState>>,
    Extension(caller): Extension<CallerIdentity>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateRolesRequest>,
) -> Result<Json<MessageResponse>, AuthError> {
    user_service::update_user_roles(&state.pool, &caller, id, &payload.role).await?;

    Ok(Json(MessageResponse {
        message: "User role updated successfully".to_string(),
    }))
}

/// Delete an account (super_admin, guarded)
///
/// DELETE /api/v1/users/{id}
pub async fn delete_user(
    State(state): State<Arc<AppState>>,
    Extension(caller): Extension<CallerIdentity>,
    Path(id): Path<Uuid>,
) -> Result<Json<MessageResponse>, AuthError> {
    user_service::delete_user(&state.pool, &caller, id).await?;

    Ok(Json(MessageResponse {
        message: "User deleted successfully".to_string(),
    }))
}
