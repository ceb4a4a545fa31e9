use crate::crypto;
use crate::errors::AuthError;
use crate::handlers::auth_handler::AppState;
use crate::policy::CallerIdentity;
use axum::{
    extract::{Request, State},
    middleware::Next,
    response::IntoResponse,
};
use chrono::Utc;
use std::sync::Arc;

/// Authentication middleware for protected routes.
///
/// Extracts the Bearer token from the Authorization header, validates it
/// against the configured key/issuer/audience, and stores both the raw
/// claims and the derived `CallerIdentity` in request extensions for
/// downstream handlers.
pub async fn require_auth(
    State(state): State<Arc<AppState>>,
    mut req: Request,
    next: Next,
) -> Result<impl IntoResponse, AuthError> {
    let auth_header = req
        .headers()
        .get("authorization")
        .and_then(|h| h.to_str().ok())
        .ok_or(AuthError::InvalidToken(
            "Missing Authorization header".to_string(),
        ))?;

    let token = auth_header
        .strip_prefix("Bearer ")
        .ok_or(AuthError::InvalidToken(
            "Invalid Authorization header format".to_string(),
        ))?;

    let claims = crypto::validate_token(token, &state.config.jwt, Utc::now())?;
    let caller = CallerIdentity::from_claims(&claims)?;

    req.extensions_mut().insert(claims);
    req.extensions_mut().insert(caller);

    Ok(next.run(req).await)
}
