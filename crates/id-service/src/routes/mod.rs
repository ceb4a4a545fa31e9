use crate::handlers::auth_handler::{self, AppState};
use crate::handlers::user_handler;
use crate::middleware::auth::require_auth;
use axum::{
    middleware,
    routing::{get, post, put},
    Router,
};
use std::sync::Arc;
use std::time::Duration;
use tower_http::{cors::CorsLayer, timeout::TimeoutLayer, trace::TraceLayer};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

pub fn build_routes(state: Arc<AppState>) -> Router {
    // Everything behind the bearer-token middleware.
    let protected = Router::new()
        .route("/api/v1/auth/profile", get(auth_handler::profile))
        .route("/api/v1/users", get(user_handler::list_users))
        .route(
            "/api/v1/users/:id",
            get(user_handler::get_user).delete(user_handler::delete_user),
        )
        .route("/api/v1/users/:id/roles", put(user_handler::update_user_roles))
        .layer(middleware::from_fn_with_state(state.clone(), require_auth));

    Router::new()
        // Credential endpoints (no token required)
        .route("/api/v1/auth/register", post(auth_handler::register))
        .route("/api/v1/auth/login", post(auth_handler::login))
        .merge(protected)
        // Health check
        .route("/health", get(health_check))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .layer(TimeoutLayer::new(REQUEST_TIMEOUT))
        .with_state(state)
}

async fn health_check() -> &'static str {
    "OK"
}
