//! Route configuration.

use axum::{middleware, Router};

use crate::handlers::{health_routes, image_routes, user_routes, webhook_routes};
use crate::middleware::auth_middleware;
use crate::state::AppState;

/// Create the main router with all routes.
///
/// The auth gate wraps the whole router, so unknown paths are gated too.
pub fn create_router(state: AppState) -> Router {
    let api = Router::new()
        .nest("/webhooks", webhook_routes())
        .nest("/users", user_routes())
        .nest("/images", image_routes());

    Router::new()
        .nest("/health", health_routes())
        .nest("/api", api)
        .layer(middleware::from_fn_with_state(state.clone(), auth_middleware))
        .with_state(state)
}
