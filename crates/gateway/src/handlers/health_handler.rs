//! Health check handlers.

use axum::{extract::State, response::Json, routing::get, Router};
use serde::Serialize;

use crate::state::AppState;

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    /// `connected` once the lazy database connection has been opened
    pub database: &'static str,
}

/// Create health routes.
pub fn health_routes() -> Router<AppState> {
    Router::new().route("/", get(health_check))
}

/// Health check endpoint.
///
/// Does not open the database connection; it only reports whether an
/// earlier request already has.
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let database = if state.services.database_connected() {
        "connected"
    } else {
        "not_connected"
    };

    Json(HealthResponse {
        status: "healthy",
        database,
    })
}
