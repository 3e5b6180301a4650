//! API Gateway Library
//!
//! HTTP surface over the data service: the authentication gate, identity
//! and payment webhooks, and the signed-in user's own records.

pub mod config;
pub mod crypto;
pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod routes;
pub mod state;

use std::net::SocketAddr;
use std::sync::Arc;

use tower_http::trace::TraceLayer;
use tracing::info;

use data_service_lib::config::DataServiceConfig;
use data_service_lib::Services;

use crate::config::GatewayConfig;
use crate::middleware::RouteGate;
use crate::routes::create_router;
use crate::state::AppState;

/// Run the HTTP server with the given configuration.
pub async fn run_server(config: GatewayConfig) -> Result<(), Box<dyn std::error::Error>> {
    // The database is opened lazily by the first request that needs it
    let services = Arc::new(Services::from_config(&DataServiceConfig::from_env()).await?);

    let gate = RouteGate::new(&config.public_routes)?;
    let addr: SocketAddr = format!("{}:{}", config.host, config.port).parse()?;

    let state = AppState::new(services, gate, config);
    let app = create_router(state).layer(TraceLayer::new_for_http());

    info!("Gateway listening on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
