//! Application state for dependency injection.

use std::sync::Arc;

use data_service_lib::ServiceContainer;

use crate::config::GatewayConfig;
use crate::middleware::RouteGate;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    pub services: Arc<dyn ServiceContainer>,
    pub gate: Arc<RouteGate>,
    pub config: Arc<GatewayConfig>,
}

impl AppState {
    /// Create new app state.
    pub fn new(
        services: Arc<dyn ServiceContainer>,
        gate: RouteGate,
        config: GatewayConfig,
    ) -> Self {
        Self {
            services,
            gate: Arc::new(gate),
            config: Arc::new(config),
        }
    }
}
