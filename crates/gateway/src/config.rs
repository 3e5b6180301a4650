//! Gateway configuration.

use std::env;

use common::JwtConfig;

/// Routes reachable without an identity token
pub const DEFAULT_PUBLIC_ROUTES: &[&str] = &["^/api/webhooks(.*)$", "^/health$"];

/// Gateway configuration.
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    /// Server host
    pub host: String,
    /// Server port
    pub port: u16,
    /// Identity token verification
    pub jwt: JwtConfig,
    /// Shared secret for identity-provider webhooks
    pub identity_webhook_secret: Option<String>,
    /// Shared secret for payment-processor webhooks
    pub payment_webhook_secret: Option<String>,
    /// Path patterns that skip authentication
    pub public_routes: Vec<String>,
}

impl GatewayConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let defaults = Self::default();

        Self {
            host: env::var("GATEWAY_HOST").unwrap_or(defaults.host),
            port: env::var("GATEWAY_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(defaults.port),
            jwt: JwtConfig {
                secret: env::var("JWT_SECRET").unwrap_or_default(),
                leeway_seconds: env::var("JWT_LEEWAY_SECONDS")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(defaults.jwt.leeway_seconds),
            },
            identity_webhook_secret: non_empty_var("IDENTITY_WEBHOOK_SECRET"),
            payment_webhook_secret: non_empty_var("PAYMENT_WEBHOOK_SECRET"),
            public_routes: env::var("PUBLIC_ROUTES")
                .ok()
                .map(|routes| {
                    routes
                        .split(',')
                        .map(str::trim)
                        .filter(|r| !r.is_empty())
                        .map(String::from)
                        .collect::<Vec<_>>()
                })
                .filter(|routes| !routes.is_empty())
                .unwrap_or(defaults.public_routes),
        }
    }
}

fn non_empty_var(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.is_empty())
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
            jwt: JwtConfig::default(),
            identity_webhook_secret: None,
            payment_webhook_secret: None,
            public_routes: DEFAULT_PUBLIC_ROUTES.iter().map(|r| r.to_string()).collect(),
        }
    }
}
