//! Shared configuration structures.

use std::env;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Connection attempt timeout used when none is configured
pub const DEFAULT_CONNECT_TIMEOUT_MS: u64 = 30_000;

/// Database configuration.
///
/// The URL is optional on purpose: a missing URL is reported as a
/// configuration error when the first operation needs a connection.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DatabaseConfig {
    #[serde(skip_serializing)]
    pub url: Option<String>,
    /// Target schema selected on connect (Postgres search path)
    pub schema: Option<String>,
    pub connect_timeout_ms: u64,
    pub max_connections: Option<u32>,
    /// Apply pending migrations right after connecting
    pub run_migrations: bool,
}

impl DatabaseConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        Self {
            url: env::var("DATABASE_URL").ok().filter(|url| !url.is_empty()),
            schema: env::var("DATABASE_SCHEMA").ok().filter(|s| !s.is_empty()),
            connect_timeout_ms: env::var("DATABASE_CONNECT_TIMEOUT_MS")
                .ok()
                .and_then(|t| t.parse().ok())
                .unwrap_or(DEFAULT_CONNECT_TIMEOUT_MS),
            max_connections: env::var("DATABASE_MAX_CONNECTIONS")
                .ok()
                .and_then(|m| m.parse().ok()),
            run_migrations: env::var("DATABASE_RUN_MIGRATIONS")
                .map(|v| v != "false" && v != "0")
                .unwrap_or(true),
        }
    }

    /// Configuration pointing at a given URL with default settings.
    pub fn with_url(url: impl Into<String>) -> Self {
        Self {
            url: Some(url.into()),
            ..Self::default()
        }
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_millis(self.connect_timeout_ms)
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: None,
            schema: None,
            connect_timeout_ms: DEFAULT_CONNECT_TIMEOUT_MS,
            max_connections: None,
            run_migrations: true,
        }
    }
}

/// Redis configuration for rendered-page invalidation.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct CacheConfig {
    pub url: Option<String>,
}

impl CacheConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        Self {
            url: env::var("REDIS_URL").ok().filter(|url| !url.is_empty()),
        }
    }
}

/// JWT configuration for request authentication.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct JwtConfig {
    #[serde(skip_serializing)]
    pub secret: String,
    /// Accepted clock skew in seconds
    pub leeway_seconds: u64,
}

impl Default for JwtConfig {
    fn default() -> Self {
        Self {
            secret: String::new(),
            leeway_seconds: 60,
        }
    }
}
