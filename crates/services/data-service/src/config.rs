//! Data service configuration.

use common::{CacheConfig, DatabaseConfig};

/// Data service configuration.
#[derive(Debug, Clone, Default)]
pub struct DataServiceConfig {
    /// Database connection settings
    pub database: DatabaseConfig,
    /// Redis settings for page revalidation; disabled when no URL is set
    pub cache: CacheConfig,
}

impl DataServiceConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        Self {
            database: DatabaseConfig::from_env(),
            cache: CacheConfig::from_env(),
        }
    }
}
